//! Bucketed assignment board behind every drag/drop picker.
//!
//! A board holds an ordered universe of item ids and an ordered list of
//! buckets. The pool is the universe minus everything assigned. An item lives
//! in at most one bucket; drag events in the UI reduce to [`BucketBoard::place`]
//! and [`BucketBoard::unplace`].

use std::fmt::Debug;

use thiserror::Error;

use crate::list_view::{Listable, matches_search};

/// How many items a bucket accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capacity {
    Unlimited,
    /// Placing into a full bucket is rejected.
    AtMost(usize),
    /// Holds one item; placing replaces the current occupant.
    Single,
}

/// What happens when an item is dropped on the bucket that already holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redrop {
    Keep,
    MoveToEnd,
}

/// Static description of a bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketSpec<K> {
    pub key: K,
    pub label: String,
    pub capacity: Capacity,
    pub redrop: Redrop,
}

impl<K> BucketSpec<K> {
    pub fn new(key: K, label: impl Into<String>, capacity: Capacity) -> Self {
        Self {
            key,
            label: label.into(),
            capacity,
            redrop: Redrop::Keep,
        }
    }

    pub fn with_redrop(mut self, redrop: Redrop) -> Self {
        self.redrop = redrop;
        self
    }

    /// Upper bound on contents, if any.
    pub fn limit(&self) -> Option<usize> {
        match self.capacity {
            Capacity::Unlimited => None,
            Capacity::AtMost(max) => Some(max),
            Capacity::Single => Some(1),
        }
    }
}

/// A bucket and its ordered contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket<K, Id> {
    pub spec: BucketSpec<K>,
    items: Vec<Id>,
}

impl<K, Id> Bucket<K, Id> {
    pub fn items(&self) -> &[Id] {
        &self.items
    }

    pub fn is_full(&self) -> bool {
        self.spec
            .limit()
            .is_some_and(|limit| self.items.len() >= limit)
    }
}

/// Successful outcome of [`BucketBoard::place`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement<K, Id> {
    /// Taken from the pool.
    Added,
    /// Moved from another bucket.
    Moved { from: K },
    /// Already there; order untouched.
    Unchanged,
    /// Already there; relocated to the tail.
    MovedToEnd,
    /// Single-slot bucket; the previous occupant went back to the pool.
    Replaced { previous: Id },
}

/// Rejected placement. The board is left unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("{bucket} can hold at most {capacity} items")]
    AtCapacity { bucket: String, capacity: usize },
    #[error("Unknown bucket {0}")]
    UnknownBucket(String),
    #[error("Item is not part of this board")]
    UnknownItem,
}

/// Key used by single-bucket pickers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selection {
    Selected,
}

/// Normalized drag/drop state: universe, pool and buckets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketBoard<K, Id> {
    universe: Vec<Id>,
    buckets: Vec<Bucket<K, Id>>,
}

impl<K, Id> BucketBoard<K, Id>
where
    K: Copy + Eq + Debug,
    Id: Clone + PartialEq,
{
    pub fn new(universe: Vec<Id>, specs: Vec<BucketSpec<K>>) -> Self {
        Self {
            universe,
            buckets: specs
                .into_iter()
                .map(|spec| Bucket {
                    spec,
                    items: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn buckets(&self) -> &[Bucket<K, Id>] {
        &self.buckets
    }

    pub fn universe(&self) -> &[Id] {
        &self.universe
    }

    pub fn spec(&self, key: K) -> Option<&BucketSpec<K>> {
        self.bucket(key).map(|bucket| &bucket.spec)
    }

    /// Move `item` into `key`, honouring capacity and redrop rules.
    pub fn place(&mut self, item: Id, key: K) -> Result<Placement<K, Id>, PlacementError> {
        if !self.universe.contains(&item) {
            return Err(PlacementError::UnknownItem);
        }
        let target = self
            .bucket_index(key)
            .ok_or_else(|| PlacementError::UnknownBucket(format!("{key:?}")))?;
        let bucket = &self.buckets[target];

        if let Some(position) = bucket.items.iter().position(|existing| *existing == item) {
            return Ok(match bucket.spec.redrop {
                Redrop::Keep => Placement::Unchanged,
                Redrop::MoveToEnd => {
                    let bucket = &mut self.buckets[target];
                    let moved = bucket.items.remove(position);
                    bucket.items.push(moved);
                    Placement::MovedToEnd
                }
            });
        }

        let mut replaced = None;
        match bucket.spec.capacity {
            Capacity::Unlimited => {}
            Capacity::AtMost(capacity) => {
                if bucket.items.len() >= capacity {
                    return Err(PlacementError::AtCapacity {
                        bucket: bucket.spec.label.clone(),
                        capacity,
                    });
                }
            }
            Capacity::Single => {
                replaced = self.buckets[target].items.drain(..).next();
            }
        }

        let from = self.take(&item);
        self.buckets[target].items.push(item);
        Ok(match (replaced, from) {
            (Some(previous), _) => Placement::Replaced { previous },
            (None, Some(from)) => Placement::Moved { from },
            (None, None) => Placement::Added,
        })
    }

    /// Return `item` to the pool; yields the bucket it left.
    pub fn unplace(&mut self, item: &Id) -> Option<K> {
        self.take(item)
    }

    /// Remove `item` only if `key` holds it.
    pub fn remove(&mut self, item: &Id, key: K) -> bool {
        let Some(index) = self.bucket_index(key) else {
            return false;
        };
        let items = &mut self.buckets[index].items;
        let before = items.len();
        items.retain(|existing| existing != item);
        items.len() != before
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.items.clear();
        }
    }

    pub fn contents(&self, key: K) -> &[Id] {
        self.bucket(key).map(|bucket| bucket.items()).unwrap_or(&[])
    }

    pub fn bucket_of(&self, item: &Id) -> Option<K> {
        self.buckets
            .iter()
            .find(|bucket| bucket.items.contains(item))
            .map(|bucket| bucket.spec.key)
    }

    pub fn is_assigned(&self, item: &Id) -> bool {
        self.bucket_of(item).is_some()
    }

    pub fn is_full(&self, key: K) -> bool {
        self.bucket(key).is_some_and(Bucket::is_full)
    }

    /// Unassigned ids in universe order.
    pub fn pool(&self) -> Vec<Id> {
        self.universe
            .iter()
            .filter(|item| !self.is_assigned(item))
            .cloned()
            .collect()
    }

    /// Unassigned records whose searchable text contains `query`, case-insensitively.
    pub fn pool_matching<'r, R>(
        &self,
        records: &'r [R],
        id_of: impl Fn(&R) -> Id,
        query: &str,
    ) -> Vec<&'r R>
    where
        R: Listable,
    {
        let needle = query.trim().to_lowercase();
        records
            .iter()
            .filter(|record| {
                let id = id_of(*record);
                self.universe.contains(&id) && !self.is_assigned(&id)
            })
            .filter(|record| matches_search(*record, &needle))
            .collect()
    }

    /// Every assigned id, bucket by bucket.
    pub fn assigned_ids(&self) -> Vec<Id> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.items.iter().cloned())
            .collect()
    }

    /// Swap in a refreshed universe; assignments of vanished ids are dropped.
    pub fn set_universe(&mut self, ids: Vec<Id>) {
        for bucket in &mut self.buckets {
            bucket.items.retain(|item| ids.contains(item));
        }
        self.universe = ids;
    }

    fn take(&mut self, item: &Id) -> Option<K> {
        for bucket in &mut self.buckets {
            if let Some(position) = bucket.items.iter().position(|existing| existing == item) {
                bucket.items.remove(position);
                return Some(bucket.spec.key);
            }
        }
        None
    }

    fn bucket(&self, key: K) -> Option<&Bucket<K, Id>> {
        self.buckets.iter().find(|bucket| bucket.spec.key == key)
    }

    fn bucket_index(&self, key: K) -> Option<usize> {
        self.buckets.iter().position(|bucket| bucket.spec.key == key)
    }
}

impl<Id: Clone + PartialEq> BucketBoard<Selection, Id> {
    /// Picker where choosing an item replaces the previous choice.
    pub fn single_select(universe: Vec<Id>, label: impl Into<String>) -> Self {
        Self::new(
            universe,
            vec![BucketSpec::new(Selection::Selected, label, Capacity::Single)],
        )
    }

    /// Picker holding up to `max` items.
    pub fn multi_select(universe: Vec<Id>, label: impl Into<String>, max: usize) -> Self {
        Self::new(
            universe,
            vec![BucketSpec::new(
                Selection::Selected,
                label,
                Capacity::AtMost(max),
            )],
        )
    }

    pub fn selected(&self) -> &[Id] {
        self.contents(Selection::Selected)
    }

    /// Toggle selection the way clicking a pool card does.
    pub fn toggle(&mut self, item: Id) -> Result<(), PlacementError> {
        if self.is_assigned(&item) {
            self.unplace(&item);
            return Ok(());
        }
        self.place(item, Selection::Selected).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_view::SortValue;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Zone {
        Primary,
        Secondary,
    }

    fn board() -> BucketBoard<Zone, u32> {
        BucketBoard::new(
            (1..=8).collect(),
            vec![
                BucketSpec::new(Zone::Primary, "Primary", Capacity::AtMost(2)),
                BucketSpec::new(Zone::Secondary, "Secondary", Capacity::AtMost(4)),
            ],
        )
    }

    fn assert_single_membership(board: &BucketBoard<Zone, u32>) {
        for id in board.universe() {
            let holders = board
                .buckets()
                .iter()
                .filter(|bucket| bucket.items().contains(id))
                .count();
            assert!(holders <= 1, "item {id} is in {holders} buckets");
        }
    }

    #[test]
    fn place_moves_between_buckets() {
        let mut board = board();
        assert_eq!(board.place(1, Zone::Primary), Ok(Placement::Added));
        assert_eq!(
            board.place(1, Zone::Secondary),
            Ok(Placement::Moved { from: Zone::Primary })
        );
        assert!(board.contents(Zone::Primary).is_empty());
        assert_eq!(board.contents(Zone::Secondary), &[1]);
        assert_single_membership(&board);
    }

    #[test]
    fn full_bucket_rejects_and_leaves_state_unchanged() {
        let mut board = board();
        board.place(1, Zone::Primary).unwrap();
        board.place(2, Zone::Primary).unwrap();
        board.place(7, Zone::Secondary).unwrap();
        let before = board.clone();

        let err = board.place(7, Zone::Primary).unwrap_err();
        assert_eq!(
            err,
            PlacementError::AtCapacity {
                bucket: "Primary".into(),
                capacity: 2
            }
        );
        assert_eq!(board, before);
        assert_eq!(board.bucket_of(&7), Some(Zone::Secondary));

        assert!(board.place(3, Zone::Primary).is_err());
        assert!(board.pool().contains(&3));
    }

    #[test]
    fn redrop_into_full_bucket_is_not_a_rejection() {
        let mut board = board();
        board.place(1, Zone::Primary).unwrap();
        board.place(2, Zone::Primary).unwrap();
        assert_eq!(board.place(1, Zone::Primary), Ok(Placement::Unchanged));
        assert_eq!(board.contents(Zone::Primary), &[1, 2]);
    }

    #[test]
    fn move_to_end_relocates_redropped_item() {
        let mut board: BucketBoard<Selection, &str> = BucketBoard::new(
            vec!["name", "email", "age"],
            vec![
                BucketSpec::new(Selection::Selected, "Columns", Capacity::Unlimited)
                    .with_redrop(Redrop::MoveToEnd),
            ],
        );
        for field in ["name", "email", "age"] {
            board.place(field, Selection::Selected).unwrap();
        }
        assert_eq!(board.place("name", Selection::Selected), Ok(Placement::MovedToEnd));
        assert_eq!(board.selected(), &["email", "age", "name"]);
    }

    #[test]
    fn single_capacity_replaces_occupant() {
        let mut board = BucketBoard::single_select(vec![10, 20, 30], "Segment");
        board.place(10, Selection::Selected).unwrap();
        assert_eq!(
            board.place(20, Selection::Selected),
            Ok(Placement::Replaced { previous: 10 })
        );
        assert_eq!(board.selected(), &[20]);
        assert_eq!(board.pool(), vec![10, 30]);
    }

    #[test]
    fn unplace_and_remove_return_items_to_pool() {
        let mut board = board();
        board.place(4, Zone::Secondary).unwrap();
        board.place(5, Zone::Secondary).unwrap();
        assert!(!board.remove(&4, Zone::Primary));
        assert!(board.remove(&4, Zone::Secondary));
        assert_eq!(board.unplace(&5), Some(Zone::Secondary));
        assert_eq!(board.unplace(&5), None);
        assert_eq!(board.pool(), (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn unknown_items_and_buckets_are_rejected() {
        let mut board = board();
        assert_eq!(board.place(99, Zone::Primary), Err(PlacementError::UnknownItem));
        let mut single = BucketBoard::<Zone, u32>::new(
            vec![1],
            vec![BucketSpec::new(Zone::Primary, "Primary", Capacity::Unlimited)],
        );
        assert!(matches!(
            single.place(1, Zone::Secondary),
            Err(PlacementError::UnknownBucket(_))
        ));
    }

    #[test]
    fn set_universe_drops_vanished_assignments() {
        let mut board = board();
        board.place(1, Zone::Primary).unwrap();
        board.place(6, Zone::Secondary).unwrap();
        board.set_universe(vec![1, 2, 3]);
        assert_eq!(board.assigned_ids(), vec![1]);
        assert_eq!(board.pool(), vec![2, 3]);
    }

    #[test]
    fn toggle_selects_and_deselects_within_limit() {
        let mut board = BucketBoard::multi_select(vec![1, 2, 3], "Metrics", 2);
        board.toggle(1).unwrap();
        board.toggle(2).unwrap();
        assert!(board.toggle(3).is_err());
        board.toggle(1).unwrap();
        board.toggle(3).unwrap();
        assert_eq!(board.selected(), &[2, 3]);
    }

    struct Card {
        id: u32,
        name: &'static str,
        description: &'static str,
    }

    impl Listable for Card {
        type Filter = ();
        type Sort = ();

        fn search_fields(&self) -> Vec<&str> {
            vec![self.name, self.description]
        }

        fn filter_value(&self, _: ()) -> Option<&str> {
            None
        }

        fn sort_value(&self, _: ()) -> SortValue<'_> {
            SortValue::Missing
        }
    }

    #[test]
    fn pool_search_skips_assigned_items() {
        let cards = vec![
            Card {
                id: 1,
                name: "CVR",
                description: "Conversion rate per referral",
            },
            Card {
                id: 2,
                name: "ARPU",
                description: "Revenue per user",
            },
            Card {
                id: 3,
                name: "Revisit",
                description: "Return visits",
            },
        ];
        let mut board = board();
        board.set_universe(vec![1, 2, 3]);
        board.place(2, Zone::Primary).unwrap();
        let hits: Vec<u32> = board
            .pool_matching(&cards, |card| card.id, "RE")
            .iter()
            .map(|card| card.id)
            .collect();
        assert_eq!(hits, vec![1, 3]);
        assert_eq!(board.pool_matching(&cards, |card| card.id, "").len(), 2);
    }
}
