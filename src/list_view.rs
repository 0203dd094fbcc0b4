//! Client-side list view: search, exact-match filters, stable sort and paging.
//!
//! Every list page holds its fully fetched records in memory and derives the
//! visible rows through [`ListQuery::run`]. Nothing here touches the network.

use std::cmp::Ordering;
use std::fmt::Debug;

/// Default number of rows per page for list pages.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sortable value extracted from a record.
#[derive(Clone, Debug, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl<'a> SortValue<'a> {
    /// Wrap an optional string, treating blank text as missing.
    pub fn text(value: Option<&'a str>) -> Self {
        match value {
            Some(text) if !text.trim().is_empty() => Self::Text(text),
            _ => Self::Missing,
        }
    }

    /// Wrap an optional number.
    pub fn number(value: Option<f64>) -> Self {
        value.map(Self::Number).unwrap_or(Self::Missing)
    }
}

/// Owned sort key so comparisons do not re-lowercase per comparison.
#[derive(Clone, Debug)]
enum SortKey {
    Text(String),
    Number(f64),
    Missing,
}

impl From<SortValue<'_>> for SortKey {
    fn from(value: SortValue<'_>) -> Self {
        match value {
            SortValue::Text(text) => Self::Text(text.to_lowercase()),
            SortValue::Number(number) => Self::Number(number),
            SortValue::Missing => Self::Missing,
        }
    }
}

/// A record that can be shown in a list page.
pub trait Listable {
    /// Exact-match filter keys the record exposes (category, status, ...).
    type Filter: Copy + Eq + Debug;
    /// Sort keys the record exposes.
    type Sort: Copy + Eq + Debug;

    /// Text fields covered by the free-text search.
    fn search_fields(&self) -> Vec<&str>;
    /// Value compared against an exact-match filter.
    fn filter_value(&self, filter: Self::Filter) -> Option<&str>;
    /// Value used when sorting by `key`.
    fn sort_value(&self, key: Self::Sort) -> SortValue<'_>;
}

/// Sort direction toggled from column headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Active sort column and direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec<S> {
    pub key: S,
    pub direction: SortDirection,
}

/// One derived page of a list view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListPage {
    /// Indices into the source records, in display order.
    pub rows: Vec<usize>,
    /// 1-based page number after clamping.
    pub page: usize,
    /// Total page count (0 when nothing matches).
    pub total_pages: usize,
    /// Number of records matching search and filters.
    pub total_matches: usize,
}

impl ListPage {
    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }
}

/// Search, filter, sort and paging state for one list page.
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery<F, S> {
    search: String,
    filters: Vec<(F, String)>,
    sort: Option<SortSpec<S>>,
    page: usize,
    page_size: usize,
}

impl<F: Copy + Eq + Debug, S: Copy + Eq + Debug> ListQuery<F, S> {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            filters: Vec::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sort(&self) -> Option<SortSpec<S>> {
        self.sort
    }

    pub fn filter(&self, key: F) -> Option<&str> {
        self.filters
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Replace the search text and go back to the first page.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.page = 1;
    }

    /// Set or clear (`None` or blank) an exact-match filter and go back to the first page.
    pub fn set_filter(&mut self, key: F, value: Option<String>) {
        self.filters.retain(|(existing, _)| *existing != key);
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            self.filters.push((key, value));
        }
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.search.clear();
        self.page = 1;
    }

    /// Sort by `key`; re-selecting the active key flips the direction.
    pub fn toggle_sort(&mut self, key: S) {
        self.sort = Some(match self.sort {
            Some(active) if active.key == key => SortSpec {
                key,
                direction: active.direction.flipped(),
            },
            _ => SortSpec {
                key,
                direction: SortDirection::Ascending,
            },
        });
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec<S>>) {
        self.sort = sort;
    }

    /// Request a page; it is clamped the next time the query runs.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Indices of records that pass search and filters, in sorted order.
    pub fn matching<R>(&self, records: &[R]) -> Vec<usize>
    where
        R: Listable<Filter = F, Sort = S>,
    {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| matches_search(*record, &needle))
            .filter(|(_, record)| self.matches_filters(*record))
            .map(|(index, _)| index)
            .collect();
        if let Some(sort) = self.sort {
            sort_rows(records, &mut rows, sort);
        }
        rows
    }

    /// Derive the current page, clamping the stored page number into range.
    pub fn run<R>(&mut self, records: &[R]) -> ListPage
    where
        R: Listable<Filter = F, Sort = S>,
    {
        let rows = self.matching(records);
        let total_matches = rows.len();
        let total_pages = page_count(total_matches, self.page_size);
        self.page = self.page.clamp(1, total_pages.max(1));
        let start = (self.page - 1) * self.page_size;
        let rows = rows
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();
        ListPage {
            rows,
            page: self.page,
            total_pages,
            total_matches,
        }
    }

    fn matches_filters<R>(&self, record: &R) -> bool
    where
        R: Listable<Filter = F, Sort = S>,
    {
        self.filters
            .iter()
            .all(|(key, expected)| record.filter_value(*key) == Some(expected.as_str()))
    }
}

/// Case-insensitive substring test over a record's searchable fields.
pub fn matches_search<R: Listable>(record: &R, needle_lowercase: &str) -> bool {
    if needle_lowercase.is_empty() {
        return true;
    }
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle_lowercase))
}

fn sort_rows<R: Listable>(records: &[R], rows: &mut [usize], sort: SortSpec<R::Sort>) {
    let keys: Vec<SortKey> = rows
        .iter()
        .map(|&index| SortKey::from(records[index].sort_value(sort.key)))
        .collect();
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| {
        compare_keys(&keys[a], &keys[b], sort.direction).then_with(|| rows[a].cmp(&rows[b]))
    });
    let sorted: Vec<usize> = order.into_iter().map(|position| rows[position]).collect();
    rows.copy_from_slice(&sorted);
}

fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    let directed = |ordering: Ordering| match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    };
    match (a, b) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        (SortKey::Missing, _) => Ordering::Greater,
        (_, SortKey::Missing) => Ordering::Less,
        (SortKey::Number(a), SortKey::Number(b)) => directed(a.total_cmp(b)),
        (SortKey::Text(a), SortKey::Text(b)) => directed(a.cmp(b)),
        (SortKey::Number(_), SortKey::Text(_)) => directed(Ordering::Less),
        (SortKey::Text(_), SortKey::Number(_)) => directed(Ordering::Greater),
    }
}

/// Number of pages needed for `count` items.
pub fn page_count(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Split items into pages of `page_size`.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    items.chunks(page_size.max(1)).collect()
}

/// Entry in the pagination bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// Pages shown in the pagination bar: first, last, current ±1, gaps at ±2.
pub fn page_window(current: usize, total: usize) -> Vec<PageLink> {
    let mut links = Vec::new();
    for page in 1..=total {
        let near_current = page + 1 >= current && page <= current + 1;
        if page == 1 || page == total || near_current {
            links.push(PageLink::Page(page));
        } else if page + 2 == current || page == current + 2 {
            links.push(PageLink::Gap);
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Row {
        name: &'static str,
        note: Option<&'static str>,
        kind: &'static str,
        score: Option<f64>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum RowFilter {
        Kind,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum RowSort {
        Name,
        Score,
    }

    impl Listable for Row {
        type Filter = RowFilter;
        type Sort = RowSort;

        fn search_fields(&self) -> Vec<&str> {
            let mut fields = vec![self.name];
            fields.extend(self.note);
            fields
        }

        fn filter_value(&self, filter: RowFilter) -> Option<&str> {
            match filter {
                RowFilter::Kind => Some(self.kind),
            }
        }

        fn sort_value(&self, key: RowSort) -> SortValue<'_> {
            match key {
                RowSort::Name => SortValue::Text(self.name),
                RowSort::Score => SortValue::number(self.score),
            }
        }
    }

    fn row(name: &'static str, kind: &'static str, score: Option<f64>) -> Row {
        Row {
            name,
            note: None,
            kind,
            score,
        }
    }

    fn sample() -> Vec<Row> {
        vec![
            row("Revenue", "finance", Some(3.0)),
            row("CVR", "growth", Some(1.0)),
            Row {
                note: Some("Daily active users"),
                ..row("DAU", "growth", None)
            },
            row("ARPU", "finance", Some(1.0)),
            row("Churn", "retention", Some(2.0)),
        ]
    }

    fn names(rows: &[Row], indices: &[usize]) -> Vec<&'static str> {
        indices.iter().map(|&index| rows[index].name).collect()
    }

    #[test]
    fn empty_search_keeps_everything_in_order() {
        let rows = sample();
        let query: ListQuery<RowFilter, RowSort> = ListQuery::new(10);
        assert_eq!(query.matching(&rows), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn search_is_case_insensitive_over_all_fields() {
        let rows = sample();
        let mut query: ListQuery<RowFilter, RowSort> = ListQuery::new(10);
        query.set_search("ACTIVE");
        assert_eq!(names(&rows, &query.matching(&rows)), vec!["DAU"]);
        query.set_search("r");
        for index in query.matching(&rows) {
            let haystack = rows[index]
                .search_fields()
                .join(" ")
                .to_lowercase();
            assert!(haystack.contains('r'));
        }
    }

    #[test]
    fn filters_match_exactly() {
        let rows = sample();
        let mut query: ListQuery<RowFilter, RowSort> = ListQuery::new(10);
        query.set_filter(RowFilter::Kind, Some("growth".into()));
        assert_eq!(names(&rows, &query.matching(&rows)), vec!["CVR", "DAU"]);
        query.set_filter(RowFilter::Kind, Some("grow".into()));
        assert!(query.matching(&rows).is_empty());
        query.set_filter(RowFilter::Kind, None);
        assert_eq!(query.matching(&rows).len(), rows.len());
    }

    #[test]
    fn sort_is_stable_and_missing_values_trail() {
        let rows = sample();
        let mut query: ListQuery<RowFilter, RowSort> = ListQuery::new(10);
        query.toggle_sort(RowSort::Score);
        assert_eq!(
            names(&rows, &query.matching(&rows)),
            vec!["CVR", "ARPU", "Churn", "Revenue", "DAU"]
        );
        query.toggle_sort(RowSort::Score);
        assert_eq!(
            query.sort().map(|sort| sort.direction),
            Some(SortDirection::Descending)
        );
        assert_eq!(
            names(&rows, &query.matching(&rows)),
            vec!["Revenue", "Churn", "CVR", "ARPU", "DAU"]
        );
    }

    #[test]
    fn text_sort_ignores_case() {
        let rows = vec![row("beta", "x", None), row("Alpha", "x", None), row("gamma", "x", None)];
        let mut query: ListQuery<RowFilter, RowSort> = ListQuery::new(10);
        query.toggle_sort(RowSort::Name);
        assert_eq!(names(&rows, &query.matching(&rows)), vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn search_resets_page_and_run_clamps() {
        let rows: Vec<Row> = (0..25).map(|_| row("Metric", "x", None)).collect();
        let mut query: ListQuery<RowFilter, RowSort> = ListQuery::new(10);
        query.set_page(3);
        let page = query.run(&rows);
        assert_eq!((page.page, page.total_pages, page.rows.len()), (3, 3, 5));

        query.set_page(9);
        assert_eq!(query.run(&rows).page, 3);

        query.set_search("metric");
        assert_eq!(query.page(), 1);

        query.set_search("zzz");
        let page = query.run(&rows);
        assert!(page.is_empty());
        assert_eq!((page.page, page.total_pages), (1, 0));
    }

    #[test]
    fn empty_records_with_search_yield_empty_page() {
        let rows: Vec<Row> = Vec::new();
        let mut query: ListQuery<RowFilter, RowSort> = ListQuery::new(10);
        query.set_search("abc");
        let page = query.run(&rows);
        assert!(page.is_empty());
        assert!(page.rows.is_empty());
    }

    #[test]
    fn pages_concatenate_back_to_the_input() {
        for len in [0usize, 1, 9, 10, 11, 37] {
            let items: Vec<usize> = (0..len).collect();
            for size in [1usize, 3, 10] {
                let pages = paginate(&items, size);
                assert_eq!(pages.len(), page_count(len, size));
                let flat: Vec<usize> = pages.concat();
                assert_eq!(flat, items);
            }
        }
    }

    #[test]
    fn page_window_shows_edges_and_neighbours() {
        use PageLink::{Gap, Page};
        assert_eq!(page_window(1, 1), vec![Page(1)]);
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Gap, Page(4), Page(5), Page(6), Gap, Page(10)]
        );
        assert_eq!(page_window(1, 4), vec![Page(1), Page(2), Gap, Page(4)]);
        assert!(page_window(1, 0).is_empty());
    }
}
