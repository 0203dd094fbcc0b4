use serde::Serialize;

use crate::buckets::{BucketBoard, BucketSpec, Capacity};
use crate::model::{Metric, Priority, RecordId};

/// One `PUT /api/metrics/:id` body produced by the priority board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriorityUpdate {
    #[serde(skip)]
    pub id: RecordId,
    pub priority: Option<Priority>,
}

/// P0/P1/P2 board seeded from each metric's current priority.
pub fn priority_board(metrics: &[Metric]) -> BucketBoard<Priority, RecordId> {
    let mut board = BucketBoard::new(
        metrics.iter().map(|metric| metric.id).collect(),
        Priority::ALL
            .iter()
            .map(|priority| BucketSpec::new(*priority, priority.as_str(), Capacity::Unlimited))
            .collect(),
    );
    for metric in metrics {
        if let Some(priority) = metric.priority {
            if let Err(err) = board.place(metric.id, priority) {
                tracing::warn!("Skipping priority seed for metric {}: {err}", metric.id);
            }
        }
    }
    board
}

/// Updates to send when saving the board: every assigned metric gets its
/// bucket, and metrics that left the board are cleared.
pub fn priority_updates(
    board: &BucketBoard<Priority, RecordId>,
    metrics: &[Metric],
) -> Vec<PriorityUpdate> {
    let mut updates: Vec<PriorityUpdate> = board
        .buckets()
        .iter()
        .flat_map(|bucket| {
            bucket.items().iter().map(|id| PriorityUpdate {
                id: *id,
                priority: Some(bucket.spec.key),
            })
        })
        .collect();
    updates.extend(
        metrics
            .iter()
            .filter(|metric| metric.priority.is_some() && !board.is_assigned(&metric.id))
            .map(|metric| PriorityUpdate {
                id: metric.id,
                priority: None,
            }),
    );
    updates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(id: RecordId, priority: Option<&str>) -> Metric {
        let priority = priority.map(|p| format!("\"{p}\"")).unwrap_or("null".into());
        serde_json::from_str(&format!(
            r#"{{"id": {id}, "name": "m{id}", "priority": {priority}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn board_is_seeded_from_current_priorities() {
        let metrics = vec![metric(1, Some("P0")), metric(2, None), metric(3, Some("P2"))];
        let board = priority_board(&metrics);
        assert_eq!(board.contents(Priority::P0), &[1]);
        assert_eq!(board.contents(Priority::P2), &[3]);
        assert_eq!(board.pool(), vec![2]);
    }

    #[test]
    fn updates_cover_assigned_and_cleared_metrics() {
        let metrics = vec![
            metric(1, Some("P0")),
            metric(2, None),
            metric(3, Some("P2")),
            metric(4, None),
        ];
        let mut board = priority_board(&metrics);
        board.place(2, Priority::P1).unwrap();
        board.unplace(&3);

        let updates = priority_updates(&board, &metrics);
        assert_eq!(
            updates,
            vec![
                PriorityUpdate {
                    id: 1,
                    priority: Some(Priority::P0)
                },
                PriorityUpdate {
                    id: 2,
                    priority: Some(Priority::P1)
                },
                PriorityUpdate {
                    id: 3,
                    priority: None
                },
            ]
        );
        let body = serde_json::to_value(&updates[2]).unwrap();
        assert_eq!(body, serde_json::json!({"priority": null}));
    }
}
