use serde::Serialize;

use crate::buckets::{BucketBoard, Selection};
use crate::model::{Metric, RecordId, Segment};

use super::{FormError, optional, required, text_of};

pub const SEGMENT_CATEGORIES: [&str; 5] = [
    "Acquisition",
    "Retention",
    "Reactivation",
    "VIP",
    "User Behavior",
];
pub const REFRESH_PERIODS: [&str; 6] = ["Real-time", "1 hour", "6 hours", "12 hours", "Daily", "Weekly"];
/// Denormalized metric slots on a segment.
pub const MAX_SEGMENT_METRICS: usize = 4;

/// Editable segment fields plus the metric picker.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub segment_owner: String,
    pub tags: String,
    pub refresh_period: String,
    pub query: String,
    pub metrics: BucketBoard<Selection, RecordId>,
}

impl Default for SegmentDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: String::new(),
            segment_owner: String::new(),
            tags: String::new(),
            refresh_period: String::new(),
            query: String::new(),
            metrics: metric_slots_board(Vec::new()),
        }
    }
}

/// Body of `POST /api/segments` and `PUT /api/segments/:id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentPayload {
    pub name: String,
    pub description: String,
    pub category: String,
    pub segment_owner: Option<String>,
    pub tags: Option<String>,
    pub refresh_period: Option<String>,
    pub query: Option<String>,
    pub metric1_label: Option<String>,
    pub metric1_value: Option<String>,
    pub metric2_label: Option<String>,
    pub metric2_value: Option<String>,
    pub metric3_label: Option<String>,
    pub metric3_value: Option<String>,
    pub metric4_label: Option<String>,
    pub metric4_value: Option<String>,
}

fn metric_slots_board(universe: Vec<RecordId>) -> BucketBoard<Selection, RecordId> {
    BucketBoard::multi_select(universe, "Segment metrics", MAX_SEGMENT_METRICS)
}

impl SegmentDraft {
    /// Seed the edit form; slot values that are not metric ids are dropped.
    pub fn from_segment(segment: &Segment) -> Self {
        let ids: Vec<RecordId> = segment
            .metric_slots()
            .iter()
            .filter_map(|(_, value)| value.trim().parse().ok())
            .collect();
        let mut metrics = metric_slots_board(ids.clone());
        for id in ids {
            if let Err(err) = metrics.place(id, Selection::Selected) {
                tracing::warn!("Skipping segment metric {id}: {err}");
            }
        }
        Self {
            name: segment.name.clone(),
            description: text_of(&segment.description),
            category: text_of(&segment.category),
            segment_owner: text_of(&segment.segment_owner),
            tags: text_of(&segment.tags),
            refresh_period: text_of(&segment.refresh_period),
            query: text_of(&segment.query),
            metrics,
        }
    }

    /// Refresh the picker universe after the metric list loads.
    pub fn set_metric_universe(&mut self, metrics: &[Metric]) {
        let mut ids: Vec<RecordId> = metrics.iter().map(|metric| metric.id).collect();
        for selected in self.metrics.selected() {
            if !ids.contains(selected) {
                ids.push(*selected);
            }
        }
        self.metrics.set_universe(ids);
    }

    /// Validate and map the picked metrics onto `metric1..4` label/value pairs.
    pub fn validate(&self, metrics: &[Metric]) -> Result<SegmentPayload, FormError> {
        let name = required(&self.name, "Name")?;
        let description = required(&self.description, "Description")?;
        let category = required(&self.category, "Category")?;

        let mut slots: Vec<(Option<String>, Option<String>)> = self
            .metrics
            .selected()
            .iter()
            .take(MAX_SEGMENT_METRICS)
            .map(|id| {
                let label = metrics
                    .iter()
                    .find(|metric| metric.id == *id)
                    .map(|metric| metric.name.clone())
                    .unwrap_or_else(|| id.to_string());
                (Some(label), Some(id.to_string()))
            })
            .collect();
        slots.resize(MAX_SEGMENT_METRICS, (None, None));
        let mut slots = slots.into_iter();
        let mut next = || slots.next().unwrap_or((None, None));
        let (metric1_label, metric1_value) = next();
        let (metric2_label, metric2_value) = next();
        let (metric3_label, metric3_value) = next();
        let (metric4_label, metric4_value) = next();

        Ok(SegmentPayload {
            name,
            description,
            category,
            segment_owner: optional(&self.segment_owner),
            tags: optional(&self.tags),
            refresh_period: optional(&self.refresh_period),
            query: optional(&self.query),
            metric1_label,
            metric1_value,
            metric2_label,
            metric2_value,
            metric3_label,
            metric3_value,
            metric4_label,
            metric4_value,
        })
    }
}
