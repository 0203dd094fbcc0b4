use crate::api::TimeRange;
use crate::buckets::BucketBoard;
use crate::forms::MetricDraft;
use crate::model::{Metric, MetricStats, Priority, RecordId, TimeseriesPoint};

use super::{DetailState, FormState, ListState};

/// Drag board for bulk priority changes.
#[derive(Clone, Debug, PartialEq)]
pub struct PriorityModal {
    pub board: BucketBoard<Priority, RecordId>,
    pub search: String,
    pub saving: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct MetricsState {
    pub list: ListState<Metric>,
    pub stats: Option<MetricStats>,
    pub detail: DetailState<Metric>,
    pub time_range: TimeRange,
    pub timeseries: Vec<TimeseriesPoint>,
    pub timeseries_error: Option<String>,
    pub form: FormState<MetricDraft>,
    pub priority: Option<PriorityModal>,
}

impl MetricsState {
    pub fn new(page_size: usize) -> Self {
        Self {
            list: ListState::new(page_size),
            stats: None,
            detail: DetailState::default(),
            time_range: TimeRange::default(),
            timeseries: Vec::new(),
            timeseries_error: None,
            form: FormState::default(),
            priority: None,
        }
    }

    pub fn find(&self, id: RecordId) -> Option<&Metric> {
        self.list.records.iter().find(|metric| metric.id == id)
    }
}
