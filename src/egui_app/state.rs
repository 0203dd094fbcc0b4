//! View state owned by the controller and read by the renderer.

mod experiments;
mod insights;
mod lists;
mod metrics;
mod segments;
mod status;

pub use experiments::{ExperimentsState, MetricRoleModal};
pub use insights::{InsightsState, WizardPage};
pub use lists::{DetailState, FormState, ListState, PickerModal};
pub use metrics::{MetricsState, PriorityModal};
pub use segments::SegmentsState;
pub use status::StatusBarState;

use std::path::PathBuf;

use crate::buckets::{BucketBoard, Selection};
use crate::model::RecordId;
use crate::routes::{History, Route};

/// Record family a destructive action applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Metric,
    Segment,
    Experiment,
}

impl RecordKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Segment => "segment",
            Self::Experiment => "experiment",
        }
    }
}

/// Pending "are you sure" prompt for a delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmDelete {
    pub kind: RecordKind,
    pub id: RecordId,
    pub name: String,
}

/// Which loaded list a CSV export reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportTarget {
    Metrics,
    Segments,
}

impl ExportTarget {
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Metrics => "metrics",
            Self::Segments => "segments",
        }
    }
}

/// CSV column picker; the selected bucket order is the column order.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportModal {
    pub target: ExportTarget,
    pub columns: BucketBoard<Selection, &'static str>,
    pub error: Option<String>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug)]
pub struct UiState {
    pub history: History,
    pub status: StatusBarState,
    pub metrics: MetricsState,
    pub segments: SegmentsState,
    pub experiments: ExperimentsState,
    pub insights: InsightsState,
    pub confirm_delete: Option<ConfirmDelete>,
    pub export: Option<ExportModal>,
    pub last_export: Option<PathBuf>,
}

impl UiState {
    pub fn new(start: Route, page_size: usize) -> Self {
        Self {
            history: History::new(start),
            status: StatusBarState::idle(),
            metrics: MetricsState::new(page_size),
            segments: SegmentsState::new(page_size),
            experiments: ExperimentsState::new(page_size),
            insights: InsightsState::new(page_size),
            confirm_delete: None,
            export: None,
            last_export: None,
        }
    }

    pub fn route(&self) -> &Route {
        self.history.current()
    }
}
