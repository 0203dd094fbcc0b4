//! Form drafts and their client-side validation.
//!
//! Each draft mirrors the editable fields of one screen. `validate` checks
//! them in the order the screen lists them and produces the JSON payload sent
//! to the API. Failures are plain messages shown in the page banner.

use thiserror::Error;

use crate::traffic::TrafficError;

mod experiment;
mod metric;
mod priority;
mod segment;

pub use experiment::{
    EXPERIMENT_OBJECTIVES, EXPERIMENT_TEAMS, EXPERIMENT_TYPES, ExperimentDraft, ExperimentPayload,
    MetricRole,
};
pub use metric::{
    AGGREGATION_PERIODS, METRIC_CATEGORIES, METRIC_STATUSES, MetricDraft, MetricPayload,
};
pub use priority::{PriorityUpdate, priority_board, priority_updates};
pub use segment::{
    MAX_SEGMENT_METRICS, REFRESH_PERIODS, SEGMENT_CATEGORIES, SegmentDraft, SegmentPayload,
};

/// Client-side validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Select a primary metric")]
    NoPrimaryMetric,
    #[error("Select a target segment")]
    NoTargetSegment,
    #[error("Start and end dates are required")]
    MissingDates,
    #[error("{0} must be a date in YYYY-MM-DD form")]
    InvalidDate(&'static str),
    #[error("The end date must be after the start date")]
    DatesOutOfOrder,
    #[error("At least two variants are required")]
    TooFewVariants,
    #[error("A Control variant is required")]
    MissingControl,
    #[error(transparent)]
    Traffic(#[from] TrafficError),
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn text_of(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
