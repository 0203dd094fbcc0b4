//! Records exchanged with the DATAHUB REST API.
//!
//! Identity is always server-assigned. Optional fields default when the
//! backend omits them so older servers still decode.

use serde::{Deserialize, Deserializer, Serialize};

mod experiment;
mod insight;
mod metric;
mod segment;

pub use experiment::{
    DecodeError, Experiment, ExperimentFilter, ExperimentResults, ExperimentSort,
    ExperimentStatus, SegmentResult, Variant,
};
pub use insight::{Insight, InsightFilter, InsightSort, NewInsight};
pub use metric::{Metric, MetricFilter, MetricSort, MetricStats, Priority, TimeseriesPoint};
pub use segment::{Segment, SegmentFilter, SegmentSort, SegmentStats};

/// Server-assigned identifier shared by every record type.
pub type RecordId = i64;

/// A list response: `{total, items}`, or a bare JSON array from older endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordList<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self {
            total: 0,
            items: Vec::new(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RecordList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire<T> {
            Paged {
                #[serde(default)]
                total: Option<usize>,
                items: Vec<T>,
            },
            Bare(Vec<T>),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Paged { total, items } => Self {
                total: total.unwrap_or(items.len()),
                items,
            },
            Wire::Bare(items) => Self {
                total: items.len(),
                items,
            },
        })
    }
}

/// Treat `""` like a missing string; forms send blanks for untouched selects.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}
