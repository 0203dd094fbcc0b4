use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::format::parse_date;
use crate::list_view::{Listable, SortValue};

use super::{RecordId, blank_as_none};

/// Lifecycle state of an experiment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentStatus {
    #[default]
    Draft,
    Ready,
    Running,
    Analyzing,
    Complete,
    /// Any status string this console does not know yet.
    #[serde(other)]
    Unknown,
}

impl ExperimentStatus {
    pub const KNOWN: [ExperimentStatus; 5] = [
        ExperimentStatus::Draft,
        ExperimentStatus::Ready,
        ExperimentStatus::Running,
        ExperimentStatus::Analyzing,
        ExperimentStatus::Complete,
    ];

    /// Whether results exist to write an insight from.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Analyzing | Self::Complete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Analyzing => "analyzing",
            Self::Complete => "complete",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Analyzing => "Analyzing",
            Self::Complete => "Complete",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One arm of an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "whole_percent")]
    pub traffic_allocation: u32,
}

impl Variant {
    pub fn new(name: impl Into<String>, traffic_allocation: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            traffic_allocation,
        }
    }
}

/// Accept `50`, `50.0` or `"50"`; fractional or negative values are rejected.
fn whole_percent<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if (0.0..=100.0).contains(&n) && n.fract() == 0.0 => Ok(n as u32),
        _ => Err(D::Error::custom(format!(
            "traffic_allocation must be a whole percentage between 0 and 100, got {value}"
        ))),
    }
}

/// Failure decoding one of the JSON-encoded experiment fields.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid {field}: {source}")]
    Json {
        field: &'static str,
        source: serde_json::Error,
    },
    #[error("Invalid {field}: {value} is not a record id")]
    Id { field: &'static str, value: String },
}

/// Measured outcome of a finished experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResults {
    pub metric: String,
    pub baseline_value: f64,
    pub treatment_value: f64,
    #[serde(default)]
    pub baseline_sample_size: Option<u64>,
    #[serde(default)]
    pub treatment_sample_size: Option<u64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub p_value: Option<f64>,
    #[serde(default)]
    pub segments: Vec<SegmentResult>,
}

impl ExperimentResults {
    /// Relative change of treatment over baseline, in percent.
    pub fn lift_percent(&self) -> Option<f64> {
        lift(self.baseline_value, self.treatment_value)
    }
}

/// Per-segment breakdown row of [`ExperimentResults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    pub name: String,
    pub baseline: f64,
    pub result: f64,
}

impl SegmentResult {
    pub fn lift_percent(&self) -> Option<f64> {
        lift(self.baseline, self.result)
    }
}

fn lift(baseline: f64, treatment: f64) -> Option<f64> {
    (baseline != 0.0).then(|| (treatment - baseline) / baseline * 100.0)
}

/// An A/B/n test definition.
///
/// `variants` and the metric id arrays travel as JSON-encoded strings; use the
/// `decode_*` helpers to read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub experiment_type: Option<String>,
    #[serde(default)]
    pub status: ExperimentStatus,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub hypothesis: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub variants: Option<String>,
    #[serde(default)]
    pub primary_metric_ids: Option<String>,
    /// Single primary metric sent by older backends.
    #[serde(default)]
    pub primary_metric_id: Option<RecordId>,
    #[serde(default)]
    pub secondary_metric_ids: Option<String>,
    #[serde(default)]
    pub guardrail_metric_ids: Option<String>,
    #[serde(default, alias = "statistical_significance")]
    pub significance_level: Option<f64>,
    #[serde(default)]
    pub statistical_power: Option<f64>,
    #[serde(default)]
    pub minimum_detectable_effect: Option<f64>,
    #[serde(default)]
    pub sample_size: Option<u64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub target_segment_id: Option<RecordId>,
    #[serde(default)]
    pub ice_impact: Option<u32>,
    #[serde(default)]
    pub ice_confidence: Option<u32>,
    #[serde(default)]
    pub ice_ease: Option<u32>,
    #[serde(default)]
    pub conditions: Option<String>,
    #[serde(default)]
    pub confounding_factors: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub days_left: Option<i64>,
    #[serde(default)]
    pub results: Option<ExperimentResults>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Experiment {
    pub fn decode_variants(&self) -> Result<Vec<Variant>, DecodeError> {
        match non_blank(&self.variants) {
            Some(text) => serde_json::from_str(text).map_err(|source| DecodeError::Json {
                field: "variants",
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Primary metric ids, falling back to the single legacy `primary_metric_id`.
    pub fn decode_primary_metrics(&self) -> Result<Vec<RecordId>, DecodeError> {
        let ids = decode_ids("primary_metric_ids", &self.primary_metric_ids)?;
        if ids.is_empty() {
            return Ok(self.primary_metric_id.into_iter().collect());
        }
        Ok(ids)
    }

    pub fn decode_secondary_metrics(&self) -> Result<Vec<RecordId>, DecodeError> {
        decode_ids("secondary_metric_ids", &self.secondary_metric_ids)
    }

    pub fn decode_guardrail_metrics(&self) -> Result<Vec<RecordId>, DecodeError> {
        decode_ids("guardrail_metric_ids", &self.guardrail_metric_ids)
    }

    /// Whole days between start and end; `None` unless end is after start.
    pub fn duration_days(&self) -> Option<i64> {
        let start = parse_date(self.start_date.as_deref()?)?;
        let end = parse_date(self.end_date.as_deref()?)?;
        let days = (end - start).whole_days();
        (days > 0).then_some(days)
    }

    /// Impact + confidence + ease, when all three are scored.
    pub fn ice_total(&self) -> Option<u32> {
        self.ice_impact?
            .checked_add(self.ice_confidence?)?
            .checked_add(self.ice_ease?)
    }

    /// `start ~ end` as shown on cards.
    pub fn period_label(&self) -> String {
        format!(
            "{} ~ {}",
            self.start_date.as_deref().unwrap_or("-"),
            self.end_date.as_deref().unwrap_or("-")
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|text| !text.is_empty() && *text != "null")
}

/// Id arrays are written both as numbers and as numeric strings.
fn decode_ids(field: &'static str, value: &Option<String>) -> Result<Vec<RecordId>, DecodeError> {
    let Some(text) = non_blank(value) else {
        return Ok(Vec::new());
    };
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(text).map_err(|source| DecodeError::Json { field, source })?;
    raw.into_iter()
        .map(|entry| {
            let parsed = match &entry {
                serde_json::Value::Number(number) => number.as_i64(),
                serde_json::Value::String(text) => text.trim().parse().ok(),
                _ => None,
            };
            parsed.ok_or_else(|| DecodeError::Id {
                field,
                value: entry.to_string(),
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExperimentFilter {
    Status,
    Team,
    Type,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExperimentSort {
    Name,
    Status,
    Owner,
    StartDate,
    EndDate,
    Progress,
}

impl Listable for Experiment {
    type Filter = ExperimentFilter;
    type Sort = ExperimentSort;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.owner.as_deref());
        fields.extend(self.hypothesis.as_deref());
        fields
    }

    fn filter_value(&self, filter: ExperimentFilter) -> Option<&str> {
        match filter {
            ExperimentFilter::Status => Some(self.status.as_str()),
            ExperimentFilter::Team => self.team.as_deref(),
            ExperimentFilter::Type => self.experiment_type.as_deref(),
        }
    }

    fn sort_value(&self, key: ExperimentSort) -> SortValue<'_> {
        match key {
            ExperimentSort::Name => SortValue::Text(&self.name),
            ExperimentSort::Status => SortValue::Text(self.status.as_str()),
            ExperimentSort::Owner => SortValue::text(self.owner.as_deref()),
            ExperimentSort::StartDate => SortValue::text(self.start_date.as_deref()),
            ExperimentSort::EndDate => SortValue::text(self.end_date.as_deref()),
            ExperimentSort::Progress => SortValue::number(self.progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experiment(json: &str) -> Experiment {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn unknown_status_is_kept_as_unknown() {
        let exp = experiment(r#"{"id": 1, "name": "A", "status": "paused"}"#);
        assert_eq!(exp.status, ExperimentStatus::Unknown);
        let exp = experiment(r#"{"id": 1, "name": "A"}"#);
        assert_eq!(exp.status, ExperimentStatus::Draft);
    }

    #[test]
    fn decodes_encoded_variants_and_ids() {
        let exp = experiment(
            r#"{
                "id": 5,
                "name": "Coupon",
                "variants": "[{\"name\":\"Control\",\"description\":\"\",\"traffic_allocation\":50},{\"name\":\"Variant A\",\"traffic_allocation\":\"50\"}]",
                "primary_metric_ids": "[3]",
                "secondary_metric_ids": "[\"1\", \"2\"]",
                "guardrail_metric_ids": null
            }"#,
        );
        let variants = exp.decode_variants().unwrap();
        assert_eq!(variants, vec![Variant::new("Control", 50), Variant::new("Variant A", 50)]);
        assert_eq!(exp.decode_primary_metrics().unwrap(), vec![3]);
        assert_eq!(exp.decode_secondary_metrics().unwrap(), vec![1, 2]);
        assert!(exp.decode_guardrail_metrics().unwrap().is_empty());
    }

    #[test]
    fn legacy_primary_metric_id_is_used_when_array_missing() {
        let exp = experiment(r#"{"id": 5, "name": "X", "primary_metric_id": 11}"#);
        assert_eq!(exp.decode_primary_metrics().unwrap(), vec![11]);
    }

    #[test]
    fn malformed_encoded_fields_return_errors() {
        let exp = experiment(
            r#"{"id": 5, "name": "X", "variants": "[{oops", "secondary_metric_ids": "[\"abc\"]"}"#,
        );
        assert!(matches!(
            exp.decode_variants(),
            Err(DecodeError::Json { field: "variants", .. })
        ));
        assert!(matches!(
            exp.decode_secondary_metrics(),
            Err(DecodeError::Id { field: "secondary_metric_ids", .. })
        ));
    }

    #[test]
    fn fractional_allocation_is_rejected() {
        let result: Result<Variant, _> =
            serde_json::from_str(r#"{"name": "B", "traffic_allocation": 33.3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn allocation_above_full_traffic_is_rejected() {
        let result: Result<Vec<Variant>, _> = serde_json::from_str(
            r#"[{"name": "Control", "traffic_allocation": 4294967295},
                {"name": "Variant A", "traffic_allocation": 1}]"#,
        );
        assert!(result.is_err());
        let full: Variant =
            serde_json::from_str(r#"{"name": "Control", "traffic_allocation": "100"}"#).unwrap();
        assert_eq!(full.traffic_allocation, 100);
    }

    #[test]
    fn oversized_ice_scores_yield_no_total() {
        let exp = experiment(
            r#"{"id": 1, "name": "A", "ice_impact": 4294967295, "ice_confidence": 1, "ice_ease": 1}"#,
        );
        assert_eq!(exp.ice_total(), None);
    }

    #[test]
    fn duration_and_ice_are_derived() {
        let exp = experiment(
            r#"{"id": 1, "name": "A", "start_date": "2024-10-01", "end_date": "2024-11-30",
                "ice_impact": 8, "ice_confidence": 7, "ice_ease": 5}"#,
        );
        assert_eq!(exp.duration_days(), Some(60));
        assert_eq!(exp.ice_total(), Some(20));

        let reversed = experiment(
            r#"{"id": 1, "name": "A", "start_date": "2024-11-30", "end_date": "2024-10-01"}"#,
        );
        assert_eq!(reversed.duration_days(), None);
    }

    #[test]
    fn results_lift_uses_baseline() {
        let results = ExperimentResults {
            metric: "CVR".into(),
            baseline_value: 10.0,
            treatment_value: 12.5,
            baseline_sample_size: None,
            treatment_sample_size: None,
            confidence: Some(99.0),
            p_value: Some(0.01),
            segments: vec![SegmentResult {
                name: "All".into(),
                baseline: 0.0,
                result: 1.0,
            }],
        };
        assert_eq!(results.lift_percent(), Some(25.0));
        assert_eq!(results.segments[0].lift_percent(), None);
    }
}
