use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::list_view::{Listable, SortValue};

use super::{RecordId, blank_as_none};

/// Business priority tier of a metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::P0, Priority::P1, Priority::P2];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "P0" | "p0" => Some(Self::P0),
            "P1" | "p1" => Some(Self::P1),
            "P2" | "p2" => Some(Self::P2),
            _ => None,
        }
    }

    /// Short description shown next to the tier in the priority board.
    pub fn description(self) -> &'static str {
        match self {
            Self::P0 => "Critical business metric",
            Self::P1 => "Important operating metric",
            Self::P2 => "Reference metric",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown or blank priority strings decode as "no priority".
fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(Priority::parse))
}

/// A named, owned quantitative indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub calculation_logic: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub aggregation_period: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub metric_owner: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Metric {
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Headline counters for the metrics page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub inactive: u64,
    #[serde(default)]
    pub warning: u64,
}

/// One point of a metric's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    pub timestamp: String,
    pub value: f64,
    #[serde(default)]
    pub visitor_count: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricFilter {
    Category,
    Status,
    Priority,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricSort {
    Name,
    Category,
    Priority,
    Status,
    Value,
    UpdatedAt,
}

impl Listable for Metric {
    type Filter = MetricFilter;
    type Sort = MetricSort;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn filter_value(&self, filter: MetricFilter) -> Option<&str> {
        match filter {
            MetricFilter::Category => self.category.as_deref(),
            MetricFilter::Status => self.status.as_deref(),
            MetricFilter::Priority => self.priority.map(Priority::as_str),
        }
    }

    fn sort_value(&self, key: MetricSort) -> SortValue<'_> {
        match key {
            MetricSort::Name => SortValue::Text(&self.name),
            MetricSort::Category => SortValue::text(self.category.as_deref()),
            MetricSort::Priority => SortValue::text(self.priority.map(Priority::as_str)),
            MetricSort::Status => SortValue::text(self.status.as_deref()),
            MetricSort::Value => SortValue::number(self.value),
            MetricSort::UpdatedAt => SortValue::text(self.updated_at.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sparse_metric_and_ignores_bad_priority() {
        let metric: Metric = serde_json::from_str(
            r#"{"id": 3, "name": "CVR", "priority": "", "category": "", "value": 12.5}"#,
        )
        .unwrap();
        assert_eq!(metric.priority, None);
        assert_eq!(metric.category, None);
        assert_eq!(metric.value, Some(12.5));

        let metric: Metric =
            serde_json::from_str(r#"{"id": 4, "name": "DAU", "priority": "P1"}"#).unwrap();
        assert_eq!(metric.priority, Some(Priority::P1));
    }

    #[test]
    fn priority_serializes_as_tier_name() {
        assert_eq!(serde_json::to_string(&Priority::P2).unwrap(), "\"P2\"");
        assert_eq!(Priority::parse("p0"), Some(Priority::P0));
        assert_eq!(Priority::parse("P9"), None);
    }
}
