use serde::{Deserialize, Serialize};

use crate::list_view::{Listable, SortValue};

use super::{RecordId, blank_as_none};

/// A named, query-defined subset of end users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub customer_count: Option<i64>,
    #[serde(default)]
    pub refresh_period: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub segment_owner: Option<String>,
    #[serde(default)]
    pub metric1_label: Option<String>,
    #[serde(default)]
    pub metric1_value: Option<String>,
    #[serde(default)]
    pub metric2_label: Option<String>,
    #[serde(default)]
    pub metric2_value: Option<String>,
    #[serde(default)]
    pub metric3_label: Option<String>,
    #[serde(default)]
    pub metric3_value: Option<String>,
    #[serde(default)]
    pub metric4_label: Option<String>,
    #[serde(default)]
    pub metric4_value: Option<String>,
    #[serde(default)]
    pub last_touch_channel: Option<String>,
    #[serde(default)]
    pub last_touch_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Segment {
    /// Populated `(label, value)` metric references in slot order.
    pub fn metric_slots(&self) -> Vec<(&str, &str)> {
        [
            (&self.metric1_label, &self.metric1_value),
            (&self.metric2_label, &self.metric2_value),
            (&self.metric3_label, &self.metric3_value),
            (&self.metric4_label, &self.metric4_value),
        ]
        .into_iter()
        .filter_map(|(label, value)| match (label.as_deref(), value.as_deref()) {
            (Some(label), Some(value)) if !label.is_empty() => Some((label, value)),
            (Some(label), None) if !label.is_empty() => Some((label, "")),
            _ => None,
        })
        .collect()
    }

    /// Tags split on commas, trimmed, blanks dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// Headline counters for the segments page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    #[serde(default)]
    pub total_segments: u64,
    #[serde(default)]
    pub total_customers: u64,
    #[serde(default)]
    pub active_customers: u64,
    #[serde(default)]
    pub at_risk_customers: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentFilter {
    Category,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentSort {
    Name,
    Category,
    CustomerCount,
    LastTouch,
}

impl Listable for Segment {
    type Filter = SegmentFilter;
    type Sort = SegmentSort;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.tags.as_deref());
        fields
    }

    fn filter_value(&self, filter: SegmentFilter) -> Option<&str> {
        match filter {
            SegmentFilter::Category => self.category.as_deref(),
        }
    }

    fn sort_value(&self, key: SegmentSort) -> SortValue<'_> {
        match key {
            SegmentSort::Name => SortValue::Text(&self.name),
            SegmentSort::Category => SortValue::text(self.category.as_deref()),
            SegmentSort::CustomerCount => {
                SortValue::number(self.customer_count.map(|count| count as f64))
            }
            SegmentSort::LastTouch => SortValue::text(self.last_touch_date.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_slots_skip_empty_labels() {
        let segment: Segment = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "VIP",
                "metric1_label": "CVR", "metric1_value": "7",
                "metric2_label": "", "metric2_value": "8",
                "metric3_label": "ARPU", "metric3_value": "9"
            }"#,
        )
        .unwrap();
        assert_eq!(segment.metric_slots(), vec![("CVR", "7"), ("ARPU", "9")]);
    }

    #[test]
    fn tags_split_on_commas() {
        let segment: Segment =
            serde_json::from_str(r#"{"id": 2, "name": "New", "tags": "web, mobile,,  app "}"#)
                .unwrap();
        assert_eq!(segment.tag_list(), vec!["web", "mobile", "app"]);
    }
}
