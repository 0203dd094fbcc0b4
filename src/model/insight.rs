use serde::{Deserialize, Serialize};

use crate::list_view::{Listable, SortValue};

use super::{RecordId, blank_as_none};

/// A written summary of an experiment's outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: RecordId,
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "blank_as_none")]
    pub insight_type: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub findings: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(default)]
    pub impact_score: Option<u8>,
    #[serde(default)]
    pub experiment_id: Option<RecordId>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Insight {
    /// Category segment used in `/insights/:category/:id` routes.
    pub fn route_category(&self) -> &str {
        self.category.as_deref().unwrap_or("general")
    }
}

/// Payload for `POST /api/insights`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInsight {
    pub title: String,
    pub category: String,
    #[serde(rename = "type")]
    pub insight_type: String,
    pub summary: String,
    pub findings: String,
    pub recommendations: String,
    pub impact_score: u8,
    pub attach_charts: bool,
    pub experiment_id: Option<RecordId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsightFilter {
    Category,
    Type,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsightSort {
    Title,
    Impact,
    CreatedAt,
}

impl Listable for Insight {
    type Filter = InsightFilter;
    type Sort = InsightSort;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.summary.as_deref());
        fields.extend(self.findings.as_deref());
        fields
    }

    fn filter_value(&self, filter: InsightFilter) -> Option<&str> {
        match filter {
            InsightFilter::Category => self.category.as_deref(),
            InsightFilter::Type => self.insight_type.as_deref(),
        }
    }

    fn sort_value(&self, key: InsightSort) -> SortValue<'_> {
        match key {
            InsightSort::Title => SortValue::Text(&self.title),
            InsightSort::Impact => SortValue::number(self.impact_score.map(f64::from)),
            InsightSort::CreatedAt => SortValue::text(self.created_at.as_deref()),
        }
    }
}
