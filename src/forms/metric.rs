use serde::Serialize;

use crate::model::{Metric, Priority};

use super::{FormError, optional, required, text_of};

pub const METRIC_CATEGORIES: [&str; 8] = [
    "Engagement",
    "Revenue",
    "Retention",
    "Acquisition",
    "Product",
    "Performance",
    "Marketing",
    "Operations",
];
pub const METRIC_STATUSES: [&str; 4] = ["Active", "Inactive", "Warning", "Pending"];
pub const AGGREGATION_PERIODS: [&str; 7] = [
    "Real-time",
    "Hourly",
    "Daily",
    "Weekly",
    "Monthly",
    "Quarterly",
    "Yearly",
];

/// Editable metric fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub priority: Option<Priority>,
    pub calculation_logic: String,
    pub metric_owner: String,
    pub status: String,
    pub data_source: String,
    pub aggregation_period: String,
    pub unit: String,
}

/// Body of `POST /api/metrics` and `PUT /api/metrics/:id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricPayload {
    pub name: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub calculation_logic: String,
    pub metric_owner: Option<String>,
    pub status: Option<String>,
    pub data_source: Option<String>,
    pub aggregation_period: Option<String>,
    pub unit: Option<String>,
}

impl MetricDraft {
    /// Seed the edit form from a fetched metric.
    pub fn from_metric(metric: &Metric) -> Self {
        Self {
            name: metric.name.clone(),
            description: text_of(&metric.description),
            category: text_of(&metric.category),
            priority: metric.priority,
            calculation_logic: text_of(&metric.calculation_logic),
            metric_owner: text_of(&metric.metric_owner),
            status: text_of(&metric.status),
            data_source: text_of(&metric.data_source),
            aggregation_period: text_of(&metric.aggregation_period),
            unit: text_of(&metric.unit),
        }
    }

    pub fn validate(&self) -> Result<MetricPayload, FormError> {
        Ok(MetricPayload {
            name: required(&self.name, "Name")?,
            description: required(&self.description, "Description")?,
            category: required(&self.category, "Category")?,
            priority: self.priority.ok_or(FormError::Required("Priority"))?,
            calculation_logic: required(&self.calculation_logic, "Calculation logic")?,
            metric_owner: optional(&self.metric_owner),
            status: optional(&self.status),
            data_source: optional(&self.data_source),
            aggregation_period: optional(&self.aggregation_period),
            unit: optional(&self.unit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> MetricDraft {
        MetricDraft {
            name: " CVR ".into(),
            description: "Conversion rate".into(),
            category: "Revenue".into(),
            priority: Some(Priority::P0),
            calculation_logic: "orders / visits".into(),
            ..MetricDraft::default()
        }
    }

    #[test]
    fn complete_draft_builds_trimmed_payload() {
        let payload = complete().validate().unwrap();
        assert_eq!(payload.name, "CVR");
        assert_eq!(payload.status, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["priority"], "P0");
        assert!(json["unit"].is_null());
    }

    #[test]
    fn required_fields_are_checked_in_order() {
        let mut draft = complete();
        draft.category.clear();
        draft.calculation_logic = "  ".into();
        assert_eq!(draft.validate(), Err(FormError::Required("Category")));
        draft.category = "Revenue".into();
        draft.priority = None;
        assert_eq!(draft.validate(), Err(FormError::Required("Priority")));
        draft.priority = Some(Priority::P2);
        assert_eq!(
            draft.validate(),
            Err(FormError::Required("Calculation logic"))
        );
    }

    #[test]
    fn edit_seeds_from_metric() {
        let metric: Metric = serde_json::from_str(
            r#"{"id": 1, "name": "DAU", "category": "Engagement", "priority": "P1", "unit": "users"}"#,
        )
        .unwrap();
        let draft = MetricDraft::from_metric(&metric);
        assert_eq!(draft.priority, Some(Priority::P1));
        assert_eq!(draft.unit, "users");
        assert_eq!(draft.description, "");
    }
}
