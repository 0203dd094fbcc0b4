use crate::forms::{MetricPayload, PriorityUpdate};
use crate::model::{Metric, MetricStats, RecordId, RecordList, TimeseriesPoint};

use super::{ApiClient, ApiError, LIST_LIMIT};

/// Window of daily points shown on the metric history chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [Self::Week, Self::Month, Self::Quarter, Self::Year];

    /// Requested as the `limit` of the timeseries call.
    pub fn days(self) -> usize {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "7 days",
            Self::Month => "30 days",
            Self::Quarter => "90 days",
            Self::Year => "1 year",
        }
    }
}

/// Server-side narrowing for `GET /api/metrics`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricQuery {
    pub limit: usize,
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

impl Default for MetricQuery {
    fn default() -> Self {
        Self {
            limit: LIST_LIMIT,
            search: None,
            category: None,
            status: None,
        }
    }
}

impl MetricQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string())];
        for (key, value) in [
            ("search", &self.search),
            ("category", &self.category),
            ("status", &self.status),
        ] {
            if let Some(value) = value.as_ref().filter(|value| !value.is_empty()) {
                params.push((key, value.clone()));
            }
        }
        params
    }
}

impl ApiClient {
    pub fn list_metrics(&self, query: &MetricQuery) -> Result<RecordList<Metric>, ApiError> {
        self.get("/api/metrics", &query.params())
    }

    pub fn metric_stats(&self) -> Result<MetricStats, ApiError> {
        self.get("/api/metrics/stats", &[])
    }

    pub fn get_metric(&self, id: RecordId) -> Result<Metric, ApiError> {
        self.get(&format!("/api/metrics/{id}"), &[])
    }

    pub fn metric_timeseries(
        &self,
        id: RecordId,
        limit: usize,
    ) -> Result<Vec<TimeseriesPoint>, ApiError> {
        self.get(
            &format!("/api/metrics/{id}/timeseries"),
            &[("limit", limit.to_string())],
        )
    }

    pub fn create_metric(&self, payload: &MetricPayload) -> Result<Metric, ApiError> {
        self.send("POST", "/api/metrics", payload)
    }

    pub fn update_metric(&self, id: RecordId, payload: &MetricPayload) -> Result<Metric, ApiError> {
        self.send("PUT", &format!("/api/metrics/{id}"), payload)
    }

    pub fn update_metric_priority(&self, update: &PriorityUpdate) -> Result<Metric, ApiError> {
        self.send("PUT", &format!("/api/metrics/{}", update.id), update)
    }

    pub fn delete_metric(&self, id: RecordId) -> Result<(), ApiError> {
        self.delete(&format!("/api/metrics/{id}"))
    }

    /// Send every priority update, continuing past failures; returns how many failed.
    pub fn save_priorities(&self, updates: &[PriorityUpdate]) -> usize {
        updates
            .iter()
            .filter(|update| match self.update_metric_priority(update) {
                Ok(_) => false,
                Err(err) => {
                    tracing::warn!("Priority update for metric {} failed: {err}", update.id);
                    true
                }
            })
            .count()
    }
}
