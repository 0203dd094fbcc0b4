use crate::model::{Insight, NewInsight, RecordId, RecordList};

use super::{ApiClient, ApiError, LIST_LIMIT};

impl ApiClient {
    pub fn list_insights(&self) -> Result<RecordList<Insight>, ApiError> {
        self.get("/api/insights", &[("limit", LIST_LIMIT.to_string())])
    }

    pub fn get_insight(&self, id: RecordId) -> Result<Insight, ApiError> {
        self.get(&format!("/api/insights/{id}"), &[])
    }

    pub fn create_insight(&self, insight: &NewInsight) -> Result<Insight, ApiError> {
        self.send("POST", "/api/insights", insight)
    }
}
