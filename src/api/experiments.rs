use crate::forms::ExperimentPayload;
use crate::model::{Experiment, ExperimentStatus, RecordId, RecordList};

use super::{ApiClient, ApiError, LIST_LIMIT};

impl ApiClient {
    pub fn list_experiments(
        &self,
        search: Option<&str>,
        status: Option<ExperimentStatus>,
    ) -> Result<RecordList<Experiment>, ApiError> {
        let mut query = vec![("limit", LIST_LIMIT.to_string())];
        if let Some(search) = search.filter(|text| !text.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        self.get("/api/experiments", &query)
    }

    pub fn get_experiment(&self, id: RecordId) -> Result<Experiment, ApiError> {
        self.get(&format!("/api/experiments/{id}"), &[])
    }

    pub fn create_experiment(&self, payload: &ExperimentPayload) -> Result<Experiment, ApiError> {
        self.send("POST", "/api/experiments", payload)
    }

    pub fn update_experiment(
        &self,
        id: RecordId,
        payload: &ExperimentPayload,
    ) -> Result<Experiment, ApiError> {
        self.send("PUT", &format!("/api/experiments/{id}"), payload)
    }

    pub fn delete_experiment(&self, id: RecordId) -> Result<(), ApiError> {
        self.delete(&format!("/api/experiments/{id}"))
    }
}
