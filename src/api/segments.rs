use crate::forms::SegmentPayload;
use crate::model::{RecordId, RecordList, Segment, SegmentStats};

use super::{ApiClient, ApiError, LIST_LIMIT};

impl ApiClient {
    pub fn list_segments(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<RecordList<Segment>, ApiError> {
        let mut query = vec![("limit", LIST_LIMIT.to_string())];
        if let Some(search) = search.filter(|text| !text.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(category) = category.filter(|text| !text.is_empty()) {
            query.push(("category", category.to_string()));
        }
        self.get("/api/segments", &query)
    }

    pub fn segment_stats(&self) -> Result<SegmentStats, ApiError> {
        self.get("/api/segments/stats", &[])
    }

    pub fn get_segment(&self, id: RecordId) -> Result<Segment, ApiError> {
        self.get(&format!("/api/segments/{id}"), &[])
    }

    pub fn create_segment(&self, payload: &SegmentPayload) -> Result<Segment, ApiError> {
        self.send("POST", "/api/segments", payload)
    }

    pub fn update_segment(
        &self,
        id: RecordId,
        payload: &SegmentPayload,
    ) -> Result<Segment, ApiError> {
        self.send("PUT", &format!("/api/segments/{id}"), payload)
    }

    pub fn delete_segment(&self, id: RecordId) -> Result<(), ApiError> {
        self.delete(&format!("/api/segments/{id}"))
    }
}
