use crate::forms::SegmentDraft;
use crate::model::{RecordId, Segment, SegmentStats};

use super::{DetailState, FormState, ListState, PickerModal};

#[derive(Debug)]
pub struct SegmentsState {
    pub list: ListState<Segment>,
    pub stats: Option<SegmentStats>,
    pub detail: DetailState<Segment>,
    pub form: FormState<SegmentDraft>,
    pub metric_picker: Option<PickerModal>,
}

impl SegmentsState {
    pub fn new(page_size: usize) -> Self {
        Self {
            list: ListState::new(page_size),
            stats: None,
            detail: DetailState::default(),
            form: FormState::default(),
            metric_picker: None,
        }
    }

    pub fn find(&self, id: RecordId) -> Option<&Segment> {
        self.list.records.iter().find(|segment| segment.id == id)
    }
}
