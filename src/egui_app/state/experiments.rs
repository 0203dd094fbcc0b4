use crate::forms::{ExperimentDraft, MetricRole};
use crate::model::{Experiment, RecordId};

use super::{DetailState, FormState, ListState, PickerModal};

/// Metric role board modal; `focus` is the bucket clicks add to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricRoleModal {
    pub search: String,
    pub focus: MetricRole,
    pub error: Option<String>,
}

impl Default for MetricRoleModal {
    fn default() -> Self {
        Self {
            search: String::new(),
            focus: MetricRole::Primary,
            error: None,
        }
    }
}

#[derive(Debug)]
pub struct ExperimentsState {
    pub list: ListState<Experiment>,
    pub detail: DetailState<Experiment>,
    pub form: FormState<ExperimentDraft>,
    pub metric_modal: Option<MetricRoleModal>,
    pub segment_picker: Option<PickerModal>,
}

impl ExperimentsState {
    pub fn new(page_size: usize) -> Self {
        Self {
            list: ListState::new(page_size),
            detail: DetailState::default(),
            form: FormState::default(),
            metric_modal: None,
            segment_picker: None,
        }
    }

    pub fn find(&self, id: RecordId) -> Option<&Experiment> {
        self.list.records.iter().find(|experiment| experiment.id == id)
    }
}
