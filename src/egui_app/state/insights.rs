use crate::insight_wizard::WizardState;
use crate::model::Insight;

use super::{DetailState, ListState};

/// Insight wizard plus its experiment search box.
#[derive(Clone, Debug, Default)]
pub struct WizardPage {
    pub state: WizardState,
    pub search: String,
    pub saving: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct InsightsState {
    pub list: ListState<Insight>,
    pub detail: DetailState<Insight>,
    pub wizard: WizardPage,
}

impl InsightsState {
    pub fn new(page_size: usize) -> Self {
        Self {
            list: ListState::new(page_size),
            detail: DetailState::default(),
            wizard: WizardPage::default(),
        }
    }
}
