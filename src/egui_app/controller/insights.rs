use super::metrics::upsert;
use super::*;
use crate::insight_wizard::WizardAction;
use crate::model::{Insight, RecordId, RecordList};

impl EguiController {
    pub fn refresh_insights(&mut self) {
        self.ui.insights.list.loading = true;
        self.spawn(|api| JobMessage::InsightsLoaded(api.list_insights()));
    }

    pub(super) fn load_insight_detail(&mut self, id: RecordId) {
        self.ui.insights.detail.begin(id);
        self.ensure_experiments_loaded();
        self.spawn(move |api| JobMessage::InsightLoaded {
            id,
            result: api.get_insight(id),
        });
    }

    pub(super) fn begin_insight_wizard(&mut self) {
        self.ui.insights.wizard = WizardPage::default();
        self.ensure_experiments_loaded();
    }

    /// Feed one wizard action through the reducer; rejections stay on the page.
    pub fn wizard_dispatch(&mut self, action: WizardAction) {
        let wizard = &mut self.ui.insights.wizard;
        match wizard.state.apply(action) {
            Ok(()) => wizard.error = None,
            Err(err) => wizard.error = Some(err.to_string()),
        }
    }

    pub fn finish_wizard(&mut self) {
        let wizard = &mut self.ui.insights.wizard;
        if wizard.saving {
            return;
        }
        let insight = match wizard.state.finish() {
            Ok(insight) => insight,
            Err(err) => {
                wizard.error = Some(err.to_string());
                return;
            }
        };
        wizard.saving = true;
        wizard.error = None;
        self.set_status(format!("Publishing insight {}", insight.title), StatusTone::Busy);
        self.spawn(move |api| JobMessage::InsightCreated(api.create_insight(&insight)));
    }

    pub(super) fn apply_insights(&mut self, result: Result<RecordList<Insight>, ApiError>) {
        match result {
            Ok(list) => {
                tracing::info!("Loaded {} insights", list.items.len());
                self.ui.insights.list.replace(list.items);
            }
            Err(err) => {
                let message = self.report("Failed to load insights", &err);
                self.ui.insights.list.fail(message);
            }
        }
    }

    pub(super) fn apply_insight(&mut self, id: RecordId, result: Result<Insight, ApiError>) {
        if !self.ui.insights.detail.wants(id) {
            return;
        }
        match result {
            Ok(insight) => {
                let detail = &mut self.ui.insights.detail;
                detail.record = Some(insight);
                detail.loading = false;
            }
            Err(err) => {
                let message = self.report(&format!("Failed to load insight {id}"), &err);
                self.ui.insights.detail.loading = false;
                self.ui.insights.detail.error = Some(message);
            }
        }
    }

    pub(super) fn apply_insight_created(&mut self, result: Result<Insight, ApiError>) {
        self.ui.insights.wizard.saving = false;
        match result {
            Ok(insight) => {
                tracing::info!("Created insight {}", insight.id);
                self.set_status(format!("Published insight {}", insight.title), StatusTone::Info);
                let route = Route::InsightDetail {
                    category: insight.route_category().to_string(),
                    id: insight.id,
                };
                upsert(&mut self.ui.insights.list.records, insight, |i| i.id);
                self.redirect(route);
            }
            Err(err) => {
                let message = self.report("Failed to publish insight", &err);
                self.ui.insights.wizard.error = Some(message);
            }
        }
    }
}
