use super::*;
use crate::config;

impl EguiController {
    pub fn navigate(&mut self, route: Route) {
        if self.ui.history.push(route) {
            self.enter_route();
        }
    }

    /// Navigate to a typed path such as `/metrics/3`; unknown paths are reported.
    pub fn navigate_path(&mut self, path: &str) -> bool {
        match Route::parse(path) {
            Some(route) => {
                self.navigate(route);
                true
            }
            None => {
                self.set_status(format!("No page at {path}"), StatusTone::Warning);
                false
            }
        }
    }

    pub fn go_back(&mut self) {
        if self.ui.history.back().is_some() {
            self.enter_route();
        }
    }

    /// Swap the current entry, e.g. from a form to the record it saved.
    pub(super) fn redirect(&mut self, route: Route) {
        self.ui.history.replace(route);
        self.enter_route();
    }

    /// Reload the current page from the server.
    pub fn refresh_current(&mut self) {
        self.enter_route();
    }

    pub(super) fn enter_route(&mut self) {
        let route = self.ui.route().clone();
        self.close_modals();
        self.remember_route(&route);
        match route {
            Route::Home => {
                self.refresh_metrics();
                self.refresh_segments();
                self.refresh_experiments();
                self.refresh_insights();
            }
            Route::Metrics => self.refresh_metrics(),
            Route::MetricNew => self.begin_metric_form(None),
            Route::MetricDetail(id) => self.load_metric_detail(id),
            Route::MetricEdit(id) => self.begin_metric_form(Some(id)),
            Route::Segments => self.refresh_segments(),
            Route::SegmentNew => self.begin_segment_form(None),
            Route::SegmentDetail(id) => self.load_segment_detail(id),
            Route::SegmentEdit(id) => self.begin_segment_form(Some(id)),
            Route::Insights => self.refresh_insights(),
            Route::InsightNew => self.begin_insight_wizard(),
            Route::InsightDetail { id, .. } => self.load_insight_detail(id),
            Route::Experiments => self.refresh_experiments(),
            Route::ExperimentNew => self.begin_experiment_form(None),
            Route::ExperimentDetail(id) => self.load_experiment_detail(id),
            Route::ExperimentEdit(id) => self.begin_experiment_form(Some(id)),
        }
    }

    fn close_modals(&mut self) {
        self.ui.confirm_delete = None;
        self.ui.export = None;
        self.ui.metrics.priority = None;
        self.ui.segments.metric_picker = None;
        self.ui.experiments.metric_modal = None;
        self.ui.experiments.segment_picker = None;
    }

    fn remember_route(&mut self, route: &Route) {
        let path = route.path();
        if self.settings.last_route.as_deref() == Some(path.as_str()) {
            return;
        }
        self.settings.last_route = Some(path);
        let Some(config_path) = self.config_path.as_ref() else {
            return;
        };
        if let Err(err) = config::save_to_path(&self.settings, config_path) {
            tracing::warn!("Failed to remember last page: {err}");
        }
    }
}
