//! Owns view state and moves API calls onto background threads.

mod experiments;
mod export;
mod insights;
mod jobs;
mod metrics;
mod navigation;
mod segments;
#[cfg(test)]
mod tests;

pub(crate) use jobs::JobMessage;

use std::path::PathBuf;

use crate::api::{ApiClient, ApiError};
use crate::config::AppSettings;
use crate::egui_app::state::*;
use crate::egui_app::ui::style::StatusTone;
use crate::routes::Route;
use jobs::JobQueue;

/// Maintains app state and bridges the API client to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    settings: AppSettings,
    config_path: Option<PathBuf>,
    api: ApiClient,
    jobs: JobQueue,
}

impl EguiController {
    /// `config_path` is where the last route is remembered; `None` keeps it in memory.
    pub fn new(settings: AppSettings, config_path: Option<PathBuf>) -> Self {
        let start = settings
            .last_route
            .as_deref()
            .and_then(Route::parse)
            .unwrap_or_default();
        Self {
            ui: UiState::new(start, settings.list.page_size),
            api: ApiClient::new(&settings.api),
            settings,
            config_path,
            jobs: JobQueue::new(),
        }
    }

    pub fn api_base_url(&self) -> &str {
        self.api.base_url()
    }

    /// Let worker threads wake the UI when their results arrive.
    pub fn attach_context(&mut self, ctx: &egui::Context) {
        self.jobs.set_repaint(ctx.clone());
    }

    /// Load whatever the starting route shows.
    pub fn start(&mut self) {
        tracing::info!(
            "Starting at {} against {}",
            self.ui.route(),
            self.api.base_url()
        );
        self.enter_route();
    }

    /// Apply finished background work; call once per frame.
    pub fn tick(&mut self) {
        self.poll_background_jobs();
    }

    pub fn jobs_in_flight(&self) -> usize {
        self.jobs.in_flight()
    }

    pub fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.set(text, tone);
    }

    /// Log and surface a failed call; returns the message for the page banner.
    fn report(&mut self, context: &str, err: &ApiError) -> String {
        let message = format!("{context}: {err}");
        tracing::warn!("{message}");
        self.set_status(message.clone(), StatusTone::Error);
        message
    }

    /// Surface a client-side validation failure.
    fn reject(&mut self, message: String) -> String {
        tracing::info!("Rejected input: {message}");
        self.set_status(message.clone(), StatusTone::Warning);
        message
    }

    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce(&ApiClient) -> JobMessage + Send + 'static,
    {
        self.jobs.spawn(&self.api, job);
    }

    fn poll_background_jobs(&mut self) {
        while let Some(message) = self.jobs.try_recv() {
            self.handle_job_message(message);
        }
    }

    fn handle_job_message(&mut self, message: JobMessage) {
        match message {
            JobMessage::MetricsLoaded(result) => self.apply_metrics(result),
            JobMessage::MetricStatsLoaded(result) => self.apply_metric_stats(result),
            JobMessage::MetricLoaded { id, result } => self.apply_metric(id, result),
            JobMessage::TimeseriesLoaded { id, range, result } => {
                self.apply_timeseries(id, range, result)
            }
            JobMessage::MetricSaved { editing, result } => self.apply_metric_saved(editing, result),
            JobMessage::PrioritiesSaved { failed, total } => {
                self.apply_priorities_saved(failed, total)
            }
            JobMessage::SegmentsLoaded(result) => self.apply_segments(result),
            JobMessage::SegmentStatsLoaded(result) => self.apply_segment_stats(result),
            JobMessage::SegmentLoaded { id, result } => self.apply_segment(id, result),
            JobMessage::SegmentSaved { editing, result } => {
                self.apply_segment_saved(editing, result)
            }
            JobMessage::ExperimentsLoaded(result) => self.apply_experiments(result),
            JobMessage::ExperimentLoaded { id, result } => self.apply_experiment(id, result),
            JobMessage::ExperimentSaved { editing, result } => {
                self.apply_experiment_saved(editing, result)
            }
            JobMessage::InsightsLoaded(result) => self.apply_insights(result),
            JobMessage::InsightLoaded { id, result } => self.apply_insight(id, result),
            JobMessage::InsightCreated(result) => self.apply_insight_created(result),
            JobMessage::Deleted { kind, id, result } => self.apply_deleted(kind, id, result),
        }
    }

    /// Ask before deleting a record.
    pub fn request_delete(&mut self, kind: RecordKind, id: crate::model::RecordId, name: &str) {
        self.ui.confirm_delete = Some(ConfirmDelete {
            kind,
            id,
            name: name.to_string(),
        });
    }

    pub fn cancel_delete(&mut self) {
        self.ui.confirm_delete = None;
    }

    pub fn confirm_delete(&mut self) {
        let Some(ConfirmDelete { kind, id, name }) = self.ui.confirm_delete.take() else {
            return;
        };
        self.set_status(format!("Deleting {} {name}", kind.label()), StatusTone::Busy);
        self.spawn(move |api| {
            let result = match kind {
                RecordKind::Metric => api.delete_metric(id),
                RecordKind::Segment => api.delete_segment(id),
                RecordKind::Experiment => api.delete_experiment(id),
            };
            JobMessage::Deleted { kind, id, result }
        });
    }

    fn apply_deleted(
        &mut self,
        kind: RecordKind,
        id: crate::model::RecordId,
        result: Result<(), ApiError>,
    ) {
        if let Err(err) = result {
            let message = self.report(&format!("Failed to delete {}", kind.label()), &err);
            match kind {
                RecordKind::Metric => self.ui.metrics.detail.error = Some(message),
                RecordKind::Segment => self.ui.segments.detail.error = Some(message),
                RecordKind::Experiment => self.ui.experiments.detail.error = Some(message),
            }
            return;
        }
        let list_route = match kind {
            RecordKind::Metric => {
                self.ui.metrics.list.records.retain(|metric| metric.id != id);
                Route::Metrics
            }
            RecordKind::Segment => {
                self.ui.segments.list.records.retain(|segment| segment.id != id);
                Route::Segments
            }
            RecordKind::Experiment => {
                self.ui
                    .experiments
                    .list
                    .records
                    .retain(|experiment| experiment.id != id);
                Route::Experiments
            }
        };
        tracing::info!("Deleted {} {id}", kind.label());
        self.set_status(format!("Deleted {} {id}", kind.label()), StatusTone::Info);
        if showing_record(self.ui.route(), kind, id) {
            self.redirect(list_route);
        }
    }
}

fn showing_record(route: &Route, kind: RecordKind, id: crate::model::RecordId) -> bool {
    match (kind, route) {
        (RecordKind::Metric, Route::MetricDetail(shown) | Route::MetricEdit(shown)) => *shown == id,
        (RecordKind::Segment, Route::SegmentDetail(shown) | Route::SegmentEdit(shown)) => {
            *shown == id
        }
        (
            RecordKind::Experiment,
            Route::ExperimentDetail(shown) | Route::ExperimentEdit(shown),
        ) => *shown == id,
        _ => false,
    }
}
