use super::*;
use crate::api::{MetricQuery, TimeRange};
use crate::forms::{MetricDraft, priority_board, priority_updates};
use crate::model::{Metric, MetricStats, Priority, RecordId, RecordList, TimeseriesPoint};

impl EguiController {
    pub fn refresh_metrics(&mut self) {
        self.ui.metrics.list.loading = true;
        self.spawn(|api| JobMessage::MetricsLoaded(api.list_metrics(&MetricQuery::default())));
        self.spawn(|api| JobMessage::MetricStatsLoaded(api.metric_stats()));
    }

    /// Fetch the metric list once for pickers that need it.
    pub(super) fn ensure_metrics_loaded(&mut self) {
        let list = &self.ui.metrics.list;
        if !list.loaded && !list.loading {
            self.ui.metrics.list.loading = true;
            self.spawn(|api| {
                JobMessage::MetricsLoaded(api.list_metrics(&MetricQuery::default()))
            });
        }
    }

    pub(super) fn load_metric_detail(&mut self, id: RecordId) {
        self.ui.metrics.detail.begin(id);
        self.spawn(move |api| JobMessage::MetricLoaded {
            id,
            result: api.get_metric(id),
        });
        self.fetch_timeseries(id);
    }

    /// Refetch the history chart of the open metric for another window.
    pub fn set_time_range(&mut self, range: TimeRange) {
        if self.ui.metrics.time_range == range {
            return;
        }
        self.ui.metrics.time_range = range;
        let id = match self.ui.route() {
            Route::MetricDetail(id) => *id,
            _ => return,
        };
        self.fetch_timeseries(id);
    }

    fn fetch_timeseries(&mut self, id: RecordId) {
        let range = self.ui.metrics.time_range;
        self.ui.metrics.timeseries.clear();
        self.ui.metrics.timeseries_error = None;
        self.spawn(move |api| JobMessage::TimeseriesLoaded {
            id,
            range,
            result: api.metric_timeseries(id, range.days()),
        });
    }

    pub(super) fn begin_metric_form(&mut self, editing: Option<RecordId>) {
        self.ui.metrics.form.reset(editing);
        if let Some(id) = editing {
            self.spawn(move |api| JobMessage::MetricLoaded {
                id,
                result: api.get_metric(id),
            });
        }
    }

    pub fn save_metric_form(&mut self) {
        let form = &self.ui.metrics.form;
        if form.saving || form.loading {
            return;
        }
        let editing = form.editing;
        let payload = match form.draft.validate() {
            Ok(payload) => payload,
            Err(err) => {
                let message = self.reject(err.to_string());
                self.ui.metrics.form.error = Some(message);
                return;
            }
        };
        self.ui.metrics.form.saving = true;
        self.ui.metrics.form.error = None;
        self.set_status(format!("Saving metric {}", payload.name), StatusTone::Busy);
        self.spawn(move |api| {
            let result = match editing {
                Some(id) => api.update_metric(id, &payload),
                None => api.create_metric(&payload),
            };
            JobMessage::MetricSaved { editing, result }
        });
    }

    pub fn cancel_metric_form(&mut self) {
        match self.ui.metrics.form.editing {
            Some(id) => self.redirect(Route::MetricDetail(id)),
            None => self.redirect(Route::Metrics),
        }
    }

    pub fn open_priority_modal(&mut self) {
        if !self.ui.metrics.list.loaded {
            self.set_status("Metrics are still loading", StatusTone::Warning);
            return;
        }
        self.ui.metrics.priority = Some(PriorityModal {
            board: priority_board(&self.ui.metrics.list.records),
            search: String::new(),
            saving: false,
            error: None,
        });
    }

    pub fn close_priority_modal(&mut self) {
        self.ui.metrics.priority = None;
    }

    /// Drop a metric onto a priority bucket, or back into the pool with `None`.
    pub fn drop_metric_priority(&mut self, id: RecordId, priority: Option<Priority>) {
        let Some(modal) = self.ui.metrics.priority.as_mut() else {
            return;
        };
        modal.error = None;
        match priority {
            Some(priority) => {
                if let Err(err) = modal.board.place(id, priority) {
                    modal.error = Some(err.to_string());
                }
            }
            None => {
                modal.board.unplace(&id);
            }
        }
    }

    pub fn save_priorities(&mut self) {
        let Some(modal) = self.ui.metrics.priority.as_mut() else {
            return;
        };
        if modal.saving {
            return;
        }
        let updates = priority_updates(&modal.board, &self.ui.metrics.list.records);
        let unchanged = updates.iter().all(|update| {
            self.ui
                .metrics
                .list
                .records
                .iter()
                .any(|metric| metric.id == update.id && metric.priority == update.priority)
        });
        if unchanged {
            self.ui.metrics.priority = None;
            self.set_status("Priorities unchanged", StatusTone::Info);
            return;
        }
        modal.saving = true;
        let total = updates.len();
        self.set_status(format!("Saving {total} priorities"), StatusTone::Busy);
        self.spawn(move |api| JobMessage::PrioritiesSaved {
            failed: api.save_priorities(&updates),
            total,
        });
    }

    pub(super) fn apply_metrics(&mut self, result: Result<RecordList<Metric>, ApiError>) {
        match result {
            Ok(list) => {
                tracing::info!("Loaded {} metrics", list.items.len());
                self.ui.metrics.list.replace(list.items);
                self.sync_picker_universes();
            }
            Err(err) => {
                let message = self.report("Failed to load metrics", &err);
                self.ui.metrics.list.fail(message);
            }
        }
    }

    pub(super) fn apply_metric_stats(&mut self, result: Result<MetricStats, ApiError>) {
        match result {
            Ok(stats) => self.ui.metrics.stats = Some(stats),
            Err(err) => {
                self.report("Failed to load metric stats", &err);
            }
        }
    }

    pub(super) fn apply_metric(&mut self, id: RecordId, result: Result<Metric, ApiError>) {
        let for_detail = self.ui.metrics.detail.wants(id);
        let for_form = self.ui.metrics.form.loading && self.ui.metrics.form.editing == Some(id);
        if !for_detail && !for_form {
            return;
        }
        match result {
            Ok(metric) => {
                if for_form {
                    self.ui.metrics.form.draft = MetricDraft::from_metric(&metric);
                    self.ui.metrics.form.loading = false;
                }
                if for_detail {
                    let detail = &mut self.ui.metrics.detail;
                    detail.record = Some(metric);
                    detail.loading = false;
                }
            }
            Err(err) => {
                let message = self.report(&format!("Failed to load metric {id}"), &err);
                if for_form {
                    self.ui.metrics.form.loading = false;
                    self.ui.metrics.form.error = Some(message.clone());
                }
                if for_detail {
                    self.ui.metrics.detail.loading = false;
                    self.ui.metrics.detail.error = Some(message);
                }
            }
        }
    }

    pub(super) fn apply_timeseries(
        &mut self,
        id: RecordId,
        range: TimeRange,
        result: Result<Vec<TimeseriesPoint>, ApiError>,
    ) {
        if !self.ui.metrics.detail.wants(id) || self.ui.metrics.time_range != range {
            return;
        }
        match result {
            Ok(points) => self.ui.metrics.timeseries = points,
            Err(err) => {
                let message = self.report("Failed to load metric history", &err);
                self.ui.metrics.timeseries_error = Some(message);
            }
        }
    }

    pub(super) fn apply_metric_saved(
        &mut self,
        editing: Option<RecordId>,
        result: Result<Metric, ApiError>,
    ) {
        self.ui.metrics.form.saving = false;
        match result {
            Ok(metric) => {
                let id = metric.id;
                let verb = if editing.is_some() { "Updated" } else { "Created" };
                tracing::info!("{verb} metric {id}");
                self.set_status(format!("{verb} metric {}", metric.name), StatusTone::Info);
                upsert(&mut self.ui.metrics.list.records, metric, |m| m.id);
                self.redirect(Route::MetricDetail(id));
            }
            Err(err) => {
                let message = self.report("Failed to save metric", &err);
                self.ui.metrics.form.error = Some(message);
            }
        }
    }

    pub(super) fn apply_priorities_saved(&mut self, failed: usize, total: usize) {
        self.ui.metrics.priority = None;
        if failed == 0 {
            self.set_status(format!("Saved {total} priorities"), StatusTone::Info);
        } else {
            tracing::warn!("{failed} of {total} priority updates failed");
            self.set_status(
                format!("{failed} of {total} priority updates failed"),
                StatusTone::Error,
            );
        }
        self.refresh_metrics();
    }

    /// Keep segment and experiment pickers in step with the loaded lists.
    pub(super) fn sync_picker_universes(&mut self) {
        let metrics = &self.ui.metrics.list.records;
        self.ui.segments.form.draft.set_metric_universe(metrics);
        let metric_ids = metrics.iter().map(|metric| metric.id).collect();
        let segment_ids = self
            .ui
            .segments
            .list
            .records
            .iter()
            .map(|segment| segment.id)
            .collect();
        self.ui
            .experiments
            .form
            .draft
            .set_universes(metric_ids, segment_ids);
    }
}

/// Replace the record with the same id, or append it.
pub(super) fn upsert<T>(records: &mut Vec<T>, record: T, id_of: impl Fn(&T) -> RecordId) {
    let id = id_of(&record);
    match records.iter_mut().find(|existing| id_of(existing) == id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}
