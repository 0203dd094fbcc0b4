use super::metrics::upsert;
use super::*;
use crate::buckets::Selection;
use crate::forms::{ExperimentDraft, MetricRole};
use crate::model::{Experiment, RecordId, RecordList};

impl EguiController {
    pub fn refresh_experiments(&mut self) {
        self.ui.experiments.list.loading = true;
        self.spawn(|api| JobMessage::ExperimentsLoaded(api.list_experiments(None, None)));
    }

    pub(super) fn ensure_experiments_loaded(&mut self) {
        let list = &self.ui.experiments.list;
        if !list.loaded && !list.loading {
            self.refresh_experiments();
        }
    }

    pub(super) fn load_experiment_detail(&mut self, id: RecordId) {
        self.ui.experiments.detail.begin(id);
        self.ensure_metrics_loaded();
        self.ensure_segments_loaded();
        self.spawn(move |api| JobMessage::ExperimentLoaded {
            id,
            result: api.get_experiment(id),
        });
    }

    pub(super) fn begin_experiment_form(&mut self, editing: Option<RecordId>) {
        self.ui.experiments.form.reset(editing);
        self.sync_picker_universes();
        self.ensure_metrics_loaded();
        self.ensure_segments_loaded();
        if let Some(id) = editing {
            self.spawn(move |api| JobMessage::ExperimentLoaded {
                id,
                result: api.get_experiment(id),
            });
        }
    }

    pub fn add_variant(&mut self) {
        self.ui.experiments.form.draft.variants.add_variant();
    }

    pub fn remove_variant(&mut self, index: usize) {
        if let Err(err) = self.ui.experiments.form.draft.variants.remove(index) {
            let message = self.reject(err.to_string());
            self.ui.experiments.form.error = Some(message);
        }
    }

    pub fn split_traffic_evenly(&mut self) {
        self.ui.experiments.form.draft.variants.split_evenly();
    }

    pub fn open_metric_role_modal(&mut self) {
        self.ensure_metrics_loaded();
        self.ui.experiments.metric_modal = Some(MetricRoleModal::default());
    }

    pub fn close_metric_role_modal(&mut self) {
        self.ui.experiments.metric_modal = None;
    }

    /// Clicks in the pool add to this role.
    pub fn focus_metric_role(&mut self, role: MetricRole) {
        if let Some(modal) = self.ui.experiments.metric_modal.as_mut() {
            modal.focus = role;
        }
    }

    /// Place a metric in `role`, or return it to the pool with `None`.
    pub fn drop_experiment_metric(&mut self, id: RecordId, role: Option<MetricRole>) {
        let board = &mut self.ui.experiments.form.draft.metrics;
        let error = match role {
            Some(role) => board.place(id, role).err().map(|err| err.to_string()),
            None => {
                board.unplace(&id);
                None
            }
        };
        match self.ui.experiments.metric_modal.as_mut() {
            Some(modal) => modal.error = error,
            None => {
                if let Some(error) = error {
                    self.set_status(error, StatusTone::Warning);
                }
            }
        }
    }

    /// Pool click: add to the focused role.
    pub fn add_experiment_metric(&mut self, id: RecordId) {
        let role = self
            .ui
            .experiments
            .metric_modal
            .as_ref()
            .map(|modal| modal.focus)
            .unwrap_or(MetricRole::Primary);
        self.drop_experiment_metric(id, Some(role));
    }

    pub fn open_segment_picker(&mut self) {
        self.ensure_segments_loaded();
        self.ui.experiments.segment_picker = Some(PickerModal::default());
    }

    pub fn close_segment_picker(&mut self) {
        self.ui.experiments.segment_picker = None;
    }

    pub fn select_target_segment(&mut self, id: RecordId) {
        let result = self
            .ui
            .experiments
            .form
            .draft
            .segment
            .place(id, Selection::Selected);
        match result {
            Ok(_) => self.ui.experiments.segment_picker = None,
            Err(err) => {
                if let Some(picker) = self.ui.experiments.segment_picker.as_mut() {
                    picker.error = Some(err.to_string());
                }
            }
        }
    }

    pub fn clear_target_segment(&mut self) {
        self.ui.experiments.form.draft.segment.clear();
    }

    pub fn save_experiment_form(&mut self) {
        let form = &self.ui.experiments.form;
        if form.saving || form.loading {
            return;
        }
        let editing = form.editing;
        let payload = match form.draft.validate() {
            Ok(payload) => payload,
            Err(err) => {
                let message = self.reject(err.to_string());
                self.ui.experiments.form.error = Some(message);
                return;
            }
        };
        self.ui.experiments.form.saving = true;
        self.ui.experiments.form.error = None;
        self.set_status(format!("Saving experiment {}", payload.name), StatusTone::Busy);
        self.spawn(move |api| {
            let result = match editing {
                Some(id) => api.update_experiment(id, &payload),
                None => api.create_experiment(&payload),
            };
            JobMessage::ExperimentSaved { editing, result }
        });
    }

    pub fn cancel_experiment_form(&mut self) {
        match self.ui.experiments.form.editing {
            Some(id) => self.redirect(Route::ExperimentDetail(id)),
            None => self.redirect(Route::Experiments),
        }
    }

    pub(super) fn apply_experiments(&mut self, result: Result<RecordList<Experiment>, ApiError>) {
        match result {
            Ok(list) => {
                tracing::info!("Loaded {} experiments", list.items.len());
                self.ui.experiments.list.replace(list.items);
            }
            Err(err) => {
                let message = self.report("Failed to load experiments", &err);
                self.ui.experiments.list.fail(message);
            }
        }
    }

    pub(super) fn apply_experiment(&mut self, id: RecordId, result: Result<Experiment, ApiError>) {
        let for_detail = self.ui.experiments.detail.wants(id);
        let form = &self.ui.experiments.form;
        let for_form = form.loading && form.editing == Some(id);
        if !for_detail && !for_form {
            return;
        }
        let experiment = match result {
            Ok(experiment) => experiment,
            Err(err) => {
                let message = self.report(&format!("Failed to load experiment {id}"), &err);
                if for_form {
                    self.ui.experiments.form.loading = false;
                    self.ui.experiments.form.error = Some(message.clone());
                }
                if for_detail {
                    self.ui.experiments.detail.loading = false;
                    self.ui.experiments.detail.error = Some(message);
                }
                return;
            }
        };
        if for_form {
            self.ui.experiments.form.loading = false;
            match ExperimentDraft::from_experiment(&experiment) {
                Ok(draft) => {
                    self.ui.experiments.form.draft = draft;
                    self.sync_picker_universes();
                }
                Err(err) => {
                    tracing::warn!("Experiment {id} has unreadable fields: {err}");
                    let message = format!("Experiment {id} cannot be edited: {err}");
                    self.set_status(message.clone(), StatusTone::Error);
                    self.ui.experiments.form.error = Some(message);
                }
            }
        }
        if for_detail {
            let detail = &mut self.ui.experiments.detail;
            detail.record = Some(experiment);
            detail.loading = false;
        }
    }

    pub(super) fn apply_experiment_saved(
        &mut self,
        editing: Option<RecordId>,
        result: Result<Experiment, ApiError>,
    ) {
        self.ui.experiments.form.saving = false;
        match result {
            Ok(experiment) => {
                let id = experiment.id;
                let verb = if editing.is_some() { "Updated" } else { "Created" };
                tracing::info!("{verb} experiment {id}");
                self.set_status(
                    format!("{verb} experiment {}", experiment.name),
                    StatusTone::Info,
                );
                upsert(&mut self.ui.experiments.list.records, experiment, |e| e.id);
                self.redirect(Route::ExperimentDetail(id));
            }
            Err(err) => {
                let message = self.report("Failed to save experiment", &err);
                self.ui.experiments.form.error = Some(message);
            }
        }
    }
}
