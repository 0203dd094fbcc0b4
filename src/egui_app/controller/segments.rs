use super::metrics::upsert;
use super::*;
use crate::buckets::Selection;
use crate::forms::SegmentDraft;
use crate::model::{RecordId, RecordList, Segment, SegmentStats};

impl EguiController {
    pub fn refresh_segments(&mut self) {
        self.ui.segments.list.loading = true;
        self.spawn(|api| JobMessage::SegmentsLoaded(api.list_segments(None, None)));
        self.spawn(|api| JobMessage::SegmentStatsLoaded(api.segment_stats()));
    }

    pub(super) fn ensure_segments_loaded(&mut self) {
        let list = &self.ui.segments.list;
        if !list.loaded && !list.loading {
            self.ui.segments.list.loading = true;
            self.spawn(|api| JobMessage::SegmentsLoaded(api.list_segments(None, None)));
        }
    }

    pub(super) fn load_segment_detail(&mut self, id: RecordId) {
        self.ui.segments.detail.begin(id);
        self.spawn(move |api| JobMessage::SegmentLoaded {
            id,
            result: api.get_segment(id),
        });
    }

    pub(super) fn begin_segment_form(&mut self, editing: Option<RecordId>) {
        self.ui.segments.form.reset(editing);
        self.ui
            .segments
            .form
            .draft
            .set_metric_universe(&self.ui.metrics.list.records);
        self.ensure_metrics_loaded();
        if let Some(id) = editing {
            self.spawn(move |api| JobMessage::SegmentLoaded {
                id,
                result: api.get_segment(id),
            });
        }
    }

    pub fn open_segment_metric_picker(&mut self) {
        self.ensure_metrics_loaded();
        self.ui.segments.metric_picker = Some(PickerModal::default());
    }

    pub fn close_segment_metric_picker(&mut self) {
        self.ui.segments.metric_picker = None;
    }

    /// Click on a pool or chip card: add it, or remove it when already picked.
    pub fn toggle_segment_metric(&mut self, id: RecordId) {
        let result = self.ui.segments.form.draft.metrics.toggle(id);
        self.set_picker_error(result.err().map(|err| err.to_string()));
    }

    /// Drag a metric into the selection (`true`) or back to the pool.
    pub fn drop_segment_metric(&mut self, id: RecordId, selected: bool) {
        let board = &mut self.ui.segments.form.draft.metrics;
        let error = if selected {
            board.place(id, Selection::Selected).err().map(|err| err.to_string())
        } else {
            board.unplace(&id);
            None
        };
        self.set_picker_error(error);
    }

    fn set_picker_error(&mut self, error: Option<String>) {
        if let Some(picker) = self.ui.segments.metric_picker.as_mut() {
            picker.error = error;
        } else if let Some(error) = error {
            self.set_status(error, StatusTone::Warning);
        }
    }

    pub fn save_segment_form(&mut self) {
        let form = &self.ui.segments.form;
        if form.saving || form.loading {
            return;
        }
        let editing = form.editing;
        let payload = match form.draft.validate(&self.ui.metrics.list.records) {
            Ok(payload) => payload,
            Err(err) => {
                let message = self.reject(err.to_string());
                self.ui.segments.form.error = Some(message);
                return;
            }
        };
        self.ui.segments.form.saving = true;
        self.ui.segments.form.error = None;
        self.set_status(format!("Saving segment {}", payload.name), StatusTone::Busy);
        self.spawn(move |api| {
            let result = match editing {
                Some(id) => api.update_segment(id, &payload),
                None => api.create_segment(&payload),
            };
            JobMessage::SegmentSaved { editing, result }
        });
    }

    pub fn cancel_segment_form(&mut self) {
        match self.ui.segments.form.editing {
            Some(id) => self.redirect(Route::SegmentDetail(id)),
            None => self.redirect(Route::Segments),
        }
    }

    pub(super) fn apply_segments(&mut self, result: Result<RecordList<Segment>, ApiError>) {
        match result {
            Ok(list) => {
                tracing::info!("Loaded {} segments", list.items.len());
                self.ui.segments.list.replace(list.items);
                self.sync_picker_universes();
            }
            Err(err) => {
                let message = self.report("Failed to load segments", &err);
                self.ui.segments.list.fail(message);
            }
        }
    }

    pub(super) fn apply_segment_stats(&mut self, result: Result<SegmentStats, ApiError>) {
        match result {
            Ok(stats) => self.ui.segments.stats = Some(stats),
            Err(err) => {
                self.report("Failed to load segment stats", &err);
            }
        }
    }

    pub(super) fn apply_segment(&mut self, id: RecordId, result: Result<Segment, ApiError>) {
        let for_detail = self.ui.segments.detail.wants(id);
        let for_form = self.ui.segments.form.loading && self.ui.segments.form.editing == Some(id);
        if !for_detail && !for_form {
            return;
        }
        match result {
            Ok(segment) => {
                if for_form {
                    let mut draft = SegmentDraft::from_segment(&segment);
                    draft.set_metric_universe(&self.ui.metrics.list.records);
                    self.ui.segments.form.draft = draft;
                    self.ui.segments.form.loading = false;
                }
                if for_detail {
                    let detail = &mut self.ui.segments.detail;
                    detail.record = Some(segment);
                    detail.loading = false;
                }
            }
            Err(err) => {
                let message = self.report(&format!("Failed to load segment {id}"), &err);
                if for_form {
                    self.ui.segments.form.loading = false;
                    self.ui.segments.form.error = Some(message.clone());
                }
                if for_detail {
                    self.ui.segments.detail.loading = false;
                    self.ui.segments.detail.error = Some(message);
                }
            }
        }
    }

    pub(super) fn apply_segment_saved(
        &mut self,
        editing: Option<RecordId>,
        result: Result<Segment, ApiError>,
    ) {
        self.ui.segments.form.saving = false;
        match result {
            Ok(segment) => {
                let id = segment.id;
                let verb = if editing.is_some() { "Updated" } else { "Created" };
                tracing::info!("{verb} segment {id}");
                self.set_status(format!("{verb} segment {}", segment.name), StatusTone::Info);
                upsert(&mut self.ui.segments.list.records, segment, |s| s.id);
                self.redirect(Route::SegmentDetail(id));
            }
            Err(err) => {
                let message = self.report("Failed to save segment", &err);
                self.ui.segments.form.error = Some(message);
            }
        }
    }
}
