use super::*;
use crate::api::{ApiError, TimeRange};
use crate::forms::MetricRole;
use crate::insight_wizard::{WizardAction, WizardStep};
use crate::model::{Experiment, Insight, Metric, Priority, RecordList, Segment};

fn controller() -> EguiController {
    let mut settings = AppSettings::default();
    settings.api.base_url = "http://127.0.0.1:9".into();
    settings.api.request_timeout_secs = 1;
    settings.list.page_size = 2;
    EguiController::new(settings, None)
}

fn metrics() -> RecordList<Metric> {
    serde_json::from_str(
        r#"[
            {"id": 1, "name": "CVR", "priority": "P0", "category": "Conversion"},
            {"id": 2, "name": "DAU", "priority": "P1"},
            {"id": 3, "name": "ARPU"},
            {"id": 4, "name": "Churn"},
            {"id": 5, "name": "Retention"}
        ]"#,
    )
    .unwrap()
}

fn segments() -> RecordList<Segment> {
    serde_json::from_str(r#"[{"id": 10, "name": "VIP"}, {"id": 20, "name": "New users"}]"#)
        .unwrap()
}

fn metric(id: i64, name: &str) -> Metric {
    serde_json::from_value(serde_json::json!({"id": id, "name": name})).unwrap()
}

fn server_error(message: &str) -> ApiError {
    ApiError::Status {
        code: 422,
        message: message.into(),
    }
}

#[test]
fn starts_at_remembered_route() {
    let mut settings = AppSettings::default();
    settings.last_route = Some("/segments/4".into());
    let controller = EguiController::new(settings, None);
    assert_eq!(controller.ui.route(), &Route::SegmentDetail(4));

    let mut settings = AppSettings::default();
    settings.last_route = Some("/nowhere".into());
    let controller = EguiController::new(settings, None);
    assert_eq!(controller.ui.route(), &Route::Home);
}

#[test]
fn loaded_metrics_clamp_the_page() {
    let mut controller = controller();
    controller.ui.metrics.list.query.set_page(9);
    controller.handle_job_message(JobMessage::MetricsLoaded(Ok(metrics())));
    let page = controller.ui.metrics.list.page();
    assert_eq!(page.page, 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.rows, vec![4]);
    assert!(controller.ui.metrics.list.loaded);
}

#[test]
fn load_failure_sets_banner_and_status() {
    let mut controller = controller();
    controller.ui.metrics.list.loading = true;
    controller.handle_job_message(JobMessage::MetricsLoaded(Err(ApiError::Transport(
        "connection refused".into(),
    ))));
    let error = controller.ui.metrics.list.error.clone().unwrap();
    assert_eq!(error, "Failed to load metrics: Network error: connection refused");
    assert!(!controller.ui.metrics.list.loading);
    assert_eq!(controller.ui.status.text, error);
    assert_eq!(controller.ui.status.tone, StatusTone::Error);
}

#[test]
fn invalid_metric_form_never_reaches_the_network() {
    let mut controller = controller();
    controller.navigate(Route::MetricNew);
    let before = controller.jobs_in_flight();
    controller.ui.metrics.form.draft.name = "CVR".into();
    controller.save_metric_form();
    assert_eq!(controller.jobs_in_flight(), before);
    assert_eq!(
        controller.ui.metrics.form.error.as_deref(),
        Some("Description is required")
    );
    assert!(!controller.ui.metrics.form.saving);
}

#[test]
fn saved_metric_replaces_the_form_with_its_detail() {
    let mut controller = controller();
    controller.navigate(Route::Metrics);
    controller.navigate(Route::MetricNew);
    controller.handle_job_message(JobMessage::MetricSaved {
        editing: None,
        result: Ok(metric(42, "Bounce rate")),
    });
    assert_eq!(controller.ui.route(), &Route::MetricDetail(42));
    assert!(controller.ui.metrics.find(42).is_some());
    controller.go_back();
    assert_eq!(controller.ui.route(), &Route::Metrics);
}

#[test]
fn server_rejection_keeps_the_form_open() {
    let mut controller = controller();
    controller.navigate(Route::MetricEdit(3));
    controller.ui.metrics.form.saving = true;
    controller.handle_job_message(JobMessage::MetricSaved {
        editing: Some(3),
        result: Err(server_error("body > name: field required")),
    });
    assert_eq!(controller.ui.route(), &Route::MetricEdit(3));
    assert!(!controller.ui.metrics.form.saving);
    assert_eq!(
        controller.ui.metrics.form.error.as_deref(),
        Some("Failed to save metric: body > name: field required")
    );
}

#[test]
fn edit_form_seeds_from_the_fetched_metric() {
    let mut controller = controller();
    controller.navigate(Route::MetricEdit(7));
    assert!(controller.ui.metrics.form.loading);
    controller.handle_job_message(JobMessage::MetricLoaded {
        id: 7,
        result: Ok(metric(7, "Sessions")),
    });
    assert!(!controller.ui.metrics.form.loading);
    assert_eq!(controller.ui.metrics.form.draft.name, "Sessions");
}

#[test]
fn stale_detail_results_are_ignored() {
    let mut controller = controller();
    controller.navigate(Route::MetricDetail(1));
    controller.navigate(Route::MetricDetail(2));
    controller.handle_job_message(JobMessage::MetricLoaded {
        id: 1,
        result: Ok(metric(1, "CVR")),
    });
    assert!(controller.ui.metrics.detail.record.is_none());
    controller.handle_job_message(JobMessage::MetricLoaded {
        id: 2,
        result: Ok(metric(2, "DAU")),
    });
    assert_eq!(
        controller.ui.metrics.detail.record.as_ref().map(|m| m.name.as_str()),
        Some("DAU")
    );
}

#[test]
fn history_from_a_previous_time_range_is_ignored() {
    let mut controller = controller();
    controller.navigate(Route::MetricDetail(1));
    controller.set_time_range(TimeRange::Year);
    assert_eq!(controller.ui.metrics.time_range, TimeRange::Year);
    let point: crate::model::TimeseriesPoint =
        serde_json::from_str(r#"{"timestamp": "2024-12-01", "value": 1.0}"#).unwrap();
    controller.handle_job_message(JobMessage::TimeseriesLoaded {
        id: 1,
        range: TimeRange::Month,
        result: Ok(vec![point.clone()]),
    });
    assert!(controller.ui.metrics.timeseries.is_empty());
    controller.handle_job_message(JobMessage::TimeseriesLoaded {
        id: 1,
        range: TimeRange::Year,
        result: Ok(vec![point]),
    });
    assert_eq!(controller.ui.metrics.timeseries.len(), 1);
}

#[test]
fn priority_modal_tracks_drops_and_saves() {
    let mut controller = controller();
    controller.handle_job_message(JobMessage::MetricsLoaded(Ok(metrics())));
    controller.open_priority_modal();
    controller.drop_metric_priority(3, Some(Priority::P2));
    controller.drop_metric_priority(1, None);
    let modal = controller.ui.metrics.priority.as_ref().unwrap();
    assert_eq!(modal.board.contents(Priority::P2), &[3]);
    assert!(!modal.board.is_assigned(&1));

    controller.save_priorities();
    assert!(controller.ui.metrics.priority.as_ref().unwrap().saving);
    assert_eq!(controller.ui.status.tone, StatusTone::Busy);

    controller.handle_job_message(JobMessage::PrioritiesSaved {
        failed: 1,
        total: 3,
    });
    assert!(controller.ui.metrics.priority.is_none());
    assert_eq!(controller.ui.status.text, "1 of 3 priority updates failed");
}

#[test]
fn unchanged_priorities_close_without_saving() {
    let mut controller = controller();
    controller.handle_job_message(JobMessage::MetricsLoaded(Ok(metrics())));
    controller.open_priority_modal();
    let before = controller.jobs_in_flight();
    controller.save_priorities();
    assert!(controller.ui.metrics.priority.is_none());
    assert_eq!(controller.jobs_in_flight(), before);
}

#[test]
fn full_metric_role_reports_capacity() {
    let mut controller = controller();
    controller.navigate(Route::ExperimentNew);
    controller.handle_job_message(JobMessage::MetricsLoaded(Ok(metrics())));
    controller.open_metric_role_modal();
    controller.add_experiment_metric(1);
    controller.add_experiment_metric(2);
    controller.add_experiment_metric(3);
    let draft = &controller.ui.experiments.form.draft;
    assert_eq!(draft.metrics.contents(MetricRole::Primary), &[1, 2]);
    let error = controller
        .ui
        .experiments
        .metric_modal
        .as_ref()
        .and_then(|modal| modal.error.clone())
        .unwrap();
    assert!(error.contains("at most 2"), "{error}");

    controller.focus_metric_role(MetricRole::Guardrail);
    controller.add_experiment_metric(3);
    assert_eq!(
        controller
            .ui
            .experiments
            .form
            .draft
            .metrics
            .bucket_of(&3),
        Some(MetricRole::Guardrail)
    );
}

#[test]
fn target_segment_picker_replaces_and_closes() {
    let mut controller = controller();
    controller.navigate(Route::ExperimentNew);
    controller.handle_job_message(JobMessage::SegmentsLoaded(Ok(segments())));
    controller.open_segment_picker();
    controller.select_target_segment(10);
    assert!(controller.ui.experiments.segment_picker.is_none());
    controller.select_target_segment(20);
    assert_eq!(controller.ui.experiments.form.draft.target_segment(), Some(20));
}

#[test]
fn control_variant_removal_is_reported() {
    let mut controller = controller();
    controller.navigate(Route::ExperimentNew);
    controller.remove_variant(0);
    assert_eq!(controller.ui.experiments.form.draft.variants.len(), 2);
    assert_eq!(
        controller.ui.experiments.form.error.as_deref(),
        Some("The Control variant cannot be removed")
    );
}

#[test]
fn segment_picker_caps_at_four_metrics() {
    let mut controller = controller();
    controller.navigate(Route::SegmentNew);
    controller.handle_job_message(JobMessage::MetricsLoaded(Ok(metrics())));
    controller.open_segment_metric_picker();
    for id in 1..=5 {
        controller.toggle_segment_metric(id);
    }
    assert_eq!(
        controller.ui.segments.form.draft.metrics.selected(),
        &[1, 2, 3, 4]
    );
    assert!(
        controller
            .ui
            .segments
            .metric_picker
            .as_ref()
            .unwrap()
            .error
            .is_some()
    );
    controller.toggle_segment_metric(2);
    assert_eq!(controller.ui.segments.form.draft.metrics.selected(), &[1, 3, 4]);
}

#[test]
fn wizard_errors_stay_on_the_page() {
    let mut controller = controller();
    controller.navigate(Route::InsightNew);
    controller.wizard_dispatch(WizardAction::Next);
    assert_eq!(
        controller.ui.insights.wizard.error.as_deref(),
        Some("Select an experiment first")
    );
    let experiment: Experiment =
        serde_json::from_str(r#"{"id": 8, "name": "Checkout", "status": "complete"}"#).unwrap();
    controller.wizard_dispatch(WizardAction::SelectExperiment(Box::new(experiment)));
    assert!(controller.ui.insights.wizard.error.is_none());
    assert_eq!(
        controller.ui.insights.wizard.state.step,
        WizardStep::ReviewResults
    );
    controller.finish_wizard();
    assert_eq!(
        controller.ui.insights.wizard.error.as_deref(),
        Some("The insight can only be saved from the preview")
    );
}

#[test]
fn published_insight_opens_its_page() {
    let mut controller = controller();
    controller.navigate(Route::InsightNew);
    let insight: Insight = serde_json::from_str(
        r#"{"id": 12, "title": "Short onboarding wins", "category": "onboarding"}"#,
    )
    .unwrap();
    controller.handle_job_message(JobMessage::InsightCreated(Ok(insight)));
    assert_eq!(
        controller.ui.route(),
        &Route::InsightDetail {
            category: "onboarding".into(),
            id: 12
        }
    );
    assert_eq!(controller.ui.insights.list.records.len(), 1);
}

#[test]
fn delete_requires_confirmation_and_leaves_the_detail_page() {
    let mut controller = controller();
    controller.handle_job_message(JobMessage::SegmentsLoaded(Ok(segments())));
    controller.navigate(Route::SegmentDetail(10));
    controller.request_delete(RecordKind::Segment, 10, "VIP");
    assert!(controller.ui.confirm_delete.is_some());
    controller.confirm_delete();
    assert!(controller.ui.confirm_delete.is_none());

    controller.handle_job_message(JobMessage::Deleted {
        kind: RecordKind::Segment,
        id: 10,
        result: Ok(()),
    });
    assert_eq!(controller.ui.route(), &Route::Segments);
    assert!(controller.ui.segments.find(10).is_none());
}

#[test]
fn failed_delete_stays_put() {
    let mut controller = controller();
    controller.navigate(Route::ExperimentDetail(5));
    controller.handle_job_message(JobMessage::Deleted {
        kind: RecordKind::Experiment,
        id: 5,
        result: Err(server_error("Experiment is running")),
    });
    assert_eq!(controller.ui.route(), &Route::ExperimentDetail(5));
    assert_eq!(
        controller.ui.experiments.detail.error.as_deref(),
        Some("Failed to delete experiment: Experiment is running")
    );
}

#[test]
fn export_needs_columns_and_writes_matching_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segments.csv");
    let mut controller = controller();
    controller.handle_job_message(JobMessage::SegmentsLoaded(Ok(segments())));
    controller.ui.segments.list.query.set_search("vip");
    controller.open_export(ExportTarget::Segments);
    controller.export_to(&path);
    assert!(controller.ui.export.as_ref().unwrap().error.is_some());
    assert!(!path.exists());

    controller.drop_export_column("name", true);
    controller.drop_export_column("id", true);
    controller.export_to(&path);
    assert!(controller.ui.export.is_none());
    assert_eq!(controller.last_export(), Some(&path));
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.trim_start_matches('\u{feff}'), "Name,ID\nVIP,10\n");
}
