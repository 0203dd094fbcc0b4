mod support;

use std::time::Duration;

use datahub::api::TimeRange;
use datahub::config::{self, AppSettings};
use datahub::egui_app::controller::EguiController;
use datahub::egui_app::state::ExportTarget;
use datahub::model::{MetricFilter, Priority};
use datahub::routes::Route;
use support::datahub_env::DatahubEnvGuard;
use support::http_stub::StubServer;

const METRICS: &str = r#"{"total": 3, "items": [
    {"id": 1, "name": "CVR", "category": "Revenue", "priority": "P0", "status": "Active"},
    {"id": 2, "name": "DAU", "category": "Engagement", "priority": "P1", "status": "Active"},
    {"id": 3, "name": "Refunds", "category": "Revenue", "status": "Warning"}
]}"#;

fn controller_for(server: &StubServer) -> EguiController {
    let mut settings = AppSettings::default();
    settings.api.base_url = server.base_url.clone();
    settings.api.request_timeout_secs = 5;
    EguiController::new(settings, None)
}

fn wait_until(controller: &mut EguiController, mut done: impl FnMut(&EguiController) -> bool) {
    for _ in 0..400 {
        controller.tick();
        if done(controller) {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("controller did not settle; status: {}", controller.ui.status.text);
}

fn metric_routes() -> Vec<(&'static str, &'static str, String)> {
    vec![
        ("GET /api/metrics", "200 OK", METRICS.to_string()),
        (
            "GET /api/metrics/stats",
            "200 OK",
            r#"{"total": 3, "active": 2, "inactive": 0, "warning": 1}"#.to_string(),
        ),
    ]
}

#[test]
fn metric_list_loads_and_filters_client_side() {
    let server = StubServer::start(metric_routes());
    let mut controller = controller_for(&server);
    controller.navigate(Route::Metrics);
    wait_until(&mut controller, |c| {
        c.ui.metrics.list.loaded && c.ui.metrics.stats.is_some() && c.jobs_in_flight() == 0
    });

    assert_eq!(controller.ui.metrics.stats.map(|s| s.warning), Some(1));
    let list = &mut controller.ui.metrics.list;
    list.query
        .set_filter(MetricFilter::Category, Some("Revenue".into()));
    let page = list.page();
    assert_eq!(page.total_matches, 2);
    assert_eq!(page.rows, vec![0, 2]);
}

#[test]
fn new_metric_saves_and_opens_its_detail_page() {
    let mut routes = metric_routes();
    routes.push((
        "POST /api/metrics",
        "201 Created",
        r#"{"id": 41, "name": "ARPU", "category": "Revenue", "priority": "P2"}"#.to_string(),
    ));
    routes.push((
        "GET /api/metrics/41",
        "200 OK",
        r#"{"id": 41, "name": "ARPU", "category": "Revenue", "priority": "P2"}"#.to_string(),
    ));
    routes.push((
        "GET /api/metrics/41/timeseries",
        "200 OK",
        r#"[{"timestamp": "2024-12-01T00:00:00Z", "value": 12.5}]"#.to_string(),
    ));
    let server = StubServer::start(routes);
    let mut controller = controller_for(&server);

    controller.navigate(Route::MetricNew);
    let draft = &mut controller.ui.metrics.form.draft;
    draft.name = "ARPU".into();
    draft.description = "Revenue per user".into();
    draft.category = "Revenue".into();
    draft.priority = Some(Priority::P2);
    draft.calculation_logic = "revenue / users".into();
    controller.save_metric_form();
    assert!(controller.ui.metrics.form.saving);

    wait_until(&mut controller, |c| {
        c.ui.metrics.detail.record.is_some() && !c.ui.metrics.timeseries.is_empty()
    });
    assert_eq!(controller.ui.route(), &Route::MetricDetail(41));
    assert_eq!(
        controller.ui.metrics.detail.record.as_ref().map(|m| m.name.as_str()),
        Some("ARPU")
    );
    assert_eq!(controller.ui.metrics.timeseries[0].value, 12.5);
    controller.go_back();
    assert_eq!(controller.ui.route(), &Route::Home);
}

#[test]
fn time_range_change_refetches_history_with_its_day_count() {
    let server = StubServer::start(vec![
        (
            "GET /api/metrics/41",
            "200 OK",
            r#"{"id": 41, "name": "ARPU"}"#.to_string(),
        ),
        (
            "GET /api/metrics/41/timeseries",
            "200 OK",
            r#"[{"timestamp": "2024-12-01T00:00:00Z", "value": 3.0}]"#.to_string(),
        ),
    ]);
    let mut controller = controller_for(&server);
    controller.navigate(Route::MetricDetail(41));
    wait_until(&mut controller, |c| {
        c.ui.metrics.detail.record.is_some() && !c.ui.metrics.timeseries.is_empty()
    });
    let first: Vec<String> = server
        .drain()
        .into_iter()
        .filter(|request| request.path() == "/api/metrics/41/timeseries")
        .map(|request| request.target)
        .collect();
    assert_eq!(first, vec!["/api/metrics/41/timeseries?limit=30".to_string()]);

    controller.set_time_range(TimeRange::Quarter);
    assert!(controller.ui.metrics.timeseries.is_empty());
    wait_until(&mut controller, |c| !c.ui.metrics.timeseries.is_empty());
    let targets: Vec<String> = server
        .drain()
        .into_iter()
        .map(|request| request.target)
        .collect();
    assert_eq!(targets, vec!["/api/metrics/41/timeseries?limit=90".to_string()]);

    controller.set_time_range(TimeRange::Quarter);
    assert!(!controller.ui.metrics.timeseries.is_empty());
}

#[test]
fn export_writes_only_matching_rows() {
    let server = StubServer::start(metric_routes());
    let mut controller = controller_for(&server);
    controller.navigate(Route::Metrics);
    wait_until(&mut controller, |c| c.ui.metrics.list.loaded);
    controller
        .ui
        .metrics
        .list
        .query
        .set_search("dau");

    controller.open_export(ExportTarget::Metrics);
    controller.drop_export_column("name", true);
    controller.drop_export_column("priority", true);
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("metrics.csv");
    controller.export_to(&path);

    assert!(controller.ui.export.is_none());
    assert_eq!(controller.last_export(), Some(&path));
    let written = std::fs::read_to_string(&path).expect("csv written");
    assert_eq!(written.trim_start_matches('\u{feff}'), "Name,Priority\nDAU,P1\n");
}

#[test]
fn visited_route_is_remembered_in_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let _env = DatahubEnvGuard::set_config_home(temp.path().to_path_buf());
    let server = StubServer::start(Vec::new());
    let path = config::config_path().expect("config path");
    assert!(path.starts_with(temp.path()));

    let mut settings = AppSettings::default();
    settings.api.base_url = server.base_url.clone();
    let mut controller = EguiController::new(settings, Some(path.clone()));
    controller.navigate(Route::SegmentNew);

    let saved = config::load_from_path(&path).expect("saved settings");
    assert_eq!(saved.last_route.as_deref(), Some("/segments/new"));
    let reopened = EguiController::new(saved, None);
    assert_eq!(reopened.ui.route(), &Route::SegmentNew);
}
