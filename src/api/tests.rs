use super::*;
use crate::forms::PriorityUpdate;
use crate::http_client::test_server::{json_response, serve_once};
use crate::model::{ExperimentStatus, Priority};

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(&ApiSettings {
        base_url: base_url.to_string(),
        request_timeout_secs: 5,
    })
}

fn request_line(raw: &str) -> &str {
    raw.lines().next().unwrap_or("")
}

#[test]
fn list_metrics_sends_filters_and_reads_paged_body() {
    let body = r#"{"total": 2, "items": [
        {"id": 1, "name": "CVR", "priority": "P0"},
        {"id": 2, "name": "DAU"}
    ]}"#;
    let (url, request) = serve_once(json_response("200 OK", body));
    let query = MetricQuery {
        search: Some("cvr".into()),
        category: Some("Revenue".into()),
        ..MetricQuery::default()
    };
    let list = client(&url).list_metrics(&query).unwrap();
    assert_eq!(list.total, 2);
    assert_eq!(list.items[0].priority, Some(Priority::P0));

    let raw = request.recv().unwrap();
    assert_eq!(
        request_line(&raw),
        "GET /api/metrics?limit=100&search=cvr&category=Revenue HTTP/1.1"
    );
}

#[test]
fn list_accepts_bare_arrays() {
    let (url, _) = serve_once(json_response("200 OK", r#"[{"id": 4, "title": "Win"}]"#));
    let list = client(&url).list_insights().unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.items[0].title, "Win");
}

#[test]
fn not_found_surfaces_detail() {
    let (url, _) = serve_once(json_response(
        "404 Not Found",
        r#"{"detail": "Metric not found"}"#,
    ));
    let err = client(&url).get_metric(99).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Metric not found");
}

#[test]
fn validation_errors_are_flattened() {
    let (url, _) = serve_once(json_response(
        "422 Unprocessable Entity",
        r#"{"detail": [{"loc": ["body", "name"], "msg": "field required"}]}"#,
    ));
    let update = PriorityUpdate {
        id: 3,
        priority: Some(Priority::P1),
    };
    let err = client(&url).update_metric_priority(&update).unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            code: 422,
            message: "body > name: field required".into()
        }
    );
}

#[test]
fn delete_ignores_message_body() {
    let (url, request) = serve_once(json_response(
        "200 OK",
        r#"{"message": "Segment deleted successfully"}"#,
    ));
    client(&url).delete_segment(5).unwrap();
    let raw = request.recv().unwrap();
    assert_eq!(request_line(&raw), "DELETE /api/segments/5 HTTP/1.1");
}

#[test]
fn experiment_status_filter_is_lowercase() {
    let (url, request) = serve_once(json_response("200 OK", "[]"));
    let list = client(&url)
        .list_experiments(None, Some(ExperimentStatus::Running))
        .unwrap();
    assert!(list.items.is_empty());
    let raw = request.recv().unwrap();
    assert_eq!(
        request_line(&raw),
        "GET /api/experiments?limit=100&status=running HTTP/1.1"
    );
}

#[test]
fn timeseries_passes_limit() {
    let body = r#"[{"timestamp": "2024-12-01T00:00:00", "value": 3.2, "visitor_count": 120}]"#;
    let (url, request) = serve_once(json_response("200 OK", body));
    let points = client(&url).metric_timeseries(7, 30).unwrap();
    assert_eq!(points.len(), 1);
    let raw = request.recv().unwrap();
    assert_eq!(
        request_line(&raw),
        "GET /api/metrics/7/timeseries?limit=30 HTTP/1.1"
    );
}

#[test]
fn malformed_json_is_a_decode_error() {
    let (url, _) = serve_once(json_response("200 OK", "{not json"));
    assert!(matches!(
        client(&url).metric_stats(),
        Err(ApiError::Decode(_))
    ));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = client(&format!("http://{addr}")).list_insights().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
