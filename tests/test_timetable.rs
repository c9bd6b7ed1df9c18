use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use figment::providers::Env;
use figment::providers::Format;
use figment::providers::Json;
use figment::Figment;
use lib::timetable::error::{FetchError, RunError};
use lib::timetable::helpers::{get_timetable, try_get_timetable};
use lib::timetable::models::lesson_model::{LessonType, TimetableResponse};
use lib::timetable::models::{Args, Config, TimetableQuery, Upstream, BUNDLE_VERSION};
use lib::timetable::run_tool::run;
use lib::timetable::schema::validate;
use lib::timetable::timetable_getter::TimetableGetter;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub struct TestGetter {
    pub timetable_path: String,
    // (token, query) of every call, to check what the runner asked for
    pub calls: Arc<Mutex<Vec<(String, TimetableQuery)>>>,
}

impl TimetableGetter for TestGetter {
    async fn get_timetable(
        &self,
        _upstream: &Upstream,
        token: &str,
        query: &TimetableQuery,
    ) -> Result<TimetableResponse, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((token.to_owned(), query.clone()));
        let raw = std::fs::read_to_string(&self.timetable_path).unwrap();
        let json: Value = serde_json::from_str(&raw)?;
        validate(json)
    }
}

fn test_getter() -> TestGetter {
    TestGetter {
        timetable_path: "tests/test.timetable.json".to_string(),
        calls: Arc::new(Mutex::new(Vec::new())),
    }
}

fn args(summary: bool) -> Args {
    Args {
        config_json_path: PathBuf::from("example.config.json"),
        student_id: None,
        start: None,
        end: None,
        summary,
    }
}

fn read_config(args: &Args) -> Config {
    Figment::new()
        .merge(Json::file(&args.config_json_path))
        .merge(Env::prefixed("SM_"))
        .extract()
        .unwrap()
}

#[derive(Default)]
struct Captured {
    headers: Vec<HeaderMap>,
    bodies: Vec<Value>,
}

struct MockUpstream {
    status: StatusCode,
    reply: String,
    captured: Mutex<Captured>,
}

async fn calls(
    State(upstream): State<Arc<MockUpstream>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    {
        let mut captured = upstream.captured.lock().unwrap();
        captured.headers.push(headers);
        captured
            .bodies
            .push(serde_json::from_str(&body).unwrap_or(Value::Null));
    }
    (
        upstream.status,
        [(header::CONTENT_TYPE, "application/json")],
        upstream.reply.clone(),
    )
}

/// Serve `reply` on `/api/calls` of a random local port.
async fn spawn_upstream(status: StatusCode, reply: String) -> (Upstream, Arc<MockUpstream>) {
    let state = Arc::new(MockUpstream {
        status,
        reply,
        captured: Mutex::new(Captured::default()),
    });
    let app = Router::new()
        .route("/api/calls", post(calls))
        .with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let upstream = Upstream {
        url: format!("http://{}/api/calls", addr),
        bundle_version: BUNDLE_VERSION.to_owned(),
    };
    (upstream, state)
}

fn query() -> TimetableQuery {
    TimetableQuery {
        student_id: 123,
        start: "2024-01-01".to_owned(),
        end: "2024-01-07".to_owned(),
    }
}

#[tokio::test]
async fn test_run_prints_validated_json() {
    let args = args(false);
    let config = read_config(&args);
    let getter = test_getter();
    let calls = getter.calls.clone();

    let rendered = run(getter, &args, config).await.unwrap();

    let printed: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(printed["results"][0]["status"], 200);
    assert_eq!(printed["results"][0]["data"].as_array().unwrap().len(), 5);
    // unknown upstream fields are not carried over
    assert!(printed["results"][0]["data"][1].get("comment").is_none());
    assert!(printed["results"][0]["data"][3].get("event").is_none());

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "eyJhbGciOiJIUzI1NiJ9.example.signature");
    assert_eq!(
        calls[0].1,
        TimetableQuery {
            student_id: 4711,
            start: "2024-01-08".to_owned(),
            end: "2024-01-12".to_owned(),
        }
    );
}

#[tokio::test]
async fn test_run_prints_summary_with_overrides() {
    let mut args = args(true);
    args.student_id = Some(42);
    args.end = Some("2024-01-31".to_owned());
    let config = read_config(&args);
    let getter = test_getter();
    let calls = getter.calls.clone();

    let rendered = run(getter, &args, config).await.unwrap();

    assert_eq!(rendered.lines().count(), 5);
    assert!(rendered.lines().nth(1).unwrap().ends_with("[substitution]"));
    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].1.student_id, 42);
    assert_eq!(calls[0].1.start, "2024-01-08");
    assert_eq!(calls[0].1.end, "2024-01-31");
}

#[tokio::test]
async fn test_run_propagates_validation_failure() {
    let args = args(false);
    let config = read_config(&args);
    let getter = TestGetter {
        timetable_path: "example.config.json".to_string(),
        calls: Arc::new(Mutex::new(Vec::new())),
    };

    let err = run(getter, &args, config).await.unwrap_err();
    match err {
        RunError::Fetch(FetchError::Validation(errors)) => {
            assert!(errors.violations().iter().any(|v| v.path.is_empty()
                && v.message.contains("results")))
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_sends_expected_request() {
    let reply = std::fs::read_to_string("tests/test.timetable.json").unwrap();
    let (upstream, mock) = spawn_upstream(StatusCode::OK, reply).await;
    let http_client = reqwest::Client::new();

    let timetable = try_get_timetable(&http_client, &upstream, "secret-jwt", &query())
        .await
        .unwrap();
    assert_eq!(timetable.lessons().count(), 5);
    assert_eq!(
        timetable.lessons().nth(2).unwrap().lesson_type,
        LessonType::CancelledLesson
    );

    let captured = mock.captured.lock().unwrap();
    assert_eq!(captured.headers.len(), 1);
    let headers = &captured.headers[0];
    assert_eq!(headers[header::AUTHORIZATION], "Bearer secret-jwt");
    assert_eq!(headers[header::ACCEPT], "application/json, text/plain, */*");
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        captured.bodies[0],
        json!({
            "bundleVersion": "b413412dfd",
            "requests": [{
                "moduleName": "schedules",
                "endpointName": "get-actual-lessons",
                "parameters": { "student": { "id": 123 }, "start": "2024-01-01", "end": "2024-01-07" }
            }]
        })
    );
}

#[tokio::test]
async fn test_client_is_a_timetable_getter() {
    let reply = std::fs::read_to_string("tests/test.timetable.json").unwrap();
    let (upstream, _mock) = spawn_upstream(StatusCode::OK, reply).await;
    let http_client = reqwest::Client::new();

    let timetable = http_client
        .get_timetable(&upstream, "secret-jwt", &query())
        .await
        .unwrap();
    assert_eq!(timetable.results.len(), 1);
}

#[tokio::test]
async fn test_fetch_reports_non_json_body() {
    let (upstream, _mock) =
        spawn_upstream(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>".to_owned()).await;
    let http_client = reqwest::Client::new();

    let result = try_get_timetable(&http_client, &upstream, "secret-jwt", &query()).await;
    assert!(matches!(result, Err(FetchError::Decode(_))));
    assert!(get_timetable(&http_client, &upstream, "secret-jwt", &query())
        .await
        .is_none());
}

#[tokio::test]
async fn test_fetch_reports_schema_violations() {
    let reply = json!({
        "results": [{
            "status": 200,
            "data": [{
                "date": "2024-13-40",
                "classHour": { "id": "1", "number": "1" },
                "type": "regularLesson"
            }]
        }]
    })
    .to_string();
    let (upstream, _mock) = spawn_upstream(StatusCode::OK, reply).await;
    let http_client = reqwest::Client::new();

    let result = try_get_timetable(&http_client, &upstream, "secret-jwt", &query()).await;
    match result {
        Err(FetchError::Validation(errors)) => {
            let mut paths = errors.paths().collect::<Vec<_>>();
            paths.sort_unstable();
            assert_eq!(
                paths,
                vec!["/results/0/data/0/classHour/id", "/results/0/data/0/date"]
            );
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_validates_json_error_body() {
    let reply = json!({ "error": "unauthorized" }).to_string();
    let (upstream, _mock) = spawn_upstream(StatusCode::UNAUTHORIZED, reply).await;
    let http_client = reqwest::Client::new();

    let result = try_get_timetable(&http_client, &upstream, "expired", &query()).await;
    assert!(matches!(result, Err(FetchError::Validation(_))));
}
