use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{NaiveDate, NaiveTime};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use crate::api;
use crate::fetch::{FetchError, TrackParser};
use crate::state::AppState;
use igc_core::models::{GeoPoint, Track};

const URL_A: &str = "http://tracks.example.com/madrid-to-jerez.igc";
const URL_B: &str = "http://tracks.example.com/boavista-medellin.igc";

/// Parser stub backed by a fixed URL-to-track table. No network involved.
struct StubParser {
    tracks: HashMap<String, Track>,
}

#[async_trait]
impl TrackParser for StubParser {
    async fn parse(&self, url: &str) -> Result<Track, FetchError> {
        self.tracks
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))
    }
}

fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint {
        lat,
        lon,
        altitude_m: 500.0,
        pressure_altitude_m: 480.0,
        time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
    }
}

fn setup_app() -> (axum::Router, Arc<AppState>) {
    let mut tracks = HashMap::new();
    tracks.insert(
        URL_A.to_string(),
        Track {
            pilot: "John Doe".to_string(),
            glider: "ASK-21".to_string(),
            glider_id: "D-1234".to_string(),
            date: NaiveDate::from_ymd_opt(2016, 2, 19).unwrap(),
            // One degree of latitude, ~111.19 km
            points: vec![point(0.0, 0.0), point(1.0, 0.0)],
        },
    );
    tracks.insert(
        URL_B.to_string(),
        Track {
            pilot: "Jane Roe".to_string(),
            glider: "LS-4".to_string(),
            glider_id: "N-42".to_string(),
            date: NaiveDate::from_ymd_opt(2018, 6, 3).unwrap(),
            points: Vec::new(),
        },
    );

    let state = Arc::new(AppState::new(Arc::new(StubParser { tracks })));
    let app = api::router().with_state(state.clone());
    (app, state)
}

fn submit_request(url: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/igcinfo/api/igc")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "url": url }).to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse json")
}

async fn read_text(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn service_info_reports_uptime_and_version() {
    let (app, _state) = setup_app();

    let response = app.oneshot(get_request("/igcinfo/api")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let body = read_json(response).await;
    assert_eq!(body["info"], "Service for IGC tracks.");
    assert_eq!(body["version"], "v1");
    let uptime = body["uptime"].as_str().expect("uptime string");
    assert!(uptime.starts_with('P'), "unexpected uptime {uptime}");
}

#[tokio::test]
async fn submit_assigns_monotonic_ids() {
    let (app, _state) = setup_app();

    let first = app.clone().oneshot(submit_request(URL_A)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(read_json(first).await, json!({ "id": "igc1" }));

    let second = app.clone().oneshot(submit_request(URL_B)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(read_json(second).await, json!({ "id": "igc2" }));
}

#[tokio::test]
async fn resubmitting_a_url_is_idempotent() {
    let (app, state) = setup_app();

    let first = app.clone().oneshot(submit_request(URL_A)).await.unwrap();
    let first_id = read_json(first).await["id"].as_str().unwrap().to_string();

    let again = app.clone().oneshot(submit_request(URL_A)).await.unwrap();
    assert_eq!(again.status(), StatusCode::OK);
    assert_eq!(read_json(again).await["id"], first_id.as_str());

    assert_eq!(state.registry().len(), 1);
}

#[tokio::test]
async fn submit_surfaces_parse_failure_without_registry_mutation() {
    let (app, state) = setup_app();

    let response = app
        .clone()
        .oneshot(submit_request("http://tracks.example.com/unknown.igc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].is_string());

    assert!(state.registry().is_empty());

    // The service keeps serving after the failure
    let info = app.oneshot(get_request("/igcinfo/api")).await.unwrap();
    assert_eq!(info.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_body_is_rejected_before_the_registry() {
    let (app, state) = setup_app();

    let garbage = Request::builder()
        .method("POST")
        .uri("/igcinfo/api/igc")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(garbage).await.unwrap();
    assert!(response.status().is_client_error());

    let missing_field = Request::builder()
        .method("POST")
        .uri("/igcinfo/api/igc")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "link": "http://example.com" }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(missing_field).await.unwrap();
    assert!(response.status().is_client_error());

    assert!(state.registry().is_empty());
}

#[tokio::test]
async fn list_returns_every_known_id() {
    let (app, _state) = setup_app();

    let empty = app.clone().oneshot(get_request("/igcinfo/api/igc")).await.unwrap();
    assert_eq!(empty.status(), StatusCode::OK);
    assert_eq!(read_json(empty).await, json!([]));

    app.clone().oneshot(submit_request(URL_A)).await.unwrap();
    app.clone().oneshot(submit_request(URL_B)).await.unwrap();

    let response = app.oneshot(get_request("/igcinfo/api/igc")).await.unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let body = read_json(response).await;
    let mut ids: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["igc1", "igc2"]);
}

#[tokio::test]
async fn detail_returns_the_stored_track() {
    let (app, _state) = setup_app();
    app.clone().oneshot(submit_request(URL_A)).await.unwrap();

    let response = app
        .oneshot(get_request("/igcinfo/api/igc/igc1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(
        read_json(response).await,
        json!({
            "H_date": "2016-02-19",
            "pilot": "John Doe",
            "glider": "ASK-21",
            "glider_id": "D-1234",
            "track_length": "111.19",
        })
    );
}

#[tokio::test]
async fn field_projection_matches_the_detail_response() {
    let (app, _state) = setup_app();
    app.clone().oneshot(submit_request(URL_A)).await.unwrap();

    let detail = read_json(
        app.clone()
            .oneshot(get_request("/igcinfo/api/igc/igc1"))
            .await
            .unwrap(),
    )
    .await;

    for field in ["pilot", "glider", "glider_id", "track_length", "H_date"] {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/igcinfo/api/igc/igc1/{field}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_text(response).await, detail[field].as_str().unwrap());
    }
}

#[tokio::test]
async fn unknown_id_returns_not_found_with_empty_body() {
    let (app, _state) = setup_app();
    app.clone().oneshot(submit_request(URL_A)).await.unwrap();

    let detail = app
        .clone()
        .oneshot(get_request("/igcinfo/api/igc/igc999"))
        .await
        .unwrap();
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
    assert!(read_text(detail).await.is_empty());

    let field = app
        .oneshot(get_request("/igcinfo/api/igc/igc999/pilot"))
        .await
        .unwrap();
    assert_eq!(field.status(), StatusCode::NOT_FOUND);
    assert!(read_text(field).await.is_empty());
}

#[tokio::test]
async fn malformed_ids_and_fields_are_not_found() {
    let (app, _state) = setup_app();
    app.clone().oneshot(submit_request(URL_A)).await.unwrap();

    // Too short, too long, and non-alphanumeric IDs
    for id in ["ab", "abcdefghijk", "igc-1"] {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/igcinfo/api/igc/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "id {id}");
    }

    let response = app
        .oneshot(get_request("/igcinfo/api/igc/igc1/altitude"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unrouted_paths_fall_through_to_not_found() {
    let (app, _state) = setup_app();
    app.clone().oneshot(submit_request(URL_A)).await.unwrap();

    for uri in [
        "/",
        "/igcinfo",
        "/igcinfo/api/",
        "/igcinfo/api/igc/igc1/pilot/extra",
        "/api/igc",
    ] {
        let response = app.clone().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {uri}");
        assert!(read_text(response).await.is_empty(), "uri {uri}");
    }
}
