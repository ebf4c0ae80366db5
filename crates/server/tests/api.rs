//! HTTP tests for the diurnal server router

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use server::{build_state, router, ServerConfig};
use std::time::Duration;
use tower::ServiceExt;

const BOUNDARY: &str = "diurnal-test-boundary";

fn app() -> Router {
    app_with(ServerConfig::default())
}

fn app_with(config: ServerConfig) -> Router {
    router(build_state(&config).unwrap())
}

fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload(uri: &str, field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, file_name, content)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn hourly_csv() -> Vec<u8> {
    let mut csv = String::from("timestamp,cpu,memory\n");
    for hour in 0..24 {
        csv.push_str(&format!(
            "2024-01-01 {:02}:00:00,{},{}\n",
            hour,
            40.5 + hour as f64,
            70.5 - hour as f64
        ));
    }
    csv.into_bytes()
}

fn hourly_requests_csv() -> Vec<u8> {
    let mut csv = String::from("timestamp,requests\n");
    for hour in 0..24 {
        csv.push_str(&format!(
            "2024-01-01 {:02}:00:00,{}\n",
            hour,
            300.5 + 10.0 * hour as f64
        ));
    }
    csv.into_bytes()
}

/// 15-minute requests series: trend plus a period-4 pattern.
fn requests_records(points: usize) -> Vec<Value> {
    let base: i64 = 1_704_067_200_000;
    let pattern = [3.0, -1.0, 4.0, -2.0];
    (0..points)
        .map(|i| {
            serde_json::json!({
                "timestamp": base + i as i64 * 15 * 60 * 1000,
                "requests": 200.0 + i as f64 + pattern[i % 4],
            })
        })
        .collect()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();

    let (status, json) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "alive");

    let (status, json) = send(&app, get("/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "alive");

    let (status, json) = send(&app, get("/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ready");
    assert_eq!(json["models"]["cpu"], false);
    assert_eq!(json["models"]["requests"], false);
}

// ============================================================================
// Fit and predict
// ============================================================================

#[tokio::test]
async fn test_fit_then_predict() {
    let app = app();

    let (status, json) = send(&app, upload("/fit-model", "file", "day.csv", &hourly_csv())).await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["cpu_model"], "Model fitted for CPU");
    assert_eq!(json["memory_model"], "Model fitted for memory");
    assert!(json.get("requests_model").is_none());

    let (status, json) =
        send(&app, get("/predict?type=resource&timestamp=2024-01-01T10:00:00")).await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["cpu"], 50);
    assert_eq!(json["memory"], 60);

    let (status, json) =
        send(&app, get("/predict?type=requests&timestamp=2024-01-01T10:00:00")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Requests model is not loaded");

    let (status, json) =
        send(&app, upload("/fit-model", "file", "requests.csv", &hourly_requests_csv())).await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["requests_model"], "Model fitted for requests");

    let (status, json) =
        send(&app, get("/predict?type=requests&timestamp=2024-01-01%2010:00:00")).await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["requests"], 400);

    let (_, json) = send(&app, get("/health/ready")).await;
    assert_eq!(json["models"]["memory"], true);

    let (status, json) = send(&app, get("/models")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 3);
    assert_eq!(json[0]["metric"], "cpu");
    assert_eq!(json[0]["degree"], 4);
}

#[tokio::test]
async fn test_fit_json_upload() {
    let body = serde_json::to_vec(&requests_records(96)).unwrap();
    let app = app();

    let (status, json) = send(&app, upload("/fit-model", "file", "load.json", &body)).await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["requests_model"], "Model fitted for requests");
    assert!(json.get("cpu_model").is_none());
}

#[tokio::test]
async fn test_fit_timestamp_only_is_soft_error() {
    let (status, json) = send(
        &app(),
        upload("/fit-model", "file", "bare.csv", b"timestamp\n2024-01-01 00:00:00\n"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["error"], "Required columns not found");
}

#[tokio::test]
async fn test_fit_rejections() {
    let app = app();

    let (status, json) =
        send(&app, upload("/fit-model", "attachment", "day.csv", &hourly_csv())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file provided");

    let (status, json) = send(&app, upload("/fit-model", "file", "day.xlsx", &hourly_csv())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Unsupported file type"));

    let (status, json) =
        send(&app, upload("/fit-model", "file", "day.csv", b"time,cpu,memory\nx,1,2\n")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "CSV/JSON must contain timestamp column");
}

#[tokio::test]
async fn test_predict_errors() {
    let app = app();

    let (status, json) =
        send(&app, get("/predict?type=resource&timestamp=2024-01-01T10:00:00")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "CPU or Memory model is not loaded");

    let (status, json) = send(&app, get("/predict?type=requests")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No timestamp provided");

    let (status, json) = send(&app, get("/predict?type=requests&timestamp=bad-date")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid timestamp format"));

    let (status, json) = send(&app, get("/predict?type=disk&timestamp=2024-01-01T10:00:00")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid prediction type"));
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn test_forecast_json_body() {
    let body = serde_json::to_vec(&requests_records(40)).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/forecast")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let (status, json) = send(&app(), request).await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["timestamp"], "2024-01-01 10:00:00");
    assert!((json["requests"].as_f64().unwrap() - 243.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_forecast_multipart_csv() {
    let pattern = [3.0, -1.0, 4.0, -2.0];
    let mut csv = String::from("timestamp,requests\n");
    for i in 0..40 {
        csv.push_str(&format!(
            "2024-01-01 {:02}:{:02}:00,{}\n",
            i / 4,
            (i % 4) * 15,
            200.0 + i as f64 + pattern[i % 4]
        ));
    }

    // No extension: read as CSV
    let (status, json) = send(&app(), upload("/forecast", "file", "upload", csv.as_bytes())).await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["timestamp"], "2024-01-01 10:00:00");
    assert!(json["requests"].as_f64().unwrap().is_finite());
}

#[tokio::test]
async fn test_forecast_without_payload() {
    let request = Request::builder()
        .method("POST")
        .uri("/forecast")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file provided");
}

#[tokio::test]
async fn test_forecast_hourly_series_strict_and_lenient() {
    let mut csv = String::from("timestamp,requests\n");
    for hour in 0..48 {
        csv.push_str(&format!(
            "2024-01-{:02} {:02}:00:00,{}\n",
            1 + hour / 24,
            hour % 24,
            100.0 + (hour % 4) as f64 * 3.0 + hour as f64 * 0.5
        ));
    }

    let (status, json) =
        send(&app(), upload("/forecast", "file", "hourly.csv", csv.as_bytes())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Incompatible sampling interval"));

    let lenient = app_with(ServerConfig {
        strict_interval: false,
        ..ServerConfig::default()
    });
    let (status, json) =
        send(&lenient, upload("/forecast", "file", "hourly.csv", csv.as_bytes())).await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["timestamp"], "2024-01-02 23:15:00");
}

#[tokio::test]
async fn test_forecast_short_history() {
    let body = serde_json::to_vec(&requests_records(10)).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/forecast")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let (status, json) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Insufficient history"));
}

#[tokio::test]
async fn test_forecast_deadline() {
    let app = app_with(ServerConfig {
        fit_timeout: Duration::ZERO,
        ..ServerConfig::default()
    });
    let body = serde_json::to_vec(&requests_records(672)).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/forecast")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["error"], "Model fit exceeded the 0s timeout");
}

#[tokio::test]
async fn test_timed_out_fit_publishes_nothing() {
    let app = app_with(ServerConfig {
        fit_timeout: Duration::ZERO,
        ..ServerConfig::default()
    });

    let (status, json) = send(&app, upload("/fit-model", "file", "day.csv", &hourly_csv())).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["error"], "Model fit exceeded the 0s timeout");

    // Let the abandoned blocking fit run to completion
    tokio::time::sleep(Duration::from_millis(500)).await;

    let uri = "/predict?type=resource&timestamp=2024-01-01T10:00:00";
    let (status, json) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "CPU or Memory model is not loaded");

    let (_, json) = send(&app, get("/health/ready")).await;
    assert_eq!(json["models"]["cpu"], false);
}
