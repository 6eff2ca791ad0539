//! In-process stand-in for the forecast provider.
//!
//! Behavior is keyed off the query string:
//! - any key other than [`GOOD_KEY`] gets a 401 with a provider error body
//! - `q=0,0` answers 200 with a body missing required fields
//! - `q=5,5` answers 502 with a plain-text body
//! - `q=9,9` never answers within a test's timeout
//! - anything else gets the fixture, cut to `days` entries

#![allow(dead_code)]

use std::{collections::HashMap, time::Duration};

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const FIXTURE: &str = include_str!("../fixtures/forecast_3days.json");
pub const GOOD_KEY: &str = "GOOD";
pub const MALFORMED_LOCATION: &str = "0,0";
pub const BAD_GATEWAY_LOCATION: &str = "5,5";
pub const SLOW_LOCATION: &str = "9,9";

async fn forecast(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("key").map(String::as_str) != Some(GOOD_KEY) {
        let body = json!({ "error": { "code": 2006, "message": "API key is invalid." } });
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    match params.get("q").map(String::as_str) {
        Some(MALFORMED_LOCATION) => {
            return (StatusCode::OK, r#"{"location":{"name":"Null Island"}}"#).into_response();
        }
        Some(BAD_GATEWAY_LOCATION) => {
            return (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response();
        }
        Some(SLOW_LOCATION) => tokio::time::sleep(Duration::from_secs(30)).await,
        _ => {}
    }

    let days: usize = params.get("days").and_then(|d| d.parse().ok()).unwrap_or(1);
    let mut body: Value = serde_json::from_str(FIXTURE).expect("fixture is valid JSON");
    if let Some(list) = body["forecast"]["forecastday"].as_array_mut() {
        list.truncate(days);
    }

    Json(body).into_response()
}

/// Start the mock provider on a random port and return its base URL.
pub async fn spawn_provider() -> String {
    let app = Router::new().route("/v1/forecast.json", get(forecast));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock provider");
    });

    format!("http://{addr}/v1")
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    format!("http://{addr}/v1")
}
