#![allow(dead_code)]

use std::time::Duration;

use clap::Parser;
use gim_viewer::{
    app::{events::AppEvent, state::AppState},
    cli::Cli,
};
use serde_json::json;
use tokio::{sync::mpsc, time::timeout};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub fn cli_for(server: &MockServer, extra: &[&str]) -> Cli {
    let mut args = vec![
        "gim-viewer".to_string(),
        "--no-persist".to_string(),
        "--api-url".to_string(),
        server.uri(),
    ];
    args.extend(extra.iter().map(ToString::to_string));
    Cli::parse_from(args)
}

pub fn models_body() -> serde_json::Value {
    json!([
        { "code": "gim-a", "name": "Model A" },
        { "code": "gim-b" }
    ])
}

pub fn forecasts_body() -> serde_json::Value {
    json!([
        { "id": 101, "forecast_start_date": "2024-01-03T00:00:00" },
        { "id": 102, "forecast_start_date": "2024-01-05T00:00:00" },
        { "id": 103, "forecast_start_date": "2024-01-05T12:00:00" }
    ])
}

pub fn metrics_body() -> serde_json::Value {
    json!([
        { "forecast_start_date": "2024-01-02T00:00:00", "rmse": 2.5, "mae": 1.25, "mape": 12.0 },
        { "forecast_start_date": "2024-01-04T00:00:00", "rmse": 3.0 }
    ])
}

/// Mounts a complete, well-behaved API for model `gim-a`.
pub async fn mount_api(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(models_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_forecasts/gim-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecasts_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_forecast_size/101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "size": 6 })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_metrics/gim-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(metrics_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_forecast_image/101"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![0x89, b'P', b'N', b'G']),
        )
        .mount(server)
        .await;
}

/// Feeds events back into `app` until `done` holds or nothing arrives for
/// two seconds.
pub async fn pump_until(
    app: &mut AppState,
    cli: &Cli,
    tx: &mpsc::Sender<AppEvent>,
    rx: &mut mpsc::Receiver<AppEvent>,
    done: impl Fn(&AppState) -> bool,
) -> bool {
    while !done(app) {
        match timeout(Duration::from_secs(2), rx.recv()).await {
            Ok(Some(event)) => app
                .handle_event(event, tx, cli)
                .await
                .expect("event handled"),
            _ => return false,
        }
    }
    true
}
