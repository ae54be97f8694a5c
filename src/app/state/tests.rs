use clap::Parser;
use crossterm::event::{KeyEvent, KeyModifiers};

use super::*;
use crate::{
    domain::{RawMetric, Timestamp},
    resilience::staleness::Ticket,
};

fn test_cli() -> Cli {
    Cli::parse_from([
        "gim-viewer",
        "--no-persist",
        "--api-url",
        "http://127.0.0.1:9",
    ])
}

fn day(y: i32, m: u32, d: u32) -> CalendarDay {
    CalendarDay::from_ymd(y, m, d).expect("valid day")
}

fn forecast(id: &str, start: &str) -> ForecastRef {
    ForecastRef {
        id: ForecastId::new(id),
        start_date: Timestamp::parse(start).expect("timestamp"),
        model_code: "gim-a".to_string(),
    }
}

fn models() -> Vec<ModelInfo> {
    vec![
        ModelInfo {
            code: "gim-a".to_string(),
            name: "Model A".to_string(),
        },
        ModelInfo {
            code: "gim-b".to_string(),
            name: "Model B".to_string(),
        },
    ]
}

fn payload(id: &str, shift: u32) -> ImagePayload {
    ImagePayload {
        forecast_id: ForecastId::new(id),
        shift: Some(shift),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

fn press(code: KeyCode) -> AppEvent {
    AppEvent::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn setup() -> (AppState, Cli, mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
    let cli = test_cli();
    let state = AppState::new(&cli);
    let (tx, rx) = mpsc::channel(64);
    (state, cli, tx, rx)
}

#[tokio::test]
async fn models_loaded_prefers_remembered_model() {
    let (mut state, cli, tx, _rx) = setup();
    state.settings.last_model = Some("gim-b".to_string());

    state
        .handle_event(AppEvent::ModelsLoaded(Ok(models())), &tx, &cli)
        .await
        .expect("handle models");

    assert_eq!(state.mode, AppMode::Ready);
    assert_eq!(state.model_cursor, 1);
    assert_eq!(
        state.selected_model.as_ref().map(|m| m.code.as_str()),
        Some("gim-b")
    );
    assert!(state.forecasts_loading());
    assert!(state.metrics_loading());
}

#[tokio::test]
async fn model_failure_schedules_a_retry() {
    let (mut state, cli, tx, _rx) = setup();
    state
        .handle_event(AppEvent::ModelsLoaded(Err("boom".to_string())), &tx, &cli)
        .await
        .expect("handle failure");

    assert_eq!(state.mode, AppMode::Error);
    assert_eq!(state.last_error.as_deref(), Some("boom"));
    assert!(
        state
            .status
            .as_deref()
            .is_some_and(|status| status.starts_with("Retrying model list"))
    );
    assert_eq!(state.retry.attempts(), 1);
}

#[tokio::test]
async fn stale_forecast_list_is_dropped() {
    let (mut state, cli, tx, _rx) = setup();
    let stale = state.forecasts_guard.issue("gim-a".to_string());
    let fresh = state.forecasts_guard.issue("gim-b".to_string());

    state
        .handle_event(
            AppEvent::ForecastsLoaded {
                ticket: stale,
                result: Ok(vec![forecast("1", "2024-01-01T00:00:00")]),
            },
            &tx,
            &cli,
        )
        .await
        .expect("stale event");
    assert!(state.index.is_empty());
    assert!(state.forecasts_loading());

    state
        .handle_event(
            AppEvent::ForecastsLoaded {
                ticket: fresh,
                result: Ok(vec![
                    forecast("7", "2024-01-03T00:00:00"),
                    forecast("8", "2024-01-05T00:00:00"),
                ]),
            },
            &tx,
            &cli,
        )
        .await
        .expect("fresh event");
    assert_eq!(state.index.len(), 2);
    assert!(!state.forecasts_loading());
}

#[tokio::test]
async fn forecast_list_auto_selects_first_item() {
    let (mut state, _cli, tx, _rx) = setup();
    state.handle_forecasts_loaded(
        &tx,
        "gim-a",
        Ok(vec![
            forecast("7", "2024-01-03T00:00:00"),
            forecast("8", "2024-01-05T00:00:00"),
        ]),
    );

    assert_eq!(state.nav.forecast_id(), Some(&ForecastId::new("7")));
    assert_eq!(state.nav.shift(), 0);
    assert_eq!(state.calendar_cursor, day(2024, 1, 3));
    assert_eq!(state.size_guard.pending(), Some(&ForecastId::new("7")));
    assert_eq!(state.image, ImageView::Loading);
}

#[tokio::test]
async fn empty_forecast_list_leaves_nothing_selected() {
    let (mut state, _cli, tx, _rx) = setup();
    state.handle_forecasts_loaded(&tx, "gim-a", Ok(Vec::new()));

    assert!(state.nav.forecast_id().is_none());
    assert!(!state.size_loading());
    assert_eq!(state.image, ImageView::Empty);
    assert!(
        state
            .status
            .as_deref()
            .is_some_and(|status| status.contains("No forecasts"))
    );
}

#[tokio::test]
async fn stale_size_does_not_touch_navigation() {
    let (mut state, cli, tx, _rx) = setup();
    state.nav.select_forecast(ForecastId::new("b"));
    let stale = state.size_guard.issue(ForecastId::new("a"));
    let fresh = state.size_guard.issue(ForecastId::new("b"));

    state
        .handle_event(
            AppEvent::SizeLoaded {
                ticket: stale,
                result: Ok(Some(5)),
            },
            &tx,
            &cli,
        )
        .await
        .expect("stale size");
    assert_eq!(state.nav.forecast_size(), 24);

    state
        .handle_event(
            AppEvent::SizeLoaded {
                ticket: fresh,
                result: Ok(Some(5)),
            },
            &tx,
            &cli,
        )
        .await
        .expect("fresh size");
    assert_eq!(state.nav.forecast_size(), 5);
}

#[tokio::test]
async fn shrinking_size_resets_shift_and_reloads_image() {
    let (mut state, _cli, tx, _rx) = setup();
    state.nav.select_forecast(ForecastId::new("7"));
    assert!(state.nav.set_shift(10));
    state.images.insert(payload("7", 0));

    state.handle_size_loaded(&tx, Ok(Some(4)));

    assert_eq!(state.nav.forecast_size(), 4);
    assert_eq!(state.nav.shift(), 0);
    assert_eq!(state.image, ImageView::Ready(payload("7", 0)));
}

#[tokio::test]
async fn size_failure_falls_back_to_default() {
    let (mut state, _cli, tx, _rx) = setup();
    state.nav.select_forecast(ForecastId::new("7"));
    state.nav.size_loaded(48);
    assert!(state.nav.set_shift(30));

    state.handle_size_loaded(&tx, Err("timeout".to_string()));

    assert_eq!(state.nav.forecast_size(), 24);
    assert_eq!(state.nav.shift(), 0);
}

#[tokio::test]
async fn metrics_are_normalized_onto_requested_interval() {
    let (mut state, cli, tx, _rx) = setup();
    let interval = DateInterval::new(day(2024, 1, 1), day(2024, 1, 3)).expect("interval");
    let ticket = state.metrics_guard.issue(MetricsKey {
        model_code: "gim-a".to_string(),
        interval,
    });
    let raw = vec![RawMetric {
        date: Timestamp::parse("2024-01-02T00:00:00").expect("timestamp"),
        rmse: Some(1.5),
        mae: None,
        mape: None,
    }];

    state
        .handle_event(
            AppEvent::MetricsLoaded {
                ticket,
                result: Ok(raw),
            },
            &tx,
            &cli,
        )
        .await
        .expect("metrics");

    assert_eq!(state.metrics.len(), 3);
    assert_eq!(state.metrics[1].rmse, Some(1.5));
    assert!(state.metrics[0].is_empty());
    assert_eq!(state.metrics_range, interval);
}

#[tokio::test]
async fn stale_image_is_dropped() {
    let (mut state, cli, tx, _rx) = setup();
    let stale = state.image_guard.issue((ForecastId::new("7"), 0));
    let _fresh = state.image_guard.issue((ForecastId::new("7"), 1));
    state.image = ImageView::Loading;

    state
        .handle_event(
            AppEvent::ImageLoaded {
                ticket: stale,
                result: Ok(payload("7", 0)),
            },
            &tx,
            &cli,
        )
        .await
        .expect("stale image");

    assert_eq!(state.image, ImageView::Loading);
    assert!(state.images.is_empty());
}

#[tokio::test]
async fn calendar_enter_on_unavailable_day_is_inert() {
    let (mut state, cli, tx, _rx) = setup();
    state.index = AvailabilityIndex::build(vec![forecast("7", "2024-01-03T00:00:00")]);
    state.calendar_cursor = day(2024, 1, 4);
    state.focus = Focus::Calendar;

    state
        .handle_event(press(KeyCode::Enter), &tx, &cli)
        .await
        .expect("enter");

    assert!(state.nav.forecast_id().is_none());
    assert!(state.selected_forecast.is_none());
}

#[tokio::test]
async fn calendar_keys_jump_between_available_days() {
    let (mut state, cli, tx, _rx) = setup();
    state.index = AvailabilityIndex::build(vec![
        forecast("7", "2024-01-03T00:00:00"),
        forecast("8", "2024-01-09T00:00:00"),
    ]);
    state.calendar_cursor = day(2024, 1, 3);

    state
        .handle_event(press(KeyCode::Char('n')), &tx, &cli)
        .await
        .expect("next");
    assert_eq!(state.calendar_cursor, day(2024, 1, 9));

    state
        .handle_event(press(KeyCode::Enter), &tx, &cli)
        .await
        .expect("enter");
    assert_eq!(state.nav.forecast_id(), Some(&ForecastId::new("8")));

    state
        .handle_event(press(KeyCode::Up), &tx, &cli)
        .await
        .expect("up");
    assert_eq!(state.calendar_cursor, day(2024, 1, 2));
}

#[tokio::test]
async fn shift_keys_stay_in_range() {
    let (mut state, cli, tx, _rx) = setup();
    state.nav.select_forecast(ForecastId::new("7"));
    state.nav.size_loaded(3);
    state.focus = Focus::Shift;

    state
        .handle_event(press(KeyCode::Left), &tx, &cli)
        .await
        .expect("left");
    assert_eq!(state.nav.shift(), 0);

    state
        .handle_event(press(KeyCode::End), &tx, &cli)
        .await
        .expect("end");
    assert_eq!(state.nav.shift(), 2);

    state
        .handle_event(press(KeyCode::Right), &tx, &cli)
        .await
        .expect("right");
    assert_eq!(state.nav.shift(), 2);
}

#[tokio::test]
async fn quit_key_emits_quit_event() {
    let (mut state, cli, tx, mut rx) = setup();
    state
        .handle_event(press(KeyCode::Char('q')), &tx, &cli)
        .await
        .expect("quit key");
    let event = rx.recv().await.expect("quit event");
    assert!(matches!(event, AppEvent::Quit));

    state
        .handle_event(event, &tx, &cli)
        .await
        .expect("quit");
    assert_eq!(state.mode, AppMode::Quit);
    assert!(!state.running);
}

#[tokio::test]
async fn switching_model_discards_previous_selection() {
    let (mut state, _cli, tx, _rx) = setup();
    state.models = models();
    state.index = AvailabilityIndex::build(vec![forecast("7", "2024-01-03T00:00:00")]);
    state.select_forecast(&tx, forecast("7", "2024-01-03T00:00:00"));
    assert!(state.size_loading());

    state.select_model(&tx, 1);

    assert!(state.index.is_empty());
    assert!(state.nav.forecast_id().is_none());
    assert!(!state.size_loading());
    assert_eq!(state.image, ImageView::Empty);
    assert_eq!(state.forecasts_guard.pending().map(String::as_str), Some("gim-b"));
}

fn metrics_event(ticket: Ticket<MetricsKey>, result: Result<Vec<RawMetric>, String>) -> AppEvent {
    AppEvent::MetricsLoaded { ticket, result }
}

#[tokio::test]
async fn stale_metrics_are_dropped() {
    let (mut state, cli, tx, _rx) = setup();
    let january = DateInterval::new(day(2024, 1, 1), day(2024, 1, 3)).expect("interval");
    let february = DateInterval::new(day(2024, 2, 1), day(2024, 2, 5)).expect("interval");
    let stale = state.metrics_guard.issue(MetricsKey {
        model_code: "gim-a".to_string(),
        interval: january,
    });
    let _fresh = state.metrics_guard.issue(MetricsKey {
        model_code: "gim-b".to_string(),
        interval: february,
    });
    let before = state.metrics_range;
    let raw = vec![RawMetric {
        date: Timestamp::parse("2024-01-02T00:00:00").expect("timestamp"),
        rmse: Some(4.0),
        mae: Some(2.0),
        mape: None,
    }];

    state
        .handle_event(metrics_event(stale, Ok(raw)), &tx, &cli)
        .await
        .expect("stale metrics");

    assert!(state.metrics.is_empty());
    assert_eq!(state.metrics_range, before);
    assert!(state.metrics_loading());
}

#[tokio::test]
async fn later_success_clears_earlier_error() {
    let (mut state, cli, tx, _rx) = setup();
    let interval = DateInterval::new(day(2024, 1, 1), day(2024, 1, 3)).expect("interval");
    let key = MetricsKey {
        model_code: "gim-a".to_string(),
        interval,
    };

    let failed = state.metrics_guard.issue(key.clone());
    state
        .handle_event(metrics_event(failed, Err("boom".to_string())), &tx, &cli)
        .await
        .expect("failed metrics");
    assert_eq!(state.last_error.as_deref(), Some("boom"));

    let retried = state.metrics_guard.issue(key);
    state
        .handle_event(metrics_event(retried, Ok(Vec::new())), &tx, &cli)
        .await
        .expect("metrics");
    assert_eq!(state.last_error, None);
    assert_eq!(state.metrics.len(), 3);

    state.last_error = Some("earlier".to_string());
    let ticket = state.image_guard.issue((ForecastId::new("7"), 0));
    state
        .handle_event(
            AppEvent::ImageLoaded {
                ticket,
                result: Ok(payload("7", 0)),
            },
            &tx,
            &cli,
        )
        .await
        .expect("image");
    assert_eq!(state.last_error, None);
}

#[tokio::test]
async fn forecast_failure_replaces_loading_status() {
    let (mut state, cli, tx, _rx) = setup();
    state.models = models();
    state.select_model(&tx, 0);
    assert_eq!(state.status.as_deref(), Some("Loading forecasts for Model A..."));
    let ticket = state.forecasts_guard.issue("gim-a".to_string());

    state
        .handle_event(
            AppEvent::ForecastsLoaded {
                ticket,
                result: Err("gateway timeout".to_string()),
            },
            &tx,
            &cli,
        )
        .await
        .expect("forecast failure");

    assert_eq!(state.status, None);
    assert_eq!(state.last_error.as_deref(), Some("gateway timeout"));

    let ticket = state.forecasts_guard.issue("gim-a".to_string());
    state
        .handle_event(
            AppEvent::ForecastsLoaded {
                ticket,
                result: Ok(vec![forecast("7", "2024-01-03T00:00:00")]),
            },
            &tx,
            &cli,
        )
        .await
        .expect("forecast list");
    assert_eq!(state.last_error, None);
}

#[tokio::test]
async fn unknown_requested_model_is_reported() {
    let cli = Cli::parse_from([
        "gim-viewer",
        "--no-persist",
        "--api-url",
        "http://127.0.0.1:9",
        "--model",
        "gim-z",
    ]);
    let mut state = AppState::new(&cli);
    let (tx, _rx) = mpsc::channel(64);

    state
        .handle_event(AppEvent::ModelsLoaded(Ok(models())), &tx, &cli)
        .await
        .expect("handle models");

    assert_eq!(state.mode, AppMode::Ready);
    assert!(state.selected_model.is_none());
    assert_eq!(state.focus, Focus::Models);
    assert_eq!(state.last_error.as_deref(), Some("unknown model gim-z"));
    assert!(!state.forecasts_loading());

    state
        .handle_event(press(KeyCode::Enter), &tx, &cli)
        .await
        .expect("enter");
    assert_eq!(
        state.selected_model.as_ref().map(|m| m.code.as_str()),
        Some("gim-a")
    );
}

#[tokio::test]
async fn metrics_window_changes_only_when_data_arrives() {
    let (mut state, _cli, tx, _rx) = setup();
    let shown = DateInterval::new(day(2020, 5, 1), day(2020, 5, 9)).expect("interval");
    state.metrics_range = shown;
    state.selected_model = models().into_iter().next();

    state.refresh_metrics(&tx);

    assert!(state.metrics_loading());
    assert_eq!(state.metrics_range, shown);
}
