use std::{path::PathBuf, time::Duration};

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use rand::Rng;
use tokio::{sync::mpsc, time::sleep};

use crate::{
    data::client::ImagePayload,
    domain::{DateInterval, ForecastId, ForecastRef, ModelInfo, RawMetric},
    resilience::staleness::Ticket,
};

/// What a metrics request was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsKey {
    pub model_code: String,
    pub interval: DateInterval,
}

pub type ImageKey = (ForecastId, u32);

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    TickRefresh,
    RetryModels,
    Input(Event),
    ModelsLoaded(Result<Vec<ModelInfo>, String>),
    ForecastsLoaded {
        ticket: Ticket<String>,
        result: Result<Vec<ForecastRef>, String>,
    },
    SizeLoaded {
        ticket: Ticket<ForecastId>,
        result: Result<Option<i64>, String>,
    },
    MetricsLoaded {
        ticket: Ticket<MetricsKey>,
        result: Result<Vec<RawMetric>, String>,
    },
    ImageLoaded {
        ticket: Ticket<ImageKey>,
        result: Result<ImagePayload, String>,
    },
    DownloadFinished(Result<PathBuf, String>),
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

/// Periodic metrics refresh with ±10% jitter so several viewers do not hit
/// the API in lockstep.
pub fn start_refresh_task(tx: mpsc::Sender<AppEvent>, refresh_secs: u64) {
    tokio::spawn(async move {
        let base = refresh_secs.max(30);
        loop {
            let wait_secs = {
                let mut rng = rand::rng();
                let jitter = rng.random_range(-0.1f32..0.1f32);
                ((base as f32) * (1.0 + jitter)).max(1.0)
            };
            sleep(Duration::from_secs_f32(wait_secs)).await;
            if tx.send(AppEvent::TickRefresh).await.is_err() {
                break;
            }
        }
    });
}

pub fn schedule_retry(tx: mpsc::Sender<AppEvent>, delay: Duration) {
    tokio::spawn(async move {
        sleep(delay).await;
        let _ = tx.send(AppEvent::RetryModels).await;
    });
}
