mod methods_async;
mod methods_fetch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    app::{
        events::{AppEvent, ImageKey, MetricsKey, schedule_retry, start_refresh_task},
        settings::{RuntimeSettings, load_runtime_settings, save_runtime_settings},
    },
    cli::Cli,
    data::{
        client::{GimClient, ImagePayload},
        download::save_archive,
        image_cache::ImageCache,
    },
    domain::{
        AvailabilityIndex, CalendarDay, DateInterval, ForecastId, ForecastRef, MetricRecord,
        ModelInfo, NavEffect, NavigationState, RawMetric, calendar::default_range_now,
        day_key_of, metrics::normalize,
    },
    resilience::{backoff::RetrySchedule, staleness::RequestGuard},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Loading,
    Ready,
    Error,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Models,
    Calendar,
    Shift,
}

impl Focus {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Focus::Models => Focus::Calendar,
            Focus::Calendar => Focus::Shift,
            Focus::Shift => Focus::Models,
        }
    }

    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Focus::Models => Focus::Shift,
            Focus::Calendar => Focus::Models,
            Focus::Shift => Focus::Calendar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageView {
    Empty,
    Loading,
    Ready(ImagePayload),
    Failed(String),
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub focus: Focus,
    pub help_open: bool,
    pub status: Option<String>,
    pub last_error: Option<String>,
    pub models: Vec<ModelInfo>,
    pub model_cursor: usize,
    pub selected_model: Option<ModelInfo>,
    pub index: AvailabilityIndex,
    pub selected_forecast: Option<ForecastRef>,
    pub calendar_cursor: CalendarDay,
    pub nav: NavigationState,
    pub metrics: Vec<MetricRecord>,
    pub metrics_range: DateInterval,
    pub image: ImageView,
    pub models_in_flight: bool,
    pub settings: RuntimeSettings,
    settings_path: Option<PathBuf>,
    requested_model: Option<String>,
    explicit_range: Option<DateInterval>,
    download_dir: PathBuf,
    client: GimClient,
    images: ImageCache,
    retry: RetrySchedule,
    forecasts_guard: RequestGuard<String>,
    size_guard: RequestGuard<ForecastId>,
    metrics_guard: RequestGuard<MetricsKey>,
    image_guard: RequestGuard<ImageKey>,
}

impl AppState {
    pub fn new(cli: &Cli) -> Self {
        let (settings, settings_path) = load_runtime_settings(cli, !cli.no_persist);
        let explicit_range = cli.explicit_range().ok().flatten();

        Self {
            mode: AppMode::Loading,
            running: true,
            focus: Focus::Calendar,
            help_open: false,
            status: Some("Loading models...".to_string()),
            last_error: None,
            models: Vec::new(),
            model_cursor: 0,
            selected_model: None,
            index: AvailabilityIndex::default(),
            selected_forecast: None,
            calendar_cursor: CalendarDay::today(),
            nav: NavigationState::default(),
            metrics: Vec::new(),
            metrics_range: explicit_range.unwrap_or_else(default_range_now),
            image: ImageView::Empty,
            models_in_flight: false,
            settings,
            settings_path,
            requested_model: cli.model.clone(),
            explicit_range,
            download_dir: cli.download_dir.clone(),
            client: GimClient::with_base_url(cli.api_url.clone()),
            images: ImageCache::default(),
            retry: RetrySchedule::default(),
            forecasts_guard: RequestGuard::default(),
            size_guard: RequestGuard::default(),
            metrics_guard: RequestGuard::default(),
            image_guard: RequestGuard::default(),
        }
    }

    #[must_use]
    pub fn forecasts_loading(&self) -> bool {
        self.forecasts_guard.is_pending()
    }

    #[must_use]
    pub fn metrics_loading(&self) -> bool {
        self.metrics_guard.is_pending()
    }

    #[must_use]
    pub fn size_loading(&self) -> bool {
        self.size_guard.is_pending()
    }

    /// Model list cursor position that is actually selectable.
    #[must_use]
    pub fn model_cursor(&self) -> Option<usize> {
        (!self.models.is_empty()).then(|| self.model_cursor.min(self.models.len() - 1))
    }

    /// Interval the next metrics request covers: the explicit one from the
    /// command line, else a trailing month recomputed from the wall clock.
    #[must_use]
    pub fn metrics_interval(&self) -> DateInterval {
        self.explicit_range.unwrap_or_else(default_range_now)
    }

    fn remember_model(&mut self, code: &str) {
        if self.settings.last_model.as_deref() == Some(code) {
            return;
        }
        self.settings.last_model = Some(code.to_string());
        if let Some(path) = &self.settings_path
            && let Err(err) = save_runtime_settings(path, &self.settings)
        {
            warn!(error = %err, "could not persist settings");
        }
    }
}

#[cfg(test)]
mod tests;
