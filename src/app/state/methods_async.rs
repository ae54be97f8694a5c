use super::*;

impl AppState {
    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => self.handle_bootstrap(tx, cli)?,
            AppEvent::TickRefresh => self.refresh_metrics(tx),
            AppEvent::RetryModels => self.fetch_models(tx),
            AppEvent::Input(input) => self.handle_input(input, tx).await?,
            AppEvent::ModelsLoaded(result) => self.handle_models_loaded(tx, result),
            AppEvent::ForecastsLoaded { ticket, result } => {
                if !self.forecasts_guard.complete(&ticket) {
                    debug!(model = %ticket.key, "dropping stale forecast list");
                    return Ok(());
                }
                self.handle_forecasts_loaded(tx, &ticket.key, result);
            }
            AppEvent::SizeLoaded { ticket, result } => {
                if !self.size_guard.complete(&ticket) {
                    debug!(forecast = %ticket.key, "dropping stale forecast size");
                    return Ok(());
                }
                self.handle_size_loaded(tx, result);
            }
            AppEvent::MetricsLoaded { ticket, result } => {
                if !self.metrics_guard.complete(&ticket) {
                    debug!(model = %ticket.key.model_code, "dropping stale metrics");
                    return Ok(());
                }
                self.handle_metrics_loaded(&ticket.key, result);
            }
            AppEvent::ImageLoaded { ticket, result } => {
                if !self.image_guard.complete(&ticket) {
                    debug!(forecast = %ticket.key.0, shift = ticket.key.1, "dropping stale image");
                    return Ok(());
                }
                self.handle_image_loaded(result);
            }
            AppEvent::DownloadFinished(result) => self.handle_download_finished(result),
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
                self.running = false;
            }
        }

        Ok(())
    }

    pub(crate) fn handle_bootstrap(&mut self, tx: &mpsc::Sender<AppEvent>, cli: &Cli) -> Result<()> {
        cli.validate()?;
        start_refresh_task(tx.clone(), cli.refresh_interval);
        self.fetch_models(tx);
        Ok(())
    }

    pub(crate) fn handle_models_loaded(
        &mut self,
        tx: &mpsc::Sender<AppEvent>,
        result: Result<Vec<ModelInfo>, String>,
    ) {
        self.models_in_flight = false;
        match result {
            Ok(models) if !models.is_empty() => {
                self.retry.reset();
                self.models = models;
                self.last_error = None;
                self.mode = AppMode::Ready;
                let preferred = self
                    .settings
                    .last_model
                    .as_deref()
                    .and_then(|code| self.models.iter().position(|model| model.code == code))
                    .unwrap_or(0);
                if let Some(code) = self.requested_model.take()
                    && !self.models.iter().any(|model| model.code == code)
                {
                    warn!(model = %code, "requested model is not listed");
                    self.focus = Focus::Models;
                    self.model_cursor = 0;
                    self.last_error = Some(format!("unknown model {code}"));
                    self.status = Some("Pick a model from the list".to_string());
                    return;
                }
                self.model_cursor = preferred;
                self.select_model(tx, preferred);
            }
            Ok(_) => {
                self.mode = AppMode::Error;
                self.last_error = Some("The server lists no forecast models".to_string());
                self.status = None;
            }
            Err(err) => {
                warn!(error = %err, "loading models failed");
                self.mode = AppMode::Error;
                self.last_error = Some(err);
                match self.retry.next_delay() {
                    Some(delay) => {
                        self.status =
                            Some(format!("Retrying model list in {}s", delay.as_secs()));
                        schedule_retry(tx.clone(), delay);
                    }
                    None => {
                        self.status = Some("Giving up on the model list".to_string());
                    }
                }
            }
        }
    }

    /// Switches the active model and drops everything tied to the previous
    /// one, including in-flight size and image requests.
    pub(crate) fn select_model(&mut self, tx: &mpsc::Sender<AppEvent>, position: usize) {
        let Some(model) = self.models.get(position).cloned() else {
            return;
        };
        info!(model = %model.code, "model selected");
        self.size_guard.invalidate();
        self.image_guard.invalidate();
        self.index = AvailabilityIndex::default();
        self.selected_forecast = None;
        self.metrics.clear();
        self.image = ImageView::Empty;
        self.remember_model(&model.code);
        self.selected_model = Some(model.clone());
        if self.nav.select_model() == NavEffect::FetchForecasts {
            self.status = Some(format!("Loading forecasts for {}...", model.name));
            self.fetch_forecasts(tx, model.code);
        }
        self.refresh_metrics(tx);
    }

    pub(crate) fn handle_forecasts_loaded(
        &mut self,
        tx: &mpsc::Sender<AppEvent>,
        model_code: &str,
        result: Result<Vec<ForecastRef>, String>,
    ) {
        match result {
            Ok(items) => {
                self.index = AvailabilityIndex::build(items);
                info!(model = model_code, forecasts = self.index.len(), "forecast list loaded");
                self.status = None;
                self.last_error = None;
                match self.index.first().cloned() {
                    Some(first) => self.select_forecast(tx, first),
                    None => {
                        self.status = Some(format!("No forecasts published for {model_code}"));
                    }
                }
            }
            Err(err) => {
                warn!(model = model_code, error = %err, "loading forecasts failed");
                self.index = AvailabilityIndex::default();
                self.status = None;
                self.last_error = Some(err);
            }
        }
    }

    pub(crate) fn select_forecast(&mut self, tx: &mpsc::Sender<AppEvent>, forecast: ForecastRef) {
        info!(forecast = %forecast.id, "forecast selected");
        self.calendar_cursor = day_key_of(&forecast.start_date);
        self.image_guard.invalidate();
        let effect = self.nav.select_forecast(forecast.id.clone());
        self.selected_forecast = Some(forecast);
        if let NavEffect::FetchSize(id) = effect {
            self.fetch_size(tx, id);
        }
        self.request_image(tx);
    }

    pub(crate) fn handle_size_loaded(
        &mut self,
        tx: &mpsc::Sender<AppEvent>,
        result: Result<Option<i64>, String>,
    ) {
        let before = self.nav.shift();
        match result {
            Ok(Some(size)) => self.nav.size_loaded(size),
            Ok(None) => self.nav.size_failed(),
            Err(err) => {
                warn!(error = %err, "loading forecast size failed");
                self.nav.size_failed();
            }
        }
        if self.nav.shift() != before {
            self.request_image(tx);
        }
    }

    pub(crate) fn handle_metrics_loaded(
        &mut self,
        key: &MetricsKey,
        result: Result<Vec<RawMetric>, String>,
    ) {
        match result {
            Ok(raw) => {
                self.metrics = normalize(&raw, key.interval);
                self.metrics_range = key.interval;
                self.last_error = None;
            }
            Err(err) => {
                warn!(model = %key.model_code, error = %err, "loading metrics failed");
                self.last_error = Some(err);
            }
        }
    }

    pub(crate) fn handle_image_loaded(&mut self, result: Result<ImagePayload, String>) {
        match result {
            Ok(payload) => {
                self.images.insert(payload.clone());
                self.image = ImageView::Ready(payload);
                self.last_error = None;
            }
            Err(err) => {
                warn!(error = %err, "loading forecast image failed");
                self.image = ImageView::Failed(err);
            }
        }
    }

    pub(crate) fn handle_download_finished(&mut self, result: Result<PathBuf, String>) {
        match result {
            Ok(path) => {
                info!(path = %path.display(), "forecast archive saved");
                self.status = Some(format!("Saved {}", path.display()));
            }
            Err(err) => {
                warn!(error = %err, "forecast download failed");
                self.status = Some("Download failed".to_string());
                self.last_error = Some(err);
            }
        }
    }

    pub(crate) async fn handle_input(
        &mut self,
        event: Event,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        if let Event::Key(key) = event
            && key.kind == KeyEventKind::Press
        {
            self.handle_key_press(key, tx).await?;
        }
        Ok(())
    }

    pub(crate) async fn handle_key_press(
        &mut self,
        key: KeyEvent,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        if matches!(key.code, KeyCode::Char('c' | 'C'))
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            tx.send(AppEvent::Quit).await?;
            return Ok(());
        }
        if self.help_open {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?' | 'q')) {
                self.help_open = false;
            }
            return Ok(());
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => tx.send(AppEvent::Quit).await?,
            KeyCode::Char('?') => self.help_open = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Char('r') => self.refresh_metrics(tx),
            KeyCode::Char('d') => self.start_download(tx),
            code => match self.focus {
                Focus::Models => self.handle_models_key(code, tx),
                Focus::Calendar => self.handle_calendar_key(code, tx),
                Focus::Shift => self.handle_shift_key(code, tx),
            },
        }
        Ok(())
    }

    fn handle_models_key(&mut self, code: KeyCode, tx: &mpsc::Sender<AppEvent>) {
        let Some(cursor) = self.model_cursor() else {
            return;
        };
        match code {
            KeyCode::Up => self.model_cursor = cursor.saturating_sub(1),
            KeyCode::Down => self.model_cursor = (cursor + 1).min(self.models.len() - 1),
            KeyCode::Enter => self.select_model(tx, cursor),
            _ => {}
        }
    }

    fn handle_calendar_key(&mut self, code: KeyCode, tx: &mpsc::Sender<AppEvent>) {
        let cursor = self.calendar_cursor;
        let moved = match code {
            KeyCode::Left => cursor.offset_days(-1),
            KeyCode::Right => cursor.offset_days(1),
            KeyCode::Up => cursor.offset_days(-7),
            KeyCode::Down => cursor.offset_days(7),
            KeyCode::Char('n') => self.index.next_available(cursor),
            KeyCode::Char('p') => self.index.previous_available(cursor),
            KeyCode::Enter => {
                self.pick_day(tx, cursor);
                None
            }
            _ => None,
        };
        if let Some(day) = moved {
            self.calendar_cursor = day;
        }
    }

    /// Selects the forecast published on `day`; unavailable days are inert.
    pub(crate) fn pick_day(&mut self, tx: &mpsc::Sender<AppEvent>, day: CalendarDay) {
        match self.index.resolve(day).cloned() {
            Some(forecast) => self.select_forecast(tx, forecast),
            None => self.status = Some(format!("No forecast on {day}")),
        }
    }

    fn handle_shift_key(&mut self, code: KeyCode, tx: &mpsc::Sender<AppEvent>) {
        let changed = match code {
            KeyCode::Left => self.nav.step_shift(-1),
            KeyCode::Right => self.nav.step_shift(1),
            KeyCode::Home => self.nav.first_shift(),
            KeyCode::End => self.nav.last_shift(),
            _ => false,
        };
        if changed {
            self.request_image(tx);
        }
    }
}
