use super::*;

impl AppState {
    pub(crate) fn fetch_models(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.models_in_flight {
            return;
        }
        self.models_in_flight = true;
        self.status = Some("Loading models...".to_string());
        let client = self.client.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let result = client.models().await.map_err(|err| format!("{err:#}"));
            let _ = tx2.send(AppEvent::ModelsLoaded(result)).await;
        });
    }

    pub(crate) fn fetch_forecasts(&mut self, tx: &mpsc::Sender<AppEvent>, model_code: String) {
        let ticket = self.forecasts_guard.issue(model_code.clone());
        let client = self.client.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let result = client
                .forecasts(&model_code)
                .await
                .map_err(|err| format!("{err:#}"));
            let _ = tx2.send(AppEvent::ForecastsLoaded { ticket, result }).await;
        });
    }

    pub(crate) fn fetch_size(&mut self, tx: &mpsc::Sender<AppEvent>, id: ForecastId) {
        let ticket = self.size_guard.issue(id.clone());
        let client = self.client.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let result = client
                .forecast_size(&id)
                .await
                .map_err(|err| format!("{err:#}"));
            let _ = tx2.send(AppEvent::SizeLoaded { ticket, result }).await;
        });
    }

    /// Requests metrics for the active model over the current window. Issuing
    /// a new ticket drops whatever an earlier request would have delivered.
    /// `metrics_range` keeps describing the series on screen until the
    /// response lands.
    pub(crate) fn refresh_metrics(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(model) = &self.selected_model else {
            return;
        };
        let key = MetricsKey {
            model_code: model.code.clone(),
            interval: self.metrics_interval(),
        };
        let ticket = self.metrics_guard.issue(key.clone());
        let client = self.client.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let result = client
                .metrics(&key.model_code, Some(key.interval))
                .await
                .map_err(|err| format!("{err:#}"));
            let _ = tx2.send(AppEvent::MetricsLoaded { ticket, result }).await;
        });
    }

    /// Shows the map for the current forecast and shift, from cache when
    /// possible.
    pub(crate) fn request_image(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(id) = self.nav.forecast_id().cloned() else {
            self.image_guard.invalidate();
            self.image = ImageView::Empty;
            return;
        };
        let shift = self.nav.shift();
        if let Some(cached) = self.images.get(&id, shift) {
            self.image = ImageView::Ready(cached.clone());
            self.image_guard.invalidate();
            return;
        }

        self.image = ImageView::Loading;
        let ticket = self.image_guard.issue((id.clone(), shift));
        let client = self.client.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let result = client
                .forecast_image(&id, Some(shift))
                .await
                .map_err(|err| format!("{err:#}"));
            let _ = tx2.send(AppEvent::ImageLoaded { ticket, result }).await;
        });
    }

    pub(crate) fn start_download(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(id) = self.nav.forecast_id().cloned() else {
            self.status = Some("Select a forecast before downloading".to_string());
            return;
        };
        self.status = Some(format!("Downloading forecast {id}..."));
        let client = self.client.clone();
        let dir = self.download_dir.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let result = download_archive(&client, &id, &dir)
                .await
                .map_err(|err| format!("{err:#}"));
            let _ = tx2.send(AppEvent::DownloadFinished(result)).await;
        });
    }
}

async fn download_archive(client: &GimClient, id: &ForecastId, dir: &Path) -> Result<PathBuf> {
    let archive = client.forecast_image(id, None).await?;
    save_archive(dir, &archive).await
}
