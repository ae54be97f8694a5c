use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, header::CONTENT_TYPE};

use crate::{
    data::wire::{decode_forecasts, decode_metrics, decode_models, decode_size},
    domain::{DateInterval, ForecastId, ForecastRef, ModelInfo, RawMetric},
};

pub const DEFAULT_API_URL: &str = "https://services.simurg.space/gim-tec-forecast";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub forecast_id: ForecastId,
    pub shift: Option<u32>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Thin GET wrapper around the forecast API.
#[derive(Debug, Clone)]
pub struct GimClient {
    client: Client,
    base_url: String,
}

impl Default for GimClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GimClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get(&self, path: &str, query: &[(&str, String)], what: &str) -> Result<Response> {
        self.client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .with_context(|| format!("{what} request failed"))?
            .error_for_status()
            .with_context(|| format!("{what} request returned non-success status"))
    }

    async fn get_body(&self, path: &str, query: &[(&str, String)], what: &str) -> Result<Vec<u8>> {
        let response = self.get(path, query, what).await?;
        let body = response
            .bytes()
            .await
            .with_context(|| format!("failed to read {what} body"))?;
        Ok(body.to_vec())
    }

    pub async fn models(&self) -> Result<Vec<ModelInfo>> {
        let body = self.get_body("models", &[], "models").await?;
        decode_models(&body).context("failed to parse models payload")
    }

    pub async fn forecasts(&self, model_code: &str) -> Result<Vec<ForecastRef>> {
        let body = self
            .get_body(&format!("get_forecasts/{model_code}"), &[], "forecasts")
            .await?;
        decode_forecasts(&body, model_code).context("failed to parse forecasts payload")
    }

    pub async fn forecast_size(&self, id: &ForecastId) -> Result<Option<i64>> {
        let body = self
            .get_body(&format!("get_forecast_size/{id}"), &[], "forecast size")
            .await?;
        decode_size(&body).context("failed to parse forecast size payload")
    }

    pub async fn metrics(
        &self,
        model_code: &str,
        interval: Option<DateInterval>,
    ) -> Result<Vec<RawMetric>> {
        let query = interval
            .map(|range| {
                vec![
                    ("date_from", range.from().iso()),
                    ("date_to", range.to().iso()),
                ]
            })
            .unwrap_or_default();
        let body = self
            .get_body(&format!("get_metrics/{model_code}"), &query, "metrics")
            .await?;
        decode_metrics(&body).context("failed to parse metrics payload")
    }

    /// Map image for one time step, or the whole forecast archive when
    /// `shift` is `None`.
    pub async fn forecast_image(&self, id: &ForecastId, shift: Option<u32>) -> Result<ImagePayload> {
        let query = shift
            .map(|value| vec![("shift", value.to_string())])
            .unwrap_or_default();
        let response = self
            .get(&format!("get_forecast_image/{id}"), &query, "forecast image")
            .await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .context("failed to read forecast image body")?;
        Ok(ImagePayload {
            forecast_id: id.clone(),
            shift,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
