//! JSON shapes of the forecast API and their conversion into domain values.
//!
//! Each decoder either converts the whole body or rejects it; a single bad
//! date fails the call instead of silently dropping the row.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{DataError, ForecastId, ForecastRef, ModelInfo, RawMetric, Timestamp};

#[derive(Debug, Deserialize)]
struct ModelPayload {
    code: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(i64),
}

impl From<WireId> for ForecastId {
    fn from(value: WireId) -> Self {
        match value {
            WireId::Text(text) => ForecastId::new(text),
            WireId::Number(number) => ForecastId::new(number.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    id: WireId,
    forecast_start_date: String,
    #[serde(default)]
    model_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SizePayload {
    #[serde(default)]
    size: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct MetricPayload {
    forecast_start_date: String,
    #[serde(default)]
    rmse: Option<f64>,
    #[serde(default)]
    mae: Option<f64>,
    #[serde(default)]
    mape: Option<f64>,
}

fn parse_array<T>(body: &[u8], what: &'static str) -> Result<Vec<T>, DataError>
where
    T: for<'de> Deserialize<'de>,
{
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_array() {
        return Err(DataError::NotAnArray { what });
    }
    Ok(serde_json::from_value(value)?)
}

pub fn decode_models(body: &[u8]) -> Result<Vec<ModelInfo>, DataError> {
    Ok(parse_array::<ModelPayload>(body, "models")?
        .into_iter()
        .map(|model| ModelInfo {
            name: model.name.unwrap_or_else(|| model.code.clone()),
            code: model.code,
        })
        .collect())
}

/// Forecast list of `model_code`; rows without their own code inherit it.
pub fn decode_forecasts(body: &[u8], model_code: &str) -> Result<Vec<ForecastRef>, DataError> {
    parse_array::<ForecastPayload>(body, "forecasts")?
        .into_iter()
        .map(|row| {
            Ok(ForecastRef {
                id: row.id.into(),
                start_date: Timestamp::parse(&row.forecast_start_date)?,
                model_code: row.model_code.unwrap_or_else(|| model_code.to_string()),
            })
        })
        .collect()
}

/// `None` when the payload carries no size; callers fall back to the default.
pub fn decode_size(body: &[u8]) -> Result<Option<i64>, DataError> {
    let payload: SizePayload = serde_json::from_slice(body)?;
    Ok(payload.size)
}

pub fn decode_metrics(body: &[u8]) -> Result<Vec<RawMetric>, DataError> {
    parse_array::<MetricPayload>(body, "metrics")?
        .into_iter()
        .map(|row| {
            Ok(RawMetric {
                date: Timestamp::parse(&row.forecast_start_date)?,
                rmse: row.rmse,
                mae: row.mae,
                mape: row.mape,
            })
        })
        .collect()
}
