use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{data::client::ImagePayload, domain::ForecastId};

#[must_use]
pub fn archive_file_name(id: &ForecastId) -> String {
    let safe = id
        .as_str()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect::<String>();
    format!("forecast_{safe}.npz")
}

/// Writes a full forecast archive into `dir` and returns the written path.
pub async fn save_archive(dir: &Path, payload: &ImagePayload) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating download directory {} failed", dir.display()))?;
    let path = dir.join(archive_file_name(&payload.forecast_id));
    tokio::fs::write(&path, &payload.bytes)
        .await
        .with_context(|| format!("writing {} failed", path.display()))?;
    Ok(path)
}
