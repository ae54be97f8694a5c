use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub last_model: Option<String>,
}

impl RuntimeSettings {
    #[must_use]
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        Self {
            last_model: cli.model.clone(),
        }
    }
}

/// Settings from disk with command-line overrides applied on top.
pub fn load_runtime_settings(cli: &Cli, enable_disk: bool) -> (RuntimeSettings, Option<PathBuf>) {
    if !enable_disk {
        return (RuntimeSettings::from_cli_defaults(cli), None);
    }
    let Some(path) = settings_path() else {
        return (RuntimeSettings::from_cli_defaults(cli), None);
    };
    let settings = load_runtime_settings_from(cli, &path);
    (settings, Some(path))
}

pub fn load_runtime_settings_from(cli: &Cli, path: &Path) -> RuntimeSettings {
    let mut settings = fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<RuntimeSettings>(&content).ok())
        .unwrap_or_default();
    if cli.model.is_some() {
        settings.last_model = cli.model.clone();
    }
    settings
}

pub fn save_runtime_settings(path: &Path, settings: &RuntimeSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating settings directory failed")?;
    }
    let payload =
        serde_json::to_string_pretty(settings).context("serializing settings payload failed")?;
    fs::write(path, payload).context("writing settings file failed")
}

fn settings_path() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os("GIM_VIEWER_CONFIG_DIR") {
        return Some(PathBuf::from(base).join("settings.json"));
    }

    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("gim-viewer")
            .join("settings.json"),
    )
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::NamedTempFile;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("gim-viewer").chain(args.iter().copied()))
    }

    #[test]
    fn disk_disabled_uses_cli_model() {
        let (settings, path) = load_runtime_settings(&cli(&["--model", "gim-b"]), false);
        assert!(path.is_none());
        assert_eq!(settings.last_model.as_deref(), Some("gim-b"));
    }

    #[test]
    fn roundtrip_preserves_last_model() {
        let file = NamedTempFile::new().expect("create temp settings file");
        let saved = RuntimeSettings {
            last_model: Some("gim-a".to_string()),
        };
        save_runtime_settings(file.path(), &saved).expect("save settings");
        assert_eq!(load_runtime_settings_from(&cli(&[]), file.path()), saved);
    }

    #[test]
    fn cli_model_overrides_saved_model() {
        let file = NamedTempFile::new().expect("create temp settings file");
        let saved = RuntimeSettings {
            last_model: Some("gim-a".to_string()),
        };
        save_runtime_settings(file.path(), &saved).expect("save settings");
        let loaded = load_runtime_settings_from(&cli(&["--model", "gim-c"]), file.path());
        assert_eq!(loaded.last_model.as_deref(), Some("gim-c"));
    }

    #[test]
    fn corrupt_or_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.json");
        assert_eq!(
            load_runtime_settings_from(&cli(&[]), &missing),
            RuntimeSettings::default()
        );

        let corrupt = dir.path().join("corrupt.json");
        fs::write(&corrupt, "{not json").expect("write corrupt file");
        assert_eq!(
            load_runtime_settings_from(&cli(&[]), &corrupt),
            RuntimeSettings::default()
        );
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.json");
        save_runtime_settings(&path, &RuntimeSettings::default()).expect("save settings");
        assert!(path.exists());
    }
}
