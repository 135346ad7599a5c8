use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use url::Url;

use crate::error::{ClientError, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8001";
pub const SETTINGS_FILE_NAME: &str = "inventhub.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub backend_url: String,
    pub display_name: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            display_name: "guest".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    display_name: Option<String>,
}

impl ClientSettings {
    /// `<backend>/api`, normalized.
    pub fn api_base(&self) -> Result<String> {
        normalize_api_base(&self.backend_url)
    }
}

/// Defaults, then the first settings file found, then the environment.
pub fn load_settings() -> ClientSettings {
    let file = settings_file_candidates()
        .into_iter()
        .find(|candidate| candidate.is_file());
    load_settings_from(file.as_deref(), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    file: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(path) = file {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<FileSettings>(&raw) {
                Ok(file_cfg) => {
                    if let Some(v) = file_cfg.backend_url {
                        settings.backend_url = v;
                    }
                    if let Some(v) = file_cfg.display_name {
                        settings.display_name = v;
                    }
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), "ignoring malformed settings file: {err}");
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), "cannot read settings file: {err}");
            }
        }
    }

    let non_empty = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    if let Some(v) = non_empty("REACT_APP_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = non_empty("INVENTHUB_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = non_empty("INVENTHUB_DISPLAY_NAME") {
        settings.display_name = v;
    }

    settings
}

pub fn settings_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(SETTINGS_FILE_NAME));
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("inventhub").join(SETTINGS_FILE_NAME));
    }
    candidates
}

pub fn normalize_api_base(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|err| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: "backend url must start with http:// or https://".to_string(),
        });
    }

    if trimmed.ends_with("/api") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/api"))
    }
}
