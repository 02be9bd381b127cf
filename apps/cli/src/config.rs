use std::{fs, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::protocol::DEPOSIT_AMOUNT_CENTS;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "booking.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub site_url: String,
    pub deposit_cents: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".into(),
            site_url: "http://localhost:5173".into(),
            deposit_cents: DEPOSIT_AMOUNT_CENTS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    site_url: Option<String>,
    deposit_cents: Option<u64>,
}

pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    load_settings_with_env(config_path, |key| std::env::var(key).ok())
}

/// Defaults, then the optional TOML file, then environment overrides.
pub fn load_settings_with_env(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if config_path.exists() {
        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read '{}'", config_path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse '{}'", config_path.display()))?;
        if let Some(v) = file_cfg.api_base_url {
            settings.api_base_url = v;
        }
        if let Some(v) = file_cfg.site_url {
            settings.site_url = v;
        }
        if let Some(v) = file_cfg.deposit_cents {
            settings.deposit_cents = v;
        }
    }

    if let Some(v) = env("BOOKING_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("BOOKING_SITE_URL") {
        settings.site_url = v;
    }
    if let Some(v) = env("APP__SITE_URL") {
        settings.site_url = v;
    }

    if let Some(v) = env("APP__DEPOSIT_CENTS") {
        settings.deposit_cents = v
            .trim()
            .parse()
            .with_context(|| format!("APP__DEPOSIT_CENTS is not a whole number: '{v}'"))?;
    }

    settings.normalize()
}

impl Settings {
    pub fn normalize(mut self) -> anyhow::Result<Self> {
        self.api_base_url = normalize_base_url(&self.api_base_url)?;
        self.site_url = normalize_base_url(&self.site_url)?;
        if self.deposit_cents == 0 {
            bail!("deposit amount must be greater than zero");
        }
        Ok(self)
    }
}

pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).with_context(|| format!("invalid url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "unsupported url scheme '{}' in '{trimmed}'",
            parsed.scheme()
        );
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
