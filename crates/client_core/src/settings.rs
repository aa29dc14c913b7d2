use std::{fs, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;
use shared::domain::ProgressPolicy;
use tracing::warn;

use crate::{controller::ConverterOptions, downloads::DEFAULT_REVOKE_DELAY};

pub const DEFAULT_SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub server_url: String,
    pub progress_interval_ms: u64,
    pub progress_policy: ProgressPolicy,
    pub revoke_delay_ms: u64,
    pub output_dir: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            progress_interval_ms: 500,
            progress_policy: ProgressPolicy::DistinguishZip,
            revoke_delay_ms: DEFAULT_REVOKE_DELAY.as_millis() as u64,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ClientSettings {
    pub fn converter_options(&self) -> ConverterOptions {
        ConverterOptions {
            progress_interval: Duration::from_millis(self.progress_interval_ms.max(1)),
            progress_policy: self.progress_policy,
            revoke_delay: Duration::from_millis(self.revoke_delay_ms),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    progress_interval_ms: Option<u64>,
    progress_policy: Option<ProgressPolicy>,
    revoke_delay_ms: Option<u64>,
    output_dir: Option<PathBuf>,
}

/// Defaults, then `client.toml` (or `path`), then environment.
pub fn load_settings(path: Option<&Path>) -> ClientSettings {
    let mut settings = ClientSettings::default();
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));

    if let Ok(raw) = fs::read_to_string(path) {
        if let Err(err) = apply_file(&mut settings, &raw) {
            warn!("ignoring malformed settings file '{}': {err}", path.display());
        }
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn apply_file(settings: &mut ClientSettings, raw: &str) -> Result<(), toml::de::Error> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.progress_interval_ms {
        settings.progress_interval_ms = v;
    }
    if let Some(v) = file_cfg.progress_policy {
        settings.progress_policy = v;
    }
    if let Some(v) = file_cfg.revoke_delay_ms {
        settings.revoke_delay_ms = v;
    }
    if let Some(v) = file_cfg.output_dir {
        settings.output_dir = v;
    }
    Ok(())
}

pub fn apply_env(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("CONVERTER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__PROGRESS_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.progress_interval_ms = parsed;
        }
    }
    if let Some(v) = lookup("APP__PROGRESS_POLICY") {
        if let Some(policy) = parse_progress_policy(&v) {
            settings.progress_policy = policy;
        }
    }
    if let Some(v) = lookup("APP__REVOKE_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.revoke_delay_ms = parsed;
        }
    }
    if let Some(v) = lookup("APP__OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }
}

pub fn parse_progress_policy(raw: &str) -> Option<ProgressPolicy> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "distinguish_zip" => Some(ProgressPolicy::DistinguishZip),
        "counted_for_all" => Some(ProgressPolicy::CountedForAll),
        _ => None,
    }
}
