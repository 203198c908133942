use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    pub model: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn default_model() -> &'static str {
        "gemini-2.5-flash"
    }

    /// Flag beats file, file beats default.
    pub fn model<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.or(self.model.as_deref())
            .unwrap_or_else(|| Self::default_model())
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| Error::Config("Could not locate config directory".to_string()))?;
    Ok(base.join("commitsmith").join("config.toml"))
}

pub fn load() -> Result<Config> {
    let path = config_path()?;
    if path.exists() {
        let text = fs::read_to_string(&path)?;
        return parse(&text);
    }
    Ok(Config::default())
}

fn parse(text: &str) -> Result<Config> {
    Ok(toml::from_str(text)?)
}

/// The key is only ever read from the environment.
pub fn api_key() -> Result<String> {
    api_key_from(std::env::var(GEMINI_API_KEY_ENV).ok())
}

fn api_key_from(value: Option<String>) -> Result<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(Error::MissingApiKey),
    }
}
