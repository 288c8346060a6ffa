use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::gesture::GestureConfig;
use crate::profiles::DEFAULT_PROFILE_COUNT;

const CONFIG_ELEMENT_ID: &str = "swipe-config";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub deck_size: usize,
    pub exit_fallback_ms: u32,
    pub gesture: GestureConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            deck_size: DEFAULT_PROFILE_COUNT,
            exit_fallback_ms: 600,
            gesture: GestureConfig::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl ConfigError {
    fn parse<E: fmt::Display>(err: E) -> Self {
        Self::Parse(err.to_string())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(message) => write!(f, "malformed config: {}", message),
            ConfigError::Invalid(message) => write!(f, "invalid config: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn parse_config(text: &str) -> Result<AppConfig, ConfigError> {
    if text.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_json::from_str(text).map_err(ConfigError::parse)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let gesture = &config.gesture;
    if config.deck_size == 0 {
        return Err(ConfigError::Invalid("deck_size must be at least 1".into()));
    }
    if gesture.swipe_x <= 0.0 || gesture.swipe_y <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "swipe thresholds must be positive (got {} / {})",
            gesture.swipe_x, gesture.swipe_y
        )));
    }
    if gesture.label_fade_end <= gesture.label_fade_start {
        return Err(ConfigError::Invalid(
            "label_fade_end must be greater than label_fade_start".into(),
        ));
    }
    if gesture.double_tap_ms < 0.0 {
        return Err(ConfigError::Invalid("double_tap_ms cannot be negative".into()));
    }
    Ok(())
}

/// Reads the optional inline JSON block from the host page.
pub fn load_config() -> AppConfig {
    let text = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());

    let Some(text) = text else {
        return AppConfig::default();
    };

    match parse_config(&text) {
        Ok(config) => config,
        Err(err) => {
            warn!("Falling back to default config: {}", err);
            AppConfig::default()
        }
    }
}
