//! Configuration module for the otpc CLI.
//!
//! Handles loading configuration from the TOML file and applying
//! command line overrides.

pub mod file;
pub mod runtime;

use std::path::{Path, PathBuf};
use std::time::Duration;

use otpc_sdk::objects::Theme;
use thiserror::Error;
use url::Url;

use crate::config::file::{FileConfig, WidgetMode};
use crate::config::runtime::{BackendSettings, FlowSettings, Storefront, WidgetSettings};

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub backend: BackendSettings,
    pub flow: FlowSettings,
    pub widget: WidgetSettings,
}

/// Command line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<Url>,
    pub simulate: bool,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Read the TOML file, apply overrides, validate, and build the settings.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&config_content)
    }

    fn load_str(&self, config_content: &str) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(config_content)?;

        if let Some(base_url) = &self.overrides.base_url {
            file_config.backend.base_url = base_url.clone();
        }
        if self.overrides.simulate {
            file_config.widget.mode = WidgetMode::Simulated;
        }

        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    let base_url = &config.backend.base_url;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "backend.base_url must be http or https, got {}",
            base_url.scheme()
        )));
    }
    if base_url.cannot_be_a_base() {
        return Err(ConfigError::ValidationError(format!(
            "backend.base_url {base_url} cannot be used as a base URL"
        )));
    }

    let endpoints = &config.backend.endpoints;
    for (name, path) in [
        ("send_otp", &endpoints.send_otp),
        ("verify_otp", &endpoints.verify_otp),
        ("create_order", &endpoints.create_order),
        ("verify_payment", &endpoints.verify_payment),
    ] {
        if !path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "backend.endpoints.{name} must start with '/'"
            )));
        }
    }

    if !is_hex_color(&config.storefront.theme_color) {
        return Err(ConfigError::ValidationError(format!(
            "storefront.theme_color {:?} is not a #rgb or #rrggbb color",
            config.storefront.theme_color
        )));
    }
    if config.storefront.redirect.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storefront.redirect must not be empty".to_string(),
        ));
    }

    if config.widget.mode == WidgetMode::Simulated
        && config
            .widget
            .test_secret
            .as_deref()
            .is_none_or(|s| s.is_empty())
    {
        return Err(ConfigError::ValidationError(
            "simulated widget requires widget.test_secret".to_string(),
        ));
    }
    Ok(())
}

fn is_hex_color(color: &str) -> bool {
    color.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let FileConfig {
        backend,
        storefront,
        widget,
    } = file_config;

    let widget_settings = match (widget.mode, widget.test_secret) {
        (WidgetMode::Simulated, Some(key_secret)) => WidgetSettings::Simulated { key_secret },
        _ => WidgetSettings::Terminal,
    };

    LoadedConfig {
        backend: BackendSettings {
            base_url: backend.base_url,
            timeout: seconds(backend.timeout_secs),
            endpoints: backend.endpoints,
        },
        flow: FlowSettings {
            storefront: Storefront {
                name: storefront.name,
                description: storefront.description,
                theme: Theme {
                    color: storefront.theme_color,
                },
            },
            redirect: storefront.redirect,
            widget_timeout: seconds(widget.timeout_secs),
        },
        widget: widget_settings,
    }
}
