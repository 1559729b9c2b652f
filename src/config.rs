//! Start-up configuration, read from an inline JSON block in the host page.

use serde::Deserialize;

use crate::domain::errors::AppError;
use crate::domain::logging::LogLevel;
use crate::domain::market_data::{Symbol, TimeInterval};

/// Id of the `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Empty until the user signs in; drawings are not persisted without it.
    #[serde(default)]
    pub user_id: String,
    #[serde(default = "default_symbol")]
    pub default_symbol: String,
    #[serde(default = "default_interval")]
    pub default_interval: TimeInterval,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub pixel_ratio_override: Option<f64>,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_interval() -> TimeInterval {
    TimeInterval::OneHour
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_chart_width() -> u32 {
    960
}

fn default_chart_height() -> u32 {
    540
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            user_id: String::new(),
            default_symbol: default_symbol(),
            default_interval: default_interval(),
            log_level: default_log_level(),
            pixel_ratio_override: None,
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

impl AppConfig {
    /// Parse overrides; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, AppError> {
        if self.api_base_url.trim().is_empty() {
            return Err(AppError::ValidationError("apiBaseUrl must not be empty".to_string()));
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(AppError::ValidationError("chart size must be non-zero".to_string()));
        }
        if let Some(ratio) = self.pixel_ratio_override {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(AppError::ValidationError(format!("invalid pixelRatioOverride {ratio}")));
            }
        }
        Ok(self)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_default_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.default_symbol = symbol.into();
        self
    }

    pub fn with_default_interval(mut self, interval: TimeInterval) -> Self {
        self.default_interval = interval;
        self
    }

    pub fn with_chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = width;
        self.chart_height = height;
        self
    }

    /// Unparseable levels fall back to `Info`.
    pub fn log_level(&self) -> LogLevel {
        self.log_level.parse().unwrap_or(LogLevel::Info)
    }

    /// `None` when the configured symbol is blank.
    pub fn symbol(&self) -> Option<Symbol> {
        Symbol::new(self.default_symbol.clone()).ok()
    }

    /// Override if configured, otherwise the device's ratio.
    pub fn pixel_ratio(&self, device_ratio: f64) -> f64 {
        self.pixel_ratio_override
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(if device_ratio > 0.0 { device_ratio } else { 1.0 })
    }

    /// Read the inline config block from the page, falling back to defaults.
    pub fn from_document() -> Self {
        use crate::domain::logging::LogComponent;
        use crate::log_warn;

        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match text {
            Some(json) if !json.trim().is_empty() => Self::from_json(&json).unwrap_or_else(|err| {
                log_warn!(LogComponent::Presentation("Config"), "ignoring #{}: {}", CONFIG_ELEMENT_ID, err);
                Self::default()
            }),
            _ => Self::default(),
        }
    }
}
