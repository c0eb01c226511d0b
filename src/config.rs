//! Site configuration
//!
//! Everything has a default matching the live site, so a missing file is
//! not an error. The file is YAML:
//!
//! ```yaml
//! form:
//!   action: https://formspree.io/f/xyz
//!   banner_ms: 5000
//! page:
//!   sticky_header_offset: 100
//! debounce:
//!   wait_ms: 20
//!   immediate: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::debounce::DEFAULT_WAIT;
use crate::error::ConfigError;
use crate::form::DEFAULT_BANNER_DURATION;
use crate::page::RevealPlan;

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "APN_SITE_CONFIG";

/// Env var overriding `form.action`.
pub const FORM_ACTION_ENV: &str = "APN_SITE_FORM_ACTION";

const DEFAULT_CONFIG_PATH: &str = "config/site.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub form: FormConfig,
    pub page: PageConfig,
    pub debounce: DebounceConfig,
    pub reveal: RevealPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// POST target of the contact form.
    pub action: Url,
    /// Success banner auto-hide delay (ms).
    pub banner_ms: u64,
    /// Whole-request timeout for the transport (ms).
    pub request_timeout_ms: u64,
}

impl FormConfig {
    pub fn banner_duration(&self) -> Duration {
        Duration::from_millis(self.banner_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            action: Url::parse("http://localhost:8080/contact").expect("default action is a valid URL"),
            banner_ms: DEFAULT_BANNER_DURATION.as_millis() as u64,
            request_timeout_ms: 10_000,
        }
    }
}

/// Scroll thresholds, in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Header gets `scrolled` once `scroll_y` exceeds this.
    pub sticky_header_offset: f64,
    /// Back-to-top button shows once `scroll_y` exceeds this.
    pub back_to_top_offset: f64,
    /// Added to `scroll_y` to find the section under the header.
    pub active_section_offset: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            sticky_header_offset: 100.0,
            back_to_top_offset: 300.0,
            active_section_offset: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    pub wait_ms: u64,
    /// Fire on the leading edge instead of the trailing one.
    pub immediate: bool,
}

impl DebounceConfig {
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            wait_ms: DEFAULT_WAIT.as_millis() as u64,
            immediate: true,
        }
    }
}

impl SiteConfig {
    pub fn from_yaml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: origin.to_string(),
            source,
        })
    }

    /// Apply an explicit form action, e.g. from the environment or a flag.
    pub fn override_action(&mut self, action: Option<&str>) -> Result<(), ConfigError> {
        if let Some(raw) = action.map(str::trim).filter(|raw| !raw.is_empty()) {
            self.form.action = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
                value: raw.to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let action = &self.form.action;
        if !matches!(action.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                value: action.to_string(),
                reason: "scheme must be http or https".into(),
            });
        }
        if self.form.banner_ms == 0 {
            return Err(ConfigError::Invalid("form.banner_ms must be > 0".into()));
        }
        if self.form.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "form.request_timeout_ms must be > 0".into(),
            ));
        }
        let page = &self.page;
        for (key, value) in [
            ("page.sticky_header_offset", page.sticky_header_offset),
            ("page.back_to_top_offset", page.back_to_top_offset),
            ("page.active_section_offset", page.active_section_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

/// Finds and loads the site configuration file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create loader from APN_SITE_CONFIG or default to "config/site.yaml"
    pub fn from_env() -> Self {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file (or defaults when absent), then apply the
    /// APN_SITE_FORM_ACTION override and validate.
    pub fn load(&self) -> Result<SiteConfig, ConfigError> {
        let action = std::env::var(FORM_ACTION_ENV).ok();
        self.load_with_action(action.as_deref())
    }

    pub fn load_with_action(&self, action: Option<&str>) -> Result<SiteConfig, ConfigError> {
        let mut config = if self.path.exists() {
            info!("Loading site configuration from {}", self.path.display());
            let content =
                std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
                    path: self.path.display().to_string(),
                    source,
                })?;
            SiteConfig::from_yaml(&content, &self.path.display().to_string())?
        } else {
            info!(
                "No site configuration at {}, using defaults",
                self.path.display()
            );
            SiteConfig::default()
        };

        config.override_action(action)?;
        config.validate()?;
        Ok(config)
    }
}
