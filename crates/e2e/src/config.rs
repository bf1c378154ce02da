//! Suite configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{E2eError, E2eResult};
use crate::model::Credentials;

/// Top-level suite configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// REST API settings
    pub api: ApiConfig,

    /// Browser UI settings
    pub ui: UiConfig,

    /// Seeded account used for login
    pub credentials: Credentials,

    /// Scheduling and output settings
    pub suite: RunSettings,
}

/// REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the version prefix
    pub base_url: String,

    /// Per-request timeout
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api/v1".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Run the UI group at all
    pub enabled: bool,

    /// Frontend entry point
    pub frontend_url: String,

    pub headless: bool,

    /// Chrome binary (None = auto-detect)
    pub chrome_executable: Option<PathBuf>,

    pub window_width: u32,
    pub window_height: u32,

    /// Default wait for elements to appear
    pub element_timeout_ms: u64,

    /// Wait for the list view after submitting the login form
    pub login_timeout_ms: u64,

    /// Wait for an optional delete confirmation dialog
    pub confirm_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frontend_url: "http://localhost:8080".to_string(),
            headless: true,
            chrome_executable: None,
            window_width: 1280,
            window_height: 720,
            element_timeout_ms: 5_000,
            login_timeout_ms: 10_000,
            confirm_timeout_ms: 2_000,
        }
    }
}

impl UiConfig {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_millis(self.login_timeout_ms)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_millis(self.confirm_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Upper bound for a single scenario, all suspension points included
    pub scenario_timeout_ms: u64,

    /// How long the live harness waits for the API to answer
    pub readiness_timeout_ms: u64,

    /// Directory for results and failure screenshots
    pub output_dir: PathBuf,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            scenario_timeout_ms: 60_000,
            readiness_timeout_ms: 10_000,
            output_dir: PathBuf::from("test-results"),
        }
    }
}

impl RunSettings {
    pub fn scenario_timeout(&self) -> Duration {
        Duration::from_millis(self.scenario_timeout_ms)
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(self.readiness_timeout_ms)
    }
}

impl SuiteConfig {
    /// Load configuration from a TOML file; a missing file yields defaults.
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> E2eResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TODO_E2E_*` environment overrides.
    pub fn apply_env(&mut self) -> E2eResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> E2eResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("TODO_E2E_API_URL") {
            self.api.base_url = url;
        }
        if let Some(url) = lookup("TODO_E2E_FRONTEND_URL") {
            self.ui.frontend_url = url;
        }
        if let Some(email) = lookup("TODO_E2E_EMAIL") {
            self.credentials.email = email;
        }
        if let Some(password) = lookup("TODO_E2E_PASSWORD") {
            self.credentials.password = password;
        }
        if let Some(headless) = lookup("TODO_E2E_HEADLESS") {
            self.ui.headless = match headless.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(E2eError::Config(format!(
                        "TODO_E2E_HEADLESS must be a boolean, got '{}'",
                        other
                    )))
                }
            };
        }
        if let Some(chrome) = lookup("CHROME_PATH") {
            self.ui.chrome_executable = Some(PathBuf::from(chrome));
        }
        self.validate()
    }

    fn validate(&self) -> E2eResult<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(E2eError::Config(format!(
                "api.base_url must be an http(s) URL: {}",
                self.api.base_url
            )));
        }
        if self.credentials.email.is_empty() {
            return Err(E2eError::Config("credentials.email is empty".to_string()));
        }
        Ok(())
    }
}
