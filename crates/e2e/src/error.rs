//! Error types for the E2E suite

use thiserror::Error;

use crate::fixture::FixtureField;

#[derive(Error, Debug)]
pub enum E2eError {
    /// Non-2xx response from the API. `data` is the decoded body.
    #[error("API returned {status}: {data}")]
    Api {
        status: u16,
        data: serde_json::Value,
    },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Missing fixture `{field}` (written by: {producers})")]
    MissingFixture {
        field: FixtureField,
        producers: String,
    },

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("No browser session available")]
    BrowserUnavailable,

    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("Application not reachable at {url} after {attempts} attempts")]
    NotReachable { url: String, attempts: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Scenario panicked: {0}")]
    Panicked(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    /// Status code of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            E2eError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
