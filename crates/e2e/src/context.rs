//! Suite context and its scoped lifecycle

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::browser::BrowserDriver;
use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};
use crate::fixture::FixtureState;

/// Everything a scenario can touch: shared clients plus fixture state.
pub struct SuiteContext {
    pub config: SuiteConfig,
    pub api: ApiClient,
    pub fixtures: FixtureState,
    browser: Option<Box<dyn BrowserDriver>>,
}

/// What teardown did
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeardownSummary {
    /// Id of the leftover list that was deleted
    pub deleted_group_item: Option<i64>,
    pub browser_closed: bool,
    /// Swallowed cleanup errors
    pub warnings: Vec<String>,
}

impl SuiteContext {
    pub fn new(config: SuiteConfig, api: ApiClient, browser: Option<Box<dyn BrowserDriver>>) -> Self {
        Self {
            config,
            api,
            fixtures: FixtureState::new(),
            browser,
        }
    }

    pub fn has_browser(&self) -> bool {
        self.browser.is_some()
    }

    pub fn browser(&self) -> E2eResult<&dyn BrowserDriver> {
        self.browser.as_deref().ok_or(E2eError::BrowserUnavailable)
    }

    /// Run `body`, then tear down no matter how it ended.
    ///
    /// A panic inside `body` is re-raised after teardown completes.
    pub async fn scope<T, F>(mut self, body: F) -> (T, TeardownSummary)
    where
        F: for<'a> FnOnce(&'a mut SuiteContext) -> BoxFuture<'a, T>,
    {
        let outcome = AssertUnwindSafe(body(&mut self)).catch_unwind().await;
        let summary = self.teardown().await;
        match outcome {
            Ok(value) => (value, summary),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    /// Best-effort cleanup of leftover fixture data, then browser close.
    async fn teardown(&mut self) -> TeardownSummary {
        info!("Cleaning up test environment...");
        let mut summary = TeardownSummary::default();

        if let Some(id) = self.fixtures.leftover_group_item() {
            match self.api.delete_group_item(id).await {
                Ok(_) => {
                    info!("Deleted leftover list {}", id);
                    summary.deleted_group_item = Some(id);
                }
                Err(e) => {
                    warn!("Error during data cleanup of list {}: {}", id, e);
                    summary.warnings.push(format!("delete list {}: {}", id, e));
                }
            }
        }

        if let Some(mut browser) = self.browser.take() {
            match browser.close().await {
                Ok(()) => summary.browser_closed = true,
                Err(e) => {
                    warn!("Error closing browser: {}", e);
                    summary.warnings.push(format!("close browser: {}", e));
                }
            }
        }

        info!("Test environment cleanup complete");
        summary
    }
}
