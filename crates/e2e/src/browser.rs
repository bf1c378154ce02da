//! Browser driver abstraction used by the UI scenarios

use async_trait::async_trait;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{E2eError, E2eResult};

/// Interval between probes while waiting on the page
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A located DOM element
#[async_trait]
pub trait DomElement: Send + Sync {
    async fn send_keys(&self, text: &str) -> E2eResult<()>;

    async fn click(&self) -> E2eResult<()>;

    async fn is_displayed(&self) -> E2eResult<bool>;

    async fn attribute(&self, name: &str) -> E2eResult<Option<String>>;

    /// Rendered text content
    async fn text(&self) -> E2eResult<String>;

    /// First descendant matching a CSS selector
    async fn find_child(&self, selector: &str) -> E2eResult<Box<dyn DomElement>>;
}

/// One browser session shared by every UI scenario.
///
/// Navigation state persists between calls; later scenarios rely on the page
/// earlier ones left behind.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> E2eResult<()>;

    async fn find_element(&self, selector: &str) -> E2eResult<Box<dyn DomElement>>;

    async fn find_elements(&self, selector: &str) -> E2eResult<Vec<Box<dyn DomElement>>>;

    async fn screenshot(&self, path: &Path) -> E2eResult<()>;

    /// Terminate the session. Called exactly once by suite teardown.
    async fn close(&mut self) -> E2eResult<()>;

    /// Poll until an element matching `selector` exists.
    ///
    /// Only [`E2eError::ElementNotFound`] is retried; other driver errors
    /// end the wait.
    async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> E2eResult<Box<dyn DomElement>> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.find_element(selector).await {
                Ok(element) => return Ok(element),
                Err(E2eError::ElementNotFound(_)) => debug!("waiting for {}", selector),
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Err(E2eError::Timeout(format!(
                    "{} ({} ms)",
                    selector,
                    timeout.as_millis()
                )));
            }
            sleep(DEFAULT_POLL_INTERVAL).await;
        }
    }

    /// Poll until an element matching `selector` contains `text`.
    ///
    /// Driver errors end the wait, as in [`poll_until`].
    async fn wait_for_text(
        &self,
        selector: &str,
        text: &str,
        timeout: Duration,
    ) -> E2eResult<Box<dyn DomElement>> {
        let deadline = Instant::now() + timeout;
        loop {
            for element in self.find_elements(selector).await? {
                match element.text().await {
                    Ok(t) if t.contains(text) => return Ok(element),
                    Ok(_) => {}
                    // Re-rendered between the query and the read
                    Err(E2eError::ElementNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
            if Instant::now() >= deadline {
                return Err(E2eError::Timeout(format!(
                    "{} containing '{}' ({} ms)",
                    selector,
                    text,
                    timeout.as_millis()
                )));
            }
            sleep(DEFAULT_POLL_INTERVAL).await;
        }
    }
}

/// Poll `probe` until it reports true or `timeout` elapses.
///
/// Errors from the probe abort the wait.
pub async fn poll_until<F, Fut>(timeout: Duration, description: &str, mut probe: F) -> E2eResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<bool>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if probe().await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(E2eError::Timeout(format!(
                "{} ({} ms)",
                description,
                timeout.as_millis()
            )));
        }
        sleep(DEFAULT_POLL_INTERVAL).await;
    }
}
