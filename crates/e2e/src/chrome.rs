//! Headless Chrome session over the DevTools protocol

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::Path;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser::{BrowserDriver, DomElement};
use crate::config::UiConfig;
use crate::error::{E2eError, E2eResult};

/// Visibility as the user perceives it: rendered box and not hidden by style.
const IS_DISPLAYED_JS: &str = r#"function() {
    const style = window.getComputedStyle(this);
    const rect = this.getBoundingClientRect();
    return style.visibility !== 'hidden'
        && style.display !== 'none'
        && rect.width > 0
        && rect.height > 0;
}"#;

/// A launched Chrome process with a single page
pub struct ChromeSession {
    browser: Mutex<Browser>,
    page: Page,
    handler: Option<JoinHandle<()>>,
    closed: bool,
}

impl ChromeSession {
    /// Launch Chrome and open a blank page.
    pub async fn open(config: &UiConfig) -> E2eResult<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder.build().map_err(E2eError::BrowserLaunch)?;

        info!("Launching browser (headless: {})", config.headless);
        let (browser, mut events) = Browser::launch(browser_config).await?;

        // The CDP connection only makes progress while its event stream is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!("browser event stream ended: {}", e);
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler: Some(handler),
            closed: false,
        })
    }
}

#[async_trait]
impl BrowserDriver for ChromeSession {
    async fn navigate(&self, url: &str) -> E2eResult<()> {
        debug!("navigate {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn find_element(&self, selector: &str) -> E2eResult<Box<dyn DomElement>> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| E2eError::ElementNotFound(selector.to_string()))?;
        Ok(Box::new(ChromeElement(element)))
    }

    async fn find_elements(&self, selector: &str) -> E2eResult<Vec<Box<dyn DomElement>>> {
        let elements = self.page.find_elements(selector).await?;
        Ok(elements
            .into_iter()
            .map(|e| Box::new(ChromeElement(e)) as Box<dyn DomElement>)
            .collect())
    }

    async fn screenshot(&self, path: &Path) -> E2eResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let params = ScreenshotParams::builder().full_page(true).build();
        self.page.save_screenshot(params, path).await?;
        Ok(())
    }

    async fn close(&mut self) -> E2eResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut browser = self.browser.lock().await;
        browser.close().await?;
        if let Err(e) = browser.wait().await {
            warn!("browser process did not exit cleanly: {}", e);
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        info!("Browser closed");
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!("browser session dropped without close()");
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}

struct ChromeElement(Element);

#[async_trait]
impl DomElement for ChromeElement {
    async fn send_keys(&self, text: &str) -> E2eResult<()> {
        self.0.focus().await?;
        self.0.type_str(text).await?;
        Ok(())
    }

    async fn click(&self) -> E2eResult<()> {
        self.0.click().await?;
        Ok(())
    }

    async fn is_displayed(&self) -> E2eResult<bool> {
        let returns = self.0.call_js_fn(IS_DISPLAYED_JS, false).await?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn attribute(&self, name: &str) -> E2eResult<Option<String>> {
        Ok(self.0.attribute(name).await?)
    }

    async fn text(&self) -> E2eResult<String> {
        Ok(self.0.inner_text().await?.unwrap_or_default())
    }

    async fn find_child(&self, selector: &str) -> E2eResult<Box<dyn DomElement>> {
        let child = self
            .0
            .find_element(selector)
            .await
            .map_err(|_| E2eError::ElementNotFound(selector.to_string()))?;
        Ok(Box::new(ChromeElement(child)))
    }
}
