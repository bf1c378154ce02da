//! Readiness probing of the application under test

use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// Wait until `url` answers with any HTTP response.
///
/// Error statuses count as ready: the API answers 401 on most routes before
/// login, and that is still a live server.
pub async fn wait_until_reachable(url: &str, timeout_duration: Duration) -> E2eResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let start = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;

        match client.get(url).send().await {
            Ok(resp) => {
                info!("Application is reachable at {} ({})", url, resp.status());
                return Ok(());
            }
            Err(e) => {
                if attempts == 1 {
                    info!("Waiting for application at {}...", url);
                }
                // Connection refused is expected while the app is starting
                if !e.is_connect() {
                    warn!("Readiness check error: {}", e);
                }
            }
        }

        if start.elapsed() >= timeout_duration {
            return Err(E2eError::NotReachable {
                url: url.to_string(),
                attempts,
            });
        }
        sleep(Duration::from_millis(100)).await;
    }
}
