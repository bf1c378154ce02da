//! Suite runner: acquires the shared clients, runs the groups in order and
//! tears down on every exit path

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::browser::BrowserDriver;
use crate::chrome::ChromeSession;
use crate::config::SuiteConfig;
use crate::context::{SuiteContext, TeardownSummary};
use crate::error::{E2eError, E2eResult};
use crate::scenario::{producers_of, Outcome, Scenario, ScenarioGroup, ScenarioResult};
use crate::scenarios::default_groups;

/// Result of running the whole suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
    pub teardown: TeardownSummary,
}

impl SuiteReport {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Look up a result by `group/scenario`.
    pub fn result(&self, qualified_name: &str) -> Option<&ScenarioResult> {
        self.results
            .iter()
            .find(|r| r.qualified_name() == qualified_name)
    }

    /// Write the report to `<dir>/test-results.json`.
    pub fn write_to(&self, dir: &std::path::Path) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join("test-results.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

/// Main E2E runner
pub struct SuiteRunner {
    config: SuiteConfig,
    groups: Vec<ScenarioGroup>,
    browser: Option<Box<dyn BrowserDriver>>,
}

impl SuiteRunner {
    /// Runner over the four standard groups
    pub fn new(config: SuiteConfig) -> Self {
        Self::with_groups(config, default_groups())
    }

    pub fn with_groups(config: SuiteConfig, groups: Vec<ScenarioGroup>) -> Self {
        Self {
            config,
            groups,
            browser: None,
        }
    }

    /// Use an already open browser session instead of launching Chrome.
    pub fn with_browser(mut self, browser: Box<dyn BrowserDriver>) -> Self {
        self.browser = Some(browser);
        self
    }

    /// Keep only the named groups, preserving their order.
    pub fn only_groups(mut self, names: &[String]) -> Self {
        if !names.is_empty() {
            self.groups.retain(|g| names.iter().any(|n| n == g.name));
        }
        self
    }

    fn needs_browser(&self) -> bool {
        self.config.ui.enabled && self.groups.iter().any(|g| g.requires_browser)
    }

    /// Run every group and tear down.
    pub async fn run(mut self) -> E2eResult<SuiteReport> {
        info!("Setting up test environment...");
        let api = ApiClient::from_config(&self.config.api)?;

        // An injected session is handed to the context even when unused, so
        // teardown closes it.
        let browser = match self.browser.take() {
            Some(browser) => Some(browser),
            None if self.needs_browser() => {
                Some(Box::new(ChromeSession::open(&self.config.ui).await?) as Box<dyn BrowserDriver>)
            }
            None => None,
        };
        info!("Test environment setup complete");

        let groups = self.groups;
        let ctx = SuiteContext::new(self.config, api, browser);
        let start = Instant::now();

        let (results, teardown) = ctx
            .scope(|ctx| async move { run_groups(ctx, &groups).await }.boxed())
            .await;

        let passed = results.iter().filter(|r| r.outcome == Outcome::Passed).count();
        let failed = results.iter().filter(|r| r.outcome == Outcome::Failed).count();
        let skipped = results.iter().filter(|r| r.outcome == Outcome::Skipped).count();
        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Test Results: {} passed, {} failed, {} skipped ({} ms)",
            passed, failed, skipped, duration_ms
        );

        Ok(SuiteReport {
            total: results.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            results,
            teardown,
        })
    }
}

async fn run_groups(ctx: &mut SuiteContext, groups: &[ScenarioGroup]) -> Vec<ScenarioResult> {
    let mut results = Vec::new();

    for group in groups {
        info!("── {} ({} scenarios)", group.name, group.scenarios.len());

        if group.requires_browser && (!ctx.config.ui.enabled || !ctx.has_browser()) {
            for scenario in &group.scenarios {
                info!("- {}/{} (skipped: UI disabled)", group.name, scenario.name);
                results.push(ScenarioResult {
                    group: group.name.to_string(),
                    name: scenario.name.to_string(),
                    outcome: Outcome::Skipped,
                    duration_ms: 0,
                    error: None,
                    screenshot: None,
                });
            }
            continue;
        }

        // Strictly sequential: each scenario may read what the previous one wrote.
        for scenario in &group.scenarios {
            let result = run_scenario(ctx, groups, group, scenario).await;
            match result.outcome {
                Outcome::Passed => info!("✓ {} ({} ms)", result.qualified_name(), result.duration_ms),
                _ => error!(
                    "✗ {} - {}",
                    result.qualified_name(),
                    result.error.as_deref().unwrap_or("unknown error")
                ),
            }
            results.push(result);
        }
    }

    results
}

async fn run_scenario(
    ctx: &mut SuiteContext,
    groups: &[ScenarioGroup],
    group: &ScenarioGroup,
    scenario: &Scenario,
) -> ScenarioResult {
    let start = Instant::now();
    debug!("Running scenario: {}/{}", group.name, scenario.name);

    let mut screenshot = None;
    let outcome = match ctx.fixtures.missing(scenario.reads).first() {
        Some(&field) => {
            let producers = producers_of(groups, field);
            Err(E2eError::MissingFixture {
                field,
                producers: if producers.is_empty() {
                    "nothing".to_string()
                } else {
                    producers.join(", ")
                },
            })
        }
        None => {
            let outcome = execute(ctx, scenario).await;
            // Only a scenario that ran can have left the page in a telling state.
            if outcome.is_err() && group.requires_browser {
                screenshot = capture_failure(ctx, group, scenario).await;
            }
            outcome
        }
    };

    ScenarioResult {
        group: group.name.to_string(),
        name: scenario.name.to_string(),
        outcome: if outcome.is_ok() { Outcome::Passed } else { Outcome::Failed },
        duration_ms: start.elapsed().as_millis() as u64,
        error: outcome.err().map(|e| e.to_string()),
        screenshot,
    }
}

/// Run the body under the scenario timeout, turning panics into failures.
async fn execute(ctx: &mut SuiteContext, scenario: &Scenario) -> E2eResult<()> {
    let limit = ctx.config.suite.scenario_timeout();
    let body = AssertUnwindSafe((scenario.run)(ctx)).catch_unwind();

    match tokio::time::timeout(limit, body).await {
        Ok(Ok(result)) => result,
        Ok(Err(panic)) => Err(E2eError::Panicked(panic_message(panic.as_ref()))),
        Err(_) => Err(E2eError::Timeout(format!(
            "scenario {} ({} ms)",
            scenario.name,
            limit.as_millis()
        ))),
    }
}

async fn capture_failure(
    ctx: &SuiteContext,
    group: &ScenarioGroup,
    scenario: &Scenario,
) -> Option<String> {
    let browser = ctx.browser().ok()?;
    let path = ctx
        .config
        .suite
        .output_dir
        .join("screenshots")
        .join(format!("{}-{}.png", group.name, scenario.name));

    match browser.screenshot(&path).await {
        Ok(()) => Some(path.to_string_lossy().to_string()),
        Err(e) => {
            warn!("Could not capture screenshot for {}: {}", scenario.name, e);
            None
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
