//! Linear scenario chains with declared fixture dependencies

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::context::SuiteContext;
use crate::error::E2eResult;
use crate::fixture::FixtureField;

/// Body of a scenario
pub type ScenarioFn = for<'a> fn(&'a mut SuiteContext) -> BoxFuture<'a, E2eResult<()>>;

/// One step of a group.
///
/// `reads` must be populated before the scenario starts; `writes` documents
/// what it leaves behind for later scenarios.
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub reads: &'static [FixtureField],
    pub writes: &'static [FixtureField],
    pub run: ScenarioFn,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish()
    }
}

/// An ordered set of scenarios sharing a dependency chain
#[derive(Debug, Clone)]
pub struct ScenarioGroup {
    pub name: &'static str,
    /// Needs the shared browser session
    pub requires_browser: bool,
    pub scenarios: Vec<Scenario>,
}

impl ScenarioGroup {
    pub fn new(name: &'static str, scenarios: Vec<Scenario>) -> Self {
        Self {
            name,
            requires_browser: false,
            scenarios,
        }
    }

    pub fn with_browser(mut self) -> Self {
        self.requires_browser = true;
        self
    }
}

/// Qualified names of the scenarios (across `groups`) that write `field`.
pub fn producers_of(groups: &[ScenarioGroup], field: FixtureField) -> Vec<String> {
    groups
        .iter()
        .flat_map(|g| {
            g.scenarios
                .iter()
                .filter(move |s| s.writes.contains(&field))
                .map(move |s| format!("{}/{}", g.name, s.name))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub group: String,
    pub name: String,
    pub outcome: Outcome,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot: Option<String>,
}

impl ScenarioResult {
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.group, self.name)
    }
}
