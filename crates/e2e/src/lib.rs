//! Todo App E2E Test Suite
//!
//! This crate drives the todo list application through its two boundaries:
//! - the REST JSON API (`/api/v1`), via a bearer-authenticated HTTP client
//! - the browser UI, via a single shared Chrome session
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SuiteRunner (Rust)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  setup:    ApiClient::from_config, ChromeSession::open      │
//! │  scope:    SuiteContext::scope(run_groups) ── teardown       │
//! │              (delete leftover list, close browser)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioGroup (in order)                                   │
//! │    authentication ─▶ list_crud ─▶ task_crud ─▶ ui_flow       │
//! │  Scenario { name, reads: [FixtureField],                    │
//! │             writes: [FixtureField], run }                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  FixtureState                                               │
//! │    auth_token, current_group_item, current_task_item,       │
//! │    ui_logged_in, ui_list_title, ui_task_title               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scenarios run strictly in sequence. A scenario whose declared reads are
//! missing fails immediately, naming the scenario that should have written
//! them.

pub mod api;
pub mod assert;
pub mod browser;
pub mod chrome;
pub mod config;
pub mod context;
pub mod error;
pub mod fixture;
pub mod model;
pub mod runner;
pub mod scenario;
pub mod scenarios;
pub mod server;

pub use api::{ApiClient, ApiResponse};
pub use browser::{BrowserDriver, DomElement};
pub use config::SuiteConfig;
pub use context::{SuiteContext, TeardownSummary};
pub use error::{E2eError, E2eResult};
pub use fixture::{FixtureField, FixtureState};
pub use runner::{SuiteReport, SuiteRunner};
