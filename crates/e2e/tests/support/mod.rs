//! In-process stand-ins for the application under test.
#![allow(dead_code)]

pub mod fake_browser;

use todo_e2e::SuiteConfig;

/// Config pointing at a fake app, with short timeouts.
pub fn config_for(api_base: &str) -> SuiteConfig {
    let mut config = SuiteConfig::default();
    config.api.base_url = api_base.to_string();
    config.api.timeout_ms = 5_000;
    config.ui.element_timeout_ms = 1_000;
    config.ui.login_timeout_ms = 1_000;
    config.ui.confirm_timeout_ms = 300;
    config.suite.scenario_timeout_ms = 10_000;
    config
}
