//! The four scenario groups, in the order they must run
//!
//! ```text
//! authentication ──auth_token──▶ list_crud ──current_group_item──▶ task_crud
//!                                                                   (api)
//! ui_flow: login ─▶ create_list ─▶ add_task ─▶ mark_complete ─▶ delete_list ─▶ logout
//! ```

use chrono::Utc;

use crate::scenario::ScenarioGroup;

/// Declare a [`Scenario`](crate::scenario::Scenario) from an
/// `async fn(&mut SuiteContext) -> E2eResult<()>` in scope.
macro_rules! scenario {
    ($func:ident, reads: [$($r:ident),*], writes: [$($w:ident),*]) => {{
        fn run(
            ctx: &mut $crate::context::SuiteContext,
        ) -> futures::future::BoxFuture<'_, $crate::error::E2eResult<()>> {
            Box::pin($func(ctx))
        }
        $crate::scenario::Scenario {
            name: stringify!($func),
            reads: &[$($crate::fixture::FixtureField::$r),*],
            writes: &[$($crate::fixture::FixtureField::$w),*],
            run,
        }
    }};
}

pub mod auth;
pub mod lists;
pub mod tasks;
pub mod ui;

/// All groups in execution order.
pub fn default_groups() -> Vec<ScenarioGroup> {
    vec![auth::group(), lists::group(), tasks::group(), ui::group()]
}

/// `"<prefix> <unix millis>"`, unique across repeated runs.
pub fn unique_title(prefix: &str) -> String {
    format!("{} {}", prefix, Utc::now().timestamp_millis())
}
