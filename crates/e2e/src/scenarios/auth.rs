//! Authentication flow: Unauthenticated -> Authenticated

use tracing::info;

use crate::api::expect_api_error;
use crate::context::SuiteContext;
use crate::error::E2eResult;
use crate::model::{AuthToken, Credentials};
use crate::scenario::ScenarioGroup;
use crate::{check, check_eq};

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "authentication",
        vec![
            scenario!(authenticate, reads: [], writes: [AuthToken]),
            scenario!(reject_invalid_credentials, reads: [], writes: []),
            scenario!(require_auth_for_protected_endpoints, reads: [], writes: []),
        ],
    )
}

/// Log in with the seeded account and authenticate the shared client.
async fn authenticate(ctx: &mut SuiteContext) -> E2eResult<()> {
    let response = ctx.api.authenticate(&ctx.config.credentials).await?;

    check_eq!(response.status, 200, "Status code should be 200 OK");
    let token = AuthToken::new(response.data.auth_token);
    check!(
        token.len() > 10,
        "Auth token should be a valid JWT, got {} chars",
        token.len()
    );

    ctx.api.set_auth_token(&token)?;
    ctx.fixtures.auth_token = Some(token);
    info!("Authenticated as user {}", response.data.user_id);
    Ok(())
}

async fn reject_invalid_credentials(ctx: &mut SuiteContext) -> E2eResult<()> {
    let wrong = Credentials {
        email: "wrong@example.com".to_string(),
        password: "wrongpassword".to_string(),
    };
    let data = expect_api_error(ctx.api.authenticate(&wrong).await, 401)?;
    check!(
        data.get("error").is_some(),
        "Response should include error message, got {}",
        data
    );
    Ok(())
}

async fn require_auth_for_protected_endpoints(ctx: &mut SuiteContext) -> E2eResult<()> {
    let anonymous = ctx.api.without_auth();
    expect_api_error(anonymous.list_group_items().await, 401)?;
    Ok(())
}
