//! Task list CRUD: NoList -> ListExists

use super::unique_title;
use crate::api::expect_api_error;
use crate::context::SuiteContext;
use crate::error::E2eResult;
use crate::scenario::ScenarioGroup;
use crate::{check, check_eq};

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "list_crud",
        vec![
            scenario!(create_list, reads: [AuthToken], writes: [GroupItem]),
            scenario!(retrieve_all_lists, reads: [AuthToken, GroupItem], writes: []),
            scenario!(retrieve_list_by_id, reads: [AuthToken, GroupItem], writes: []),
            scenario!(update_list, reads: [AuthToken, GroupItem], writes: [GroupItem]),
            scenario!(reject_list_without_title, reads: [AuthToken], writes: []),
        ],
    )
}

async fn create_list(ctx: &mut SuiteContext) -> E2eResult<()> {
    let title = unique_title("Test List");
    let response = ctx.api.create_group_item(&title).await?;

    check_eq!(response.status, 201, "Status code should be 201 Created");
    check_eq!(response.data.list_title, title, "List title should match what we sent");

    ctx.fixtures.current_group_item = Some(response.data);
    Ok(())
}

async fn retrieve_all_lists(ctx: &mut SuiteContext) -> E2eResult<()> {
    let expected = ctx.fixtures.require_group_item()?;
    let response = ctx.api.list_group_items().await?;

    check_eq!(response.status, 200, "Status code should be 200 OK");
    let found = response.data.iter().find(|item| item.id == expected.id);
    check!(found.is_some(), "Should find list {} in the index", expected.id);
    if let Some(found) = found {
        check_eq!(found.list_title, expected.list_title, "List title should match");
    }
    Ok(())
}

async fn retrieve_list_by_id(ctx: &mut SuiteContext) -> E2eResult<()> {
    let expected = ctx.fixtures.require_group_item()?;
    let response = ctx.api.get_group_item(expected.id).await?;

    check_eq!(response.status, 200, "Status code should be 200 OK");
    check_eq!(response.data.id, expected.id, "List ID should match");
    check_eq!(response.data.list_title, expected.list_title, "List title should match");
    Ok(())
}

async fn update_list(ctx: &mut SuiteContext) -> E2eResult<()> {
    let id = ctx.fixtures.require_group_item()?.id;
    let title = unique_title("Updated List");
    let response = ctx.api.update_group_item(id, &title).await?;

    check_eq!(response.status, 200, "Status code should be 200 OK");
    check_eq!(response.data.list_title, title, "List title should be updated");

    let reread = ctx.api.get_group_item(id).await?;
    check_eq!(reread.data.list_title, title, "Reads should reflect the new title");

    ctx.fixtures.current_group_item = Some(response.data);
    Ok(())
}

async fn reject_list_without_title(ctx: &mut SuiteContext) -> E2eResult<()> {
    let before = ctx.api.list_group_items().await?.data.len();

    let data = expect_api_error(ctx.api.create_group_item("").await, 422)?;
    check!(
        data.get("errors").is_some(),
        "Response should include validation errors, got {}",
        data
    );

    let after = ctx.api.list_group_items().await?.data.len();
    check_eq!(after, before, "Rejected list must not be persisted");
    Ok(())
}
