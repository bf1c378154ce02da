//! Task item CRUD under the current list: NoTask -> TaskExists -> TaskDeleted

use super::unique_title;
use crate::api::expect_api_error;
use crate::context::SuiteContext;
use crate::error::E2eResult;
use crate::model::TaskItemUpdate;
use crate::scenario::ScenarioGroup;
use crate::{check, check_eq};

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "task_crud",
        vec![
            scenario!(create_task, reads: [AuthToken, GroupItem], writes: [TaskItem]),
            scenario!(retrieve_all_tasks, reads: [GroupItem, TaskItem], writes: []),
            scenario!(retrieve_task_by_id, reads: [GroupItem, TaskItem], writes: []),
            scenario!(mark_task_completed, reads: [GroupItem, TaskItem], writes: [TaskItem]),
            scenario!(rename_task, reads: [GroupItem, TaskItem], writes: [TaskItem]),
            scenario!(delete_task, reads: [GroupItem, TaskItem], writes: []),
        ],
    )
}

/// Ids of the current list and task.
fn current_ids(ctx: &SuiteContext) -> E2eResult<(i64, i64)> {
    let list = ctx.fixtures.require_group_item()?.id;
    let task = ctx.fixtures.require_task_item()?.id;
    Ok((list, task))
}

async fn create_task(ctx: &mut SuiteContext) -> E2eResult<()> {
    let list_id = ctx.fixtures.require_group_item()?.id;
    let title = unique_title("Test Task");
    let response = ctx.api.create_item(list_id, &title).await?;

    check_eq!(response.status, 201, "Status code should be 201 Created");
    check_eq!(response.data.title, title, "Task title should match what we sent");
    check!(!response.data.completed, "New task should not be completed");
    check_eq!(response.data.group_item_id, list_id, "Task should belong to correct list");

    ctx.fixtures.current_task_item = Some(response.data);
    Ok(())
}

async fn retrieve_all_tasks(ctx: &mut SuiteContext) -> E2eResult<()> {
    let list_id = ctx.fixtures.require_group_item()?.id;
    let expected = ctx.fixtures.require_task_item()?;
    let response = ctx.api.list_items(list_id).await?;

    check_eq!(response.status, 200, "Status code should be 200 OK");
    let found = response.data.iter().find(|task| task.id == expected.id);
    check!(found.is_some(), "Should find task {} in list {}", expected.id, list_id);
    if let Some(found) = found {
        check_eq!(found.title, expected.title, "Task title should match");
    }
    Ok(())
}

async fn retrieve_task_by_id(ctx: &mut SuiteContext) -> E2eResult<()> {
    let (list_id, task_id) = current_ids(ctx)?;
    let expected = ctx.fixtures.require_task_item()?;
    let response = ctx.api.get_item(list_id, task_id).await?;

    check_eq!(response.status, 200, "Status code should be 200 OK");
    check_eq!(response.data.id, task_id, "Task ID should match");
    check_eq!(response.data.title, expected.title, "Task title should match");
    Ok(())
}

async fn mark_task_completed(ctx: &mut SuiteContext) -> E2eResult<()> {
    let (list_id, task_id) = current_ids(ctx)?;
    let update = TaskItemUpdate {
        title: ctx.fixtures.require_task_item()?.title.clone(),
        completed: true,
    };
    let response = ctx.api.update_item(list_id, task_id, &update).await?;

    check_eq!(response.status, 200, "Status code should be 200 OK");
    check!(response.data.completed, "Task should be marked as completed");

    let reread = ctx.api.get_item(list_id, task_id).await?;
    check!(reread.data.completed, "Completed flag should persist");
    check_eq!(reread.data.title, update.title, "Title should be unchanged");

    ctx.fixtures.current_task_item = Some(response.data);
    Ok(())
}

async fn rename_task(ctx: &mut SuiteContext) -> E2eResult<()> {
    let (list_id, task_id) = current_ids(ctx)?;
    let completed = ctx.fixtures.require_task_item()?.completed;
    let update = TaskItemUpdate {
        title: unique_title("Updated Task"),
        completed,
    };
    let response = ctx.api.update_item(list_id, task_id, &update).await?;

    check_eq!(response.status, 200, "Status code should be 200 OK");
    check_eq!(response.data.title, update.title, "Task title should be updated");
    check_eq!(response.data.completed, completed, "Completed state should not change");

    ctx.fixtures.current_task_item = Some(response.data);
    Ok(())
}

/// Leaves `current_task_item` stale; the server no longer knows it.
async fn delete_task(ctx: &mut SuiteContext) -> E2eResult<()> {
    let (list_id, task_id) = current_ids(ctx)?;
    let response = ctx.api.delete_item(list_id, task_id).await?;
    check_eq!(response.status, 204, "Status code should be 204 No Content");

    expect_api_error(ctx.api.get_item(list_id, task_id).await, 404)?;
    Ok(())
}
