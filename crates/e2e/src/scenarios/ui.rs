//! Browser flow: LoggedOut -> LoggedIn -> list and task created -> task
//! completed -> list deleted -> LoggedOut

use tracing::{debug, info};

use super::unique_title;
use crate::browser::poll_until;
use crate::context::SuiteContext;
use crate::error::{E2eError, E2eResult};
use crate::scenario::ScenarioGroup;
use crate::{check, check_eq};

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "ui_flow",
        vec![
            scenario!(login, reads: [], writes: [UiLoggedIn]),
            scenario!(create_list, reads: [UiLoggedIn], writes: [UiList]),
            scenario!(add_task, reads: [UiLoggedIn, UiList], writes: [UiTask]),
            scenario!(mark_task_complete, reads: [UiLoggedIn, UiTask], writes: []),
            scenario!(delete_list, reads: [UiLoggedIn], writes: []),
            scenario!(logout, reads: [UiLoggedIn], writes: [UiLoggedIn]),
        ],
    )
    .with_browser()
}

async fn login(ctx: &mut SuiteContext) -> E2eResult<()> {
    let ui = &ctx.config.ui;
    let browser = ctx.browser()?;

    browser.navigate(&ui.frontend_url).await?;
    browser.wait_for_element("form", ui.element_timeout()).await?;

    let credentials = &ctx.config.credentials;
    browser
        .find_element(r#"input[name="email"]"#)
        .await?
        .send_keys(&credentials.email)
        .await?;
    browser
        .find_element(r#"input[name="password"]"#)
        .await?
        .send_keys(&credentials.password)
        .await?;
    browser.find_element(r#"button[type="submit"]"#).await?.click().await?;

    browser.wait_for_element(".lists", ui.login_timeout()).await?;
    let logout = browser.find_element(".logout").await?;
    check!(
        logout.is_displayed().await?,
        "Logout button should be visible after login"
    );

    ctx.fixtures.ui_logged_in = true;
    Ok(())
}

async fn create_list(ctx: &mut SuiteContext) -> E2eResult<()> {
    let timeout = ctx.config.ui.element_timeout();
    let browser = ctx.browser()?;
    let title = unique_title("UI Test List");

    browser.find_element(".add-list").await?.click().await?;
    browser.wait_for_element(".list-form", timeout).await?;
    browser
        .find_element(r#"input[name="list_title"]"#)
        .await?
        .send_keys(&title)
        .await?;
    browser
        .find_element(r#".list-form button[type="submit"]"#)
        .await?
        .click()
        .await?;

    let list = browser.wait_for_text(".list", &title, timeout).await?;
    check!(list.is_displayed().await?, "New list should be visible in the UI");

    ctx.fixtures.ui_list_title = Some(title);
    Ok(())
}

async fn add_task(ctx: &mut SuiteContext) -> E2eResult<()> {
    let timeout = ctx.config.ui.element_timeout();
    let browser = ctx.browser()?;
    let title = unique_title("UI Test Task");

    let lists = browser.find_elements(".list").await?;
    let first = lists
        .first()
        .ok_or_else(|| E2eError::ElementNotFound(".list".to_string()))?;
    first.click().await?;

    browser.wait_for_element(".tasks", timeout).await?;
    browser.find_element(".add-task").await?.click().await?;
    browser.wait_for_element(".task-form", timeout).await?;
    browser
        .find_element(r#"input[name="title"]"#)
        .await?
        .send_keys(&title)
        .await?;
    browser
        .find_element(r#".task-form button[type="submit"]"#)
        .await?
        .click()
        .await?;

    let task = browser.wait_for_text(".task", &title, timeout).await?;
    check!(task.is_displayed().await?, "New task should be visible in the UI");

    ctx.fixtures.ui_task_title = Some(title);
    Ok(())
}

/// The app applies the `completed` class asynchronously, so poll for it.
async fn mark_task_complete(ctx: &mut SuiteContext) -> E2eResult<()> {
    let timeout = ctx.config.ui.element_timeout();
    let browser = ctx.browser()?;

    let tasks = browser.find_elements(".task").await?;
    let first = tasks
        .first()
        .ok_or_else(|| E2eError::ElementNotFound(".task".to_string()))?;
    let checkbox = first.find_child(r#"input[type="checkbox"]"#).await?;
    let task_id = first
        .attribute("data-id")
        .await?
        .ok_or_else(|| E2eError::AssertionFailed("Task element has no data-id".to_string()))?;

    checkbox.click().await?;
    debug!("toggled task {}", task_id);

    browser
        .wait_for_element(&format!(r#".task[data-id="{}"].completed"#, task_id), timeout)
        .await?;

    let task = browser
        .find_element(&format!(r#".task[data-id="{}"]"#, task_id))
        .await?;
    let classes = task.attribute("class").await?.unwrap_or_default();
    check!(
        classes.split_whitespace().any(|c| c == "completed"),
        "Task should have completed class, got '{}'",
        classes
    );
    Ok(())
}

async fn delete_list(ctx: &mut SuiteContext) -> E2eResult<()> {
    let ui = &ctx.config.ui;
    let browser = ctx.browser()?;

    let lists = browser.find_elements(".list").await?;
    let initial = lists.len();
    let first = lists
        .first()
        .ok_or_else(|| E2eError::ElementNotFound(".list".to_string()))?;
    first.find_child(".delete-list").await?.click().await?;

    // Not every build asks for confirmation.
    match browser.wait_for_element(".confirmation", ui.confirm_timeout()).await {
        Ok(_) => {
            browser.find_element(".confirm-delete").await?.click().await?;
        }
        Err(E2eError::Timeout(_)) => debug!("no confirmation dialog"),
        Err(e) => return Err(e),
    }

    poll_until(ui.element_timeout(), "list count to decrease", move || async move {
        browser
            .find_elements(".list")
            .await
            .map(|lists| lists.len() < initial)
    })
    .await?;

    let remaining = browser.find_elements(".list").await?.len();
    check_eq!(remaining, initial - 1, "List count should decrease by 1");
    info!("List deleted ({} -> {})", initial, remaining);
    Ok(())
}

async fn logout(ctx: &mut SuiteContext) -> E2eResult<()> {
    let timeout = ctx.config.ui.element_timeout();
    let browser = ctx.browser()?;

    browser.find_element(".logout").await?.click().await?;
    let form = browser.wait_for_element("form", timeout).await?;
    check!(form.is_displayed().await?, "Login form should be visible after logout");

    let submit = browser.find_element(r#"button[type="submit"]"#).await?;
    check!(
        submit.is_displayed().await?,
        "Login button should be visible after logout"
    );

    ctx.fixtures.ui_logged_in = false;
    Ok(())
}
