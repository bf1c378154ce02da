//! Suite-scoped fixture state threaded through dependent scenarios

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{E2eError, E2eResult};
use crate::model::{AuthToken, GroupItem, TaskItem};

/// A slot of [`FixtureState`] that scenarios declare they read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureField {
    AuthToken,
    GroupItem,
    TaskItem,
    UiLoggedIn,
    UiList,
    UiTask,
}

impl FixtureField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixtureField::AuthToken => "auth_token",
            FixtureField::GroupItem => "current_group_item",
            FixtureField::TaskItem => "current_task_item",
            FixtureField::UiLoggedIn => "ui_logged_in",
            FixtureField::UiList => "ui_list_title",
            FixtureField::UiTask => "ui_task_title",
        }
    }
}

impl fmt::Display for FixtureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values produced by earlier scenarios and consumed by later ones.
///
/// Entities are always stored as the server returned them.
#[derive(Debug, Clone, Default)]
pub struct FixtureState {
    pub auth_token: Option<AuthToken>,
    pub current_group_item: Option<GroupItem>,
    pub current_task_item: Option<TaskItem>,
    pub ui_logged_in: bool,
    pub ui_list_title: Option<String>,
    pub ui_task_title: Option<String>,
}

impl FixtureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, field: FixtureField) -> bool {
        match field {
            FixtureField::AuthToken => self.auth_token.is_some(),
            FixtureField::GroupItem => self.current_group_item.is_some(),
            FixtureField::TaskItem => self.current_task_item.is_some(),
            FixtureField::UiLoggedIn => self.ui_logged_in,
            FixtureField::UiList => self.ui_list_title.is_some(),
            FixtureField::UiTask => self.ui_task_title.is_some(),
        }
    }

    /// Fields from `wanted` that are not populated, in order.
    pub fn missing(&self, wanted: &[FixtureField]) -> Vec<FixtureField> {
        wanted.iter().copied().filter(|f| !self.has(*f)).collect()
    }

    pub fn require_token(&self) -> E2eResult<&AuthToken> {
        self.auth_token.as_ref().ok_or_else(|| missing(FixtureField::AuthToken))
    }

    pub fn require_group_item(&self) -> E2eResult<&GroupItem> {
        self.current_group_item
            .as_ref()
            .ok_or_else(|| missing(FixtureField::GroupItem))
    }

    pub fn require_task_item(&self) -> E2eResult<&TaskItem> {
        self.current_task_item
            .as_ref()
            .ok_or_else(|| missing(FixtureField::TaskItem))
    }

    /// Identifier of the list teardown should delete, if any.
    pub fn leftover_group_item(&self) -> Option<i64> {
        self.auth_token.as_ref()?;
        self.current_group_item.as_ref().map(|item| item.id)
    }
}

fn missing(field: FixtureField) -> E2eError {
    E2eError::MissingFixture {
        field,
        producers: "unknown".to_string(),
    }
}
