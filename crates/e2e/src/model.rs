//! Wire types of the todo API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Login credentials of the seeded account
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "admin@todo.com".to_string(),
            password: "admin".to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /auth_token`; the API expects the credentials nested.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest<'a> {
    pub credentials: &'a Credentials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub auth_token: String,
    pub user_id: i64,
}

/// Opaque bearer token issued by the API
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({} chars)", self.0.len())
    }
}

/// A task list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupItem {
    pub id: i64,
    pub list_title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Create/update body for a task list
#[derive(Debug, Clone, Serialize)]
pub struct GroupItemParams {
    pub list_title: String,
}

/// A single to-do entry, always scoped under one [`GroupItem`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub group_item_id: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTaskItem {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskItemUpdate {
    pub title: String,
    pub completed: bool,
}
