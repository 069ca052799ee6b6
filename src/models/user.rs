//! User model. Users are created at registration and immutable afterwards
//! except for the admin flag.

use serde::{Deserialize, Serialize};

/// A registered community member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_admin: bool,
    pub created_at: String,
}

/// Insert payload for a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertUser {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Upsert payload for an identity-provider-linked user, keyed by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}
