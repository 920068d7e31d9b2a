//! Wire DTOs for the auth and papers endpoints.
//!
//! DESIGN
//! ======
//! Field names mirror the server's camelCase JSON. List fields the server may
//! send as `null` or omit decode as empty so callers never see `Option<Vec>`.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<&'a str>,
}

/// Credential issued by `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginGrant {
    /// Header name the server expects the credential under.
    pub token_name: String,
    pub token_value: String,
}

/// Basic identity of a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserInfo {
    /// Nickname when set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// `GET /auth/info` payload: identity plus authorization labels.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub roles: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub permissions: Vec<String>,
}

impl CurrentUser {
    #[must_use]
    pub fn identity(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            nickname: self.nickname.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Result of uploading a paper PDF.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperUpload {
    pub paper_id: i64,
    pub title: String,
    pub file_path: String,
    pub file_hash: String,
    pub citation_count: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub doi: Option<String>,
    pub file_path: String,
    pub file_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Node of a paper's citation tree.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationNode {
    pub name: String,
    #[serde(default)]
    pub paper_id: Option<i64>,
    /// Server sends `0`/`1`.
    pub is_resolved: i64,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub cite_order: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<CitationNode>,
}

impl CitationNode {
    #[must_use]
    pub fn resolved(&self) -> bool {
        self.is_resolved != 0
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CitationNode::size).sum::<usize>()
    }
}
