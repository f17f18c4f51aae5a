//! HTTP client for the blog server's REST API.

mod error;
mod http_client;

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::Deserialize;
use uuid::Uuid;

pub use error::BlogClientError;
pub use http_client::{BlogClient, PostUpdate};

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

/// Single-post endpoints return the owner id; listings populate it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Owner {
    Populated(OwnerSummary),
    Id(Uuid),
}

#[derive(Debug, Clone, Deserialize, Display)]
#[display("[{id}] {title} by {author} ({likes} likes) {url}")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u32,
    pub user: Option<Owner>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<BlogSummary>,
}

#[derive(Debug, Clone, Deserialize, Display)]
#[display("{author} ({count} posts)")]
pub struct AuthorPostCount {
    pub author: String,
    pub count: usize,
}

#[derive(Debug, Clone, Deserialize, Display)]
#[display("{author} ({likes} likes)")]
pub struct AuthorLikes {
    pub author: String,
    pub likes: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total_likes: u64,
    pub favorite_post: Option<Post>,
    pub most_prolific_author: Option<AuthorPostCount>,
    pub most_liked_author: Option<AuthorLikes>,
}
