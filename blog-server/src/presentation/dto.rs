use crate::domain::post::{NewPost, Post, PostChanges};
use crate::domain::user::{NewUser, User};
use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ======================= USERS =======================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, DomainError> {
        NewUser::validate(self.username, self.name, self.password)
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<BlogSummary>,
}

impl UserResponse {
    pub fn new(user: User, blogs: Vec<Post>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            blogs: blogs.into_iter().map(BlogSummary::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
}

impl From<Post> for BlogSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            author: post.author,
            url: post.url,
        }
    }
}

// ======================= LOGIN =======================

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
}

// ======================= POSTS =======================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
    pub user_id: Option<Uuid>,
}

impl CreatePostRequest {
    pub fn validate(self) -> Result<NewPost, DomainError> {
        NewPost::validate(self.title, self.author, self.url, self.likes)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl UpdatePostRequest {
    pub fn validate(self) -> Result<PostChanges, DomainError> {
        PostChanges::validate(self.title, self.author, self.url, self.likes)
    }
}

#[derive(Debug, Serialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

/// A post as listed, with its owner populated.
#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u32,
    pub user: Option<OwnerSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post: Post, owner: Option<User>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            author: post.author,
            url: post.url,
            likes: post.likes,
            user: owner.map(|user| OwnerSummary {
                id: user.id,
                username: user.username,
                name: user.name,
            }),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
