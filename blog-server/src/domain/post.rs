use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u32,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(user_id: Uuid, new_post: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new_post.title,
            author: new_post.author,
            url: new_post.url,
            likes: new_post.likes,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies only the fields present in `changes`.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(author) = changes.author {
            self.author = author;
        }
        if let Some(url) = changes.url {
            self.url = url;
        }
        if let Some(likes) = changes.likes {
            self.likes = likes;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u32,
}

impl NewPost {
    pub fn validate(
        title: Option<String>,
        author: Option<String>,
        url: Option<String>,
        likes: Option<i64>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            title: required("title", title)?,
            author: author.unwrap_or_default(),
            url: required("url", url)?,
            likes: likes.map(like_count).transpose()?.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u32>,
}

impl PostChanges {
    pub fn validate(
        title: Option<String>,
        author: Option<String>,
        url: Option<String>,
        likes: Option<i64>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            title: title.map(|t| required("title", Some(t))).transpose()?,
            author,
            url: url.map(|u| required("url", Some(u))).transpose()?,
            likes: likes.map(like_count).transpose()?,
        })
    }

    /// True when the request names no field to change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.url.is_none() && self.likes.is_none()
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, DomainError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DomainError::validation(format!("`{field}` is required")))
}

fn like_count(likes: i64) -> Result<u32, DomainError> {
    u32::try_from(likes)
        .map_err(|_| DomainError::validation(format!("`likes` out of range: {likes}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(likes: Option<i64>) -> Result<NewPost, DomainError> {
        NewPost::validate(
            Some("TDD harms architecture".into()),
            Some("Robert C. Martin".into()),
            Some("http://blog.cleancoder.com/uncle-bob/2017/03/03/TDD-Harms-Architecture.html".into()),
            likes,
        )
    }

    #[test]
    fn likes_default_to_zero() {
        assert_eq!(new_post(None).unwrap().likes, 0);
        assert_eq!(new_post(Some(7)).unwrap().likes, 7);
    }

    #[test]
    fn negative_likes_are_rejected() {
        let err = new_post(Some(-1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn title_and_url_are_required() {
        let err = NewPost::validate(None, None, Some("https://x.dev".into()), None).unwrap_err();
        assert_eq!(err.to_string(), "`title` is required");

        let err = NewPost::validate(Some("t".into()), None, Some(" ".into()), None).unwrap_err();
        assert_eq!(err.to_string(), "`url` is required");
    }

    #[test]
    fn apply_touches_only_supplied_fields() {
        let owner = Uuid::new_v4();
        let mut post = Post::new(owner, new_post(Some(3)).unwrap());
        let changes = PostChanges::validate(None, None, None, Some(1234)).unwrap();

        post.apply(changes);

        assert_eq!(post.likes, 1234);
        assert_eq!(post.title, "TDD harms architecture");
        assert_eq!(post.user_id, owner);
    }

    #[test]
    fn empty_title_in_changes_is_rejected() {
        assert!(PostChanges::validate(Some(String::new()), None, None, None).is_err());
        assert!(PostChanges::default().is_empty());
    }

    #[test]
    fn owner_serializes_as_user() {
        let owner = Uuid::new_v4();
        let post = Post::new(owner, new_post(None).unwrap());
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["user"], owner.to_string());
        assert_eq!(value["likes"], 0);
    }
}
