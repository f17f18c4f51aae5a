//! Process-local store backing both repositories.
//!
//! Users and posts share one lock so that linking a post to its owner is
//! observed as a single step by concurrent readers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::data::post_repository::PostRepository;
use crate::data::user_repository::{DUPLICATE_USERNAME, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostChanges};
use crate::domain::user::User;

#[derive(Default)]
struct State {
    users: Vec<User>,
    posts: Vec<Post>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::validation(DUPLICATE_USERNAME));
        }
        state.users.push(user.clone());

        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.state.read().await.users.clone())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        let mut state = self.state.write().await;
        let owner = state
            .users
            .iter_mut()
            .find(|u| u.id == post.user_id)
            .ok_or(DomainError::UserNotFound(post.user_id))?;
        owner.blogs.push(post.id);
        state.posts.push(post.clone());

        info!(post_id = %post.id, user_id = %post.user_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let state = self.state.read().await;
        Ok(state.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DomainError> {
        let mut state = self.state.write().await;
        let Some(post) = state.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.apply(changes);

        info!(post_id = %id, "post updated");
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let Some(index) = state.posts.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        let removed = state.posts.remove(index);
        if let Some(owner) = state.users.iter_mut().find(|u| u.id == removed.user_id) {
            owner.blogs.retain(|blog| *blog != id);
        }

        info!(post_id = %id, "post deleted");
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.state.read().await.posts.clone())
    }
}
