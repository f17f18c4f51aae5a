use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::auth_guard::authorize_mutation;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges};
use crate::domain::stats::BlogStats;
use crate::domain::user::{User, UserIdentity};

/// Who may update a post. Deletion is always owner-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    #[default]
    OwnerOnly,
    AnyAuthenticated,
}

impl UpdatePolicy {
    pub fn from_flag(enforce_ownership: bool) -> Self {
        if enforce_ownership {
            UpdatePolicy::OwnerOnly
        } else {
            UpdatePolicy::AnyAuthenticated
        }
    }
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    update_policy: UpdatePolicy,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        update_policy: UpdatePolicy,
    ) -> Self {
        Self {
            posts,
            users,
            update_policy,
        }
    }

    pub fn update_policy(&self) -> UpdatePolicy {
        self.update_policy
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    /// Every post alongside its owner, when the owner still resolves.
    pub async fn list_posts(&self) -> Result<Vec<(Post, Option<User>)>, DomainError> {
        let posts = self.posts.list().await?;
        let owners: HashMap<_, _> = self
            .users
            .list()
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let owner = owners.get(&post.user_id).cloned();
                (post, owner)
            })
            .collect())
    }

    pub async fn stats(&self) -> Result<BlogStats, DomainError> {
        let posts = self.posts.list().await?;
        Ok(BlogStats::from_posts(&posts))
    }

    #[instrument(skip(self, new_post), fields(user_id = %identity.id))]
    pub async fn create_post(
        &self,
        identity: &UserIdentity,
        new_post: NewPost,
    ) -> Result<Post, DomainError> {
        self.posts.create(Post::new(identity.id, new_post)).await
    }

    #[instrument(skip(self, changes), fields(user_id = %identity.id))]
    pub async fn update_post(
        &self,
        identity: &UserIdentity,
        post_id: Uuid,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let existing = self.get_post(post_id).await?;
        if self.update_policy == UpdatePolicy::OwnerOnly {
            authorize_mutation(identity, &existing).into_result()?;
        }
        if changes.is_empty() {
            return Ok(existing);
        }

        self.posts
            .update(post_id, changes)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    /// Deleting an id that no longer exists succeeds without doing anything.
    #[instrument(skip(self), fields(user_id = %identity.id))]
    pub async fn delete_post(&self, identity: &UserIdentity, post_id: Uuid) -> Result<(), DomainError> {
        let Some(existing) = self.posts.find_by_id(post_id).await? else {
            info!(post_id = %post_id, "post already absent");
            return Ok(());
        };
        authorize_mutation(identity, &existing).into_result()?;

        self.posts.delete(post_id).await?;
        Ok(())
    }
}
