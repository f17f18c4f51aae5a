use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::user::{NewUser, User};
use crate::infrastructure::security::hash_password;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    pub async fn register(&self, new_user: NewUser) -> Result<User, DomainError> {
        new_user.check_lengths()?;
        let NewUser {
            username,
            name,
            password,
        } = new_user;

        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|err| DomainError::Internal(format!("hashing task failed: {err}")))?
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = self.users.create(User::new(username, name, hash)).await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// All users, each paired with its posts in the order they were linked.
    pub async fn list_users(&self) -> Result<Vec<(User, Vec<Post>)>, DomainError> {
        let users = self.users.list().await?;
        let posts: HashMap<_, _> = self
            .posts
            .list()
            .await?
            .into_iter()
            .map(|post| (post.id, post))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let blogs = user
                    .blogs
                    .iter()
                    .filter_map(|id| posts.get(id).cloned())
                    .collect();
                (user, blogs)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::domain::post::NewPost;
    use rstest::rstest;

    fn service(store: &Arc<InMemoryStore>) -> UserService {
        UserService::new(store.clone(), store.clone())
    }

    fn root() -> NewUser {
        NewUser {
            username: "root".into(),
            name: Some("Superuser".into()),
            password: "sekret".into(),
        }
    }

    #[tokio::test]
    async fn register_stores_hash_not_password() {
        let store = Arc::new(InMemoryStore::new());
        let user = service(&store).register(root()).await.unwrap();

        assert_ne!(user.password_hash, "sekret");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn second_registration_with_same_username_fails() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(&store);
        service.register(root()).await.unwrap();

        let err = service
            .register(NewUser {
                username: "root".into(),
                name: None,
                password: "completely different".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(ref m) if m.contains("`username` to be unique")));
    }

    #[rstest]
    #[case("ro", "salainen", "`username` is shorter than the minimum")]
    #[case("root", "sa", "`password` is shorter than the minimum")]
    #[tokio::test]
    async fn register_enforces_minimum_lengths(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: &str,
    ) {
        let store = Arc::new(InMemoryStore::new());
        let service = service(&store);

        let err = service
            .register(NewUser {
                username: username.into(),
                name: None,
                password: password.into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(ref m) if m.contains(expected)), "got {err}");
        assert!(UserRepository::list(store.as_ref()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_users_populates_blogs() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(&store);
        let user = service.register(root()).await.unwrap();
        let post = PostRepository::create(
            store.as_ref(),
            Post::new(
                user.id,
                NewPost {
                    title: "React patterns".into(),
                    author: "Michael Chan".into(),
                    url: "https://reactpatterns.com/".into(),
                    likes: 7,
                },
            ),
        )
        .await
        .unwrap();

        let listed = service.list_users().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].1, vec![post]);
    }
}
