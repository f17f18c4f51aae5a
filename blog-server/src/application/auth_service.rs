use std::sync::Arc;

use tracing::{info, instrument};

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{JwtKeys, verify_password};

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = tokio::task::spawn_blocking({
            let password = password.to_owned();
            let hash = user.password_hash.clone();
            move || verify_password(&password, &hash)
        })
        .await
        .map_err(|err| DomainError::Internal(format!("verification task failed: {err}")))?
        .map_err(|_| DomainError::Unauthorized)?;
        if !valid {
            return Err(DomainError::Unauthorized);
        }

        let token = self
            .keys
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Internal(err.to_string()))?;

        info!(user_id = %user.id, "user logged in");
        Ok(LoginOutcome { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::infrastructure::security::hash_password;

    async fn service() -> AuthService {
        let store = Arc::new(InMemoryStore::new());
        let hash = hash_password("sekret").unwrap();
        UserRepository::create(store.as_ref(), User::new("root".into(), None, hash))
            .await
            .unwrap();
        AuthService::new(store, JwtKeys::new("login-test".into()))
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let service = service().await;
        let outcome = service.login("root", "sekret").await.unwrap();

        let claims = service.keys().verify_token(&outcome.token).unwrap();
        assert_eq!(claims.sub, outcome.user.id.to_string());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_unauthorized() {
        let service = service().await;
        assert!(matches!(
            service.login("root", "wrong").await,
            Err(DomainError::Unauthorized)
        ));
        assert!(matches!(
            service.login("nobody", "sekret").await,
            Err(DomainError::Unauthorized)
        ));
    }
}
