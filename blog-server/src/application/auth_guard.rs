//! Bearer-token identity resolution and post ownership checks.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::user::UserIdentity;
use crate::infrastructure::security::JwtKeys;

const BEARER_PREFIX: &str = "bearer ";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    Missing,
    #[error("invalid bearer token")]
    Invalid,
    #[error(transparent)]
    Store(DomainError),
}

/// Missing and invalid credentials collapse into one unauthorized outcome.
impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Missing | AuthError::Invalid => DomainError::Unauthorized,
            AuthError::Store(inner) => inner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    Denied,
}

impl Authorization {
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Authorization::Allowed => Ok(()),
            Authorization::Denied => Err(DomainError::Forbidden),
        }
    }
}

pub fn authorize_mutation(identity: &UserIdentity, post: &Post) -> Authorization {
    if identity.id == post.user_id {
        Authorization::Allowed
    } else {
        Authorization::Denied
    }
}

#[derive(Clone)]
pub struct AuthGuard {
    keys: JwtKeys,
    users: Arc<dyn UserRepository>,
}

impl AuthGuard {
    pub fn new(keys: JwtKeys, users: Arc<dyn UserRepository>) -> Self {
        Self { keys, users }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// Pulls the token out of an `Authorization` header value.
    pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
        let header = header.ok_or(AuthError::Missing)?;
        let prefix = header.get(..BEARER_PREFIX.len()).ok_or(AuthError::Missing)?;
        if !prefix.eq_ignore_ascii_case(BEARER_PREFIX) {
            return Err(AuthError::Missing);
        }
        let token = header[BEARER_PREFIX.len()..].trim();
        if token.is_empty() {
            return Err(AuthError::Missing);
        }
        Ok(token)
    }

    pub async fn resolve_identity(&self, header: Option<&str>) -> Result<UserIdentity, AuthError> {
        let token = Self::extract_bearer(header)?;

        let claims = self.keys.verify_token(token).map_err(|err| {
            debug!(error = %err, "token verification failed");
            AuthError::Invalid
        })?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::Invalid)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(AuthError::Store)?
            .ok_or_else(|| {
                debug!(user_id = %user_id, "token subject does not resolve");
                AuthError::Invalid
            })?;

        Ok(user.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::domain::post::NewPost;
    use crate::domain::user::User;
    use rstest::rstest;

    const SECRET: &str = "guard-test-secret";

    async fn guard_with_user() -> (AuthGuard, User) {
        let store = Arc::new(InMemoryStore::new());
        let user = UserRepository::create(
            store.as_ref(),
            User::new("root".into(), None, "hash".into()),
        )
        .await
        .unwrap();
        let guard = AuthGuard::new(JwtKeys::new(SECRET.into()), store);
        (guard, user)
    }

    fn post_owned_by(owner: Uuid) -> Post {
        Post::new(
            owner,
            NewPost {
                title: "Type wars".into(),
                author: "Robert C. Martin".into(),
                url: "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html".into(),
                likes: 2,
            },
        )
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("Basic abc"))]
    #[case(Some("bearer"))]
    #[case(Some("bearer    "))]
    #[case(Some("tokenwithoutprefix"))]
    fn unusable_headers_are_missing(#[case] header: Option<&str>) {
        assert!(matches!(AuthGuard::extract_bearer(header), Err(AuthError::Missing)));
    }

    #[rstest]
    #[case("bearer abc.def.ghi")]
    #[case("Bearer abc.def.ghi")]
    #[case("BEARER abc.def.ghi")]
    fn prefix_is_case_insensitive(#[case] header: &str) {
        assert_eq!(AuthGuard::extract_bearer(Some(header)).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn multibyte_header_does_not_panic() {
        assert!(AuthGuard::extract_bearer(Some("bearé token")).is_err());
    }

    #[tokio::test]
    async fn valid_token_resolves_to_its_user() {
        let (guard, user) = guard_with_user().await;
        let token = guard.keys().generate_token(user.id, &user.username).unwrap();

        let identity = guard
            .resolve_identity(Some(&format!("Bearer {token}")))
            .await
            .unwrap();

        assert_eq!(identity, user.identity());
    }

    #[tokio::test]
    async fn bad_signature_and_unknown_subject_are_invalid() {
        let (guard, user) = guard_with_user().await;

        let forged = JwtKeys::new("other-secret".into())
            .generate_token(user.id, &user.username)
            .unwrap();
        let err = guard
            .resolve_identity(Some(&format!("bearer {forged}")))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Invalid));

        let ghost = guard.keys().generate_token(Uuid::new_v4(), "ghost").unwrap();
        let err = guard
            .resolve_identity(Some(&format!("bearer {ghost}")))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Invalid));
    }

    #[tokio::test]
    async fn expired_token_is_invalid() {
        let (guard, user) = guard_with_user().await;
        let expired = JwtKeys::with_ttl(SECRET.into(), -3600)
            .generate_token(user.id, &user.username)
            .unwrap();

        let err = guard
            .resolve_identity(Some(&format!("bearer {expired}")))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Invalid));
    }

    #[test]
    fn missing_and_invalid_are_indistinguishable_to_callers() {
        let missing = DomainError::from(AuthError::Missing);
        let invalid = DomainError::from(AuthError::Invalid);
        assert_eq!(missing.to_string(), invalid.to_string());
        assert!(matches!(missing, DomainError::Unauthorized));
        assert!(matches!(invalid, DomainError::Unauthorized));
    }

    #[test]
    fn mutation_allowed_iff_ids_are_equal() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        for identity_id in &ids {
            for owner_id in &ids {
                let identity = UserIdentity {
                    id: *identity_id,
                    username: "someone".into(),
                };
                let expected = if identity_id == owner_id {
                    Authorization::Allowed
                } else {
                    Authorization::Denied
                };
                assert_eq!(authorize_mutation(&identity, &post_owned_by(*owner_id)), expected);
            }
        }
    }

    #[test]
    fn ownership_compares_values_not_representations() {
        let owner = Uuid::new_v4();
        let reparsed = Uuid::parse_str(&owner.to_string().to_uppercase()).unwrap();
        let identity = UserIdentity {
            id: reparsed,
            username: "root".into(),
        };
        assert_eq!(authorize_mutation(&identity, &post_owned_by(owner)), Authorization::Allowed);
    }

    #[test]
    fn denied_maps_to_forbidden() {
        assert!(Authorization::Allowed.into_result().is_ok());
        assert!(matches!(
            Authorization::Denied.into_result(),
            Err(DomainError::Forbidden)
        ));
    }
}
