use actix_web::dev::Payload;
use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::user::UserIdentity;
use crate::presentation::middleware::RequestId;

/// Handlers taking a `UserIdentity` only run for requests whose bearer token
/// was resolved by `JwtAuthMiddleware`.
impl FromRequest for UserIdentity {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<UserIdentity>() {
            Some(identity) => ready(Ok(identity.clone())),
            None => ready(Err(DomainError::Unauthorized)),
        }
    }
}

/// A create body may name its owner, but only as the caller itself.
pub fn ensure_claimed_owner(claimed: Option<Uuid>, identity: &UserIdentity) -> Result<(), DomainError> {
    match claimed {
        Some(user_id) if user_id != identity.id => Err(DomainError::Forbidden),
        _ => Ok(()),
    }
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

/// Shared error body for malformed JSON bodies and path segments.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    DomainError::validation(err.to_string()).into()
}

pub fn path_error_handler(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    DomainError::validation("malformatted id").into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity {
            id: Uuid::new_v4(),
            username: "root".into(),
        }
    }

    #[test]
    fn claimed_owner_must_match_caller() {
        let me = identity();
        assert!(ensure_claimed_owner(None, &me).is_ok());
        assert!(ensure_claimed_owner(Some(me.id), &me).is_ok());
        assert!(matches!(
            ensure_claimed_owner(Some(Uuid::new_v4()), &me),
            Err(DomainError::Forbidden)
        ));
    }
}
