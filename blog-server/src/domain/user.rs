use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub blogs: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, name: Option<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            name,
            password_hash,
            blogs: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Who a verified bearer token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: Uuid,
    pub username: String,
}

/// Registration input after validation. The password is still plaintext here
/// and is hashed by the user service before it reaches a store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: Option<String>,
    pub password: String,
}

impl NewUser {
    pub fn validate(
        username: Option<String>,
        name: Option<String>,
        password: Option<String>,
    ) -> Result<Self, DomainError> {
        let username = username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| DomainError::validation("`username` is required"))?;

        let password = password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DomainError::validation("`password` is required"))?;

        let user = Self {
            username,
            name: name.filter(|n| !n.trim().is_empty()),
            password,
        };
        user.check_lengths()?;
        Ok(user)
    }

    /// Minimum length rules, shared by request validation and registration.
    pub fn check_lengths(&self) -> Result<(), DomainError> {
        if self.username.chars().count() < MIN_USERNAME_LEN {
            return Err(DomainError::validation(format!(
                "`username` is shorter than the minimum allowed length ({MIN_USERNAME_LEN})"
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "`password` is shorter than the minimum allowed length ({MIN_PASSWORD_LEN})"
            )));
        }
        Ok(())
    }
}
