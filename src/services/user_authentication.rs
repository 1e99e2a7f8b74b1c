use std::sync::Arc;
use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};
use crate::models::user::User;
use crate::repositories::UserRepository;

#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Incorrect password")]
    WrongPassword,

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Checks an email and password against the stored bcrypt hash. No session or
/// token is issued here.
pub struct UserAuthenticationService {
    repo: Arc<dyn UserRepository>,
}

impl UserAuthenticationService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthenticationError> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(AuthenticationError::MissingCredentials);
        }

        let Some(user) = self.repo.find_user_by_email(email).await? else {
            debug!("Login attempt for unknown email: {}", email);
            return Err(AuthenticationError::UserNotFound);
        };

        if !verify_password(password.to_string(), user.hashed_password.clone()).await? {
            debug!("Password mismatch for user with id: {}", user.id);
            return Err(AuthenticationError::WrongPassword);
        }

        info!("Authenticated user with id: {}", user.id);
        Ok(user)
    }
}

/// A stored hash that bcrypt cannot parse never matches.
async fn verify_password(password: String, hashed_password: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed_password).unwrap_or(false))
        .await
        .context("Password verification task failed")
}
