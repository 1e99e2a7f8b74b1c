use std::sync::Arc;
use anyhow::Context;
use thiserror::Error;
use tracing::info;
use crate::models::user::{NewUser, User};
use crate::repositories::UserRepository;

pub const BCRYPT_COST: u32 = 12;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Name, email, and password are required")]
    MissingFields,

    #[error("Email already in use")]
    EmailTaken,

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

pub struct UserRegistrationService {
    repo: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
}

impl UserRegistrationService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self::with_cost(repo, BCRYPT_COST)
    }

    pub fn with_cost(repo: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, RegistrationError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.trim().is_empty() {
            return Err(RegistrationError::MissingFields);
        }

        if self.repo.find_user_by_email(email).await?.is_some() {
            return Err(RegistrationError::EmailTaken);
        }

        let hashed_password = hash_password(password.to_string(), self.bcrypt_cost).await?;
        let created = self
            .repo
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                hashed_password,
            })
            .await?;

        // a concurrent registration can win the race between lookup and insert
        let user = created.ok_or(RegistrationError::EmailTaken)?;
        info!("Registered user with id: {}", user.id);
        Ok(user)
    }
}

/// Hashing is CPU bound and runs on the blocking pool.
async fn hash_password(password: String, cost: u32) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("Password hashing task failed")?
        .context("Failed to hash password")
}
