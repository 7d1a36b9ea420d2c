//! Repository traits describing persistence adapters and registries.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::entities::AdminSessionRecord;
use crate::domain::templates::EmailTemplate;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Named option values with last-write-wins semantics per key.
#[async_trait]
pub trait OptionsRepo: Send + Sync {
    async fn get_option(&self, key: &str) -> Result<Option<Value>, RepoError>;

    /// Store `value` under `key`, returning whether the stored value changed.
    async fn update_option(&self, key: &str, value: Value) -> Result<bool, RepoError>;

    async fn health_check(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

/// Registered transactional email templates, in registration order.
pub trait TemplateRepository: Send + Sync {
    fn list(&self) -> Vec<EmailTemplate>;

    fn get(&self, id: &str) -> Option<EmailTemplate>;
}

#[async_trait]
pub trait SessionsRepo: Send + Sync {
    async fn find_session(
        &self,
        token_hash: &[u8],
    ) -> Result<Option<AdminSessionRecord>, RepoError>;
}
