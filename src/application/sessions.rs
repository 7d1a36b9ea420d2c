//! Admin session authentication.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::application::repos::SessionsRepo;
use crate::domain::capabilities::Capability;
use crate::domain::entities::AdminSessionRecord;

#[derive(Debug, Error)]
pub enum SessionAuthError {
    #[error("missing session token")]
    Missing,
    #[error("invalid session token")]
    Invalid,
    #[error("expired session")]
    Expired,
}

/// The user behind an authenticated admin request.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminPrincipal {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub capabilities: Vec<Capability>,
}

impl AdminPrincipal {
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }}

impl From<AdminSessionRecord> for AdminPrincipal {
    fn from(record: AdminSessionRecord) -> Self {
        let capabilities = record
            .capabilities
            .iter()
            .filter_map(|name| name.parse::<Capability>().ok())
            .collect();
        Self {
            user_id: record.user_id,
            session_id: record.session_id,
            display_name: record.display_name,
            email: record.email,
            capabilities,
        }
    }
}

#[derive(Clone)]
pub struct SessionService {
    repo: Arc<dyn SessionsRepo>,
}

impl SessionService {
    pub fn new(repo: Arc<dyn SessionsRepo>) -> Self {
        Self { repo }
    }

    pub async fn authenticate(&self, token: &str) -> Result<AdminPrincipal, SessionAuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionAuthError::Missing);
        }

        let record = self
            .repo
            .find_session(&Self::hash_token(token))
            .await
            .map_err(|err| {
                debug!(target = "erp_settings::sessions", error = %err, "session lookup failed");
                SessionAuthError::Invalid
            })?
            .ok_or(SessionAuthError::Invalid)?;

        if record.expires_at <= OffsetDateTime::now_utc() {
            return Err(SessionAuthError::Expired);
        }

        Ok(AdminPrincipal::from(record))
    }

    /// Sessions are stored by the SHA-256 digest of their bearer token.
    pub fn hash_token(token: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hasher.finalize().to_vec()
    }
}
