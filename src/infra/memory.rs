//! In-process repositories for tests and local tooling.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::application::repos::{OptionsRepo, RepoError, SessionsRepo};
use crate::application::sessions::SessionService;
use crate::domain::entities::AdminSessionRecord;

#[derive(Debug, Default)]
pub struct InMemoryOptionsRepo {
    values: RwLock<HashMap<String, Value>>,
}

impl InMemoryOptionsRepo {
    pub fn seed(&self, key: &str, value: Value) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value);
        }
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    pub fn len(&self) -> usize {
        self.values.read().map(|values| values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OptionsRepo for InMemoryOptionsRepo {
    async fn get_option(&self, key: &str) -> Result<Option<Value>, RepoError> {
        let values = self
            .values
            .read()
            .map_err(|_| RepoError::from_persistence("option store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn update_option(&self, key: &str, value: Value) -> Result<bool, RepoError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| RepoError::from_persistence("option store lock poisoned"))?;
        let changed = values.get(key) != Some(&value);
        values.insert(key.to_string(), value);
        Ok(changed)
    }
}

/// Sessions keyed by the hash of their bearer token.
#[derive(Debug, Default)]
pub struct InMemorySessionsRepo {
    sessions: RwLock<HashMap<Vec<u8>, AdminSessionRecord>>,
}

impl InMemorySessionsRepo {
    pub fn insert(&self, token: &str, record: AdminSessionRecord) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(SessionService::hash_token(token), record);
        }
    }
}

#[async_trait]
impl SessionsRepo for InMemorySessionsRepo {
    async fn find_session(
        &self,
        token_hash: &[u8],
    ) -> Result<Option<AdminSessionRecord>, RepoError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| RepoError::from_persistence("session store lock poisoned"))?;
        Ok(sessions.get(token_hash).cloned())
    }
}
