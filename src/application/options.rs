//! Typed access to the option store.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::application::repos::{OptionsRepo, RepoError};
use crate::domain::error::DomainError;
use crate::domain::options::OptionRecord;

#[derive(Debug, Error)]
pub enum OptionStoreError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Clone)]
pub struct OptionStore {
    repo: Arc<dyn OptionsRepo>,
}

impl OptionStore {
    pub fn new(repo: Arc<dyn OptionsRepo>) -> Self {
        Self { repo }
    }

    /// Load a record-shaped option; missing options read as empty records.
    pub async fn record(&self, key: &str) -> Result<OptionRecord, OptionStoreError> {
        let stored = self.repo.get_option(key).await?;
        Ok(OptionRecord::from_stored(key, stored)?)
    }

    /// Overwrite the option with `record`, returning whether anything changed.
    pub async fn replace_record(
        &self,
        key: &str,
        record: OptionRecord,
    ) -> Result<bool, OptionStoreError> {
        Ok(self.repo.update_option(key, record.into_value()).await?)
    }

    /// Load a scalar text option, ignoring empty strings.
    pub async fn text(&self, key: &str) -> Result<Option<String>, OptionStoreError> {
        let stored = self.repo.get_option(key).await?;
        Ok(match stored {
            Some(Value::String(value)) if !value.trim().is_empty() => Some(value),
            _ => None,
        })
    }
}
