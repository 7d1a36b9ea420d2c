use async_trait::async_trait;
use thiserror::Error;

use crate::application::input::FormInput;
use crate::application::options::OptionStoreError;
use crate::domain::options::OptionRecord;

#[derive(Debug, Error)]
pub enum SettingsSaveError {
    /// Shown to the user as is.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Store(#[from] OptionStoreError),
}

impl SettingsSaveError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// Persists and reads back the settings of one module.
#[async_trait]
pub trait SettingsHandler: Send + Sync {
    /// Store the submitted fields of `section`.
    ///
    /// `sub_section` is empty when the panel did not send one.
    async fn save(
        &self,
        section: &str,
        sub_section: &str,
        input: &FormInput,
    ) -> Result<(), SettingsSaveError>;

    async fn load(&self, section: &str, sub_section: &str)
    -> Result<OptionRecord, SettingsSaveError>;
}
