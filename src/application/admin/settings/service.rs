use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use super::handler::SettingsSaveError;
use super::registry::SettingsRegistry;
use crate::application::input::FormInput;
use crate::application::messages;
use crate::application::options::OptionStoreError;
use crate::application::sessions::AdminPrincipal;
use crate::domain::capabilities::Capability;
use crate::domain::options::OptionRecord;

#[derive(Debug, Error)]
pub enum AdminSettingsError {
    #[error("{}", messages::PERMISSION_DENIED)]
    PermissionDenied,
    #[error("{}", messages::UNREGISTERED_MODULE)]
    UnregisteredModule(String),
    #[error("{0}")]
    Rejected(String),
    #[error("{}", messages::PROCESSING_FAILED)]
    Processing,
    #[error(transparent)]
    Store(#[from] OptionStoreError),
}

/// Module, section and sub-section named by a settings request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRequest {
    pub module: String,
    pub section: String,
    pub sub_section: String,
}

impl SettingsRequest {
    pub fn from_input(input: &FormInput) -> Self {
        Self {
            module: input.text("module"),
            section: input.text("section"),
            sub_section: input.text_any(&["sub_sub_section", "sub_section"]),
        }
    }
}

#[derive(Clone)]
pub struct AdminSettingsService {
    registry: Arc<SettingsRegistry>,
}

impl AdminSettingsService {
    pub fn new(registry: Arc<SettingsRegistry>) -> Self {
        Self { registry }
    }

    /// Save one section, returning the confirmation shown by the panel.
    pub async fn save(
        &self,
        principal: &AdminPrincipal,
        input: &FormInput,
    ) -> Result<String, AdminSettingsError> {
        let request = SettingsRequest::from_input(input);

        if !self.registry.can_save(principal, &request.module) {
            return Err(AdminSettingsError::PermissionDenied);
        }

        let entry = self
            .registry
            .resolve(&request.module)
            .ok_or_else(|| AdminSettingsError::UnregisteredModule(request.module.clone()))?;

        entry
            .handler
            .save(&request.section, &request.sub_section, input)
            .await
            .map_err(|err| match err {
                SettingsSaveError::Rejected(message) => AdminSettingsError::Rejected(message),
                SettingsSaveError::Store(err) => AdminSettingsError::Store(err),
            })?;

        Ok(messages::save_success("Settings"))
    }

    /// Load a section merged over its defaults.
    ///
    /// Failures past the permission check collapse into
    /// [`AdminSettingsError::Processing`]; the cause is only logged.
    pub async fn get_data(
        &self,
        principal: &AdminPrincipal,
        input: &FormInput,
    ) -> Result<OptionRecord, AdminSettingsError> {
        if !principal.can(Capability::ManageOptions) {
            return Err(AdminSettingsError::PermissionDenied);
        }

        let request = SettingsRequest::from_input(input);
        let Some(entry) = self.registry.resolve(&request.module) else {
            warn!(
                target = "erp_settings::settings",
                module = %request.module,
                "settings data requested for unregistered module"
            );
            return Err(AdminSettingsError::Processing);
        };

        entry
            .handler
            .load(&request.section, &request.sub_section)
            .await
            .map_err(|err| {
                warn!(
                    target = "erp_settings::settings",
                    module = %request.module,
                    section = %request.section,
                    error = %err,
                    "failed to process settings data"
                );
                AdminSettingsError::Processing
            })
    }
}
