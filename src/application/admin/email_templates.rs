//! Transactional email template administration.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::input::FormInput;
use crate::application::messages;
use crate::application::options::{OptionStore, OptionStoreError};
use crate::application::repos::TemplateRepository;
use crate::application::sessions::AdminPrincipal;
use crate::domain::capabilities::Capability;
use crate::domain::options::{DISABLED_VALUE, ENABLE_FIELD, ENABLED_VALUE, OptionRecord};
use crate::domain::templates::{EmailTemplate, TemplateCategory};
use crate::util::sanitize::{escape_html, is_blank, newlines_to_breaks};

#[derive(Debug, Error)]
pub enum AdminEmailError {
    #[error("{}", messages::PERMISSION_DENIED)]
    PermissionDenied,
    #[error("{}", messages::INVALID_TEMPLATE_ID)]
    InvalidTemplateId,
    #[error("{}", messages::TEMPLATE_NOT_FOUND)]
    NotFound,
    #[error("{}", messages::TEMPLATE_ALWAYS_ENABLED)]
    AlwaysEnabled,
    #[error(transparent)]
    Store(#[from] OptionStoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub option_id: String,
    pub name: String,
    pub description: String,
    pub is_enabled: &'static str,
    pub disable_allowed: bool,
}

/// Template summaries grouped by category; empty groups are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateListing {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hrm: Vec<TemplateSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub crm: Vec<TemplateSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub acct: Vec<TemplateSummary>,
}

#[derive(Clone)]
pub struct AdminEmailTemplateService {
    templates: Arc<dyn TemplateRepository>,
    store: OptionStore,
    fixed_enabled: Arc<HashSet<String>>,
}

impl AdminEmailTemplateService {
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        store: OptionStore,
        fixed_enabled: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            templates,
            store,
            fixed_enabled: Arc::new(fixed_enabled.into_iter().collect()),
        }
    }

    fn disable_allowed(&self, option_id: &str) -> bool {
        !self.fixed_enabled.contains(option_id)
    }

    pub async fn list(
        &self,
        principal: &AdminPrincipal,
    ) -> Result<TemplateListing, AdminEmailError> {
        ensure_manager(principal)?;

        let mut listing = TemplateListing::default();
        for template in self.templates.list() {
            let bucket = match template.category {
                TemplateCategory::Hrm => &mut listing.hrm,
                TemplateCategory::Crm => &mut listing.crm,
                TemplateCategory::Acct => &mut listing.acct,
                TemplateCategory::Other => {
                    debug!(
                        target = "erp_settings::email_templates",
                        template = %template.id,
                        kind = %template.kind,
                        "template has no listing category"
                    );
                    continue;
                }
            };
            bucket.push(self.summarize(&template).await?);
        }

        Ok(listing)
    }

    async fn summarize(&self, template: &EmailTemplate) -> Result<TemplateSummary, AdminEmailError> {
        let option_id = template.option_id();
        let record = self.store.record(&option_id).await?;
        Ok(TemplateSummary {
            id: template.id.clone(),
            name: escape_html(&template.title),
            description: escape_html(&template.description),
            is_enabled: if record.is_enabled() {
                ENABLED_VALUE
            } else {
                DISABLED_VALUE
            },
            disable_allowed: self.disable_allowed(&option_id),
            option_id,
        })
    }

    /// Stored fields of one template, decorated for the editor.
    pub async fn get(
        &self,
        principal: &AdminPrincipal,
        input: &FormInput,
    ) -> Result<OptionRecord, AdminEmailError> {
        ensure_manager(principal)?;

        let template_id = input.text("template");
        let template = self
            .templates
            .get(&template_id)
            .ok_or(AdminEmailError::NotFound)?;
        let option_id = template.option_id();
        let mut record = self.store.record(&option_id).await?;

        let enabled_set = record
            .get_str(ENABLE_FIELD)
            .is_some_and(|value| !is_blank(value));
        if !enabled_set {
            record.set(ENABLE_FIELD, DISABLED_VALUE);
        }
        let body = record
            .get_str("body")
            .map(newlines_to_breaks)
            .unwrap_or_default();
        record.set("body", body);
        record.set("tags", template.tags.clone());
        record.set("disable_allowed", self.disable_allowed(&option_id));
        record.set("id", option_id);

        Ok(record)
    }

    /// Replace a template's stored subject, heading, body and enable flag.
    pub async fn update_template(
        &self,
        principal: &AdminPrincipal,
        input: &FormInput,
    ) -> Result<&'static str, AdminEmailError> {
        ensure_manager(principal)?;

        let option_id = input.text("id");
        if option_id.is_empty() {
            return Err(AdminEmailError::InvalidTemplateId);
        }

        let mut record = OptionRecord::new();
        record.set("subject", input.text("subject"));
        record.set("heading", input.text("heading"));
        record.set("body", input.html("body"));
        if input.text("is_enable") == ENABLED_VALUE {
            record.set_enabled(true);
        }

        self.store.replace_record(&option_id, record).await?;
        info!(
            target = "erp_settings::email_templates",
            option = %option_id,
            user = %principal.user_id,
            "email template updated"
        );
        Ok(messages::TEMPLATE_UPDATED)
    }

    /// Toggle a template on or off, keeping its other stored fields.
    pub async fn update_status(
        &self,
        principal: &AdminPrincipal,
        input: &FormInput,
    ) -> Result<(), AdminEmailError> {
        ensure_manager(principal)?;

        let option_id = input.text("option_id");
        if option_id.is_empty() {
            return Ok(());
        }
        let enable = input.text("option_value") == ENABLED_VALUE;
        if !enable && !self.disable_allowed(&option_id) {
            return Err(AdminEmailError::AlwaysEnabled);
        }

        let mut record = self.store.record(&option_id).await?;
        record.set_enabled(enable);
        self.store.replace_record(&option_id, record).await?;
        info!(
            target = "erp_settings::email_templates",
            option = %option_id,
            enabled = enable,
            "email template status updated"
        );
        Ok(())
    }
}

fn ensure_manager(principal: &AdminPrincipal) -> Result<(), AdminEmailError> {
    if principal.can(Capability::ManageOptions) {
        Ok(())
    } else {
        Err(AdminEmailError::PermissionDenied)
    }
}
