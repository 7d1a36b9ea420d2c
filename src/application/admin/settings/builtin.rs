use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::handler::{SettingsHandler, SettingsSaveError};
use crate::application::input::FormInput;
use crate::application::messages;
use crate::application::options::OptionStore;
use crate::domain::options::{DISABLED_VALUE, ENABLED_VALUE, OptionRecord};
use crate::domain::settings::{
    FieldKind, FieldSpec, MODULE_ACCOUNTING, MODULE_CRM, MODULE_EMAIL, MODULE_GENERAL, MODULE_HR,
    MODULE_INTEGRATION, ModuleSchema, SectionSchema, section_option_key,
};
use crate::util::sanitize::is_email;

const MONTHS: &[&str] = &[
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12",
];
const DATE_FORMATS: &[&str] = &["d-m-Y", "m-d-Y", "Y-m-d", "d/m/Y", "m/d/Y", "Y/m/d"];
const WORK_HOURS: &[&str] = &["0", "4", "8"];
const LIFE_STAGES: &[&str] = &["customer", "lead", "opportunity", "subscriber"];
const SMTP_SECURITY: &[&str] = &["", "ssl", "tls"];
const IMAP_SECURITY: &[&str] = &["ssl", "tls", "notls"];
const SMS_GATEWAYS: &[&str] = &["", "nexmo", "clickatell", "smsglobal", "hoiio", "twilio"];

/// Sections and fields of every module shipped with the panel.
pub fn builtin_schemas() -> Vec<ModuleSchema> {
    use FieldKind::*;

    vec![
        ModuleSchema {
            module: MODULE_GENERAL,
            sections: vec![SectionSchema::new(
                "general",
                vec![
                    FieldSpec::new("company_start_date", Text, ""),
                    FieldSpec::new("gen_financial_month", Choice(MONTHS), "1"),
                    FieldSpec::new("date_format", Choice(DATE_FORMATS), "d-m-Y"),
                    FieldSpec::new("erp_currency", Text, "USD"),
                    FieldSpec::new("erp_debug_mode", Checkbox, DISABLED_VALUE),
                ],
            )],
        },
        ModuleSchema {
            module: MODULE_HR,
            sections: vec![
                SectionSchema::new(
                    "workdays",
                    vec![
                        FieldSpec::new("mon", Choice(WORK_HOURS), "8"),
                        FieldSpec::new("tue", Choice(WORK_HOURS), "8"),
                        FieldSpec::new("wed", Choice(WORK_HOURS), "8"),
                        FieldSpec::new("thu", Choice(WORK_HOURS), "8"),
                        FieldSpec::new("fri", Choice(WORK_HOURS), "8"),
                        FieldSpec::new("sat", Choice(WORK_HOURS), "0"),
                        FieldSpec::new("sun", Choice(WORK_HOURS), "0"),
                    ],
                ),
                SectionSchema::new(
                    "leave",
                    vec![
                        FieldSpec::new("enable_extra_leave", Checkbox, DISABLED_VALUE),
                        FieldSpec::new("leave_year_start", Choice(MONTHS), "1"),
                        FieldSpec::new("default_leave_days", Number, "0"),
                    ],
                ),
                SectionSchema::new(
                    "miscellaneous",
                    vec![
                        FieldSpec::new("employee_id_prefix", Text, ""),
                        FieldSpec::new("remove_user_on_delete", Checkbox, DISABLED_VALUE),
                    ],
                ),
            ],
        },
        ModuleSchema {
            module: MODULE_ACCOUNTING,
            sections: vec![
                SectionSchema::new(
                    "customers",
                    vec![
                        FieldSpec::new("customer_prefix", Text, ""),
                        FieldSpec::new("vendor_prefix", Text, ""),
                    ],
                ),
                SectionSchema::new(
                    "currency",
                    vec![
                        FieldSpec::new("currency", Text, "USD"),
                        FieldSpec::new("thousand_separator", Choice(&[",", ".", " "]), ","),
                        FieldSpec::new("decimal_separator", Choice(&[".", ","]), "."),
                        FieldSpec::new("decimal_places", Number, "2"),
                    ],
                ),
            ],
        },
        ModuleSchema {
            module: MODULE_CRM,
            sections: vec![
                SectionSchema::new(
                    "contacts",
                    vec![FieldSpec::new(
                        "contact_life_stage",
                        Choice(LIFE_STAGES),
                        "customer",
                    )],
                ),
                SectionSchema::new(
                    "subscription",
                    vec![
                        FieldSpec::new("is_enabled", Checkbox, DISABLED_VALUE),
                        FieldSpec::new("email_subject", Text, ""),
                        FieldSpec::new("email_content", Html, ""),
                        FieldSpec::new("page_id", Number, "0"),
                    ],
                ),
            ],
        },
        ModuleSchema {
            module: MODULE_EMAIL,
            sections: vec![
                SectionSchema::new(
                    "general",
                    vec![
                        FieldSpec::new("from_name", Text, ""),
                        FieldSpec::new("from_email", Email, ""),
                        FieldSpec::new("header_image", Text, ""),
                        FieldSpec::new("footer_text", Html, ""),
                    ],
                ),
                SectionSchema::new(
                    "smtp",
                    vec![
                        FieldSpec::new("enable_smtp", Checkbox, DISABLED_VALUE),
                        FieldSpec::new("mail_server", Text, ""),
                        FieldSpec::new("port", Number, "25"),
                        FieldSpec::new("authentication", Choice(SMTP_SECURITY), ""),
                        FieldSpec::new("username", Text, ""),
                        FieldSpec::new("password", Secret, ""),
                        FieldSpec::new("debug", Checkbox, DISABLED_VALUE),
                    ],
                ),
                SectionSchema::new(
                    "imap",
                    vec![
                        FieldSpec::new("enable_imap", Checkbox, DISABLED_VALUE),
                        FieldSpec::new("mail_server", Text, ""),
                        FieldSpec::new("port", Number, "993"),
                        FieldSpec::new("authentication", Choice(IMAP_SECURITY), "ssl"),
                        FieldSpec::new("username", Text, ""),
                        FieldSpec::new("password", Secret, ""),
                    ],
                ),
            ],
        },
        ModuleSchema {
            module: MODULE_INTEGRATION,
            sections: vec![SectionSchema::new(
                "sms",
                vec![
                    FieldSpec::new("sms_gateway", Choice(SMS_GATEWAYS), ""),
                    FieldSpec::new("api_key", Text, ""),
                    FieldSpec::new("api_secret", Secret, ""),
                ],
            )],
        },
    ]
}

/// Stores each section of a module as one option record of whitelisted fields.
pub struct SchemaSettingsHandler {
    schema: ModuleSchema,
    store: OptionStore,
}

impl SchemaSettingsHandler {
    pub fn new(schema: ModuleSchema, store: OptionStore) -> Self {
        Self { schema, store }
    }

    /// A sub-section, when sent, names the stored section.
    fn section(&self, section: &str, sub_section: &str) -> Result<&SectionSchema, SettingsSaveError> {
        let id = if sub_section.is_empty() {
            section
        } else {
            sub_section
        };
        self.schema
            .section(id)
            .ok_or_else(|| SettingsSaveError::rejected(messages::UNKNOWN_SECTION))
    }
}

#[async_trait]
impl SettingsHandler for SchemaSettingsHandler {
    async fn save(
        &self,
        section: &str,
        sub_section: &str,
        input: &FormInput,
    ) -> Result<(), SettingsSaveError> {
        let schema = self.section(section, sub_section)?;

        let mut record = OptionRecord::new();
        for field in &schema.fields {
            record.set(field.name, normalize_field(field, input)?);
        }

        let key = section_option_key(self.schema.module, schema.id);
        let changed = self.store.replace_record(&key, record).await?;
        info!(
            target = "erp_settings::settings",
            option = %key,
            changed,
            "settings section saved"
        );
        Ok(())
    }

    async fn load(
        &self,
        section: &str,
        sub_section: &str,
    ) -> Result<OptionRecord, SettingsSaveError> {
        let schema = self.section(section, sub_section)?;
        let key = section_option_key(self.schema.module, schema.id);
        let stored = self.store.record(&key).await?;

        let mut merged = OptionRecord::new();
        for field in &schema.fields {
            merged.set(field.name, field.default);
        }
        for (name, value) in stored.into_map() {
            merged.set(name, value);
        }
        Ok(merged)
    }
}

fn normalize_field(field: &FieldSpec, input: &FormInput) -> Result<Value, SettingsSaveError> {
    let raw = input.raw(field.name).map(str::trim).unwrap_or_default();

    let value = match field.kind {
        FieldKind::Text => input.text(field.name),
        FieldKind::Html => input.html(field.name),
        FieldKind::Secret => raw.to_string(),
        FieldKind::Email => {
            let value = input.text(field.name);
            if !value.is_empty() && !is_email(&value) {
                return Err(invalid_field(field));
            }
            value
        }
        FieldKind::Number => {
            if raw.is_empty() {
                field.default.to_string()
            } else if raw.bytes().all(|byte| byte.is_ascii_digit()) {
                raw.to_string()
            } else {
                return Err(invalid_field(field));
            }
        }
        FieldKind::Checkbox => {
            let checked = matches!(raw, "yes" | "on" | "1");
            if checked { ENABLED_VALUE } else { DISABLED_VALUE }.to_string()
        }
        FieldKind::Choice(options) => {
            if raw.is_empty() {
                field.default.to_string()
            } else if options.contains(&raw) {
                raw.to_string()
            } else {
                return Err(invalid_field(field));
            }
        }
    };

    Ok(Value::String(value))
}

fn invalid_field(field: &FieldSpec) -> SettingsSaveError {
    SettingsSaveError::rejected(format!("Invalid value provided for {}", field.name))
}
