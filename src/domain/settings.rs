//! Settings modules, their sections and the fields each section stores.

use super::capabilities::Capability;

pub const MODULE_GENERAL: &str = "general";
pub const MODULE_HR: &str = "erp-hr";
pub const MODULE_ACCOUNTING: &str = "erp-ac";
pub const MODULE_CRM: &str = "erp-crm";
pub const MODULE_EMAIL: &str = "erp-email";
pub const MODULE_INTEGRATION: &str = "erp-integration";

/// Option holding the email module's general section, read for default sender details.
pub const EMAIL_GENERAL_OPTION: &str = "erp_settings_erp-email_general";
/// Option holding the site administrator's address.
pub const ADMIN_EMAIL_OPTION: &str = "admin_email";

/// Capability that may stand in for `manage_options` on a built-in module.
pub fn builtin_manager_capability(module: &str) -> Option<Capability> {
    match module {
        MODULE_HR => Some(Capability::HrManager),
        MODULE_ACCOUNTING => Some(Capability::AccountingManager),
        MODULE_CRM => Some(Capability::CrmManager),
        _ => None,
    }
}

/// Storage key of a module section, e.g. `erp_settings_erp-hr_leave`.
pub fn section_option_key(module: &str, section: &str) -> String {
    format!("erp_settings_{module}_{section}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line plain text.
    Text,
    Email,
    /// Non-negative integer.
    Number,
    /// Stored as `yes` or `no`.
    Checkbox,
    /// One of a fixed set of values.
    Choice(&'static [&'static str]),
    /// Markup restricted to the safe post subset.
    Html,
    /// Stored verbatim after trimming; never echoed to logs.
    Secret,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: &'static str,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSchema {
    pub id: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl SectionSchema {
    pub fn new(id: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { id, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSchema {
    pub module: &'static str,
    pub sections: Vec<SectionSchema>,
}

impl ModuleSchema {
    pub fn section(&self, id: &str) -> Option<&SectionSchema> {
        self.sections.iter().find(|section| section.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_hr_accounting_and_crm_have_manager_overrides() {
        assert_eq!(
            builtin_manager_capability(MODULE_HR),
            Some(Capability::HrManager)
        );
        assert_eq!(
            builtin_manager_capability(MODULE_ACCOUNTING),
            Some(Capability::AccountingManager)
        );
        assert_eq!(
            builtin_manager_capability(MODULE_CRM),
            Some(Capability::CrmManager)
        );
        for module in [MODULE_GENERAL, MODULE_EMAIL, MODULE_INTEGRATION, "custom"] {
            assert_eq!(builtin_manager_capability(module), None);
        }
    }

    #[test]
    fn section_keys_follow_module_and_section() {
        assert_eq!(
            section_option_key(MODULE_EMAIL, "general"),
            EMAIL_GENERAL_OPTION
        );
    }
}
