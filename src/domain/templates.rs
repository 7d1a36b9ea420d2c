//! Transactional email templates and their categories.

use serde::Serialize;

/// Prefix of the option that stores a template's editable fields.
pub const TEMPLATE_OPTION_PREFIX: &str = "erp_email_settings_";

/// Output bucket of the template listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Hrm,
    Crm,
    Acct,
    /// Registered without a recognisable category; omitted from listings.
    Other,
}

const HRM_KIND_MARKERS: &[&str] = &["HRM", "ERP_Document", "ERP_Recruitment", "Training"];
const CRM_KIND_MARKERS: &[&str] = &["CRM"];
const ACCOUNTING_KIND_MARKERS: &[&str] = &["Accounting"];

impl TemplateCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hrm => "hrm",
            Self::Crm => "crm",
            Self::Acct => "acct",
            Self::Other => "other",
        }
    }

    /// Derive a category from a template kind name.
    ///
    /// Case-sensitive substring match; HRM-family markers win over CRM, CRM
    /// over Accounting.
    pub fn from_kind(kind: &str) -> Self {
        let matches = |markers: &[&str]| markers.iter().any(|marker| kind.contains(marker));

        if matches(HRM_KIND_MARKERS) {
            Self::Hrm
        } else if matches(CRM_KIND_MARKERS) {
            Self::Crm
        } else if matches(ACCOUNTING_KIND_MARKERS) {
            Self::Acct
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    /// Registry key, e.g. `new-leave-request`.
    pub id: String,
    /// Kind name the template was registered under.
    pub kind: String,
    pub title: String,
    pub description: String,
    /// Placeholders available to the template body, in declaration order.
    pub tags: Vec<String>,
    pub category: TemplateCategory,
}

impl EmailTemplate {
    /// Build a template whose category is derived from `kind`.
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let kind = kind.into();
        let category = TemplateCategory::from_kind(&kind);
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            description: description.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            category,
        }
    }

    pub fn with_category(mut self, category: TemplateCategory) -> Self {
        self.category = category;
        self
    }

    pub fn option_id(&self) -> String {
        format!("{TEMPLATE_OPTION_PREFIX}{}", self.id)
    }
}
