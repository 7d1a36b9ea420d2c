//! Capabilities checked by the settings panel.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Authorization grants recognised by the settings dispatcher.
///
/// Role systems may attach any number of other grants to a user; those are
/// ignored here rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageOptions,
    HrManager,
    AccountingManager,
    CrmManager,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManageOptions => "manage_options",
            Self::HrManager => "erp_hr_manager",
            Self::AccountingManager => "erp_ac_manager",
            Self::CrmManager => "erp_crm_manager",
        }
    }

    pub fn all() -> &'static [Capability] {
        &[
            Self::ManageOptions,
            Self::HrManager,
            Self::AccountingManager,
            Self::CrmManager,
        ]
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|cap| cap.as_str() == s)
            .ok_or_else(|| DomainError::UnknownCapability(s.to_string()))
    }
}
