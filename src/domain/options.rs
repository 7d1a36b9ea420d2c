//! Option records: named key-value blobs kept by the option store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::DomainError;

/// Field toggled by the enable/disable switch of an email template.
pub const ENABLE_FIELD: &str = "is_enable";
/// The only value an enabled record may carry in [`ENABLE_FIELD`].
pub const ENABLED_VALUE: &str = "yes";
pub const DISABLED_VALUE: &str = "no";

/// A persisted option value that holds a field map.
///
/// A missing option and an explicit `null` both read as an empty record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionRecord(Map<String, Value>);

impl OptionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret a stored option value as a record.
    pub fn from_stored(key: &str, value: Option<Value>) -> Result<Self, DomainError> {
        match value {
            None | Some(Value::Null) => Ok(Self::new()),
            Some(Value::Object(map)) => Ok(Self(map)),
            Some(_) => Err(DomainError::malformed_option(key)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.get(field).is_some_and(|value| !value.is_null())
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Presence of the enable field means enabled, whatever it holds.
    pub fn is_enabled(&self) -> bool {
        self.contains(ENABLE_FIELD)
    }

    /// Enabling writes the literal `"yes"`; disabling deletes the field.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.set(ENABLE_FIELD, ENABLED_VALUE);
        } else {
            self.remove(ENABLE_FIELD);
        }
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for OptionRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
