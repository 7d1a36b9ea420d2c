//! Form input as submitted by the settings panel.

use std::collections::HashMap;

use crate::util::sanitize::{is_blank, sanitize_post_html, sanitize_text_field};

/// Flat field map of one request; later sources overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    fields: HashMap<String, String>,
}

impl FormInput {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Merge query parameters under body fields; body values win.
    pub fn from_sources(query: HashMap<String, String>, body: HashMap<String, String>) -> Self {
        let mut fields = query;
        fields.extend(body);
        Self { fields }
    }

    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Whether the field carries a value; empty strings and `"0"` do not.
    pub fn is_present(&self, name: &str) -> bool {
        self.raw(name).is_some_and(|value| !is_blank(value))
    }

    /// Sanitized single-line text, empty when the field is absent or blank.
    pub fn text(&self, name: &str) -> String {
        match self.raw(name) {
            Some(value) if !is_blank(value) => sanitize_text_field(value),
            _ => String::new(),
        }
    }

    /// Sanitized text of the first present field among `names`.
    pub fn text_any(&self, names: &[&str]) -> String {
        names
            .iter()
            .find(|name| self.is_present(name))
            .map(|name| self.text(name))
            .unwrap_or_default()
    }

    /// Markup limited to the safe post subset, empty when absent or blank.
    pub fn html(&self, name: &str) -> String {
        match self.raw(name) {
            Some(value) if !is_blank(value) => sanitize_post_html(value),
            _ => String::new(),
        }
    }}

impl<const N: usize> From<[(&str, &str); N]> for FormInput {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }
}
