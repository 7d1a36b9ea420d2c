use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("option `{key}` does not hold a key-value record")]
    MalformedOption { key: String },
    #[error("unknown capability `{0}`")]
    UnknownCapability(String),
}

impl DomainError {
    pub fn malformed_option(key: impl Into<String>) -> Self {
        Self::MalformedOption { key: key.into() }
    }}
