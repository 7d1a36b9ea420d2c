//! Domain layer types and invariants.

pub mod capabilities;
pub mod entities;
pub mod error;
pub mod options;
pub mod settings;
pub mod templates;
