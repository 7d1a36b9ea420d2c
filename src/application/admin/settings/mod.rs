//! Module settings: handler registration, built-in sections and the save/load service.

mod builtin;
mod handler;
mod registry;
mod service;

pub use builtin::{SchemaSettingsHandler, builtin_schemas};
pub use handler::{SettingsHandler, SettingsSaveError};
pub use registry::{RegisteredModule, SettingsRegistry};
pub use service::{AdminSettingsError, AdminSettingsService, SettingsRequest};
