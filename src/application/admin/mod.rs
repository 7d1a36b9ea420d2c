//! Application services behind the settings panel.

pub mod email_templates;
pub mod settings;
pub mod smtp;

pub use email_templates::AdminEmailTemplateService;
pub use settings::AdminSettingsService;
pub use smtp::AdminSmtpService;
