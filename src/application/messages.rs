//! Canned messages returned to the settings panel.

pub const PERMISSION_DENIED: &str = "You do not have sufficient permissions to do this action.";
pub const PROCESSING_FAILED: &str = "Something went wrong! Please try again.";
pub const NONCE_FAILED: &str = "Nonce verification failed";
pub const SESSION_REQUIRED: &str = "Your session has expired. Please log in again.";
pub const UNKNOWN_ACTION: &str = "Unknown request action";
pub const UNREGISTERED_MODULE: &str = "Unregistered settings module";
pub const UNKNOWN_SECTION: &str = "Unknown settings section";
pub const SERVICE_UNAVAILABLE: &str = "Service temporarily unavailable";

pub const INVALID_TEMPLATE_ID: &str = "Invalid email template ID";
pub const TEMPLATE_NOT_FOUND: &str = "Email template not found";
pub const TEMPLATE_UPDATED: &str = "Template updated successfully";
pub const TEMPLATE_ALWAYS_ENABLED: &str = "This email template can not be disabled";

pub const NO_HOST: &str = "No host address provided";
pub const NO_PORT: &str = "No port address provided";
pub const INVALID_PORT: &str = "Invalid port address provided";
pub const NO_USERNAME: &str = "No email address provided";
pub const NO_PASSWORD: &str = "No email password provided";
pub const NO_RECIPIENT: &str = "No recipient address available";

pub const SMTP_TEST_SUBJECT: &str = "ERP SMTP Test Mail";
pub const SMTP_TEST_BODY: &str = "This is a test email by WP ERP.";

/// `"<subject> has been saved successfully."`
pub fn save_success(subject: &str) -> String {
    format!("{subject} has been saved successfully.")
}

pub fn smtp_test_sent(to: &str) -> String {
    format!("Test email has been sent successfully to {to}")
}
