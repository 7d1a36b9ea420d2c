//! Domain entities mirrored from persistent storage.

use time::OffsetDateTime;
use uuid::Uuid;

/// An authenticated admin session joined with its owning user.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSessionRecord {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub email: String,
    /// Raw capability names as stored; unknown names are kept for other subsystems.
    pub capabilities: Vec<String>,
    pub expires_at: OffsetDateTime,
}
