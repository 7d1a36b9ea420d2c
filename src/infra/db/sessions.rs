use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{RepoError, SessionsRepo};
use crate::domain::entities::AdminSessionRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(Debug, sqlx::FromRow)]
struct AdminSessionRow {
    session_id: Uuid,
    user_id: Uuid,
    display_name: String,
    email: String,
    capabilities: Vec<String>,
    expires_at: OffsetDateTime,
}

impl From<AdminSessionRow> for AdminSessionRecord {
    fn from(row: AdminSessionRow) -> Self {
        Self {
            session_id: row.session_id,
            user_id: row.user_id,
            display_name: row.display_name,
            email: row.email,
            capabilities: row.capabilities,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl SessionsRepo for PostgresRepositories {
    async fn find_session(
        &self,
        token_hash: &[u8],
    ) -> Result<Option<AdminSessionRecord>, RepoError> {
        let row = sqlx::query_as::<_, AdminSessionRow>(
            r#"
            SELECT s.id AS session_id,
                   u.id AS user_id,
                   u.display_name,
                   u.email,
                   u.capabilities,
                   s.expires_at
              FROM admin_sessions s
              JOIN admin_users u ON u.id = s.user_id
             WHERE s.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }
}
