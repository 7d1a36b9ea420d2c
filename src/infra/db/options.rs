use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;

use crate::application::repos::{OptionsRepo, RepoError};

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl OptionsRepo for PostgresRepositories {
    async fn get_option(&self, key: &str) -> Result<Option<Value>, RepoError> {
        let row: Option<(Option<Json<Value>>,)> =
            sqlx::query_as("SELECT option_value FROM options WHERE option_name = $1")
                .bind(key)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.and_then(|(value,)| value.map(|Json(value)| value)))
    }

    async fn update_option(&self, key: &str, value: Value) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO options (option_name, option_value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (option_name) DO UPDATE
               SET option_value = EXCLUDED.option_value,
                   updated_at = EXCLUDED.updated_at
             WHERE options.option_value IS DISTINCT FROM EXCLUDED.option_value
            "#,
        )
        .bind(key)
        .bind(Json(value))
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        PostgresRepositories::health_check(self)
            .await
            .map_err(map_sqlx_error)
    }
}
