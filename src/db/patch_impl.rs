//! ModuleStatePatch -> DbPatchable implementation.
//!
//! This sits in the `db` module because it contains SQL/table knowledge.

use async_trait::async_trait;
use chrono::Utc;
use modsync_schema::ModuleStatus;
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::patch::{DbPatchable, ModuleStatePatch};
use crate::error::ModsyncError;

#[async_trait]
impl DbPatchable for ModuleStatePatch {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<(), ModsyncError> {
        let ModuleStatePatch {
            name,
            version,
            description,
            enabled,
        } = self.clone();

        let updated_at = Utc::now();
        let status = enabled.map(|e| ModuleStatus::from_enabled(e).as_str());
        let last_enabled_at = enabled.filter(|e| *e).map(|_| updated_at);
        let last_disabled_at = enabled.filter(|e| !*e).map(|_| updated_at);

        let version_set = version.is_some();
        let description_set = description.is_some();

        let res = sqlx::query(
            r#"
            UPDATE module_states
            SET
                version = COALESCE(?, version),
                description = COALESCE(?, description),
                enabled = COALESCE(?, enabled),
                status = COALESCE(?, status),
                last_enabled_at = COALESCE(?, last_enabled_at),
                last_disabled_at = COALESCE(?, last_disabled_at),
                updated_at = ?
            WHERE name = ?
            "#,
        )
        .bind(version)
        .bind(description)
        .bind(enabled)
        .bind(status)
        .bind(last_enabled_at)
        .bind(last_disabled_at)
        .bind(updated_at)
        .bind(name.as_str())
        .execute(pool)
        .await?;

        let affected = res.rows_affected();
        debug!(
            module = %name,
            affected,
            updated_at = %updated_at,
            version_set,
            description_set,
            enabled = ?enabled,
            "db patch applied"
        );

        if affected == 0 {
            return Err(ModsyncError::UnexpectedError(format!(
                "module state row not found for name={name}"
            )));
        }

        Ok(())
    }
}
