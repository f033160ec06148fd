//! Append-only trail of backoffice changes, kept in `audit_logs`.

use chrono::Utc;
use serde_json::Value;

use crate::{db::DbPool, error::AppResult};

async fn insert_entry(
    pool: &DbPool,
    actor: &str,
    action: &str,
    table: &str,
    metadata: &Value,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO audit_logs (actor, action, resource, metadata, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(actor)
    .bind(action)
    .bind(table)
    .bind(metadata.to_string())
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Records an admin action. Call after the change is committed; a failed insert is only logged.
pub async fn record(pool: &DbPool, actor: &str, action: &str, table: &str, metadata: Value) {
    match insert_entry(pool, actor, action, table, &metadata).await {
        Ok(()) => tracing::debug!(actor, action, table, "audit entry written"),
        Err(err) => tracing::warn!(error = %err, actor, action, "audit log failed"),
    }
}
