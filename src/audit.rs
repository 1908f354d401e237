use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// An action worth keeping a trail of.
#[derive(Debug, Clone)]
pub struct AuditEntry<'a> {
    pub actor: Option<Uuid>,
    pub action: &'a str,
    pub resource: &'a str,
    pub metadata: Value,
}

pub async fn write_audit(pool: &DbPool, entry: &AuditEntry<'_>) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(entry.actor)
    .bind(entry.action)
    .bind(entry.resource)
    .bind(&entry.metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Best effort: a failed audit write is logged, never surfaced to the caller.
pub async fn record(pool: &DbPool, entry: AuditEntry<'_>) {
    if let Err(err) = write_audit(pool, &entry).await {
        tracing::warn!(error = %err, action = entry.action, "audit log failed");
    }
}
