use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppResult, store::Store};

/// Keep the trail bounded; oldest entries are dropped first.
const MAX_AUDIT_ENTRIES: usize = 10_000;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

pub async fn log_audit(
    store: &Store,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let entry = AuditEntry {
        id: Uuid::new_v4(),
        user_id,
        action: action.to_string(),
        resource: resource.map(str::to_string),
        metadata,
        created_at: Utc::now(),
    };

    let mut logs = store.audit_logs.write().await;
    if logs.len() >= MAX_AUDIT_ENTRIES {
        let overflow = logs.len() + 1 - MAX_AUDIT_ENTRIES;
        logs.drain(..overflow);
    }
    logs.push(entry);

    Ok(())
}
