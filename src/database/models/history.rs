use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::HistoryAction;

/// Access-log row linking a user to a translation
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TranslationHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub translation_id: Uuid,
    pub action: HistoryAction,
    pub created_at: DateTime<Utc>,
}
