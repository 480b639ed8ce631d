use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::Tone;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Translation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub source_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub tone: Tone,
    /// Request fingerprint used for duplicate detection; internal
    #[serde(skip_serializing)]
    pub source_hash: String,
    pub tags: Vec<String>,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}
