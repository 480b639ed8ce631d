mod create;
mod favorite;
mod history;
mod list;
mod record;
mod tags;

pub use create::translation_create;
pub use favorite::favorite_put;
pub use history::history_list;
pub use list::translation_list;
pub use record::{translation_delete, translation_get};
pub use tags::tags_put;

use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::repository::HistoryRepository;
use crate::error::ApiError;
use crate::types::{HistoryAction, Tone};

pub(crate) const MAX_TEXT_LENGTH: usize = 5000;
pub(crate) const MAX_TAGS: usize = 20;
pub(crate) const MAX_TAG_LENGTH: usize = 40;

/// Fingerprint of a translation request, used to reuse earlier results for
/// identical submissions instead of paying for another upstream call.
pub(crate) fn request_fingerprint(
    text: &str,
    source_language: &str,
    target_language: &str,
    tone: Tone,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update([0x1f]);
    hasher.update(source_language.as_bytes());
    hasher.update([0x1f]);
    hasher.update(target_language.as_bytes());
    hasher.update([0x1f]);
    hasher.update(tone.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Trim, drop empties, dedupe while keeping first-seen order
pub(crate) fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, ApiError> {
    let mut normalized: Vec<String> = Vec::new();

    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if tag.len() > MAX_TAG_LENGTH {
            return Err(ApiError::field_validation(
                "tags",
                format!("Tags must be at most {} characters", MAX_TAG_LENGTH),
            ));
        }
        if !normalized.iter().any(|t| t == tag) {
            normalized.push(tag.to_string());
        }
    }

    if normalized.len() > MAX_TAGS {
        return Err(ApiError::field_validation(
            "tags",
            format!("At most {} tags are allowed", MAX_TAGS),
        ));
    }

    Ok(normalized)
}

/// The access log is advisory: a failed insert is logged, never surfaced
pub(crate) async fn log_history(
    pool: PgPool,
    user_id: Uuid,
    translation_id: Uuid,
    action: HistoryAction,
) {
    if let Err(e) = HistoryRepository::new(pool)
        .insert(user_id, translation_id, action)
        .await
    {
        tracing::warn!(
            "Failed to record history entry ({:?} on {}): {}",
            action,
            translation_id,
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_tone_sensitive() {
        let a = request_fingerprint("hello", "en", "ja", Tone::Natural);
        let b = request_fingerprint("hello", "en", "ja", Tone::Natural);
        let c = request_fingerprint("hello", "en", "ja", Tone::Angry);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn fingerprint_separates_fields() {
        // "ab" + "c" must not collide with "a" + "bc"
        let a = request_fingerprint("ab", "c", "ja", Tone::Natural);
        let b = request_fingerprint("a", "bc", "ja", Tone::Natural);
        assert_ne!(a, b);
    }

    #[test]
    fn tags_are_trimmed_and_deduped() {
        let tags = vec![
            " work ".to_string(),
            "work".to_string(),
            "".to_string(),
            "travel".to_string(),
        ];
        assert_eq!(normalize_tags(tags).unwrap(), vec!["work", "travel"]);
    }

    #[test]
    fn oversized_tags_rejected() {
        assert!(normalize_tags(vec!["x".repeat(MAX_TAG_LENGTH + 1)]).is_err());

        let too_many: Vec<String> = (0..=MAX_TAGS).map(|i| format!("tag{}", i)).collect();
        assert!(normalize_tags(too_many).is_err());
    }
}
