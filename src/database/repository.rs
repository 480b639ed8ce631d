use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Translation, TranslationHistory, User};
use crate::types::{HistoryAction, Pagination, Tone};

/// Account storage
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, DatabaseError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if DatabaseError::is_unique_violation(&e) => Err(DatabaseError::Duplicate(
                "An account with this email already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    pub async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update only the preference fields that were provided
    pub async fn update_preferences(
        &self,
        id: Uuid,
        preferred_tone: Option<Tone>,
        default_target_language: Option<&str>,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET preferred_tone = COALESCE($2, preferred_tone),
                default_target_language = COALESCE($3, default_target_language),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(preferred_tone)
        .bind(default_target_language)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// List filters for stored translations
#[derive(Debug, Clone, Default)]
pub struct TranslationFilter {
    pub favorite: Option<bool>,
    pub tag: Option<String>,
    pub tone: Option<Tone>,
    pub q: Option<String>,
}

/// Translation record storage; every accessor is scoped to the owning user
pub struct TranslationRepository {
    pool: PgPool,
}

pub struct NewTranslation<'a> {
    pub user_id: Uuid,
    pub source_text: &'a str,
    pub translated_text: &'a str,
    pub source_language: &'a str,
    pub target_language: &'a str,
    pub tone: Tone,
    pub source_hash: &'a str,
    pub tags: &'a [String],
}

impl TranslationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: NewTranslation<'_>) -> Result<Translation, DatabaseError> {
        let translation = sqlx::query_as::<_, Translation>(
            r#"
            INSERT INTO translations
                (id, user_id, source_text, translated_text, source_language, target_language, tone, source_hash, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.source_text)
        .bind(new.translated_text)
        .bind(new.source_language)
        .bind(new.target_language)
        .bind(new.tone)
        .bind(new.source_hash)
        .bind(new.tags)
        .fetch_one(&self.pool)
        .await?;

        Ok(translation)
    }

    pub async fn find_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Translation>, DatabaseError> {
        let translation = sqlx::query_as::<_, Translation>(
            "SELECT * FROM translations WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(translation)
    }

    /// Duplicate-request lookup by fingerprint
    pub async fn find_by_hash(
        &self,
        user_id: Uuid,
        source_hash: &str,
    ) -> Result<Option<Translation>, DatabaseError> {
        let translation = sqlx::query_as::<_, Translation>(
            r#"
            SELECT * FROM translations
            WHERE user_id = $1 AND source_hash = $2 AND deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(source_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(translation)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &TranslationFilter,
        page: Pagination,
    ) -> Result<(Vec<Translation>, i64), DatabaseError> {
        let mut items_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM translations WHERE user_id = ");
        items_query.push_bind(user_id);
        items_query.push(" AND deleted_at IS NULL");
        push_filters(&mut items_query, filter);
        items_query.push(" ORDER BY created_at DESC LIMIT ");
        items_query.push_bind(page.limit());
        items_query.push(" OFFSET ");
        items_query.push_bind(page.offset());

        let items = items_query
            .build_query_as::<Translation>()
            .fetch_all(&self.pool)
            .await?;

        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM translations WHERE user_id = ");
        count_query.push_bind(user_id);
        count_query.push(" AND deleted_at IS NULL");
        push_filters(&mut count_query, filter);

        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }

    pub async fn update_favorite(
        &self,
        user_id: Uuid,
        id: Uuid,
        favorite: bool,
    ) -> Result<Option<Translation>, DatabaseError> {
        let translation = sqlx::query_as::<_, Translation>(
            r#"
            UPDATE translations
            SET favorite = $3, updated_at = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(favorite)
        .fetch_optional(&self.pool)
        .await?;

        Ok(translation)
    }

    pub async fn replace_tags(
        &self,
        user_id: Uuid,
        id: Uuid,
        tags: &[String],
    ) -> Result<Option<Translation>, DatabaseError> {
        let translation = sqlx::query_as::<_, Translation>(
            r#"
            UPDATE translations
            SET tags = $3, updated_at = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(tags)
        .fetch_optional(&self.pool)
        .await?;

        Ok(translation)
    }

    pub async fn soft_delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE translations
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn push_filters(query: &mut QueryBuilder<Postgres>, filter: &TranslationFilter) {
    if let Some(favorite) = filter.favorite {
        query.push(" AND favorite = ");
        query.push_bind(favorite);
    }

    if let Some(tag) = &filter.tag {
        query.push(" AND ");
        query.push_bind(tag.clone());
        query.push(" = ANY(tags)");
    }

    if let Some(tone) = filter.tone {
        query.push(" AND tone = ");
        query.push_bind(tone);
    }

    if let Some(q) = &filter.q {
        let pattern = format!("%{}%", q.replace('%', "\\%").replace('_', "\\_"));
        query.push(" AND (source_text ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR translated_text ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
}

/// Access-log storage
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        user_id: Uuid,
        translation_id: Uuid,
        action: HistoryAction,
    ) -> Result<TranslationHistory, DatabaseError> {
        let entry = sqlx::query_as::<_, TranslationHistory>(
            r#"
            INSERT INTO translation_history (id, user_id, translation_id, action)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(translation_id)
        .bind(action)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        page: Pagination,
    ) -> Result<(Vec<TranslationHistory>, i64), DatabaseError> {
        let items = sqlx::query_as::<_, TranslationHistory>(
            r#"
            SELECT * FROM translation_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM translation_history WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((items, total))
    }
}
