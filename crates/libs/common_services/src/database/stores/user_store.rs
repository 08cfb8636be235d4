use crate::database::DbError;
use crate::database::tables::User;
use async_trait::async_trait;
use sqlx::PgPool;

/// User access scoped to ownership reconciliation: the admin lookup and
/// usage accounting.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the admin user, or `None` when no admin is configured.
    /// The schema guarantees there is at most one.
    async fn get_admin(&self) -> Result<Option<User>, DbError>;

    /// Additively adjusts a user's stored usage counter by a signed
    /// number of bytes.
    async fn adjust_usage(&self, user_id: i32, delta_bytes: i64) -> Result<(), DbError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_admin(&self) -> Result<Option<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            SELECT id, created_at, updated_at, email, name, usage_bytes, role
            FROM app_user
            WHERE role = 'admin'
            "#,
        )
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn adjust_usage(&self, user_id: i32, delta_bytes: i64) -> Result<(), DbError> {
        sqlx::query(
            "UPDATE app_user SET usage_bytes = usage_bytes + $1, updated_at = now() WHERE id = $2",
        )
        .bind(delta_bytes)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
