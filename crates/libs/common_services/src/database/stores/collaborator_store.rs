use crate::database::DbError;
use crate::database::tables::{AlbumCollaborator, AlbumRole};
use async_trait::async_trait;
use sqlx::PgPool;

/// Album collaborator records, scoped to ownership reconciliation.
#[async_trait]
pub trait CollaboratorStore: Send + Sync {
    /// Removes a user's collaborator record. Does nothing when absent.
    async fn remove(&self, album_id: &str, user_id: i32) -> Result<(), DbError>;

    /// Adds a collaborator with the given role.
    async fn add(
        &self,
        album_id: &str,
        user_id: i32,
        role: AlbumRole,
    ) -> Result<AlbumCollaborator, DbError>;
}

pub struct PgCollaboratorStore {
    pool: PgPool,
}

impl PgCollaboratorStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollaboratorStore for PgCollaboratorStore {
    async fn remove(&self, album_id: &str, user_id: i32) -> Result<(), DbError> {
        sqlx::query("DELETE FROM album_collaborator WHERE album_id = $1 AND user_id = $2")
            .bind(album_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn add(
        &self,
        album_id: &str,
        user_id: i32,
        role: AlbumRole,
    ) -> Result<AlbumCollaborator, DbError> {
        Ok(sqlx::query_as::<_, AlbumCollaborator>(
            r#"
            INSERT INTO album_collaborator (album_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, album_id, user_id, role, added_at
            "#,
        )
        .bind(album_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?)
    }
}
