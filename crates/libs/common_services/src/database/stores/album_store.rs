use crate::database::DbError;
use crate::database::tables::{Album, AlbumCollaborator, AlbumDetails, AssetOwnership};
use async_trait::async_trait;
use sqlx::PgPool;

/// Read/write access to albums, scoped to what ownership reconciliation
/// needs.
#[async_trait]
pub trait AlbumStore: Send + Sync {
    /// Fetches an album with its collaborators and, when requested, the
    /// ownership view of its media items.
    async fn get_by_id(
        &self,
        album_id: &str,
        with_assets: bool,
    ) -> Result<Option<AlbumDetails>, DbError>;

    /// Re-points an album at a new owner.
    async fn set_owner(&self, album_id: &str, owner_id: i32) -> Result<(), DbError>;
}

pub struct PgAlbumStore {
    pool: PgPool,
}

impl PgAlbumStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlbumStore for PgAlbumStore {
    async fn get_by_id(
        &self,
        album_id: &str,
        with_assets: bool,
    ) -> Result<Option<AlbumDetails>, DbError> {
        let Some(album) = sqlx::query_as::<_, Album>("SELECT * FROM album WHERE id = $1")
            .bind(album_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let collaborators = sqlx::query_as::<_, AlbumCollaborator>(
            r#"
            SELECT id, album_id, user_id, role, added_at
            FROM album_collaborator
            WHERE album_id = $1
            ORDER BY added_at
            "#,
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await?;

        let assets = if with_assets {
            sqlx::query_as::<_, AssetOwnership>(
                r#"
                SELECT mi.id, mi.owner_id, d.size_bytes, mi.library_id
                FROM album_media_item ami
                JOIN media_item mi ON ami.media_item_id = mi.id
                LEFT JOIN media_item_details d ON d.media_item_id = mi.id
                WHERE ami.album_id = $1
                  AND mi.deleted = false
                ORDER BY ami.added_at
                "#,
            )
            .bind(album_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            Vec::new()
        };

        Ok(Some(AlbumDetails {
            album,
            collaborators,
            assets,
        }))
    }

    async fn set_owner(&self, album_id: &str, owner_id: i32) -> Result<(), DbError> {
        sqlx::query("UPDATE album SET owner_id = $1, updated_at = now() WHERE id = $2")
            .bind(owner_id)
            .bind(album_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
