use crate::database::DbError;
use async_trait::async_trait;
use sqlx::PgPool;

/// Media item access scoped to ownership reconciliation.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Re-points a media item at a new owner.
    async fn set_owner(&self, asset_id: &str, owner_id: i32) -> Result<(), DbError>;
}

pub struct PgAssetStore {
    pool: PgPool,
}

impl PgAssetStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetStore for PgAssetStore {
    async fn set_owner(&self, asset_id: &str, owner_id: i32) -> Result<(), DbError> {
        sqlx::query("UPDATE media_item SET owner_id = $1, updated_at = now() WHERE id = $2")
            .bind(owner_id)
            .bind(asset_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
