use app_state::AppSettings;
use common_services::database::stores::{
    PgAlbumStore, PgAssetStore, PgCollaboratorStore, PgUserStore,
};
use common_services::ownership::OwnershipService;
use sqlx::PgPool;
use std::sync::Arc;

pub struct WorkerContext {
    pub worker_id: String,
    pub pool: PgPool,
    pub settings: AppSettings,
    pub ownership: OwnershipService,
}

impl WorkerContext {
    #[must_use]
    pub fn new(pool: PgPool, settings: AppSettings, worker_id: String) -> Self {
        let ownership = OwnershipService::new(
            Arc::new(PgAlbumStore::new(pool.clone())),
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgAssetStore::new(pool.clone())),
            Arc::new(PgCollaboratorStore::new(pool.clone())),
        );

        Self {
            worker_id,
            pool,
            settings,
            ownership,
        }
    }
}
