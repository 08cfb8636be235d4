use crate::database::DbError;
use crate::database::stores::{AlbumStore, AssetStore, CollaboratorStore, UserStore};
use crate::database::tables::{AlbumRole, AssetOwnership};
use crate::events::{AlbumInviteEvent, AlbumUpdateEvent};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Reconciles album and asset ownership towards the system admin.
///
/// Every mutation is its own store call: a failure partway through
/// leaves earlier steps applied and later ones untouched. Re-running
/// the same event converges to the same end state, so recovery is a
/// retry, not a rollback.
pub struct OwnershipService {
    albums: Arc<dyn AlbumStore>,
    users: Arc<dyn UserStore>,
    assets: Arc<dyn AssetStore>,
    collaborators: Arc<dyn CollaboratorStore>,
}

impl OwnershipService {
    #[must_use]
    pub fn new(
        albums: Arc<dyn AlbumStore>,
        users: Arc<dyn UserStore>,
        assets: Arc<dyn AssetStore>,
        collaborators: Arc<dyn CollaboratorStore>,
    ) -> Self {
        Self {
            albums,
            users,
            assets,
            collaborators,
        }
    }

    /// Moves every asset in an admin-owned album back to the admin.
    /// Albums owned by anyone else are left alone.
    #[instrument(skip(self, event), fields(album_id = %event.id))]
    pub async fn handle_album_update(&self, event: &AlbumUpdateEvent) -> Result<(), DbError> {
        let Some(details) = self.albums.get_by_id(&event.id, true).await? else {
            warn!("Cannot find album {} for ownership transfer", event.id);
            return Ok(());
        };

        let Some(admin) = self.users.get_admin().await? else {
            warn!("Cannot find admin for ownership transfer");
            return Ok(());
        };

        if details.album.owner_id != admin.id {
            return Ok(());
        }

        if details.assets.is_empty() {
            return Ok(());
        }

        let assets_to_transfer: Vec<AssetOwnership> = details
            .assets
            .into_iter()
            .filter(|asset| asset.owner_id != admin.id)
            .collect();
        if assets_to_transfer.is_empty() {
            return Ok(());
        }

        self.transfer_assets(&assets_to_transfer, admin.id).await
    }

    /// Hands an album over to the admin when the admin is invited as an
    /// editor on an album someone else owns. The previous owner keeps
    /// access as an editor, and their assets in the album move with it.
    #[instrument(skip(self, event), fields(album_id = %event.id, user_id = event.user_id))]
    pub async fn handle_album_invite(&self, event: &AlbumInviteEvent) -> Result<(), DbError> {
        let Some(details) = self.albums.get_by_id(&event.id, true).await? else {
            warn!("Cannot find album {} for ownership transfer", event.id);
            return Ok(());
        };

        let Some(admin) = self.users.get_admin().await? else {
            warn!("Cannot find admin for ownership transfer");
            return Ok(());
        };

        let admin_is_editor = details
            .collaborators
            .iter()
            .any(|c| c.user_id == admin.id && c.role == AlbumRole::Editor);

        if details.album.owner_id == admin.id || event.user_id != admin.id || !admin_is_editor {
            return Ok(());
        }

        let previous_owner_id = details.album.owner_id;

        self.albums.set_owner(&event.id, admin.id).await?;
        // Remove the admin's collaborator record, since owners are not
        // tracked as collaborators.
        self.collaborators.remove(&event.id, admin.id).await?;
        self.collaborators
            .add(&event.id, previous_owner_id, AlbumRole::Editor)
            .await?;

        // Only assets held by the previous owner move. Assets owned by
        // other collaborators keep their owner.
        let assets_to_transfer: Vec<AssetOwnership> = details
            .assets
            .into_iter()
            .filter(|asset| asset.owner_id == previous_owner_id)
            .collect();

        self.transfer_assets(&assets_to_transfer, admin.id).await
    }

    /// Re-owns the given assets one by one, in order, moving each
    /// asset's billed size from the old owner's usage counter to the
    /// new owner's. Library-backed and zero-size assets still change
    /// owner but never touch the usage counters.
    async fn transfer_assets(
        &self,
        assets: &[AssetOwnership],
        new_owner_id: i32,
    ) -> Result<(), DbError> {
        for asset in assets {
            self.assets.set_owner(&asset.id, new_owner_id).await?;

            info!(
                "Transferred ownership of asset {} from {} to {}",
                asset.id, asset.owner_id, new_owner_id
            );

            let size_bytes = asset.size_bytes.unwrap_or(0);
            if size_bytes > 0 && asset.library_id.is_none() {
                self.users.adjust_usage(asset.owner_id, -size_bytes).await?;
                self.users.adjust_usage(new_owner_id, size_bytes).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::database::tables::{Album, AlbumCollaborator, AlbumDetails, User, UserRole};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    const ADMIN_ID: i32 = 1;
    const USER_1: i32 = 2;
    const USER_2: i32 = 3;
    const ALBUM_ID: &str = "album-1";

    /// Every mutation the service issued, in order.
    #[derive(Debug, Clone, PartialEq)]
    enum StoreCall {
        AlbumSetOwner {
            album_id: String,
            owner_id: i32,
        },
        AssetSetOwner {
            asset_id: String,
            owner_id: i32,
        },
        AdjustUsage {
            user_id: i32,
            delta_bytes: i64,
        },
        RemoveCollaborator {
            album_id: String,
            user_id: i32,
        },
        AddCollaborator {
            album_id: String,
            user_id: i32,
            role: AlbumRole,
        },
    }

    /// Shared backing state for the fake stores.
    #[derive(Default)]
    struct World {
        calls: Mutex<Vec<StoreCall>>,
        album: Mutex<Option<AlbumDetails>>,
        admin: Mutex<Option<User>>,
        /// Asset id whose owner update fails with a database error.
        failing_asset: Mutex<Option<String>>,
    }

    impl World {
        fn push(&self, call: StoreCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<StoreCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    struct FakeAlbumStore(Arc<World>);
    struct FakeUserStore(Arc<World>);
    struct FakeAssetStore(Arc<World>);
    struct FakeCollaboratorStore(Arc<World>);

    #[async_trait]
    impl AlbumStore for FakeAlbumStore {
        async fn get_by_id(
            &self,
            album_id: &str,
            with_assets: bool,
        ) -> Result<Option<AlbumDetails>, DbError> {
            assert!(with_assets, "handlers always need the asset view");
            let album = self.0.album.lock().unwrap().clone();
            Ok(album.filter(|details| details.album.id == album_id))
        }

        async fn set_owner(&self, album_id: &str, owner_id: i32) -> Result<(), DbError> {
            self.0.push(StoreCall::AlbumSetOwner {
                album_id: album_id.to_string(),
                owner_id,
            });
            Ok(())
        }
    }

    #[async_trait]
    impl UserStore for FakeUserStore {
        async fn get_admin(&self) -> Result<Option<User>, DbError> {
            Ok(self.0.admin.lock().unwrap().clone())
        }

        async fn adjust_usage(&self, user_id: i32, delta_bytes: i64) -> Result<(), DbError> {
            self.0.push(StoreCall::AdjustUsage {
                user_id,
                delta_bytes,
            });
            Ok(())
        }
    }

    #[async_trait]
    impl AssetStore for FakeAssetStore {
        async fn set_owner(&self, asset_id: &str, owner_id: i32) -> Result<(), DbError> {
            if self.0.failing_asset.lock().unwrap().as_deref() == Some(asset_id) {
                return Err(DbError::Sqlx(sqlx::Error::PoolClosed));
            }
            self.0.push(StoreCall::AssetSetOwner {
                asset_id: asset_id.to_string(),
                owner_id,
            });
            Ok(())
        }
    }

    #[async_trait]
    impl CollaboratorStore for FakeCollaboratorStore {
        async fn remove(&self, album_id: &str, user_id: i32) -> Result<(), DbError> {
            self.0.push(StoreCall::RemoveCollaborator {
                album_id: album_id.to_string(),
                user_id,
            });
            Ok(())
        }

        async fn add(
            &self,
            album_id: &str,
            user_id: i32,
            role: AlbumRole,
        ) -> Result<AlbumCollaborator, DbError> {
            self.0.push(StoreCall::AddCollaborator {
                album_id: album_id.to_string(),
                user_id,
                role,
            });
            Ok(collaborator(album_id, user_id, role))
        }
    }

    fn service(world: &Arc<World>) -> OwnershipService {
        OwnershipService::new(
            Arc::new(FakeAlbumStore(world.clone())),
            Arc::new(FakeUserStore(world.clone())),
            Arc::new(FakeAssetStore(world.clone())),
            Arc::new(FakeCollaboratorStore(world.clone())),
        )
    }

    fn user(id: i32, role: UserRole) -> User {
        User {
            id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            email: format!("user{id}@test.local"),
            name: format!("user{id}"),
            usage_bytes: 0,
            role,
        }
    }

    fn album(owner_id: i32) -> Album {
        Album {
            id: ALBUM_ID.to_string(),
            owner_id,
            name: "Holiday".to_string(),
            thumbnail_id: None,
            description: None,
            is_public: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn collaborator(album_id: &str, user_id: i32, role: AlbumRole) -> AlbumCollaborator {
        AlbumCollaborator {
            id: 1,
            album_id: album_id.to_string(),
            user_id,
            role,
            added_at: Utc::now(),
        }
    }

    fn asset(id: &str, owner_id: i32, size_bytes: Option<i64>) -> AssetOwnership {
        AssetOwnership {
            id: id.to_string(),
            owner_id,
            size_bytes,
            library_id: None,
        }
    }

    fn world_with(
        owner_id: i32,
        collaborators: Vec<AlbumCollaborator>,
        assets: Vec<AssetOwnership>,
    ) -> Arc<World> {
        let world = Arc::new(World::default());
        *world.album.lock().unwrap() = Some(AlbumDetails {
            album: album(owner_id),
            collaborators,
            assets,
        });
        *world.admin.lock().unwrap() = Some(user(ADMIN_ID, UserRole::Admin));
        world
    }

    fn update_event() -> AlbumUpdateEvent {
        AlbumUpdateEvent {
            id: ALBUM_ID.to_string(),
            recipient_ids: vec![],
        }
    }

    fn invite_event(user_id: i32) -> AlbumInviteEvent {
        AlbumInviteEvent {
            id: ALBUM_ID.to_string(),
            user_id,
        }
    }

    #[tokio::test]
    async fn update_skips_when_album_is_missing() {
        let world = Arc::new(World::default());
        *world.admin.lock().unwrap() = Some(user(ADMIN_ID, UserRole::Admin));

        service(&world)
            .handle_album_update(&update_event())
            .await
            .unwrap();

        assert!(world.calls().is_empty());
    }

    #[tokio::test]
    async fn update_skips_when_no_admin_is_configured() {
        let world = world_with(ADMIN_ID, vec![], vec![asset("asset-1", USER_1, Some(1000))]);
        *world.admin.lock().unwrap() = None;

        service(&world)
            .handle_album_update(&update_event())
            .await
            .unwrap();

        assert!(world.calls().is_empty());
    }

    #[tokio::test]
    async fn update_skips_albums_not_owned_by_admin() {
        let world = world_with(USER_1, vec![], vec![asset("asset-1", USER_2, Some(1000))]);

        service(&world)
            .handle_album_update(&update_event())
            .await
            .unwrap();

        assert!(world.calls().is_empty());
    }

    #[tokio::test]
    async fn update_skips_albums_without_assets() {
        let world = world_with(ADMIN_ID, vec![], vec![]);

        service(&world)
            .handle_album_update(&update_event())
            .await
            .unwrap();

        assert!(world.calls().is_empty());
    }

    #[tokio::test]
    async fn update_transfers_assets_not_owned_by_album_owner() {
        let world = world_with(
            ADMIN_ID,
            vec![],
            vec![
                asset("asset-1", USER_1, Some(1000)),
                asset("asset-2", ADMIN_ID, Some(2000)),
                asset("asset-3", USER_2, Some(3000)),
            ],
        );

        service(&world)
            .handle_album_update(&update_event())
            .await
            .unwrap();

        assert_eq!(
            world.calls(),
            vec![
                StoreCall::AssetSetOwner {
                    asset_id: "asset-1".to_string(),
                    owner_id: ADMIN_ID,
                },
                StoreCall::AdjustUsage {
                    user_id: USER_1,
                    delta_bytes: -1000,
                },
                StoreCall::AdjustUsage {
                    user_id: ADMIN_ID,
                    delta_bytes: 1000,
                },
                StoreCall::AssetSetOwner {
                    asset_id: "asset-3".to_string(),
                    owner_id: ADMIN_ID,
                },
                StoreCall::AdjustUsage {
                    user_id: USER_2,
                    delta_bytes: -3000,
                },
                StoreCall::AdjustUsage {
                    user_id: ADMIN_ID,
                    delta_bytes: 3000,
                },
            ]
        );
    }

    #[tokio::test]
    async fn update_skips_usage_accounting_for_library_assets() {
        let mut library_asset = asset("asset-1", USER_1, Some(1000));
        library_asset.library_id = Some("lib-1".to_string());
        let world = world_with(ADMIN_ID, vec![], vec![library_asset]);

        service(&world)
            .handle_album_update(&update_event())
            .await
            .unwrap();

        assert_eq!(
            world.calls(),
            vec![StoreCall::AssetSetOwner {
                asset_id: "asset-1".to_string(),
                owner_id: ADMIN_ID,
            }]
        );
    }

    #[tokio::test]
    async fn update_skips_usage_accounting_for_zero_size_assets() {
        let world = world_with(
            ADMIN_ID,
            vec![],
            vec![
                asset("asset-1", USER_1, Some(0)),
                asset("asset-2", USER_1, None),
            ],
        );

        service(&world)
            .handle_album_update(&update_event())
            .await
            .unwrap();

        assert_eq!(
            world.calls(),
            vec![
                StoreCall::AssetSetOwner {
                    asset_id: "asset-1".to_string(),
                    owner_id: ADMIN_ID,
                },
                StoreCall::AssetSetOwner {
                    asset_id: "asset-2".to_string(),
                    owner_id: ADMIN_ID,
                },
            ]
        );
    }

    #[tokio::test]
    async fn update_is_idempotent_once_reconciled() {
        let world = world_with(
            ADMIN_ID,
            vec![],
            vec![
                asset("asset-1", ADMIN_ID, Some(1000)),
                asset("asset-2", ADMIN_ID, Some(2000)),
            ],
        );

        service(&world)
            .handle_album_update(&update_event())
            .await
            .unwrap();

        assert!(world.calls().is_empty());
    }

    #[tokio::test]
    async fn update_propagates_store_errors_and_keeps_earlier_transfers() {
        let world = world_with(
            ADMIN_ID,
            vec![],
            vec![
                asset("asset-1", USER_1, Some(1000)),
                asset("asset-2", USER_2, Some(2000)),
            ],
        );
        *world.failing_asset.lock().unwrap() = Some("asset-2".to_string());

        let result = service(&world).handle_album_update(&update_event()).await;

        assert!(matches!(result, Err(DbError::Sqlx(_))));
        // The first asset was fully transferred before the failure and
        // stays that way; nothing is rolled back.
        assert_eq!(
            world.calls(),
            vec![
                StoreCall::AssetSetOwner {
                    asset_id: "asset-1".to_string(),
                    owner_id: ADMIN_ID,
                },
                StoreCall::AdjustUsage {
                    user_id: USER_1,
                    delta_bytes: -1000,
                },
                StoreCall::AdjustUsage {
                    user_id: ADMIN_ID,
                    delta_bytes: 1000,
                },
            ]
        );
    }

    #[tokio::test]
    async fn invite_skips_when_album_is_missing() {
        let world = Arc::new(World::default());
        *world.admin.lock().unwrap() = Some(user(ADMIN_ID, UserRole::Admin));

        service(&world)
            .handle_album_invite(&invite_event(ADMIN_ID))
            .await
            .unwrap();

        assert!(world.calls().is_empty());
    }

    #[tokio::test]
    async fn invite_skips_when_no_admin_is_configured() {
        let world = world_with(
            USER_1,
            vec![collaborator(ALBUM_ID, ADMIN_ID, AlbumRole::Editor)],
            vec![],
        );
        *world.admin.lock().unwrap() = None;

        service(&world)
            .handle_album_invite(&invite_event(ADMIN_ID))
            .await
            .unwrap();

        assert!(world.calls().is_empty());
    }

    #[tokio::test]
    async fn invite_skips_albums_already_owned_by_admin() {
        let world = world_with(
            ADMIN_ID,
            vec![collaborator(ALBUM_ID, USER_1, AlbumRole::Editor)],
            vec![asset("asset-1", USER_1, Some(1000))],
        );

        service(&world)
            .handle_album_invite(&invite_event(ADMIN_ID))
            .await
            .unwrap();

        assert!(world.calls().is_empty());
    }

    #[tokio::test]
    async fn invite_skips_when_invited_user_is_not_admin() {
        let world = world_with(
            USER_1,
            vec![collaborator(ALBUM_ID, ADMIN_ID, AlbumRole::Editor)],
            vec![asset("asset-1", USER_1, Some(1000))],
        );

        service(&world)
            .handle_album_invite(&invite_event(USER_2))
            .await
            .unwrap();

        assert!(world.calls().is_empty());
    }

    #[tokio::test]
    async fn invite_skips_when_admin_is_not_an_editor() {
        let world = world_with(
            USER_1,
            vec![collaborator(ALBUM_ID, ADMIN_ID, AlbumRole::Viewer)],
            vec![asset("asset-1", USER_1, Some(1000))],
        );

        service(&world)
            .handle_album_invite(&invite_event(ADMIN_ID))
            .await
            .unwrap();

        assert!(world.calls().is_empty());
    }

    #[tokio::test]
    async fn invite_hands_album_over_and_moves_previous_owner_assets() {
        let world = world_with(
            USER_1,
            vec![collaborator(ALBUM_ID, ADMIN_ID, AlbumRole::Editor)],
            vec![
                asset("asset-1", USER_1, Some(1000)),
                asset("asset-2", ADMIN_ID, Some(2000)),
                // A third collaborator's asset stays put.
                asset("asset-3", USER_2, Some(500)),
            ],
        );

        service(&world)
            .handle_album_invite(&invite_event(ADMIN_ID))
            .await
            .unwrap();

        assert_eq!(
            world.calls(),
            vec![
                StoreCall::AlbumSetOwner {
                    album_id: ALBUM_ID.to_string(),
                    owner_id: ADMIN_ID,
                },
                StoreCall::RemoveCollaborator {
                    album_id: ALBUM_ID.to_string(),
                    user_id: ADMIN_ID,
                },
                StoreCall::AddCollaborator {
                    album_id: ALBUM_ID.to_string(),
                    user_id: USER_1,
                    role: AlbumRole::Editor,
                },
                StoreCall::AssetSetOwner {
                    asset_id: "asset-1".to_string(),
                    owner_id: ADMIN_ID,
                },
                StoreCall::AdjustUsage {
                    user_id: USER_1,
                    delta_bytes: -1000,
                },
                StoreCall::AdjustUsage {
                    user_id: ADMIN_ID,
                    delta_bytes: 1000,
                },
            ]
        );
    }
}
