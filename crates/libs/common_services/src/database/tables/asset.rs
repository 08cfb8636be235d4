use serde::Serialize;
use sqlx::FromRow;

/// The slice of a media item the ownership logic works with.
///
/// `size_bytes` comes from the item's stored file details and is absent
/// when the item has not been fully ingested yet. A set `library_id`
/// marks the item as belonging to an external library, which is exempt
/// from usage accounting.
#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AssetOwnership {
    pub id: String,
    pub owner_id: i32,
    pub size_bytes: Option<i64>,
    pub library_id: Option<String>,
}
