use crate::database::tables::{AlbumCollaborator, AssetOwnership};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::fmt::Display;

/// Maps to the `album_role` Postgres enum. The owner is not tracked as
/// a collaborator, so there is no owner variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "album_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlbumRole {
    Editor,
    Viewer,
}

impl Display for AlbumRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        };
        f.write_str(s)
    }
}

/// Represents a single album in the database.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub owner_id: i32,
    pub name: String,
    pub thumbnail_id: Option<String>,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An album together with the relations the ownership logic needs.
#[derive(Debug, Clone)]
pub struct AlbumDetails {
    pub album: Album,
    pub collaborators: Vec<AlbumCollaborator>,
    /// Only populated when the album was fetched with assets.
    pub assets: Vec<AssetOwnership>,
}
