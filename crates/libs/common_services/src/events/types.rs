use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Maps to the `album_event_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "album_event_type", rename_all = "snake_case")]
pub enum AlbumEventType {
    AlbumUpdate,
    AlbumInvite,
}

/// Maps to the `event_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "snake_case")]
pub enum EventStatus {
    Queued,
    Running,
    Done,
    Failed,
}

/// A claimed row from the `album_events` queue.
#[derive(Debug, FromRow)]
pub struct AlbumEvent {
    pub id: i64,
    pub event_type: AlbumEventType,
    pub payload: Value,
    pub attempts: i32,
    pub max_attempts: i32,
}

/// Payload of an `album_update` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumUpdateEvent {
    pub id: String,
    /// Users notified of the change. Ownership reconciliation ignores
    /// them.
    #[serde(default)]
    pub recipient_ids: Vec<i32>,
}

/// Payload of an `album_invite` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumInviteEvent {
    pub id: String,
    pub user_id: i32,
}
