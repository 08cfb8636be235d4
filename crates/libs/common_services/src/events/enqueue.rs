use crate::database::DbError;
use crate::events::AlbumEventType;
use serde::Serialize;
use serde_json::to_value;
use sqlx::PgPool;
use tracing::{info, warn};

/// Enqueues an album event unless an identical one is already active.
///
/// Emitters are fire-and-forget: they never learn whether the handler
/// succeeded, only whether the event made it into the queue. Returns
/// `false` when a matching event is still queued or running.
///
/// # Errors
///
/// Returns an error if the database transaction fails.
pub async fn enqueue_event<T: Serialize + Send + Sync>(
    pool: &PgPool,
    event_type: AlbumEventType,
    payload: &T,
    max_attempts: i32,
) -> Result<bool, DbError> {
    let json_payload = to_value(payload)?;

    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id
        FROM album_events
        WHERE event_type = $1 AND payload = $2 AND status IN ('queued', 'running')
        LIMIT 1
        "#,
    )
    .bind(event_type)
    .bind(&json_payload)
    .fetch_optional(&mut *tx)
    .await?;

    if existing.is_some() {
        warn!(
            "Not enqueueing {:?} event, an active one already exists.",
            event_type
        );
        return Ok(false);
    }

    sqlx::query("INSERT INTO album_events (event_type, payload, max_attempts) VALUES ($1, $2, $3)")
        .bind(event_type)
        .bind(&json_payload)
        .bind(max_attempts)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("Enqueued {:?} event: {}", event_type, json_payload);
    Ok(true)
}
