use crate::context::WorkerContext;
use chrono::{Duration, Utc};
use color_eyre::{Report, Result};
use common_services::events::AlbumEvent;
use sqlx::PgPool;
use tracing::warn;

/// Atomically claims the next available event from the queue.
///
/// # Errors
///
/// Returns an error if the database transaction fails.
pub async fn claim_next_event(context: &WorkerContext) -> Result<Option<AlbumEvent>> {
    let mut tx = context.pool.begin().await?;

    let event = sqlx::query_as::<_, AlbumEvent>(
        r#"
        WITH candidate AS (
            SELECT id FROM album_events
            WHERE status = 'queued' AND scheduled_at <= now()
            ORDER BY scheduled_at, created_at
            FOR UPDATE SKIP LOCKED
            LIMIT 1
        )
        UPDATE album_events
        SET status = 'running',
            owner = $1,
            started_at = now()
        WHERE id = (SELECT id FROM candidate)
        RETURNING id, event_type, payload, attempts, max_attempts
        "#,
    )
    .bind(&context.worker_id)
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(event)
}

/// Marks an event as done.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn mark_event_done(pool: &PgPool, event_id: i64) -> Result<()> {
    sqlx::query("UPDATE album_events SET status = 'done', finished_at = now() WHERE id = $1")
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Handles a failed event: marks it failed once its attempts run out,
/// otherwise reschedules it with backoff.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub async fn update_event_on_failure(
    pool: &PgPool,
    event: &AlbumEvent,
    error: &Report,
) -> Result<()> {
    let error_string = format!("{error:?}");

    if event.attempts + 1 >= event.max_attempts {
        warn!("‼️ Marking event {} as failed: {}", event.id, error_string);
        sqlx::query(
            "UPDATE album_events SET status = 'failed', finished_at = now(), last_error = $2, attempts = attempts + 1 WHERE id = $1",
        )
        .bind(event.id)
        .bind(&error_string)
        .execute(pool)
        .await?;
    } else {
        let backoff_secs = backoff_seconds(event.attempts);
        warn!(
            "⚠️ Rescheduling event {}. Backoff: {}s",
            event.id, backoff_secs
        );
        let scheduled_at = Utc::now() + Duration::seconds(backoff_secs);
        sqlx::query(
            "UPDATE album_events SET status = 'queued', scheduled_at = $2, attempts = attempts + 1, owner = NULL, started_at = NULL, last_error = $3 WHERE id = $1",
        )
        .bind(event.id)
        .bind(scheduled_at)
        .bind(&error_string)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Exponential backoff, capped at an hour.
const fn backoff_seconds(attempts: i32) -> i64 {
    let exp = if attempts < 0 {
        0
    } else if attempts > 6 {
        6
    } else {
        attempts
    };
    let secs = 30_i64 << exp;
    if secs > 3600 { 3600 } else { secs }
}

#[cfg(test)]
mod tests {
    use super::backoff_seconds;

    #[test]
    fn backoff_grows_and_caps() {
        assert_eq!(backoff_seconds(0), 30);
        assert_eq!(backoff_seconds(1), 60);
        assert!(backoff_seconds(5) > backoff_seconds(4));
        assert_eq!(backoff_seconds(20), 3600);
    }
}
