use crate::context::WorkerContext;
use crate::events::{claim_next_event, mark_event_done, update_event_on_failure};
use crate::handlers::handle_event;
use app_state::AppSettings;
use color_eyre::Result;
use common_services::utils::nice_id;
use sqlx::PgPool;
use tokio::time::sleep;
use tracing::info;

pub async fn create_worker(pool: PgPool, settings: AppSettings, stop_on_sleep: bool) -> Result<()> {
    let worker_id = nice_id(8);
    info!("🛠️ [Worker ID: {}] Starting.", worker_id);
    let context = WorkerContext::new(pool, settings, worker_id);

    run_worker_loop(&context, stop_on_sleep).await
}

/// The main loop for the worker process, continuously claiming and
/// handling album events.
///
/// # Errors
///
/// This function will return an error if there is a problem communicating
/// with the database when claiming or updating an event. The loop will
/// terminate in such a case.
pub async fn run_worker_loop(context: &WorkerContext, stop_on_sleep: bool) -> Result<()> {
    let mut sleeping = false;

    loop {
        let maybe_event = claim_next_event(context).await?;

        if let Some(event) = maybe_event {
            sleeping = false;
            info!("🐜 Picked up {:?} event {}", event.event_type, event.id);

            match handle_event(context, &event).await {
                Ok(()) => mark_event_done(&context.pool, event.id).await?,
                Err(e) => update_event_on_failure(&context.pool, &event, &e).await?,
            }
        } else {
            if !sleeping {
                sleeping = true;
                info!("💤 No events, going to sleep...");
                if stop_on_sleep {
                    return Ok(());
                }
            }
            sleep(context.settings.events.poll_interval).await;
        }
    }
}
