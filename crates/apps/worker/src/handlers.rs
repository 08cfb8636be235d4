use crate::context::WorkerContext;
use color_eyre::Result;
use common_services::events::{AlbumEvent, AlbumEventType, AlbumInviteEvent, AlbumUpdateEvent};
use serde_json::from_value;

/// Dispatches a claimed event to its corresponding handler.
///
/// # Errors
///
/// This function will return an error if the payload cannot be decoded
/// or the handler fails; both feed the event's retry/fail path.
pub async fn handle_event(context: &WorkerContext, event: &AlbumEvent) -> Result<()> {
    match event.event_type {
        AlbumEventType::AlbumUpdate => {
            let payload: AlbumUpdateEvent = from_value(event.payload.clone())?;
            context.ownership.handle_album_update(&payload).await?;
        }
        AlbumEventType::AlbumInvite => {
            let payload: AlbumInviteEvent = from_value(event.payload.clone())?;
            context.ownership.handle_album_invite(&payload).await?;
        }
    }

    Ok(())
}
