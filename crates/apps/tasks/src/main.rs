use app_state::load_app_settings;
use clap::{Parser, Subcommand};
use color_eyre::Result;
use common_services::database::{get_db_pool, run_migrations};
use common_services::events::{AlbumEventType, AlbumInviteEvent, AlbumUpdateEvent, enqueue_event};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(version, about = "Enqueue album events for ownership reconciliation")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-run ownership reconciliation for an album.
    AlbumUpdate {
        /// Album id to reconcile.
        album_id: String,
    },
    /// Replay an album invite, e.g. after a missed event.
    AlbumInvite {
        /// Album id the user was invited to.
        album_id: String,
        /// Invited user id.
        user_id: i32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let settings = load_app_settings()?;
    let pool = get_db_pool(&settings.secrets.database_url).await?;
    run_migrations(&pool).await?;

    match args.command {
        Command::AlbumUpdate { album_id } => {
            let payload = AlbumUpdateEvent {
                id: album_id,
                recipient_ids: vec![],
            };
            enqueue_event(
                &pool,
                AlbumEventType::AlbumUpdate,
                &payload,
                settings.events.max_attempts,
            )
            .await?;
        }
        Command::AlbumInvite { album_id, user_id } => {
            let payload = AlbumInviteEvent { id: album_id, user_id };
            enqueue_event(
                &pool,
                AlbumEventType::AlbumInvite,
                &payload,
                settings.events.max_attempts,
            )
            .await?;
        }
    }

    Ok(())
}
