mod context;
mod events;
mod handlers;
mod worker;

use crate::worker::create_worker;
use app_state::load_app_settings;
use color_eyre::Result;
use common_services::database::{get_db_pool, run_migrations};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let settings = load_app_settings()?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(&settings.logging.level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let pool = get_db_pool(&settings.secrets.database_url).await?;
    run_migrations(&pool).await?;
    create_worker(pool, settings, false).await?;

    Ok(())
}
