use crate::{
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
};
use clap::Subcommand;
use tracing::info;

#[derive(Subcommand)]
pub enum Commands {
    /// Run pending database migrations and exit
    Migrate,
}

pub async fn handle_command(command: Commands, config: &Config) -> Result<(), AppError> {
    match command {
        Commands::Migrate => migrate(config).await,
    }
}

async fn migrate(config: &Config) -> Result<(), AppError> {
    let database = DatabaseManagerImpl::new_from_config(config)
        .await
        .map_err(AppError::Database)?;
    database.migrate().await?;
    info!("Database migrations completed successfully");
    Ok(())
}
