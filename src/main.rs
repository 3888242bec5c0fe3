use clap::Parser;
use subtrack::{
    Config, Server,
    commands::{Commands, handle_command},
};
use tracing::error;

#[derive(Parser)]
#[command(name = "subtrack")]
#[command(about = "Personal subscription tracker with spending dashboards")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    let result = match cli.command {
        Some(command) => handle_command(command, &config).await,
        None => run_server(config).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run_server(config: Config) -> Result<(), subtrack::error::AppError> {
    let server = Server::new(config).await?;
    server.run().await
}
