//! Job board GraphQL server.
//!
//! # Running
//! ```bash
//! cargo run -p jobboard_server -- --port 9000 --data-dir ./data
//! ```

use clap::Parser;
use jobboard_core::Store;
use jobboard_server::{JobBoardServer, ServerConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "jobboard-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 9000)]
    port: u16,

    /// Directory holding companies.json, jobs.json and users.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Secret used to sign access tokens
    #[arg(long, env = "JOBBOARD_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Lifetime of issued access tokens, in seconds
    #[arg(long, default_value_t = 86_400)]
    token_ttl_secs: u64,

    /// Do not serve the GraphiQL playground
    #[arg(long)]
    no_playground: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "jobboard=debug"
    } else {
        "jobboard=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let store = match &args.data_dir {
        Some(dir) => {
            info!("Loading data from {}", dir.display());
            Store::load_from_dir(dir)?
        }
        None => Store::with_seed_data(),
    };

    let mut config = ServerConfig::new()
        .host(args.host)
        .port(args.port)
        .token_ttl(Duration::from_secs(args.token_ttl_secs));
    if let Some(secret) = args.jwt_secret {
        config = config.jwt_secret(secret);
    }
    if args.no_playground {
        config = config.no_playground();
    }

    let server = JobBoardServer::builder().config(config).store(store).build()?;

    tokio::select! {
        result = server.listen() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    Ok(())
}
