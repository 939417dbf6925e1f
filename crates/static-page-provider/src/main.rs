//! static-page-provider: provider host process
//!
//! Started by the orchestration engine; answers its requests on stdio until
//! the engine disconnects. All logging goes to stderr because stdout carries
//! the response frames.

use anyhow::Result;
use clap::Parser;
use static_page_provider::host;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "static-page-provider")]
#[command(about = "Component provider host for the StaticPage component")]
#[command(version)]
struct Args {
    /// Engine endpoint forwarded by the orchestration engine; accepted for
    /// compatibility, unused by the stdio transport
    #[arg(long)]
    engine: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Some(engine) = &args.engine {
        info!(engine = %engine, "Engine endpoint received");
    }
    info!("Starting static-page-provider host");

    host::run().await
}
