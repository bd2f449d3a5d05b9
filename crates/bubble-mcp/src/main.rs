mod router;
mod server;

use clap::Parser;
use rmcp::ServiceExt;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, Registry};

use crate::server::BubbleServer;

#[derive(Parser)]
#[command(
    name = "thought-bubble-mcp",
    version,
    about = "MCP server that turns documentation into visualization prompts"
)]
struct Cli {
    /// Log filter directive, e.g. "info" or "bubble_mcp=debug". Logs go to stderr.
    #[arg(long, env = "THOUGHT_BUBBLE_LOG", default_value = "info")]
    log_level: String,
}

/// stdout carries protocol frames, so everything is logged to stderr.
fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter)?;
    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    let service = BubbleServer::new()
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP server error: {e}"))?;
    tracing::info!("thought-bubble MCP server running on stdio");
    service.waiting().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    serve().await
}
