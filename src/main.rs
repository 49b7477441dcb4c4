use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fakenews_detector::detection::NewsDetectionPipelineBuilder;
use fakenews_detector::server::{DemoServer, ServeConfig};

/// Fake-news detector demo server.
#[derive(Debug, Parser)]
#[command(name = "fakenews-detector", version, about)]
struct Args {
    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Directory holding config.json and the classifier weights.
    #[arg(long, default_value = "model")]
    model_dir: PathBuf,

    /// Directory holding tokenizer.json.
    #[arg(long, default_value = "tokenizer")]
    tokenizer_dir: PathBuf,

    /// CUDA device index; CPU when omitted.
    #[arg(long)]
    cuda: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!(
        model_dir = %args.model_dir.display(),
        tokenizer_dir = %args.tokenizer_dir.display(),
        "loading classifier"
    );

    let mut builder = NewsDetectionPipelineBuilder::modernbert(args.model_dir, args.tokenizer_dir);
    if let Some(index) = args.cuda {
        builder = builder.cuda(index);
    }
    let pipeline = builder
        .build()
        .context("failed to load the model/tokenizer pair")?;
    info!("classifier ready");

    let server = DemoServer::new(ServeConfig::new(args.host, args.port), pipeline);
    server.run().await?;

    Ok(())
}
