use clap::Parser;
use scriptorium_exec::ExecutionLimits;
use scriptorium_exec_server::templates::MemoryTemplateStore;
use scriptorium_exec_server::{create_app, run_server};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to listen on
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// Maximum number of concurrent executions
    #[arg(short, long, default_value = "10")]
    max_concurrent: usize,

    /// Compile stage ceiling in seconds
    #[arg(long, default_value = "15")]
    compile_timeout: u64,

    /// Run stage ceiling in seconds; per-request timeouts are clamped to this
    #[arg(long, default_value = "30")]
    run_timeout: u64,

    /// Capture cap per output stream, in bytes
    #[arg(long, default_value = "1048576")] // 1MB
    max_output_bytes: u64,

    /// CPU time limit in seconds
    #[arg(long, default_value = "30")]
    cpu_time_limit: u64,

    /// File size limit in bytes
    #[arg(long, default_value = "10485760")] // 10MB
    file_size_limit: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let limits = ExecutionLimits {
        compile_timeout: Duration::from_secs(args.compile_timeout),
        run_timeout: Duration::from_secs(args.run_timeout),
        max_output_bytes: args.max_output_bytes,
        cpu_time: args.cpu_time_limit,
        file_size: args.file_size_limit,
    };

    // Standalone deployments start with an empty store; a persistent
    // template backend plugs in through the TemplateStore seam.
    let templates = Arc::new(MemoryTemplateStore::new());

    let app = create_app(args.max_concurrent, limits, templates);
    run_server(app, args.addr).await?;

    Ok(())
}
