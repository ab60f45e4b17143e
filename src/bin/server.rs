use std::process::exit;
use std::time::Duration;

use clap::Parser;

use duologue::logger::setup_logger;
use duologue::{ServerConfig, run_server};

#[derive(Parser, Debug)]
#[command(name = "duologue-server", about = "Two-party messaging server")]
struct Args {
    /// Address to bind
    #[arg(long, env = "DUOLOGUE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind
    #[arg(long, env = "DUOLOGUE_PORT", default_value_t = 8000)]
    port: u16,

    /// Seconds of websocket silence before a session is evicted
    #[arg(long, env = "DUOLOGUE_IDLE_TIMEOUT_SECS", default_value_t = 300)]
    idle_timeout_secs: u64,

    /// Browser origins allowed by CORS (repeatable, or comma-separated
    /// via the environment variable); defaults to the local dev frontends
    #[arg(long = "allowed-origin", env = "DUOLOGUE_ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,

    /// Log level for this crate (RUST_LOG overrides)
    #[arg(long, env = "DUOLOGUE_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logger("duologue", &args.log_level);

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        idle_timeout: Duration::from_secs(args.idle_timeout_secs),
        allowed_origins: if args.allowed_origins.is_empty() {
            ServerConfig::default_origins()
        } else {
            args.allowed_origins
        },
    };

    if let Err(e) = run_server(config).await {
        tracing::error!("server error: {e}");
        exit(1);
    }
}
