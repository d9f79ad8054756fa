//! DualKV Server Binary
//!
//! Serves the in-memory store over TCP or UDP.

use std::sync::Arc;

use clap::Parser;
use dualkv::network::{DatagramServer, StreamServer};
use dualkv::{CancellationToken, Config, Store, TransportKind};
use tracing_subscriber::{fmt, EnvFilter};

/// DualKV Server
#[derive(Parser, Debug)]
#[command(name = "dualkv-server")]
#[command(about = "In-memory key-value store over TCP or UDP")]
#[command(version)]
struct Args {
    /// Port to listen on
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Transport to serve
    #[arg(short, long, value_enum, default_value_t = TransportKind::Tcp)]
    transport: TransportKind,

    /// How long to wait for the rest of a request once its tag arrived (milliseconds)
    #[arg(long, default_value = "1000")]
    operand_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = Args::parse();

    tracing::info!("DualKV Server v{}", dualkv::VERSION);

    let config = Config::builder()
        .transport(args.transport)
        .listen_addr(format!("{}:{}", args.bind, args.port))
        .operand_timeout_ms(args.operand_timeout_ms)
        .build();

    let shutdown = CancellationToken::new();
    if let Err(e) = shutdown.cancel_on_ctrl_c() {
        tracing::warn!("{}", e);
    }

    let store = Arc::new(Store::new());

    let result = match config.transport {
        TransportKind::Tcp => StreamServer::bind(config, store)
            .and_then(|server| server.with_shutdown(shutdown).run()),
        TransportKind::Udp => DatagramServer::bind(config, store)
            .and_then(|server| server.with_shutdown(shutdown).run()),
    };

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
