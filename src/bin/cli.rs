//! DualKV CLI Client
//!
//! Interactive client: reads commands from stdin and prints the results.

use clap::Parser;
use dualkv::client::{repl, KvClient, Transport};
use dualkv::{CancellationToken, Config, TransportKind};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, EnvFilter};

/// DualKV CLI
#[derive(Parser, Debug)]
#[command(name = "dualkv-cli")]
#[command(about = "Interactive client for the DualKV key-value store")]
#[command(version)]
struct Args {
    /// Server host name or IP address
    host: String,

    /// Server port
    port: u16,

    /// Transport the server speaks
    #[arg(short, long, value_enum, default_value_t = TransportKind::Tcp)]
    transport: TransportKind,

    /// How long to wait for a connection or a response (milliseconds)
    #[arg(long, default_value = "1000")]
    timeout_ms: u64,
}

fn main() {
    // Successes to stdout, failures to stderr, every line timestamped
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr.with_max_level(tracing::Level::WARN).or_else(std::io::stdout))
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .transport(args.transport)
        .server_addr(format!("{}:{}", args.host, args.port))
        .connect_timeout_ms(args.timeout_ms)
        .response_timeout_ms(args.timeout_ms)
        .build();

    let shutdown = CancellationToken::new();
    if let Err(e) = shutdown.cancel_on_ctrl_c() {
        tracing::warn!("{}", e);
    }

    let result = match config.transport {
        TransportKind::Tcp => KvClient::connect(&config)
            .and_then(|mut client| session(&mut client, &shutdown)),
        TransportKind::Udp => KvClient::open(&config)
            .and_then(|mut client| session(&mut client, &shutdown)),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn session<T: Transport>(client: &mut KvClient<T>, shutdown: &CancellationToken) -> dualkv::Result<()> {
    let lines = repl::spawn_stdin_reader();
    repl::run(client, &lines, shutdown)
}
