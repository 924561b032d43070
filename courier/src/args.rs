use std::path::PathBuf;

use clap::Parser;

/// Courier Telegram relay
#[derive(Debug, Parser)]
#[command(
    name = "courier",
    about = "HTTP relay for the Telegram Bot API that keeps bot tokens off client devices"
)]
pub struct Args {
    /// Path to configuration file (defaults to `courier.toml` when present)
    #[arg(short, long, env = "COURIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "COURIER_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Default log filter when `RUST_LOG` is unset
    #[arg(long, env = "COURIER_LOG", default_value = "info")]
    pub log: String,
}
