//! cloudctl
//!
//! Console for managing compute instances of a control-plane: an interactive
//! numbered menu plus equivalent subcommands.

mod commands;
mod config;
mod interrupt;
mod menu;

use anyhow::Result;
use clap::Parser;
use cloudctl_exec::{AttemptLimit, PollPolicy};
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cloudctl")]
#[command(about = "Compute instance console", long_about = None)]
struct Cli {
    /// Control-plane URL
    #[arg(
        long,
        global = true,
        env = "CLOUDCTL_ENDPOINT",
        default_value = "http://localhost:8080"
    )]
    endpoint: String,

    /// Region to manage
    #[arg(long, global = true, env = "CLOUDCTL_REGION", default_value = "ap-northeast-2")]
    region: String,

    /// Profile forwarded to the control-plane
    #[arg(long, global = true, env = "CLOUDCTL_PROFILE", default_value = "default")]
    profile: String,

    /// Delay between command status checks, in milliseconds
    #[arg(
        long,
        global = true,
        env = "CLOUDCTL_POLL_INTERVAL_MS",
        default_value_t = 1000
    )]
    poll_interval_ms: u64,

    /// Status checks before giving up on a command (0 = no limit)
    #[arg(long, global = true, env = "CLOUDCTL_MAX_ATTEMPTS", default_value_t = 120)]
    max_attempts: u32,

    /// Wait between sending a command and the first status check, in milliseconds
    #[arg(
        long,
        global = true,
        env = "CLOUDCTL_SETTLE_DELAY_MS",
        default_value_t = 1500
    )]
    settle_delay_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with menu output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudctl=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        endpoint: cli.endpoint,
        region: cli.region,
        profile: cli.profile,
        poll: PollPolicy::new(
            Duration::from_millis(cli.poll_interval_ms),
            AttemptLimit::from_count(cli.max_attempts),
        )
        .with_settle_delay(Duration::from_millis(cli.settle_delay_ms)),
    };
    config.validate()?;

    let interrupts = interrupt::Interrupts::install();
    handle_command(cli.command.unwrap_or(Commands::Menu), &config, &interrupts).await
}
