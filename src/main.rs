//! selreg - X11 selection register daemon
//!
//! Entry point for the binary: one invocation either runs the daemon,
//! claims the daemon role once, or acts as a transient client sending
//! commands to a running daemon.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use selreg::client::Client;
use selreg::config::Config;
use selreg::daemon::Daemon;
use selreg::transport::x11::X11Transport;

/// Command-line arguments for selreg
#[derive(Parser, Debug)]
#[command(name = "selreg")]
#[command(about = "X11 selection register daemon", long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// Capture the PRIMARY selection into register N
    #[arg(short = 'c', long = "copy", value_name = "N")]
    copy: Option<u32>,

    /// Serve register N on the PRIMARY selection
    #[arg(short = 'p', long = "paste", value_name = "N")]
    paste: Option<u32>,

    /// Run as the register daemon (blocks)
    #[arg(short = 'd', long, conflicts_with_all = ["copy", "paste", "claim"])]
    daemon: bool,

    /// Claim the daemon role once and return
    #[arg(short = 'x', long, conflicts_with_all = ["copy", "paste", "daemon"])]
    claim: bool,

    /// Print version and exit
    #[arg(short = 'v', long)]
    version: bool,

    /// Configuration file path
    #[arg(long, env = "SELREG_CONFIG")]
    config: Option<PathBuf>,

    /// X display to connect to (defaults to $DISPLAY)
    #[arg(long)]
    display: Option<String>,

    /// Verbose logging (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long)]
    log_format: Option<String>,

    /// Write logs to file (in addition to stderr)
    #[arg(long)]
    log_file: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = config.with_overrides(args.display.clone());

    init_logging(&args, &config)?;

    if args.copy.is_none() && args.paste.is_none() && !args.daemon && !args.claim {
        // nothing requested; match the historical contract of a clean exit
        return Ok(());
    }

    let transport = X11Transport::connect(config.transport.display.as_deref())
        .context("X connection setup failed")?;
    let atoms = transport.atoms().clone();

    if args.daemon || args.claim {
        let mut daemon = Daemon::new(transport, atoms, config.election.clone());
        if args.claim {
            daemon.claim_daemon_role()?;
            info!("daemon role claimed, returning");
            return Ok(());
        }
        daemon.run()?;
        return Ok(());
    }

    let mut client = Client::new(transport, atoms);
    if let Some(register) = args.copy {
        client.copy(register)?;
    }
    if let Some(register) = args.paste {
        client.paste(register)?;
    }
    Ok(())
}

fn init_logging(args: &Args, config: &Config) -> Result<()> {
    use std::fs::File;

    let log_level = match args.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("selreg={log_level}")));

    let format = args
        .log_format
        .as_deref()
        .unwrap_or(config.logging.format.as_str());

    // If log file is specified, write to both stderr and file
    if let Some(log_file_path) = &args.log_file {
        let file = File::create(log_file_path)
            .with_context(|| format!("Failed to create log file: {log_file_path}"))?;

        match format {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
    } else {
        match format {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                    .init();
            }
        }
    }

    Ok(())
}
