//! swraid-check entry point.
//!
//! Walks the swRaidTable of one host, prints the status line and exits
//! with 0 when every array is active, 1 otherwise or on any error.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::{error, info, warn};

use swraid_check::{run_check, CheckConfig, Report, SwRaidCollector};
use swraid_common::{BulkWalker, StaticWalker, SwRaidError, SwRaidResult, Walker};

/// Software RAID status over SNMP (UCD-SNMP-MIB swRaidTable)
#[derive(Parser, Debug)]
#[command(name = "swraid-check")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true)]
struct Args {
    /// The community string for the device [default: public]
    #[arg(short = 'c', long)]
    community: Option<String>,

    /// The host to walk [default: 127.0.0.1]
    #[arg(short = 'h', long)]
    host: Option<String>,

    /// Agent UDP port [default: 161]
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Per-request timeout in seconds [default: 5]
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// Retries per request [default: 5]
    #[arg(short = 'r', long)]
    retries: Option<u32>,

    /// Path to the net-snmp snmpbulkwalk program
    #[arg(long)]
    snmpbulkwalk: Option<String>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read saved `snmpbulkwalk -On` output instead of querying the host
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: String,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Initialize tracing/logging on stderr; stdout carries the report.
fn init_logging(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();
}

/// Merges the configuration file (if any) with command line overrides.
fn build_config(args: &Args) -> SwRaidResult<CheckConfig> {
    let mut config = match &args.config {
        Some(path) => CheckConfig::load(path)?,
        None => CheckConfig::default(),
    };

    if let Some(community) = &args.community {
        config.snmp.community = community.clone();
    }
    if let Some(host) = &args.host {
        config.snmp.host = host.clone();
    }
    if let Some(port) = args.port {
        config.snmp.port = port;
    }
    if let Some(timeout) = args.timeout {
        config.snmp.timeout_secs = timeout;
    }
    if let Some(retries) = args.retries {
        config.snmp.retries = retries;
    }
    if let Some(program) = &args.snmpbulkwalk {
        config.snmp.program = program.clone();
    }

    Ok(config)
}

/// Builds the walker: replayed output or the live agent.
fn build_walker(args: &Args, config: &CheckConfig) -> SwRaidResult<Box<dyn Walker>> {
    match &args.replay {
        Some(path) => {
            let output = fs::read_to_string(path)
                .map_err(|e| SwRaidError::io(path.display().to_string(), e))?;
            let walker = StaticWalker::from_walk_output(&output)?;
            if walker.is_empty() {
                warn!("{} holds no walk output, the table will be empty", path.display());
            } else {
                info!("Replaying {} leaves from {}", walker.len(), path.display());
            }
            Ok(Box::new(walker))
        }
        None => {
            info!("Walking {}", config.snmp.agent());
            Ok(Box::new(BulkWalker::new(config.snmp.clone())))
        }
    }
}

fn print_report(report: &Report, format: OutputFormat) -> SwRaidResult<()> {
    match format {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => {
            let json = report
                .to_json()
                .map_err(|e| SwRaidError::internal(format!("JSON encoding: {}", e)))?;
            println!("{}", json);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    let (config, mut collector, mut walker) = match build_config(&args).and_then(|config| {
        let collector = SwRaidCollector::new(config.table.clone())?;
        let walker = build_walker(&args, &config)?;
        Ok((config, collector, walker))
    }) {
        Ok(parts) => parts,
        Err(e) => {
            error!("swraid-check configuration error: {}", e);
            println!("Config Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = match run_check(walker.as_mut(), &mut collector).await {
        Ok(report) => report,
        Err(e) => {
            if e.is_retryable() {
                warn!(
                    "swraid-check walk of {} failed, a later run may succeed: {}",
                    config.snmp.agent(),
                    e
                );
            } else {
                error!("swraid-check walk of {} failed: {}", config.snmp.agent(), e);
            }
            println!("Walk Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = print_report(&report, args.format) {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    if report.healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
