use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use perfwatch::config::Settings;
use perfwatch::output::render_report;
use perfwatch::{CounterCache, MultiTargetOrchestrator, ProbeConfig, Status};
use perfwatch_adapters::perfmon::PerfmonAdapter;

#[derive(Parser, Debug)]
#[command(name = "perfwatch", version)]
#[command(about = "Nagios plugin for Cisco UC PerfmonPort performance counters")]
struct Args {
    /// Server running the PerfmonPort service
    #[arg(short = 'H', long)]
    server: Option<String>,

    /// Node address, or a comma-separated list of nodes
    #[arg(short = 'N', long)]
    nodes: Option<String>,

    /// Username for the PerfmonPort service
    #[arg(short, long)]
    username: Option<String>,

    /// Password for the PerfmonPort service (prefer PERFWATCH_PASSWORD)
    #[arg(short, long)]
    password: Option<String>,

    /// Perfmon object with optional instance in parenthesis, e.g. "Processor(_Total)"
    #[arg(short, long)]
    object: Option<String>,

    /// Counter name; omit to list every counter of the object
    #[arg(short = 'n', long)]
    counter: Option<String>,

    /// Warning threshold or threshold range
    #[arg(short, long, allow_hyphen_values = true)]
    warning: Option<String>,

    /// Critical threshold or threshold range
    #[arg(short, long, allow_hyphen_values = true)]
    critical: Option<String>,

    /// Maximum cache age in seconds (0 disables the cache)
    #[arg(short = 'a', long)]
    max_cache_age: Option<u64>,

    /// List every object and counter the node exposes
    #[arg(short, long)]
    list_counters: bool,

    /// Directory for cached snapshots
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Accept self-signed server certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Output prefix for the status line
    #[arg(long)]
    prefix: Option<String>,

    /// Settings file (TOML, YAML, JSON, ...)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Write diagnostics to this file instead of stderr
    #[arg(short = 'L', long)]
    log_file: Option<PathBuf>,

    /// Debug level: 0/1 errors, 2 warnings, 3 informational, 4 debug
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=4))]
    debug: u8,
}

fn main() -> ExitCode {
    // Misuse must not exit 2, which the supervisor reads as CRITICAL.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => {
                    println!("{}", usage_line(&e));
                    ExitCode::from(Status::Unknown.code())
                }
            };
        }
    };

    if let Err(e) = init_logging(args.debug, args.log_file.as_deref()) {
        println!("{} - {:#}", Status::Unknown, e);
        return ExitCode::from(Status::Unknown.code());
    }

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!(error = %format!("{:#}", e), "probe setup failed");
            println!("{} - {:#}", Status::Unknown, e);
            ExitCode::from(Status::Unknown.code())
        }
    }
}

/// Status line for a command-line error: the first line of clap's message.
fn usage_line(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let summary = rendered
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("invalid command line");
    let summary = summary.strip_prefix("error:").unwrap_or(summary).trim();
    format!("{} - {}", Status::Unknown, summary)
}

fn run(args: &Args) -> Result<u8> {
    let config = load_config(args)?;

    let adapter = PerfmonAdapter::builder()
        .server(&config.server)
        .credentials(&config.username, &config.password)
        .timeout(config.timeout)
        .accept_invalid_certs(config.accept_invalid_certs)
        .build()
        .context("failed to create PerfmonPort client")?;
    let cache = CounterCache::new(&config.cache_dir);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let report = runtime.block_on(MultiTargetOrchestrator::new(&adapter, &cache, &config).run());

    for line in render_report(&report, &config.output_prefix) {
        println!("{}", line);
    }

    Ok(report.exit_code())
}

/// Command-line flags override file and environment settings.
fn load_config(args: &Args) -> Result<ProbeConfig> {
    let builder = Settings::builder(args.config.as_deref())?
        .set_override_option("server", args.server.clone())?
        .set_override_option("nodes", args.nodes.clone())?
        .set_override_option("username", args.username.clone())?
        .set_override_option("password", args.password.clone())?
        .set_override_option("object", args.object.clone())?
        .set_override_option("counter", args.counter.clone())?
        .set_override_option("warning", args.warning.clone())?
        .set_override_option("critical", args.critical.clone())?
        .set_override_option("max_cache_age_secs", args.max_cache_age)?
        .set_override_option("list_counters", args.list_counters.then_some(true))?
        .set_override_option(
            "cache_dir",
            args.cache_dir.as_ref().map(|p| p.display().to_string()),
        )?
        .set_override_option("timeout_secs", args.timeout)?
        .set_override_option("accept_invalid_certs", args.insecure.then_some(true))?
        .set_override_option("output_prefix", args.prefix.clone())?;

    let settings = Settings::from_config(builder.build()?)?;
    Ok(ProbeConfig::try_from(settings)?)
}

fn level_for(debug: u8) -> &'static str {
    match debug {
        0 | 1 => "error",
        2 => "warn",
        3 => "info",
        _ => "debug",
    }
}

/// Stdout carries plugin output only; diagnostics go to the log file or
/// stderr. `RUST_LOG` overrides the debug level.
fn init_logging(debug: u8, log_file: Option<&Path>) -> Result<()> {
    let level = level_for(debug);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "error,perfwatch={0},perfwatch_adapters={0}",
            level
        ))
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("can't open log file {}", path.display()))?;
            subscriber
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => subscriber.with_writer(std::io::stderr).init(),
    }

    Ok(())
}
