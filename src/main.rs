use std::io::{Write, stdout};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use statwatch::config::{self, Config, ConfigError, LogFormat};
use statwatch::fetch::{HttpSource, RetryPolicy};
use statwatch::logging;
use statwatch::poll::{self, CycleReport, run_cycle};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(
    name = "statwatch",
    version,
    about = "Poll a server's stats endpoint and warn about resource pressure"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stats endpoint to poll
    #[arg(long)]
    url: Option<String>,

    /// Attempts per cycle before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Pause between attempts in milliseconds
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Keep polling until interrupted
    #[arg(long, default_value_t = false)]
    watch: bool,

    /// Time between cycles in watch mode, in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Log filter, e.g. `info` or `statwatch=debug`
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Print the decoded snapshot before any alerts
    #[arg(long, default_value_t = false)]
    show_snapshot: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let (config, config_error) = load_config_for_cli(&cli);

    logging::init(&config.logging)?;
    if let Some(err) = config_error {
        warn!(error = %err, "falling back to default configuration");
    }
    config.validate()?;

    let source = HttpSource::new(config.source.url.clone(), config.source.timeout())?;
    let policy = config.retry.policy();

    if config.watch.enabled {
        watch(&source, &policy, &config, cli.show_snapshot).await
    } else {
        let report = run_cycle(&source, &policy)
            .await
            .wrap_err("Unable to fetch server statistic")?;
        print_report(&report, cli.show_snapshot)
    }
}

async fn watch(
    source: &HttpSource,
    policy: &RetryPolicy,
    config: &Config,
    show_snapshot: bool,
) -> Result<()> {
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    info!(url = source.url(), interval_ms = config.watch.interval_ms, "watching");
    poll::watch(source, policy, config.watch.interval(), shutdown, |result| -> Result<()> {
        match result {
            Ok(report) => print_report(&report, show_snapshot)?,
            Err(err) => error!(
                attempts = policy.max_attempts(),
                error = %err.last(),
                "Unable to fetch server statistic"
            ),
        }
        Ok(())
    })
    .await
}

fn print_report(report: &CycleReport, show_snapshot: bool) -> Result<()> {
    let mut out = stdout().lock();
    if show_snapshot {
        writeln!(out, "{}", report.snapshot.summary())?;
    }
    for alert in &report.alerts {
        writeln!(out, "{alert}")?;
    }
    out.flush()?;
    Ok(())
}

/// Resolves file config, then applies CLI overrides. A config file that
/// cannot be read or parsed yields defaults plus the error, so it can be
/// logged once logging is up.
fn load_config_for_cli(cli: &Cli) -> (Config, Option<ConfigError>) {
    let loaded = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };
    let (mut config, error) = match loaded {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };

    if let Some(ref url) = cli.url {
        config.source.url = url.clone();
    }
    if let Some(attempts) = cli.max_attempts {
        config.retry.max_attempts = attempts;
    }
    if let Some(delay) = cli.retry_delay_ms {
        config.retry.delay_ms = delay;
    }
    if let Some(timeout) = cli.timeout_ms {
        config.source.timeout_ms = timeout;
    }
    if cli.watch {
        config.watch.enabled = true;
    }
    if let Some(interval) = cli.interval_ms {
        config.watch.interval_ms = interval;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    (config, error)
}
