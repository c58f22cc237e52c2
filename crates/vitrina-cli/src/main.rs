//! Vitrinador: run storefront acceptance scenarios from the command line.
//!
//! ## Usage
//!
//! ```bash
//! vitrinador run                         # Run every group
//! vitrinador run --group "api: orders"   # Run one group
//! vitrinador run --no-ui --json out.json # API groups only, JSON report
//! vitrinador list                        # List the groups
//! ```
//!
//! Exit code is 0 iff zero scenarios failed; skipped scenarios never gate
//! the run red.

mod error;
mod output;

use clap::{ArgAction, Args, Parser, Subcommand};
use error::{CliError, CliResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use vitrina::{Group, HarnessConfig, RunReport, Runner};

#[derive(Parser)]
#[command(
    name = "vitrinador",
    version,
    about = "Acceptance tests for the storefront demo: REST API and browser UI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenario groups against the system under test
    Run(RunArgs),
    /// List the scenario groups in the suite
    List,
}

#[derive(Args)]
struct RunArgs {
    /// Run a single group by name
    #[arg(long)]
    group: Option<String>,

    /// Base URL of the REST API
    #[arg(long, env = "VITRINA_API_URL")]
    api_url: Option<String>,

    /// Base URL of the browser UI
    #[arg(long, env = "VITRINA_UI_URL")]
    ui_url: Option<String>,

    /// Status expected from /orders without authentication
    #[arg(long, env = "VITRINA_UNAUTH_STATUS")]
    unauth_status: Option<u16>,

    /// Skip UI groups even when browser support is compiled in
    #[arg(long)]
    no_ui: bool,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headed: bool,

    /// Write the JSON report to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", console::style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Commands::List => {
            list_groups();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_scenarios(args, cli.quiet))
        }
    }
}

fn list_groups() {
    for group in vitrina_suite::all_groups() {
        let kind = if group.requires_ui_anywhere() { "ui " } else { "api" };
        println!(
            "{} {} ({} scenarios)",
            console::style(kind).dim(),
            group.name,
            group.total_scenario_count()
        );
    }
}

fn build_config(args: &RunArgs) -> HarnessConfig {
    let mut config = HarnessConfig::from_env();
    if let Some(ref url) = args.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(ref url) = args.ui_url {
        config.ui_base_url = url.clone();
    }
    if let Some(status) = args.unauth_status {
        config.unauthenticated_status = status;
    }
    if args.headed {
        config.headless = false;
    }
    config
}

fn select_groups(args: &RunArgs) -> CliResult<Vec<Group>> {
    match args.group {
        Some(ref name) => vitrina_suite::find_group(name)
            .map(|g| vec![g])
            .ok_or_else(|| CliError::UnknownGroup(name.clone())),
        None => Ok(vitrina_suite::all_groups()),
    }
}

async fn run_scenarios(args: RunArgs, quiet: bool) -> CliResult<ExitCode> {
    let config = build_config(&args);
    let groups = select_groups(&args)?;

    let mut runner = Runner::new(config.clone());
    if !args.no_ui {
        if let Some(factory) = browser::driver_factory(&config) {
            runner = runner.with_driver_factory(factory);
        }
    }

    let total: u64 = groups.iter().map(|g| g.total_scenario_count() as u64).sum();
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template("[{bar:30}] {pos}/{len}")
                .unwrap()
                .progress_chars("=> "),
        );
        pb
    };
    let progress_cb = progress.clone();
    runner = runner.on_scenario(move |group, record| {
        progress_cb.println(output::scenario_line(group, record));
        progress_cb.inc(1);
    });

    let report = runner.run(&groups).await?;
    progress.finish_and_clear();

    if !quiet {
        output::print_summary(&report);
    }
    if let Some(ref path) = args.json {
        write_json_report(path, &report)?;
    }

    Ok(if report.all_green() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn write_json_report(path: &std::path::Path, report: &RunReport) -> CliResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(feature = "browser")]
mod browser {
    use vitrina::wait::WaitOptions;
    use vitrina::{ChromiumDriver, DriverConfig, DriverFactory, HarnessConfig, UiDriver};

    /// Factory launching a fresh Chromium instance per UI group
    pub fn driver_factory(config: &HarnessConfig) -> Option<DriverFactory> {
        let driver_config = DriverConfig::new()
            .headless(config.headless)
            .find_wait(WaitOptions::new().with_timeout(config.find_timeout_ms))
            .no_sandbox();
        Some(Box::new(move || {
            let driver_config = driver_config.clone();
            Box::pin(async move {
                let driver = ChromiumDriver::launch(driver_config).await?;
                Ok(Box::new(driver) as Box<dyn UiDriver>)
            })
        }))
    }
}

#[cfg(not(feature = "browser"))]
mod browser {
    use vitrina::{DriverFactory, HarnessConfig};

    /// Without browser support, UI groups are skipped by the runner
    pub fn driver_factory(_config: &HarnessConfig) -> Option<DriverFactory> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_overrides_apply() {
        let args = RunArgs {
            group: None,
            api_url: Some("http://sut:9000".to_string()),
            ui_url: None,
            unauth_status: Some(403),
            no_ui: true,
            headed: true,
            json: None,
        };
        let config = build_config(&args);
        assert_eq!(config.api_base_url, "http://sut:9000");
        assert_eq!(config.unauthenticated_status, 403);
        assert!(!config.headless);
    }

    #[test]
    fn select_groups_rejects_unknown_names() {
        let args = RunArgs {
            group: Some("nope".to_string()),
            api_url: None,
            ui_url: None,
            unauth_status: None,
            no_ui: false,
            headed: false,
            json: None,
        };
        assert!(matches!(
            select_groups(&args),
            Err(CliError::UnknownGroup(_))
        ));
    }

    #[test]
    fn select_groups_finds_one_group() {
        let args = RunArgs {
            group: Some("api: orders".to_string()),
            api_url: None,
            ui_url: None,
            unauth_status: None,
            no_ui: false,
            headed: false,
            json: None,
        };
        let groups = select_groups(&args).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "api: orders");
    }
}
