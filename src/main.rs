use clap::{Parser, Subcommand};
use portal_e2e::config::{get_config, init_config};
use portal_e2e::services::diagnostics_service::probe_backend;
use portal_e2e::services::record_service::PgRecordStore;
use portal_e2e::webdriver::WebDriverClient;
use portal_e2e::{ScenarioKind, Suite};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// End-to-end verifier for the job portal: drives the browser, checks Postgres, cleans up.
#[derive(Parser)]
#[command(name = "portal-e2e")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenarios (all of them unless --scenario is given); the default
    Run {
        /// Scenario to run; repeatable
        #[arg(long = "scenario", value_name = "NAME")]
        scenarios: Vec<ScenarioKind>,

        /// Where to write the JSON report (defaults to REPORT_PATH)
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List the known scenarios
    List,
    /// Check that the portal database is reachable and show its user tables
    CheckDb,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_tracing();

    let command = cli.command.unwrap_or(Commands::Run {
        scenarios: Vec::new(),
        report: None,
    });
    match command {
        Commands::List => {
            for kind in ScenarioKind::ALL {
                println!("{:<34} {}", kind.name(), kind.description());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::CheckDb => {
            init_config()?;
            let probe = probe_backend(&get_config().database_url).await?;
            println!("{}", probe.summary());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { scenarios, report } => {
            init_config()?;
            let config = get_config();
            let kinds = if scenarios.is_empty() {
                ScenarioKind::ALL.to_vec()
            } else {
                scenarios
            };

            let launcher = WebDriverClient::from_config(config)?;
            let store = PgRecordStore::new(config.database_url.clone());
            info!(
                portal = %config.app_base_url,
                webdriver = %config.webdriver_url,
                headless = config.headless,
                "starting end-to-end run"
            );

            let outcome = Suite::new(config, &launcher, &store).run(&kinds).await;
            let path = report.unwrap_or_else(|| config.report_path.clone());
            outcome.write(&path)?;

            for failed in outcome.failures() {
                if let Some(failure) = &failed.failure {
                    eprintln!("FAILED {}: {}", failed.name, failure.message);
                }
            }
            if !outcome.teardown.is_clean() {
                eprintln!(
                    "teardown incomplete: {} failure(s), {:?} record(s) remaining",
                    outcome.teardown.failures.len(),
                    outcome.teardown.remaining
                );
            }
            println!(
                "{} passed, {} failed of {} ({} ms)",
                outcome.passed, outcome.failed, outcome.total, outcome.duration_ms
            );

            if outcome.is_success() && outcome.teardown.is_clean() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
