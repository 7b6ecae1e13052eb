//! repopulse - forwards a repository's community health profile to New Relic
//!
//! # Usage
//! ```sh
//! GITHUB_TOKEN=... NEW_RELIC_INSERT_KEY=... NEW_RELIC_ACCOUNT_ID=... repopulse run
//! repopulse run --repo newrelic/node-newrelic --signals metrics
//! repopulse send-event Purchase account=5 amount=400
//! ```
//!
//! Settings come from the environment (or a `.env` file); flags override them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use repopulse::application::system::Application;
use repopulse::config::Config;
use repopulse::domain::profile::RepositoryId;
use repopulse::domain::signals::SignalKind;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Community profile telemetry forwarder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the community profile once and send the derived signals
    Run {
        /// Repository as owner/name (overrides GITHUB_REPOSITORY)
        #[arg(short, long)]
        repo: Option<RepositoryId>,

        /// Comma-separated signals: metrics,events,logs,traces (overrides SIGNALS)
        #[arg(short, long)]
        signals: Option<String>,

        /// Exit non-zero when any sink fails or rejects its payload
        #[arg(long)]
        strict: bool,
    },
    /// Send one custom event with key=value attributes
    SendEvent {
        /// Value of the eventType field
        event_type: String,

        /// Attributes as key=value
        attributes: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Run {
        repo: None,
        signals: None,
        strict: false,
    }) {
        Commands::Run {
            repo,
            signals,
            strict,
        } => {
            if let Some(repo) = repo {
                config.source.repository = repo;
            }
            if let Some(raw) = signals {
                config.dispatch.signals = SignalKind::parse_list(&raw)?;
            }
            config.validate()?;
            info!("repopulse {} starting...", env!("CARGO_PKG_VERSION"));

            let mut app = Application::build(config)?;
            let report = app.run_once().await?;

            for signal in &report.signals {
                println!("{}", signal.status_line());
            }
            let failed = report.failures().count();
            println!(
                "{}: {} of {} signals delivered in one pass (fetch took {} ms)",
                report.repository,
                report.signals.len() - failed,
                report.signals.len(),
                report.fetch_elapsed.as_millis()
            );

            if strict && failed > 0 {
                anyhow::bail!("{} signal(s) failed", failed);
            }
        }
        Commands::SendEvent {
            event_type,
            attributes,
        } => {
            config.dispatch.signals = vec![SignalKind::Events];
            config.validate()?;

            let app = Application::build(config)?;
            let outcome = app.send_custom_event(&event_type, &attributes).await?;
            println!("Response Status: {}", outcome.status_code);
            if !outcome.is_success() {
                warn!("Event rejected: {}", outcome.body);
            }
        }
    }

    Ok(())
}
