//! Jobtrack CLI - track job applications against the application store

mod output;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use jobtrack_core::application::{ApplicationRef, TrackingCache};
use jobtrack_core::domain::Job;
use jobtrack_infra_http::HttpApplicationStore;
use settings::{LogFormat, Settings};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Track job applications", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: platform config dir, jobtrack/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Application store URL (overrides config and JOBTRACK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List tracked applications, most recently updated first
    List,

    /// Show applications grouped by status
    Board,

    /// Start tracking a job
    Track {
        /// Job posting URL
        #[arg(short, long)]
        link: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        company: String,

        #[arg(long, default_value = "")]
        location: String,

        /// Source feed the job came from
        #[arg(short, long, default_value = "manual")]
        module: String,
    },

    /// Stop tracking an application
    Untrack {
        /// Application ID (store or derived) or job link
        target: String,
    },

    /// Change an application's status
    Status {
        /// Application ID (store or derived) or job link
        target: String,

        /// Interested, Applied, Interview, Offer or Rejected
        status: String,
    },

    /// Replace an application's notes
    Notes {
        /// Application ID (store or derived) or job link
        target: String,

        text: String,
    },

    /// Check whether a job link is tracked
    Check {
        link: String,
    },
}

fn init_logging(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobtrack=warn"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn exit_code<T>(result: jobtrack_core::Result<T>) -> ExitCode {
    // Failures were already reported through the notification sink
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref(), cli.api_url.clone())?;
    init_logging(settings.log_format);
    debug!(api_url = %settings.api_url, "Settings loaded");

    // DI wiring
    let store = HttpApplicationStore::new(&settings.store_config())
        .with_context(|| format!("Invalid application store URL: {}", settings.api_url))?;
    let cache = TrackingCache::new(Arc::new(store), Arc::new(output::TerminalSink));

    if let Err(e) = cache.load().await {
        eprintln!("{} {}", "✗ Could not load applications:".red().bold(), e.user_message());
        return Ok(ExitCode::FAILURE);
    }

    let code = match cli.command {
        Commands::List => {
            output::print_applications(&cache.applications());
            ExitCode::SUCCESS
        }

        Commands::Board => {
            output::print_board(&cache.board());
            ExitCode::SUCCESS
        }

        Commands::Track {
            link,
            title,
            company,
            location,
            module,
        } => {
            let job = Job::new(company, title, location, link, module);
            exit_code(cache.track(&job).await)
        }

        Commands::Untrack { target } => exit_code(cache.untrack(ApplicationRef::parse(&target)).await),

        Commands::Status { target, status } => {
            let result = cache
                .update_status_str(ApplicationRef::parse(&target), &status)
                .await;
            if let Ok(app) = &result {
                output::print_application(app);
            }
            exit_code(result)
        }

        Commands::Notes { target, text } => {
            let result = cache.update_notes(ApplicationRef::parse(&target), text).await;
            if let Ok(app) = &result {
                output::print_application(app);
            }
            exit_code(result)
        }

        Commands::Check { link } => {
            match cache.find(&ApplicationRef::Link(link.trim().to_string())) {
                Some(app) => {
                    println!("{}", "✓ Tracked".green().bold());
                    output::print_application(&app);
                    ExitCode::SUCCESS
                }
                None => {
                    println!("{}", "○ Not tracked".yellow());
                    ExitCode::FAILURE
                }
            }
        }
    };

    Ok(code)
}
