//! Site interaction CLI
//!
//! Drives the library without a browser: submit the contact form to a real
//! endpoint, check field validity, or replay a recorded page-event log.
//!
//! # Usage
//!
//! ```bash
//! # POST the contact form to the configured action
//! apn-site submit --name Ada --email ada@example.org --message "Hello"
//!
//! # Field validity only, no network
//! apn-site validate --name "" --email a@b --message hi
//!
//! # Replay page events (scroll bursts are debounced)
//! apn-site replay --file events.yaml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use apn_site::config::{ConfigLoader, SiteConfig};
use apn_site::form::{
    field_states, ContactForm, ContactFormDispatcher, HttpTransport, MemoryView, SubmitEvent,
    SubmitOutcome, ViewSnapshot,
};
use apn_site::page::{replay, Page, PageLayout, RevealLog, TimedEvent};
use apn_site::ConfigError;

#[derive(Parser)]
#[command(name = "apn-site")]
#[command(version)]
#[command(about = "Contact form and page interaction harness for the APN website")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to $APN_SITE_CONFIG or config/site.yaml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and POST the contact form
    Submit {
        #[command(flatten)]
        fields: FieldArgs,

        /// Override the form action URL
        #[arg(long, env = "APN_SITE_FORM_ACTION")]
        action: Option<String>,

        /// Return right after the response instead of waiting for the banner to hide
        #[arg(long)]
        no_wait: bool,
    },

    /// Report per-field validity without submitting
    Validate {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Feed a recorded page-event log through the page model
    Replay {
        /// YAML file with `layout`, `reveal` and timestamped `events`
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(clap::Args)]
struct FieldArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    message: String,
}

impl From<FieldArgs> for ContactForm {
    fn from(args: FieldArgs) -> Self {
        ContactForm::new(args.name, args.email, args.message)
    }
}

#[derive(Deserialize)]
struct ReplayScript {
    #[serde(default)]
    layout: PageLayout,
    /// Whether the reveal library is loaded on the page.
    #[serde(default)]
    reveal: bool,
    events: Vec<TimedEvent>,
}

#[derive(Serialize)]
struct SubmitReport {
    outcome: SubmitOutcome,
    view: ViewSnapshot,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("apn_site=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new(path),
        None => ConfigLoader::from_env(),
    };

    match cli.command {
        Commands::Submit {
            fields,
            action,
            no_wait,
        } => {
            let config = loader
                .load_with_action(action.as_deref())
                .with_context(|| format!("loading {}", loader.path().display()))?;
            Ok(submit(&config, fields.into(), !no_wait).await?)
        }
        Commands::Validate { fields } => Ok(validate(fields.into())?),
        Commands::Replay { file } => {
            let config = loader
                .load()
                .with_context(|| format!("loading {}", loader.path().display()))?;
            Ok(replay_file(&config, &file)?)
        }
    }
}

async fn submit(
    config: &SiteConfig,
    form: ContactForm,
    wait: bool,
) -> apn_site::Result<ExitCode> {
    let view = Arc::new(MemoryView::new(form));
    let transport = Arc::new(HttpTransport::new(config.form.request_timeout())?);
    let dispatcher = ContactFormDispatcher::from_config(&config.form, transport, view.clone());

    let mut event = SubmitEvent::new(view.fields());
    let outcome = dispatcher.submit(&mut event).await;

    if wait && dispatcher.banner_pending() {
        tokio::time::sleep(config.form.banner_duration() + Duration::from_millis(10)).await;
    }

    let ok = outcome == SubmitOutcome::Submitted;
    let report = SubmitReport {
        outcome,
        view: view.snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn validate(form: ContactForm) -> apn_site::Result<ExitCode> {
    let states = field_states(&form);
    println!("{}", serde_json::to_string_pretty(&states)?);

    Ok(if states.iter().all(|s| s.is_valid) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn replay_file(config: &SiteConfig, file: &Path) -> apn_site::Result<ExitCode> {
    let origin = file.display().to_string();
    let content = std::fs::read_to_string(file).map_err(|source| ConfigError::Io {
        path: origin.clone(),
        source,
    })?;
    let script: ReplayScript =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: origin,
            source,
        })?;

    let mut page = Page::from_site_config(config, script.layout);
    if script.reveal {
        page = page.with_reveal(Box::new(RevealLog::default()));
    }

    let report = replay(&mut page, config.debounce.wait(), script.events);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}
