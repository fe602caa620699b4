//! digest-shell: headless daily digest.
//!
//! Loads emails (with on-demand summaries), calendar events, and tasks from
//! the local backend and prints them, or talks to the chat assistant.

mod render;

use std::io::Write as _;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use digest_core::{ChatMessage, DigestEvent, ItemId};
use digest_enrich::{view, BoardConfig, EmailBoard, LoadOutcome, TriggerOutcome};
use digest_gateway::{GatewayConfig, Gateways};

#[derive(Parser)]
#[command(name = "digest-shell")]
#[command(author, version, about = "Daily digest of email, calendar, and tasks")]
#[command(propagate_version = true)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List recent emails, optionally summarizing some of them
    Emails {
        /// Ids of emails to summarize (can specify multiple)
        #[arg(short, long, num_args = 1..)]
        summarize: Vec<String>,

        /// Summarize every email that has no summary yet
        #[arg(long, conflicts_with = "summarize")]
        all: bool,
    },

    /// List upcoming events and tasks
    Agenda,

    /// Ask the chat assistant a question
    Chat {
        /// The question
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _file_guard = init_tracing();

    let cli = Cli::parse();
    let gateways = Gateways::new(GatewayConfig::from_env()).context("invalid backend config")?;

    match cli.command.unwrap_or(Commands::Emails {
        summarize: Vec::new(),
        all: false,
    }) {
        Commands::Emails { summarize, all } => {
            run_emails(gateways, summarize, all, cli.json).await?;
        }
        Commands::Agenda => run_agenda(gateways, cli.json).await?,
        Commands::Chat { prompt } => run_chat(gateways, prompt.join(" ")).await?,
    }

    Ok(())
}

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
///   RUST_LOG    - standard env filter
///
/// Console logs go to stderr so stdout carries only the digest itself.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "digest_shell=info,digest_enrich=info,digest_gateway=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("digest-shell.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

async fn run_emails(
    gateways: Gateways,
    summarize: Vec<String>,
    all: bool,
    json: bool,
) -> anyhow::Result<()> {
    let board = EmailBoard::new(gateways.emails, gateways.summarize, BoardConfig::from_env());
    let mut events = board.subscribe();

    if let LoadOutcome::Fallback { error, .. } = board.load_initial().await {
        eprintln!("Could not load emails ({}); showing sample emails.", error);
    }

    let targets: Vec<ItemId> = if all {
        board
            .cards()
            .into_iter()
            .filter(|card| card.can_trigger())
            .map(|card| card.id)
            .collect()
    } else {
        summarize.into_iter().map(ItemId::from).collect()
    };

    let mut attempts = Vec::with_capacity(targets.len());
    for id in &targets {
        match board.trigger(id) {
            TriggerOutcome::Rejected(reason) => {
                eprintln!("Not summarizing {}: {:?}", id, reason);
            }
            started => attempts.push(started),
        }
    }
    futures::future::join_all(attempts.into_iter().map(TriggerOutcome::join)).await;

    while let Ok(event) = events.try_recv() {
        if let DigestEvent::EnrichmentFailed { item_id, error } = event {
            eprintln!("Summary for {} failed: {}", item_id, error);
        }
    }

    let cards = board.cards();
    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        for card in &cards {
            print!("{}", render::email_card(card));
        }
    }
    Ok(())
}

async fn run_agenda(gateways: Gateways, json: bool) -> anyhow::Result<()> {
    let (events, events_err) = gateways.agenda.events_or_placeholder().await;
    let (tasks, tasks_err) = gateways.agenda.tasks_or_placeholder().await;
    for err in events_err.iter().chain(tasks_err.iter()) {
        eprintln!("{}; showing sample data.", err);
    }

    let today = chrono::Local::now().date_naive();
    let event_cards = view::project_events(&events);
    let task_cards = view::project_tasks(&tasks, today);

    if json {
        let out = serde_json::json!({ "events": event_cards, "tasks": task_cards });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Events");
    for card in &event_cards {
        print!("{}", render::event_card(card));
    }
    println!();
    println!("Tasks");
    for card in &task_cards {
        print!("{}", render::task_card(card));
    }
    Ok(())
}

async fn run_chat(gateways: Gateways, prompt: String) -> anyhow::Result<()> {
    let messages = [ChatMessage::user(prompt)];
    let mut fragments = gateways.chat.stream_reply(&messages).await?;

    let mut stdout = std::io::stdout();
    while let Some(fragment) = fragments.next().await {
        write!(stdout, "{}", fragment?)?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}
