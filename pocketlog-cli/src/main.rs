use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pocketlog_core::format_money;
use pocketlog_parser::{ClassificationResult, Classifier, Explanation};
use std::fs::OpenOptions;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod chat;
mod config;
mod reply;
mod reply_worker;
mod session;
mod state;

use config::Config;
use session::{Outcome, Session};

#[derive(Parser, Debug)]
#[command(
    name = "pocketlog",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("POCKETLOG_BUILD_SHA"), ")"),
    about = "Log income and expenses by chatting"
)]
struct Cli {
    /// Config file (default: ~/.pocketlog/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the chat (default)
    Chat,

    /// Classify one message and print the result
    Classify {
        /// The message, e.g. "Spent $50 on groceries"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Show which keywords and rules fired
        #[arg(long, default_value_t = false)]
        explain: bool,
    },

    /// Replay messages (one per line) through a fresh session
    Batch {
        /// Message file (defaults to stdin)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg_path = config::config_path(cli.config.as_deref())?;
    let (cfg, source) = config::load_config(&cfg_path)?;
    let command = cli.command.unwrap_or(Command::Chat);

    match command {
        Command::Chat => {
            let log = state::log_path()?;
            init_logging(&cfg.log.level, Some(log.as_path()))?;
        }
        _ => init_logging(&cfg.log.level, None)?,
    }
    tracing::debug!(path = %cfg_path.display(), ?source, "configuration loaded");

    match command {
        Command::Chat => run_chat(&cfg).await?,

        Command::Classify {
            text,
            json,
            explain,
        } => {
            let classifier =
                Classifier::new(&cfg.keyword_table()).context("compile keyword table")?;
            let ex = classifier.explain(&text.join(" "), &cfg.catalog);
            print_classification(&ex, json, explain)?;
        }

        Command::Batch { file } => run_batch(&cfg, file.as_deref())?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&cfg_path)?,
            ConfigCommand::Show => print!("{}", config::render_config(&cfg)?),
            ConfigCommand::Path => println!("{}", cfg_path.display()),
        },
    }

    Ok(())
}

fn init_logging(level: &str, file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env("POCKETLOG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pocketlog={level},pocketlog_core={level},pocketlog_parser={level}"
        ))
    });
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match file {
        Some(path) => {
            let f = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(f)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

async fn run_chat(cfg: &Config) -> Result<()> {
    let session = Session::from_config(cfg)?;
    let delay = Duration::from_millis(cfg.chat.typing_delay_ms);

    let (req_tx, req_rx) = tokio::sync::mpsc::unbounded_channel();
    let (ev_tx, ev_rx) = std::sync::mpsc::channel();
    let worker = tokio::spawn(reply_worker::run_worker(req_rx, ev_tx, delay));

    let res = tokio::task::spawn_blocking(move || chat::run_chat(session, req_tx, ev_rx))
        .await
        .context("chat UI panicked")?;

    worker.abort();
    res
}

fn run_batch(cfg: &Config, file: Option<&Path>) -> Result<()> {
    let reader: Box<dyn BufRead> = match file {
        Some(p) => Box::new(BufReader::new(
            std::fs::File::open(p).with_context(|| format!("open {}", p.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut session = Session::from_config(cfg)?;
    let mut not_logged = 0usize;
    for line in reader.lines() {
        let line = line.context("read message")?;
        let message = line.trim();
        if message.is_empty() || message.starts_with('#') {
            continue;
        }
        if let Some(answer) = session.handle(&line) {
            if matches!(answer.outcome, Outcome::Unrecognized | Outcome::Rejected) {
                not_logged += 1;
            }
            println!("> {message}");
            println!("{}\n", answer.text);
        }
    }

    let ledger = session.ledger();
    let totals = ledger.totals();
    println!(
        "{} transaction(s) | income {} | expenses {} | balance {}",
        ledger.len(),
        format_money(totals.income),
        format_money(totals.expense),
        format_money(totals.balance)
    );
    if not_logged > 0 {
        println!("{not_logged} message(s) could not be logged");
    }
    Ok(())
}

fn print_classification(ex: &Explanation, json: bool, explain: bool) -> Result<()> {
    if json {
        let out = if explain {
            serde_json::to_string_pretty(ex)?
        } else {
            serde_json::to_string_pretty(&ex.result)?
        };
        println!("{out}");
        return Ok(());
    }

    match &ex.result {
        ClassificationResult::Query => println!("query"),
        ClassificationResult::Transaction {
            kind,
            amount,
            category,
            ..
        } => println!("{kind} {} {category}", format_money(*amount)),
        ClassificationResult::Unrecognized => println!("unrecognized"),
    }

    if explain {
        if let Some(k) = &ex.query_keyword {
            println!("  query keyword: {k}");
            return Ok(());
        }
        println!("  expense signal: {}", ex.expense_signal);
        println!("  income signal:  {}", ex.income_signal);
        println!("  amount text:    {}", ex.amount_text.as_deref().unwrap_or("-"));
        println!("  catalog match:  {}", ex.catalog_match.as_deref().unwrap_or("-"));
        if ex.fired_rules.is_empty() {
            println!("  domain rules:   -");
        } else {
            println!("  domain rules:   {}", ex.fired_rules.join(" -> "));
        }
        if let Some(source) = &ex.kind_source {
            println!("  kind from:      {source:?}");
        }
    }
    Ok(())
}
