use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::ExportConfig;
use crate::exporter::{
    ExportSummary, FailureThresholdExceeded, discover_user_dirs, export_user_dir,
};
use crate::models::{ChatLogOutcome, Message};
use crate::parsers::parse_chat_log_file;
use crate::utils::get_gigatribe_dir;

#[derive(Parser)]
#[command(name = "gigatribe-chat-export")]
#[command(version = "0.1.0")]
#[command(about = "Export GigaTribe chat logs to HTML", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export every chat log of a user directory to HTML documents
    Export {
        /// GigaTribe user directory (contains chat/ and ressources/)
        user_dir: PathBuf,
        /// Directory receiving the documents and copied images
        output_dir: PathBuf,
        /// Worker threads (0 = one per CPU)
        #[arg(short, long, default_value_t = 0)]
        jobs: usize,
    },
    /// Decode one chat log and print its records as JSON lines
    Inspect {
        /// Chat log file
        file: PathBuf,
    },
    /// List GigaTribe user directories
    Users {
        /// Data root to scan instead of the default GigaTribe location
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Export { user_dir, output_dir, jobs }) => {
            let config = ExportConfig::new(user_dir, output_dir).with_jobs(*jobs);
            match export_user_dir(&config) {
                Ok(summary) => print_summary(&config, &summary),
                Err(e) => {
                    if let Some(exceeded) = e.downcast_ref::<FailureThresholdExceeded>() {
                        print_summary(&config, &exceeded.summary);
                    }
                    return Err(e);
                }
            }
        }
        Some(Commands::Inspect { file }) => {
            inspect(file)?;
        }
        Some(Commands::Users { root }) => {
            let root = match root {
                Some(root) => root.clone(),
                None => get_gigatribe_dir()?,
            };
            list_users(&root)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn print_summary(config: &ExportConfig, summary: &ExportSummary) {
    println!("Export summary");
    println!("==============");
    println!("Chat logs exported: {}", summary.exported);
    println!("  Partial: {}", summary.partial);
    println!("  Failed: {}", summary.failed);
    println!("Other files skipped: {}", summary.skipped);
    println!("Messages: {}", summary.messages);
    println!(
        "Images: {} copied, {} not found, {} failed",
        summary.images.copied, summary.images.missing, summary.images.failed
    );
    println!();
    println!("Output directory: {}", config.output_dir.display());
}

/// One `inspect` output line: the decoded record plus its ISO 8601 date
#[derive(Serialize)]
struct InspectRecord<'a> {
    #[serde(flatten)]
    message: &'a Message,
    /// `None` if the decoded fields are not a valid date and time
    datetime: Option<NaiveDateTime>,
}

impl<'a> From<&'a Message> for InspectRecord<'a> {
    fn from(message: &'a Message) -> Self {
        Self { message, datetime: message.timestamp.to_naive_datetime() }
    }
}

fn inspect(file: &Path) -> Result<()> {
    let outcome = parse_chat_log_file(file)?;

    let log = match &outcome {
        ChatLogOutcome::NotChatLog => {
            eprintln!("{} is not a chat log", file.display());
            return Ok(());
        }
        ChatLogOutcome::Complete(log) | ChatLogOutcome::Partial { log, .. } => log,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for message in &log.messages {
        let record = InspectRecord::from(message);
        let line = serde_json::to_string(&record).context("Failed to serialize message")?;
        writeln!(out, "{}", line).context("Failed to write to stdout")?;
    }

    eprintln!(
        "{}: version {}, {} messages",
        log.name,
        log.version.as_deref().unwrap_or("<null>"),
        log.messages.len()
    );
    if let Some(error) = outcome.error() {
        eprintln!("warning: decoding stopped early: {}", error);
    }

    Ok(())
}

fn list_users(root: &Path) -> Result<()> {
    let users = discover_user_dirs(root)?;
    if users.is_empty() {
        println!("No GigaTribe user directories found in {}", root.display());
        return Ok(());
    }

    println!("GigaTribe user directories in {}", root.display());
    for user in &users {
        let resources = if user.has_resources { "" } else { " (no ressources)" };
        println!("  {}: {} chat files{}", user.user_id, user.chat_files, resources);
    }

    Ok(())
}
