//! Export of a GigaTribe user directory to HTML transcripts.
//!
//! # Error Handling Strategy
//!
//! Exporting follows a **graceful degradation** approach per chat file:
//!
//! - **Non-chat files**: Files without the `ch` signature are skipped and
//!   counted, never reported as failures.
//! - **Decode failures**: A truncated or malformed record ends that file's
//!   transcript, but the rows decoded before it are written and the document
//!   is completed (partial export).
//! - **I/O failures**: An unreadable log or an uncreatable document fails that
//!   file only; other files keep going.
//! - **Failure threshold**: If more than 50% of the chat logs fail outright,
//!   the export returns an error after processing everything it could.

use std::fs::File;
use std::io::BufWriter;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use super::discovery::discover_chat_files;
use crate::config::{ExportConfig, ResolverConfig};
use crate::content::resolver::RESOURCE_DIR_NAME;
use crate::content::{ResolveReport, ResourceResolver};
use crate::parsers::{DecodeError, Opened, RecordStream};
use crate::render::{HtmlTranscriptWriter, TranscriptRenderer};
use crate::utils::{output_document_path, read_chat_file};

/// Result of exporting one chat file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Not a chat log
    Skipped,
    Exported { document: PathBuf, messages: usize, images: ResolveReport },
    /// Decoding stopped early; the document holds the messages before `error`
    Partial { document: PathBuf, messages: usize, images: ResolveReport, error: DecodeError },
}

/// Totals over a whole export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub exported: usize,
    pub partial: usize,
    pub skipped: usize,
    pub failed: usize,
    pub messages: usize,
    pub images: ResolveReport,
}

impl ExportSummary {
    /// Chat logs attempted, excluding skipped non-chat files
    pub fn chat_logs(&self) -> usize {
        self.exported + self.partial + self.failed
    }
}

impl AddAssign<&Result<FileOutcome>> for ExportSummary {
    fn add_assign(&mut self, outcome: &Result<FileOutcome>) {
        match outcome {
            Ok(FileOutcome::Skipped) => self.skipped += 1,
            Ok(FileOutcome::Exported { messages, images, .. }) => {
                self.exported += 1;
                self.messages += messages;
                self.images += *images;
            }
            Ok(FileOutcome::Partial { messages, images, .. }) => {
                self.partial += 1;
                self.messages += messages;
                self.images += *images;
            }
            Err(_) => self.failed += 1,
        }
    }
}

/// Too many chat logs failed; carries the counts of the whole run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Export failed: {}/{} chat logs could not be exported ({}% failure rate)",
    .summary.failed,
    .chat_logs,
    .failure_percent
)]
pub struct FailureThresholdExceeded {
    pub summary: ExportSummary,
    pub chat_logs: usize,
    pub failure_percent: u32,
}

/// Export every chat log of a user directory
///
/// Files are processed in parallel on a dedicated thread pool sized by
/// `config.jobs`. Each worker owns its input buffer, document writer and
/// resolver; only the input `ressources/` folder is shared, read-only.
///
/// # Errors
///
/// Returns an error if:
/// - The user directory layout is invalid or the output directory cannot be created
/// - The chat directory cannot be listed
/// - More than 50% of chat logs fail outright; the error is a
///   [`FailureThresholdExceeded`] holding the summary of what was written
pub fn export_user_dir(config: &ExportConfig) -> Result<ExportSummary> {
    config.prepare()?;

    if !config.user_dir.join(RESOURCE_DIR_NAME).is_dir() {
        warn!(
            user_dir = %config.user_dir.display(),
            "no ressources folder, images will be shown as not found"
        );
    }

    let files = discover_chat_files(&config.chat_dir())?;
    let resolver_config = config.resolver();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .context("Failed to build export thread pool")?;
    let outcomes: Vec<(PathBuf, Result<FileOutcome>)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| (path.clone(), export_chat_file(path, &resolver_config)))
            .collect()
    });

    let mut summary = ExportSummary::default();
    for (path, outcome) in &outcomes {
        if let Err(e) = outcome {
            warn!(file = %path.display(), "export failed: {:#}", e);
        }
        summary += outcome;
    }

    let chat_logs = summary.chat_logs();
    if chat_logs > 0 {
        let failure_rate = summary.failed as f64 / chat_logs as f64;
        if failure_rate > 0.5 {
            let failure_percent = (failure_rate * 100.0) as u32;
            return Err(FailureThresholdExceeded { summary, chat_logs, failure_percent }.into());
        }
    }

    Ok(summary)
}

/// Decode one chat file and write its HTML document into the output root
///
/// # Errors
///
/// Returns an error if the file cannot be read, its version header is
/// corrupt, or the document cannot be written. Record-level decode failures
/// produce [`FileOutcome::Partial`] instead.
pub fn export_chat_file(path: &Path, config: &ResolverConfig) -> Result<FileOutcome> {
    let data = read_chat_file(path)?;

    let stream = match RecordStream::open(&data)
        .with_context(|| format!("Failed to decode chat log: {}", path.display()))?
    {
        Opened::Chat(stream) => stream,
        Opened::NotChatLog => {
            info!(file = %path.display(), "skipping, not a chat file");
            return Ok(FileOutcome::Skipped);
        }
    };
    info!(file = %path.display(), "processing chat log");

    let document = output_document_path(&config.output_root, path)?;
    let file = File::create(&document)
        .with_context(|| format!("Failed to create document: {}", document.display()))?;
    let mut writer = HtmlTranscriptWriter::new(BufWriter::new(file));

    let resolver = ResourceResolver::from_config(config);
    let summary = TranscriptRenderer::new(&resolver)
        .render(stream, &mut writer)
        .with_context(|| format!("Failed to write document: {}", document.display()))?;

    let messages = summary.rows;
    let images = summary.images;
    Ok(match summary.error {
        Some(error) => {
            warn!(
                file = %path.display(),
                record = error.record_index(),
                "{}; kept {} messages",
                error,
                messages
            );
            FileOutcome::Partial { document, messages, images, error }
        }
        None => FileOutcome::Exported { document, messages, images },
    })
}
