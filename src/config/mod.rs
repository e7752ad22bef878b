//! Export configuration, built from command-line arguments

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Subfolder of a user directory that holds the chat logs
pub const CHAT_DIR_NAME: &str = "chat";

/// Directories the resource resolver reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// GigaTribe user directory containing `ressources/`
    pub input_root: PathBuf,
    /// Export directory receiving the documents and `ressources/`
    pub output_root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub user_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Worker threads, 0 for one per CPU
    pub jobs: usize,
}

impl ExportConfig {
    pub fn new(user_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self { user_dir: user_dir.into(), output_dir: output_dir.into(), jobs: 0 }
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn chat_dir(&self) -> PathBuf {
        self.user_dir.join(CHAT_DIR_NAME)
    }

    pub fn resolver(&self) -> ResolverConfig {
        ResolverConfig { input_root: self.user_dir.clone(), output_root: self.output_dir.clone() }
    }

    /// Check the user directory layout and create the output directory
    ///
    /// # Errors
    ///
    /// Returns an error if the user directory or its `chat/` folder is missing,
    /// if the output directory is the user directory itself, or if the output
    /// directory cannot be created.
    pub fn prepare(&self) -> Result<()> {
        if !self.user_dir.is_dir() {
            bail!("User directory not found: {}", self.user_dir.display());
        }
        let chat_dir = self.chat_dir();
        if !chat_dir.is_dir() {
            bail!("Chat directory not found: {}", chat_dir.display());
        }

        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory: {}", self.output_dir.display())
        })?;

        if same_dir(&self.user_dir, &self.output_dir)? {
            bail!(
                "Output directory must differ from the user directory: {}",
                self.output_dir.display()
            );
        }
        Ok(())
    }
}

fn same_dir(a: &Path, b: &Path) -> Result<bool> {
    let a = a.canonicalize().with_context(|| format!("Failed to resolve {}", a.display()))?;
    let b = b.canonicalize().with_context(|| format!("Failed to resolve {}", b.display()))?;
    Ok(a == b)
}
