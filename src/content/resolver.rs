//! Image reference resolution against a user's `ressources/` folder
//!
//! Markers whose `src` points into `/ressources/` and whose file still
//! exists are rewritten to a path relative to the exported document, and the
//! file is copied next to it. Every other marker is replaced by a placeholder
//! span that the document stylesheet renders as "image not found".

use std::fs;
use std::io;
use std::ops::AddAssign;
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

use tracing::{debug, warn};

use super::fragment::{ImageSpan, Span, spans};
use crate::config::ResolverConfig;

/// Prefix of `src` values that reference shared resources
pub const RESOURCE_PREFIX: &str = "/ressources/";

/// Resource folder name, both in the user directory and in the output tree
pub const RESOURCE_DIR_NAME: &str = "ressources";

/// Replacement for markers whose asset is unavailable
pub const IMAGE_NOT_FOUND_PLACEHOLDER: &str = r#"<span class="image_not_found"></span>"#;

/// Filesystem side effects needed to resolve markers
///
/// Paths are relative to the resource folder, like `a.png` for
/// `/ressources/a.png`.
pub trait ResourceStore {
    fn exists(&self, relative: &Path) -> bool;

    /// Copy an asset into the output resource folder, creating it if needed
    fn copy_to_output(&self, relative: &Path) -> io::Result<()>;
}

/// [`ResourceStore`] backed by the input and output directories
#[derive(Debug, Clone)]
pub struct FsResourceStore {
    source_dir: PathBuf,
    target_dir: PathBuf,
}

impl FsResourceStore {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            source_dir: config.input_root.join(RESOURCE_DIR_NAME),
            target_dir: config.output_root.join(RESOURCE_DIR_NAME),
        }
    }
}

impl ResourceStore for FsResourceStore {
    fn exists(&self, relative: &Path) -> bool {
        self.source_dir.join(relative).is_file()
    }

    fn copy_to_output(&self, relative: &Path) -> io::Result<()> {
        let target = self.target_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(self.source_dir.join(relative), &target)?;
        Ok(())
    }
}

/// Per-marker outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub copied: usize,
    pub missing: usize,
    /// Assets that existed but could not be copied
    pub failed: usize,
}

impl AddAssign for ResolveReport {
    fn add_assign(&mut self, other: Self) {
        self.copied += other.copied;
        self.missing += other.missing;
        self.failed += other.failed;
    }
}

#[derive(Debug)]
pub struct ResourceResolver<S> {
    store: S,
}

impl ResourceResolver<FsResourceStore> {
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(FsResourceStore::new(config))
    }
}

impl<S: ResourceStore> ResourceResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Rewrite or replace every image marker in a sanitized fragment
    pub fn resolve(&self, fragment: &str) -> (String, ResolveReport) {
        let mut report = ResolveReport::default();
        let mut out = String::with_capacity(fragment.len());

        for span in spans(fragment) {
            match span {
                Span::Text(text) => out.push_str(text),
                Span::Image(image) => out.push_str(&self.resolve_image(&image, &mut report)),
            }
        }

        (out, report)
    }

    fn resolve_image(&self, image: &ImageSpan<'_>, report: &mut ResolveReport) -> String {
        let source = image.marker.source_path.as_str();
        let Some(relative) = resource_relative_path(source) else {
            debug!(src = source, "image outside resource folder");
            report.missing += 1;
            return IMAGE_NOT_FOUND_PLACEHOLDER.to_string();
        };

        if !self.store.exists(&relative) {
            debug!(src = source, "image resource not found");
            report.missing += 1;
            return IMAGE_NOT_FOUND_PLACEHOLDER.to_string();
        }

        if let Err(e) = self.store.copy_to_output(&relative) {
            warn!(src = source, error = %e, "failed to copy image resource");
            report.failed += 1;
            return IMAGE_NOT_FOUND_PLACEHOLDER.to_string();
        }

        report.copied += 1;
        image.with_source(&output_source(&relative))
    }
}

/// Path below the resource folder, `None` unless `source` starts with
/// [`RESOURCE_PREFIX`] and stays inside it
///
/// Empty and `.` components are dropped, so `/ressources//a.png` and
/// `/ressources/./a.png` both name `a.png`.
fn resource_relative_path(source: &str) -> Option<PathBuf> {
    let rest = Path::new(source.strip_prefix(RESOURCE_PREFIX)?);
    let mut relative = PathBuf::new();
    for component in rest.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }
    (!relative.as_os_str().is_empty()).then_some(relative)
}

/// `src` value for a copied asset, relative to the exported document
fn output_source(relative: &Path) -> String {
    format!("{}{}{}", RESOURCE_DIR_NAME, MAIN_SEPARATOR, relative.to_string_lossy())
}
