//! Diagnostic input types - the classified errors the engine repairs
//!
//! Diagnostics arrive pre-classified from an upstream collaborator (a build
//! watcher, a linter adapter, or the CLI). This module only defines their
//! shape plus the context bundle handed to the fix engine alongside them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A diagnostic already bucketed into a category by the upstream classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub message: String,
    pub file: PathBuf,
    /// 1-based line number in the file the diagnostic points at.
    pub line: usize,
    pub severity: Severity,
}

/// Categories the deterministic template catalog is bucketed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Type,
    Import,
    Unused,
    Scope,
    Style,
    React,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Syntax => "syntax",
            ErrorCategory::Type => "type",
            ErrorCategory::Import => "import",
            ErrorCategory::Unused => "unused",
            ErrorCategory::Scope => "scope",
            ErrorCategory::Style => "style",
            ErrorCategory::React => "react",
        }
    }
}

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

/// Context bundle supplied alongside a diagnostic.
///
/// Everything here is optional; the prompt builder degrades gracefully when
/// fields are absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixContext {
    #[serde(default)]
    pub related_files: Vec<RelatedFile>,
    #[serde(default)]
    pub project: Option<ProjectInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedFile {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub runtime_version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub conventions: Option<String>,
}

/// Source file extensions considered when gathering related-file context.
const SOURCE_EXTENSIONS: &[&str] = &["rs", "js", "jsx", "ts", "tsx", "py", "go", "java"];

/// Maximum size of a file picked up as related context.
const MAX_RELATED_FILE_BYTES: u64 = 50_000;

/// Discover files near the diagnostic to include as prompt context.
///
/// Walks the diagnostic's directory, keeps small source files, and caps the
/// result. Smaller files are preferred since they tend to be helpers or
/// config the fix needs to respect.
pub fn discover_related_files(file: &Path, limit: usize) -> Vec<RelatedFile> {
    let Some(parent) = file.parent() else {
        return Vec::new();
    };

    let mut candidates: Vec<(u64, PathBuf)> = Vec::new();
    for entry in walkdir::WalkDir::new(parent)
        .max_depth(1)
        .into_iter()
        .flatten()
    {
        if !entry.file_type().is_file() || entry.path() == file {
            continue;
        }
        let ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if !SOURCE_EXTENSIONS.contains(&ext) {
            continue;
        }
        if let Ok(metadata) = entry.metadata() {
            if metadata.len() < MAX_RELATED_FILE_BYTES {
                candidates.push((metadata.len(), entry.path().to_path_buf()));
            }
        }
    }

    candidates.sort_by_key(|(size, _)| *size);

    candidates
        .into_iter()
        .take(limit)
        .filter_map(|(_, path)| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| RelatedFile { path, content })
        })
        .collect()
}
