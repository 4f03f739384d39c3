//! Fix Generation - deterministic template fixers with an AI fallback
//!
//! A classified diagnostic first runs through the template catalog: pattern
//! rules over the error message select a deterministic strategy that applies
//! a line-level text transform. Anything the catalog cannot handle safely
//! falls through to the AI path, which prompts an external reasoning model
//! and validates its structured response into the same fix contract.

use serde::{Deserialize, Serialize};

pub mod ai;
pub mod deterministic;
pub mod engine;
pub mod prompt;
pub mod templates;

pub use engine::{FixEngine, FixStatsSnapshot};
pub use templates::TemplateRegistry;

use crate::diagnostic::{ClassifiedError, FixContext};

/// A single line/column-addressed text edit.
///
/// Changes are descriptive: consumers may render them as a diff, but the
/// authoritative result is always the full new file text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// 1-based line in the *original* content, absent for multi-line ops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "oldCode")]
    pub old_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "newCode")]
    pub new_code: Option<String>,
}

impl Change {
    pub fn new(kind: ChangeKind) -> Self {
        Self {
            kind,
            line: None,
            column: None,
            text: None,
            old_code: None,
            new_code: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn at_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_old_code(mut self, code: impl Into<String>) -> Self {
        self.old_code = Some(code.into());
        self
    }

    pub fn with_new_code(mut self, code: impl Into<String>) -> Self {
        self.new_code = Some(code.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Delete,
    Replace,
    Modify,
    Cleanup,
}

/// What a deterministic fixer produced.
///
/// A decline means the strategy could not act safely; it is a normal value,
/// not an error, and routes the request to the AI path.
#[derive(Debug, Clone)]
pub enum FixOutcome {
    Fixed {
        /// Entire new file content.
        fix: String,
        description: String,
        changes: Vec<Change>,
    },
    Declined {
        reason: String,
    },
}

impl FixOutcome {
    pub fn declined(reason: impl Into<String>) -> Self {
        FixOutcome::Declined {
            reason: reason.into(),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, FixOutcome::Fixed { .. })
    }
}

/// One deterministic repair capability.
///
/// Implementations are pure over their inputs: they never touch the
/// filesystem and always return a complete new text, never a partial edit.
pub trait FixStrategy: Send + Sync {
    fn attempt(&self, error: &ClassifiedError, content: &str, ctx: &FixContext) -> FixOutcome;
}

/// Advisory structural-size classification of an AI-proposed fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixMetadata {
    pub ai_generated: bool,
    pub model: String,
    pub timestamp: String,
    pub error_category: String,
    pub complexity: Complexity,
}

/// Uniform result returned by the fix engine for both paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixResult {
    /// `fix_<uuid>`, assigned per request.
    pub id: String,
    pub success: bool,
    /// Template name for the deterministic path, `"ai"` otherwise.
    pub fix_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub confidence: f32,
    pub auto_fixable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<Change>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FixMetadata>,
}

impl FixResult {
    pub fn failure(id: String, fix_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id,
            success: false,
            fix_type: fix_type.into(),
            fix: None,
            description: None,
            explanation: None,
            confidence: 0.0,
            auto_fixable: false,
            changes: Vec::new(),
            warnings: Vec::new(),
            reason: Some(reason.into()),
            raw_response: None,
            metadata: None,
        }
    }
}

/// Clamp a confidence value into `[0, 1]`.
pub(crate) fn clamp_confidence(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
