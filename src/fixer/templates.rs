//! Template catalog - message rules mapped to deterministic fix strategies
//!
//! Templates are registered once at startup, bucketed by error category, and
//! never mutated afterwards. Confidence and auto-fixability are static per
//! template; they never depend on the error instance.

use crate::diagnostic::{ClassifiedError, ErrorCategory};
use crate::fixer::deterministic::{
    BracketBalanceFixer, CommentOutConsoleFixer, DeleteDebuggerFixer, MissingTerminatorFixer,
    SemanticDecline, TrailingWhitespaceFixer, UnreachableCodeFixer, UnusedImportFixer,
    UnusedVariableFixer,
};
use crate::fixer::FixStrategy;
use std::collections::HashMap;
use std::sync::Arc;

/// Predicate over the diagnostic message, matched case-insensitively.
#[derive(Debug, Clone)]
pub enum MessageRule {
    /// Message contains the phrase.
    Contains(&'static str),
    /// Message contains any of the phrases.
    AnyOf(&'static [&'static str]),
}

impl MessageRule {
    pub fn matches(&self, message: &str) -> bool {
        let msg = message.to_lowercase();
        match self {
            MessageRule::Contains(phrase) => msg.contains(phrase),
            MessageRule::AnyOf(phrases) => phrases.iter().any(|p| msg.contains(p)),
        }
    }
}

/// A statically-configured (rule, strategy, confidence, auto-fixable) tuple.
pub struct FixTemplate {
    pub name: &'static str,
    pub category: ErrorCategory,
    pub rule: MessageRule,
    pub confidence: f32,
    pub auto_fixable: bool,
    pub strategy: Arc<dyn FixStrategy>,
}

/// The read-only catalog of fix templates, bucketed by category.
pub struct TemplateRegistry {
    buckets: HashMap<ErrorCategory, Vec<FixTemplate>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            buckets: HashMap::new(),
        };

        registry.register_syntax_templates();
        registry.register_unused_templates();
        registry.register_import_templates();
        registry.register_style_templates();
        registry.register_semantic_templates();

        registry
    }

    /// Select the template for a diagnostic, or `None` to fall through to AI.
    ///
    /// Among rule matches in the category bucket, the highest static
    /// confidence wins; ties go to the earliest-registered template. Stable
    /// across repeated calls and side-effect-free.
    pub fn classify(&self, error: &ClassifiedError) -> Option<&FixTemplate> {
        let bucket = self.buckets.get(&error.category)?;

        let mut best: Option<&FixTemplate> = None;
        for template in bucket {
            if !template.rule.matches(&error.message) {
                continue;
            }
            match best {
                // Strictly greater keeps the first-registered winner on ties.
                Some(current) if template.confidence <= current.confidence => {}
                _ => best = Some(template),
            }
        }

        best
    }

    pub fn template_count(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    fn register(&mut self, template: FixTemplate) {
        self.buckets
            .entry(template.category)
            .or_default()
            .push(template);
    }

    fn register_syntax_templates(&mut self) {
        self.register(FixTemplate {
            name: "missing_semicolon",
            category: ErrorCategory::Syntax,
            rule: MessageRule::AnyOf(&["missing semicolon", "expected ';'", "';' expected"]),
            confidence: 0.9,
            auto_fixable: true,
            strategy: Arc::new(MissingTerminatorFixer),
        });

        self.register(FixTemplate {
            name: "unbalanced_braces",
            category: ErrorCategory::Syntax,
            rule: MessageRule::AnyOf(&[
                "unbalanced",
                "unexpected token",
                "missing '}'",
                "missing '{'",
                "unmatched",
            ]),
            confidence: 0.75,
            auto_fixable: true,
            strategy: Arc::new(BracketBalanceFixer),
        });
    }

    fn register_unused_templates(&mut self) {
        self.register(FixTemplate {
            name: "unused_variable",
            category: ErrorCategory::Unused,
            rule: MessageRule::AnyOf(&[
                "is declared but",
                "is assigned a value but never used",
                "unused variable",
                "never used",
            ]),
            confidence: 0.85,
            auto_fixable: true,
            strategy: Arc::new(UnusedVariableFixer),
        });

        self.register(FixTemplate {
            name: "unreachable_code",
            category: ErrorCategory::Unused,
            rule: MessageRule::Contains("unreachable"),
            confidence: 0.8,
            auto_fixable: true,
            strategy: Arc::new(UnreachableCodeFixer),
        });
    }

    fn register_import_templates(&mut self) {
        self.register(FixTemplate {
            name: "unused_import",
            category: ErrorCategory::Import,
            rule: MessageRule::AnyOf(&[
                "unused import",
                "is defined but never used",
                "imported but unused",
            ]),
            confidence: 0.9,
            auto_fixable: true,
            strategy: Arc::new(UnusedImportFixer),
        });
    }

    fn register_style_templates(&mut self) {
        self.register(FixTemplate {
            name: "trailing_whitespace",
            category: ErrorCategory::Style,
            rule: MessageRule::Contains("trailing whitespace"),
            confidence: 0.95,
            auto_fixable: true,
            strategy: Arc::new(TrailingWhitespaceFixer),
        });

        self.register(FixTemplate {
            name: "console_statement",
            category: ErrorCategory::Style,
            rule: MessageRule::AnyOf(&["unexpected console", "no-console", "console statement"]),
            confidence: 0.9,
            auto_fixable: true,
            strategy: Arc::new(CommentOutConsoleFixer),
        });

        self.register(FixTemplate {
            name: "debugger_statement",
            category: ErrorCategory::Style,
            rule: MessageRule::Contains("debugger"),
            confidence: 0.95,
            auto_fixable: true,
            strategy: Arc::new(DeleteDebuggerFixer),
        });

        // Quote and indent style need project style config the deterministic
        // layer does not have; registered so the decline reason is explicit.
        self.register(FixTemplate {
            name: "quote_style",
            category: ErrorCategory::Style,
            rule: MessageRule::AnyOf(&["quote", "indent"]),
            confidence: 0.3,
            auto_fixable: false,
            strategy: Arc::new(SemanticDecline::new(
                "Quote and indentation style depend on project style configuration",
            )),
        });
    }

    /// Categories that need semantic or type information always decline so
    /// the request falls through to the AI path.
    fn register_semantic_templates(&mut self) {
        self.register(FixTemplate {
            name: "type_mismatch",
            category: ErrorCategory::Type,
            rule: MessageRule::AnyOf(&["is not assignable", "mismatched types", "type mismatch"]),
            confidence: 0.5,
            auto_fixable: false,
            strategy: Arc::new(SemanticDecline::new(
                "Type mismatches require type information unavailable to the deterministic layer",
            )),
        });

        self.register(FixTemplate {
            name: "missing_property",
            category: ErrorCategory::Type,
            rule: MessageRule::Contains("does not exist on"),
            confidence: 0.5,
            auto_fixable: false,
            strategy: Arc::new(SemanticDecline::new(
                "Property lookups require type definitions unavailable to the deterministic layer",
            )),
        });

        self.register(FixTemplate {
            name: "not_defined",
            category: ErrorCategory::Scope,
            rule: MessageRule::Contains("is not defined"),
            confidence: 0.4,
            auto_fixable: false,
            strategy: Arc::new(SemanticDecline::new(
                "Resolving an undefined identifier requires knowing where it should come from",
            )),
        });

        self.register(FixTemplate {
            name: "jsx_missing_key",
            category: ErrorCategory::React,
            rule: MessageRule::AnyOf(&["missing \"key\"", "unique \"key\"", "key prop"]),
            confidence: 0.6,
            auto_fixable: false,
            strategy: Arc::new(SemanticDecline::new(
                "Choosing a key expression requires understanding the iterated data",
            )),
        });
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
