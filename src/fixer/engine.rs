//! Fix engine - orchestrates deterministic and AI repair paths
//!
//! One engine instance owns the template catalog, the AI generator, and the
//! aggregate counters. Requests are stateless beyond those counters, so a
//! shared `Arc<FixEngine>` supports any number of concurrent fixes.

use crate::config::EngineConfig;
use crate::diagnostic::{ClassifiedError, FixContext};
use crate::fixer::ai::{AiAttempt, AiFixGenerator};
use crate::fixer::templates::TemplateRegistry;
use crate::fixer::{FixOutcome, FixResult};
use crate::providers::Provider;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Aggregate counters, increment-only and safe to read mid-flight.
#[derive(Debug, Default)]
struct FixStats {
    total_fixes: AtomicU64,
    successful_fixes: AtomicU64,
    failed_fixes: AtomicU64,
    auto_fixable_errors: AtomicU64,
}

/// Point-in-time view of the engine's counters.
#[derive(Debug, Clone, Serialize)]
pub struct FixStatsSnapshot {
    pub total_fixes: u64,
    pub successful_fixes: u64,
    pub failed_fixes: u64,
    pub auto_fixable_errors: u64,
    pub success_rate: f64,
}

pub struct FixEngine {
    registry: TemplateRegistry,
    ai: AiFixGenerator,
    stats: FixStats,
}

impl FixEngine {
    pub fn new(
        provider: Arc<dyn Provider + Send + Sync>,
        model: String,
        config: &EngineConfig,
    ) -> Self {
        Self {
            registry: TemplateRegistry::new(),
            ai: AiFixGenerator::new(provider, model, config),
            stats: FixStats::default(),
        }
    }

    /// Generate a fix for one diagnostic.
    ///
    /// The deterministic path runs first; a classification miss or a decline
    /// falls through to the AI path. Exactly one path's result is returned -
    /// there is no re-attempt of the deterministic path after an AI failure
    /// and no merging of partial results.
    pub async fn generate_fix(
        &self,
        error: &ClassifiedError,
        content: &str,
        ctx: &FixContext,
    ) -> FixResult {
        self.stats.total_fixes.fetch_add(1, Ordering::Relaxed);
        let id = format!("fix_{}", Uuid::new_v4());

        if let Some(template) = self.registry.classify(error) {
            if template.auto_fixable {
                self.stats.auto_fixable_errors.fetch_add(1, Ordering::Relaxed);
            }

            match template.strategy.attempt(error, content, ctx) {
                FixOutcome::Fixed {
                    fix,
                    description,
                    changes,
                } => {
                    info!(
                        "Deterministic fix '{}' applied for {}:{}",
                        template.name,
                        error.file.display(),
                        error.line
                    );
                    self.stats.successful_fixes.fetch_add(1, Ordering::Relaxed);

                    return FixResult {
                        id,
                        success: true,
                        fix_type: template.name.to_string(),
                        fix: Some(fix),
                        description: Some(description),
                        explanation: None,
                        confidence: template.confidence,
                        auto_fixable: template.auto_fixable,
                        changes,
                        warnings: Vec::new(),
                        reason: None,
                        raw_response: None,
                        metadata: None,
                    };
                }
                FixOutcome::Declined { reason } => {
                    debug!(
                        "Template '{}' declined ({}); falling back to AI",
                        template.name, reason
                    );
                }
            }
        } else {
            debug!(
                "No template for {} error '{}'; falling back to AI",
                error.category.as_str(),
                error.message
            );
        }

        match self.ai.generate(error, content, ctx).await {
            AiAttempt::Success(ai_fix) => {
                info!(
                    "AI fix generated for {}:{} (confidence {:.2})",
                    error.file.display(),
                    error.line,
                    ai_fix.confidence
                );
                self.stats.successful_fixes.fetch_add(1, Ordering::Relaxed);

                FixResult {
                    id,
                    success: true,
                    fix_type: "ai".to_string(),
                    fix: Some(ai_fix.fix),
                    description: None,
                    explanation: Some(ai_fix.explanation),
                    confidence: ai_fix.confidence,
                    auto_fixable: false,
                    changes: ai_fix.changes,
                    warnings: ai_fix.warnings,
                    reason: None,
                    raw_response: None,
                    metadata: Some(ai_fix.metadata),
                }
            }
            AiAttempt::Failure {
                reason,
                raw_response,
            } => {
                self.stats.failed_fixes.fetch_add(1, Ordering::Relaxed);

                let mut result = FixResult::failure(id, "ai", reason);
                result.raw_response = raw_response;
                result
            }
        }
    }

    /// Read-only stats snapshot; safe to poll while fixes are in flight.
    pub fn stats(&self) -> FixStatsSnapshot {
        let total = self.stats.total_fixes.load(Ordering::Relaxed);
        let successful = self.stats.successful_fixes.load(Ordering::Relaxed);

        FixStatsSnapshot {
            total_fixes: total,
            successful_fixes: successful,
            failed_fixes: self.stats.failed_fixes.load(Ordering::Relaxed),
            auto_fixable_errors: self.stats.auto_fixable_errors.load(Ordering::Relaxed),
            success_rate: if total == 0 {
                0.0
            } else {
                successful as f64 / total as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{ErrorCategory, Severity};
    use crate::error::MendError;
    use crate::error::Result;
    use crate::providers::{CompletionRequest, CompletionResponse, ProviderInfo};
    use async_trait::async_trait;
    use std::path::PathBuf;

    struct StubProvider {
        response: Option<String>,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn info(&self) -> ProviderInfo {
            ProviderInfo {
                name: "stub".to_string(),
                display_name: "Stub".to_string(),
                default_model: "stub-model".to_string(),
                available_models: vec![],
            }
        }

        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            match &self.response {
                Some(content) => Ok(CompletionResponse {
                    id: "stub".to_string(),
                    model: request.model,
                    content: content.clone(),
                    finish_reason: None,
                    usage: None,
                }),
                None => Err(MendError::ApiRequest("500 internal error".to_string())),
            }
        }

        fn is_authenticated(&self) -> bool {
            true
        }
    }

    fn engine_with(response: Option<&str>) -> FixEngine {
        let provider = Arc::new(StubProvider {
            response: response.map(str::to_string),
        });
        let config = EngineConfig {
            model_timeout_secs: 5,
            max_retries: 0,
            backoff_base_ms: 1,
            model: None,
        };
        FixEngine::new(provider, "stub-model".to_string(), &config)
    }

    fn error(category: ErrorCategory, message: &str, line: usize) -> ClassifiedError {
        ClassifiedError {
            category,
            message: message.to_string(),
            file: PathBuf::from("src/app.js"),
            line,
            severity: Severity::Error,
        }
    }

    #[tokio::test]
    async fn test_deterministic_path_wins() {
        let engine = engine_with(None); // provider would fail if reached
        let err = error(ErrorCategory::Syntax, "missing semicolon", 1);

        let result = engine
            .generate_fix(&err, "const x = 5\n", &FixContext::default())
            .await;

        assert!(result.success);
        assert_eq!(result.fix_type, "missing_semicolon");
        assert_eq!(result.fix.as_deref(), Some("const x = 5;\n"));
        assert_eq!(result.confidence, 0.9);
        assert!(result.auto_fixable);
        assert!(result.id.starts_with("fix_"));

        let stats = engine.stats();
        assert_eq!(stats.total_fixes, 1);
        assert_eq!(stats.successful_fixes, 1);
        assert_eq!(stats.auto_fixable_errors, 1);
        assert_eq!(stats.success_rate, 1.0);
    }

    #[tokio::test]
    async fn test_decline_falls_through_to_ai() {
        let response = r#"{"fix": "typed\n", "explanation": "cast added"}"#;
        let engine = engine_with(Some(response));
        // Type templates always decline.
        let err = error(
            ErrorCategory::Type,
            "Type 'string' is not assignable to type 'number'",
            1,
        );

        let result = engine
            .generate_fix(&err, "let x: number = 'y';\n", &FixContext::default())
            .await;

        assert!(result.success);
        assert_eq!(result.fix_type, "ai");
        assert_eq!(result.explanation.as_deref(), Some("cast added"));
        assert_eq!(result.confidence, 0.7);
        assert!(result.metadata.is_some());
    }

    #[tokio::test]
    async fn test_no_template_goes_to_ai() {
        let response = r#"{"fix": "fixed\n", "explanation": "done", "confidence": 0.8}"#;
        let engine = engine_with(Some(response));
        let err = error(ErrorCategory::Scope, "something entirely unrecognized", 1);

        let result = engine.generate_fix(&err, "x\n", &FixContext::default()).await;
        assert!(result.success);
        assert_eq!(result.fix_type, "ai");
    }

    #[tokio::test]
    async fn test_ai_failure_surfaces_as_failed_result() {
        let engine = engine_with(None);
        let err = error(ErrorCategory::Scope, "'x' is not defined", 1);

        let result = engine.generate_fix(&err, "x\n", &FixContext::default()).await;

        assert!(!result.success);
        assert_eq!(result.fix_type, "ai");
        assert_eq!(result.confidence, 0.0);
        assert!(result.reason.is_some());

        let stats = engine.stats();
        assert_eq!(stats.total_fixes, 1);
        assert_eq!(stats.failed_fixes, 1);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_counters_once_per_request_across_mixed_outcomes() {
        let response = r#"{"fix": "ok\n", "explanation": "done"}"#;
        let engine = engine_with(Some(response));

        // Deterministic success.
        engine
            .generate_fix(
                &error(ErrorCategory::Syntax, "missing semicolon", 1),
                "const x = 5\n",
                &FixContext::default(),
            )
            .await;
        // Decline -> AI success (counts once, as successful).
        engine
            .generate_fix(
                &error(ErrorCategory::Type, "type mismatch found", 1),
                "x\n",
                &FixContext::default(),
            )
            .await;
        // Malformed AI payload -> failure.
        let bad_engine = engine_with(Some("not json"));
        bad_engine
            .generate_fix(
                &error(ErrorCategory::Scope, "'y' is not defined", 1),
                "y\n",
                &FixContext::default(),
            )
            .await;

        let stats = engine.stats();
        assert_eq!(stats.total_fixes, 2);
        assert_eq!(stats.successful_fixes, 2);
        assert_eq!(stats.failed_fixes, 0);

        let bad_stats = bad_engine.stats();
        assert_eq!(bad_stats.total_fixes, 1);
        assert_eq!(bad_stats.failed_fixes, 1);
    }

    #[tokio::test]
    async fn test_malformed_ai_payload_keeps_raw_response() {
        let engine = engine_with(Some("not json at all"));
        let err = error(ErrorCategory::Scope, "'x' is not defined", 1);

        let result = engine.generate_fix(&err, "x\n", &FixContext::default()).await;
        assert!(!result.success);
        assert_eq!(result.raw_response.as_deref(), Some("not json at all"));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_engine() {
        let response = r#"{"fix": "ok\n", "explanation": "done"}"#;
        let engine = Arc::new(engine_with(Some(response)));

        let mut set = tokio::task::JoinSet::new();
        for i in 0..8 {
            let engine = engine.clone();
            set.spawn(async move {
                let err = error(ErrorCategory::Scope, "'z' is not defined", 1);
                engine
                    .generate_fix(&err, &format!("line {}\n", i), &FixContext::default())
                    .await
            });
        }

        let mut successes = 0;
        while let Some(result) = set.join_next().await {
            if result.unwrap().success {
                successes += 1;
            }
        }

        assert_eq!(successes, 8);
        assert_eq!(engine.stats().total_fixes, 8);
        assert_eq!(engine.stats().successful_fixes, 8);
    }
}
