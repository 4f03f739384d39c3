//! AI fix path - model call orchestration and response validation
//!
//! The model is an unreliable collaborator: every call races a timeout,
//! failures retry with linear backoff, and the response is treated as
//! adversarial until its structured payload validates. Raw text is kept on
//! parse failures so an operator can diagnose what the model actually said.

use crate::config::EngineConfig;
use crate::diagnostic::{ClassifiedError, FixContext};
use crate::error::{MendError, Result};
use crate::fixer::prompt::build_fix_prompt;
use crate::fixer::{clamp_confidence, Change, ChangeKind, Complexity, FixMetadata};
use crate::providers::{CompletionRequest, Message, Provider, Role};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Confidence assumed when the model omits or mangles the field.
const DEFAULT_CONFIDENCE: f32 = 0.7;

const SYSTEM_PROMPT: &str = "You are an expert software engineer generating automated \
    code fixes. You respond only with the requested JSON object.";

/// A validated fix produced by the model.
#[derive(Debug, Clone)]
pub struct AiFix {
    pub fix: String,
    pub explanation: String,
    pub confidence: f32,
    pub changes: Vec<Change>,
    pub warnings: Vec<String>,
    pub metadata: FixMetadata,
}

/// Outcome of one AI fix attempt, after retries and validation.
#[derive(Debug, Clone)]
pub enum AiAttempt {
    Success(AiFix),
    Failure {
        reason: String,
        raw_response: Option<String>,
    },
}

pub struct AiFixGenerator {
    provider: Arc<dyn Provider + Send + Sync>,
    model: String,
    timeout: Duration,
    max_retries: u32,
    backoff_base: Duration,
}

impl AiFixGenerator {
    pub fn new(
        provider: Arc<dyn Provider + Send + Sync>,
        model: String,
        config: &EngineConfig,
    ) -> Self {
        Self {
            provider,
            model,
            timeout: Duration::from_secs(config.model_timeout_secs),
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        }
    }

    /// Run the full AI path: prompt, call with retries, parse and validate.
    pub async fn generate(
        &self,
        error: &ClassifiedError,
        content: &str,
        ctx: &FixContext,
    ) -> AiAttempt {
        let prompt = build_fix_prompt(error, content, ctx);

        let raw = match self.call_model(&prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                return AiAttempt::Failure {
                    reason: err.to_string(),
                    raw_response: None,
                }
            }
        };

        self.parse_response(&raw, error)
    }

    /// Call the model, racing each attempt against the timeout.
    ///
    /// Attempt N (0-based) that fails waits `base * (N + 1)` before the next
    /// try; the final failure propagates to the caller untouched.
    async fn call_model(&self, prompt: &str) -> Result<String> {
        let mut retry_count: u32 = 0;

        loop {
            let request = CompletionRequest {
                model: self.model.clone(),
                messages: vec![
                    Message {
                        role: Role::System,
                        content: SYSTEM_PROMPT.to_string(),
                    },
                    Message {
                        role: Role::User,
                        content: prompt.to_string(),
                    },
                ],
                temperature: Some(0.2),
                max_tokens: Some(4096),
            };

            let attempt = match tokio::time::timeout(self.timeout, self.provider.complete(request))
                .await
            {
                Ok(result) => result.map(|response| response.content),
                Err(_) => Err(MendError::ModelTimeout(self.timeout.as_secs())),
            };

            match attempt {
                Ok(raw) => return Ok(raw),
                Err(err) => {
                    if retry_count >= self.max_retries {
                        return Err(err);
                    }
                    let delay = self.backoff_base * (retry_count + 1);
                    warn!(
                        "Model call failed ({}), retry {}/{} in {:?}",
                        err,
                        retry_count + 1,
                        self.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    retry_count += 1;
                }
            }
        }
    }

    /// Validate the raw model output into an `AiAttempt`.
    pub fn parse_response(&self, raw: &str, error: &ClassifiedError) -> AiAttempt {
        let payload = strip_code_fence(raw);

        let value: serde_json::Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(err) => {
                return AiAttempt::Failure {
                    reason: format!("Failed to parse model response: {}", err),
                    raw_response: Some(raw.to_string()),
                }
            }
        };

        let Some(fix) = value.get("fix").and_then(|v| v.as_str()) else {
            return AiAttempt::Failure {
                reason: "Model response missing required field 'fix'".to_string(),
                raw_response: Some(raw.to_string()),
            };
        };
        let Some(explanation) = value.get("explanation").and_then(|v| v.as_str()) else {
            return AiAttempt::Failure {
                reason: "Model response missing required field 'explanation'".to_string(),
                raw_response: Some(raw.to_string()),
            };
        };

        let confidence = match value.get("confidence").and_then(|v| v.as_f64()) {
            Some(n) => clamp_confidence(n as f32),
            None => DEFAULT_CONFIDENCE,
        };

        let changes: Vec<Change> = value
            .get("changes")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        let warnings: Vec<String> = value
            .get("warnings")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let complexity = assess_complexity(&changes);
        debug!(
            "Parsed AI fix: confidence {:.2}, {} change(s), {:?}",
            confidence,
            changes.len(),
            complexity
        );

        AiAttempt::Success(AiFix {
            fix: fix.to_string(),
            explanation: explanation.to_string(),
            confidence,
            changes,
            warnings,
            metadata: FixMetadata {
                ai_generated: true,
                model: self.model.clone(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                error_category: error.category.as_str().to_string(),
                complexity,
            },
        })
    }
}

/// Take the content between the first and second fence markers, if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(first) = trimmed.find("```") else {
        return trimmed;
    };
    // Skip the fence line itself (```json etc.).
    let after_fence = &trimmed[first + 3..];
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Advisory structural-size score for a proposed fix.
///
/// Inserts and deletes weigh 1, replaces 2; any replacement text spanning
/// more than 3 lines adds 2, and multi-change fixes add the change count
/// again. Thresholds: <=2 simple, <=5 medium, else complex.
fn assess_complexity(changes: &[Change]) -> Complexity {
    let mut score = 0usize;

    for change in changes {
        match change.kind {
            ChangeKind::Insert | ChangeKind::Delete => score += 1,
            ChangeKind::Replace => score += 2,
            ChangeKind::Modify | ChangeKind::Cleanup => {}
        }
        if let Some(new_code) = &change.new_code {
            if new_code.lines().count() > 3 {
                score += 2;
            }
        }
    }

    if changes.len() > 1 {
        score += changes.len();
    }

    match score {
        0..=2 => Complexity::Simple,
        3..=5 => Complexity::Medium,
        _ => Complexity::Complex,
    }
}
