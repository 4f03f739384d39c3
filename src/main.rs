mod config;
mod diagnostic;
mod error;
mod fixer;
mod providers;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use config::{ConfigManager, ProviderConfig, ProviderType};
use diagnostic::{discover_related_files, ClassifiedError, ErrorCategory, FixContext, Severity};
use dialoguer::Confirm;
use fixer::{FixEngine, FixResult};
use providers::create_provider;
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser)]
#[command(name = "mend", version, about = "Mend - automated source-code repair engine")]
struct Cli {
    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate (and optionally apply) a fix for one diagnostic
    Fix {
        /// File the diagnostic points at
        file: PathBuf,
        /// 1-based line number
        #[arg(short, long)]
        line: usize,
        /// Error category: syntax, type, import, unused, scope, style, react
        #[arg(short, long)]
        category: String,
        /// The diagnostic message
        #[arg(short, long)]
        message: String,
        /// Severity: info, warning, error, critical
        #[arg(short, long, default_value = "error")]
        severity: String,
        /// Write the fix back to the file (after a .bak backup)
        #[arg(long)]
        apply: bool,
        /// Skip the confirmation prompt when applying
        #[arg(short, long)]
        yes: bool,
        /// Provider name from config (defaults to the configured default)
        #[arg(long)]
        provider: Option<String>,
        /// Model ID override
        #[arg(long)]
        model: Option<String>,
    },
    /// Fix a batch of diagnostics from a JSON file, concurrently
    Batch {
        /// Path to a JSON array of diagnostics
        input: PathBuf,
        /// Provider name from config
        #[arg(long)]
        provider: Option<String>,
        /// Model ID override
        #[arg(long)]
        model: Option<String>,
    },
    /// List configured and available providers
    Providers,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show system info (version, platform)
    Info,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the config file path and current contents
    Show,
    /// Set a provider's API key
    SetApiKey {
        /// Provider name (openrouter, anthropic)
        provider: String,
        /// API key value
        key: String,
    },
    /// Set the default provider
    SetDefault {
        /// Provider name
        provider: String,
    },
}

/// JSON envelope for non-interactive output
fn json_output(success: bool, data: serde_json::Value, error: Option<&str>) -> String {
    serde_json::json!({
        "success": success,
        "data": data,
        "error": error,
    })
    .to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check for --json flag before initializing logging
    let json_mode = std::env::args().any(|arg| arg == "--json");

    // Initialize structured logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mend=info"));

    if json_mode {
        // In JSON mode: send logs to stderr with no ANSI colors
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    } else if std::env::var("MEND_LOG_JSON").is_ok() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .compact()
            .init();
    }

    let cli = Cli::parse();
    run_command(cli.command, cli.json).await
}

// ============================================================================
// Command Runner
// ============================================================================

async fn run_command(command: Commands, json_mode: bool) -> Result<()> {
    match command {
        Commands::Info => {
            let version = env!("CARGO_PKG_VERSION");
            let platform = std::env::consts::OS;
            if json_mode {
                println!(
                    "{}",
                    json_output(
                        true,
                        serde_json::json!({
                            "version": version,
                            "platform": platform,
                            "name": "mend",
                        }),
                        None
                    )
                );
            } else {
                println!("Mend v{}", version);
                println!("Platform: {}", platform);
            }
        }
        Commands::Providers => {
            let manager = ConfigManager::new()?;
            let configured = manager.list_providers();
            if json_mode {
                let names: Vec<&String> = configured;
                println!(
                    "{}",
                    json_output(true, serde_json::json!({ "configured": names }), None)
                );
            } else {
                println!("Configured providers:");
                for name in configured {
                    println!("  {}", name);
                }
                println!("\nAvailable provider types:");
                for info in providers::list_available_providers() {
                    println!(
                        "  {} ({}) - default model {}",
                        info.name, info.display_name, info.default_model
                    );
                    for model in &info.available_models {
                        println!("    {}", model);
                    }
                }
            }
        }
        Commands::Config { action } => run_config(action, json_mode)?,
        Commands::Fix {
            file,
            line,
            category,
            message,
            severity,
            apply,
            yes,
            provider,
            model,
        } => {
            let error = ClassifiedError {
                category: parse_category(&category)?,
                message,
                file: file.clone(),
                line,
                severity: parse_severity(&severity)?,
            };

            let content = std::fs::read_to_string(&file)?;
            let ctx = FixContext {
                related_files: discover_related_files(&file, 3),
                project: None,
            };

            let engine = build_engine(provider.as_deref(), model)?;
            let result = engine.generate_fix(&error, &content, &ctx).await;

            if json_mode {
                println!(
                    "{}",
                    json_output(
                        result.success,
                        serde_json::to_value(&result)?,
                        result.reason.as_deref()
                    )
                );
            } else {
                print_result(&result);
            }

            if result.success && apply {
                if let Some(fix) = &result.fix {
                    let confirmed = yes
                        || json_mode
                        || Confirm::new()
                            .with_prompt(format!("Apply fix to {}?", file.display()))
                            .default(false)
                            .interact()
                            .map_err(|e| anyhow!("confirmation failed: {}", e))?;

                    if confirmed {
                        let backup = file.with_extension(backup_extension(&file));
                        std::fs::copy(&file, &backup)?;
                        std::fs::write(&file, fix)?;
                        if !json_mode {
                            println!("Applied; backup at {}", backup.display());
                        }
                    }
                }
            }

            if !result.success {
                std::process::exit(1);
            }
        }
        Commands::Batch {
            input,
            provider,
            model,
        } => {
            let raw = std::fs::read_to_string(&input)?;
            let diagnostics: Vec<ClassifiedError> = serde_json::from_str(&raw)?;

            let engine = Arc::new(build_engine(provider.as_deref(), model)?);

            let mut set = tokio::task::JoinSet::new();
            for error in diagnostics {
                let engine = engine.clone();
                set.spawn(async move {
                    let content = match std::fs::read_to_string(&error.file) {
                        Ok(content) => content,
                        Err(e) => {
                            return FixResult::failure(
                                format!("fix_{}", uuid::Uuid::new_v4()),
                                "io",
                                format!("Could not read {}: {}", error.file.display(), e),
                            )
                        }
                    };
                    let ctx = FixContext {
                        related_files: discover_related_files(&error.file, 3),
                        project: None,
                    };
                    engine.generate_fix(&error, &content, &ctx).await
                });
            }

            let mut results = Vec::new();
            while let Some(joined) = set.join_next().await {
                results.push(joined?);
            }

            let stats = engine.stats();
            if json_mode {
                println!(
                    "{}",
                    json_output(
                        true,
                        serde_json::json!({
                            "results": results,
                            "stats": stats,
                        }),
                        None
                    )
                );
            } else {
                for result in &results {
                    print_result(result);
                    println!();
                }
                println!(
                    "{} total, {} fixed, {} failed ({:.0}% success)",
                    stats.total_fixes,
                    stats.successful_fixes,
                    stats.failed_fixes,
                    stats.success_rate * 100.0
                );
            }
        }
    }

    Ok(())
}

fn run_config(action: ConfigAction, json_mode: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let manager = ConfigManager::new()?;
            let path = manager.get_config_path()?;
            if json_mode {
                println!(
                    "{}",
                    json_output(
                        true,
                        serde_json::json!({
                            "path": path,
                            "config": serde_json::to_value(manager.get())?,
                        }),
                        None
                    )
                );
            } else {
                println!("Config: {}", path.display());
                println!("{}", toml::to_string_pretty(manager.get())?);
            }
        }
        ConfigAction::SetApiKey { provider, key } => {
            let mut manager = ConfigManager::new()?;
            let provider_type = parse_provider_type(&provider)?;
            let entry = manager
                .get_mut()
                .providers
                .entry(provider.clone())
                .or_insert_with(|| ProviderConfig {
                    provider_type,
                    api_key: None,
                    base_url: None,
                    default_model: None,
                });
            entry.api_key = Some(key);
            manager.save()?;
            if !json_mode {
                println!("API key set for {}", provider);
            }
        }
        ConfigAction::SetDefault { provider } => {
            let mut manager = ConfigManager::new()?;
            if manager.get_provider(&provider).is_none() {
                return Err(anyhow!("provider '{}' is not configured", provider));
            }
            manager.get_mut().default_provider = Some(provider.clone());
            manager.save()?;
            if !json_mode {
                println!("Default provider set to {}", provider);
            }
        }
    }
    Ok(())
}

fn build_engine(provider_name: Option<&str>, model_override: Option<String>) -> Result<FixEngine> {
    let manager = ConfigManager::new()?;
    let config = manager.get();

    let name = provider_name
        .map(str::to_string)
        .or_else(|| config.default_provider.clone())
        .ok_or_else(|| anyhow!("no provider given and no default_provider configured"))?;

    let provider_config = manager
        .get_provider(&name)
        .ok_or_else(|| error::MendError::ProviderNotConfigured(name.clone()))?;

    let provider = create_provider(&provider_config.provider_type, provider_config)?;

    let model = model_override
        .or_else(|| config.engine.model.clone())
        .or_else(|| provider_config.default_model.clone())
        .unwrap_or_else(|| provider.info().default_model);

    Ok(FixEngine::new(provider, model, &config.engine))
}

fn print_result(result: &FixResult) {
    if result.success {
        println!(
            "[{}] fixed (confidence {:.2}{})",
            result.fix_type,
            result.confidence,
            if result.auto_fixable {
                ", auto-fixable"
            } else {
                ""
            }
        );
        if let Some(description) = &result.description {
            println!("  {}", description);
        }
        if let Some(explanation) = &result.explanation {
            println!("  {}", explanation);
        }
        for change in &result.changes {
            match change.line {
                Some(line) => println!("  - {:?} at line {}", change.kind, line),
                None => println!("  - {:?}", change.kind),
            }
        }
        for warning in &result.warnings {
            println!("  warning: {}", warning);
        }
    } else {
        println!(
            "[{}] no fix: {}",
            result.fix_type,
            result.reason.as_deref().unwrap_or("unknown reason")
        );
    }
}

fn parse_category(value: &str) -> Result<ErrorCategory> {
    match value.to_lowercase().as_str() {
        "syntax" => Ok(ErrorCategory::Syntax),
        "type" => Ok(ErrorCategory::Type),
        "import" => Ok(ErrorCategory::Import),
        "unused" => Ok(ErrorCategory::Unused),
        "scope" => Ok(ErrorCategory::Scope),
        "style" => Ok(ErrorCategory::Style),
        "react" => Ok(ErrorCategory::React),
        other => Err(anyhow!("unknown error category '{}'", other)),
    }
}

fn parse_severity(value: &str) -> Result<Severity> {
    match value.to_lowercase().as_str() {
        "info" => Ok(Severity::Info),
        "warning" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        "critical" => Ok(Severity::Critical),
        other => Err(anyhow!("unknown severity '{}'", other)),
    }
}

fn parse_provider_type(value: &str) -> Result<ProviderType> {
    match value.to_lowercase().as_str() {
        "openrouter" => Ok(ProviderType::Openrouter),
        "anthropic" => Ok(ProviderType::Anthropic),
        other => Err(anyhow!("unknown provider type '{}'", other)),
    }
}

fn backup_extension(file: &PathBuf) -> String {
    match file.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.bak", ext),
        None => "bak".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("Syntax").unwrap(), ErrorCategory::Syntax);
        assert_eq!(parse_category("react").unwrap(), ErrorCategory::React);
        assert!(parse_category("nonsense").is_err());
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("warning").unwrap(), Severity::Warning);
        assert!(parse_severity("fatal").is_err());
    }

    #[test]
    fn test_backup_extension() {
        assert_eq!(backup_extension(&PathBuf::from("a/b.js")), "js.bak");
        assert_eq!(backup_extension(&PathBuf::from("Makefile")), "bak");
    }
}
