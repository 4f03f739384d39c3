//! Prompt assembly for the AI fix path
//!
//! Pure string building: the prompt carries the diagnostic, the full file,
//! whatever project context is available, and strict response-format
//! instructions so the parser has a fighting chance.

use crate::diagnostic::{ClassifiedError, FixContext};

/// Related files included verbatim, at most.
const MAX_RELATED_FILES: usize = 3;

/// Dependency names listed in the project-context block, at most.
const MAX_DEPENDENCIES: usize = 10;

/// Build the fix-generation prompt for a diagnostic.
pub fn build_fix_prompt(error: &ClassifiedError, content: &str, ctx: &FixContext) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are fixing a code error in an automated repair pipeline.\n\n");

    prompt.push_str("## Error\n");
    prompt.push_str(&format!("File: {}\n", error.file.display()));
    prompt.push_str(&format!("Line: {}\n", error.line));
    prompt.push_str(&format!("Category: {}\n", error.category.as_str()));
    prompt.push_str(&format!("Severity: {:?}\n", error.severity));
    prompt.push_str(&format!("Message: {}\n", error.message));

    prompt.push_str("\n## Current file content\n");
    prompt.push_str("```\n");
    prompt.push_str(content);
    if !content.ends_with('\n') {
        prompt.push('\n');
    }
    prompt.push_str("```\n");

    prompt.push_str("\n## Project context\n");
    push_project_context(&mut prompt, ctx);

    if !ctx.related_files.is_empty() {
        prompt.push_str("\n## Related files\n");
        for related in ctx.related_files.iter().take(MAX_RELATED_FILES) {
            prompt.push_str(&format!("--- {} ---\n", related.path.display()));
            prompt.push_str(&related.content);
            if !related.content.ends_with('\n') {
                prompt.push('\n');
            }
        }
    }

    prompt.push_str("\n## Instructions\n");
    prompt.push_str(
        "Respond with ONLY a JSON object, no prose and no markdown outside it, containing:\n\
         - \"fix\": the complete corrected file content as a string\n\
         - \"explanation\": a brief explanation of the fix\n\
         - \"confidence\": a number between 0 and 1\n\
         - \"changes\": an array of {\"file\", \"type\", \"line\", \"oldCode\", \"newCode\"}\n\
           where \"type\" is one of insert, delete, replace, modify, cleanup\n\
         - \"warnings\": an array of strings for anything the caller should review\n\
         Change only what is needed to fix the error; leave unrelated code untouched.\n",
    );

    prompt
}

fn push_project_context(prompt: &mut String, ctx: &FixContext) {
    let Some(project) = ctx.project.as_ref() else {
        prompt.push_str("No project context available.\n");
        return;
    };

    let mut wrote_any = false;

    if let Some(framework) = &project.framework {
        prompt.push_str(&format!("Framework: {}\n", framework));
        wrote_any = true;
    }
    if let Some(language) = &project.language {
        prompt.push_str(&format!("Language: {}\n", language));
        wrote_any = true;
    }
    if let Some(runtime) = &project.runtime_version {
        prompt.push_str(&format!("Runtime: {}\n", runtime));
        wrote_any = true;
    }
    if !project.dependencies.is_empty() {
        let deps: Vec<&str> = project
            .dependencies
            .iter()
            .take(MAX_DEPENDENCIES)
            .map(String::as_str)
            .collect();
        prompt.push_str(&format!("Dependencies: {}\n", deps.join(", ")));
        wrote_any = true;
    }
    if let Some(conventions) = &project.conventions {
        prompt.push_str(&format!("Conventions: {}\n", conventions));
        wrote_any = true;
    }

    if !wrote_any {
        prompt.push_str("No project context available.\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{ErrorCategory, ProjectInfo, RelatedFile, Severity};
    use std::path::PathBuf;

    fn sample_error() -> ClassifiedError {
        ClassifiedError {
            category: ErrorCategory::Type,
            message: "Type 'string' is not assignable to type 'number'".to_string(),
            file: PathBuf::from("src/app.ts"),
            line: 12,
            severity: Severity::Error,
        }
    }

    #[test]
    fn test_prompt_contains_stable_sections() {
        let prompt = build_fix_prompt(&sample_error(), "let x = 1;\n", &FixContext::default());

        assert!(prompt.contains("## Error"));
        assert!(prompt.contains("File: src/app.ts"));
        assert!(prompt.contains("Line: 12"));
        assert!(prompt.contains("Category: type"));
        assert!(prompt.contains("## Current file content"));
        assert!(prompt.contains("```\nlet x = 1;\n```"));
        assert!(prompt.contains("## Instructions"));
        assert!(prompt.contains("\"fix\""));
        assert!(prompt.contains("\"warnings\""));
    }

    #[test]
    fn test_prompt_no_context_fallback() {
        let prompt = build_fix_prompt(&sample_error(), "x\n", &FixContext::default());
        assert!(prompt.contains("No project context available."));

        // An empty ProjectInfo also falls back.
        let ctx = FixContext {
            related_files: Vec::new(),
            project: Some(ProjectInfo::default()),
        };
        let prompt = build_fix_prompt(&sample_error(), "x\n", &ctx);
        assert!(prompt.contains("No project context available."));
    }

    #[test]
    fn test_prompt_dependency_cap() {
        let ctx = FixContext {
            related_files: Vec::new(),
            project: Some(ProjectInfo {
                framework: Some("react".to_string()),
                dependencies: (0..20).map(|i| format!("dep{}", i)).collect(),
                ..Default::default()
            }),
        };
        let prompt = build_fix_prompt(&sample_error(), "x\n", &ctx);
        assert!(prompt.contains("Framework: react"));
        assert!(prompt.contains("dep9"));
        assert!(!prompt.contains("dep10"));
    }

    #[test]
    fn test_prompt_related_files_capped_at_three() {
        let ctx = FixContext {
            related_files: (0..5)
                .map(|i| RelatedFile {
                    path: PathBuf::from(format!("src/mod{}.ts", i)),
                    content: format!("// module {}\n", i),
                })
                .collect(),
            project: None,
        };
        let prompt = build_fix_prompt(&sample_error(), "x\n", &ctx);
        assert!(prompt.contains("src/mod2.ts"));
        assert!(!prompt.contains("src/mod3.ts"));
    }
}
