//! Deterministic fix strategies - line-level text transforms
//!
//! Each strategy either returns the entire new file text or declines. These
//! are string heuristics by design: they match message phrasings and scan
//! raw lines, with no parser behind them. Anything needing semantic or type
//! information declines so the AI path can handle it.

use crate::diagnostic::{ClassifiedError, FixContext};
use crate::fixer::{Change, ChangeKind, FixOutcome, FixStrategy};
use once_cell::sync::Lazy;
use regex::Regex;

static CONTROL_FLOW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(return|throw|break|continue)\b").unwrap());

static TERMINATOR_STMT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(return|throw|break)\b").unwrap());

/// Message phrasings an identifier can be extracted from, tried in order.
static IDENTIFIER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"'([A-Za-z_$][A-Za-z0-9_$]*)'").unwrap(),
        Regex::new(r"`([A-Za-z_$][A-Za-z0-9_$]*)`").unwrap(),
        Regex::new(r#""([A-Za-z_$][A-Za-z0-9_$]*)""#).unwrap(),
        Regex::new(r"(?:variable|import|identifier)\s+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap(),
    ]
});

fn extract_identifier(message: &str) -> Option<String> {
    IDENTIFIER_RES
        .iter()
        .find_map(|re| re.captures(message))
        .map(|caps| caps[1].to_string())
}

/// Reassemble lines into full file text, preserving the trailing newline.
fn rebuild(lines: &[String], had_trailing_newline: bool) -> String {
    let mut text = lines.join("\n");
    if had_trailing_newline {
        text.push('\n');
    }
    text
}

/// 0-based index of the error line, or a decline when out of range.
fn error_line_index(error: &ClassifiedError, line_count: usize) -> Result<usize, FixOutcome> {
    if error.line == 0 || error.line > line_count {
        return Err(FixOutcome::declined(format!(
            "Error line {} is outside the file ({} lines)",
            error.line, line_count
        )));
    }
    Ok(error.line - 1)
}

/// Appends a statement terminator to the error line.
///
/// Declines when the trimmed line already ends in a terminator, brace, or
/// comma, is a comment start, or carries a control-flow keyword - those are
/// presumed well-formed or terminator-free.
pub struct MissingTerminatorFixer;

impl FixStrategy for MissingTerminatorFixer {
    fn attempt(&self, error: &ClassifiedError, content: &str, _ctx: &FixContext) -> FixOutcome {
        let had_newline = content.ends_with('\n');
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

        let idx = match error_line_index(error, lines.len()) {
            Ok(idx) => idx,
            Err(decline) => return decline,
        };

        let trimmed = lines[idx].trim();
        if trimmed.is_empty() {
            return FixOutcome::declined("Error line is blank; no statement to terminate");
        }
        if trimmed.ends_with(';')
            || trimmed.ends_with('{')
            || trimmed.ends_with('}')
            || trimmed.ends_with(',')
        {
            return FixOutcome::declined("Line already ends in a terminator or delimiter");
        }
        if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
            return FixOutcome::declined("Line is a comment; no terminator needed");
        }
        if CONTROL_FLOW_RE.is_match(trimmed) {
            return FixOutcome::declined(
                "Line contains a control-flow keyword; not appending a terminator",
            );
        }

        let old_line = lines[idx].clone();
        let column = old_line.len() + 1;
        lines[idx] = format!("{};", old_line);

        FixOutcome::Fixed {
            fix: rebuild(&lines, had_newline),
            description: format!("Added missing semicolon at line {}", error.line),
            changes: vec![Change::new(ChangeKind::Insert)
                .at_line(error.line)
                .at_column(column)
                .with_text(";")
                .with_old_code(old_line)
                .with_new_code(lines[idx].clone())],
        }
    }
}

/// Repairs a single unbalanced `{}` pair.
///
/// One forward scan counts `{ } ( ) [ ]`. The first line where the running
/// brace counter goes negative gets an opening brace inserted just before
/// it; a positive final counter appends a closing brace at end of file.
/// Braces inside string literals and comments are counted too - this is a
/// documented limitation of the heuristic, not a bug.
pub struct BracketBalanceFixer;

impl FixStrategy for BracketBalanceFixer {
    fn attempt(&self, _error: &ClassifiedError, content: &str, _ctx: &FixContext) -> FixOutcome {
        let had_newline = content.ends_with('\n');
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

        let mut braces: i32 = 0;
        let mut parens: i32 = 0;
        let mut brackets: i32 = 0;
        let mut negative_at: Option<usize> = None;

        'scan: for (i, line) in lines.iter().enumerate() {
            for ch in line.chars() {
                match ch {
                    '{' => braces += 1,
                    '}' => braces -= 1,
                    '(' => parens += 1,
                    ')' => parens -= 1,
                    '[' => brackets += 1,
                    ']' => brackets -= 1,
                    _ => {}
                }
                if braces < 0 {
                    negative_at = Some(i);
                    break 'scan;
                }
            }
        }

        if let Some(i) = negative_at {
            let indent: String = lines[i]
                .chars()
                .take_while(|c| c.is_whitespace())
                .collect();
            lines.insert(i, format!("{}{{", indent));

            return FixOutcome::Fixed {
                fix: rebuild(&lines, had_newline),
                description: format!("Inserted missing opening brace before line {}", i + 1),
                changes: vec![Change::new(ChangeKind::Insert)
                    .at_line(i + 1)
                    .with_text("{")],
            };
        }

        if braces > 0 {
            let line = lines.len() + 1;
            lines.push("}".to_string());

            return FixOutcome::Fixed {
                fix: rebuild(&lines, had_newline),
                description: "Appended missing closing brace at end of file".to_string(),
                changes: vec![Change::new(ChangeKind::Insert).at_line(line).with_text("}")],
            };
        }

        if parens != 0 || brackets != 0 {
            return FixOutcome::declined(
                "Parenthesis or bracket imbalance; only brace repairs are supported",
            );
        }

        FixOutcome::declined("Braces appear balanced; nothing to fix")
    }
}

/// Deletes the declaration line of an unused variable.
///
/// Looks at the error line first, then a +/-3 line window. Never guesses
/// beyond the window.
pub struct UnusedVariableFixer;

impl UnusedVariableFixer {
    fn declaration_re(name: &str) -> Regex {
        let escaped = regex::escape(name);
        Regex::new(&format!(
            r"^\s*(?:(?:export\s+)?(?:const|let|var|function|fn)\s+{}\b|{}\s*[:=])",
            escaped, escaped
        ))
        .unwrap()
    }
}

impl FixStrategy for UnusedVariableFixer {
    fn attempt(&self, error: &ClassifiedError, content: &str, _ctx: &FixContext) -> FixOutcome {
        let Some(name) = extract_identifier(&error.message) else {
            return FixOutcome::declined("Could not extract variable name from message");
        };

        let had_newline = content.ends_with('\n');
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

        let idx = match error_line_index(error, lines.len()) {
            Ok(idx) => idx,
            Err(decline) => return decline,
        };

        let decl_re = Self::declaration_re(&name);

        // Error line first, then the surrounding window.
        let window_start = idx.saturating_sub(3);
        let window_end = (idx + 3).min(lines.len().saturating_sub(1));
        let candidates =
            std::iter::once(idx).chain((window_start..=window_end).filter(|&i| i != idx));

        for i in candidates {
            if decl_re.is_match(&lines[i]) {
                let removed = lines.remove(i);
                return FixOutcome::Fixed {
                    fix: rebuild(&lines, had_newline),
                    description: format!("Removed unused variable '{}' at line {}", name, i + 1),
                    changes: vec![Change::new(ChangeKind::Delete)
                        .at_line(i + 1)
                        .with_old_code(removed)],
                };
            }
        }

        FixOutcome::declined(format!(
            "Could not locate unused variable '{}' declaration",
            name
        ))
    }
}

/// Deletes the whole import line mentioning an unused name.
///
/// Limitation: a multi-binding import line is removed outright rather than
/// rewritten to drop only one binding.
pub struct UnusedImportFixer;

impl FixStrategy for UnusedImportFixer {
    fn attempt(&self, error: &ClassifiedError, content: &str, _ctx: &FixContext) -> FixOutcome {
        let Some(name) = extract_identifier(&error.message) else {
            return FixOutcome::declined("Could not extract import name from message");
        };

        let had_newline = content.ends_with('\n');
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

        let found = lines.iter().position(|line| {
            let trimmed = line.trim_start();
            (trimmed.starts_with("import ")
                || trimmed.starts_with("use ")
                || trimmed.contains("require("))
                && line.contains(&name)
        });

        match found {
            Some(i) => {
                let removed = lines.remove(i);
                FixOutcome::Fixed {
                    fix: rebuild(&lines, had_newline),
                    description: format!("Removed unused import '{}' at line {}", name, i + 1),
                    changes: vec![Change::new(ChangeKind::Delete)
                        .at_line(i + 1)
                        .with_old_code(removed)],
                }
            }
            None => FixOutcome::declined(format!(
                "Could not locate an import line mentioning '{}'",
                name
            )),
        }
    }
}

/// Deletes a span of unreachable code.
///
/// Scans forward from the error line tracking brace depth, stopping at the
/// first blank line at depth <= 0 (exclusive) or the first terminating
/// statement (inclusive); with no stop point, the span runs to end of file.
pub struct UnreachableCodeFixer;

impl FixStrategy for UnreachableCodeFixer {
    fn attempt(&self, error: &ClassifiedError, content: &str, _ctx: &FixContext) -> FixOutcome {
        let had_newline = content.ends_with('\n');
        let lines: Vec<String> = content.lines().map(str::to_string).collect();

        let start = match error_line_index(error, lines.len()) {
            Ok(idx) => idx,
            Err(decline) => return decline,
        };

        let mut depth: i32 = 0;
        let mut end = lines.len();
        for (i, line) in lines.iter().enumerate().skip(start) {
            let trimmed = line.trim();
            if i > start && trimmed.is_empty() && depth <= 0 {
                end = i;
                break;
            }
            if i > start && TERMINATOR_STMT_RE.is_match(trimmed) {
                end = i + 1;
                break;
            }
            for ch in line.chars() {
                match ch {
                    '{' => depth += 1,
                    '}' => depth -= 1,
                    _ => {}
                }
            }
        }

        let removed = lines[start..end].join("\n");
        let mut kept: Vec<String> = Vec::with_capacity(lines.len() - (end - start));
        kept.extend_from_slice(&lines[..start]);
        kept.extend_from_slice(&lines[end..]);

        FixOutcome::Fixed {
            fix: rebuild(&kept, had_newline),
            description: format!("Removed unreachable code (lines {}-{})", start + 1, end),
            changes: vec![Change::new(ChangeKind::Cleanup)
                .at_line(start + 1)
                .with_old_code(removed)],
        }
    }
}

/// Strips trailing whitespace from every line.
///
/// Idempotent: a second run finds nothing to strip and declines, which
/// callers treat as "nothing to do" rather than an error.
pub struct TrailingWhitespaceFixer;

impl FixStrategy for TrailingWhitespaceFixer {
    fn attempt(&self, _error: &ClassifiedError, content: &str, _ctx: &FixContext) -> FixOutcome {
        let had_newline = content.ends_with('\n');
        let mut changes = Vec::new();
        let mut lines: Vec<String> = Vec::new();

        for (i, line) in content.lines().enumerate() {
            let stripped = line.trim_end();
            if stripped.len() != line.len() {
                changes.push(
                    Change::new(ChangeKind::Cleanup)
                        .at_line(i + 1)
                        .with_old_code(line)
                        .with_new_code(stripped),
                );
            }
            lines.push(stripped.to_string());
        }

        if changes.is_empty() {
            return FixOutcome::declined("No trailing whitespace found");
        }

        FixOutcome::Fixed {
            fix: rebuild(&lines, had_newline),
            description: format!("Removed trailing whitespace from {} line(s)", changes.len()),
            changes,
        }
    }
}

/// Comments out a console statement rather than deleting it.
pub struct CommentOutConsoleFixer;

impl FixStrategy for CommentOutConsoleFixer {
    fn attempt(&self, error: &ClassifiedError, content: &str, _ctx: &FixContext) -> FixOutcome {
        let had_newline = content.ends_with('\n');
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

        let idx = error
            .line
            .checked_sub(1)
            .filter(|&i| i < lines.len() && lines[i].contains("console."))
            .or_else(|| lines.iter().position(|l| l.contains("console.")));

        let Some(i) = idx else {
            return FixOutcome::declined("Could not locate a console statement");
        };

        let old_line = lines[i].clone();
        let indent: String = old_line
            .chars()
            .take_while(|c| c.is_whitespace())
            .collect();
        lines[i] = format!("{}// {}", indent, old_line.trim_start());

        FixOutcome::Fixed {
            fix: rebuild(&lines, had_newline),
            description: format!("Commented out console statement at line {}", i + 1),
            changes: vec![Change::new(ChangeKind::Modify)
                .at_line(i + 1)
                .with_old_code(old_line)
                .with_new_code(lines[i].clone())],
        }
    }
}

/// Deletes a debugger statement outright.
///
/// Distinct from the console policy on purpose: a debugger statement has no
/// value worth keeping, a console line might.
pub struct DeleteDebuggerFixer;

impl FixStrategy for DeleteDebuggerFixer {
    fn attempt(&self, error: &ClassifiedError, content: &str, _ctx: &FixContext) -> FixOutcome {
        let had_newline = content.ends_with('\n');
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

        let idx = error
            .line
            .checked_sub(1)
            .filter(|&i| i < lines.len() && lines[i].contains("debugger"))
            .or_else(|| lines.iter().position(|l| l.contains("debugger")));

        let Some(i) = idx else {
            return FixOutcome::declined("Could not locate a debugger statement");
        };

        let removed = lines.remove(i);

        FixOutcome::Fixed {
            fix: rebuild(&lines, had_newline),
            description: format!("Removed debugger statement at line {}", i + 1),
            changes: vec![Change::new(ChangeKind::Delete)
                .at_line(i + 1)
                .with_old_code(removed)],
        }
    }
}

/// Always declines with a fixed reason.
///
/// Used by templates whose category needs semantic or type information the
/// deterministic layer does not have; the decline routes the request to the
/// AI path.
pub struct SemanticDecline {
    reason: &'static str,
}

impl SemanticDecline {
    pub fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

impl FixStrategy for SemanticDecline {
    fn attempt(&self, _error: &ClassifiedError, _content: &str, _ctx: &FixContext) -> FixOutcome {
        FixOutcome::declined(self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{ErrorCategory, Severity};
    use std::path::PathBuf;

    fn error(category: ErrorCategory, message: &str, line: usize) -> ClassifiedError {
        ClassifiedError {
            category,
            message: message.to_string(),
            file: PathBuf::from("src/app.js"),
            line,
            severity: Severity::Error,
        }
    }

    fn ctx() -> FixContext {
        FixContext::default()
    }

    #[test]
    fn test_missing_semicolon_scenario() {
        let content = "function f() {\n  let y = 1;\nconst x = 5\n}\n";
        let err = error(ErrorCategory::Syntax, "missing semicolon", 3);

        let outcome = MissingTerminatorFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, changes, .. } = outcome else {
            panic!("expected a fix");
        };

        let lines: Vec<&str> = fix.lines().collect();
        assert_eq!(lines[2], "const x = 5;");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Insert);
        assert_eq!(changes[0].line, Some(3));
    }

    #[test]
    fn test_terminator_declines_on_control_flow() {
        let content = "function f() {\n  return x\n}\n";
        let err = error(ErrorCategory::Syntax, "missing semicolon", 2);
        let outcome = MissingTerminatorFixer.attempt(&err, content, &ctx());
        assert!(matches!(outcome, FixOutcome::Declined { .. }));
    }

    #[test]
    fn test_terminator_declines_on_comment_and_brace() {
        let err = error(ErrorCategory::Syntax, "missing semicolon", 1);
        for content in ["// a comment\n", "if (x) {\n", "}\n", "a,\n"] {
            let outcome = MissingTerminatorFixer.attempt(&err, content, &ctx());
            assert!(
                matches!(outcome, FixOutcome::Declined { .. }),
                "should decline on {:?}",
                content
            );
        }
    }

    #[test]
    fn test_terminator_declines_out_of_range() {
        let err = error(ErrorCategory::Syntax, "missing semicolon", 99);
        let outcome = MissingTerminatorFixer.attempt(&err, "const x = 5\n", &ctx());
        assert!(matches!(outcome, FixOutcome::Declined { .. }));
    }

    #[test]
    fn test_brackets_appends_closing_brace() {
        let content = "function f() {\n  let a = 1;\n";
        let err = error(ErrorCategory::Syntax, "unexpected token", 1);

        let outcome = BracketBalanceFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, changes, .. } = outcome else {
            panic!("expected a fix");
        };

        assert_eq!(fix.lines().last(), Some("}"));
        assert_eq!(changes[0].line, Some(3));
    }

    #[test]
    fn test_brackets_inserts_opening_brace_before_negative_line() {
        let content = "let a = 1;\n  }\n";
        let err = error(ErrorCategory::Syntax, "unexpected token", 2);

        let outcome = BracketBalanceFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, changes, .. } = outcome else {
            panic!("expected a fix");
        };

        let lines: Vec<&str> = fix.lines().collect();
        assert_eq!(lines[1], "  {");
        assert_eq!(changes[0].line, Some(2));
        assert_eq!(changes[0].text.as_deref(), Some("{"));
    }

    #[test]
    fn test_brackets_declines_when_balanced() {
        let content = "function f() {\n  return 1;\n}\n";
        let err = error(ErrorCategory::Syntax, "unexpected token", 1);
        let outcome = BracketBalanceFixer.attempt(&err, content, &ctx());
        assert!(matches!(outcome, FixOutcome::Declined { .. }));
    }

    #[test]
    fn test_unused_variable_deletes_declaration() {
        let content = "const a = 1;\nconst temp = 2;\nconsole.log(a);\n";
        let err = error(
            ErrorCategory::Unused,
            "'temp' is declared but its value is never read",
            2,
        );

        let outcome = UnusedVariableFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, changes, .. } = outcome else {
            panic!("expected a fix");
        };

        assert!(!fix.contains("temp"));
        assert_eq!(changes[0].kind, ChangeKind::Delete);
        assert_eq!(changes[0].line, Some(2));
    }

    #[test]
    fn test_unused_variable_searches_window() {
        // Declaration two lines above the reported line.
        let content = "let unused = 1;\nlet a = 2;\nconsole.log(a);\n";
        let err = error(ErrorCategory::Unused, "unused variable 'unused'", 3);

        let outcome = UnusedVariableFixer.attempt(&err, content, &ctx());
        assert!(outcome.is_fixed());
    }

    #[test]
    fn test_unused_variable_not_found_reason() {
        let content = "const a = 1;\nconst b = 2;\nconst c = 3;\n";
        let err = error(ErrorCategory::Unused, "unused variable 'foo'", 2);

        let outcome = UnusedVariableFixer.attempt(&err, content, &ctx());
        let FixOutcome::Declined { reason } = outcome else {
            panic!("expected a decline");
        };
        assert_eq!(reason, "Could not locate unused variable 'foo' declaration");
    }

    #[test]
    fn test_unused_import_deletes_line() {
        let content = "import { readFile } from 'fs';\nimport path from 'path';\n\nreadFile();\n";
        let err = error(
            ErrorCategory::Import,
            "'path' is defined but never used",
            2,
        );

        let outcome = UnusedImportFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, .. } = outcome else {
            panic!("expected a fix");
        };
        assert!(!fix.contains("import path"));
        assert!(fix.contains("readFile"));
    }

    #[test]
    fn test_unused_import_declines_when_absent() {
        let content = "const a = 1;\n";
        let err = error(ErrorCategory::Import, "'path' is defined but never used", 1);
        let outcome = UnusedImportFixer.attempt(&err, content, &ctx());
        assert!(matches!(outcome, FixOutcome::Declined { .. }));
    }

    #[test]
    fn test_unreachable_stops_at_terminating_statement() {
        let content = "function f() {\n  return 1;\n  doWork();\n  return 2;\n}\n";
        let err = error(ErrorCategory::Unused, "unreachable code", 3);

        let outcome = UnreachableCodeFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, .. } = outcome else {
            panic!("expected a fix");
        };

        assert!(!fix.contains("doWork"));
        assert!(!fix.contains("return 2"));
        assert!(fix.contains("return 1"));
        assert!(fix.contains('}'));
    }

    #[test]
    fn test_unreachable_stops_at_blank_line() {
        let content = "return 1;\ndead();\nmoreDead();\n\nalive();\n";
        let err = error(ErrorCategory::Unused, "unreachable code", 2);

        let outcome = UnreachableCodeFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, .. } = outcome else {
            panic!("expected a fix");
        };
        assert!(!fix.contains("dead"));
        assert!(fix.contains("alive"));
    }

    #[test]
    fn test_trailing_whitespace_idempotent() {
        let content = "let a = 1;   \nlet b = 2;\t\nlet c = 3;\n";
        let err = error(ErrorCategory::Style, "trailing whitespace", 1);

        let first = TrailingWhitespaceFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, changes, .. } = first else {
            panic!("expected a fix");
        };
        assert_eq!(changes.len(), 2);
        assert_eq!(fix, "let a = 1;\nlet b = 2;\nlet c = 3;\n");

        // Second run has nothing to do and declines.
        let second = TrailingWhitespaceFixer.attempt(&err, &fix, &ctx());
        assert!(matches!(second, FixOutcome::Declined { .. }));
    }

    #[test]
    fn test_console_commented_out_not_deleted() {
        let content = "function f() {\n    console.log('hi');\n}\n";
        let err = error(ErrorCategory::Style, "unexpected console statement", 2);

        let outcome = CommentOutConsoleFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, .. } = outcome else {
            panic!("expected a fix");
        };
        assert!(fix.contains("    // console.log('hi');"));
        assert_eq!(fix.lines().count(), 3);
    }

    #[test]
    fn test_debugger_deleted_outright() {
        let content = "let a = 1;\ndebugger;\nlet b = 2;\n";
        let err = error(ErrorCategory::Style, "unexpected debugger statement", 2);

        let outcome = DeleteDebuggerFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, .. } = outcome else {
            panic!("expected a fix");
        };
        assert!(!fix.contains("debugger"));
        assert_eq!(fix.lines().count(), 2);
    }

    #[test]
    fn test_fixes_touch_only_reported_lines() {
        // Safety: lines outside the reported change ranges are unchanged.
        let content = "const keep1 = 1;\nconst x = 5\nconst keep2 = 2;\n";
        let err = error(ErrorCategory::Syntax, "missing semicolon", 2);

        let outcome = MissingTerminatorFixer.attempt(&err, content, &ctx());
        let FixOutcome::Fixed { fix, changes, .. } = outcome else {
            panic!("expected a fix");
        };

        let before: Vec<&str> = content.lines().collect();
        let after: Vec<&str> = fix.lines().collect();
        let changed: Vec<usize> = changes.iter().filter_map(|c| c.line).collect();
        for (i, (b, a)) in before.iter().zip(after.iter()).enumerate() {
            if changed.contains(&(i + 1)) {
                continue;
            }
            assert_eq!(b, a, "line {} modified outside reported changes", i + 1);
        }
    }

    #[test]
    fn test_identifier_extraction_phrasings() {
        assert_eq!(
            extract_identifier("'foo' is declared but never used").as_deref(),
            Some("foo")
        );
        assert_eq!(
            extract_identifier("variable bar is never read").as_deref(),
            Some("bar")
        );
        assert_eq!(
            extract_identifier("`baz` is assigned a value but never used").as_deref(),
            Some("baz")
        );
        assert_eq!(extract_identifier("nothing to see here"), None);
    }
}
