// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic engine for Guard documents.
//!
//! # How it works
//!
//! This is a line-oriented heuristic scanner, not a parser. Each line of
//! the document is checked, in order, for:
//!
//! 1. A string literal that is opened but never closed on the same line
//!    (`error`, spanning the whole line)
//! 2. `%name` variable references with no `let name` anywhere earlier in
//!    the document (`warning`, spanning the `%name` token)
//!
//! The variable check is a plain substring search over the text preceding
//! the line. It knows nothing about rule scopes, so a `let` in an
//! unrelated rule still counts as a definition.
//!
//! Scanning stops as soon as the configured problem limit is reached; the
//! remaining lines are not examined.

use lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};
use regex::Regex;

use crate::text::utf16_len;

/// Source tag attached to every diagnostic we produce.
pub const DIAGNOSTIC_SOURCE: &str = "guard";

/// The diagnostic engine.
///
/// Holds the compiled variable-reference pattern so it is built once per
/// process rather than once per scan.
pub struct DiagnosticEngine {
    /// Matches `%identifier`, capturing the identifier.
    variable_pattern: Regex,
}

impl DiagnosticEngine {
    /// Create a new diagnostic engine.
    pub fn new() -> Self {
        let variable_pattern = Regex::new(r"%([a-zA-Z_][a-zA-Z0-9_]*)")
            .expect("Failed to compile variable reference pattern");
        Self { variable_pattern }
    }

    /// Scan a document and return its diagnostics, at most `max_problems`.
    ///
    /// Diagnostics come out in line order. Within a line, the unterminated
    /// string error comes first, followed by variable warnings from left
    /// to right.
    pub fn scan(&self, text: &str, max_problems: usize) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if max_problems == 0 {
            return diagnostics;
        }

        let mut line_start = 0;

        'lines: for (line_number, line) in text.split('\n').enumerate() {
            let line_number = line_number as u32;

            if has_unterminated_string(line) {
                diagnostics.push(unterminated_string(line_number, line));
                if diagnostics.len() >= max_problems {
                    break 'lines;
                }
            }

            let text_before = &text[..line_start];

            for caps in self.variable_pattern.captures_iter(line) {
                let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                if text_before.contains(&format!("let {}", name.as_str())) {
                    continue;
                }

                let start = utf16_len(&line[..token.start()]);
                let end = start + utf16_len(token.as_str());

                diagnostics.push(Diagnostic {
                    range: Range {
                        start: Position {
                            line: line_number,
                            character: start,
                        },
                        end: Position {
                            line: line_number,
                            character: end,
                        },
                    },
                    severity: Some(DiagnosticSeverity::WARNING),
                    source: Some(DIAGNOSTIC_SOURCE.to_string()),
                    message: format!("Variable '{}' may not be defined", name.as_str()),
                    ..Default::default()
                });

                if diagnostics.len() >= max_problems {
                    break 'lines;
                }
            }

            line_start += line.len() + 1;
        }

        tracing::debug!(
            "Scan produced {} diagnostic(s) (limit {})",
            diagnostics.len(),
            max_problems
        );

        diagnostics
    }
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether a line leaves a string literal open.
///
/// Quotes toggle string state; a `#` outside a string starts a comment
/// and ends the check. Escapes are not recognised.
fn has_unterminated_string(line: &str) -> bool {
    let mut in_string = false;
    for c in line.chars() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => break,
            _ => {}
        }
    }
    in_string
}

/// Build the whole-line error for an unterminated string.
fn unterminated_string(line_number: u32, line: &str) -> Diagnostic {
    Diagnostic {
        range: Range {
            start: Position {
                line: line_number,
                character: 0,
            },
            end: Position {
                line: line_number,
                character: utf16_len(line),
            },
        },
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: "Unterminated string".to_string(),
        ..Default::default()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Lines built from the characters the heuristics care about.
    fn guard_text() -> impl Strategy<Value = String> {
        prop::string::string_regex(r##"([a-z%"# =\n]|let ){0,80}"##).unwrap()
    }

    proptest! {
        /// The result never exceeds the requested limit
        #[test]
        fn scan_respects_limit(text in guard_text(), max in 0usize..8) {
            let diags = DiagnosticEngine::new().scan(&text, max);
            prop_assert!(diags.len() <= max);
        }

        /// A smaller limit yields a prefix of the larger result
        #[test]
        fn scan_limit_is_prefix(text in guard_text(), max in 0usize..8) {
            let engine = DiagnosticEngine::new();
            let full = engine.scan(&text, usize::MAX);
            let limited = engine.scan(&text, max);
            prop_assert_eq!(&full[..limited.len()], &limited[..]);
        }

        /// Every warning spans exactly a `%name` token
        #[test]
        fn warnings_span_variable_tokens(text in guard_text()) {
            let lines: Vec<&str> = text.split('\n').collect();
            for diag in DiagnosticEngine::new().scan(&text, usize::MAX) {
                if diag.severity != Some(DiagnosticSeverity::WARNING) {
                    continue;
                }
                let line = lines[diag.range.start.line as usize];
                let start = diag.range.start.character as usize;
                let end = diag.range.end.character as usize;
                prop_assert!(line[start..end].starts_with('%'));
            }
        }
    }
}
