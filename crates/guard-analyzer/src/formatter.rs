// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Formatter engine for Guard documents.
//!
//! # How it works
//!
//! 1. Walk the document line by line, keeping a running indent level
//! 2. Trim each line and collapse whitespace after commas to one space
//! 3. Count `{`/`[` against `}`/`]` on the line
//! 4. A line that closes more than it opens is dedented before it is
//!    written; a line that opens more than it closes indents the lines
//!    after it
//!
//! Blank lines are kept (emptied) and never move the indent level. The
//! brace counting is purely textual, so brackets inside strings count too.

use regex::Regex;

/// Indent width used when the editor does not supply one.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Widest indent level the formatter will emit.
pub const MAX_INDENT_WIDTH: usize = 16;

/// The formatter engine.
pub struct FormatterEngine {
    /// Matches a comma followed by any run of whitespace.
    comma_spacing: Regex,
}

impl FormatterEngine {
    /// Create a new formatter engine.
    pub fn new() -> Self {
        let comma_spacing =
            Regex::new(r",\s+").expect("Failed to compile comma spacing pattern");
        Self { comma_spacing }
    }

    /// Format the given content and return the whole replacement text.
    ///
    /// Each indent level is `indent_width` spaces, capped at
    /// [`MAX_INDENT_WIDTH`].
    pub fn format(&self, content: &str, indent_width: usize) -> String {
        let indent_unit = " ".repeat(indent_width.min(MAX_INDENT_WIDTH));
        let mut formatted = Vec::new();
        let mut indent: usize = 0;

        for line in content.split('\n') {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                formatted.push(String::new());
                continue;
            }

            let normalized = self.comma_spacing.replace_all(trimmed, ", ");
            let net_change = nesting_change(&normalized);

            if net_change < 0 {
                indent = indent.saturating_sub(net_change.unsigned_abs());
            }

            formatted.push(format!("{}{}", indent_unit.repeat(indent), normalized));

            if net_change > 0 {
                indent += net_change.unsigned_abs();
            }
        }

        tracing::trace!("Formatted {} line(s)", formatted.len());
        formatted.join("\n")
    }
}

impl Default for FormatterEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Openers minus closers for braces and brackets on one line.
fn nesting_change(line: &str) -> isize {
    let mut change = 0;
    for c in line.chars() {
        match c {
            '{' | '[' => change += 1,
            '}' | ']' => change -= 1,
            _ => {}
        }
    }
    change
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(content: &str) -> String {
        FormatterEngine::new().format(content, DEFAULT_INDENT_WIDTH)
    }

    #[test]
    fn test_rule_body_is_indented() {
        let input = "let x = 1\nrule r {\nx == 1\n}";
        assert_eq!(format(input), "let x = 1\nrule r {\n    x == 1\n}");
    }

    #[test]
    fn test_comma_spacing() {
        // Only commas already followed by whitespace are normalized
        assert_eq!(format("foo(1,2, 3)"), "foo(1,2, 3)");
        assert_eq!(format("foo(1,  2,\t3)"), "foo(1, 2, 3)");
        assert_eq!(format("join(%a,   \",\")"), "join(%a, \",\")");
        assert_eq!(format("f(a,\tb)"), "f(a, b)");
    }

    #[test]
    fn test_blank_lines_are_emptied() {
        let input = "rule r {\n   \nx == 1\n\n}";
        assert_eq!(format(input), "rule r {\n\n    x == 1\n\n}");
    }

    #[test]
    fn test_nested_blocks() {
        let input = "rule r {\nResources.* {\nType == \"x\"\n}\n}";
        let expected = "rule r {\n    Resources.* {\n        Type == \"x\"\n    }\n}";
        assert_eq!(format(input), expected);
    }

    #[test]
    fn test_brackets_count_toward_nesting() {
        let input = "let allowed = [\n\"a\",\n\"b\"\n]";
        assert_eq!(format(input), "let allowed = [\n    \"a\",\n    \"b\"\n]");
    }

    #[test]
    fn test_balanced_line_keeps_indent() {
        // "} else {" nets to zero, so it stays at the level of the block
        let input = "when %x {\n} else {\ny\n}";
        assert_eq!(format(input), "when %x {\n    } else {\n    y\n}");
    }

    #[test]
    fn test_line_opening_twice() {
        let input = "a {[\nb\n]}";
        assert_eq!(format(input), "a {[\n        b\n]}");
    }

    #[test]
    fn test_indent_never_goes_negative() {
        let input = "}\n}\nx";
        assert_eq!(format(input), "}\n}\nx");
    }

    #[test]
    fn test_existing_indentation_is_replaced() {
        let input = "        rule r {\n  x\n            }";
        assert_eq!(format(input), "rule r {\n    x\n}");
    }

    #[test]
    fn test_custom_indent_width() {
        let engine = FormatterEngine::new();
        let input = "rule r {\nx\n}";
        assert_eq!(engine.format(input, 2), "rule r {\n  x\n}");
    }

    #[test]
    fn test_oversized_indent_width_is_capped() {
        let engine = FormatterEngine::new();
        let input = "rule r {\nx\n}";
        let expected = format!("rule r {{\n{}x\n}}", " ".repeat(MAX_INDENT_WIDTH));
        assert_eq!(engine.format(input, u32::MAX as usize), expected);
    }

    #[test]
    fn test_crlf_is_stripped() {
        assert_eq!(format("rule r {\r\nx\r\n}\r\n"), "rule r {\n    x\n}\n");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Documents made of braces, brackets, commas and words.
    fn document() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop::string::string_regex(r"[ \t]{0,4}([a-z]{1,4}|[{}\[\],]|, ){0,6}[ \t]{0,2}").unwrap(),
            0..12,
        )
        .prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        /// Formatting should be idempotent
        #[test]
        fn format_is_idempotent(input in document(), width in 1usize..6) {
            let engine = FormatterEngine::new();
            let once = engine.format(&input, width);
            let twice = engine.format(&once, width);
            prop_assert_eq!(once, twice);
        }

        /// Formatting keeps one output line per input line
        #[test]
        fn format_preserves_line_count(input in document()) {
            let formatted = FormatterEngine::new().format(&input, DEFAULT_INDENT_WIDTH);
            prop_assert_eq!(formatted.split('\n').count(), input.split('\n').count());
        }
    }
}
