// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Document state management.

use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};

/// A document we're tracking (an open file in the editor).
#[derive(Debug, Clone)]
pub struct Document {
    /// The document content, stored as a rope so incremental edits are
    /// cheap.
    pub content: Rope,

    /// Document version (incremented by editor on each change).
    pub version: i32,
}

impl Document {
    /// Create a document from its full text.
    pub fn new(text: &str, version: i32) -> Self {
        Self {
            content: Rope::from_str(text),
            version,
        }
    }

    /// Apply one change from a `didChange` notification.
    ///
    /// A change with a range replaces that range; a change without one
    /// replaces the whole document.
    pub fn apply_change(&mut self, change: TextDocumentContentChangeEvent) {
        let Some(range) = change.range else {
            self.content = Rope::from_str(&change.text);
            return;
        };

        let start = position_to_char(&self.content, range.start);
        let end = position_to_char(&self.content, range.end).max(start);

        self.content.remove(start..end);
        self.content.insert(start, &change.text);
    }
}

/// Convert an LSP position (UTF-16 columns) to a rope char index.
///
/// Positions past the last line map to the end of the document, and
/// columns past the end of a line map to the end of that line.
fn position_to_char(rope: &Rope, position: Position) -> usize {
    let line = position.line as usize;
    if line >= rope.len_lines() {
        return rope.len_chars();
    }

    let line_start = rope.line_to_char(line);
    let line_slice = rope.line(line);

    let mut line_len = line_slice.len_chars();
    if line_len > 0 && line_slice.char(line_len - 1) == '\n' {
        line_len -= 1;
        if line_len > 0 && line_slice.char(line_len - 1) == '\r' {
            line_len -= 1;
        }
    }

    let max_units = line_slice.char_to_utf16_cu(line_len);
    let units = (position.character as usize).min(max_units);

    line_start + line_slice.utf16_cu_to_char(units)
}
