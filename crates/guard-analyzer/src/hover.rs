// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Hover documentation for the word under the cursor.

use lsp_types::Range;

use crate::catalog;
use crate::text::position_at;

/// Hover information result.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    /// The content to display (markdown).
    pub content: String,
    /// The range of the hovered word.
    pub range: Range,
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte range of the identifier touching `offset`, if any.
///
/// Walks backward over word characters before the offset and forward over
/// word characters from it. Word characters are ASCII, so an offset in the
/// middle of a multi-byte character never touches a word.
pub fn word_range_at(text: &str, offset: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let offset = offset.min(bytes.len());

    let mut start = offset;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }

    let mut end = offset;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }

    if start == end {
        return None;
    }

    Some((start, end))
}

/// Look up hover documentation for the word at `offset`.
pub fn hover(text: &str, offset: usize) -> Option<HoverInfo> {
    let (start, end) = word_range_at(text, offset)?;
    let word = &text[start..end];
    let content = catalog::hover_docs(word)?;

    Some(HoverInfo {
        content: content.to_string(),
        range: Range {
            start: position_at(text, start),
            end: position_at(text, end),
        },
    })
}
