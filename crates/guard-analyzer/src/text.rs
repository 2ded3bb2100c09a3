// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Conversions between byte offsets and LSP positions.
//!
//! LSP counts `character` in UTF-16 code units, while Rust strings are
//! indexed by byte. Every position that leaves this crate goes through
//! these helpers so that non-ASCII documents line up in the editor.

use lsp_types::Position;

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> u32 {
    s.chars().map(|c| c.len_utf16() as u32).sum()
}

/// Convert a byte offset into a line/character position.
///
/// Offsets past the end clamp to the end of the text; offsets inside a
/// multi-byte character clamp back to the start of that character.
pub fn position_at(text: &str, offset: usize) -> Position {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let before = &text[..offset];
    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);

    Position {
        line,
        character: utf16_len(&text[line_start..offset]),
    }
}

/// Convert a line/character position into a byte offset.
///
/// A line past the end maps to the end of the text. A character past the
/// end of its line maps to the end of that line (before the newline).
pub fn offset_at(text: &str, position: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match text[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return text.len(),
        }
    }

    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);

    let mut units = 0;
    for (idx, c) in text[line_start..line_end].char_indices() {
        if units >= position.character {
            return line_start + idx;
        }
        units += c.len_utf16() as u32;
    }

    line_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_at() {
        let text = "let x = 1\nrule r {\n}";
        assert_eq!(position_at(text, 0), Position::new(0, 0));
        assert_eq!(position_at(text, 4), Position::new(0, 4));
        assert_eq!(position_at(text, 10), Position::new(1, 0));
        assert_eq!(position_at(text, text.len()), Position::new(2, 1));
    }

    #[test]
    fn test_position_at_clamps() {
        let text = "abc";
        assert_eq!(position_at(text, 100), Position::new(0, 3));

        // 'é' is two bytes; offset 2 sits inside it
        let text = "xé";
        assert_eq!(position_at(text, 2), Position::new(0, 1));
    }

    #[test]
    fn test_position_at_counts_utf16() {
        // U+1F600 is four bytes and two UTF-16 code units
        let text = "\u{1F600}%x";
        assert_eq!(position_at(text, 4), Position::new(0, 2));
    }

    #[test]
    fn test_offset_at() {
        let text = "let x = 1\nrule r {\n}";
        assert_eq!(offset_at(text, Position::new(0, 0)), 0);
        assert_eq!(offset_at(text, Position::new(1, 5)), 15);
        assert_eq!(offset_at(text, Position::new(2, 0)), 19);
    }

    #[test]
    fn test_offset_at_clamps() {
        let text = "ab\ncd";
        assert_eq!(offset_at(text, Position::new(0, 10)), 2);
        assert_eq!(offset_at(text, Position::new(9, 0)), text.len());
    }

    #[test]
    fn test_offset_at_counts_utf16() {
        let text = "\u{1F600}rule";
        assert_eq!(offset_at(text, Position::new(0, 2)), 4);
        assert_eq!(offset_at(text, Position::new(0, 3)), 5);
    }

    #[test]
    fn test_offset_position_agree() {
        let text = "a\u{e9}b\n\u{1F600}c\n";
        for offset in [0, 1, 3, 4, 5, 9, 10, 11] {
            assert_eq!(offset_at(text, position_at(text, offset)), offset);
        }
    }
}
