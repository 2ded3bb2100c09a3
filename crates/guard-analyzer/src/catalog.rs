// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Static knowledge about the Guard language.
//!
//! Everything here is plain data: the words offered as completions, the
//! usage text attached to built-in functions, and the hover text for the
//! handful of words that have one. Nothing in this module allocates.

/// Language keywords, in the order they are offered.
pub const KEYWORDS: &[&str] = &["rule", "let", "when", "some", "this", "or", "not"];

/// Unary and binary operators, in the order they are offered.
pub const OPERATORS: &[&str] = &[
    "exists",
    "empty",
    "keys",
    "is_string",
    "is_list",
    "is_struct",
    "is_bool",
    "is_int",
    "is_float",
    "is_null",
    "IN",
];

/// Built-in functions, in the order they are offered.
pub const FUNCTIONS: &[&str] = &[
    "json_parse",
    "regex_replace",
    "join",
    "to_lower",
    "to_upper",
    "substring",
    "url_decode",
    "count",
    "parse_int",
    "parse_float",
    "parse_string",
    "parse_boolean",
    "parse_char",
    "parse_epoch",
    "now",
];

/// Detail line shown next to a resolved built-in function.
pub const BUILTIN_FUNCTION_DETAIL: &str = "Guard built-in function";

/// The grammatical role of a catalog word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolCategory {
    Keyword,
    Operator,
    Function,
}

/// Every catalog word with its category: keywords, then operators, then
/// functions.
pub fn entries() -> impl Iterator<Item = (SymbolCategory, &'static str)> {
    let keywords = KEYWORDS.iter().map(|&word| (SymbolCategory::Keyword, word));
    let operators = OPERATORS.iter().map(|&word| (SymbolCategory::Operator, word));
    let functions = FUNCTIONS.iter().map(|&word| (SymbolCategory::Function, word));
    keywords.chain(operators).chain(functions)
}

/// Usage documentation for a built-in function (markdown).
pub fn function_docs(name: &str) -> Option<&'static str> {
    let doc = match name {
        "count" => "Count items in a collection\n\nUsage: `let c = count(Resources.*)`",
        "json_parse" => "Parse JSON string into object\n\nUsage: `let obj = json_parse(%json_string)`",
        "regex_replace" => "Replace regex pattern\n\nUsage: `let result = regex_replace(%string, %pattern, %replacement)`",
        "join" => "Join collection with delimiter\n\nUsage: `let str = join(%collection, \",\")`",
        "to_lower" => "Convert to lowercase\n\nUsage: `let lower = to_lower(%string)`",
        "to_upper" => "Convert to uppercase\n\nUsage: `let upper = to_upper(%string)`",
        "substring" => "Extract substring\n\nUsage: `let sub = substring(%string, 0, 10)`",
        "url_decode" => "URL decode string\n\nUsage: `let decoded = url_decode(%encoded)`",
        "parse_int" => "Convert to integer\n\nUsage: `let num = parse_int(%value)`",
        "parse_float" => "Convert to float\n\nUsage: `let num = parse_float(%value)`",
        "parse_string" => "Convert to string\n\nUsage: `let str = parse_string(%value)`",
        "parse_boolean" => "Convert to boolean\n\nUsage: `let bool = parse_boolean(%value)`",
        "parse_char" => "Convert to character\n\nUsage: `let c = parse_char(%value)`",
        "parse_epoch" => "Parse RFC3339 datetime to epoch\n\nUsage: `let ts = parse_epoch(%datetime)`",
        "now" => "Get current epoch timestamp\n\nUsage: `let ts = now()`",
        _ => return None,
    };
    Some(doc)
}

/// Hover text for a word, if it has one (markdown).
///
/// Lookup is exact and case-sensitive.
pub fn hover_docs(word: &str) -> Option<&'static str> {
    let doc = match word {
        "rule" => "**rule** - Define a named rule\n\nSyntax: `rule rule_name when condition { ... }`",
        "let" => "**let** - Variable assignment\n\nSyntax: `let variable_name = value`",
        "when" => "**when** - Conditional execution\n\nSyntax: `when condition { ... }`",
        "exists" => "**exists** - Check if property exists\n\nUsage: `Properties.BucketName exists`",
        "empty" => "**empty** - Check if collection is empty\n\nUsage: `Resources !empty`",
        "keys" => "**keys** - Filter by map keys in queries\n\nUsage: `this[ keys == /pattern/ ]` or `Condition[ keys == /String(Equals|Like)/ ]`",
        "count" => "**count()** - Count items in collection\n\nReturns the number of items. Must be used in variable assignment.",
        _ => return None,
    };
    Some(doc)
}
