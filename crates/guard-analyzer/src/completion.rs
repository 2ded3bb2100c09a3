// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Completion items drawn from the symbol catalog.
//!
//! Completion is position-independent: every request receives the whole
//! catalog and the editor filters by what has been typed. Documentation
//! is attached lazily through [`resolve`].

use lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, MarkupContent,
    MarkupKind,
};

use crate::catalog::{self, SymbolCategory};

fn category_to_kind(category: SymbolCategory) -> CompletionItemKind {
    match category {
        SymbolCategory::Keyword => CompletionItemKind::KEYWORD,
        SymbolCategory::Operator => CompletionItemKind::OPERATOR,
        SymbolCategory::Function => CompletionItemKind::FUNCTION,
    }
}

/// All completion items: keywords, then operators, then functions.
///
/// Each item's `data` holds its ordinal in that list. Functions insert a
/// `name($0)` snippet so the cursor lands between the parentheses.
pub fn complete() -> Vec<CompletionItem> {
    catalog::entries()
        .enumerate()
        .map(|(ordinal, (category, label))| {
            let mut item = CompletionItem {
                label: label.to_string(),
                kind: Some(category_to_kind(category)),
                data: Some(serde_json::Value::from(ordinal)),
                ..Default::default()
            };

            if category == SymbolCategory::Function {
                item.insert_text = Some(format!("{}($0)", label));
                item.insert_text_format = Some(InsertTextFormat::SNIPPET);
            }

            item
        })
        .collect()
}

/// Fill in detail and documentation for a built-in function.
///
/// Items without documentation come back untouched.
pub fn resolve(mut item: CompletionItem) -> CompletionItem {
    if let Some(doc) = catalog::function_docs(&item.label) {
        item.detail = Some(catalog::BUILTIN_FUNCTION_DETAIL.to_string());
        item.documentation = Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: doc.to_string(),
        }));
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_returns_whole_catalog() {
        let items = complete();
        assert_eq!(items.len(), 33);

        let keywords = items
            .iter()
            .filter(|i| i.kind == Some(CompletionItemKind::KEYWORD))
            .count();
        let operators = items
            .iter()
            .filter(|i| i.kind == Some(CompletionItemKind::OPERATOR))
            .count();
        let functions = items
            .iter()
            .filter(|i| i.kind == Some(CompletionItemKind::FUNCTION))
            .count();
        assert_eq!((keywords, operators, functions), (7, 11, 15));
    }

    #[test]
    fn test_complete_order_and_ordinals() {
        let items = complete();
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(&labels[..7], catalog::KEYWORDS);
        assert_eq!(&labels[7..18], catalog::OPERATORS);
        assert_eq!(&labels[18..], catalog::FUNCTIONS);

        for (ordinal, item) in items.iter().enumerate() {
            assert_eq!(item.data, Some(serde_json::json!(ordinal)));
        }
    }

    #[test]
    fn test_complete_is_stable() {
        assert_eq!(complete(), complete());
    }

    #[test]
    fn test_function_snippets() {
        let items = complete();
        let count = items.iter().find(|i| i.label == "count").unwrap();
        assert_eq!(count.insert_text.as_deref(), Some("count($0)"));
        assert_eq!(count.insert_text_format, Some(InsertTextFormat::SNIPPET));

        let rule = items.iter().find(|i| i.label == "rule").unwrap();
        assert!(rule.insert_text.is_none());
        assert!(rule.insert_text_format.is_none());
    }

    #[test]
    fn test_resolve_function() {
        let item = complete().into_iter().find(|i| i.label == "count").unwrap();
        let resolved = resolve(item);

        assert_eq!(resolved.detail.as_deref(), Some("Guard built-in function"));
        match resolved.documentation {
            Some(Documentation::MarkupContent(content)) => {
                assert!(content.value.contains("Count items in a collection"));
            }
            other => panic!("expected markdown documentation, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_unknown_is_identity() {
        let item = CompletionItem {
            label: "not_a_builtin".to_string(),
            data: Some(serde_json::json!(99)),
            ..Default::default()
        };
        assert_eq!(resolve(item.clone()), item);

        let keyword = complete().into_iter().find(|i| i.label == "when").unwrap();
        assert_eq!(resolve(keyword.clone()), keyword);
    }
}
