// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Guard Analyzer - Analysis engines for the Guard LSP
//!
//! This crate provides:
//! - Diagnostics engine: heuristic line scanner for unterminated strings
//!   and undefined `%variables`
//! - Formatter engine: brace/bracket driven re-indentation
//! - Completion and hover: lookups into a static symbol catalog
//!
//! Everything here is a pure function of its inputs. Document storage and
//! per-document settings belong to the server.

pub mod catalog;
pub mod completion;
pub mod diagnostics;
pub mod formatter;
pub mod hover;
pub mod settings;
pub mod text;

pub use diagnostics::DiagnosticEngine;
pub use formatter::FormatterEngine;
pub use hover::HoverInfo;
pub use settings::{GuardSettings, SETTINGS_SECTION};
