// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Guard LSP - Language Server for the AWS CloudFormation Guard policy
//! language.
//!
//! Provides diagnostics, completion (with resolve), hover and document
//! formatting. The analysis itself lives in `guard_analyzer`.

mod server;

pub use server::{Document, GuardLanguageServer, SettingsError, SettingsStore};
