// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Settings lookup and caching.
//!
//! Clients that support `workspace/configuration` are asked for settings
//! per document; the answer is cached until the document closes or the
//! configuration changes. Clients without it push settings through
//! `didChangeConfiguration`, which replaces one global value.

use dashmap::DashMap;
use guard_analyzer::GuardSettings;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;

/// Why settings could not be obtained from the client.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("configuration request failed: {0}")]
    Request(#[from] tower_lsp::jsonrpc::Error),

    #[error("client returned no configuration for {0}")]
    Missing(Url),

    #[error("invalid guard settings: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Parse the `guard` configuration section.
///
/// `null` (section not configured) means defaults.
pub fn parse_settings(value: Value) -> Result<GuardSettings, SettingsError> {
    if value.is_null() {
        return Ok(GuardSettings::default());
    }
    Ok(serde_json::from_value(value)?)
}

/// Per-document settings cache plus the global fallback.
#[derive(Debug, Default)]
pub struct SettingsStore {
    per_document: DashMap<Url, GuardSettings>,
    global: RwLock<GuardSettings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self, uri: &Url) -> Option<GuardSettings> {
        self.per_document.get(uri).map(|entry| *entry.value())
    }

    pub fn remember(&self, uri: Url, settings: GuardSettings) {
        self.per_document.insert(uri, settings);
    }

    pub fn forget(&self, uri: &Url) {
        self.per_document.remove(uri);
    }

    /// Drop every cached entry so the next lookup asks the client again.
    pub fn clear(&self) {
        self.per_document.clear();
    }

    pub async fn global(&self) -> GuardSettings {
        *self.global.read().await
    }

    pub async fn set_global(&self, settings: GuardSettings) {
        *self.global.write().await = settings;
    }
}
