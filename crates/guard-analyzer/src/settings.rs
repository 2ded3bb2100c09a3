// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! Settings the editor can supply under the `guard` configuration section.

use serde::Deserialize;

use crate::formatter::{DEFAULT_INDENT_WIDTH, MAX_INDENT_WIDTH};

/// Configuration section the settings live under.
pub const SETTINGS_SECTION: &str = "guard";

/// Per-document (or global) settings.
///
/// Deserialized from the client's JSON; missing fields take their
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardSettings {
    /// Upper bound on diagnostics reported per validation pass.
    pub max_number_of_problems: usize,
    /// Whether document formatting is offered.
    pub formatting_enabled: bool,
    /// Indent width used when the formatting request does not carry one.
    pub indent_size: usize,
}

impl GuardSettings {
    /// Indent width to format with, never zero and never above
    /// [`MAX_INDENT_WIDTH`].
    pub fn indent_width(&self) -> usize {
        if self.indent_size == 0 {
            DEFAULT_INDENT_WIDTH
        } else {
            self.indent_size.min(MAX_INDENT_WIDTH)
        }
    }
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            max_number_of_problems: 100,
            formatting_enabled: true,
            indent_size: DEFAULT_INDENT_WIDTH,
        }
    }
}
