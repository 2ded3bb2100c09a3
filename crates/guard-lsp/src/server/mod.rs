// This file is part of guard-lsp.
// Copyright (C) 2025 The guard-lsp Authors
// SPDX-License-Identifier: Apache-2.0

//! The main Language Server implementation.
//!
//! # LSP Lifecycle
//!
//! 1. Editor starts our binary and sends `initialize` request
//! 2. We respond with our capabilities (what features we support)
//! 3. Editor sends `initialized` notification (handshake complete)
//! 4. Normal operation: file events, requests flow both directions
//! 5. Editor sends `shutdown` request, we respond, then `exit` notification
//!
//! All analysis lives in `guard_analyzer`; this module only stores
//! documents and settings and moves data between the editor and the
//! engines.

mod settings;
mod state;

pub use settings::{parse_settings, SettingsError, SettingsStore};
pub use state::Document;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use guard_analyzer::formatter::MAX_INDENT_WIDTH;
use guard_analyzer::text::{offset_at, position_at};
use guard_analyzer::{completion, hover, DiagnosticEngine, FormatterEngine, GuardSettings};
use guard_analyzer::SETTINGS_SECTION;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

/// Characters that should pop up completion as soon as they are typed.
const TRIGGER_CHARACTERS: [&str; 3] = ["%", ".", "["];

/// The Guard Language Server.
///
/// This struct holds all the state needed by the server:
/// - `client`: Used to send notifications TO the editor (e.g., diagnostics)
/// - `documents`: Map of open files (Uri -> Document)
/// - `settings`: Per-document settings cache and the global fallback
pub struct GuardLanguageServer {
    /// The LSP client - used to send messages TO the editor.
    client: Client,

    /// Open documents, keyed by their URI.
    documents: Arc<DashMap<Url, Document>>,

    /// Settings cache.
    settings: Arc<SettingsStore>,

    /// The diagnostic scanner.
    diagnostic_engine: Arc<DiagnosticEngine>,

    /// The formatter.
    formatter_engine: Arc<FormatterEngine>,

    /// Client can answer `workspace/configuration` requests.
    has_configuration_capability: AtomicBool,

    /// Client supports workspace folders.
    has_workspace_folder_capability: AtomicBool,
}

impl GuardLanguageServer {
    /// Create a new language server instance.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            settings: Arc::new(SettingsStore::new()),
            diagnostic_engine: Arc::new(DiagnosticEngine::new()),
            formatter_engine: Arc::new(FormatterEngine::new()),
            has_configuration_capability: AtomicBool::new(false),
            has_workspace_folder_capability: AtomicBool::new(false),
        }
    }

    /// Snapshot of a document's text, if it is open.
    fn document_text(&self, uri: &Url) -> Option<String> {
        self.documents.get(uri).map(|doc| doc.content.to_string())
    }

    /// Settings that apply to a document.
    ///
    /// Falls back to defaults (without caching them) when the client
    /// cannot be asked or gives an unusable answer.
    async fn document_settings(&self, uri: &Url) -> GuardSettings {
        if !self.has_configuration_capability.load(Ordering::Relaxed) {
            return self.settings.global().await;
        }

        if let Some(settings) = self.settings.cached(uri) {
            return settings;
        }

        match self.fetch_settings(uri).await {
            Ok(settings) => {
                self.settings.remember(uri.clone(), settings);
                settings
            }
            Err(e) => {
                tracing::warn!("Using default settings for {}: {}", uri, e);
                GuardSettings::default()
            }
        }
    }

    /// Ask the client for the `guard` section scoped to a document.
    async fn fetch_settings(&self, uri: &Url) -> std::result::Result<GuardSettings, SettingsError> {
        let values = self
            .client
            .configuration(vec![ConfigurationItem {
                scope_uri: Some(uri.clone()),
                section: Some(SETTINGS_SECTION.to_string()),
            }])
            .await?;

        let value = values
            .into_iter()
            .next()
            .ok_or_else(|| SettingsError::Missing(uri.clone()))?;

        parse_settings(value)
    }

    /// Scan a document and publish its full diagnostic set.
    async fn validate(&self, uri: Url) {
        let (content, version) = match self.documents.get(&uri) {
            Some(doc) => (doc.content.to_string(), doc.version),
            None => return,
        };

        let settings = self.document_settings(&uri).await;
        let diagnostics = self
            .diagnostic_engine
            .scan(&content, settings.max_number_of_problems);

        tracing::debug!("Publishing {} diagnostic(s) for {}", diagnostics.len(), uri);
        self.client
            .publish_diagnostics(uri, diagnostics, Some(version))
            .await;
    }

    /// Re-run validation for every open document.
    async fn validate_all(&self) {
        let uris: Vec<Url> = self
            .documents
            .iter()
            .map(|entry| entry.key().clone())
            .collect();

        for uri in uris {
            self.validate(uri).await;
        }
    }
}

/// Implementation of the Language Server Protocol.
///
/// Methods we don't implement return "method not found" automatically.
#[tower_lsp::async_trait]
impl LanguageServer for GuardLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("Received initialize request");

        let workspace = params.capabilities.workspace.as_ref();
        let has_configuration = workspace
            .and_then(|w| w.configuration)
            .unwrap_or(false);
        let has_workspace_folders = workspace
            .and_then(|w| w.workspace_folders)
            .unwrap_or(false);

        self.has_configuration_capability
            .store(has_configuration, Ordering::Relaxed);
        self.has_workspace_folder_capability
            .store(has_workspace_folders, Ordering::Relaxed);

        tracing::debug!(
            "Client capabilities: configuration={}, workspace_folders={}",
            has_configuration,
            has_workspace_folders
        );

        let workspace_capabilities = has_workspace_folders.then(|| WorkspaceServerCapabilities {
            workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                supported: Some(true),
                change_notifications: Some(OneOf::Left(true)),
            }),
            file_operations: None,
        });

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::INCREMENTAL),
                        ..Default::default()
                    },
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(
                        TRIGGER_CHARACTERS.iter().map(|c| c.to_string()).collect(),
                    ),
                    resolve_provider: Some(true),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                document_formatting_provider: Some(OneOf::Left(true)),
                workspace: workspace_capabilities,
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "guard-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        tracing::info!("Server initialized - handshake complete");

        if self.has_configuration_capability.load(Ordering::Relaxed) {
            let registration = Registration {
                id: "guard-did-change-configuration".to_string(),
                method: "workspace/didChangeConfiguration".to_string(),
                register_options: None,
            };
            if let Err(e) = self.client.register_capability(vec![registration]).await {
                tracing::warn!("Failed to register for configuration changes: {}", e);
            }
        }

        self.client
            .log_message(MessageType::INFO, "Guard LSP server ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("Shutdown requested");
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        if self.has_configuration_capability.load(Ordering::Relaxed) {
            tracing::debug!("Configuration changed, dropping cached settings");
            self.settings.clear();
        } else {
            let section = params
                .settings
                .get(SETTINGS_SECTION)
                .cloned()
                .unwrap_or_default();
            let settings = parse_settings(section).unwrap_or_else(|e| {
                tracing::warn!("Ignoring pushed settings: {}", e);
                GuardSettings::default()
            });
            tracing::debug!("Global settings updated: {:?}", settings);
            self.settings.set_global(settings).await;
        }

        self.validate_all().await;
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        tracing::info!(
            "Workspace folder change event received: {} added, {} removed",
            params.event.added.len(),
            params.event.removed.len()
        );
        self.client
            .log_message(MessageType::LOG, "Workspace folder change event received.")
            .await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document opened: {}", uri);

        self.documents.insert(
            uri.clone(),
            Document::new(&params.text_document.text, params.text_document.version),
        );

        self.validate(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::trace!("Document changed: {}", uri);

        match self.documents.get_mut(&uri) {
            Some(mut doc) => {
                for change in params.content_changes {
                    doc.apply_change(change);
                }
                doc.version = params.text_document.version;
            }
            None => {
                tracing::warn!("Change for unknown document: {}", uri);
                return;
            }
        }

        self.validate(uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document closed: {}", uri);

        self.documents.remove(&uri);
        self.settings.forget(&uri);

        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn completion(&self, _params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let items = completion::complete();
        tracing::debug!("Returning {} completion items", items.len());
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        Ok(completion::resolve(item))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(content) = self.document_text(&uri) else {
            return Ok(None);
        };

        let offset = offset_at(&content, position);

        Ok(hover::hover(&content, offset).map(|info| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: info.content,
            }),
            range: Some(info.range),
        }))
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let uri = params.text_document.uri;
        tracing::debug!("Formatting requested for: {}", uri);

        let Some(content) = self.document_text(&uri) else {
            tracing::warn!("Document not found: {}", uri);
            return Ok(Some(vec![]));
        };

        let settings = self.document_settings(&uri).await;
        if !settings.formatting_enabled {
            tracing::debug!("Formatting disabled for: {}", uri);
            return Ok(Some(vec![]));
        }

        let indent_width = match params.options.tab_size {
            0 => settings.indent_width(),
            tab_size => (tab_size as usize).min(MAX_INDENT_WIDTH),
        };

        let formatted = self.formatter_engine.format(&content, indent_width);

        // Replace the entire document with a single edit
        let range = Range {
            start: Position {
                line: 0,
                character: 0,
            },
            end: position_at(&content, content.len()),
        };

        tracing::debug!("Formatting complete");
        Ok(Some(vec![TextEdit {
            range,
            new_text: formatted,
        }]))
    }
}
