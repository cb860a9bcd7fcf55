//! LSP protocol handler implementations
//!
//! This module contains the `tower_lsp::LanguageServer` implementation for
//! the Fusion backend:
//! - Lifecycle handlers (initialize, initialized, shutdown)
//! - Document lifecycle (did_open, did_change, did_close)
//! - Settings (did_change_configuration)
//! - Completion

use std::sync::Arc;

use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::{
    CompletionOptions, CompletionParams, CompletionResponse, CompletionTriggerKind,
    DidChangeConfigurationParams, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, InitializeParams, InitializeResult, InitializedParams,
    ServerCapabilities, ServerInfo, TextDocumentSyncCapability, TextDocumentSyncKind,
};
use tower_lsp::{LanguageServer, jsonrpc};
use tracing::{debug, info, warn};

use super::state::FusionBackend;
use crate::lsp::document::is_lua_document;
use crate::lsp::models::LspDocument;

#[tower_lsp::async_trait]
impl LanguageServer for FusionBackend {
    /// Handles the LSP initialize request, reading settings and advertising capabilities.
    async fn initialize(&self, params: InitializeParams) -> jsonrpc::Result<InitializeResult> {
        info!(
            "Received initialize from {}",
            params
                .client_info
                .as_ref()
                .map_or("unknown client", |info| info.name.as_str())
        );

        if let Some(options) = params.initialization_options {
            self.update_config(options);
        }

        let trigger_characters = self.config.read().trigger_characters.all();
        debug!("Advertising trigger characters {:?}", trigger_characters);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(trigger_characters),
                    all_commit_characters: None,
                    resolve_provider: Some(false),
                    completion_item: None,
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    /// Handles the LSP initialized notification by starting the API dump download.
    async fn initialized(&self, _params: InitializedParams) {
        info!("Initialized");
        self.spawn_dump_loader();
    }

    /// Handles the LSP shutdown request.
    async fn shutdown(&self) -> jsonrpc::Result<()> {
        info!("Received shutdown request");
        self.documents_by_uri.clear();
        Ok(())
    }

    /// Starts tracking a Lua or Luau document.
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let item = params.text_document;
        if !is_lua_document(&item.uri, &item.language_id) {
            debug!("Ignoring {} document {}", item.language_id, item.uri);
            return;
        }

        info!("Opening document: URI={}, version={}", item.uri, item.version);
        let document = Arc::new(LspDocument::new(
            self.next_document_id(),
            item.uri.clone(),
            item.language_id,
            &item.text,
            item.version,
        ));
        self.documents_by_uri.insert(item.uri, document);
    }

    /// Applies incremental or full changes to a tracked document.
    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        debug!("textDocument/didChange: URI={}, version={}", uri, version);

        let Some(document) = self.documents_by_uri.get(&uri).map(|r| r.value().clone()) else {
            debug!("Change for untracked document {}", uri);
            return;
        };
        if document.apply(params.content_changes, version).await.is_none() {
            warn!("Failed to apply changes to document with URI={}", uri);
        }
    }

    /// Stops tracking a document.
    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some((_key, document)) = self.documents_by_uri.remove(&uri) {
            info!("Closed document: {}, id: {}", uri, document.id);
        }
    }

    /// Replaces the settings. Dump location changes apply on the next start.
    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        info!("workspace/didChangeConfiguration");
        self.update_config(params.settings);
    }

    async fn completion(&self, params: CompletionParams) -> LspResult<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let trigger_character = params
            .context
            .filter(|context| context.trigger_kind == CompletionTriggerKind::TRIGGER_CHARACTER)
            .and_then(|context| context.trigger_character);

        debug!(
            "Completion request at {}:{:?} trigger={:?}",
            uri, position, trigger_character
        );

        let completions = self
            .complete_at(&uri, position, trigger_character.as_deref())
            .await;

        debug!("Returning {} completion items", completions.len());

        if completions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CompletionResponse::Array(completions)))
        }
    }
}
