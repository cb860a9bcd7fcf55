#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::{Value, json};
use tower_lsp::lsp_types::{
    CompletionContext, CompletionItem, CompletionParams, CompletionResponse,
    CompletionTriggerKind, DidChangeTextDocumentParams, DidOpenTextDocumentParams,
    InitializeParams, InitializeResult, PartialResultParams, Position,
    TextDocumentContentChangeEvent, TextDocumentIdentifier, TextDocumentItem,
    TextDocumentPositionParams, Url, VersionedTextDocumentIdentifier, WorkDoneProgressParams,
};
use tower_lsp::{ClientSocket, LanguageServer, LspService};

use fusion_language_server::api_dump::DumpSourceConfig;
use fusion_language_server::lsp::backend::{BackendOptions, FusionBackend};

pub fn fixture_dump() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/api_dump.json")
}

/// A backend driven directly through its `LanguageServer` implementation.
pub struct TestServer {
    service: LspService<FusionBackend>,
    _socket: ClientSocket,
}

impl TestServer {
    /// Backend reading the fixture dump, not yet initialized.
    pub fn new() -> Self {
        let options = BackendOptions {
            api_dump: Some(DumpSourceConfig::File(fixture_dump())),
        };
        let (service, socket) = LspService::new(|client| FusionBackend::new(client, options));
        Self {
            service,
            _socket: socket,
        }
    }

    /// Initialized backend with the fixture classes loaded.
    pub async fn start(settings: Value) -> Self {
        let server = Self::new();
        server.initialize(settings).await;
        server
            .backend()
            .load_class_database()
            .await
            .expect("fixture dump should load");
        server
    }

    pub fn backend(&self) -> &FusionBackend {
        self.service.inner()
    }

    pub async fn initialize(&self, settings: Value) -> InitializeResult {
        let params = InitializeParams {
            initialization_options: Some(settings),
            ..Default::default()
        };
        self.backend().initialize(params).await.expect("initialize should succeed")
    }

    pub async fn open(&self, path: &str, language_id: &str, text: &str) -> Url {
        let uri = Url::parse(&format!("file:///workspace/{}", path)).unwrap();
        self.backend()
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: uri.clone(),
                    language_id: language_id.to_string(),
                    version: 1,
                    text: text.to_string(),
                },
            })
            .await;
        uri
    }

    pub async fn replace(&self, uri: &Url, version: i32, text: &str) {
        self.backend()
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: uri.clone(),
                    version,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: text.to_string(),
                }],
            })
            .await;
    }

    pub async fn completion(
        &self,
        uri: &Url,
        position: Position,
        trigger_character: Option<&str>,
    ) -> Option<Vec<CompletionItem>> {
        let context = match trigger_character {
            Some(c) => CompletionContext {
                trigger_kind: CompletionTriggerKind::TRIGGER_CHARACTER,
                trigger_character: Some(c.to_string()),
            },
            None => CompletionContext {
                trigger_kind: CompletionTriggerKind::INVOKED,
                trigger_character: None,
            },
        };

        let response = self
            .backend()
            .completion(CompletionParams {
                text_document_position: TextDocumentPositionParams {
                    text_document: TextDocumentIdentifier { uri: uri.clone() },
                    position,
                },
                work_done_progress_params: WorkDoneProgressParams::default(),
                partial_result_params: PartialResultParams::default(),
                context: Some(context),
            })
            .await
            .expect("completion should not fail");

        response.map(|response| match response {
            CompletionResponse::Array(items) => items,
            CompletionResponse::List(list) => list.items,
        })
    }
}

pub fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|i| i.label.as_str()).collect()
}

pub fn default_settings() -> Value {
    json!(null)
}
