//! Backend state management
//!
//! This module defines the FusionBackend struct, which holds the open
//! documents, the current settings and the class database shared by every
//! request.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32};

use dashmap::DashMap;
use parking_lot::RwLock;
use tower_lsp::Client;
use tower_lsp::lsp_types::Url;

use crate::api_dump::{ClassDatabase, DumpSourceConfig};
use crate::config::FusionConfig;
use crate::lsp::features::completion::CompletionEngine;
use crate::lsp::models::LspDocument;

/// The Fusion language server backend, managing state and handling LSP requests.
#[derive(Clone)]
pub struct FusionBackend {
    pub(super) client: Client,
    pub(super) documents_by_uri: Arc<DashMap<Url, Arc<LspDocument>>>,
    pub(super) serial_document_id: Arc<AtomicU32>,
    pub(super) config: Arc<RwLock<FusionConfig>>,
    /// `None` until the API dump has loaded
    pub(super) classes: Arc<RwLock<Option<Arc<ClassDatabase>>>>,
    pub(super) engine: Arc<CompletionEngine>,
    /// Dump location given on the command line, overriding settings
    pub(super) dump_override: Option<DumpSourceConfig>,
    pub(super) dump_requested: Arc<AtomicBool>,
}

impl std::fmt::Debug for FusionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FusionBackend")
            .field("documents_count", &self.documents_by_uri.len())
            .field("classes_loaded", &self.classes.read().is_some())
            .field("dump_override", &self.dump_override)
            .finish()
    }
}
