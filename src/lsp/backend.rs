use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use tower_lsp::Client;
use tower_lsp::lsp_types::{CompletionItem, MessageType, Position, Url};
use tracing::{debug, error, info, warn};

use crate::api_dump::{self, ClassDatabase, DumpSourceConfig, create_source};
use crate::config::FusionConfig;
use crate::error::FusionResult;
use crate::lsp::features::completion::{CompletionEngine, CompletionRequest};

mod handlers;
mod state;

pub use state::FusionBackend;

/// Startup options taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct BackendOptions {
    /// Overrides the dump location from settings
    pub api_dump: Option<DumpSourceConfig>,
}

impl FusionBackend {
    /// Creates a backend with default settings and no class database.
    pub fn new(client: Client, options: BackendOptions) -> Self {
        Self {
            client,
            documents_by_uri: Arc::new(DashMap::new()),
            serial_document_id: Arc::new(AtomicU32::new(0)),
            config: Arc::new(RwLock::new(FusionConfig::default())),
            classes: Arc::new(RwLock::new(None)),
            engine: Arc::new(CompletionEngine::default()),
            dump_override: options.api_dump,
            dump_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    fn next_document_id(&self) -> u32 {
        self.serial_document_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Snapshot of the current settings.
    pub fn config(&self) -> FusionConfig {
        self.config.read().clone()
    }

    /// Replaces the settings with ones sent by the client. Invalid settings
    /// are logged and the previous ones kept.
    pub fn update_config(&self, value: Value) {
        match FusionConfig::from_value(value) {
            Ok(config) => {
                debug!("Updated configuration: {:?}", config);
                *self.config.write() = config;
            }
            Err(e) => warn!("Ignoring configuration: {}", e),
        }
    }

    pub fn class_database(&self) -> Option<Arc<ClassDatabase>> {
        self.classes.read().clone()
    }

    pub fn install_class_database(&self, classes: ClassDatabase) {
        info!("Class database ready with {} classes", classes.len());
        *self.classes.write() = Some(Arc::new(classes));
    }

    /// Where the dump is loaded from: the command line wins over settings.
    pub fn dump_source_config(&self) -> DumpSourceConfig {
        if let Some(source) = &self.dump_override {
            return source.clone();
        }
        let config = self.config.read();
        DumpSourceConfig::from_settings(&config.api_dump_url, config.api_dump_path.as_deref())
    }

    /// Loads the API dump and installs the resulting class database.
    /// Returns the number of classes loaded.
    pub async fn load_class_database(&self) -> FusionResult<usize> {
        let source = create_source(self.dump_source_config());
        info!("Loading API dump from {}", source.describe());
        let classes = api_dump::load_class_database(source.as_ref()).await?;
        let count = classes.len();
        self.install_class_database(classes);
        Ok(count)
    }

    /// Starts loading the dump in the background, at most once per server.
    pub(super) fn spawn_dump_loader(&self) {
        if self.dump_requested.swap(true, Ordering::SeqCst) {
            debug!("API dump already requested");
            return;
        }

        let backend = self.clone();
        tokio::spawn(async move {
            if let Err(e) = backend.load_class_database().await {
                error!("Failed to load API dump: {}", e);
                backend
                    .client
                    .show_message(
                        MessageType::ERROR,
                        format!("Fusion autocomplete could not load the Roblox API dump: {}", e),
                    )
                    .await;
            }
        });
    }

    /// Completion items for `position` in an open document.
    pub async fn complete_at(
        &self,
        uri: &Url,
        position: Position,
        trigger_character: Option<&str>,
    ) -> Vec<CompletionItem> {
        let Some(document) = self.documents_by_uri.get(uri).map(|r| r.value().clone()) else {
            debug!("Document not found: {}", uri);
            return Vec::new();
        };

        let text = document.text().await;
        let config = self.config();
        let classes = self.class_database();

        let request = CompletionRequest::new(&text, position, &config, classes.as_deref());
        self.engine.complete(&request, trigger_character)
    }
}
