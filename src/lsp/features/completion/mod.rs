//! Context-aware completion for Fusion UI code
//!
//! Four independent providers each recognise one kind of cursor context from
//! the raw text around the cursor:
//! - [`class_name`]: class names inside `New "..."`
//! - [`properties`]: property keys inside a constructor's property table
//! - [`functions`]: Fusion functions, inserting their import
//! - [`function_param`]: property and event names for `[OnEvent "..."]` style keys
//!
//! [`CompletionEngine`] runs the providers a request applies to and merges
//! their items.

pub mod casing;
pub mod class_name;
pub mod context;
pub mod function_param;
pub mod functions;
pub mod patterns;
pub mod properties;

use tower_lsp::lsp_types::CompletionItem;
use tracing::debug;

use crate::config::TriggerCharacters;

pub use class_name::ClassNameCompletion;
pub use context::CompletionRequest;
pub use function_param::FunctionParameterCompletion;
pub use functions::{FunctionCompletion, FusionImports, ImportedFunction, find_fusion_imports};
pub use properties::{EnclosingClass, PropertyCompletion, find_enclosing_class};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    ClassName,
    Properties,
    Functions,
    FunctionParameters,
}

impl ProviderKind {
    /// Characters configured to trigger this provider.
    pub fn trigger_characters(self, triggers: &TriggerCharacters) -> &[String] {
        match self {
            Self::ClassName => &triggers.class_name,
            Self::Properties => &triggers.properties,
            Self::Functions => &triggers.functions,
            Self::FunctionParameters => &triggers.function_parameters,
        }
    }
}

/// A completion provider for one kind of cursor context.
///
/// Providers are pure functions of the request; returning no items means
/// the context did not apply.
pub trait CompletionSource: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn provide(&self, request: &CompletionRequest<'_>) -> Vec<CompletionItem>;
}

pub struct CompletionEngine {
    sources: Vec<Box<dyn CompletionSource>>,
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ClassNameCompletion),
            Box::new(PropertyCompletion),
            Box::new(FunctionCompletion),
            Box::new(FunctionParameterCompletion),
        ])
    }
}

impl std::fmt::Debug for CompletionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionEngine")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl CompletionEngine {
    pub fn new(sources: Vec<Box<dyn CompletionSource>>) -> Self {
        Self { sources }
    }

    /// Runs every applicable provider and concatenates their items in
    /// provider order.
    ///
    /// When the request was caused by a trigger character, only providers
    /// registered for that character run. Invoked and word-typed requests
    /// run all of them.
    pub fn complete(
        &self,
        request: &CompletionRequest<'_>,
        trigger_character: Option<&str>,
    ) -> Vec<CompletionItem> {
        let triggers = &request.config.trigger_characters;
        let mut items = Vec::new();

        for source in &self.sources {
            if let Some(c) = trigger_character {
                if !source.kind().trigger_characters(triggers).iter().any(|t| t == c) {
                    continue;
                }
            }

            let provided = source.provide(request);
            if !provided.is_empty() {
                debug!("{:?} provided {} items", source.kind(), provided.len());
            }
            items.extend(provided);
        }

        items
    }
}
