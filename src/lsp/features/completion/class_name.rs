//! Class names inside constructor calls: `New "Fra|`

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};
use tracing::trace;

use super::context::CompletionRequest;
use super::patterns::function_call_at_end;
use super::{CompletionSource, ProviderKind};

#[derive(Debug, Default, Clone, Copy)]
pub struct ClassNameCompletion;

impl CompletionSource for ClassNameCompletion {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ClassName
    }

    fn provide(&self, request: &CompletionRequest<'_>) -> Vec<CompletionItem> {
        let Some(classes) = request.classes else {
            return Vec::new();
        };
        let Some(call) = function_call_at_end(request.before) else {
            return Vec::new();
        };

        let callee = &call[1];
        if !request.config.is_new_alias(callee) {
            trace!("{} is not a constructor alias", callee);
            return Vec::new();
        }

        classes
            .class_names()
            .map(|name| CompletionItem {
                label: name.to_string(),
                kind: Some(CompletionItemKind::CLASS),
                detail: Some("Class".to_string()),
                ..Default::default()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsp::features::completion::test_support::{request_at_end, sample_classes};
    use crate::config::FusionConfig;

    #[test]
    fn test_suggests_all_classes_after_new() {
        let classes = sample_classes();
        let config = FusionConfig::default();
        let items = ClassNameCompletion.provide(&request_at_end("local frame = New \"Fr", &config, Some(&classes)));

        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, classes.class_names().collect::<Vec<_>>());
        assert!(items.iter().all(|i| i.kind == Some(CompletionItemKind::CLASS)));
    }

    #[test]
    fn test_alias_is_case_insensitive_and_configurable() {
        let classes = sample_classes();
        let mut config = FusionConfig::default();
        assert!(!ClassNameCompletion.provide(&request_at_end("hydrate(\"", &config, Some(&classes))).is_empty());

        config.new_aliases = vec!["Make".to_string()];
        assert!(ClassNameCompletion.provide(&request_at_end("New \"", &config, Some(&classes))).is_empty());
        assert!(!ClassNameCompletion.provide(&request_at_end("make '", &config, Some(&classes))).is_empty());
    }

    #[test]
    fn test_nothing_outside_constructor_string() {
        let classes = sample_classes();
        let config = FusionConfig::default();
        assert!(ClassNameCompletion.provide(&request_at_end("print(\"Fr", &config, Some(&classes))).is_empty());
        assert!(ClassNameCompletion.provide(&request_at_end("New \"Frame\" {", &config, Some(&classes))).is_empty());
    }

    #[test]
    fn test_nothing_before_dump_loads() {
        let config = FusionConfig::default();
        assert!(ClassNameCompletion.provide(&request_at_end("New \"Fr", &config, None)).is_empty());
    }
}
