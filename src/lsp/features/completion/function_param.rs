//! Member names as special key arguments: `[OnEvent "Act|"]`, `[OnChange "Te|"]`

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionTextEdit, Range, TextEdit,
};
use tracing::trace;

use super::context::{CompletionRequest, shift_left, shift_right};
use super::functions::find_fusion_imports;
use super::patterns::function_call_at_end;
use super::properties::{find_enclosing_class, tags_documentation};
use super::{CompletionSource, ProviderKind};
use crate::api_dump::ClassMember;
use crate::fusion::ParameterCompletion;

/// Closing characters swallowed by an accepted item, in priority order.
const CLOSERS: [char; 6] = ['=', ']', ')', '"', '\'', '`'];

/// Number of characters after the cursor, up to and including the first
/// closer on the same line, if that closer is close enough to belong to the
/// key being completed.
fn closing_span(line_rest: &str, name: &str) -> Option<usize> {
    let reach = name.chars().count() + 4;
    CLOSERS.iter().find_map(|&closer| {
        line_rest
            .chars()
            .position(|c| c == closer)
            .filter(|&at| at < reach)
            .map(|at| at + 1)
    })
}

fn event_signature(member: &ClassMember) -> String {
    let params: Vec<String> = member
        .parameters
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty.name))
        .collect();
    format!("({})", params.join(", "))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionParameterCompletion;

impl CompletionSource for FunctionParameterCompletion {
    fn kind(&self) -> ProviderKind {
        ProviderKind::FunctionParameters
    }

    fn provide(&self, request: &CompletionRequest<'_>) -> Vec<CompletionItem> {
        let Some(classes) = request.classes else {
            return Vec::new();
        };
        let Some(call) = function_call_at_end(request.before) else {
            return Vec::new();
        };
        let (Some(callee), Some(partial)) = (call.get(1), call.get(2)) else {
            return Vec::new();
        };

        let Some(imports) = find_fusion_imports(request.text, request.config, request.fusion())
        else {
            return Vec::new();
        };
        let Some(imported) = imports.by_var_name(callee.as_str()) else {
            trace!("{} is not an imported Fusion function", callee.as_str());
            return Vec::new();
        };
        let Some(wanted) = imported.definition.parameter_completion else {
            return Vec::new();
        };

        // The special key itself, e.g. `[OnEvent`, must sit in a constructor's table
        let key = &request.before[..callee.end()];
        let Some(enclosing) = find_enclosing_class(key, true, request.config) else {
            return Vec::new();
        };
        trace!(
            "Completing {:?} of {} for {}",
            wanted,
            enclosing.class_name,
            imported.name
        );

        let start = shift_left(request.position, partial.as_str().chars().count());
        let line_rest = request.after.split('\n').next().unwrap_or_default();

        classes
            .members(&enclosing.class_name)
            .iter()
            .filter(|member| match wanted {
                ParameterCompletion::Properties => member.is_assignable(),
                ParameterCompletion::Events => member.is_event(),
            })
            .map(|member| {
                let (end, new_text) = match closing_span(line_rest, &member.name) {
                    Some(span) => {
                        let swallowed: String = line_rest.chars().take(span).collect();
                        (
                            shift_right(request.position, span),
                            format!("{}{}", member.name, swallowed),
                        )
                    }
                    None => (request.position, member.name.clone()),
                };

                let (kind, detail) = match wanted {
                    ParameterCompletion::Properties => (
                        CompletionItemKind::PROPERTY,
                        member.value_type_name().map(str::to_string),
                    ),
                    ParameterCompletion::Events => {
                        (CompletionItemKind::EVENT, Some(event_signature(member)))
                    }
                };

                CompletionItem {
                    label: member.name.clone(),
                    kind: Some(kind),
                    detail,
                    documentation: Some(tags_documentation(member)),
                    filter_text: Some(member.name.clone()),
                    text_edit: Some(CompletionTextEdit::Edit(TextEdit::new(
                        Range::new(start, end),
                        new_text,
                    ))),
                    ..Default::default()
                }
            })
            .collect()
    }
}
