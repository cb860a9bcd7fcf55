//! Fusion function names, with automatic imports
//!
//! Suggests Fusion functions that are not imported yet. Accepting one
//! inserts its local name and rewrites the `local X = Fusion.X` import
//! block so the new import sits in order.

use std::cmp::Ordering;

use tower_lsp::lsp_types::{
    Command, CompletionItem, CompletionItemKind, Documentation, MarkupContent, MarkupKind, Range,
    TextEdit,
};
use tracing::trace;

use super::casing::apply_casing;
use super::context::CompletionRequest;
use super::patterns::{
    BRACKET_FIELD, FUNCTION_DECL, LOCAL_DECL, MODULE_FIELD_IMPORT, VAR_BINDING, in_string_at_end,
    is_table_key_position,
};
use super::properties::find_enclosing_class;
use super::{CompletionSource, ProviderKind};
use crate::config::{FusionConfig, GroupingMode};
use crate::fusion::{Category, FunctionDefinition, FusionVersion};

/// Client command that reopens the suggestion list after accepting an item.
pub const TRIGGER_SUGGEST_COMMAND: &str = "editor.action.triggerSuggest";

/// `local <var_name> = <Fusion>.<name>` found in the document.
#[derive(Debug, Clone)]
pub struct ImportedFunction {
    pub name: String,
    pub var_name: String,
    /// Byte offsets of the import statement
    pub start: usize,
    pub end: usize,
    pub definition: &'static FunctionDefinition,
}

/// The Fusion module binding of a document and the functions imported from it.
#[derive(Debug, Clone)]
pub struct FusionImports {
    /// Local name the Fusion module is bound to
    pub module: String,
    /// Byte offset of the end of the line holding the module binding
    pub binding_end: usize,
    /// Imports in document order
    pub functions: Vec<ImportedFunction>,
}

impl FusionImports {
    pub fn is_imported(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f.name == name)
    }

    /// The imported function bound to the local `var_name`.
    pub fn by_var_name(&self, var_name: &str) -> Option<&ImportedFunction> {
        self.functions.iter().find(|f| f.var_name == var_name)
    }
}

/// Finds the Fusion module binding (the first `local` whose name is a
/// configured Fusion alias) and every function imported from it.
pub fn find_fusion_imports(
    text: &str,
    config: &FusionConfig,
    fusion: &FusionVersion,
) -> Option<FusionImports> {
    let binding = VAR_BINDING
        .captures_iter(text)
        .find(|caps| config.is_fusion_alias(&caps[1]))?;
    let module = binding[1].to_string();
    let matched_end = binding.get(0).map_or(0, |m| m.end());

    let mut binding_end = text[matched_end..]
        .find('\n')
        .map_or(text.len(), |newline| matched_end + newline);
    if text[..binding_end].ends_with('\r') {
        binding_end -= 1;
    }

    let functions = MODULE_FIELD_IMPORT
        .captures_iter(text)
        .filter(|caps| caps[2] == module)
        .filter_map(|caps| {
            let definition = fusion.function(&caps[3])?;
            let whole = caps.get(0)?;
            Some(ImportedFunction {
                name: caps[3].to_string(),
                var_name: caps[1].to_string(),
                start: whole.start(),
                end: whole.end(),
                definition,
            })
        })
        .collect();

    Some(FusionImports {
        module,
        binding_end,
        functions,
    })
}

/// Places where a function name makes no sense: naming a declaration,
/// typing a table key, or inside a string.
fn is_suppressed(before: &str) -> bool {
    if FUNCTION_DECL.is_match(before) {
        trace!("Cursor names a function declaration");
        return true;
    }
    if LOCAL_DECL.is_match(before) {
        trace!("Cursor names a local declaration");
        return true;
    }
    if is_table_key_position(before) {
        trace!("Cursor is on a table key");
        return true;
    }
    if in_string_at_end(before) {
        trace!("Cursor is inside a string");
        return true;
    }
    false
}

struct ImportLine<'a> {
    name: &'a str,
    category: Category,
    var_name: String,
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn render_import_block(lines: &[ImportLine<'_>], module: &str, grouping: GroupingMode) -> String {
    let mut block = String::new();
    let mut last_category = None;

    for (i, line) in lines.iter().enumerate() {
        if grouping == GroupingMode::Category
            && last_category.is_some_and(|category| category != line.category)
        {
            block.push('\n');
        }
        last_category = Some(line.category);

        block.push_str(&format!("local {} = {}.{}", line.var_name, module, line.name));
        if i + 1 < lines.len() {
            block.push('\n');
        }
    }

    block
}

/// Whether only whitespace separates consecutive imports.
fn is_contiguous(text: &str, imports: &[ImportedFunction]) -> bool {
    imports
        .windows(2)
        .all(|pair| pair[0].end <= pair[1].start && text[pair[0].end..pair[1].start].trim().is_empty())
}

/// Edit that adds an import for `function` to the document's import block.
///
/// A contiguous block is rewritten in the configured order. Without existing
/// imports the new one goes on the line after the module binding. Imports
/// scattered through the file are left alone and the new one is appended
/// after the last of them.
fn import_edit(
    function: &'static FunctionDefinition,
    imports: &FusionImports,
    request: &CompletionRequest<'_>,
) -> TextEdit {
    let config = request.config;
    let new_line = ImportLine {
        name: function.name,
        category: function.category,
        var_name: apply_casing(function.import_title, config.casing_mode),
    };

    let (Some(first), Some(last)) = (imports.functions.first(), imports.functions.last()) else {
        let at = request.range_of(imports.binding_end, imports.binding_end);
        let block = render_import_block(&[new_line], &imports.module, config.grouping_mode);
        return TextEdit::new(at, format!("\n{}", block));
    };

    if !is_contiguous(request.text, &imports.functions) {
        let at = request.range_of(last.end, last.end);
        let block = render_import_block(&[new_line], &imports.module, config.grouping_mode);
        return TextEdit::new(at, format!("\n{}", block));
    }

    let mut lines: Vec<ImportLine<'_>> = imports
        .functions
        .iter()
        .map(|imported| ImportLine {
            name: &imported.name,
            category: imported.definition.category,
            var_name: imported.var_name.clone(),
        })
        .collect();
    lines.push(new_line);

    match config.grouping_mode {
        GroupingMode::Alphabetical => lines.sort_by(|a, b| compare_names(a.name, b.name)),
        GroupingMode::Category => lines.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| compare_names(a.name, b.name))
        }),
        GroupingMode::None => {}
    }

    let range: Range = request.range_of(first.start, last.end);
    TextEdit::new(
        range,
        render_import_block(&lines, &imports.module, config.grouping_mode),
    )
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionCompletion;

impl CompletionSource for FunctionCompletion {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Functions
    }

    fn provide(&self, request: &CompletionRequest<'_>) -> Vec<CompletionItem> {
        if is_suppressed(request.before) {
            return Vec::new();
        }

        let fusion = request.fusion();
        let Some(imports) = find_fusion_imports(request.text, request.config, fusion) else {
            trace!("No Fusion module binding in document");
            return Vec::new();
        };

        let special_keys = BRACKET_FIELD.is_match(request.before);
        if special_keys && find_enclosing_class(request.before, true, request.config).is_none() {
            return Vec::new();
        }

        fusion
            .functions
            .iter()
            .filter(|function| function.is_table_field == special_keys)
            .filter(|function| !imports.is_imported(function.name))
            .map(|function| {
                let mut insert_text = apply_casing(function.import_title, request.config.casing_mode);
                if function.no_parenthesis && !function.dont_call {
                    insert_text.push(' ');
                }

                CompletionItem {
                    label: function.name.to_string(),
                    kind: Some(CompletionItemKind::FUNCTION),
                    detail: Some(function.description.to_string()),
                    documentation: Some(Documentation::MarkupContent(MarkupContent {
                        kind: MarkupKind::Markdown,
                        value: format!("[{}]({})", function.name, fusion.api_url(function)),
                    })),
                    insert_text: Some(insert_text),
                    additional_text_edits: Some(vec![import_edit(function, &imports, request)]),
                    command: Some(Command {
                        title: "refresh completion".to_string(),
                        command: TRIGGER_SUGGEST_COMMAND.to_string(),
                        arguments: None,
                    }),
                    ..Default::default()
                }
            })
            .collect()
    }
}
