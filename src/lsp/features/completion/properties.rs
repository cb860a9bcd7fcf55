//! Property keys inside constructor property tables: `New "Frame" { Back|`

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, MarkupContent, MarkupKind,
};
use tracing::trace;

use super::context::CompletionRequest;
use super::patterns::{CONSTRUCTOR_CALL, HAS_VALUE, KEY, SPECIAL_KEY, code_brackets};
use super::{CompletionSource, ProviderKind};
use crate::api_dump::ClassMember;
use crate::config::FusionConfig;

/// Snippets inserted as the value of properties of well-known data types.
const DATA_TYPE_TEMPLATES: &[(&str, &str)] = &[
    ("CFrame", "CFrame.new(${1})"),
    ("Color3", "Color3.new(${1})"),
    ("ColorSequence", "ColorSequence.new(${1})"),
    ("ColorSequenceKeypoint", "ColorSequenceKeypoint.new(${1})"),
    ("NumberRange", "NumberRange.new(${1})"),
    ("NumberSequence", "NumberSequence.new(${1})"),
    ("NumberSequenceKeypoint", "NumberSequenceKeypoint.new(${1})"),
    ("PhysicalProperties", "PhysicalProperties.new(${1})"),
    ("Ray", "Ray.new(${1})"),
    ("Rect", "Rect.new(${1})"),
    ("Region3", "Region3.new(${1})"),
    ("Region3int16", "Region3int16.new(${1})"),
    ("UDim", "UDim.new(${1})"),
    ("UDim2", "UDim2.new(${1})"),
    ("Vector2", "Vector2.new(${1})"),
    ("Vector2int16", "Vector2int16.new(${1})"),
    ("Vector3", "Vector3.new(${1})"),
    ("Vector3int16", "Vector3int16.new(${1})"),
];

fn value_template(value_type: Option<&str>) -> &'static str {
    value_type
        .and_then(|ty| DATA_TYPE_TEMPLATES.iter().find(|(name, _)| *name == ty))
        .map_or("", |(_, template)| template)
}

/// The constructor call whose property table encloses the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingClass {
    pub callee: String,
    pub class_name: String,
}

/// Finds the constructor call whose property table the key at the end of
/// `before` belongs to.
///
/// With `special_key` set, the key must be a bracketed `[Key`; otherwise a
/// bare identifier. The innermost `{` still open at the end of `before` must
/// directly follow a constructor call (`New "Frame" {`) whose callee is a
/// configured constructor alias. Braces in strings and comments don't count.
pub fn find_enclosing_class(
    before: &str,
    special_key: bool,
    config: &FusionConfig,
) -> Option<EnclosingClass> {
    let key = if special_key { &*SPECIAL_KEY } else { &*KEY };
    if !key.is_match(before) {
        return None;
    }

    let mut depth = 0usize;
    for (index, c) in code_brackets(before).into_iter().rev() {
        match c {
            '}' => depth += 1,
            '{' if depth > 0 => depth -= 1,
            '{' => {
                let call = CONSTRUCTOR_CALL.captures(&before[..index])?;
                let callee = &call[1];
                if !config.is_new_alias(callee) {
                    trace!("{} is not a constructor alias", callee);
                    return None;
                }
                return Some(EnclosingClass {
                    callee: callee.to_string(),
                    class_name: call[2].to_string(),
                });
            }
            _ => {}
        }
    }

    None
}

/// `**Tags**: a, b`, or `None` when untagged.
pub(super) fn tags_documentation(member: &ClassMember) -> Documentation {
    let tags = if member.tags.is_empty() {
        "None".to_string()
    } else {
        member.tags.join(", ")
    };
    Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value: format!("**Tags**: {}", tags),
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PropertyCompletion;

impl CompletionSource for PropertyCompletion {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Properties
    }

    fn provide(&self, request: &CompletionRequest<'_>) -> Vec<CompletionItem> {
        let Some(classes) = request.classes else {
            return Vec::new();
        };
        let Some(enclosing) = find_enclosing_class(request.before, false, request.config) else {
            return Vec::new();
        };

        trace!("Completing properties of {}", enclosing.class_name);
        let has_value = HAS_VALUE.is_match(request.after);

        classes
            .members(&enclosing.class_name)
            .iter()
            .filter(|member| member.is_assignable())
            .map(|member| {
                let template = value_template(member.value_type_name());
                let (insert_text, format) = if has_value {
                    (member.name.clone(), InsertTextFormat::PLAIN_TEXT)
                } else {
                    (format!("{} = {}", member.name, template), InsertTextFormat::SNIPPET)
                };

                CompletionItem {
                    label: member.name.clone(),
                    kind: Some(CompletionItemKind::PROPERTY),
                    detail: member.value_type_name().map(str::to_string),
                    documentation: Some(tags_documentation(member)),
                    insert_text: Some(insert_text),
                    insert_text_format: Some(format),
                    ..Default::default()
                }
            })
            .collect()
    }
}
