//! Text patterns used to guess what is being typed
//!
//! These are heuristics over raw text, not a Lua parser. The `regex` crate
//! has no look-around, so the checks that need it are small hand-written
//! scans instead.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid completion pattern {pattern:?}: {e}"))
}

/// `New "Frame" {` or `New("Frame") {` ending at the text end.
/// Captures the callee and the class name.
pub static CONSTRUCTOR_CALL: Lazy<Regex> =
    Lazy::new(|| compile(r#"(\w+)[(\s]?["'`]([A-Za-z0-9_]*)["'`][\s)(]*[{\s]*$"#));

/// A bare key being typed in a table, e.g. `{ Back` or `, Siz`.
pub static KEY: Lazy<Regex> = Lazy::new(|| compile(r"[{,;]\s*([A-Za-z]+)\s*$"));

/// A bracketed special key being typed, e.g. `{ [OnEv`.
pub static SPECIAL_KEY: Lazy<Regex> = Lazy::new(|| compile(r"[{,;]\s*(\[[A-Za-z]+)\s*$"));

/// Text after the cursor already assigns a value.
pub static HAS_VALUE: Lazy<Regex> = Lazy::new(|| compile(r"^\s*="));

/// A call with a partial string argument, e.g. `New "Fra` or `OnEvent("Act`.
/// Captures the callee and the partial argument.
pub static FUNCTION_NAME: Lazy<Regex> =
    Lazy::new(|| compile(r#"(\w+)[(\s]*?["'`]([A-Za-z0-9_]*)$"#));

/// `[Word` at the text end.
pub static BRACKET_FIELD: Lazy<Regex> = Lazy::new(|| compile(r"\[\w+$"));

/// Naming a new local.
pub static LOCAL_DECL: Lazy<Regex> = Lazy::new(|| compile(r"local\s*([A-Za-z0-9_]+)?$"));

/// Naming a new function.
pub static FUNCTION_DECL: Lazy<Regex> = Lazy::new(|| compile(r"function\s*([A-Za-z0-9_]+)?$"));

/// Any `local name = value` binding. Captures the name.
pub static VAR_BINDING: Lazy<Regex> =
    Lazy::new(|| compile(r"local\s*([A-Za-z0-9_]+)(\s*?=\s*([^\s]*))?"));

/// `local var = Module.Field`. Captures the variable, module and field.
pub static MODULE_FIELD_IMPORT: Lazy<Regex> =
    Lazy::new(|| compile(r"local\s*([A-Za-z0-9_]+)\s*=\s*(\w+)\.(\w+)"));

/// Callee and partial argument of a call whose string argument is being typed.
pub fn function_call_at_end(before: &str) -> Option<Captures<'_>> {
    FUNCTION_NAME.captures(before)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Code,
    Quoted(char),
    LongString,
    LineComment,
    BlockComment,
}

/// Where a scan of Lua text stopped.
struct ScanEnd {
    state: Lexeme,
    /// Byte offset just past the last string literal that was closed.
    string_closed_at: Option<usize>,
}

/// Walks `text` as Lua source, calling `on_code` for every char outside
/// string literals and comments.
///
/// Quoted strings end at a newline. `[[long strings]]` and `--[[comments]]`
/// may span lines. Backslash escapes are honoured in quoted strings.
fn scan_lua(text: &str, mut on_code: impl FnMut(usize, char)) -> ScanEnd {
    let mut state = Lexeme::Code;
    let mut string_closed_at = None;
    let mut skip_to = 0;

    for (i, c) in text.char_indices() {
        if i < skip_to {
            continue;
        }
        let rest = &text[i..];
        match state {
            Lexeme::Code => {
                if rest.starts_with("--[[") {
                    state = Lexeme::BlockComment;
                    skip_to = i + 4;
                } else if rest.starts_with("--") {
                    state = Lexeme::LineComment;
                    skip_to = i + 2;
                } else if rest.starts_with("[[") {
                    state = Lexeme::LongString;
                    skip_to = i + 2;
                } else if matches!(c, '"' | '\'' | '`') {
                    state = Lexeme::Quoted(c);
                } else {
                    on_code(i, c);
                }
            }
            Lexeme::Quoted(quote) => match c {
                '\\' => skip_to = i + 1 + rest[1..].chars().next().map_or(0, char::len_utf8),
                '\n' => state = Lexeme::Code,
                _ if c == quote => {
                    state = Lexeme::Code;
                    string_closed_at = Some(i + c.len_utf8());
                }
                _ => {}
            },
            Lexeme::LongString => {
                if rest.starts_with("]]") {
                    state = Lexeme::Code;
                    skip_to = i + 2;
                    string_closed_at = Some(i + 2);
                }
            }
            Lexeme::LineComment => {
                if c == '\n' {
                    state = Lexeme::Code;
                    on_code(i, c);
                }
            }
            Lexeme::BlockComment => {
                if rest.starts_with("]]") {
                    state = Lexeme::Code;
                    skip_to = i + 2;
                }
            }
        }
    }

    ScanEnd {
        state,
        string_closed_at,
    }
}

/// Whether the cursor (the end of `before`) is inside a string literal, or
/// directly after one that has just been closed.
pub fn in_string_at_end(before: &str) -> bool {
    let end = scan_lua(before, |_, _| {});
    match end.state {
        Lexeme::Code => end.string_closed_at == Some(before.len()),
        Lexeme::Quoted(_) | Lexeme::LongString => true,
        Lexeme::LineComment | Lexeme::BlockComment => false,
    }
}

/// Brackets (`{}`, `()`, `[]`) outside strings and comments, in text order.
pub fn code_brackets(text: &str) -> Vec<(usize, char)> {
    let mut brackets = Vec::new();
    scan_lua(text, |i, c| {
        if matches!(c, '{' | '}' | '(' | ')' | '[' | ']') {
            brackets.push((i, c));
        }
    });
    brackets
}

/// The innermost bracket (`{`, `(` or `[`) still open at the end of `text`.
pub fn innermost_open_bracket(text: &str) -> Option<(usize, char)> {
    let mut depth = 0usize;
    for (i, c) in code_brackets(text).into_iter().rev() {
        match c {
            '}' | ')' | ']' => depth += 1,
            _ => {
                if depth == 0 {
                    return Some((i, c));
                }
                depth -= 1;
            }
        }
    }
    None
}

/// Whether the identifier at the end of `before` is a key in an open table,
/// e.g. `{ Back` or `{ Size = x,\n Anch`, as opposed to a value after `=`.
///
/// `[Key` special keys do not count.
pub fn is_table_key_position(before: &str) -> bool {
    let trimmed = before.trim_end_matches(|c: char| c.is_whitespace() || c == ']');

    let word_start = trimmed
        .char_indices()
        .rev()
        .take_while(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
        .last()
        .map(|(i, _)| i);

    let Some(word_start) = word_start else {
        return false;
    };
    if !trimmed[word_start..].starts_with(|c: char| c.is_ascii_alphabetic()) {
        return false;
    }

    let preceding = trimmed[..word_start].trim_end();
    if preceding.ends_with('=') || preceding.ends_with('[') {
        return false;
    }

    matches!(innermost_open_bracket(preceding), Some((_, '{')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_call() {
        let caps = CONSTRUCTOR_CALL.captures("local x = New \"Frame\" ").unwrap();
        assert_eq!(&caps[1], "New");
        assert_eq!(&caps[2], "Frame");

        let caps = CONSTRUCTOR_CALL.captures("New(\"TextLabel\")").unwrap();
        assert_eq!(&caps[2], "TextLabel");

        assert!(CONSTRUCTOR_CALL.captures("Computed(function()").is_none());
    }

    #[test]
    fn test_key_patterns() {
        assert!(KEY.is_match("New \"Frame\" {\n  Back"));
        assert!(KEY.is_match("{ Size = x, Anch"));
        assert!(!KEY.is_match("{ Size = Anch"));
        assert!(!KEY.is_match("{\n  "));

        assert!(SPECIAL_KEY.is_match("{\n  [OnEvent"));
        assert!(!SPECIAL_KEY.is_match("{\n  OnEvent"));
    }

    #[test]
    fn test_function_name() {
        let caps = function_call_at_end("New \"Fra").unwrap();
        assert_eq!(&caps[1], "New");
        assert_eq!(&caps[2], "Fra");

        let caps = function_call_at_end("[OnEvent(\"").unwrap();
        assert_eq!(&caps[1], "OnEvent");
        assert_eq!(&caps[2], "");

        // After the closing quote the "call" is the class name itself, which no alias matches
        let caps = function_call_at_end("New \"Frame\"").unwrap();
        assert_eq!(&caps[1], "Frame");
        assert_eq!(&caps[2], "");
    }

    #[test]
    fn test_declarations() {
        assert!(LOCAL_DECL.is_match("local Comp"));
        assert!(LOCAL_DECL.is_match("local "));
        assert!(!LOCAL_DECL.is_match("local x = Comp"));
        assert!(FUNCTION_DECL.is_match("local function upd"));
        assert!(BRACKET_FIELD.is_match("{ [Chil"));
        assert!(HAS_VALUE.is_match("  = 5"));
        assert!(!HAS_VALUE.is_match("\n}"));
    }

    #[test]
    fn test_imports() {
        let caps = MODULE_FIELD_IMPORT
            .captures("local Value = Fusion.Value")
            .unwrap();
        assert_eq!((&caps[1], &caps[2], &caps[3]), ("Value", "Fusion", "Value"));

        let caps = VAR_BINDING
            .captures("local Fusion = require(ReplicatedStorage.Fusion)")
            .unwrap();
        assert_eq!(&caps[1], "Fusion");
    }

    #[test]
    fn test_in_string_at_end() {
        assert!(in_string_at_end("New \"Fra"));
        assert!(in_string_at_end("New 'Frame'"));
        assert!(in_string_at_end("print([[multi\nline"));
        assert!(in_string_at_end("x = \"a\\\"b"));
        assert!(!in_string_at_end("New \"Frame\" {"));
        assert!(!in_string_at_end("x = \"unterminated\ny = Val"));
        assert!(!in_string_at_end("local x = [[done]] + Com"));
        assert!(!in_string_at_end(""));

        assert!(!in_string_at_end("-- it's a note\nlocal x = Val"));
        assert!(!in_string_at_end("--[[ \"open ]] Comp"));
        assert!(!in_string_at_end("x = 1 -- \"Fra"));
    }

    #[test]
    fn test_innermost_open_bracket() {
        assert_eq!(innermost_open_bracket("a { b ( c ) "), Some((2, '{')));
        assert_eq!(innermost_open_bracket("a { b } "), None);
        assert_eq!(innermost_open_bracket("f(x, {"), Some((5, '{')));
        assert_eq!(innermost_open_bracket("a { b = \"}\", "), Some((2, '{')));
        assert_eq!(innermost_open_bracket("a { -- (\n"), Some((2, '{')));
    }

    #[test]
    fn test_code_brackets_skip_strings_and_comments() {
        let found: Vec<char> = code_brackets("f(\"{\", '[', [[}]], `)`) --[[ { ]] -- }\n{")
            .into_iter()
            .map(|(_, c)| c)
            .collect();
        assert_eq!(found, vec!['(', ')', '{']);
    }

    #[test]
    fn test_table_key_position() {
        assert!(is_table_key_position("New \"Frame\" {\n  Back"));
        assert!(is_table_key_position("{ Size = x, Anch"));
        assert!(is_table_key_position("{\n  Size = UDim2.new(),\n  Posi "));
        assert!(!is_table_key_position("{ Size = Spr"));
        assert!(!is_table_key_position("{ [Chil"));
        assert!(!is_table_key_position("local x = Comp"));
        assert!(!is_table_key_position("Computed(function() return Val"));
        assert!(!is_table_key_position("{ x = 1 }\nComp"));
    }
}
