use ropey::Rope;

use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent, Url};
use tracing::warn;

pub use crate::lsp::models::{LspDocument, LspDocumentState};

/// Language ids of documents the server tracks.
pub const LUA_LANGUAGE_IDS: &[&str] = &["lua", "luau"];

/// Whether a document is Lua or Luau, by language id or file extension.
pub fn is_lua_document(uri: &Url, language_id: &str) -> bool {
    if LUA_LANGUAGE_IDS.contains(&language_id) {
        return true;
    }
    let path = uri.path();
    path.ends_with(".lua") || path.ends_with(".luau")
}

/// Converts an LSP position to a char index in the Rope, clamped to the text.
fn position_to_char_index(position: &Position, text: &Rope) -> usize {
    let line = position.line as usize;
    if line >= text.len_lines() {
        return text.len_chars();
    }
    let line_start = text.line_to_char(line);
    let slice = text.line(line);
    let mut line_len = slice.len_chars();
    while line_len > 0 && matches!(slice.char(line_len - 1), '\n' | '\r') {
        line_len -= 1;
    }
    line_start + (position.character as usize).min(line_len)
}

impl LspDocumentState {
    /// Applies a list of content changes to the document state, updating the text.
    /// Returns the updated text if the version is newer, otherwise an error.
    pub fn apply(
        &mut self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) -> Result<String, String> {
        if version <= self.version {
            return Err(format!("Version {} not newer than {}", version, self.version));
        }
        for change in &changes {
            if let Some(range) = change.range {
                let start = position_to_char_index(&range.start, &self.text);
                let end = position_to_char_index(&range.end, &self.text).max(start);
                self.text.remove(start..end);
                self.text.insert(start, &change.text);
            } else {
                self.text = Rope::from_str(&change.text);
            }
        }
        self.version = version;
        Ok(self.text.to_string())
    }
}

impl LspDocument {
    pub fn new(id: u32, uri: Url, language_id: String, text: &str, version: i32) -> Self {
        Self {
            id,
            state: tokio::sync::RwLock::new(LspDocumentState {
                uri,
                language_id,
                text: Rope::from_str(text),
                version,
            }),
        }
    }

    /// Returns the current text of the document as a string.
    pub async fn text(&self) -> String {
        self.state.read().await.text.to_string()
    }

    /// Returns the current version of the document.
    pub async fn version(&self) -> i32 {
        self.state.read().await.version
    }

    /// Returns the number of lines in the document.
    pub async fn num_lines(&self) -> usize {
        self.state.read().await.text.len_lines()
    }

    /// Applies changes to the document, returning the new text.
    pub async fn apply(
        &self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) -> Option<String> {
        let mut state = self.state.write().await;
        match state.apply(changes, version) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Rejected changes to {}: {}", state.uri, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_lsp::lsp_types::{Range, TextDocumentContentChangeEvent};

    /// Helper to create a test LspDocument.
    fn create_test_document(uri: &str, text: &str) -> Arc<LspDocument> {
        Arc::new(LspDocument::new(
            1,
            Url::parse(uri).unwrap(),
            "luau".to_string(),
            text,
            0,
        ))
    }

    fn edit(start: (u32, u32), end: (u32, u32), text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: Some(Range {
                start: Position { line: start.0, character: start.1 },
                end: Position { line: end.0, character: end.1 },
            }),
            range_length: None,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_apply_full_change() {
        let doc = create_test_document("file:///ui.luau", "initial text");
        let changes = vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new text".to_string(),
        }];

        let result = doc.apply(changes, 1).await;
        assert_eq!(result.as_deref(), Some("new text"), "Text should be updated");
        assert_eq!(doc.version().await, 1, "Version should be updated");
    }

    #[tokio::test]
    async fn test_apply_incremental_change() {
        let doc = create_test_document("file:///ui.luau", "local New = Fusion.New");
        let result = doc.apply(vec![edit((0, 6), (0, 9), "Make")], 1).await;
        assert_eq!(result.as_deref(), Some("local Make = Fusion.New"));
        assert_eq!(doc.version().await, 1, "Version should be updated");
    }

    #[tokio::test]
    async fn test_apply_multiple_incremental() {
        let doc = create_test_document("file:///ui.luau", "New \"Frame\" {\n}");
        let changes = vec![
            edit((0, 13), (0, 13), "\n  Size = 1,"),
            edit((2, 0), (2, 0), "  Name = \"x\",\n"),
        ];

        let result = doc.apply(changes, 1).await;
        assert_eq!(
            result.as_deref(),
            Some("New \"Frame\" {\n  Size = 1,\n  Name = \"x\",\n}"),
            "Text should be updated after multiple changes"
        );
        assert_eq!(doc.num_lines().await, 4);
    }

    #[tokio::test]
    async fn test_apply_multibyte_positions_are_chars() {
        let doc = create_test_document("file:///ui.luau", "-- é\nx");
        let result = doc.apply(vec![edit((0, 4), (0, 4), "!")], 1).await;
        assert_eq!(result.as_deref(), Some("-- é!\nx"));
    }

    #[tokio::test]
    async fn test_apply_clamps_out_of_range() {
        let doc = create_test_document("file:///ui.luau", "abc");
        let result = doc.apply(vec![edit((0, 1), (5, 0), "")], 1).await;
        assert_eq!(result.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_apply_outdated_version() {
        let doc = create_test_document("file:///ui.luau", "initial text");
        let changes = vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new text".to_string(),
        }];

        let _ = doc.apply(changes.clone(), 1).await;
        // Version -1 is outdated, so text must not change
        let result = doc.apply(changes, -1).await;
        assert!(result.is_none(), "Apply should fail for outdated version");
        assert_eq!(doc.text().await, "new text", "Text should remain from previous change");
        assert_eq!(doc.version().await, 1, "Version should not change");
    }

    #[test]
    fn test_is_lua_document() {
        let url = |s: &str| Url::parse(s).unwrap();
        assert!(is_lua_document(&url("file:///a.txt"), "luau"));
        assert!(is_lua_document(&url("file:///a.lua"), "plaintext"));
        assert!(is_lua_document(&url("file:///src/App.luau"), ""));
        assert!(!is_lua_document(&url("file:///a.rs"), "rust"));
    }
}
