//! Cursor context for completion requests
//!
//! Providers only ever look at raw text: everything before the cursor, and
//! occasionally a little of what follows it. Positions are counted in
//! characters, matching how documents are edited in [`crate::lsp::document`].

use tower_lsp::lsp_types::{Position, Range};

use crate::api_dump::ClassDatabase;
use crate::config::FusionConfig;
use crate::fusion::{FusionVersion, fusion_version};

/// Converts a line/character position to a byte offset in `text`.
///
/// Lines past the end clamp to the end of the text; columns past the end of
/// a line clamp to the end of that line.
pub fn position_to_offset(text: &str, position: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match text[line_start..].find('\n') {
            Some(newline) => line_start += newline + 1,
            None => return text.len(),
        }
    }

    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |newline| line_start + newline);

    text[line_start..line_end]
        .char_indices()
        .nth(position.character as usize)
        .map_or(line_end, |(i, _)| line_start + i)
}

/// Converts a byte offset in `text` to a line/character position.
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let character = before[line_start..].chars().count() as u32;
    Position::new(line, character)
}

/// Moves `position` left by `chars` characters on the same line.
pub fn shift_left(position: Position, chars: usize) -> Position {
    Position::new(position.line, position.character.saturating_sub(chars as u32))
}

/// Moves `position` right by `chars` characters on the same line.
pub fn shift_right(position: Position, chars: usize) -> Position {
    Position::new(position.line, position.character + chars as u32)
}

/// Everything a provider needs to answer one completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// Full document text
    pub text: &'a str,
    pub position: Position,
    /// Text from the start of the document up to the cursor
    pub before: &'a str,
    /// Text from the cursor to the end of the document
    pub after: &'a str,
    pub config: &'a FusionConfig,
    /// `None` until the API dump has loaded
    pub classes: Option<&'a ClassDatabase>,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(
        text: &'a str,
        position: Position,
        config: &'a FusionConfig,
        classes: Option<&'a ClassDatabase>,
    ) -> Self {
        let offset = position_to_offset(text, position);
        Self {
            text,
            position,
            before: &text[..offset],
            after: &text[offset..],
            config,
            classes,
        }
    }

    /// Fusion release selected in the configuration
    pub fn fusion(&self) -> &'static FusionVersion {
        fusion_version(&self.config.fusion_version)
    }

    /// Range between two byte offsets of the document.
    pub fn range_of(&self, start: usize, end: usize) -> Range {
        Range::new(
            offset_to_position(self.text, start),
            offset_to_position(self.text, end),
        )
    }
}
