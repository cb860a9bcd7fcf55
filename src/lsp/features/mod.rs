//! LSP features
//!
//! Completion is the only feature the server provides.

pub mod completion;
