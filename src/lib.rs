pub mod api_dump;
pub mod config;
pub mod error;
pub mod fusion;
pub mod logging;
pub mod lsp;
