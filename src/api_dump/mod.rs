//! Roblox API dump loading and class flattening
//!
//! - [`model`]: serde types mirroring `API-Dump.json`
//! - [`source`]: HTTP and file loaders behind the [`DumpSource`] trait
//! - [`database`]: [`ClassDatabase`], the per-class member table used by completion

pub mod database;
pub mod model;
pub mod source;

pub use database::ClassDatabase;
pub use model::{ApiClass, ApiDump, ClassMember, MemberType, Parameter, ValueType};
pub use source::{DumpSource, DumpSourceConfig, FileDumpSource, HttpDumpSource, create_source};

use crate::error::FusionResult;

/// Loads the dump from `source` and flattens it.
pub async fn load_class_database(source: &dyn DumpSource) -> FusionResult<ClassDatabase> {
    let dump = source.load().await?;
    Ok(ClassDatabase::from_dump(&dump))
}
