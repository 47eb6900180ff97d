//! # datahub-core
//!
//! Core crate for DataHub. Contains configuration schemas, the opaque
//! payload types passed through plugin hooks (data dicts, request context,
//! facets, schemas), typed identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DataHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
