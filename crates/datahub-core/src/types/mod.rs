//! Core type definitions used across the DataHub workspace.

pub mod context;
pub mod dict;
pub mod id;

pub use context::Context;
pub use dict::{DataDict, ErrorDict, FacetsDict, Schema, Settings};
pub use id::*;
