//! static-page-common - Shared declaration model
//!
//! This crate provides the engine-agnostic types used by the provider,
//! without any async runtime or I/O dependencies to keep it lightweight.
//!
//! ## Modules
//!
//! - [`output`]: Deferred values with one-shot continuations
//! - [`resource`]: Resource declarations (graph nodes with parent/ordering edges)
//! - [`tokens`]: Resource type tokens and wire constants
//! - [`error`]: Typed construction errors

pub mod error;
pub mod output;
pub mod resource;
pub mod tokens;

// Re-export commonly used types
pub use error::ConstructError;
pub use output::{Input, Output, OutputError, Resolver};
pub use resource::{PropertyValue, ResourceDeclaration};
