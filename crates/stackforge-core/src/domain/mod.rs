//! Core domain layer for Stackforge.
//!
//! Pure business data with ZERO I/O: the stack value domains, the field
//! registry with its conditional defaults, and the configuration aggregate.
//! Cross-field enforcement lives one layer up, in [`crate::resolver`].
//!
//! ## Boundaries
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, network, or terminal calls
//! - **No tracing**: observability belongs to the resolver and CLI layers
//! - **Immutable by convention**: configurations are cloned per session and
//!   only mutated through typed assignments

pub mod config;
pub mod error;
pub mod fields;
pub mod registry;
pub mod value_objects;

// Re-exports for convenience
pub use config::{PartialConfig, StackConfig};
pub use error::{DomainError, ErrorCategory};
pub use fields::{Arity, Assign, FieldEdit, FieldId, SetMember};
pub use value_objects::{
    Addon, ApiStyle, Backend, Database, DbSetup, Example, Frontend, Orm, PackageManager, Runtime,
    WebDeploy,
};
