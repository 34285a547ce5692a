//! Stackforge Core - the stack-configuration compatibility resolver.
//!
//! This crate holds everything that must stay identical across the three
//! entry points (CLI flags, interactive prompts, visual builder): the stack
//! field domains, the declarative compatibility rule table, the fixpoint
//! resolver, and the serializers that turn a resolved configuration back
//! into a reproducible command or a shareable URL.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            stackforge-cli (CLI)              │
//! │        flags / prompts entry points          │
//! └───────────────────┬──────────────────────────┘
//!                     │ calls
//!                     ▼
//! ┌──────────────────────────────────────────────┐
//! │       stackforge-adapters (Adapters)         │
//! │   FlagAdapter · PromptAdapter · Builder      │
//! └───────────────────┬──────────────────────────┘
//!                     │ uses
//!                     ▼
//! ┌──────────────────────────────────────────────┐
//! │         Resolver (Fixpoint Engine)           │
//! │   Strict / Adaptive modes, rule table,       │
//! │   speculative compatibility check            │
//! └───────────────────┬──────────────────────────┘
//!                     │ reads
//!                     ▼
//! ┌──────────────────────────────────────────────┐
//! │          Domain Layer (Pure Data)            │
//! │   StackConfig, FieldId, value enums,         │
//! │   field registry with conditional defaults   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Downstream collaborators (template instantiation, dependency
//! installation) are represented only as the driven ports in
//! [`application::ports`]; the adapters crate supplies implementations.
//!
//! ## Usage
//!
//! ```rust
//! use stackforge_core::prelude::*;
//!
//! let resolver = Resolver::new().expect("built-in rule table is valid");
//! let partial = PartialConfig {
//!     database: Some(Database::Postgres),
//!     ..Default::default()
//! };
//! let resolution = resolver
//!     .resolve_adaptive(&partial.into_config())
//!     .expect("built-in rule table converges");
//! assert_eq!(resolution.config.database, Database::Postgres);
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod resolver;
pub mod serialize;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::ports::{DependencyInstaller, ProjectGenerator};
    pub use crate::domain::{
        Addon, ApiStyle, Arity, Assign, Backend, Database, DbSetup, Example, FieldEdit, FieldId,
        Frontend, Orm, PackageManager, PartialConfig, Runtime, SetMember, StackConfig, WebDeploy,
    };
    pub use crate::error::{StackforgeError, StackforgeResult};
    pub use crate::resolver::{Change, Resolution, ResolveError, Resolver, ValidationError};
    pub use crate::serialize::{
        decode_url_state, encode_url_state, parse_command, serialize_command,
    };
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
