//! Application layer: the ports downstream collaborators implement.
//!
//! The resolver's output is consumed by layers this crate deliberately does
//! not contain — template instantiation, dependency installation. They are
//! modelled as driven ports so the CLI can be tested against doubles and the
//! adapters crate can ship thin real implementations.

pub mod ports;

pub use ports::{DependencyInstaller, ProjectGenerator};
