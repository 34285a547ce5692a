//! Entry-point adapters for Stackforge.
//!
//! Each of the three ways a stack selection reaches the resolver gets one
//! thin adapter here, all delegating to the single shared
//! [`stackforge_core::resolver::Resolver`]:
//!
//! - [`flags::FlagAdapter`] — parsed CLI flags, Strict mode, conflicts are
//!   fatal.
//! - [`prompts::PromptAdapter`] — the sequential prompt chain, Adaptive
//!   mode, with option lists pre-filtered through the speculative check.
//! - [`builder::BuilderSession`] — the visual builder, Adaptive mode after
//!   every edit, with per-field notes and greyed-out options.
//!
//! [`manifest`] holds the thin implementations of the downstream ports
//! (project generation, dependency installation) that stand in for the
//! template and installer layers outside this repository.
//!
//! No terminal or prompt I/O happens here; rendering belongs to the CLI.

pub mod builder;
pub mod flags;
pub mod manifest;
pub mod prompts;

// Re-export commonly used adapters
pub use builder::{BuilderSession, OptionState};
pub use flags::FlagAdapter;
pub use manifest::{ManifestGenerator, PreviewInstaller, RecordingGenerator};
pub use prompts::PromptAdapter;
