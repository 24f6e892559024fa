//! # Installation Engine
//!
//! Stages shell-integration files, figures out which ones are already in
//! place, previews the changes and writes them after confirmation.
//!
//! ```text
//! Vec<FileSpec> ──► prepare ──► render ──► workflow ──► apply
//!  (collaborator)   (reads)     (pure)     (prompts)    (writes)
//! ```
//!
//! ## Modules
//!
//! - [`spec`]: `FileSpec`, `Action`, normalization and classification
//! - [`apply`]: the executor
//! - [`render`]: summary lines and the boxed preview
//! - [`workflow`]: the confirm / details / step-by-step state machine

pub mod apply;
mod error;
pub mod render;
pub mod spec;
pub mod workflow;

pub use error::InstallError;
pub use spec::{Action, FileSpec, prepare};
pub use workflow::{Outcome, run};
