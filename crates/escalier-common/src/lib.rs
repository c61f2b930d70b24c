//! Shared types for the Escalier compiler.
//!
//! This crate provides foundational types used across Escalier compiler
//! crates:
//! - Diagnostic categories and the `Diagnostic` record emitted by analysis
//!   passes that don't carry a source span of their own (e.g. whole-component
//!   cycle diagnostics).

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};
