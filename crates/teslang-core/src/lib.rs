//! Shared leaf types for the TesLang compiler.
//!
//! This crate holds everything the analysis and generation crates agree on:
//!
//! - [`Span`]: source locations carried by AST nodes and diagnostics
//! - [`Type`]: the closed semantic type set, with the compatibility relation
//! - [`Diagnostic`] / [`Diagnostics`]: structured findings and the
//!   deduplicating sink the passes report into
//! - [`InternalError`]: the programming-error signal for internal-contract
//!   violations, which is never used for user mistakes

mod diagnostic;
mod error;
mod span;
mod types;

pub use diagnostic::{DedupKey, Diagnostic, Diagnostics};
pub use error::InternalError;
pub use span::Span;
pub use types::{Type, VectorElem, VALID_SPELLINGS};
