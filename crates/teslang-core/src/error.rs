//! Hard-failure signals, distinct from user-facing diagnostics.
//!
//! User rule violations are `Diagnostic` data and never abort a pass. The
//! errors here mark internal-contract violations: situations the grammar
//! and the pipeline guarantee cannot arise from any source program.

use thiserror::Error;

/// An internal-contract violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    /// The scope chain handed to a pass was not built from the program being
    /// walked: the replay ran out of child scopes where the traversal
    /// expected one.
    #[error("scope chain out of sync with program at line {line} ({context})")]
    ScopeDesync {
        /// Line of the construct whose scope was missing.
        line: u32,
        /// Which construct expected a scope.
        context: &'static str,
    },
}
