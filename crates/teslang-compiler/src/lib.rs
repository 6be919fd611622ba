//! TesLang middle and back end.
//!
//! Three passes over an immutable AST, run in order by the driver:
//!
//! - [`analyzer`]: populates the scope tree and reports declaration,
//!   resolution, initialization, and structural violations
//! - [`typeck`]: an independent second pass computing the type of every
//!   expression against the same scope tree
//! - [`codegen`]: lowers the (certified) program to the flat mnemonic
//!   instruction stream of the register VM
//!
//! The checking passes never abort on a user mistake; they accumulate
//! [`teslang_core::Diagnostic`]s and keep walking. Code generation is gated
//! by the caller on a clean diagnostic set.

pub mod analyzer;
pub mod codegen;
mod messages;
pub mod symtab;
pub mod typeck;

#[cfg(test)]
mod testutil;

pub use analyzer::{AnalysisOutput, SemanticAnalyzer, analyze};
pub use codegen::{BinMnemonic, CodeGenerator, Instr, Label, Listing, Operand, Reg, UnMnemonic};
pub use symtab::{
    FunctionSymbol, ParamSig, ScopeId, ScopeTree, Symbol, VariableSymbol, VectorSymbol,
};
pub use typeck::{TypeChecker, check};
