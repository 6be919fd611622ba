//! TesLang compiler middle and back end.
//!
//! The pipeline runs over an immutable, arena-allocated AST (the upstream
//! parser's output) in three passes:
//!
//! 1. **Semantic analysis** builds the scope tree and reports declaration,
//!    resolution, initialization, arity, and structural violations.
//! 2. **Type checking** independently computes the type of every expression
//!    against the same scope tree.
//! 3. **Code generation** lowers the program to the register VM's mnemonic
//!    instruction stream, emitted only when the merged diagnostics are empty.
//!
//! Both checking passes run to completion over the whole program; a rule
//! violation is a [`Diagnostic`] record, never an abort. The two passes
//! overlap on several rules on purpose, and the driver merges their findings
//! through one deduplicating sink so the overlap reports once.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use teslang::ast::{
//!     Block, Expr, FunctionBody, FunctionDecl, Ident, Number, NumberLit, PrintStmt, Program,
//!     Stmt, TypeSpec,
//! };
//! use teslang::{Compiler, Span};
//!
//! let arena = Bump::new();
//! let value = arena.alloc(Expr::Number(NumberLit {
//!     value: Number::Int(42),
//!     span: Span::line(2),
//! }));
//! let stmts = arena.alloc_slice_copy(&[Stmt::Print(PrintStmt {
//!     value,
//!     span: Span::line(2),
//! })]);
//! let functions = arena.alloc_slice_copy(&[FunctionDecl {
//!     name: Ident::new("main", Span::line(1)),
//!     return_type: TypeSpec::new("null", Span::line(1)),
//!     params: &[],
//!     body: FunctionBody::Block(Block { stmts, span: Span::line(1) }),
//!     span: Span::line(1),
//! }]);
//! let program = Program::new(functions, Span::line(1));
//!
//! let output = Compiler::new().compile(&program).unwrap();
//! assert!(output.is_success());
//! assert!(output.code.unwrap().to_string().contains("call iput"));
//! ```

pub use teslang_ast as ast;
pub use teslang_core::{
    DedupKey, Diagnostic, Diagnostics, InternalError, Span, Type, VectorElem,
};

pub use teslang_compiler::analyzer::{AnalysisOutput, SemanticAnalyzer};
pub use teslang_compiler::codegen::{CodeGenerator, Instr, Label, Listing, Operand, Reg};
pub use teslang_compiler::symtab::{ScopeId, ScopeTree, Symbol};
pub use teslang_compiler::typeck::TypeChecker;

use teslang_ast::Program;

/// Result of compiling one program.
#[derive(Debug)]
pub struct CompileOutput<'ast> {
    /// Merged findings from both checking passes, in discovery order.
    pub diagnostics: Vec<Diagnostic>,
    /// The instruction stream; present only when no findings were reported.
    pub code: Option<Listing<'ast>>,
}

impl CompileOutput<'_> {
    /// Whether compilation succeeded (no findings, code emitted).
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The compilation driver: analysis, type checking, gated code generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    dedup: DedupKey,
}

impl Compiler {
    /// A driver with the default diagnostic dedup key.
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver using `key` for both passes and the merge.
    pub fn with_dedup(key: DedupKey) -> Self {
        Self { dedup: key }
    }

    /// Run the full pipeline on `program`.
    ///
    /// The only error is an internal-contract violation; every user mistake
    /// comes back as data in [`CompileOutput::diagnostics`].
    pub fn compile<'ast>(
        &self,
        program: &Program<'ast>,
    ) -> Result<CompileOutput<'ast>, InternalError> {
        let analysis = SemanticAnalyzer::with_dedup(self.dedup).analyze(program);
        let type_diagnostics =
            TypeChecker::with_dedup(&analysis.scopes, self.dedup).check(program)?;

        let mut diagnostics = analysis.diagnostics;
        diagnostics.merge(type_diagnostics);

        let code = diagnostics
            .is_empty()
            .then(|| CodeGenerator::new().generate(program));

        Ok(CompileOutput {
            diagnostics: diagnostics.into_vec(),
            code,
        })
    }
}

/// Compile with the default configuration.
pub fn compile<'ast>(program: &Program<'ast>) -> Result<CompileOutput<'ast>, InternalError> {
    Compiler::new().compile(program)
}
