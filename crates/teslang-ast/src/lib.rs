//! Abstract syntax tree for TesLang.
//!
//! This crate is the input contract of the compiler's middle end: the
//! upstream parser (an external collaborator) produces a [`Program`] and the
//! analysis passes only ever read it. Nodes are `Copy` structs allocated in
//! a [`bumpalo`] arena, borrowing each other by `&'ast` reference, so a tree
//! is built once and never mutated.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use teslang_ast::{
//!     Block, Expr, FunctionBody, FunctionDecl, Ident, Number, NumberLit, Program, ReturnStmt,
//!     Stmt, TypeSpec,
//! };
//! use teslang_core::Span;
//!
//! let arena = Bump::new();
//! let value = arena.alloc(Expr::Number(NumberLit {
//!     value: Number::Int(0),
//!     span: Span::line(2),
//! }));
//! let stmts = arena.alloc_slice_copy(&[Stmt::Return(ReturnStmt {
//!     value: Some(value),
//!     span: Span::line(2),
//! })]);
//! let functions = arena.alloc_slice_copy(&[FunctionDecl {
//!     name: Ident::new("main", Span::line(1)),
//!     return_type: TypeSpec::new("int", Span::line(1)),
//!     params: &[],
//!     body: FunctionBody::Block(Block { stmts, span: Span::line(1) }),
//!     span: Span::line(1),
//! }]);
//! let program = Program::new(functions, Span::line(1));
//! assert_eq!(program.functions().len(), 1);
//! ```

pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;

pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use stmt::*;

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use teslang_core::Span;

    #[test]
    fn nodes_report_their_spans() {
        let arena = Bump::new();
        let value = arena.alloc(Expr::Number(NumberLit {
            value: Number::Int(1),
            span: Span::line(7),
        }));
        assert_eq!(value.span().line, 7);

        let stmt = Stmt::Print(PrintStmt {
            value,
            span: Span::line(7),
        });
        assert_eq!(stmt.span().line, 7);
    }

    #[test]
    fn program_exposes_functions_in_order() {
        let arena = Bump::new();
        let make = |name: &'static str, line: u32| FunctionDecl {
            name: Ident::new(name, Span::line(line)),
            return_type: TypeSpec::new("null", Span::line(line)),
            params: &[],
            body: FunctionBody::Block(Block {
                stmts: &[],
                span: Span::line(line),
            }),
            span: Span::line(line),
        };
        let functions = arena.alloc_slice_copy(&[make("first", 1), make("second", 4)]);
        let program = Program::new(functions, Span::line(1));

        let names: Vec<&str> = program.functions().iter().map(|f| f.name.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
