//! Expression AST nodes.
//!
//! Expressions are `Copy` values borrowing from the arena that built them;
//! nested expressions are held by `&'ast` reference. Every node carries a
//! [`Span`] for diagnostics.

use teslang_core::Span;

use crate::ops::{BinOp, CmpOp, UnaryOp};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// A name reference.
    Ident(Ident<'ast>),
    /// A numeric literal.
    Number(NumberLit),
    /// A string literal (single- or multi-line).
    Str(StrLit<'ast>),
    /// A boolean literal.
    Bool(BoolLit),
    /// The null literal.
    Null(NullLit),
    /// Arithmetic or logical binary operation.
    Binary(BinaryExpr<'ast>),
    /// Comparison operation.
    Comparison(ComparisonExpr<'ast>),
    /// Unary operation.
    Unary(UnaryExpr<'ast>),
    /// Conditional expression `cond ? a : b`.
    Ternary(&'ast TernaryExpr<'ast>),
    /// Vector element access `base[index]`.
    Index(IndexExpr<'ast>),
    /// Vector literal `[a, b, c]`.
    Array(ArrayLit<'ast>),
    /// Function call.
    Call(CallExpr<'ast>),
    /// Parenthesized expression.
    Paren(ParenExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Ident(e) => e.span,
            Self::Number(e) => e.span,
            Self::Str(e) => e.span,
            Self::Bool(e) => e.span,
            Self::Null(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Comparison(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Ternary(e) => e.span,
            Self::Index(e) => e.span,
            Self::Array(e) => e.span,
            Self::Call(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }
}

/// A name reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    /// The referenced name.
    pub name: &'ast str,
    /// Source location
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create an identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// The value of a numeric literal.
///
/// The language has no float type; a `Float` value survives lexing only so
/// the type checker can reject it with a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// An integral literal.
    Int(i64),
    /// A non-integral literal, always a type error.
    Float(f64),
}

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberLit {
    /// The literal value.
    pub value: Number,
    /// Source location
    pub span: Span,
}

/// Which lexical form a string literal used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrKind {
    /// Single-line string, type `str`.
    Str,
    /// Multi-line string, type `mstr`.
    MStr,
}

/// A string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrLit<'ast> {
    /// The literal text, escapes already resolved.
    pub value: &'ast str,
    /// Lexical form, determining `str` vs `mstr`.
    pub kind: StrKind,
    /// Source location
    pub span: Span,
}

/// A boolean literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolLit {
    /// The literal value.
    pub value: bool,
    /// Source location
    pub span: Span,
}

/// The null literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullLit {
    /// Source location
    pub span: Span,
}

/// An arithmetic or logical binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// The operator.
    pub op: BinOp,
    /// Left operand.
    pub lhs: &'ast Expr<'ast>,
    /// Right operand.
    pub rhs: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A comparison operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonExpr<'ast> {
    /// The operator.
    pub op: CmpOp,
    /// Left operand.
    pub lhs: &'ast Expr<'ast>,
    /// Right operand.
    pub rhs: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    /// The operator.
    pub op: UnaryOp,
    /// The operand.
    pub operand: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A conditional expression `cond ? if_true : if_false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TernaryExpr<'ast> {
    /// The condition.
    pub condition: &'ast Expr<'ast>,
    /// Value when the condition holds.
    pub if_true: &'ast Expr<'ast>,
    /// Value otherwise.
    pub if_false: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A vector element access `base[index]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    /// The indexed expression; must be vector-typed.
    pub base: &'ast Expr<'ast>,
    /// The index expression; must be int-typed.
    pub index: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A vector literal `[a, b, c]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayLit<'ast> {
    /// Element expressions in source order.
    pub elements: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A function call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// The called function's name.
    pub callee: Ident<'ast>,
    /// Argument expressions in source order.
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A parenthesized expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    /// The wrapped expression.
    pub expr: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}
