//! Builders for hand-assembling test ASTs, arena-backed like the real parser
//! output.

use bumpalo::Bump;
use teslang_ast::{
    ArrayLit, AssignStmt, AssignTarget, BinOp, BinaryExpr, Block, BoolLit, CallExpr, CmpOp,
    ComparisonExpr, DoWhileStmt, Expr, ForRangeStmt, FunctionBody, FunctionDecl, Ident, IfStmt,
    IndexExpr, NullLit, Number, NumberLit, Param, ParenExpr, PrintStmt, Program, ReturnStmt, Stmt,
    StrKind, StrLit, TernaryExpr, TypeSpec, UnaryExpr, UnaryOp, VarDeclStmt, WhileStmt,
};
use teslang_core::Span;

pub(crate) fn ident<'a>(arena: &'a Bump, name: &str, line: u32) -> Ident<'a> {
    Ident::new(arena.alloc_str(name), Span::line(line))
}

pub(crate) fn tyspec<'a>(arena: &'a Bump, name: &str, line: u32) -> TypeSpec<'a> {
    TypeSpec::new(arena.alloc_str(name), Span::line(line))
}

// ============================================================================
// Expressions
// ============================================================================

pub(crate) fn int(value: i64, line: u32) -> Expr<'static> {
    Expr::Number(NumberLit {
        value: Number::Int(value),
        span: Span::line(line),
    })
}

pub(crate) fn float(value: f64, line: u32) -> Expr<'static> {
    Expr::Number(NumberLit {
        value: Number::Float(value),
        span: Span::line(line),
    })
}

pub(crate) fn string<'a>(arena: &'a Bump, value: &str, line: u32) -> Expr<'a> {
    Expr::Str(StrLit {
        value: arena.alloc_str(value),
        kind: StrKind::Str,
        span: Span::line(line),
    })
}

pub(crate) fn boolean(value: bool, line: u32) -> Expr<'static> {
    Expr::Bool(BoolLit {
        value,
        span: Span::line(line),
    })
}

pub(crate) fn null(line: u32) -> Expr<'static> {
    Expr::Null(NullLit {
        span: Span::line(line),
    })
}

pub(crate) fn var<'a>(arena: &'a Bump, name: &str, line: u32) -> Expr<'a> {
    Expr::Ident(ident(arena, name, line))
}

pub(crate) fn binary<'a>(
    arena: &'a Bump,
    op: BinOp,
    lhs: Expr<'a>,
    rhs: Expr<'a>,
    line: u32,
) -> Expr<'a> {
    Expr::Binary(BinaryExpr {
        op,
        lhs: arena.alloc(lhs),
        rhs: arena.alloc(rhs),
        span: Span::line(line),
    })
}

pub(crate) fn comparison<'a>(
    arena: &'a Bump,
    op: CmpOp,
    lhs: Expr<'a>,
    rhs: Expr<'a>,
    line: u32,
) -> Expr<'a> {
    Expr::Comparison(ComparisonExpr {
        op,
        lhs: arena.alloc(lhs),
        rhs: arena.alloc(rhs),
        span: Span::line(line),
    })
}

pub(crate) fn unary<'a>(arena: &'a Bump, op: UnaryOp, operand: Expr<'a>, line: u32) -> Expr<'a> {
    Expr::Unary(UnaryExpr {
        op,
        operand: arena.alloc(operand),
        span: Span::line(line),
    })
}

pub(crate) fn ternary<'a>(
    arena: &'a Bump,
    condition: Expr<'a>,
    if_true: Expr<'a>,
    if_false: Expr<'a>,
    line: u32,
) -> Expr<'a> {
    Expr::Ternary(arena.alloc(TernaryExpr {
        condition: arena.alloc(condition),
        if_true: arena.alloc(if_true),
        if_false: arena.alloc(if_false),
        span: Span::line(line),
    }))
}

pub(crate) fn index_expr<'a>(
    arena: &'a Bump,
    base: Expr<'a>,
    index: Expr<'a>,
    line: u32,
) -> IndexExpr<'a> {
    IndexExpr {
        base: arena.alloc(base),
        index: arena.alloc(index),
        span: Span::line(line),
    }
}

pub(crate) fn index<'a>(arena: &'a Bump, base: Expr<'a>, idx: Expr<'a>, line: u32) -> Expr<'a> {
    Expr::Index(index_expr(arena, base, idx, line))
}

pub(crate) fn array<'a>(arena: &'a Bump, elements: &[Expr<'a>], line: u32) -> Expr<'a> {
    Expr::Array(ArrayLit {
        elements: arena.alloc_slice_copy(elements),
        span: Span::line(line),
    })
}

pub(crate) fn call<'a>(arena: &'a Bump, name: &str, args: &[Expr<'a>], line: u32) -> Expr<'a> {
    Expr::Call(CallExpr {
        callee: ident(arena, name, line),
        args: arena.alloc_slice_copy(args),
        span: Span::line(line),
    })
}

pub(crate) fn paren<'a>(arena: &'a Bump, expr: Expr<'a>, line: u32) -> Expr<'a> {
    Expr::Paren(ParenExpr {
        expr: arena.alloc(expr),
        span: Span::line(line),
    })
}

// ============================================================================
// Statements
// ============================================================================

pub(crate) fn var_decl<'a>(
    arena: &'a Bump,
    name: &str,
    ty: &str,
    init: Option<Expr<'a>>,
    line: u32,
) -> Stmt<'a> {
    Stmt::VarDecl(VarDeclStmt {
        name: ident(arena, name, line),
        ty: tyspec(arena, ty, line),
        init: init.map(|expr| &*arena.alloc(expr)),
        span: Span::line(line),
    })
}

pub(crate) fn assign<'a>(arena: &'a Bump, name: &str, value: Expr<'a>, line: u32) -> Stmt<'a> {
    Stmt::Assign(AssignStmt {
        target: AssignTarget::Ident(ident(arena, name, line)),
        value: arena.alloc(value),
        span: Span::line(line),
    })
}

pub(crate) fn assign_index<'a>(
    arena: &'a Bump,
    target: IndexExpr<'a>,
    value: Expr<'a>,
    line: u32,
) -> Stmt<'a> {
    Stmt::Assign(AssignStmt {
        target: AssignTarget::Index(target),
        value: arena.alloc(value),
        span: Span::line(line),
    })
}

pub(crate) fn if_stmt<'a>(
    arena: &'a Bump,
    condition: Expr<'a>,
    then_branch: Stmt<'a>,
    else_branch: Option<Stmt<'a>>,
    line: u32,
) -> Stmt<'a> {
    Stmt::If(arena.alloc(IfStmt {
        condition: arena.alloc(condition),
        then_branch: arena.alloc(then_branch),
        else_branch: else_branch.map(|stmt| &*arena.alloc(stmt)),
        span: Span::line(line),
    }))
}

pub(crate) fn while_stmt<'a>(
    arena: &'a Bump,
    condition: Expr<'a>,
    body: Stmt<'a>,
    line: u32,
) -> Stmt<'a> {
    Stmt::While(arena.alloc(WhileStmt {
        condition: arena.alloc(condition),
        body: arena.alloc(body),
        span: Span::line(line),
    }))
}

pub(crate) fn do_while_stmt<'a>(
    arena: &'a Bump,
    body: Stmt<'a>,
    condition: Expr<'a>,
    line: u32,
) -> Stmt<'a> {
    Stmt::DoWhile(arena.alloc(DoWhileStmt {
        body: arena.alloc(body),
        condition: arena.alloc(condition),
        span: Span::line(line),
    }))
}

pub(crate) fn for_range<'a>(
    arena: &'a Bump,
    var_name: &str,
    start: Expr<'a>,
    end: Expr<'a>,
    body: Stmt<'a>,
    line: u32,
) -> Stmt<'a> {
    Stmt::ForRange(arena.alloc(ForRangeStmt {
        var: ident(arena, var_name, line),
        start: arena.alloc(start),
        end: arena.alloc(end),
        body: arena.alloc(body),
        span: Span::line(line),
    }))
}

pub(crate) fn return_stmt<'a>(arena: &'a Bump, value: Option<Expr<'a>>, line: u32) -> Stmt<'a> {
    Stmt::Return(ReturnStmt {
        value: value.map(|expr| &*arena.alloc(expr)),
        span: Span::line(line),
    })
}

pub(crate) fn print_stmt<'a>(arena: &'a Bump, value: Expr<'a>, line: u32) -> Stmt<'a> {
    Stmt::Print(PrintStmt {
        value: arena.alloc(value),
        span: Span::line(line),
    })
}

pub(crate) fn block<'a>(arena: &'a Bump, stmts: &[Stmt<'a>], line: u32) -> Stmt<'a> {
    Stmt::Block(Block {
        stmts: arena.alloc_slice_copy(stmts),
        span: Span::line(line),
    })
}

// ============================================================================
// Declarations
// ============================================================================

pub(crate) fn param<'a>(arena: &'a Bump, name: &str, ty: &str, line: u32) -> Param<'a> {
    Param {
        name: ident(arena, name, line),
        ty: tyspec(arena, ty, line),
        span: Span::line(line),
    }
}

pub(crate) fn function<'a>(
    arena: &'a Bump,
    name: &str,
    return_type: &str,
    params: &[Param<'a>],
    stmts: &[Stmt<'a>],
    line: u32,
) -> FunctionDecl<'a> {
    FunctionDecl {
        name: ident(arena, name, line),
        return_type: tyspec(arena, return_type, line),
        params: arena.alloc_slice_copy(params),
        body: FunctionBody::Block(Block {
            stmts: arena.alloc_slice_copy(stmts),
            span: Span::line(line),
        }),
        span: Span::line(line),
    }
}

pub(crate) fn function_with_expr_body<'a>(
    arena: &'a Bump,
    name: &str,
    return_type: &str,
    params: &[Param<'a>],
    body: Expr<'a>,
    line: u32,
) -> FunctionDecl<'a> {
    FunctionDecl {
        name: ident(arena, name, line),
        return_type: tyspec(arena, return_type, line),
        params: arena.alloc_slice_copy(params),
        body: FunctionBody::Expr(arena.alloc(body)),
        span: Span::line(line),
    }
}

pub(crate) fn program<'a>(arena: &'a Bump, functions: &[FunctionDecl<'a>]) -> Program<'a> {
    Program::new(arena.alloc_slice_copy(functions), Span::line(1))
}
