//! Type checking: an independent second pass over the analyzed program.
//!
//! The checker computes the type of every expression and re-validates the
//! value-level rules against the scope tree the semantic analyzer built. It
//! never mutates the tree: scopes are re-entered by replaying children in
//! creation order, mirroring the analyzer's traversal step for step.
//!
//! Initialization tracking here is deliberately independent of the
//! analyzer's per-symbol flags: the checker keeps its own `assigned` name
//! set, seeded from the enclosing function's parameters. The two passes
//! agree in spirit and overlap on several rules; the overlap uses identical
//! wording so a merged diagnostic sink collapses it.
//!
//! The only hard failure is [`InternalError::ScopeDesync`]: the replay ran
//! out of scopes, meaning the tree was not built from this program.

use rustc_hash::FxHashSet;
use teslang_ast::{
    AssignStmt, AssignTarget, BinaryExpr, Block, CallExpr, ComparisonExpr, DoWhileStmt, Expr,
    ForRangeStmt, FunctionBody, FunctionDecl, IfStmt, IndexExpr, Number, Program, ReturnStmt, Stmt,
    StrKind, TernaryExpr, UnaryExpr, UnaryOp, VarDeclStmt, WhileStmt,
};
use teslang_core::{DedupKey, Diagnostics, InternalError, Span, Type, VectorElem};

use crate::messages;
use crate::symtab::{ScopeId, ScopeTree, Symbol};

/// The type checker. Borrows the analyzer's scope tree immutably.
#[derive(Debug)]
pub struct TypeChecker<'a> {
    scopes: &'a ScopeTree,
    /// Replay stack: each frame is a scope and the index of its next
    /// unvisited child.
    stack: Vec<(ScopeId, usize)>,
    /// Names assigned so far in the current function, parameters included.
    assigned: FxHashSet<String>,
    current_function: Option<String>,
    diagnostics: Diagnostics,
}

impl<'a> TypeChecker<'a> {
    /// Create a checker with the default diagnostic dedup key.
    pub fn new(scopes: &'a ScopeTree) -> Self {
        Self::with_dedup(scopes, DedupKey::default())
    }

    /// Create a checker whose diagnostic sink uses `key`.
    pub fn with_dedup(scopes: &'a ScopeTree, key: DedupKey) -> Self {
        let diagnostics = match key {
            DedupKey::MessageAndFunction => Diagnostics::new(),
            DedupKey::MessageFunctionAndLine => Diagnostics::with_line_key(),
        };
        Self {
            scopes,
            stack: vec![(ScopeId::GLOBAL, 0)],
            assigned: FxHashSet::default(),
            current_function: None,
            diagnostics,
        }
    }

    /// Check a program against its scope tree, returning all findings.
    ///
    /// Fails only when `scopes` was not built from `program`.
    pub fn check(mut self, program: &Program<'_>) -> Result<Diagnostics, InternalError> {
        for function in program.functions() {
            self.check_function(function)?;
        }
        Ok(self.diagnostics)
    }

    // ==========================================================================
    // Scope replay
    // ==========================================================================

    fn current_scope(&self) -> ScopeId {
        self.stack.last().map(|(scope, _)| *scope).unwrap_or(ScopeId::GLOBAL)
    }

    fn enter_child(&mut self, span: Span, context: &'static str) -> Result<(), InternalError> {
        let (scope, cursor) = self
            .stack
            .last_mut()
            .expect("replay stack always holds the global frame");
        let children = self.scopes.children(*scope);
        let Some(&child) = children.get(*cursor) else {
            return Err(InternalError::ScopeDesync {
                line: span.line,
                context,
            });
        };
        *cursor += 1;
        self.stack.push((child, 0));
        Ok(())
    }

    fn exit_scope(&mut self) {
        self.stack.pop();
    }

    // ==========================================================================
    // Functions
    // ==========================================================================

    fn check_function(&mut self, function: &FunctionDecl<'_>) -> Result<(), InternalError> {
        let name = function.name.name;
        self.current_function = Some(name.to_owned());

        // Parameters count as assigned from the start.
        self.assigned = function
            .params
            .iter()
            .map(|param| param.name.name.to_owned())
            .collect();

        self.enter_child(function.span, "function body")?;
        match function.body {
            FunctionBody::Block(block) => {
                for stmt in block.stmts {
                    self.check_stmt(stmt)?;
                }
            }
            FunctionBody::Expr(expr) => {
                let actual = self.check_expr(expr);
                self.check_return_type(actual, expr.span());
            }
        }
        self.exit_scope();

        self.current_function = None;
        Ok(())
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    fn check_stmt(&mut self, stmt: &Stmt<'_>) -> Result<(), InternalError> {
        match stmt {
            Stmt::VarDecl(decl) => self.check_var_decl(decl),
            Stmt::Assign(assign) => self.check_assign(assign),
            Stmt::If(if_stmt) => return self.check_if(if_stmt),
            Stmt::While(while_stmt) => return self.check_while(while_stmt),
            Stmt::DoWhile(do_while) => return self.check_do_while(do_while),
            Stmt::ForRange(for_range) => return self.check_for_range(for_range),
            Stmt::Return(ret) => self.check_return(ret),
            Stmt::Print(print) => {
                self.check_expr(print.value);
            }
            Stmt::Expr(expr_stmt) => {
                self.check_expr(expr_stmt.expr);
            }
            Stmt::Block(block) => return self.check_block(block),
        }
        Ok(())
    }

    fn check_block(&mut self, block: &Block<'_>) -> Result<(), InternalError> {
        self.enter_child(block.span, "block")?;
        for stmt in block.stmts {
            self.check_stmt(stmt)?;
        }
        self.exit_scope();
        Ok(())
    }

    fn check_var_decl(&mut self, decl: &VarDeclStmt<'_>) {
        let Some(init) = decl.init else { return };
        let actual = self.check_expr(init);

        // Invalid spellings were already reported by the analyzer; nothing
        // sensible to compare against here.
        if let Some(declared) = Type::from_spelling(decl.ty.name) {
            if let Some(actual) = actual {
                if !declared.is_compatible(actual) {
                    self.report(
                        messages::type_mismatch(decl.name.name, declared, actual),
                        decl.span,
                    );
                }
            }
        }
        self.assigned.insert(decl.name.name.to_owned());
    }

    fn check_assign(&mut self, assign: &AssignStmt<'_>) {
        let value_type = self.check_expr(assign.value);

        match &assign.target {
            AssignTarget::Ident(ident) => {
                let name = ident.name;
                let Some(symbol) = self.scopes.lookup(self.current_scope(), name) else {
                    self.report(messages::undefined_variable(name), assign.span);
                    return;
                };
                if symbol.is_function() {
                    self.report(messages::not_a_variable(name), assign.span);
                    return;
                }
                if let (Some(declared), Some(actual)) = (symbol.value_type(), value_type) {
                    if !declared.is_compatible(actual) {
                        self.report(messages::type_mismatch(name, declared, actual), assign.span);
                    }
                }
                self.assigned.insert(name.to_owned());
            }
            AssignTarget::Index(index) => {
                self.check_index(index);
            }
        }
    }

    fn check_if(&mut self, if_stmt: &IfStmt<'_>) -> Result<(), InternalError> {
        self.check_expr(if_stmt.condition);
        self.check_stmt(if_stmt.then_branch)?;
        if let Some(else_branch) = if_stmt.else_branch {
            self.check_stmt(else_branch)?;
        }
        Ok(())
    }

    fn check_while(&mut self, while_stmt: &WhileStmt<'_>) -> Result<(), InternalError> {
        self.check_expr(while_stmt.condition);
        self.check_stmt(while_stmt.body)
    }

    fn check_do_while(&mut self, do_while: &DoWhileStmt<'_>) -> Result<(), InternalError> {
        self.check_stmt(do_while.body)?;
        self.check_expr(do_while.condition);
        Ok(())
    }

    fn check_for_range(&mut self, for_range: &ForRangeStmt<'_>) -> Result<(), InternalError> {
        self.check_expr(for_range.start);
        self.check_expr(for_range.end);

        self.assigned.insert(for_range.var.name.to_owned());
        self.enter_child(for_range.span, "for loop body")?;
        self.check_stmt(for_range.body)?;
        self.exit_scope();
        Ok(())
    }

    fn check_return(&mut self, ret: &ReturnStmt<'_>) {
        if let Some(value) = ret.value {
            let actual = self.check_expr(value);
            self.check_return_type(actual, ret.span);
        }
    }

    fn check_return_type(&mut self, actual: Option<Type>, span: Span) {
        let Some(function) = self.current_function.clone() else {
            return;
        };
        let Some(Symbol::Function(symbol)) = self.scopes.lookup(ScopeId::GLOBAL, &function) else {
            return;
        };
        let expected = symbol.return_type;
        if let Some(actual) = actual {
            if !expected.is_compatible(actual) {
                self.report(messages::return_mismatch(expected, actual), span);
            }
        }
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    /// Compute an expression's type; `None` means unknown and suppresses
    /// cascading mismatch reports on enclosing expressions.
    fn check_expr(&mut self, expr: &Expr<'_>) -> Option<Type> {
        match expr {
            Expr::Ident(ident) => self.check_ident(ident.name, ident.span),
            Expr::Number(lit) => match lit.value {
                Number::Int(_) => Some(Type::Int),
                Number::Float(_) => {
                    // The language has no float type.
                    self.report(messages::wrong_type("float"), lit.span);
                    None
                }
            },
            Expr::Str(lit) => Some(match lit.kind {
                StrKind::Str => Type::Str,
                StrKind::MStr => Type::MStr,
            }),
            Expr::Bool(_) => Some(Type::Bool),
            Expr::Null(_) => Some(Type::Null),
            Expr::Binary(binary) => self.check_binary(binary),
            Expr::Comparison(comparison) => self.check_comparison(comparison),
            Expr::Unary(unary) => self.check_unary(unary),
            Expr::Ternary(ternary) => self.check_ternary(ternary),
            Expr::Index(index) => self.check_index(index),
            Expr::Array(array) => {
                for element in array.elements {
                    self.check_expr(element);
                }
                Some(Type::Vector(VectorElem::Unknown))
            }
            Expr::Call(call) => self.check_call(call),
            Expr::Paren(paren) => self.check_expr(paren.expr),
        }
    }

    fn check_ident(&mut self, name: &str, span: Span) -> Option<Type> {
        let Some(symbol) = self.scopes.lookup(self.current_scope(), name) else {
            self.report(messages::undefined_variable(name), span);
            return None;
        };
        let value_type = symbol.value_type();
        if value_type.is_some() && !self.assigned.contains(name) {
            self.report(messages::used_before_assigned(name), span);
        }
        value_type
    }

    fn check_binary(&mut self, binary: &BinaryExpr<'_>) -> Option<Type> {
        let lhs = self.check_expr(binary.lhs);
        let rhs = self.check_expr(binary.rhs);

        if binary.op.is_logical() {
            let bad = |side: Option<Type>| side.is_some_and(|ty| ty != Type::Bool);
            if bad(lhs) || bad(rhs) {
                self.report(messages::logical_operands(binary.op.symbol()), binary.span);
            }
            Some(Type::Bool)
        } else {
            Some(Type::Int)
        }
    }

    fn check_comparison(&mut self, comparison: &ComparisonExpr<'_>) -> Option<Type> {
        // Always bool; operand compatibility deliberately unchecked.
        self.check_expr(comparison.lhs);
        self.check_expr(comparison.rhs);
        Some(Type::Bool)
    }

    fn check_unary(&mut self, unary: &UnaryExpr<'_>) -> Option<Type> {
        self.check_expr(unary.operand);
        Some(match unary.op {
            UnaryOp::Not => Type::Bool,
            UnaryOp::Neg => Type::Int,
        })
    }

    fn check_ternary(&mut self, ternary: &TernaryExpr<'_>) -> Option<Type> {
        self.check_expr(ternary.condition);
        let true_type = self.check_expr(ternary.if_true);
        self.check_expr(ternary.if_false);
        true_type
    }

    fn check_index(&mut self, index: &IndexExpr<'_>) -> Option<Type> {
        let base = self.check_expr(index.base);
        let idx = self.check_expr(index.index);

        if let Some(ty) = base {
            if !ty.is_vector() {
                self.report(messages::array_base_not_vector(ty), index.span);
            }
        }
        if let Some(ty) = idx {
            if ty != Type::Int {
                self.report(messages::index_not_int(ty), index.span);
            }
        }
        base.and_then(Type::element_type).or(Some(Type::Int))
    }

    fn check_call(&mut self, call: &CallExpr<'_>) -> Option<Type> {
        let name = call.callee.name;

        let arg_types: Vec<Option<Type>> = call
            .args
            .iter()
            .map(|arg| self.check_expr(arg))
            .collect();

        let Some(symbol) = self.scopes.lookup(self.current_scope(), name) else {
            self.report(messages::undefined_function(name), call.span);
            return None;
        };
        let Symbol::Function(function) = symbol else {
            self.report(messages::not_a_function(name), call.span);
            return None;
        };
        let return_type = function.return_type;

        let expected = function.params.len();
        let got = arg_types.len();
        if got < expected {
            self.report(messages::too_few_arguments(name, expected, got), call.span);
            return Some(return_type);
        }
        if got > expected {
            self.report(messages::too_many_arguments(name, expected, got), call.span);
            return Some(return_type);
        }

        for (param, actual) in function.params.iter().zip(&arg_types) {
            if param.ty == Type::Any {
                continue;
            }
            if let Some(actual) = actual {
                if !param.ty.is_compatible(*actual) {
                    self.report(
                        messages::argument_mismatch(&param.name, param.ty, *actual),
                        call.span,
                    );
                }
            }
        }

        Some(return_type)
    }

    // ==========================================================================
    // Reporting
    // ==========================================================================

    fn report(&mut self, message: String, span: Span) {
        self.diagnostics
            .report(message, span.line, self.current_function.as_deref());
    }
}

/// Convenience: check with the default configuration.
pub fn check(program: &Program<'_>, scopes: &ScopeTree) -> Result<Diagnostics, InternalError> {
    TypeChecker::new(scopes).check(program)
}

// ============================================================================
// Tests
// ============================================================================
