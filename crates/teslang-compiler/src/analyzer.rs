//! Semantic analysis: scope population and declaration checking.
//!
//! The analyzer makes two sweeps over the program. The first registers every
//! function's signature in the global scope, so calls resolve regardless of
//! declaration order. The second walks each body top to bottom, building the
//! scope tree and checking declarations, assignments, references, calls, and
//! control flow against the language's static rules.
//!
//! No user mistake ever aborts the walk: every violation appends a
//! [`Diagnostic`] and analysis continues with a best-effort fallback, so one
//! error does not hide its siblings.

use teslang_ast::{
    AssignStmt, AssignTarget, BinaryExpr, Block, CallExpr, ComparisonExpr, DoWhileStmt, Expr,
    ForRangeStmt, FunctionBody, FunctionDecl, IfStmt, IndexExpr, Number, Param, PrintStmt, Program,
    ReturnStmt, Stmt, StrKind, TernaryExpr, TypeSpec, UnaryExpr, UnaryOp, VarDeclStmt, WhileStmt,
};
use teslang_core::{DedupKey, Diagnostics, Span, Type, VectorElem};

use crate::messages;
use crate::symtab::{
    FunctionSymbol, ParamSig, ScopeId, ScopeTree, Symbol, VariableSymbol, VectorSymbol,
};

/// Everything the analyzer produces: the populated scope tree and the
/// findings, in traversal order.
#[derive(Debug)]
pub struct AnalysisOutput {
    /// The scope tree, ready for the type checker's read-only replay.
    pub scopes: ScopeTree,
    /// Findings in discovery order.
    pub diagnostics: Diagnostics,
}

/// The semantic analyzer.
///
/// One instance analyzes one program; scopes and diagnostics accumulate on
/// the instance and are handed back by [`analyze`](Self::analyze). Builtins
/// are pre-registered in the global scope before any user code is seen.
#[derive(Debug)]
pub struct SemanticAnalyzer {
    scopes: ScopeTree,
    current: ScopeId,
    current_function: Option<String>,
    diagnostics: Diagnostics,
}

impl SemanticAnalyzer {
    /// Create an analyzer with the default diagnostic dedup key.
    pub fn new() -> Self {
        Self::with_dedup(DedupKey::default())
    }

    /// Create an analyzer whose diagnostic sink uses `key`.
    pub fn with_dedup(key: DedupKey) -> Self {
        let diagnostics = match key {
            DedupKey::MessageAndFunction => Diagnostics::new(),
            DedupKey::MessageFunctionAndLine => Diagnostics::with_line_key(),
        };
        let mut analyzer = Self {
            scopes: ScopeTree::new(),
            current: ScopeId::GLOBAL,
            current_function: None,
            diagnostics,
        };
        analyzer.register_builtins();
        analyzer
    }

    /// Analyze a program, producing the scope tree and all findings.
    pub fn analyze(mut self, program: &Program<'_>) -> AnalysisOutput {
        // Register every signature first so forward and recursive calls
        // resolve while bodies are checked.
        for function in program.functions() {
            self.register_function(function);
        }
        for function in program.functions() {
            self.visit_function(function);
        }
        AnalysisOutput {
            scopes: self.scopes,
            diagnostics: self.diagnostics,
        }
    }

    // ==========================================================================
    // Builtins
    // ==========================================================================

    fn register_builtins(&mut self) {
        let builtins = [
            ("list", vec![("size", Type::Int)], Type::Vector(VectorElem::Unknown)),
            ("length", vec![("array", Type::Vector(VectorElem::Unknown))], Type::Int),
            ("print", vec![("value", Type::Any)], Type::Null),
            ("scan", vec![], Type::Int),
            ("exit", vec![("code", Type::Int)], Type::Null),
        ];
        for (name, params, return_type) in builtins {
            self.scopes.define(
                ScopeId::GLOBAL,
                Symbol::Function(FunctionSymbol {
                    name: name.to_owned(),
                    return_type,
                    params: params
                        .into_iter()
                        .map(|(name, ty)| ParamSig {
                            name: name.to_owned(),
                            ty,
                        })
                        .collect(),
                    span: Span::default(),
                }),
            );
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    fn register_function(&mut self, function: &FunctionDecl<'_>) {
        let name = function.name.name;
        let previous = self.current_function.replace(name.to_owned());

        let return_type = self.resolve_type(&function.return_type);
        let params = function
            .params
            .iter()
            .map(|param| ParamSig {
                name: param.name.name.to_owned(),
                ty: self.resolve_param_type(param),
            })
            .collect();

        self.scopes.define(
            ScopeId::GLOBAL,
            Symbol::Function(FunctionSymbol {
                name: name.to_owned(),
                return_type: return_type.unwrap_or(Type::Null),
                params,
                span: function.span,
            }),
        );

        self.current_function = previous;
    }

    fn visit_function(&mut self, function: &FunctionDecl<'_>) {
        let name = function.name.name;
        let previous = self.current_function.replace(name.to_owned());

        // Parameters and locals live in a scope chained under the global one.
        self.current = self.scopes.create_child(ScopeId::GLOBAL);
        for param in function.params {
            self.bind_param(param);
        }

        match function.body {
            FunctionBody::Block(block) => {
                // The block is the function scope itself, not a nested one.
                for stmt in block.stmts {
                    self.visit_stmt(stmt);
                }
            }
            FunctionBody::Expr(expr) => {
                let actual = self.visit_expr(expr);
                self.check_return_type(name, actual, expr.span());
            }
        }

        self.current = ScopeId::GLOBAL;
        self.current_function = previous;
    }

    fn bind_param(&mut self, param: &Param<'_>) {
        let ty = self.resolve_param_type(param);
        let symbol = match ty {
            Type::Vector(_) => Symbol::Vector(VectorSymbol {
                name: param.name.name.to_owned(),
                element_type: Type::Int,
                size_bound: None,
                initialized: true,
                span: param.span,
            }),
            other => Symbol::Variable(VariableSymbol {
                name: param.name.name.to_owned(),
                declared_type: other,
                initialized: true,
                span: param.span,
            }),
        };
        self.scopes.define(self.current, symbol);
    }

    /// Resolve a declared type spelling, reporting invalid ones.
    fn resolve_type(&mut self, spec: &TypeSpec<'_>) -> Option<Type> {
        let resolved = Type::from_spelling(spec.name);
        if resolved.is_none() {
            self.report(messages::wrong_type(spec.name), spec.span);
        }
        resolved
    }

    fn resolve_param_type(&mut self, param: &Param<'_>) -> Type {
        self.resolve_type(&param.ty).unwrap_or(Type::Null)
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    fn visit_stmt(&mut self, stmt: &Stmt<'_>) {
        match stmt {
            Stmt::VarDecl(decl) => self.visit_var_decl(decl),
            Stmt::Assign(assign) => self.visit_assign(assign),
            Stmt::If(if_stmt) => self.visit_if(if_stmt),
            Stmt::While(while_stmt) => self.visit_while(while_stmt),
            Stmt::DoWhile(do_while) => self.visit_do_while(do_while),
            Stmt::ForRange(for_range) => self.visit_for_range(for_range),
            Stmt::Return(ret) => self.visit_return(ret),
            Stmt::Print(print) => self.visit_print(print),
            Stmt::Expr(expr_stmt) => {
                self.visit_expr(expr_stmt.expr);
            }
            Stmt::Block(block) => self.visit_block(block),
        }
    }

    fn visit_block(&mut self, block: &Block<'_>) {
        self.current = self.scopes.create_child(self.current);
        for stmt in block.stmts {
            self.visit_stmt(stmt);
        }
        self.current = self.scopes.parent(self.current).unwrap_or(ScopeId::GLOBAL);
    }

    fn visit_var_decl(&mut self, decl: &VarDeclStmt<'_>) {
        let name = decl.name.name;
        let declared = self.resolve_type(&decl.ty);

        // Shadowing across scopes is legal; only a same-scope collision is a
        // conflict, and the symbol is (re)defined regardless so later uses do
        // not cascade into "undefined" noise.
        if self.scopes.lookup_local(self.current, name).is_some() {
            self.report(messages::already_defined(name), decl.span);
        }

        let mut size_bound = None;
        if let Some(init) = decl.init {
            if let Expr::Array(array) = init {
                size_bound = Some(array.elements.len() as u32);
            }
            let actual = self.visit_expr(init);
            if let (Some(declared), Some(actual)) = (declared, actual) {
                if !declared.is_compatible(actual) {
                    self.report(messages::type_mismatch(name, declared, actual), decl.span);
                }
            }
        }

        let initialized = decl.init.is_some();
        let symbol = match declared {
            Some(Type::Vector(_)) => Symbol::Vector(VectorSymbol {
                name: name.to_owned(),
                element_type: Type::Int,
                size_bound,
                initialized,
                span: decl.span,
            }),
            other => Symbol::Variable(VariableSymbol {
                name: name.to_owned(),
                declared_type: other.unwrap_or(Type::Null),
                initialized,
                span: decl.span,
            }),
        };
        self.scopes.define(self.current, symbol);
    }

    fn visit_assign(&mut self, assign: &AssignStmt<'_>) {
        let value_type = self.visit_expr(assign.value);

        match &assign.target {
            AssignTarget::Ident(ident) => {
                let name = ident.name;
                let Some(symbol) = self.scopes.lookup(self.current, name) else {
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
                self.scopes.mark_initialized(self.current, name);
            }
            AssignTarget::Index(index) => {
                self.check_index(index);
            }
        }
    }

    fn visit_if(&mut self, if_stmt: &IfStmt<'_>) {
        self.check_condition("if", if_stmt.condition);
        self.visit_stmt(if_stmt.then_branch);
        if let Some(else_branch) = if_stmt.else_branch {
            self.visit_stmt(else_branch);
        }
    }

    fn visit_while(&mut self, while_stmt: &WhileStmt<'_>) {
        self.check_condition("while", while_stmt.condition);
        self.visit_stmt(while_stmt.body);
    }

    fn visit_do_while(&mut self, do_while: &DoWhileStmt<'_>) {
        self.visit_stmt(do_while.body);
        self.check_condition("do-while", do_while.condition);
    }

    fn visit_for_range(&mut self, for_range: &ForRangeStmt<'_>) {
        // Bounds belong to the enclosing scope; the loop variable is not
        // visible in them.
        let start = self.visit_expr(for_range.start);
        if let Some(ty) = start {
            if ty != Type::Int {
                self.report(messages::for_bound_not_int("start", ty), for_range.span);
            }
        }
        let end = self.visit_expr(for_range.end);
        if let Some(ty) = end {
            if ty != Type::Int {
                self.report(messages::for_bound_not_int("end", ty), for_range.span);
            }
        }

        self.current = self.scopes.create_child(self.current);
        self.scopes.define(
            self.current,
            Symbol::Variable(VariableSymbol {
                name: for_range.var.name.to_owned(),
                declared_type: Type::Int,
                initialized: true,
                span: for_range.var.span,
            }),
        );
        self.visit_stmt(for_range.body);
        self.current = self.scopes.parent(self.current).unwrap_or(ScopeId::GLOBAL);
    }

    fn visit_return(&mut self, ret: &ReturnStmt<'_>) {
        let Some(function) = self.current_function.clone() else {
            self.report(messages::return_outside_function(), ret.span);
            return;
        };
        if let Some(value) = ret.value {
            let actual = self.visit_expr(value);
            self.check_return_type(&function, actual, ret.span);
        }
    }

    fn visit_print(&mut self, print: &PrintStmt<'_>) {
        self.visit_expr(print.value);
    }

    fn check_condition(&mut self, construct: &str, condition: &Expr<'_>) {
        if let Some(ty) = self.visit_expr(condition) {
            if ty != Type::Bool {
                self.report(messages::condition_not_bool(construct, ty), condition.span());
            }
        }
    }

    fn check_return_type(&mut self, function: &str, actual: Option<Type>, span: Span) {
        let Some(Symbol::Function(symbol)) = self.scopes.lookup(ScopeId::GLOBAL, function) else {
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

    /// Best-effort expression typing; `None` means unknown, which suppresses
    /// cascading mismatch reports on enclosing expressions.
    fn visit_expr(&mut self, expr: &Expr<'_>) -> Option<Type> {
        match expr {
            Expr::Ident(ident) => self.visit_ident(ident.name, ident.span),
            Expr::Number(lit) => match lit.value {
                Number::Int(_) => Some(Type::Int),
                // The float diagnostic is the type checker's; here the value
                // just fails to type.
                Number::Float(_) => None,
            },
            Expr::Str(lit) => Some(match lit.kind {
                StrKind::Str => Type::Str,
                StrKind::MStr => Type::MStr,
            }),
            Expr::Bool(_) => Some(Type::Bool),
            Expr::Null(_) => Some(Type::Null),
            Expr::Binary(binary) => self.visit_binary(binary),
            Expr::Comparison(comparison) => self.visit_comparison(comparison),
            Expr::Unary(unary) => self.visit_unary(unary),
            Expr::Ternary(ternary) => self.visit_ternary(ternary),
            Expr::Index(index) => self.check_index(index),
            Expr::Array(array) => {
                for element in array.elements {
                    self.visit_expr(element);
                }
                Some(Type::Vector(VectorElem::Unknown))
            }
            Expr::Call(call) => self.visit_call(call),
            Expr::Paren(paren) => self.visit_expr(paren.expr),
        }
    }

    fn visit_ident(&mut self, name: &str, span: Span) -> Option<Type> {
        let Some(symbol) = self.scopes.lookup(self.current, name) else {
            self.report(messages::undefined_variable(name), span);
            return None;
        };
        let value_type = symbol.value_type();
        if value_type.is_some() && !symbol.is_initialized() {
            self.report(messages::used_before_assigned(name), span);
        }
        value_type
    }

    fn visit_binary(&mut self, binary: &BinaryExpr<'_>) -> Option<Type> {
        let lhs = self.visit_expr(binary.lhs);
        let rhs = self.visit_expr(binary.rhs);

        if binary.op.is_logical() {
            let bad = |side: Option<Type>| side.is_some_and(|ty| ty != Type::Bool);
            if bad(lhs) || bad(rhs) {
                self.report(messages::logical_operands(binary.op.symbol()), binary.span);
            }
            Some(Type::Bool)
        } else {
            // Arithmetic operand types are deliberately not cross-checked.
            Some(Type::Int)
        }
    }

    fn visit_comparison(&mut self, comparison: &ComparisonExpr<'_>) -> Option<Type> {
        // Operand compatibility is deliberately not cross-checked; every
        // comparison types as bool.
        self.visit_expr(comparison.lhs);
        self.visit_expr(comparison.rhs);
        Some(Type::Bool)
    }

    fn visit_unary(&mut self, unary: &UnaryExpr<'_>) -> Option<Type> {
        self.visit_expr(unary.operand);
        Some(match unary.op {
            UnaryOp::Not => Type::Bool,
            UnaryOp::Neg => Type::Int,
        })
    }

    fn visit_ternary(&mut self, ternary: &TernaryExpr<'_>) -> Option<Type> {
        self.visit_expr(ternary.condition);
        let true_type = self.visit_expr(ternary.if_true);
        // The false branch is checked for its own errors, but its type is
        // not required to agree with the true branch.
        self.visit_expr(ternary.if_false);
        true_type
    }

    fn check_index(&mut self, index: &IndexExpr<'_>) -> Option<Type> {
        let base = self.visit_expr(index.base);
        let idx = self.visit_expr(index.index);

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

    fn visit_call(&mut self, call: &CallExpr<'_>) -> Option<Type> {
        let name = call.callee.name;

        let arg_types: Vec<Option<Type>> = call
            .args
            .iter()
            .map(|arg| self.visit_expr(arg))
            .collect();

        let Some(symbol) = self.scopes.lookup(self.current, name) else {
            self.report(messages::undefined_function(name), call.span);
            return None;
        };
        let Symbol::Function(function) = symbol else {
            self.report(messages::not_a_function(name), call.span);
            return None;
        };
        let return_type = function.return_type;
        let params = function.params.clone();

        let expected = params.len();
        let got = arg_types.len();
        if got < expected {
            self.report(messages::too_few_arguments(name, expected, got), call.span);
            return Some(return_type);
        }
        if got > expected {
            self.report(messages::too_many_arguments(name, expected, got), call.span);
            return Some(return_type);
        }

        for (param, actual) in params.iter().zip(&arg_types) {
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

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience: analyze with the default configuration.
pub fn analyze(program: &Program<'_>) -> AnalysisOutput {
    SemanticAnalyzer::new().analyze(program)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use teslang_ast::{BinOp, CmpOp};

    use super::*;
    use crate::testutil::*;

    fn messages_of(output: &AnalysisOutput) -> Vec<String> {
        output
            .diagnostics
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }

    #[test]
    fn clean_function_has_no_findings() {
        let arena = Bump::new();
        let body = [
            var_decl(&arena, "x", "int", Some(int(5, 2)), 2),
            print_stmt(&arena, var(&arena, "x", 3), 3),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        let output = analyze(&program);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    }

    #[test]
    fn shadowing_in_child_scope_is_legal() {
        // The inner block redeclares x with a different type; references in
        // the block resolve to the inner binding, so no findings at all.
        let arena = Bump::new();
        let inner = [
            var_decl(&arena, "x", "str", Some(string(&arena, "s", 3)), 3),
            var_decl(&arena, "y", "str", Some(var(&arena, "x", 4)), 4),
        ];
        let body = [
            var_decl(&arena, "x", "int", Some(int(1, 2)), 2),
            block(&arena, &inner, 3),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        let output = analyze(&program);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    }

    #[test]
    fn same_scope_redeclaration_reported_once() {
        let arena = Bump::new();
        let body = [
            var_decl(&arena, "x", "int", None, 2),
            var_decl(&arena, "x", "int", None, 3),
            var_decl(&arena, "x", "int", None, 4),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        let output = analyze(&program);
        assert_eq!(
            messages_of(&output),
            vec!["variable 'x' is already defined in this scope."]
        );
        assert_eq!(output.diagnostics.as_slice()[0].line, 3);
    }

    #[test]
    fn use_before_assignment_reported() {
        let arena = Bump::new();
        let body = [
            var_decl(&arena, "x", "int", None, 2),
            print_stmt(&arena, var(&arena, "x", 3), 3),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        let output = analyze(&program);
        assert_eq!(
            messages_of(&output),
            vec!["variable 'x' is used before being assigned."]
        );
    }

    #[test]
    fn initializer_counts_as_assignment() {
        let arena = Bump::new();
        let body = [
            var_decl(&arena, "x", "int", Some(int(5, 2)), 2),
            print_stmt(&arena, var(&arena, "x", 3), 3),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert!(analyze(&program).diagnostics.is_empty());
    }

    #[test]
    fn assignment_initializes_for_later_uses() {
        let arena = Bump::new();
        let body = [
            var_decl(&arena, "x", "int", None, 2),
            assign(&arena, "x", int(1, 3), 3),
            print_stmt(&arena, var(&arena, "x", 4), 4),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert!(analyze(&program).diagnostics.is_empty());
    }

    #[test]
    fn call_arity_too_few_and_too_many() {
        let arena = Bump::new();
        let params = [param(&arena, "a", "int", 1), param(&arena, "b", "int", 1)];
        let target = function_with_expr_body(
            &arena,
            "add2",
            "int",
            &params,
            binary(&arena, BinOp::Add, var(&arena, "a", 1), var(&arena, "b", 1), 1),
            1,
        );

        let too_few = print_stmt(&arena, call(&arena, "add2", &[int(1, 3)], 3), 3);
        let too_many = print_stmt(
            &arena,
            call(&arena, "add2", &[int(1, 4), int(2, 4), int(3, 4)], 4),
            4,
        );
        let exact = print_stmt(
            &arena,
            call(&arena, "add2", &[int(1, 5), int(2, 5)], 5),
            5,
        );
        let main = function(&arena, "main", "null", &[], &[too_few, too_many, exact], 2);
        let program = program(&arena, &[target, main]);

        let output = analyze(&program);
        assert_eq!(
            messages_of(&output),
            vec![
                "function 'add2' expects 2 arguments but got 1.",
                "function 'add2': too many arguments (3 given, expected 2).",
            ]
        );
    }

    #[test]
    fn argument_type_mismatch_reported() {
        let arena = Bump::new();
        let params = [param(&arena, "n", "int", 1)];
        let target = function_with_expr_body(&arena, "idf", "int", &params, var(&arena, "n", 1), 1);
        let bad = print_stmt(
            &arena,
            call(&arena, "idf", &[string(&arena, "oops", 3)], 3),
            3,
        );
        let main = function(&arena, "main", "null", &[], &[bad], 2);
        let program = program(&arena, &[target, main]);

        assert_eq!(
            messages_of(&analyze(&program)),
            vec!["expected 'n' to be of type 'int', but got 'str' instead."]
        );
    }

    #[test]
    fn undefined_variable_and_function() {
        let arena = Bump::new();
        let body = [
            print_stmt(&arena, var(&arena, "ghost", 2), 2),
            print_stmt(&arena, call(&arena, "phantom", &[], 3), 3),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert_eq!(
            messages_of(&analyze(&program)),
            vec![
                "variable 'ghost' is not defined.",
                "function 'phantom' is not defined.",
            ]
        );
    }

    #[test]
    fn assigning_to_a_function_reported() {
        let arena = Bump::new();
        let body = [assign(&arena, "print", int(1, 2), 2)];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert_eq!(messages_of(&analyze(&program)), vec!["'print' is not a variable."]);
    }

    #[test]
    fn calling_a_variable_reported() {
        let arena = Bump::new();
        let body = [
            var_decl(&arena, "x", "int", Some(int(1, 2)), 2),
            print_stmt(&arena, call(&arena, "x", &[], 3), 3),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert_eq!(messages_of(&analyze(&program)), vec!["'x' is not a function."]);
    }

    #[test]
    fn invalid_type_spelling_reported() {
        let arena = Bump::new();
        let body = [var_decl(&arena, "x", "float", Some(int(1, 2)), 2)];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert_eq!(
            messages_of(&analyze(&program)),
            vec![
                "wrong type 'float' found. types must be one of 'int', 'vector', 'str', 'mstr', 'bool', 'null'."
            ]
        );
    }

    #[test]
    fn declaration_initializer_mismatch() {
        let arena = Bump::new();
        let body = [var_decl(&arena, "x", "int", Some(string(&arena, "s", 2)), 2)];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert_eq!(
            messages_of(&analyze(&program)),
            vec!["variable 'x' expected to be of type 'int' but it is 'str' instead."]
        );
    }

    #[test]
    fn assignment_type_mismatch() {
        let arena = Bump::new();
        let body = [
            var_decl(&arena, "x", "int", Some(int(1, 2)), 2),
            assign(&arena, "x", string(&arena, "s", 3), 3),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert_eq!(
            messages_of(&analyze(&program)),
            vec!["variable 'x' expected to be of type 'int' but it is 'str' instead."]
        );
    }

    #[test]
    fn vector_initializer_leniency() {
        // list() returns a bare vector; a vector<int> declaration accepts it.
        let arena = Bump::new();
        let body = [var_decl(
            &arena,
            "v",
            "vector",
            Some(call(&arena, "list", &[int(5, 2)], 2)),
            2,
        )];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert!(analyze(&program).diagnostics.is_empty());
    }

    #[test]
    fn conditions_must_be_bool() {
        let arena = Bump::new();
        let body = [
            if_stmt(&arena, int(1, 2), print_stmt(&arena, int(1, 2), 2), None, 2),
            while_stmt(&arena, int(1, 3), print_stmt(&arena, int(1, 3), 3), 3),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert_eq!(
            messages_of(&analyze(&program)),
            vec![
                "if condition must be boolean, got 'int'.",
                "while condition must be boolean, got 'int'.",
            ]
        );
    }

    #[test]
    fn for_bounds_must_be_int() {
        let arena = Bump::new();
        let body = [for_range(
            &arena,
            "i",
            string(&arena, "a", 2),
            boolean(true, 2),
            print_stmt(&arena, var(&arena, "i", 3), 3),
            2,
        )];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert_eq!(
            messages_of(&analyze(&program)),
            vec![
                "for loop start value must be int, got 'str'.",
                "for loop end value must be int, got 'bool'.",
            ]
        );
    }

    #[test]
    fn loop_variable_not_visible_in_bounds_or_after() {
        let arena = Bump::new();
        let body = [
            for_range(
                &arena,
                "i",
                int(0, 2),
                var(&arena, "i", 2),
                print_stmt(&arena, var(&arena, "i", 3), 3),
                2,
            ),
            print_stmt(&arena, var(&arena, "i", 5), 5),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        // The bound reference and the use after the loop both fail; the body
        // use is fine.
        assert_eq!(
            messages_of(&analyze(&program)),
            vec!["variable 'i' is not defined."]
        );
    }

    #[test]
    fn return_type_mismatch_reported() {
        let arena = Bump::new();
        let body = [return_stmt(&arena, Some(string(&arena, "s", 2)), 2)];
        let program = program(&arena, &[function(&arena, "f", "int", &[], &body, 1)]);

        assert_eq!(
            messages_of(&analyze(&program)),
            vec!["wrong return type. expected 'int' but got 'str'."]
        );
    }

    #[test]
    fn logical_operator_requires_bool_operands() {
        let arena = Bump::new();
        let bad = binary(&arena, BinOp::And, int(1, 2), boolean(true, 2), 2);
        let body = [var_decl(&arena, "b", "bool", Some(bad), 2)];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert_eq!(
            messages_of(&analyze(&program)),
            vec!["logical operator '&&' requires boolean operands."]
        );
    }

    #[test]
    fn comparison_operands_not_cross_checked() {
        // Deliberate permissiveness: comparing int to str types as bool
        // without complaint.
        let arena = Bump::new();
        let cmp = comparison(&arena, CmpOp::Eq, int(1, 2), string(&arena, "s", 2), 2);
        let body = [var_decl(&arena, "b", "bool", Some(cmp), 2)];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert!(analyze(&program).diagnostics.is_empty());
    }

    #[test]
    fn forward_and_recursive_calls_resolve() {
        let arena = Bump::new();
        let calls_later = print_stmt(&arena, call(&arena, "later", &[int(1, 2)], 2), 2);
        let first = function(&arena, "first", "null", &[], &[calls_later], 1);

        let recursive = return_stmt(
            &arena,
            Some(call(&arena, "later", &[var(&arena, "n", 5)], 5)),
            5,
        );
        let later = function(
            &arena,
            "later",
            "int",
            &[param(&arena, "n", "int", 4)],
            &[recursive],
            4,
        );
        let program = program(&arena, &[first, later]);

        assert!(analyze(&program).diagnostics.is_empty());
    }

    #[test]
    fn index_base_and_index_types_checked() {
        let arena = Bump::new();
        let body = [
            var_decl(&arena, "x", "int", Some(int(1, 2)), 2),
            print_stmt(
                &arena,
                index(&arena, var(&arena, "x", 3), string(&arena, "k", 3), 3),
                3,
            ),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert_eq!(
            messages_of(&analyze(&program)),
            vec![
                "expected array to be of type 'vector', but got 'int' instead.",
                "array index must be of type 'int', but got 'str' instead.",
            ]
        );
    }

    #[test]
    fn parenthesized_and_null_literals_type_through() {
        let arena = Bump::new();
        let body = [
            var_decl(&arena, "nothing", "null", Some(null(2)), 2),
            var_decl(&arena, "x", "int", Some(paren(&arena, int(4, 3), 3)), 3),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        assert!(analyze(&program).diagnostics.is_empty());
    }

    #[test]
    fn reanalysis_is_identical() {
        // No hidden cross-run state: a fresh analyzer over the same tree
        // reports the same findings.
        let arena = Bump::new();
        let body = [
            print_stmt(&arena, var(&arena, "ghost", 2), 2),
            var_decl(&arena, "x", "int", None, 3),
            print_stmt(&arena, var(&arena, "x", 4), 4),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        let first = analyze(&program);
        let second = analyze(&program);
        assert_eq!(first.diagnostics.as_slice(), second.diagnostics.as_slice());
    }

    #[test]
    fn line_keyed_dedup_keeps_repeats() {
        let arena = Bump::new();
        let body = [
            print_stmt(&arena, var(&arena, "ghost", 2), 2),
            print_stmt(&arena, var(&arena, "ghost", 3), 3),
        ];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        let default_run = SemanticAnalyzer::new().analyze(&program);
        assert_eq!(default_run.diagnostics.len(), 1);

        let line_keyed = SemanticAnalyzer::with_dedup(DedupKey::MessageFunctionAndLine)
            .analyze(&program);
        assert_eq!(line_keyed.diagnostics.len(), 2);
    }

    #[test]
    fn function_scope_recorded_under_global() {
        let arena = Bump::new();
        let body = [var_decl(&arena, "x", "int", Some(int(1, 2)), 2)];
        let program = program(&arena, &[function(&arena, "main", "null", &[], &body, 1)]);

        let output = analyze(&program);
        let children = output.scopes.children(ScopeId::GLOBAL);
        assert_eq!(children.len(), 1);
        assert!(output.scopes.lookup_local(children[0], "x").is_some());
        assert!(output.scopes.lookup(children[0], "print").is_some());
    }
}
