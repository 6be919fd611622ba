//! Code generation: lowering the AST to the flat mnemonic stream.
//!
//! Each function is emitted as an independent `proc` block with its own
//! register namespace: `r0` is the return-value slot, `r1..rN` bind the
//! parameters in declaration order, and every value computed after that
//! mints the next unused index. Structured control flow is linearized into
//! label/`jz`/`jmp` sequences; label indices are minted per construct kind
//! so nesting and siblings never collide.
//!
//! All counters live in per-run state threaded through the walk, so two
//! generations can never interfere. Generation is best-effort by design: it
//! runs only after the checking passes have certified the program, so an
//! unexpected shape degrades to a passthrough instead of aborting.

mod instr;

pub use instr::{BinMnemonic, Instr, Label, Listing, Operand, Reg, UnMnemonic};

use rustc_hash::FxHashMap;
use teslang_ast::{
    ArrayLit, AssignStmt, AssignTarget, BinOp, BinaryExpr, CallExpr, CmpOp, ComparisonExpr,
    DoWhileStmt, Expr, ForRangeStmt, FunctionBody, FunctionDecl, IfStmt, IndexExpr, Number,
    Program, ReturnStmt, Stmt, TernaryExpr, UnaryExpr, UnaryOp, WhileStmt,
};

/// Per-function generation state: the register counter, the name-to-register
/// bindings, and the per-construct-kind label counters.
///
/// A fresh one is built for every function, which is what keeps `proc`
/// blocks independent of each other.
#[derive(Debug)]
struct FunctionState<'ast> {
    /// Next unused register index; starts at 1, `r0` is the return slot.
    next_reg: u32,
    vars: FxHashMap<&'ast str, Reg>,
    if_count: u32,
    while_count: u32,
    for_count: u32,
}

impl<'ast> FunctionState<'ast> {
    fn new() -> Self {
        Self {
            next_reg: 1,
            vars: FxHashMap::default(),
            if_count: 0,
            while_count: 0,
            for_count: 0,
        }
    }

    /// Mint the next unused register.
    fn fresh(&mut self) -> Reg {
        let reg = Reg(self.next_reg);
        self.next_reg += 1;
        reg
    }

    /// The register bound to `name`, binding a fresh one on first touch.
    fn var(&mut self, name: &'ast str) -> Reg {
        if let Some(&reg) = self.vars.get(name) {
            return reg;
        }
        let reg = self.fresh();
        self.vars.insert(name, reg);
        reg
    }

    /// Paired labels for a conditional: `(else_N, endif_N)`.
    fn if_pair(&mut self) -> (Label, Label) {
        let index = self.if_count;
        self.if_count += 1;
        (
            Label { prefix: "else", index },
            Label { prefix: "endif", index },
        )
    }

    /// Paired labels for a while/do-while loop: `(while_N, endwhile_N)`.
    fn while_pair(&mut self) -> (Label, Label) {
        let index = self.while_count;
        self.while_count += 1;
        (
            Label { prefix: "while", index },
            Label { prefix: "endwhile", index },
        )
    }

    /// Paired labels for a for loop: `(for_N, endfor_N)`.
    fn for_pair(&mut self) -> (Label, Label) {
        let index = self.for_count;
        self.for_count += 1;
        (
            Label { prefix: "for", index },
            Label { prefix: "endfor", index },
        )
    }
}

/// The code generator.
///
/// Purely a function of the AST plus its internal counters: no I/O, no
/// shared state, just the returned [`Listing`]. Callers gate it on a clean
/// diagnostic set; the generator itself does not re-check the program.
#[derive(Debug, Default)]
pub struct CodeGenerator<'ast> {
    code: Listing<'ast>,
}

impl<'ast> CodeGenerator<'ast> {
    /// Create a generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower a program to its instruction stream.
    pub fn generate(mut self, program: &Program<'ast>) -> Listing<'ast> {
        for function in program.functions() {
            self.gen_function(function);
        }
        self.code
    }

    fn emit(&mut self, instr: Instr<'ast>) {
        self.code.push(instr);
    }

    // ==========================================================================
    // Functions
    // ==========================================================================

    fn gen_function(&mut self, function: &FunctionDecl<'ast>) {
        let mut state = FunctionState::new();

        let mut params = Vec::with_capacity(function.params.len());
        for param in function.params {
            let reg = state.fresh();
            state.vars.insert(param.name.name, reg);
            params.push(param.name.name);
        }
        self.emit(Instr::Proc {
            name: function.name.name,
            params,
        });

        match function.body {
            FunctionBody::Block(block) => {
                for stmt in block.stmts {
                    self.gen_stmt(&mut state, stmt);
                }
            }
            FunctionBody::Expr(expr) => {
                if let Some(reg) = self.gen_expr(&mut state, expr) {
                    self.emit(Instr::Mov {
                        dst: Reg(0),
                        src: Operand::Reg(reg),
                    });
                }
                self.emit(Instr::Ret);
            }
        }

        // Control falling off the end returns the int zero.
        if !matches!(self.code.instrs().last(), Some(Instr::Ret)) {
            self.emit(Instr::Mov {
                dst: Reg(0),
                src: Operand::Imm(0),
            });
            self.emit(Instr::Ret);
        }
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    fn gen_stmt(&mut self, state: &mut FunctionState<'ast>, stmt: &Stmt<'ast>) {
        match stmt {
            Stmt::VarDecl(decl) => {
                let var_reg = state.fresh();
                state.vars.insert(decl.name.name, var_reg);
                if let Some(init) = decl.init {
                    if let Some(init_reg) = self.gen_expr(state, init) {
                        self.emit(Instr::Mov {
                            dst: var_reg,
                            src: Operand::Reg(init_reg),
                        });
                    }
                }
            }
            Stmt::Assign(assign) => self.gen_assign(state, assign),
            Stmt::If(if_stmt) => self.gen_if(state, if_stmt),
            Stmt::While(while_stmt) => self.gen_while(state, while_stmt),
            Stmt::DoWhile(do_while) => self.gen_do_while(state, do_while),
            Stmt::ForRange(for_range) => self.gen_for_range(state, for_range),
            Stmt::Return(ret) => self.gen_return(state, ret),
            Stmt::Print(print) => {
                if let Some(reg) = self.gen_expr(state, print.value) {
                    self.emit(Instr::Call {
                        name: "iput",
                        regs: vec![reg],
                    });
                }
            }
            Stmt::Expr(expr_stmt) => {
                self.gen_expr(state, expr_stmt.expr);
            }
            Stmt::Block(block) => {
                for stmt in block.stmts {
                    self.gen_stmt(state, stmt);
                }
            }
        }
    }

    fn gen_assign(&mut self, state: &mut FunctionState<'ast>, assign: &AssignStmt<'ast>) {
        let value = self.gen_expr(state, assign.value);

        match &assign.target {
            AssignTarget::Ident(ident) => {
                let var_reg = state.var(ident.name);
                if let Some(value) = value {
                    self.emit(Instr::Mov {
                        dst: var_reg,
                        src: Operand::Reg(value),
                    });
                }
            }
            AssignTarget::Index(index) => {
                let base = self.gen_expr(state, index.base);
                let idx = self.gen_expr(state, index.index);
                if let (Some(value), Some(base), Some(idx)) = (value, base, idx) {
                    self.emit(Instr::Store {
                        base,
                        index: idx,
                        src: value,
                    });
                }
            }
        }
    }

    fn gen_if(&mut self, state: &mut FunctionState<'ast>, if_stmt: &IfStmt<'ast>) {
        let Some(cond) = self.gen_expr(state, if_stmt.condition) else {
            return;
        };
        let (else_label, endif_label) = state.if_pair();

        self.emit(Instr::Jz {
            cond,
            target: else_label,
        });
        self.gen_stmt(state, if_stmt.then_branch);
        self.emit(Instr::Jmp {
            target: endif_label,
        });
        self.emit(Instr::Label(else_label));
        if let Some(else_branch) = if_stmt.else_branch {
            self.gen_stmt(state, else_branch);
        }
        self.emit(Instr::Label(endif_label));
    }

    fn gen_while(&mut self, state: &mut FunctionState<'ast>, while_stmt: &WhileStmt<'ast>) {
        let (loop_label, end_label) = state.while_pair();

        self.emit(Instr::Label(loop_label));
        if let Some(cond) = self.gen_expr(state, while_stmt.condition) {
            self.emit(Instr::Jz {
                cond,
                target: end_label,
            });
        }
        self.gen_stmt(state, while_stmt.body);
        self.emit(Instr::Jmp { target: loop_label });
        self.emit(Instr::Label(end_label));
    }

    fn gen_do_while(&mut self, state: &mut FunctionState<'ast>, do_while: &DoWhileStmt<'ast>) {
        let (loop_label, end_label) = state.while_pair();

        self.emit(Instr::Label(loop_label));
        self.gen_stmt(state, do_while.body);
        if let Some(cond) = self.gen_expr(state, do_while.condition) {
            self.emit(Instr::Jz {
                cond,
                target: end_label,
            });
        }
        self.emit(Instr::Jmp { target: loop_label });
        self.emit(Instr::Label(end_label));
    }

    fn gen_for_range(&mut self, state: &mut FunctionState<'ast>, for_range: &ForRangeStmt<'ast>) {
        let var_reg = state.fresh();
        state.vars.insert(for_range.var.name, var_reg);

        if let Some(start) = self.gen_expr(state, for_range.start) {
            self.emit(Instr::Mov {
                dst: var_reg,
                src: Operand::Reg(start),
            });
        }
        // The end bound is computed once, before the loop.
        let end = self.gen_expr(state, for_range.end);

        let (loop_label, end_label) = state.for_pair();
        self.emit(Instr::Label(loop_label));
        if let Some(end) = end {
            let cond = state.fresh();
            self.emit(Instr::Bin {
                op: BinMnemonic::Lt,
                dst: cond,
                lhs: var_reg,
                rhs: Operand::Reg(end),
            });
            self.emit(Instr::Jz {
                cond,
                target: end_label,
            });
        }
        self.gen_stmt(state, for_range.body);
        self.emit(Instr::Bin {
            op: BinMnemonic::Add,
            dst: var_reg,
            lhs: var_reg,
            rhs: Operand::Imm(1),
        });
        self.emit(Instr::Jmp { target: loop_label });
        self.emit(Instr::Label(end_label));
    }

    fn gen_return(&mut self, state: &mut FunctionState<'ast>, ret: &ReturnStmt<'ast>) {
        match ret.value {
            Some(value) => {
                if let Some(reg) = self.gen_expr(state, value) {
                    self.emit(Instr::Mov {
                        dst: Reg(0),
                        src: Operand::Reg(reg),
                    });
                }
            }
            None => {
                self.emit(Instr::Mov {
                    dst: Reg(0),
                    src: Operand::Imm(0),
                });
            }
        }
        self.emit(Instr::Ret);
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    /// Lower an expression, returning the register holding its value.
    ///
    /// `None` means the expression produced no value (e.g. a `print` call);
    /// enclosing lowerings skip their emission rather than abort.
    fn gen_expr(&mut self, state: &mut FunctionState<'ast>, expr: &Expr<'ast>) -> Option<Reg> {
        match expr {
            Expr::Ident(ident) => Some(state.var(ident.name)),
            Expr::Number(lit) => {
                let dst = state.fresh();
                // Non-integral literals are rejected by the checking passes;
                // truncation is the best-effort fallback.
                let value = match lit.value {
                    Number::Int(value) => value,
                    Number::Float(value) => value as i64,
                };
                self.emit(Instr::Mov {
                    dst,
                    src: Operand::Imm(value),
                });
                Some(dst)
            }
            Expr::Str(lit) => {
                let dst = state.fresh();
                self.emit(Instr::Mov {
                    dst,
                    src: Operand::Str(lit.value),
                });
                Some(dst)
            }
            Expr::Bool(lit) => {
                let dst = state.fresh();
                self.emit(Instr::Mov {
                    dst,
                    src: Operand::Imm(i64::from(lit.value)),
                });
                Some(dst)
            }
            Expr::Null(_) => {
                let dst = state.fresh();
                self.emit(Instr::Mov {
                    dst,
                    src: Operand::Imm(0),
                });
                Some(dst)
            }
            Expr::Binary(binary) => self.gen_binary(state, binary),
            Expr::Comparison(comparison) => self.gen_comparison(state, comparison),
            Expr::Unary(unary) => self.gen_unary(state, unary),
            Expr::Ternary(ternary) => self.gen_ternary(state, ternary),
            Expr::Index(index) => self.gen_index(state, index),
            Expr::Array(array) => self.gen_array(state, array),
            Expr::Call(call) => self.gen_call(state, call),
            Expr::Paren(paren) => self.gen_expr(state, paren.expr),
        }
    }

    fn gen_binary(&mut self, state: &mut FunctionState<'ast>, binary: &BinaryExpr<'ast>) -> Option<Reg> {
        let lhs = self.gen_expr(state, binary.lhs)?;
        let rhs = self.gen_expr(state, binary.rhs)?;
        let dst = state.fresh();

        let op = match binary.op {
            BinOp::Add => Some(BinMnemonic::Add),
            BinOp::Sub => Some(BinMnemonic::Sub),
            BinOp::Mul => Some(BinMnemonic::Mul),
            BinOp::Div => Some(BinMnemonic::Div),
            BinOp::Mod => Some(BinMnemonic::Mod),
            // No logical mnemonics in the instruction set; degrade to a
            // passthrough of the left operand.
            BinOp::And | BinOp::Or => None,
        };
        match op {
            Some(op) => self.emit(Instr::Bin {
                op,
                dst,
                lhs,
                rhs: Operand::Reg(rhs),
            }),
            None => self.emit(Instr::Mov {
                dst,
                src: Operand::Reg(lhs),
            }),
        }
        Some(dst)
    }

    fn gen_comparison(
        &mut self,
        state: &mut FunctionState<'ast>,
        comparison: &ComparisonExpr<'ast>,
    ) -> Option<Reg> {
        let lhs = self.gen_expr(state, comparison.lhs)?;
        let rhs = self.gen_expr(state, comparison.rhs)?;
        let dst = state.fresh();

        let op = match comparison.op {
            CmpOp::Eq => BinMnemonic::Eq,
            CmpOp::Ne => BinMnemonic::Ne,
            CmpOp::Lt => BinMnemonic::Lt,
            CmpOp::Gt => BinMnemonic::Gt,
            CmpOp::Le => BinMnemonic::Le,
            CmpOp::Ge => BinMnemonic::Ge,
        };
        self.emit(Instr::Bin {
            op,
            dst,
            lhs,
            rhs: Operand::Reg(rhs),
        });
        Some(dst)
    }

    fn gen_unary(&mut self, state: &mut FunctionState<'ast>, unary: &UnaryExpr<'ast>) -> Option<Reg> {
        let src = self.gen_expr(state, unary.operand)?;
        let dst = state.fresh();
        let op = match unary.op {
            UnaryOp::Neg => UnMnemonic::Neg,
            UnaryOp::Not => UnMnemonic::Not,
        };
        self.emit(Instr::Un { op, dst, src });
        Some(dst)
    }

    fn gen_ternary(
        &mut self,
        state: &mut FunctionState<'ast>,
        ternary: &TernaryExpr<'ast>,
    ) -> Option<Reg> {
        let cond = self.gen_expr(state, ternary.condition)?;
        let dst = state.fresh();
        let (else_label, endif_label) = state.if_pair();

        self.emit(Instr::Jz {
            cond,
            target: else_label,
        });
        if let Some(reg) = self.gen_expr(state, ternary.if_true) {
            self.emit(Instr::Mov {
                dst,
                src: Operand::Reg(reg),
            });
        }
        self.emit(Instr::Jmp {
            target: endif_label,
        });
        self.emit(Instr::Label(else_label));
        if let Some(reg) = self.gen_expr(state, ternary.if_false) {
            self.emit(Instr::Mov {
                dst,
                src: Operand::Reg(reg),
            });
        }
        self.emit(Instr::Label(endif_label));
        Some(dst)
    }

    fn gen_index(&mut self, state: &mut FunctionState<'ast>, index: &IndexExpr<'ast>) -> Option<Reg> {
        let base = self.gen_expr(state, index.base)?;
        let idx = self.gen_expr(state, index.index)?;
        let dst = state.fresh();
        self.emit(Instr::Load {
            dst,
            base,
            index: idx,
        });
        Some(dst)
    }

    fn gen_array(&mut self, state: &mut FunctionState<'ast>, array: &ArrayLit<'ast>) -> Option<Reg> {
        // Allocate the cells up front, then store each element.
        let size = state.fresh();
        self.emit(Instr::Mov {
            dst: size,
            src: Operand::Imm(array.elements.len() as i64),
        });
        let dst = state.fresh();
        self.emit(Instr::Call {
            name: "mem",
            regs: vec![dst, size],
        });

        for (i, element) in array.elements.iter().enumerate() {
            if let Some(value) = self.gen_expr(state, element) {
                let index = state.fresh();
                self.emit(Instr::Mov {
                    dst: index,
                    src: Operand::Imm(i as i64),
                });
                self.emit(Instr::Store {
                    base: dst,
                    index,
                    src: value,
                });
            }
        }
        Some(dst)
    }

    fn gen_call(&mut self, state: &mut FunctionState<'ast>, call: &CallExpr<'ast>) -> Option<Reg> {
        match call.callee.name {
            "scan" => {
                let dst = state.fresh();
                self.emit(Instr::Call {
                    name: "iget",
                    regs: vec![dst],
                });
                Some(dst)
            }
            "print" => {
                if let Some(arg) = call.args.first() {
                    if let Some(reg) = self.gen_expr(state, arg) {
                        self.emit(Instr::Call {
                            name: "iput",
                            regs: vec![reg],
                        });
                    }
                }
                None
            }
            "length" => {
                let src = self.gen_expr(state, call.args.first()?)?;
                let dst = state.fresh();
                self.emit(Instr::Len { dst, src });
                Some(dst)
            }
            "list" => {
                let size = self.gen_expr(state, call.args.first()?)?;
                let dst = state.fresh();
                self.emit(Instr::Call {
                    name: "mem",
                    regs: vec![dst, size],
                });
                Some(dst)
            }
            name => {
                let args: Vec<Reg> = call
                    .args
                    .iter()
                    .filter_map(|arg| self.gen_expr(state, arg))
                    .collect();
                let dst = state.fresh();
                let mut regs = Vec::with_capacity(args.len() + 1);
                regs.push(dst);
                regs.extend(args);
                self.emit(Instr::Call { name, regs });
                Some(dst)
            }
        }
    }
}
