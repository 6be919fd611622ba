//! The mnemonic instruction stream emitted for the register VM.
//!
//! Instructions are plain data with a `Display` that produces the exact text
//! the VM consumes: one instruction per line, registers spelled `rN`, labels
//! as bare `name:` lines, indexed addressing as `[base + offset]`, and
//! `#`-prefixed comment text ignored by the consumer.

use std::fmt;

/// A virtual register.
///
/// Registers are unbounded and minted by index; `r0` is the per-function
/// return-value slot and `r1..rN` hold the parameters in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg(pub u32);

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A jump target, e.g. `else_2` or `endwhile_0`.
///
/// Paired labels (`else_N`/`endif_N`) share their index; indices are minted
/// per construct kind so nested and sibling constructs never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label {
    /// The construct-kind prefix, e.g. `else` or `endfor`.
    pub prefix: &'static str,
    /// The per-kind index.
    pub index: u32,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.prefix, self.index)
    }
}

/// A source operand: a register, an integer immediate, or a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'ast> {
    /// A register.
    Reg(Reg),
    /// An integer immediate.
    Imm(i64),
    /// A quoted string literal.
    Str(&'ast str),
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{reg}"),
            Operand::Imm(value) => write!(f, "{value}"),
            Operand::Str(text) => write!(f, "\"{text}\""),
        }
    }
}

/// Three-operand ALU mnemonics: `op dst, lhs, rhs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinMnemonic {
    /// `add`
    Add,
    /// `sub`
    Sub,
    /// `mul`
    Mul,
    /// `div`
    Div,
    /// `mod`
    Mod,
    /// `eq`
    Eq,
    /// `ne`
    Ne,
    /// `lt`
    Lt,
    /// `gt`
    Gt,
    /// `le`
    Le,
    /// `ge`
    Ge,
}

impl fmt::Display for BinMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinMnemonic::Add => "add",
            BinMnemonic::Sub => "sub",
            BinMnemonic::Mul => "mul",
            BinMnemonic::Div => "div",
            BinMnemonic::Mod => "mod",
            BinMnemonic::Eq => "eq",
            BinMnemonic::Ne => "ne",
            BinMnemonic::Lt => "lt",
            BinMnemonic::Gt => "gt",
            BinMnemonic::Le => "le",
            BinMnemonic::Ge => "ge",
        };
        f.write_str(name)
    }
}

/// Two-operand ALU mnemonics: `op dst, src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnMnemonic {
    /// `neg`
    Neg,
    /// `not`
    Not,
}

impl fmt::Display for UnMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnMnemonic::Neg => "neg",
            UnMnemonic::Not => "not",
        })
    }
}

/// One emitted instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr<'ast> {
    /// Procedure header with the parameter-to-register mapping as a trailing
    /// comment: `proc f # a => r1, b => r2 & return value => r0`. The
    /// comment is for readers of the stream; the VM ignores it.
    Proc {
        /// Function name.
        name: &'ast str,
        /// Parameter names in declaration order; parameter `i` is bound to
        /// register `i + 1`.
        params: Vec<&'ast str>,
    },
    /// A bare `label:` line.
    Label(Label),
    /// `mov dst, src`
    Mov { dst: Reg, src: Operand<'ast> },
    /// Indexed load: `mov dst, [base + index]`
    Load { dst: Reg, base: Reg, index: Reg },
    /// Indexed store: `mov [base + index], src`
    Store { base: Reg, index: Reg, src: Reg },
    /// `op dst, lhs, rhs`
    Bin {
        op: BinMnemonic,
        dst: Reg,
        lhs: Reg,
        rhs: Operand<'ast>,
    },
    /// `op dst, src`
    Un { op: UnMnemonic, dst: Reg, src: Reg },
    /// Vector length: `len dst, src`
    Len { dst: Reg, src: Reg },
    /// Jump if zero: `jz cond, target`
    Jz { cond: Reg, target: Label },
    /// Unconditional jump: `jmp target`
    Jmp { target: Label },
    /// `call name, r...`; for user functions the first register is the
    /// result, the rest the arguments; intrinsics fix their own shapes.
    Call { name: &'ast str, regs: Vec<Reg> },
    /// Return to caller: `ret`
    Ret,
}

impl fmt::Display for Instr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Proc { name, params } => {
                write!(f, "proc {name} # ")?;
                for (i, param) in params.iter().enumerate() {
                    let sep = if i + 1 == params.len() { " & " } else { ", " };
                    write!(f, "{param} => r{}{sep}", i + 1)?;
                }
                write!(f, "return value => r0")
            }
            Instr::Label(label) => write!(f, "{label}:"),
            Instr::Mov { dst, src } => write!(f, "mov {dst}, {src}"),
            Instr::Load { dst, base, index } => write!(f, "mov {dst}, [{base} + {index}]"),
            Instr::Store { base, index, src } => write!(f, "mov [{base} + {index}], {src}"),
            Instr::Bin { op, dst, lhs, rhs } => write!(f, "{op} {dst}, {lhs}, {rhs}"),
            Instr::Un { op, dst, src } => write!(f, "{op} {dst}, {src}"),
            Instr::Len { dst, src } => write!(f, "len {dst}, {src}"),
            Instr::Jz { cond, target } => write!(f, "jz {cond}, {target}"),
            Instr::Jmp { target } => write!(f, "jmp {target}"),
            Instr::Call { name, regs } => {
                write!(f, "call {name}")?;
                for reg in regs {
                    write!(f, ", {reg}")?;
                }
                Ok(())
            }
            Instr::Ret => f.write_str("ret"),
        }
    }
}

/// The ordered instruction stream produced for one program.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Listing<'ast> {
    instrs: Vec<Instr<'ast>>,
}

impl<'ast> Listing<'ast> {
    /// Create an empty listing.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, instr: Instr<'ast>) {
        self.instrs.push(instr);
    }

    /// The instructions in emission order.
    pub fn instrs(&self) -> &[Instr<'ast>] {
        &self.instrs
    }

    /// Render each instruction as its text line.
    pub fn lines(&self) -> Vec<String> {
        self.instrs.iter().map(Instr::to_string).collect()
    }

    /// Number of instructions (labels and headers included).
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    /// Whether nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// Iterate over the instructions.
    pub fn iter(&self) -> impl Iterator<Item = &Instr<'ast>> {
        self.instrs.iter()
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.instrs {
            writeln!(f, "{instr}")?;
        }
        Ok(())
    }
}
