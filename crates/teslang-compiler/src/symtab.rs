//! Hierarchical symbol tables.
//!
//! Scopes form a tree: each scope owns a name-to-symbol map and knows its
//! parent; lookup walks outward until the global scope. Scopes are created
//! during the semantic analyzer's walk and never removed, so the tree can be
//! replayed read-only by later passes and inspected after analysis.
//!
//! Absence is a routine outcome here: lookups return `Option`, never an
//! error, because "not found" drives diagnostics upstream.

use rustc_hash::FxHashMap;
use teslang_core::{Span, Type, VectorElem};

// ============================================================================
// Symbols
// ============================================================================

/// A declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    /// Variable name
    pub name: String,
    /// Declared type
    pub declared_type: Type,
    /// Whether the variable has been assigned a value
    pub initialized: bool,
    /// Source location of declaration
    pub span: Span,
}

/// A declared vector variable.
///
/// Vectors are dynamically sized at runtime but statically typed by element.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSymbol {
    /// Variable name
    pub name: String,
    /// Element type; only `int` is exercised today
    pub element_type: Type,
    /// Statically known element count, when the initializer reveals one
    pub size_bound: Option<u32>,
    /// Whether the vector has been assigned a value
    pub initialized: bool,
    /// Source location of declaration
    pub span: Span,
}

impl VectorSymbol {
    /// The vector type this symbol holds.
    pub fn value_type(&self) -> Type {
        match self.element_type {
            Type::Int => Type::Vector(VectorElem::Int),
            _ => Type::Vector(VectorElem::Unknown),
        }
    }
}

/// A declared function's signature parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSig {
    /// Parameter name
    pub name: String,
    /// Declared parameter type
    pub ty: Type,
}

/// A declared function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    /// Function name
    pub name: String,
    /// Declared return type
    pub return_type: Type,
    /// Parameters in declaration order
    pub params: Vec<ParamSig>,
    /// Source location of declaration
    pub span: Span,
}

/// A symbol table entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// A scalar variable.
    Variable(VariableSymbol),
    /// A vector variable.
    Vector(VectorSymbol),
    /// A function. Always lives in the global scope.
    Function(FunctionSymbol),
}

impl Symbol {
    /// The declared name.
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(v) => &v.name,
            Symbol::Vector(v) => &v.name,
            Symbol::Function(f) => &f.name,
        }
    }

    /// Whether this is a function symbol.
    pub fn is_function(&self) -> bool {
        matches!(self, Symbol::Function(_))
    }

    /// The type a reference to this symbol evaluates to.
    ///
    /// `None` for functions: a bare function name is not a value.
    pub fn value_type(&self) -> Option<Type> {
        match self {
            Symbol::Variable(v) => Some(v.declared_type),
            Symbol::Vector(v) => Some(v.value_type()),
            Symbol::Function(_) => None,
        }
    }

    /// Whether the symbol has been assigned. Functions count as initialized.
    pub fn is_initialized(&self) -> bool {
        match self {
            Symbol::Variable(v) => v.initialized,
            Symbol::Vector(v) => v.initialized,
            Symbol::Function(_) => true,
        }
    }

    /// Mark a variable-family symbol as assigned. No-op for functions.
    pub fn mark_initialized(&mut self) {
        match self {
            Symbol::Variable(v) => v.initialized = true,
            Symbol::Vector(v) => v.initialized = true,
            Symbol::Function(_) => {}
        }
    }
}

// ============================================================================
// Scope tree
// ============================================================================

/// Index of a scope within a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The global scope. Always present, has no parent.
    pub const GLOBAL: ScopeId = ScopeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    symbols: FxHashMap<String, Symbol>,
}

/// The scope tree for one analyzed program.
///
/// Scopes are addressed by [`ScopeId`] rather than references, which keeps
/// the whole chain in one owner: a parent trivially outlives its children,
/// and later passes can hold the tree immutably while walking it. Children
/// are recorded in creation order so a second pass can re-enter them by
/// replaying the same traversal.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Create a tree containing only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Allocate a new scope whose parent is `parent`.
    pub fn create_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            children: Vec::new(),
            symbols: FxHashMap::default(),
        });
        self.scopes[parent.index()].children.push(id);
        id
    }

    /// Insert a symbol into `scope`, overwriting on name collision.
    ///
    /// Collision detection and reporting is the caller's responsibility,
    /// performed (via [`lookup_local`](Self::lookup_local)) before defining.
    pub fn define(&mut self, scope: ScopeId, symbol: Symbol) {
        self.scopes[scope.index()]
            .symbols
            .insert(symbol.name().to_owned(), symbol);
    }

    /// Search `scope` and its ancestors for `name`, innermost match first.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.resolve(scope, name)
            .map(|(_, symbol)| symbol)
    }

    /// Search only `scope` itself for `name`.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes[scope.index()].symbols.get(name)
    }

    /// Search `scope` and its ancestors, returning the defining scope too.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<(ScopeId, &Symbol)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(symbol) = self.scopes[id.index()].symbols.get(name) {
                return Some((id, symbol));
            }
            current = self.scopes[id.index()].parent;
        }
        None
    }

    /// Mark the innermost binding of `name` visible from `scope` as
    /// initialized. No-op when the name does not resolve.
    pub fn mark_initialized(&mut self, scope: ScopeId, name: &str) {
        if let Some((owner, _)) = self.resolve(scope, name) {
            if let Some(symbol) = self.scopes[owner.index()].symbols.get_mut(name) {
                symbol.mark_initialized();
            }
        }
    }

    /// The parent of `scope`, or `None` for the global scope.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.index()].parent
    }

    /// The children of `scope`, in creation order.
    pub fn children(&self, scope: ScopeId) -> &[ScopeId] {
        &self.scopes[scope.index()].children
    }

    /// Iterate over the symbols defined directly in `scope`.
    ///
    /// Iteration order is unspecified; this exists for post-hoc inspection,
    /// not for lookup.
    pub fn symbols(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> {
        self.scopes[scope.index()].symbols.values()
    }

    /// Total number of scopes, the global one included.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether the tree holds only the global scope.
    pub fn is_empty(&self) -> bool {
        self.scopes.len() == 1
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
