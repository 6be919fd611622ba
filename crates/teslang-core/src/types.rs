//! Semantic types for TesLang.
//!
//! The type universe is a closed set: there are no user-defined types, and
//! the only composite is `vector` with its element type part of the type's
//! identity. `any` is a pseudo-type used exclusively for builtin parameter
//! matching (`print` accepts anything); it is not spellable in source.

use std::fmt;

/// Element type of a vector.
///
/// Source spells vectors as bare `vector`; the element type is established
/// where the vector value is created. Only `vector<int>` is exercised today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorElem {
    /// Element type not (yet) known, e.g. an array literal or a bare
    /// `vector` spelling.
    Unknown,
    /// `vector<int>`.
    Int,
}

/// A semantic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Machine integer, the arithmetic type.
    Int,
    /// Boolean.
    Bool,
    /// Single-line string.
    Str,
    /// Multi-line string.
    MStr,
    /// Dynamically sized, statically element-typed vector.
    Vector(VectorElem),
    /// The null type, also the return type of value-less builtins.
    Null,
    /// Builtin-parameter wildcard; matches every argument type.
    Any,
}

/// The spellings accepted in declarations, in diagnostic order.
pub const VALID_SPELLINGS: &str = "'int', 'vector', 'str', 'mstr', 'bool', 'null'";

impl Type {
    /// Resolve a declared type spelling, or `None` if it is not one of the
    /// valid spellings. `any` is deliberately not spellable.
    pub fn from_spelling(spelling: &str) -> Option<Type> {
        match spelling {
            "int" => Some(Type::Int),
            "bool" => Some(Type::Bool),
            "str" => Some(Type::Str),
            "mstr" => Some(Type::MStr),
            "vector" => Some(Type::Vector(VectorElem::Int)),
            "null" => Some(Type::Null),
            _ => None,
        }
    }

    /// Whether two types are compatible.
    ///
    /// Types are compatible iff identical, with two exceptions:
    /// - a bare `vector` is compatible with `vector<int>` in both directions
    ///   (historical leniency, preserved deliberately);
    /// - `any` matches everything (builtin parameter contracts only).
    pub fn is_compatible(self, other: Type) -> bool {
        match (self, other) {
            (a, b) if a == b => true,
            (Type::Any, _) | (_, Type::Any) => true,
            (Type::Vector(VectorElem::Unknown), Type::Vector(_)) => true,
            (Type::Vector(_), Type::Vector(VectorElem::Unknown)) => true,
            _ => false,
        }
    }

    /// Whether this is a vector-family type.
    #[inline]
    pub fn is_vector(self) -> bool {
        matches!(self, Type::Vector(_))
    }

    /// The element type of a vector-family type.
    ///
    /// An unknown element type defaults to `int` by convention.
    pub fn element_type(self) -> Option<Type> {
        match self {
            Type::Vector(VectorElem::Int) | Type::Vector(VectorElem::Unknown) => Some(Type::Int),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Int => "int",
            Type::Bool => "bool",
            Type::Str => "str",
            Type::MStr => "mstr",
            Type::Vector(VectorElem::Unknown) => "vector",
            Type::Vector(VectorElem::Int) => "vector<int>",
            Type::Null => "null",
            Type::Any => "any",
        };
        f.write_str(name)
    }
}
