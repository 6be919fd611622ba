//! Diagnostic message builders shared by the two checking passes.
//!
//! Both passes enforce several of the same rules on purpose; using one
//! builder per rule keeps the wording byte-identical, so the driver's merged
//! sink collapses the overlap under the dedup key.

use teslang_core::{Type, VALID_SPELLINGS};

pub(crate) fn wrong_type(spelling: &str) -> String {
    format!("wrong type '{spelling}' found. types must be one of {VALID_SPELLINGS}.")
}

pub(crate) fn already_defined(name: &str) -> String {
    format!("variable '{name}' is already defined in this scope.")
}

pub(crate) fn undefined_variable(name: &str) -> String {
    format!("variable '{name}' is not defined.")
}

pub(crate) fn not_a_variable(name: &str) -> String {
    format!("'{name}' is not a variable.")
}

pub(crate) fn used_before_assigned(name: &str) -> String {
    format!("variable '{name}' is used before being assigned.")
}

pub(crate) fn type_mismatch(name: &str, expected: Type, actual: Type) -> String {
    format!("variable '{name}' expected to be of type '{expected}' but it is '{actual}' instead.")
}

pub(crate) fn undefined_function(name: &str) -> String {
    format!("function '{name}' is not defined.")
}

pub(crate) fn not_a_function(name: &str) -> String {
    format!("'{name}' is not a function.")
}

pub(crate) fn too_few_arguments(name: &str, expected: usize, got: usize) -> String {
    format!("function '{name}' expects {expected} arguments but got {got}.")
}

pub(crate) fn too_many_arguments(name: &str, expected: usize, got: usize) -> String {
    format!("function '{name}': too many arguments ({got} given, expected {expected}).")
}

pub(crate) fn argument_mismatch(param: &str, expected: Type, actual: Type) -> String {
    format!("expected '{param}' to be of type '{expected}', but got '{actual}' instead.")
}

pub(crate) fn logical_operands(op: &str) -> String {
    format!("logical operator '{op}' requires boolean operands.")
}

pub(crate) fn condition_not_bool(construct: &str, actual: Type) -> String {
    format!("{construct} condition must be boolean, got '{actual}'.")
}

pub(crate) fn for_bound_not_int(which: &str, actual: Type) -> String {
    format!("for loop {which} value must be int, got '{actual}'.")
}

pub(crate) fn return_outside_function() -> String {
    "return statement outside function.".to_owned()
}

pub(crate) fn return_mismatch(expected: Type, actual: Type) -> String {
    format!("wrong return type. expected '{expected}' but got '{actual}'.")
}

pub(crate) fn array_base_not_vector(actual: Type) -> String {
    format!("expected array to be of type 'vector', but got '{actual}' instead.")
}

pub(crate) fn index_not_int(actual: Type) -> String {
    format!("array index must be of type 'int', but got '{actual}' instead.")
}
