//! Builder methods for constructing LError instances

use std::io;

use super::types::{ErrorKind, LError};
use crate::value::{Arity, Value};

impl LError {
    // Type errors
    pub fn type_violation(who: &str, expected: &str, got: &Value) -> Self {
        LError::new(
            ErrorKind::TypeViolation,
            who,
            format!("expected {}, got {}", expected, got.type_name()),
            vec![got.clone()],
        )
    }

    pub fn list_type_violation(who: &str, irritant: &Value) -> Self {
        LError::new(
            ErrorKind::ListTypeViolation,
            who,
            "not a list",
            vec![irritant.clone()],
        )
    }

    // Index errors
    pub fn index_violation(who: &str, list: &Value, index: &Value) -> Self {
        LError::new(
            ErrorKind::IndexViolation,
            who,
            "index out of range",
            vec![list.clone(), index.clone()],
        )
    }

    // Arity errors
    pub fn arity_mismatch(who: &str, expected: Arity, got: usize) -> Self {
        LError::new(
            ErrorKind::AssertionViolation,
            who,
            format!(
                "expected {} argument{}, got {}",
                expected,
                if expected == Arity::Exact(1) { "" } else { "s" },
                got
            ),
            Vec::new(),
        )
    }

    // IO
    pub fn file_not_found(who: &str, message: impl Into<String>, path: &Value) -> Self {
        LError::new(
            ErrorKind::FileNotFoundViolation,
            who,
            message,
            vec![path.clone()],
        )
    }

    pub fn io_port_violation(who: &str, message: impl Into<String>, irritants: Vec<Value>) -> Self {
        LError::new(ErrorKind::IoPortViolation, who, message, irritants)
    }

    /// Translate a native failure raised while acquiring a named resource.
    pub fn from_open_error(who: &str, err: &io::Error, path: &Value) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => LError::file_not_found(who, err.to_string(), path),
            _ => LError::assertion_violation(who, err.to_string(), vec![path.clone()]),
        }
    }

    // Generic
    pub fn assertion_violation(
        who: &str,
        message: impl Into<String>,
        irritants: Vec<Value>,
    ) -> Self {
        LError::new(ErrorKind::AssertionViolation, who, message, irritants)
    }

    pub fn lexical_violation(who: &str, message: impl Into<String>) -> Self {
        LError::new(ErrorKind::LexicalViolation, who, message, Vec::new())
    }
}
