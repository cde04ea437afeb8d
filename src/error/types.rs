//! Error type definitions

use std::error::Error as StdError;
use std::fmt;

use crate::printer::write_format;
use crate::value::{Condition, Value};

/// The violation kinds raised by the runtime core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong runtime variant where a specific one was required.
    TypeViolation,
    /// A value used as a list is not list-shaped.
    ListTypeViolation,
    /// An index walk ran off the end of a chain.
    IndexViolation,
    /// A named file could not be located.
    FileNotFoundViolation,
    /// I/O failure on an already-open port, including a closed port.
    IoPortViolation,
    /// Anything else, including native failures re-wrapped with context.
    AssertionViolation,
    /// The parser rejected its input.
    LexicalViolation,
}

impl ErrorKind {
    /// Condition type name used when the error is reified as a value.
    pub fn condition_name(&self) -> &'static str {
        match self {
            ErrorKind::TypeViolation => "&type-violation",
            ErrorKind::ListTypeViolation => "&list-type-violation",
            ErrorKind::IndexViolation => "&index-violation",
            ErrorKind::FileNotFoundViolation => "&i/o-file-does-not-exist",
            ErrorKind::IoPortViolation => "&i/o-port",
            ErrorKind::AssertionViolation => "&assertion",
            ErrorKind::LexicalViolation => "&lexical",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ErrorKind::TypeViolation => "Type violation",
            ErrorKind::ListTypeViolation => "List type violation",
            ErrorKind::IndexViolation => "Index violation",
            ErrorKind::FileNotFoundViolation => "File not found",
            ErrorKind::IoPortViolation => "I/O port violation",
            ErrorKind::AssertionViolation => "Assertion violation",
            ErrorKind::LexicalViolation => "Lexical violation",
        }
    }
}

/// Structured error: the operation that failed, a message, and the
/// offending values.
#[derive(Debug, Clone, PartialEq)]
pub struct LError {
    pub kind: ErrorKind,
    pub who: String,
    pub message: String,
    pub irritants: Vec<Value>,
}

pub type LResult<T> = Result<T, LError>;

impl LError {
    pub fn new(
        kind: ErrorKind,
        who: impl Into<String>,
        message: impl Into<String>,
        irritants: Vec<Value>,
    ) -> Self {
        LError {
            kind,
            who: who.into(),
            message: message.into(),
            irritants,
        }
    }

    /// Get a human-readable description of the error
    pub fn description(&self) -> String {
        let mut text = format!("{} in {}: {}", self.kind.label(), self.who, self.message);
        if !self.irritants.is_empty() {
            let irritants: Vec<String> = self.irritants.iter().map(write_format).collect();
            text.push_str(": ");
            text.push_str(&irritants.join(" "));
        }
        text
    }

    /// Reify the error as a condition value.
    pub fn to_condition(&self) -> Value {
        Value::condition(Condition::simple(
            self.kind.condition_name(),
            &self.who,
            self.message.clone(),
            self.irritants.clone(),
        ))
    }
}

impl fmt::Display for LError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl StdError for LError {}

/// Conversion from LError to String for compatibility
impl From<LError> for String {
    fn from(err: LError) -> String {
        err.description()
    }
}
