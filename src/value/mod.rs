//! Value representation
//!
//! `Value` is a closed tagged union: every runtime datum is exactly one
//! variant, and every consumer (list engine, printer, inliner) dispatches on
//! it with exhaustive matches. Heap variants are reference counted, so a
//! cloned `Value` aliases the same object.

pub mod display;
pub mod heap;
pub mod types;

use std::cell::RefCell;
use std::rc::Rc;

pub use heap::{Condition, Hashtable, NativeObject, Pair, Procedure, Record, RecordType};
pub use types::{Arity, NativeFn};

pub use crate::port::{InputPort, OutputPort, Port, PortId};
pub use crate::symbol::Symbol;

/// Core runtime value
#[derive(Clone)]
pub enum Value {
    /// The empty list. A singleton; never a pair.
    Nil,
    Bool(bool),
    Char(char),
    Int(i64),
    Float(f64),
    String(Rc<str>),
    Symbol(Symbol),
    Pair(Rc<Pair>),
    Vector(Rc<RefCell<Vec<Value>>>),
    Bytevector(Rc<RefCell<Vec<u8>>>),
    Procedure(Rc<Procedure>),
    Port(Port),
    Record(Rc<Record>),
    Condition(Rc<Condition>),
    Hashtable(Rc<RefCell<Hashtable>>),
    Native(Rc<dyn NativeObject>),
    /// End-of-file marker returned by readers.
    Eof,
    /// Result of operations that return nothing useful.
    Unspecified,
    MultipleValues(Rc<[Value]>),
}

impl Value {
    pub const NIL: Value = Value::Nil;
    pub const TRUE: Value = Value::Bool(true);
    pub const FALSE: Value = Value::Bool(false);

    pub fn string(s: &str) -> Self {
        Value::String(Rc::from(s))
    }

    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    pub fn vector(elements: Vec<Value>) -> Self {
        Value::Vector(Rc::new(RefCell::new(elements)))
    }

    pub fn bytevector(bytes: Vec<u8>) -> Self {
        Value::Bytevector(Rc::new(RefCell::new(bytes)))
    }

    pub fn procedure(name: &str, arity: Arity, func: NativeFn) -> Self {
        Value::Procedure(Rc::new(Procedure::new(name, arity, func)))
    }

    pub fn record(rtd: Rc<RecordType>, fields: Vec<Value>) -> Self {
        Value::Record(Rc::new(Record::new(rtd, fields)))
    }

    pub fn condition(condition: Condition) -> Self {
        Value::Condition(Rc::new(condition))
    }

    pub fn hashtable(table: Hashtable) -> Self {
        Value::Hashtable(Rc::new(RefCell::new(table)))
    }

    pub fn native(object: impl NativeObject + 'static) -> Self {
        Value::Native(Rc::new(object))
    }

    pub fn values(values: Vec<Value>) -> Self {
        Value::MultipleValues(Rc::from(values))
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    #[inline(always)]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    #[inline(always)]
    pub fn is_pair(&self) -> bool {
        matches!(self, Value::Pair(_))
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, Value::Eof)
    }

    pub fn is_input_port(&self) -> bool {
        matches!(self, Value::Port(Port::Input(_)))
    }

    pub fn is_output_port(&self) -> bool {
        matches!(self, Value::Port(Port::Output(_)))
    }

    #[inline]
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Value::Unspecified)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Scheme truthiness: only `#f` is false.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    pub fn as_pair(&self) -> Option<&Rc<Pair>> {
        match self {
            Value::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "empty list",
            Value::Bool(_) => "boolean",
            Value::Char(_) => "character",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Pair(_) => "pair",
            Value::Vector(_) => "vector",
            Value::Bytevector(_) => "bytevector",
            Value::Procedure(_) => "procedure",
            Value::Port(Port::Input(_)) => "input port",
            Value::Port(Port::Output(_)) => "output port",
            Value::Record(_) => "record",
            Value::Condition(_) => "condition",
            Value::Hashtable(_) => "hashtable",
            Value::Native(_) => "native object",
            Value::Eof => "eof object",
            Value::Unspecified => "unspecified",
            Value::MultipleValues(_) => "multiple values",
        }
    }

    /// Identity comparison (`eq?`).
    ///
    /// Heap objects compare by allocation; immediates by value. Symbols are
    /// interned by name, so equal names are the same symbol.
    pub fn is_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Eof, Value::Eof) => true,
            (Value::Unspecified, Value::Unspecified) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Vector(a), Value::Vector(b)) => Rc::ptr_eq(a, b),
            (Value::Bytevector(a), Value::Bytevector(b)) => Rc::ptr_eq(a, b),
            (Value::Procedure(a), Value::Procedure(b)) => Rc::ptr_eq(a, b),
            (Value::Port(a), Value::Port(b)) => a.id() == b.id(),
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            (Value::Condition(a), Value::Condition(b)) => Rc::ptr_eq(a, b),
            (Value::Hashtable(a), Value::Hashtable(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (Value::MultipleValues(a), Value::MultipleValues(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Structural equality (`equal?`).
///
/// Pairs, vectors and bytevectors compare element by element; everything
/// else without visible structure falls back to identity. The `rest` chain
/// is walked iteratively, so only nesting depth uses the stack.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Pair(_), Value::Pair(_)) => {
                let mut left = self.clone();
                let mut right = other.clone();
                loop {
                    match (&left, &right) {
                        (Value::Pair(a), Value::Pair(b)) => {
                            if Rc::ptr_eq(a, b) {
                                return true;
                            }
                            if a.first() != b.first() {
                                return false;
                            }
                            let (next_left, next_right) = (a.rest(), b.rest());
                            left = next_left;
                            right = next_right;
                        }
                        _ => return left == right,
                    }
                }
            }
            (Value::Vector(a), Value::Vector(b)) => *a.borrow() == *b.borrow(),
            (Value::Bytevector(a), Value::Bytevector(b)) => *a.borrow() == *b.borrow(),
            (Value::MultipleValues(a), Value::MultipleValues(b)) => a[..] == b[..],
            _ => self.is_eq(other),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

/// Allocate a new pair.
#[inline]
pub fn cons(first: Value, rest: Value) -> Value {
    Value::Pair(Rc::new(Pair::new(first, rest)))
}

/// Build a proper list from the given values.
pub fn list(values: Vec<Value>) -> Value {
    values
        .into_iter()
        .rev()
        .fold(Value::Nil, |acc, v| cons(v, acc))
}
