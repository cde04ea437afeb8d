//! Heap-allocated value types.
//!
//! Every compound or host-backed value lives behind an `Rc` so that
//! cloning a `Value` shares the object instead of copying it. Pairs are the
//! only structure whose slots the list engine mutates in place.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::{LError, LResult};
use crate::value::types::{Arity, NativeFn};
use crate::value::Value;

/// Mutable two-slot cell, the sole compound list structure.
///
/// A `Pair` has no identity beyond its allocation: two pairs holding equal
/// values are still distinct objects unless an `Rc` is shared.
#[derive(Debug)]
pub struct Pair {
    first: RefCell<Value>,
    rest: RefCell<Value>,
}

impl Pair {
    pub fn new(first: Value, rest: Value) -> Self {
        Pair {
            first: RefCell::new(first),
            rest: RefCell::new(rest),
        }
    }

    /// Value held in the `first` slot.
    #[inline]
    pub fn first(&self) -> Value {
        self.first.borrow().clone()
    }

    /// Value held in the `rest` slot.
    #[inline]
    pub fn rest(&self) -> Value {
        self.rest.borrow().clone()
    }

    pub fn set_first(&self, value: Value) {
        *self.first.borrow_mut() = value;
    }

    pub fn set_rest(&self, value: Value) {
        *self.rest.borrow_mut() = value;
    }

    /// Store `value` in the `rest` slot and hand back what was there.
    pub fn replace_rest(&self, value: Value) -> Value {
        self.rest.replace(value)
    }

    /// Borrow the `rest` slot without cloning it.
    pub(crate) fn rest_ref(&self) -> Ref<'_, Value> {
        self.rest.borrow()
    }
}

// Unlinks uniquely owned chains one cell at a time so that dropping a long
// list cannot overflow the stack through recursive `Rc` drops.
impl Drop for Pair {
    fn drop(&mut self) {
        let mut next = std::mem::replace(self.rest.get_mut(), Value::Nil);
        while let Value::Pair(pair) = next {
            match Rc::try_unwrap(pair) {
                Ok(mut inner) => next = std::mem::replace(inner.rest.get_mut(), Value::Nil),
                Err(_) => break,
            }
        }
    }
}

/// Native procedure with a name for printing and error reporting.
pub struct Procedure {
    pub name: Rc<str>,
    pub arity: Arity,
    pub func: NativeFn,
}

impl Procedure {
    pub fn new(name: &str, arity: Arity, func: NativeFn) -> Self {
        Procedure {
            name: Rc::from(name),
            arity,
            func,
        }
    }

    /// Apply the procedure after checking the argument count.
    pub fn call(&self, args: &[Value]) -> LResult<Value> {
        if !self.arity.matches(args.len()) {
            return Err(LError::arity_mismatch(&self.name, self.arity, args.len()));
        }
        (self.func)(args)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<procedure {}>", self.name)
    }
}

/// Record type descriptor: the runtime type name plus field names.
#[derive(Debug)]
pub struct RecordType {
    pub name: Rc<str>,
    pub field_names: Vec<Rc<str>>,
}

impl RecordType {
    pub fn new(name: &str, field_names: &[&str]) -> Rc<Self> {
        Rc::new(RecordType {
            name: Rc::from(name),
            field_names: field_names.iter().map(|f| Rc::from(*f)).collect(),
        })
    }
}

/// Instance of a record type. Construction belongs to the record system;
/// this crate only needs to read the fields for printing.
#[derive(Debug)]
pub struct Record {
    pub rtd: Rc<RecordType>,
    fields: RefCell<Vec<Value>>,
}

impl Record {
    pub fn new(rtd: Rc<RecordType>, fields: Vec<Value>) -> Self {
        Record {
            rtd,
            fields: RefCell::new(fields),
        }
    }

    /// Runtime type name used to key custom printers.
    pub fn type_name(&self) -> &str {
        &self.rtd.name
    }

    pub fn fields(&self) -> Ref<'_, Vec<Value>> {
        self.fields.borrow()
    }
}

/// Condition object raised by the runtime.
#[derive(Debug)]
pub enum Condition {
    /// A single condition such as `&assertion` with its who/message/irritants.
    Simple {
        kind: Rc<str>,
        who: Rc<str>,
        message: String,
        irritants: Vec<Value>,
    },
    /// A condition composed of several simple ones.
    Compound(Vec<Rc<Condition>>),
}

impl Condition {
    pub fn simple(kind: &str, who: &str, message: impl Into<String>, irritants: Vec<Value>) -> Self {
        Condition::Simple {
            kind: Rc::from(kind),
            who: Rc::from(who),
            message: message.into(),
            irritants,
        }
    }

    pub fn compound(parts: Vec<Rc<Condition>>) -> Self {
        Condition::Compound(parts)
    }
}

/// Insertion-ordered hashtable. Only enough of a table to be printed and
/// inspected; the hashtable library owns the real construction surface.
#[derive(Debug, Default)]
pub struct Hashtable {
    entries: Vec<(Value, Value)>,
}

impl Hashtable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry whose key is `equal?` to `key`.
    pub fn insert(&mut self, key: Value, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }
}

/// Host object exposed to the language without a dedicated variant.
///
/// `type_name` keys the custom printer registry; `Display` is the
/// object's own native text, used when no printer is registered.
pub trait NativeObject: fmt::Display {
    fn type_name(&self) -> &str;
}
