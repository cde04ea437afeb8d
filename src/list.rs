//! Pair and list primitives
//!
//! A list is a shape over `Pair`/`Nil`, never a type of its own, so every
//! operation here re-walks the chain it is handed. Which operations copy and
//! which share structure is part of their contract and is noted on each.
//!
//! Circular chains are not detected; walking one does not terminate.

use std::hash::{Hash, Hasher};
use std::mem;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::error::{LError, LResult};
use crate::value::{cons, Pair, Port, Value};

/// Borrowing walk over the elements of a pair chain.
///
/// Stops at the first non-pair `rest`; `tail()` reports what ended the walk
/// (`Nil` for a proper list).
pub struct ListIter {
    current: Value,
}

impl ListIter {
    pub fn tail(&self) -> &Value {
        &self.current
    }
}

impl Iterator for ListIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let (first, rest) = match &self.current {
            Value::Pair(pair) => (pair.first(), pair.rest()),
            _ => return None,
        };
        self.current = rest;
        Some(first)
    }
}

pub fn iter(lst: &Value) -> ListIter {
    ListIter {
        current: lst.clone(),
    }
}

fn expect_pair<'a>(who: &str, value: &'a Value) -> LResult<&'a Rc<Pair>> {
    value
        .as_pair()
        .ok_or_else(|| LError::type_violation(who, "pair", value))
}

fn expect_list_head(who: &str, value: &Value) -> LResult<()> {
    match value {
        Value::Nil | Value::Pair(_) => Ok(()),
        other => Err(LError::type_violation(who, "list", other)),
    }
}

pub fn car(p: &Value) -> LResult<Value> {
    Ok(expect_pair("car", p)?.first())
}

pub fn cdr(p: &Value) -> LResult<Value> {
    Ok(expect_pair("cdr", p)?.rest())
}

/// `cdr` under its list-oriented name.
pub fn rest(p: &Value) -> LResult<Value> {
    Ok(expect_pair("rest", p)?.rest())
}

fn nth(who: &str, lst: &Value, n: usize) -> LResult<Value> {
    let mut current = lst.clone();
    for _ in 0..n {
        let next = expect_pair(who, &current)?.rest();
        current = next;
    }
    Ok(expect_pair(who, &current)?.first())
}

pub fn first(lst: &Value) -> LResult<Value> {
    nth("first", lst, 0)
}

pub fn second(lst: &Value) -> LResult<Value> {
    nth("second", lst, 1)
}

pub fn third(lst: &Value) -> LResult<Value> {
    nth("third", lst, 2)
}

/// Count the pairs of a chain. An improper tail ends the count.
pub fn length(lst: &Value) -> LResult<usize> {
    expect_list_head("length", lst)?;
    let mut count = 0;
    let mut current = lst.clone();
    while let Value::Pair(pair) = current {
        count += 1;
        current = pair.rest();
    }
    Ok(count)
}

/// Non-destructive reverse. Allocates a fresh chain; the input is untouched.
pub fn reverse(lst: &Value) -> LResult<Value> {
    expect_list_head("reverse", lst)?;
    Ok(iter(lst).fold(Value::Nil, |acc, element| cons(element, acc)))
}

// Three-pointer walk: the `rest` slot of `current` is swapped for `prev`
// and the old contents become the new `current`.
fn reverse_walk(lst: &Value) -> (Value, usize) {
    let mut prev = Value::Nil;
    let mut current = lst.clone();
    let mut steps = 0;
    while let Value::Pair(pair) = current {
        let next = pair.replace_rest(prev);
        prev = Value::Pair(pair);
        current = next;
        steps += 1;
    }
    (prev, steps)
}

/// Destructive reverse. Every `rest` slot is rewritten in place, so the
/// result is built from the input's own pairs and the input's head now
/// ends the chain. An improper tail is dropped.
pub fn reverse_in_place(lst: &Value) -> LResult<Value> {
    expect_list_head("reverse!", lst)?;
    Ok(reverse_walk(lst).0)
}

/// Concatenate lists.
///
/// Every argument but the last is copied cell by cell; the last one is
/// linked in as-is and may be any value, so an improper last argument
/// gives an improper result. A single argument is returned unchanged.
pub fn append(args: &[Value]) -> LResult<Value> {
    let (last, leading) = match args.split_last() {
        Some(split) => split,
        None => return Ok(Value::Nil),
    };

    let mut head = Value::Nil;
    let mut tail: Option<Rc<Pair>> = None;
    for arg in leading {
        let mut elements = iter(arg);
        for element in elements.by_ref() {
            let cell = Rc::new(Pair::new(element, Value::Nil));
            match &tail {
                Some(prev) => prev.set_rest(Value::Pair(cell.clone())),
                None => head = Value::Pair(cell.clone()),
            }
            tail = Some(cell);
        }
        if !elements.tail().is_nil() {
            return Err(LError::list_type_violation("append", arg));
        }
    }

    match tail {
        Some(cell) => {
            cell.set_rest(last.clone());
            Ok(head)
        }
        None => Ok(last.clone()),
    }
}

fn walk_forward(who: &str, lst: &Value, k: i64) -> LResult<Value> {
    expect_list_head(who, lst)?;
    if k < 0 {
        return Err(LError::index_violation(who, lst, &Value::Int(k)));
    }
    let mut current = lst.clone();
    for _ in 0..k {
        let next = match &current {
            Value::Pair(pair) => pair.rest(),
            _ => return Err(LError::index_violation(who, lst, &Value::Int(k))),
        };
        current = next;
    }
    Ok(current)
}

/// The chain after `k` pairs. Shares structure with `lst`.
pub fn list_tail(lst: &Value, k: i64) -> LResult<Value> {
    walk_forward("list-tail", lst, k)
}

pub fn list_ref(lst: &Value, k: i64) -> LResult<Value> {
    match walk_forward("list-ref", lst, k)? {
        Value::Pair(pair) => Ok(pair.first()),
        _ => Err(LError::index_violation("list-ref", lst, &Value::Int(k))),
    }
}

/// Hash-set key with `eqv?`-like semantics: immediates and strings by
/// content, floats by bit pattern, everything else by identity.
struct HashKey(Value);

fn identity(value: &Value) -> usize {
    match value {
        Value::Pair(p) => Rc::as_ptr(p) as usize,
        Value::Vector(v) => Rc::as_ptr(v) as usize,
        Value::Bytevector(b) => Rc::as_ptr(b) as usize,
        Value::Procedure(p) => Rc::as_ptr(p) as usize,
        Value::Port(port) => port.id().0 as usize,
        Value::Record(r) => Rc::as_ptr(r) as usize,
        Value::Condition(c) => Rc::as_ptr(c) as usize,
        Value::Hashtable(h) => Rc::as_ptr(h) as usize,
        Value::Native(n) => Rc::as_ptr(n) as *const () as usize,
        Value::MultipleValues(v) => Rc::as_ptr(v) as *const () as usize,
        _ => 0,
    }
}

impl PartialEq for HashKey {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Value::String(a), Value::String(b)) => a == b,
            (a, b) => a.is_eq(b),
        }
    }
}

impl Eq for HashKey {}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(&self.0).hash(state);
        match &self.0 {
            Value::Bool(b) => b.hash(state),
            Value::Char(c) => c.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Symbol(sym) => sym.hash(state),
            Value::Port(Port::Input(_)) => true.hash(state),
            Value::Port(Port::Output(_)) => false.hash(state),
            _ => {}
        }
        identity(&self.0).hash(state);
    }
}

/// Remove duplicates. The result order follows the backing hash set, not
/// the input order.
pub fn distinct(lst: &Value) -> LResult<Value> {
    expect_list_head("distinct", lst)?;
    let mut seen: FxHashSet<HashKey> = FxHashSet::default();
    for element in iter(lst) {
        seen.insert(HashKey(element));
    }
    Ok(seen
        .into_iter()
        .fold(Value::Nil, |acc, key| cons(key.0, acc)))
}

/// Build a list of `n` copies of `fill`. The default fill is Unspecified.
pub fn make_list(n: &Value, fill: Option<Value>) -> LResult<Value> {
    let count = match n {
        Value::Int(count) if *count >= 0 => *count,
        other => {
            return Err(LError::type_violation(
                "make-list",
                "non-negative integer",
                other,
            ))
        }
    };
    let fill = fill.unwrap_or(Value::Unspecified);
    Ok((0..count).fold(Value::Nil, |acc, _| cons(fill.clone(), acc)))
}

pub fn set_car(p: &Value, value: Value) -> LResult<Value> {
    expect_pair("set-car!", p)?.set_first(value);
    Ok(Value::Unspecified)
}

pub fn set_cdr(p: &Value, value: Value) -> LResult<Value> {
    expect_pair("set-cdr!", p)?.set_rest(value);
    Ok(Value::Unspecified)
}

/// `list?`: true only for chains that end in `Nil`. Recomputed every call.
pub fn is_list(value: &Value) -> bool {
    let mut elements = iter(value);
    elements.by_ref().for_each(drop);
    elements.tail().is_nil()
}

pub fn is_null(value: &Value) -> bool {
    value.is_nil()
}

pub fn is_pair(value: &Value) -> bool {
    value.is_pair()
}

fn final_pair(who: &str, lst: &Value) -> LResult<Value> {
    let mut pair = expect_pair(who, lst)?.clone();
    loop {
        let next = match &*pair.rest_ref() {
            Value::Pair(next) => next.clone(),
            _ => break,
        };
        pair = next;
    }
    Ok(Value::Pair(pair))
}

/// Final pair of a chain.
pub fn last_pair(lst: &Value) -> LResult<Value> {
    final_pair("last-pair", lst)
}

/// Same walk as `last-pair`; answers the final pair, not its element.
pub fn last(lst: &Value) -> LResult<Value> {
    final_pair("last", lst)
}

/// Collect a proper list into a vector.
pub fn list_to_vec(lst: &Value) -> LResult<Vec<Value>> {
    let mut elements = iter(lst);
    let values: Vec<Value> = elements.by_ref().collect();
    if !elements.tail().is_nil() {
        return Err(LError::list_type_violation("list->vector", lst));
    }
    Ok(values)
}
