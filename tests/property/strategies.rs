//! Proptest strategies for generating cadr values.

#![allow(dead_code)]

use cadr::value::list;
use cadr::{cons, Value};
use proptest::prelude::*;

/// Leaf values whose written form reads back as an equal value.
///
/// Floats are left out: their written form is not guaranteed to read
/// back bit for bit.
pub fn arb_atom() -> impl Strategy<Value = Value> {
    prop_oneof![
        10 => (-1_000_000i64..1_000_000).prop_map(Value::Int),
        6 => "[a-z][a-z0-9!?*-]{0,6}".prop_map(|s| Value::symbol(&s)),
        4 => "[ -~]{0,8}".prop_map(|s| Value::string(&s)),
        2 => prop::char::range('a', 'z').prop_map(Value::Char),
        1 => Just(Value::Char(' ')),
        1 => Just(Value::TRUE),
        1 => Just(Value::FALSE),
        1 => Just(Value::Nil),
    ]
}

/// Elements for building proper lists. Small integers collide often,
/// which gives `distinct` something to remove.
pub fn arb_elements() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(
        prop_oneof![
            3 => (0i64..8).prop_map(Value::Int),
            1 => prop::sample::select(vec!["a", "b", "c"]).prop_map(Value::symbol),
        ],
        0..24,
    )
}

/// A proper list of arbitrary atoms.
pub fn arb_list() -> impl Strategy<Value = Value> {
    prop::collection::vec(arb_atom(), 0..16).prop_map(list)
}

/// Nested data: lists, dotted pairs and vectors over atoms.
pub fn arb_datum() -> impl Strategy<Value = Value> {
    arb_datum_depth(3)
}

fn arb_datum_depth(depth: u32) -> BoxedStrategy<Value> {
    if depth == 0 {
        return arb_atom().boxed();
    }
    let inner = arb_datum_depth(depth - 1);
    prop_oneof![
        4 => arb_atom(),
        3 => prop::collection::vec(inner.clone(), 0..6).prop_map(list),
        1 => (inner.clone(), arb_atom())
            .prop_filter("dotted tail must not be a list", |(_, tail)| !tail.is_nil())
            .prop_map(|(head, tail)| cons(head, tail)),
        1 => prop::collection::vec(inner, 0..4).prop_map(Value::vector),
    ]
    .boxed()
}
