pub mod list;
pub mod port;

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::{LError, LResult};
use crate::value::{Arity, NativeFn, Procedure, Value};

use self::list::{
    prim_append, prim_car, prim_cdr, prim_cons, prim_distinct, prim_eof_object, prim_first,
    prim_is_eof_object, prim_is_list, prim_is_null, prim_is_pair, prim_last, prim_last_pair,
    prim_length, prim_list, prim_list_ref, prim_list_tail, prim_make_list, prim_rest,
    prim_reverse, prim_reverse_in_place, prim_second, prim_set_car, prim_set_cdr, prim_third,
};
use self::port::{prim_is_input_port, prim_is_output_port};

/// Named native procedures, looked up by the evaluator for generic calls.
#[derive(Default)]
pub struct PrimitiveTable {
    procedures: FxHashMap<Rc<str>, Rc<Procedure>>,
}

impl PrimitiveTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Procedure>> {
        self.procedures.get(name)
    }

    /// The procedure as a first-class value.
    pub fn get_value(&self, name: &str) -> Option<Value> {
        self.get(name).map(|p| Value::Procedure(p.clone()))
    }

    /// Generic dispatch: look up `name` and apply it.
    pub fn call(&self, name: &str, args: &[Value]) -> LResult<Value> {
        match self.get(name) {
            Some(procedure) => procedure.call(args),
            None => Err(LError::assertion_violation(
                name,
                "unbound primitive",
                vec![Value::symbol(name)],
            )),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.procedures.keys().map(|k| &**k).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

pub fn register_primitives(table: &mut PrimitiveTable) {
    // Pairs
    register_fn(table, "cons", Arity::Exact(2), prim_cons);
    register_fn(table, "car", Arity::Exact(1), prim_car);
    register_fn(table, "cdr", Arity::Exact(1), prim_cdr);
    register_fn(table, "rest", Arity::Exact(1), prim_rest);
    register_fn(table, "set-car!", Arity::Exact(2), prim_set_car);
    register_fn(table, "set-cdr!", Arity::Exact(2), prim_set_cdr);

    // Type predicates
    register_fn(table, "null?", Arity::Exact(1), prim_is_null);
    register_fn(table, "pair?", Arity::Exact(1), prim_is_pair);
    register_fn(table, "list?", Arity::Exact(1), prim_is_list);

    // Lists
    register_fn(table, "list", Arity::AtLeast(0), prim_list);
    register_fn(table, "first", Arity::Exact(1), prim_first);
    register_fn(table, "second", Arity::Exact(1), prim_second);
    register_fn(table, "third", Arity::Exact(1), prim_third);
    register_fn(table, "length", Arity::Exact(1), prim_length);
    register_fn(table, "reverse", Arity::Exact(1), prim_reverse);
    register_fn(table, "reverse!", Arity::Exact(1), prim_reverse_in_place);
    register_fn(table, "append", Arity::AtLeast(0), prim_append);
    register_fn(table, "list-tail", Arity::Exact(2), prim_list_tail);
    register_fn(table, "list-ref", Arity::Exact(2), prim_list_ref);
    register_fn(table, "distinct", Arity::Exact(1), prim_distinct);
    register_fn(table, "make-list", Arity::Range(1, 2), prim_make_list);
    register_fn(table, "last-pair", Arity::Exact(1), prim_last_pair);
    register_fn(table, "last", Arity::Exact(1), prim_last);

    // Ports
    register_fn(table, "input-port?", Arity::Exact(1), prim_is_input_port);
    register_fn(table, "output-port?", Arity::Exact(1), prim_is_output_port);

    // End of file
    register_fn(table, "eof-object", Arity::Exact(0), prim_eof_object);
    register_fn(table, "eof-object?", Arity::Exact(1), prim_is_eof_object);
}

fn register_fn(table: &mut PrimitiveTable, name: &str, arity: Arity, func: NativeFn) {
    table
        .procedures
        .insert(Rc::from(name), Rc::new(Procedure::new(name, arity, func)));
}
