//! IR evaluation
//!
//! A direct tree walk. Generic calls go through the primitive table; the
//! specialised pair nodes act on values directly. Both paths raise the
//! same errors, which is what lets the inliner be checked against the
//! generic path.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::ir::{Field, Node};
use crate::error::{LError, LResult};
use crate::list;
use crate::primitives::PrimitiveTable;
use crate::value::{cons, Value};

/// Values bound to locals.
pub type Env = FxHashMap<Rc<str>, Value>;

pub fn eval(node: &Node, env: &Env, primitives: &PrimitiveTable) -> LResult<Value> {
    match node {
        Node::Const(value) => Ok(value.clone()),
        Node::Local { name, .. } => env.get(name).cloned().ok_or_else(|| {
            LError::assertion_violation(name, "unbound variable", vec![Value::symbol(name)])
        }),
        Node::Call { op, args } => {
            let values = args
                .iter()
                .map(|arg| eval(arg, env, primitives))
                .collect::<LResult<SmallVec<[Value; 4]>>>()?;
            primitives.call(op, &values)
        }
        Node::If { cond, then, else_ } => {
            if eval(cond, env, primitives)?.is_truthy() {
                eval(then, env, primitives)
            } else {
                eval(else_, env, primitives)
            }
        }
        Node::IsNil(arg) => Ok(Value::bool(eval(arg, env, primitives)?.is_eq(&Value::Nil))),
        Node::IsPair(arg) => Ok(Value::bool(eval(arg, env, primitives)?.is_pair())),
        Node::MakePair(first, rest) => {
            let first = eval(first, env, primitives)?;
            let rest = eval(rest, env, primitives)?;
            Ok(cons(first, rest))
        }
        Node::PairField { field, arg } => {
            let value = eval(arg, env, primitives)?;
            match field {
                Field::First => list::car(&value),
                Field::Rest => list::cdr(&value),
            }
        }
    }
}
