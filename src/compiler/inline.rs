//! Primitive inlining
//!
//! Replaces generic calls to `cons`, `car`, `cdr`, `null?` and `pair?` with
//! the specialised pair nodes. Each rule is keyed by the primitive's name
//! and an exact arity; anything that does not match is left as a generic
//! call, which stays correct for every input.

use tracing::trace;

use super::ir::{Field, Node, StaticType};
use crate::value::Value;

/// One entry of the rule table.
pub struct InlineRule {
    pub name: &'static str,
    pub arity: usize,
    /// Build the replacement, or refuse with `None`.
    pub apply: fn(&[Node]) -> Option<Node>,
}

pub const RULES: &[InlineRule] = &[
    InlineRule {
        name: "null?",
        arity: 1,
        apply: inline_is_nil,
    },
    InlineRule {
        name: "pair?",
        arity: 1,
        apply: inline_is_pair,
    },
    InlineRule {
        name: "cons",
        arity: 2,
        apply: inline_cons,
    },
    InlineRule {
        name: "car",
        arity: 1,
        apply: inline_car,
    },
    InlineRule {
        name: "cdr",
        arity: 1,
        apply: inline_cdr,
    },
];

fn inline_is_nil(args: &[Node]) -> Option<Node> {
    Some(Node::IsNil(Box::new(args[0].clone())))
}

fn inline_is_pair(args: &[Node]) -> Option<Node> {
    Some(Node::IsPair(Box::new(args[0].clone())))
}

fn inline_cons(args: &[Node]) -> Option<Node> {
    Some(Node::MakePair(
        Box::new(args[0].clone()),
        Box::new(args[1].clone()),
    ))
}

fn inline_car(args: &[Node]) -> Option<Node> {
    pair_field(Field::First, &args[0])
}

fn inline_cdr(args: &[Node]) -> Option<Node> {
    pair_field(Field::Rest, &args[0])
}

// Only unknown or pair-typed arguments qualify. Anything statically known
// to be something else keeps the generic call so its type violation fires.
fn pair_field(field: Field, arg: &Node) -> Option<Node> {
    if matches!(arg, Node::Const(Value::Nil)) {
        return None;
    }
    match arg.static_type() {
        StaticType::Dynamic | StaticType::Pair => Some(Node::PairField {
            field,
            arg: Box::new(arg.clone()),
        }),
        _ => None,
    }
}

/// Rewrite a call to `name` with `args`, or `None` to keep the generic call.
pub fn rewrite(name: &str, args: &[Node]) -> Option<Node> {
    let rule = RULES.iter().find(|rule| rule.name == name)?;
    if rule.arity != args.len() {
        trace!(op = name, args = args.len(), "arity mismatch, not inlined");
        return None;
    }
    let replacement = (rule.apply)(args);
    match &replacement {
        Some(_) => trace!(op = name, "inlined"),
        None => trace!(
            op = name,
            arg_type = ?args[0].static_type(),
            "refused by static type"
        ),
    }
    replacement
}

/// Apply `rewrite` to every call in the tree, innermost first.
/// Returns the number of calls replaced.
pub fn inline_primitives(node: &mut Node) -> usize {
    let mut rewritten = 0;

    // First, recursively rewrite children
    match node {
        Node::Const(_) | Node::Local { .. } => {}
        Node::Call { args, .. } => {
            for arg in args.iter_mut() {
                rewritten += inline_primitives(arg);
            }
        }
        Node::If { cond, then, else_ } => {
            rewritten += inline_primitives(cond);
            rewritten += inline_primitives(then);
            rewritten += inline_primitives(else_);
        }
        Node::IsNil(arg) | Node::IsPair(arg) | Node::PairField { arg, .. } => {
            rewritten += inline_primitives(arg);
        }
        Node::MakePair(first, rest) => {
            rewritten += inline_primitives(first);
            rewritten += inline_primitives(rest);
        }
    }

    if let Node::Call { op, args } = node {
        if let Some(replacement) = rewrite(op, args) {
            *node = replacement;
            rewritten += 1;
        }
    }
    rewritten
}
