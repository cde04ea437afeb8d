//! Expression IR
//!
//! A small tree IR: constants, typed locals, generic primitive calls and
//! `if`, plus the specialised pair operations the inliner produces.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::{LError, LResult};
use crate::list;
use crate::value::Value;

/// Statically known type of an IR node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticType {
    /// Nothing is known.
    Dynamic,
    Pair,
    Nil,
    Boolean,
    Char,
    Number,
    String,
    Symbol,
    Vector,
    Procedure,
    Other,
}

impl StaticType {
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Nil => StaticType::Nil,
            Value::Pair(_) => StaticType::Pair,
            Value::Bool(_) => StaticType::Boolean,
            Value::Char(_) => StaticType::Char,
            Value::Int(_) | Value::Float(_) => StaticType::Number,
            Value::String(_) => StaticType::String,
            Value::Symbol(_) => StaticType::Symbol,
            Value::Vector(_) => StaticType::Vector,
            Value::Procedure(_) => StaticType::Procedure,
            _ => StaticType::Other,
        }
    }

    /// Parse a type annotation name such as `pair` or `number`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "dynamic" => StaticType::Dynamic,
            "pair" => StaticType::Pair,
            "null" => StaticType::Nil,
            "boolean" => StaticType::Boolean,
            "char" => StaticType::Char,
            "number" => StaticType::Number,
            "string" => StaticType::String,
            "symbol" => StaticType::Symbol,
            "vector" => StaticType::Vector,
            "procedure" => StaticType::Procedure,
            _ => return None,
        })
    }
}

/// Slot read by a `PairField` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    First,
    Rest,
}

impl Field {
    /// Name of the generic primitive the read stands in for.
    pub fn primitive_name(&self) -> &'static str {
        match self {
            Field::First => "car",
            Field::Rest => "cdr",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Const(Value),
    Local {
        name: Rc<str>,
        ty: StaticType,
    },
    /// Generic call through the primitive table.
    Call {
        op: Rc<str>,
        args: Vec<Node>,
    },
    If {
        cond: Box<Node>,
        then: Box<Node>,
        else_: Box<Node>,
    },
    /// Identity test against `Nil`.
    IsNil(Box<Node>),
    /// Runtime type test for a pair.
    IsPair(Box<Node>),
    /// Direct pair allocation.
    MakePair(Box<Node>, Box<Node>),
    /// Slot read that still checks for a pair at run time.
    PairField {
        field: Field,
        arg: Box<Node>,
    },
}

/// Static types of locals, used while lowering.
pub type TypeEnv = FxHashMap<Rc<str>, StaticType>;

impl Node {
    pub fn call(op: &str, args: Vec<Node>) -> Self {
        Node::Call {
            op: Rc::from(op),
            args,
        }
    }

    pub fn local(name: &str, ty: StaticType) -> Self {
        Node::Local {
            name: Rc::from(name),
            ty,
        }
    }

    pub fn static_type(&self) -> StaticType {
        match self {
            Node::Const(value) => StaticType::of_value(value),
            Node::Local { ty, .. } => *ty,
            Node::MakePair(..) => StaticType::Pair,
            Node::IsNil(_) | Node::IsPair(_) => StaticType::Boolean,
            Node::If { then, else_, .. } => {
                let (a, b) = (then.static_type(), else_.static_type());
                if a == b {
                    a
                } else {
                    StaticType::Dynamic
                }
            }
            Node::Call { .. } | Node::PairField { .. } => StaticType::Dynamic,
        }
    }

    /// Lower a datum with every local of unknown type.
    pub fn from_datum(datum: &Value) -> LResult<Node> {
        Self::from_datum_with(datum, &TypeEnv::default())
    }

    /// Lower a datum. Symbols become locals typed from `types`; `(quote x)`
    /// becomes a constant; `(if c t [e])` becomes `If`; any other list
    /// headed by a symbol becomes a generic call.
    pub fn from_datum_with(datum: &Value, types: &TypeEnv) -> LResult<Node> {
        match datum {
            Value::Symbol(sym) => Ok(Node::Local {
                name: Rc::from(sym.name()),
                ty: types
                    .get(sym.name())
                    .copied()
                    .unwrap_or(StaticType::Dynamic),
            }),
            Value::Pair(pair) => {
                let head = pair.first();
                let operands = list::list_to_vec(&pair.rest())
                    .map_err(|_| LError::list_type_violation("compile", datum))?;
                let op = match head.as_symbol() {
                    Some(sym) => sym.name().to_string(),
                    None => {
                        return Err(LError::assertion_violation(
                            "compile",
                            "operator must be a symbol",
                            vec![head],
                        ))
                    }
                };
                match (op.as_str(), operands.len()) {
                    ("quote", 1) => Ok(Node::Const(operands[0].clone())),
                    ("quote", _) => Err(LError::assertion_violation(
                        "quote",
                        "bad syntax",
                        vec![datum.clone()],
                    )),
                    ("if", 2) | ("if", 3) => {
                        let lower = |d: &Value| Self::from_datum_with(d, types).map(Box::new);
                        Ok(Node::If {
                            cond: lower(&operands[0])?,
                            then: lower(&operands[1])?,
                            else_: match operands.get(2) {
                                Some(e) => lower(e)?,
                                None => Box::new(Node::Const(Value::Unspecified)),
                            },
                        })
                    }
                    ("if", _) => Err(LError::assertion_violation(
                        "if",
                        "bad syntax",
                        vec![datum.clone()],
                    )),
                    _ => {
                        let args = operands
                            .iter()
                            .map(|d| Self::from_datum_with(d, types))
                            .collect::<LResult<Vec<_>>>()?;
                        Ok(Node::call(&op, args))
                    }
                }
            }
            other => Ok(Node::Const(other.clone())),
        }
    }
}
