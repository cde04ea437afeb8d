//! Port type predicates
use crate::error::LResult;
use crate::value::{Arity, Value};

use super::list::check_arity;

pub fn prim_is_input_port(args: &[Value]) -> LResult<Value> {
    check_arity("input-port?", args, Arity::Exact(1))?;
    Ok(Value::bool(args[0].is_input_port()))
}

pub fn prim_is_output_port(args: &[Value]) -> LResult<Value> {
    check_arity("output-port?", args, Arity::Exact(1))?;
    Ok(Value::bool(args[0].is_output_port()))
}
