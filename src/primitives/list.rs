//! List manipulation primitives
use crate::error::{LError, LResult};
use crate::list;
use crate::session::{eof_object, is_eof_object};
use crate::value::{Arity, Value};

pub(super) fn check_arity(who: &str, args: &[Value], arity: Arity) -> LResult<()> {
    if arity.matches(args.len()) {
        Ok(())
    } else {
        Err(LError::arity_mismatch(who, arity, args.len()))
    }
}

fn index_arg(who: &str, index: &Value) -> LResult<i64> {
    index
        .as_int()
        .ok_or_else(|| LError::type_violation(who, "integer", index))
}

/// Construct a pair
pub fn prim_cons(args: &[Value]) -> LResult<Value> {
    check_arity("cons", args, Arity::Exact(2))?;
    Ok(crate::value::cons(args[0].clone(), args[1].clone()))
}

pub fn prim_car(args: &[Value]) -> LResult<Value> {
    check_arity("car", args, Arity::Exact(1))?;
    list::car(&args[0])
}

pub fn prim_cdr(args: &[Value]) -> LResult<Value> {
    check_arity("cdr", args, Arity::Exact(1))?;
    list::cdr(&args[0])
}

pub fn prim_rest(args: &[Value]) -> LResult<Value> {
    check_arity("rest", args, Arity::Exact(1))?;
    list::rest(&args[0])
}

pub fn prim_set_car(args: &[Value]) -> LResult<Value> {
    check_arity("set-car!", args, Arity::Exact(2))?;
    list::set_car(&args[0], args[1].clone())
}

pub fn prim_set_cdr(args: &[Value]) -> LResult<Value> {
    check_arity("set-cdr!", args, Arity::Exact(2))?;
    list::set_cdr(&args[0], args[1].clone())
}

pub fn prim_is_null(args: &[Value]) -> LResult<Value> {
    check_arity("null?", args, Arity::Exact(1))?;
    Ok(Value::bool(list::is_null(&args[0])))
}

pub fn prim_is_pair(args: &[Value]) -> LResult<Value> {
    check_arity("pair?", args, Arity::Exact(1))?;
    Ok(Value::bool(list::is_pair(&args[0])))
}

pub fn prim_is_list(args: &[Value]) -> LResult<Value> {
    check_arity("list?", args, Arity::Exact(1))?;
    Ok(Value::bool(list::is_list(&args[0])))
}

/// Create a list from the arguments
pub fn prim_list(args: &[Value]) -> LResult<Value> {
    Ok(crate::value::list(args.to_vec()))
}

pub fn prim_first(args: &[Value]) -> LResult<Value> {
    check_arity("first", args, Arity::Exact(1))?;
    list::first(&args[0])
}

pub fn prim_second(args: &[Value]) -> LResult<Value> {
    check_arity("second", args, Arity::Exact(1))?;
    list::second(&args[0])
}

pub fn prim_third(args: &[Value]) -> LResult<Value> {
    check_arity("third", args, Arity::Exact(1))?;
    list::third(&args[0])
}

pub fn prim_length(args: &[Value]) -> LResult<Value> {
    check_arity("length", args, Arity::Exact(1))?;
    Ok(Value::Int(list::length(&args[0])? as i64))
}

pub fn prim_reverse(args: &[Value]) -> LResult<Value> {
    check_arity("reverse", args, Arity::Exact(1))?;
    list::reverse(&args[0])
}

pub fn prim_reverse_in_place(args: &[Value]) -> LResult<Value> {
    check_arity("reverse!", args, Arity::Exact(1))?;
    list::reverse_in_place(&args[0])
}

pub fn prim_append(args: &[Value]) -> LResult<Value> {
    list::append(args)
}

pub fn prim_list_tail(args: &[Value]) -> LResult<Value> {
    check_arity("list-tail", args, Arity::Exact(2))?;
    list::list_tail(&args[0], index_arg("list-tail", &args[1])?)
}

pub fn prim_list_ref(args: &[Value]) -> LResult<Value> {
    check_arity("list-ref", args, Arity::Exact(2))?;
    list::list_ref(&args[0], index_arg("list-ref", &args[1])?)
}

pub fn prim_distinct(args: &[Value]) -> LResult<Value> {
    check_arity("distinct", args, Arity::Exact(1))?;
    list::distinct(&args[0])
}

pub fn prim_make_list(args: &[Value]) -> LResult<Value> {
    check_arity("make-list", args, Arity::Range(1, 2))?;
    list::make_list(&args[0], args.get(1).cloned())
}

pub fn prim_last_pair(args: &[Value]) -> LResult<Value> {
    check_arity("last-pair", args, Arity::Exact(1))?;
    list::last_pair(&args[0])
}

pub fn prim_last(args: &[Value]) -> LResult<Value> {
    check_arity("last", args, Arity::Exact(1))?;
    list::last(&args[0])
}

pub fn prim_eof_object(args: &[Value]) -> LResult<Value> {
    check_arity("eof-object", args, Arity::Exact(0))?;
    Ok(eof_object())
}

pub fn prim_is_eof_object(args: &[Value]) -> LResult<Value> {
    check_arity("eof-object?", args, Arity::Exact(1))?;
    Ok(Value::bool(is_eof_object(&args[0])))
}
