use std::rc::Rc;

use cadr::compiler::{eval, inline_primitives, Env, Field, Node, StaticType, TypeEnv};
use cadr::error::ErrorKind;
use cadr::{read_str, register_primitives, write_format, PrimitiveTable, SymbolTable, Value};

fn table() -> PrimitiveTable {
    let mut table = PrimitiveTable::new();
    register_primitives(&mut table);
    table
}

fn lower(src: &str, types: &TypeEnv) -> Node {
    let mut symbols = SymbolTable::new();
    let datum = read_str(src, &mut symbols).unwrap();
    Node::from_datum_with(&datum, types).unwrap()
}

fn env_with(bindings: &[(&str, &str)]) -> Env {
    let mut symbols = SymbolTable::new();
    bindings
        .iter()
        .map(|(name, src)| (Rc::from(*name), read_str(src, &mut symbols).unwrap()))
        .collect()
}

#[test]
fn test_rewrites_nested_calls() {
    let mut node = lower("(car (cdr xs))", &TypeEnv::default());
    assert_eq!(inline_primitives(&mut node), 2);
    let Node::PairField { field, arg } = &node else {
        panic!("expected a field access, got {:?}", node);
    };
    assert_eq!(*field, Field::First);
    assert!(matches!(**arg, Node::PairField { field: Field::Rest, .. }));
}

#[test]
fn test_unlisted_primitives_stay_calls() {
    let mut node = lower("(length (cons 1 '()))", &TypeEnv::default());
    assert_eq!(inline_primitives(&mut node), 1);
    let Node::Call { op, args } = &node else {
        panic!("expected a call");
    };
    assert_eq!(&**op, "length");
    assert!(matches!(args[0], Node::MakePair(..)));
}

#[test]
fn test_pipeline_agrees_with_generic_calls() {
    let env = env_with(&[("xs", "(1 (2 3) 4)"), ("n", "()"), ("s", "\"str\"")]);
    let table = table();
    for src in [
        "(car xs)",
        "(cdr (cdr xs))",
        "(car (car (cdr xs)))",
        "(cons (car xs) n)",
        "(if (null? n) 'empty 'full)",
        "(if (pair? s) (car s) s)",
        "(append xs (cons 5 '()))",
        "(reverse (cdr xs))",
    ] {
        let generic = lower(src, &TypeEnv::default());
        let mut inlined = generic.clone();
        inline_primitives(&mut inlined);
        let expected = eval(&generic, &env, &table).unwrap();
        let actual = eval(&inlined, &env, &table).unwrap();
        assert_eq!(write_format(&expected), write_format(&actual), "for {}", src);
    }
}

#[test]
fn test_type_errors_survive_inlining() {
    let env = env_with(&[("s", "\"str\"")]);
    let table = table();
    for src in ["(car s)", "(cdr s)", "(car (cdr '(1)))"] {
        let mut node = lower(src, &TypeEnv::default());
        inline_primitives(&mut node);
        let err = eval(&node, &env, &table).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeViolation, "for {}", src);
    }
}

#[test]
fn test_static_types_block_rewrites() {
    let mut types = TypeEnv::default();
    types.insert(Rc::from("k"), StaticType::Number);
    types.insert(Rc::from("p"), StaticType::Pair);
    let mut blocked = lower("(cdr k)", &types);
    assert_eq!(inline_primitives(&mut blocked), 0);
    let mut allowed = lower("(cdr p)", &types);
    assert_eq!(inline_primitives(&mut allowed), 1);
}

#[test]
fn test_primitive_table_arity() {
    let err = table().call("car", &[]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::AssertionViolation);
    assert_eq!(
        table().call("list", &[Value::Int(1), Value::Int(2)]).unwrap(),
        cadr::value::list(vec![Value::Int(1), Value::Int(2)])
    );
}
