use cadr::value::{list, Arity, Condition, Hashtable, RecordType};
use cadr::value::Port;
use cadr::{cons, InputPort, OutputPort, Value};

#[test]
fn test_nil_is_not_a_pair() {
    assert!(Value::Nil.is_nil());
    assert!(!Value::Nil.is_pair());
    assert_eq!(Value::Nil.type_name(), "empty list");
}

#[test]
fn test_cons_builds_a_pair() {
    let p = cons(Value::Int(1), Value::Int(2));
    assert!(p.is_pair());
    let pair = p.as_pair().unwrap();
    assert_eq!(pair.first(), Value::Int(1));
    assert_eq!(pair.rest(), Value::Int(2));
}

#[test]
fn test_pair_mutation_is_visible_through_aliases() {
    let p = cons(Value::Int(1), Value::Nil);
    let alias = p.clone();
    p.as_pair().unwrap().set_first(Value::symbol("x"));
    assert_eq!(alias.as_pair().unwrap().first(), Value::symbol("x"));
    assert!(p.is_eq(&alias));
}

#[test]
fn test_structural_equality_is_not_identity() {
    let a = list(vec![Value::Int(1), Value::Int(2)]);
    let b = list(vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(a, b);
    assert!(!a.is_eq(&b));
    assert!(a.is_eq(&a.clone()));
}

#[test]
fn test_only_false_is_falsy() {
    assert!(!Value::FALSE.is_truthy());
    assert!(Value::TRUE.is_truthy());
    assert!(Value::Nil.is_truthy());
    assert!(Value::Int(0).is_truthy());
}

#[test]
fn test_long_list_drops_without_overflow() {
    let mut lst = Value::Nil;
    for i in 0..200_000 {
        lst = cons(Value::Int(i), lst);
    }
    drop(lst);
}

#[test]
fn test_procedure_checks_arity() {
    let one = Value::procedure("one", Arity::Exact(1), |args| Ok(args[0].clone()));
    let Value::Procedure(procedure) = one else {
        panic!("expected a procedure");
    };
    assert_eq!(procedure.call(&[Value::Int(7)]).unwrap(), Value::Int(7));
    assert!(procedure.call(&[]).is_err());
}

#[test]
fn test_record_fields() {
    let rtd = RecordType::new("point", &["x", "y"]);
    let point = Value::record(rtd, vec![Value::Int(1), Value::Int(2)]);
    let Value::Record(record) = &point else {
        panic!("expected a record");
    };
    assert_eq!(record.type_name(), "point");
    assert_eq!(record.fields().len(), 2);
}

#[test]
fn test_hashtable_insert_replaces() {
    let mut table = Hashtable::new();
    table.insert(Value::symbol("a"), Value::Int(1));
    table.insert(Value::symbol("a"), Value::Int(2));
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(&Value::symbol("a")), Some(&Value::Int(2)));
}

#[test]
fn test_condition_value() {
    let c = Value::condition(Condition::simple(
        "&assertion",
        "car",
        "bad",
        vec![Value::Int(1)],
    ));
    assert_eq!(c.type_name(), "condition");
}

#[test]
fn test_port_kind_predicates() {
    let input = Value::Port(Port::Input(InputPort::from_string("in", "x")));
    let output = Value::Port(Port::Output(OutputPort::string_port("out")));
    assert!(input.is_input_port() && !input.is_output_port());
    assert!(output.is_output_port() && !output.is_input_port());
    assert!(!Value::Nil.is_input_port());
}
