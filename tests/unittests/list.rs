use cadr::error::ErrorKind;
use cadr::list::{self as lists, append, distinct, length, list_ref, list_tail, reverse, reverse_in_place};
use cadr::value::list;
use cadr::{cons, read_str, SymbolTable, Value};

fn read(src: &str) -> Value {
    let mut symbols = SymbolTable::new();
    read_str(src, &mut symbols).unwrap()
}

fn ints(ns: &[i64]) -> Value {
    list(ns.iter().map(|&n| Value::Int(n)).collect())
}

#[test]
fn test_length_of_read_list() {
    assert_eq!(length(&read("(a b c)")).unwrap(), 3);
    assert_eq!(length(&read("()")).unwrap(), 0);
}

#[test]
fn test_length_rejects_non_list() {
    let err = length(&Value::Int(4)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeViolation);
    assert_eq!(err.who, "length");
}

#[test]
fn test_reverse_builds_fresh_list() {
    let original = ints(&[1, 2, 3]);
    let reversed = reverse(&original).unwrap();
    assert_eq!(reversed, ints(&[3, 2, 1]));
    assert_eq!(original, ints(&[1, 2, 3]));
}

#[test]
fn test_reverse_in_place_reuses_pairs() {
    let original = ints(&[1, 2, 3]);
    let last = lists::last_pair(&original).unwrap();
    let reversed = reverse_in_place(&original).unwrap();
    assert!(reversed.is_eq(&last));
    assert_eq!(reversed, ints(&[3, 2, 1]));
    // The old head is now the last pair.
    assert_eq!(original, ints(&[1]));
}

#[test]
fn test_append_shares_last_argument() {
    let tail = ints(&[3, 4]);
    let joined = append(&[ints(&[1, 2]), tail.clone()]).unwrap();
    assert_eq!(joined, ints(&[1, 2, 3, 4]));
    assert!(list_tail(&joined, 2).unwrap().is_eq(&tail));
}

#[test]
fn test_append_improper_last() {
    let joined = append(&[ints(&[1]), Value::symbol("z")]).unwrap();
    assert_eq!(joined, cons(Value::Int(1), Value::symbol("z")));
}

#[test]
fn test_append_edge_cases() {
    assert_eq!(append(&[]).unwrap(), Value::Nil);
    assert_eq!(append(&[Value::Int(9)]).unwrap(), Value::Int(9));
    let err = append(&[read("(1 . 2)"), Value::Nil]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ListTypeViolation);
}

#[test]
fn test_list_tail_and_ref() {
    let lst = read("(a b c)");
    assert_eq!(list_tail(&lst, 3).unwrap(), Value::Nil);
    assert_eq!(list_ref(&lst, 1).unwrap(), Value::symbol("b"));
    assert_eq!(list_ref(&lst, 3).unwrap_err().kind, ErrorKind::IndexViolation);
    assert_eq!(list_tail(&lst, -1).unwrap_err().kind, ErrorKind::IndexViolation);
}

#[test]
fn test_distinct_removes_duplicates() {
    let result = distinct(&read("(a b a \"s\" \"s\" 1 1)")).unwrap();
    assert_eq!(length(&result).unwrap(), 4);
    for item in lists::iter(&read("(a b \"s\" 1)")) {
        assert!(lists::iter(&result).any(|v| v == item));
    }
}

#[test]
fn test_accessors() {
    let lst = read("(1 2 3)");
    assert_eq!(lists::first(&lst).unwrap(), Value::Int(1));
    assert_eq!(lists::second(&lst).unwrap(), Value::Int(2));
    assert_eq!(lists::third(&lst).unwrap(), Value::Int(3));
    assert_eq!(lists::car(&Value::Nil).unwrap_err().kind, ErrorKind::TypeViolation);
}

#[test]
fn test_set_car_and_set_cdr() {
    let p = read("(1 2)");
    assert!(lists::set_car(&p, Value::Int(10)).unwrap().is_unspecified());
    lists::set_cdr(&p, Value::symbol("end")).unwrap();
    assert_eq!(p, cons(Value::Int(10), Value::symbol("end")));
}

#[test]
fn test_make_list() {
    let filled = lists::make_list(&Value::Int(2), Some(Value::Char('x'))).unwrap();
    assert_eq!(filled, list(vec![Value::Char('x'), Value::Char('x')]));
    assert_eq!(lists::make_list(&Value::Int(0), None).unwrap(), Value::Nil);
}

#[test]
fn test_predicates() {
    assert!(lists::is_list(&read("(1 2)")));
    assert!(!lists::is_list(&read("(1 . 2)")));
    assert!(lists::is_null(&Value::Nil));
    assert!(lists::is_pair(&read("(1 . 2)")));
}
