use cadr::printer::{display_format_with, write_format_with, Printer};
use cadr::value::{list, Condition, Hashtable, RecordType};
use cadr::{cons, display_format, read_str, write_format, Mode, PrinterRegistry, SymbolTable, Value};

fn read(src: &str) -> Value {
    let mut symbols = SymbolTable::new();
    read_str(src, &mut symbols).unwrap()
}

#[test]
fn test_write_reproduces_source() {
    for src in [
        "(1 2 3)",
        "(a . b)",
        "(1 (2 3) . 4)",
        "\"a\\nb\"",
        "#\\space",
        "#(1 #t #f)",
        "#vu8(1 2 255)",
        "'x",
        "`(a ,b ,@c)",
        "()",
        "1.5",
    ] {
        assert_eq!(write_format(&read(src)), src, "round trip of {}", src);
    }
}

#[test]
fn test_display_drops_quoting() {
    let v = read("(\"hi\" #\\a sym)");
    assert_eq!(display_format(&v), "(hi a sym)");
    assert_eq!(write_format(&v), "(\"hi\" #\\a sym)");
}

#[test]
fn test_quote_needs_exactly_one_argument() {
    let v = read("(quote a b)");
    assert_eq!(write_format(&v), "(quote a b)");
    let dotted = cons(Value::symbol("quote"), Value::symbol("x"));
    assert_eq!(write_format(&dotted), "(quote . x)");
}

#[test]
fn test_float_rendering() {
    assert_eq!(write_format(&Value::Float(2.0)), "2.0");
    assert_eq!(write_format(&Value::Float(f64::INFINITY)), "+inf.0");
    assert_eq!(write_format(&Value::Float(f64::NEG_INFINITY)), "-inf.0");
    assert_eq!(write_format(&Value::Float(f64::NAN)), "+nan.0");
}

#[test]
fn test_records_and_registry() {
    let rtd = RecordType::new("point", &["x", "y"]);
    let point = Value::record(rtd, vec![Value::Int(1), Value::Int(2)]);
    let plain = write_format(&point);
    assert!(plain.contains("point"));

    let mut registry = PrinterRegistry::new();
    registry.register("point", |_, _, out| out.write_str("<pt>"));
    assert_eq!(write_format_with(&point, &registry), "<pt>");
    assert_eq!(display_format_with(&list(vec![point.clone()]), &registry), "(<pt>)");
    assert!(registry.unregister("point"));
    assert_eq!(write_format_with(&point, &registry), plain);
}

#[test]
fn test_condition_irritants_use_write_format() {
    let c = Value::condition(Condition::simple(
        "&assertion",
        "f",
        "bad thing",
        vec![Value::string("s")],
    ));
    let shown = display_format(&c);
    assert!(shown.starts_with("#<condition"));
    assert!(shown.contains("\"s\""));
}

#[test]
fn test_hashtables() {
    assert_eq!(display_format(&Value::hashtable(Hashtable::new())), "#[hashtable]");
    let mut table = Hashtable::new();
    table.insert(Value::symbol("k"), Value::Int(1));
    let shown = write_format(&Value::hashtable(table));
    assert!(shown.contains("k"));
    assert!(shown.contains("=>"));
}

#[test]
fn test_printer_object() {
    let printer = Printer::new(Mode::Display);
    assert_eq!(printer.mode(), Mode::Display);
    assert_eq!(printer.render(&Value::string("x")), "x");
    let mut out = String::new();
    Printer::new(Mode::Write)
        .print(&Value::string("x"), &mut out)
        .unwrap();
    assert_eq!(out, "\"x\"");
}

#[test]
fn test_deep_list_prints_iteratively() {
    let mut lst = Value::Nil;
    for _ in 0..100_000 {
        lst = cons(Value::Int(0), lst);
    }
    assert_eq!(write_format(&lst).len(), 2 * 100_000 + 1);
}

#[test]
fn test_display_and_debug_traits() {
    let v = read("(\"a\")");
    assert_eq!(format!("{}", v), "(a)");
    assert_eq!(format!("{:?}", v), "(\"a\")");
}

#[test]
fn test_integral_floats_read_back_as_floats() {
    for f in [1e16, 1e17, -2e16, 1e300, 123456789.0] {
        let text = write_format(&Value::Float(f));
        assert_eq!(read(&text), Value::Float(f), "written as {}", text);
    }
}
