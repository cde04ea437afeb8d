use std::cell::Cell;
use std::rc::Rc;

use cadr::error::ErrorKind;
use cadr::{
    write_format, DatumParser, InputPort, LResult, OutputPort, Parser, Session, SessionConfig,
    Value,
};

/// Counts how many times the session asks for a batch parse.
struct CountingParser {
    inner: DatumParser,
    calls: Rc<Cell<usize>>,
}

impl Parser for CountingParser {
    fn parse_all(&mut self, text: &str) -> LResult<Vec<(Value, usize)>> {
        self.calls.set(self.calls.get() + 1);
        self.inner.parse_all(text)
    }
}

fn session_with_counter(input: &str) -> (Session, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let session = Session::with_ports(
        SessionConfig::new(),
        InputPort::from_string("in", input),
        OutputPort::string_port("out"),
        OutputPort::string_port("err"),
    )
    .with_parser(Box::new(CountingParser {
        inner: DatumParser::new(),
        calls: calls.clone(),
    }));
    (session, calls)
}

#[test]
fn test_many_forms_parse_once() {
    let (mut session, calls) = session_with_counter("1 (2 3) four \"five\"");
    let mut seen = Vec::new();
    loop {
        let datum = session.read().unwrap();
        if datum.is_eof() {
            break;
        }
        seen.push(write_format(&datum));
    }
    assert_eq!(seen, vec!["1", "(2 3)", "four", "\"five\""]);
    // One batch parse for the text, one more that finds the port drained.
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_single_form_is_not_cached() {
    let (mut session, _) = session_with_counter("(only)");
    let port = session.current_input_port();
    assert_eq!(write_format(&session.read().unwrap()), "(only)");
    assert!(session.cached_forms(&port).is_none());
    assert!(session.read().unwrap().is_eof());
}

#[test]
fn test_caches_are_per_port() {
    let (mut session, _) = session_with_counter("");
    let a = session.open_input_string("a1 a2");
    let b = session.open_input_string("b1 b2");
    assert_eq!(write_format(&session.read_next(&a).unwrap()), "a1");
    assert_eq!(write_format(&session.read_next(&b).unwrap()), "b1");
    assert_eq!(write_format(&session.read_next(&a).unwrap()), "a2");
    assert_eq!(write_format(&session.read_next(&b).unwrap()), "b2");
    assert!(session.read_next(&a).unwrap().is_eof());
    assert!(session.read_next(&b).unwrap().is_eof());
}

#[test]
fn test_closing_purges_cache() {
    let (mut session, _) = session_with_counter("");
    let port = session.open_input_string("x y z");
    session.read_next(&port).unwrap();
    assert!(session.cached_forms(&port).is_some());
    session.close_input_port(&port);
    assert!(session.cached_forms(&port).is_none());
    let err = session.read_next(&port).unwrap_err();
    assert_eq!(err.kind, ErrorKind::IoPortViolation);
}

#[test]
fn test_parse_error_surfaces_as_lexical_violation() {
    let (mut session, _) = session_with_counter("(1 2");
    let err = session.read().unwrap_err();
    assert_eq!(err.kind, ErrorKind::LexicalViolation);
}

#[test]
fn test_reading_a_file_through_the_session() {
    let dir = std::env::temp_dir().join(format!("cadr-reader-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("forms.scm");
    std::fs::write(&path, "; header\n(define x 1)\n#| block |# x\n").unwrap();

    let (mut session, _) = session_with_counter("");
    let port = session.open_input_file(path.to_str().unwrap()).unwrap();
    assert_eq!(write_format(&session.read_next(&port).unwrap()), "(define x 1)");
    assert_eq!(write_format(&session.read_next(&port).unwrap()), "x");
    assert!(session.read_next(&port).unwrap().is_eof());
    session.close_input_port(&port);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_char_reads_and_peeks() {
    let (mut session, _) = session_with_counter("ab");
    assert_eq!(session.peek_char(None).unwrap(), Value::Char('a'));
    assert_eq!(session.read_char(None).unwrap(), Value::Char('a'));
    assert_eq!(session.read_char(None).unwrap(), Value::Char('b'));
    assert!(session.read_char(None).unwrap().is_eof());
}
