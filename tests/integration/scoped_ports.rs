use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use cadr::error::ErrorKind;
use cadr::{write_format, InputPort, LError, OutputPort, Session, SessionConfig, Value};

struct TempDir(PathBuf);

impl TempDir {
    fn new(tag: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("cadr-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        TempDir(dir)
    }

    fn file(&self, name: &str, contents: &str) -> String {
        let path = self.0.join(name);
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn path(&self, name: &str) -> String {
        self.0.join(name).to_string_lossy().into_owned()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

fn session() -> Session {
    Session::with_ports(
        SessionConfig::new(),
        InputPort::from_string("stdin", "outer"),
        OutputPort::string_port("stdout"),
        OutputPort::string_port("stderr"),
    )
}

#[test]
fn test_input_scope_restores_previous_port() {
    let dir = TempDir::new("scope-in");
    let path = dir.file("a.scm", "(1 2) inner");
    let mut session = session();
    let outer = session.current_input_port();

    let (first, scoped) = session
        .with_input_from_file(&path, |s| Ok((s.read()?, s.current_input_port())))
        .unwrap();
    assert_eq!(write_format(&first), "(1 2)");
    assert!(scoped.is_closed());
    assert!(session.cached_forms(&scoped).is_none());
    assert_eq!(session.current_input_port().id(), outer.id());
    assert_eq!(write_format(&session.read().unwrap()), "outer");
}

#[test]
fn test_nested_input_scopes() {
    let dir = TempDir::new("scope-nested");
    let a = dir.file("a.scm", "a");
    let b = dir.file("b.scm", "b");
    let mut session = session();

    let seen = session
        .with_input_from_file(&a, |s| {
            let inner = s.with_input_from_file(&b, |s| s.read())?;
            let outer = s.read()?;
            Ok((inner, outer))
        })
        .unwrap();
    assert_eq!(seen, (Value::symbol("b"), Value::symbol("a")));
    assert_eq!(write_format(&session.read().unwrap()), "outer");
}

#[test]
fn test_error_in_body_still_releases() {
    let dir = TempDir::new("scope-err");
    let path = dir.file("a.scm", "x");
    let mut session = session();
    let outer = session.current_input_port();

    let err = session
        .with_input_from_file(&path, |_| -> Result<(), LError> {
            Err(LError::assertion_violation("body", "failed", vec![]))
        })
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AssertionViolation);
    assert_eq!(session.current_input_port().id(), outer.id());
}

#[test]
fn test_panic_in_body_still_releases() {
    let dir = TempDir::new("scope-panic");
    let path = dir.file("a.scm", "x");
    let mut session = session();
    let outer = session.current_input_port();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _ = session.with_input_from_file(&path, |_| -> Result<(), LError> {
            panic!("body blew up");
        });
    }));
    assert!(result.is_err());
    assert_eq!(session.current_input_port().id(), outer.id());
}

#[test]
fn test_output_scope_writes_file() {
    let dir = TempDir::new("scope-out");
    let path = dir.path("out.txt");
    let mut session = session();

    session
        .with_output_to_file(&path, |s| {
            s.write(&Value::string("hi"), None)?;
            s.newline(None)?;
            Ok(())
        })
        .unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"hi\"\n");
    assert_eq!(&*session.current_output_port().name(), "stdout");
}

#[test]
fn test_call_with_files() {
    let dir = TempDir::new("call-with");
    let src = dir.file("in.scm", "(a b) c");
    let dst = dir.path("out.txt");
    let mut session = session();

    let forms = session
        .call_with_input_file(&src, |s, port| {
            let first = s.read_next(port)?;
            let second = s.read_next(port)?;
            Ok(vec![first, second])
        })
        .unwrap();
    assert_eq!(write_format(&forms[0]), "(a b)");
    assert_eq!(forms[1], Value::symbol("c"));

    session
        .call_with_output_file(&dst, |s, port| {
            s.display(&forms[0], Some(port))?;
            Ok(())
        })
        .unwrap();
    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "(a b)");
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new("missing");
    let mut session = session();
    let err = session
        .with_input_from_file(&dir.path("nope.scm"), |s| s.read())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFoundViolation);
}

#[test]
fn test_application_dir_prefix() {
    let dir = TempDir::new("appdir");
    dir.file("boot.scm", "booted");
    let mut session = Session::with_ports(
        SessionConfig::new().with_application_dir(&dir.0),
        InputPort::from_string("stdin", ""),
        OutputPort::string_port("stdout"),
        OutputPort::string_port("stderr"),
    );
    let value = session
        .with_input_from_file("~/boot.scm", |s| s.read())
        .unwrap();
    assert_eq!(value, Value::symbol("booted"));
}
