//! Evaluation session
//!
//! A `Session` is the state one worker of evaluation owns: the read cache,
//! the current input/output/error ports, the parser and the custom printer
//! registry. Nothing here is shared between sessions, so one worker's
//! batched lookahead can never be observed by another.

use std::mem;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::error::{LError, LResult};
use crate::port::{InputPort, OutputPort, Port, PortId};
use crate::printer::{Mode, Printer, PrinterRegistry};
use crate::reader::{DatumParser, Parser};
use crate::value::{list, Value};

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory that `~/` paths resolve against.
    pub application_dir: Option<PathBuf>,
    /// Rewind a seekable source found at its end before a batch read.
    pub rewind_seekable_at_end: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        SessionConfig {
            application_dir: None,
            rewind_seekable_at_end: true,
        }
    }

    pub fn with_application_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.application_dir = Some(dir.into());
        self
    }

    pub fn with_rewind_seekable_at_end(mut self, rewind: bool) -> Self {
        self.rewind_seekable_at_end = rewind;
        self
    }

    /// Resolve a user-supplied file name.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        match (path.strip_prefix("~/"), &self.application_dir) {
            (Some(rest), Some(dir)) => dir.join(rest),
            _ => PathBuf::from(path),
        }
    }
}

pub struct Session {
    config: SessionConfig,
    parser: Box<dyn Parser>,
    printers: PrinterRegistry,
    read_cache: FxHashMap<PortId, Value>,
    current_input: InputPort,
    current_output: OutputPort,
    current_error: OutputPort,
}

impl Session {
    /// Session bound to the process's standard streams.
    pub fn new(config: SessionConfig) -> Self {
        Session::with_ports(
            config,
            InputPort::stdin(),
            OutputPort::stdout(),
            OutputPort::stderr(),
        )
    }

    pub fn with_ports(
        config: SessionConfig,
        input: InputPort,
        output: OutputPort,
        error: OutputPort,
    ) -> Self {
        Session {
            config,
            parser: Box::new(DatumParser::new()),
            printers: PrinterRegistry::new(),
            read_cache: FxHashMap::default(),
            current_input: input,
            current_output: output,
            current_error: error,
        }
    }

    /// Replace the batch parser.
    pub fn with_parser(mut self, parser: Box<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn printers(&self) -> &PrinterRegistry {
        &self.printers
    }

    pub fn printers_mut(&mut self) -> &mut PrinterRegistry {
        &mut self.printers
    }

    // Current ports

    pub fn current_input_port(&self) -> InputPort {
        self.current_input.clone()
    }

    pub fn current_output_port(&self) -> OutputPort {
        self.current_output.clone()
    }

    pub fn current_error_port(&self) -> OutputPort {
        self.current_error.clone()
    }

    /// Install `port` as the current input port, returning the previous one.
    pub fn set_current_input_port(&mut self, port: InputPort) -> InputPort {
        mem::replace(&mut self.current_input, port)
    }

    pub fn set_current_output_port(&mut self, port: OutputPort) -> OutputPort {
        mem::replace(&mut self.current_output, port)
    }

    pub fn set_current_error_port(&mut self, port: OutputPort) -> OutputPort {
        mem::replace(&mut self.current_error, port)
    }

    // Reading

    /// Forms parsed from `port` but not yet returned, if any.
    pub fn cached_forms(&self, port: &InputPort) -> Option<Value> {
        self.read_cache.get(&port.id()).cloned()
    }

    /// Drop any cached forms for `port`.
    pub fn purge_read_cache(&mut self, port: &InputPort) {
        if self.read_cache.remove(&port.id()).is_some() {
            debug!(port = %port.id(), "purged read cache");
        }
    }

    /// Next datum from `port`, or the EOF object.
    ///
    /// Forms left over from an earlier batch parse are returned first. When
    /// none are left, everything currently available on the port is parsed
    /// in one go and all forms after the first are cached.
    pub fn read_next(&mut self, port: &InputPort) -> LResult<Value> {
        if port.is_closed() {
            self.purge_read_cache(port);
            return Err(LError::io_port_violation(
                "read",
                "port has already been closed",
                vec![Value::Port(Port::Input(port.clone()))],
            ));
        }

        if let Some(Value::Pair(cached)) = self.read_cache.remove(&port.id()) {
            let rest = cached.rest();
            if rest.is_nil() {
                trace!(port = %port.id(), "read cache exhausted");
            } else {
                self.read_cache.insert(port.id(), rest);
            }
            return Ok(cached.first());
        }

        let text = port.read_to_end(self.config.rewind_seekable_at_end)?;
        let forms = self.parser.parse_all(&text)?;
        debug!(
            port = %port.id(),
            bytes = text.len(),
            forms = forms.len(),
            "batch parse"
        );

        let mut forms = forms.into_iter().map(|(value, _)| value);
        let first = match forms.next() {
            Some(first) => first,
            None => return Ok(Value::Eof),
        };
        let remaining: Vec<Value> = forms.collect();
        if !remaining.is_empty() {
            debug!(port = %port.id(), cached = remaining.len(), "caching parsed forms");
            self.read_cache.insert(port.id(), list(remaining));
        }
        Ok(first)
    }

    /// `read` from the current input port.
    pub fn read(&mut self) -> LResult<Value> {
        let port = self.current_input_port();
        self.read_next(&port)
    }

    fn input_or_current(&self, port: Option<&InputPort>) -> InputPort {
        port.cloned().unwrap_or_else(|| self.current_input_port())
    }

    fn output_or_current(&self, port: Option<&OutputPort>) -> OutputPort {
        port.cloned().unwrap_or_else(|| self.current_output_port())
    }

    /// Next raw character. Bypasses the read cache.
    pub fn read_char(&mut self, port: Option<&InputPort>) -> LResult<Value> {
        Ok(self
            .input_or_current(port)
            .read_char()?
            .map_or(Value::Eof, Value::Char))
    }

    pub fn peek_char(&mut self, port: Option<&InputPort>) -> LResult<Value> {
        Ok(self
            .input_or_current(port)
            .peek_char()?
            .map_or(Value::Eof, Value::Char))
    }

    // Writing

    pub fn write_char(&mut self, c: char, port: Option<&OutputPort>) -> LResult<Value> {
        let mut buffer = [0u8; 4];
        self.output_or_current(port)
            .write_str("write-char", c.encode_utf8(&mut buffer))?;
        Ok(Value::Unspecified)
    }

    pub fn newline(&mut self, port: Option<&OutputPort>) -> LResult<Value> {
        self.output_or_current(port).write_str("newline", "\n")?;
        Ok(Value::Unspecified)
    }

    pub fn display(&mut self, value: &Value, port: Option<&OutputPort>) -> LResult<Value> {
        let text = Printer::with_registry(Mode::Display, &self.printers).render(value);
        self.output_or_current(port).write_str("display", &text)?;
        Ok(Value::Unspecified)
    }

    pub fn write(&mut self, value: &Value, port: Option<&OutputPort>) -> LResult<Value> {
        let text = Printer::with_registry(Mode::Write, &self.printers).render(value);
        self.output_or_current(port).write_str("write", &text)?;
        Ok(Value::Unspecified)
    }

    // Opening and closing

    pub fn open_input_file(&mut self, path: &str) -> LResult<InputPort> {
        let resolved = self.config.resolve_path(path);
        InputPort::open_file(&resolved)
            .map_err(|e| LError::from_open_error("open-input-file", &e, &Value::string(path)))
    }

    pub fn open_output_file(&mut self, path: &str) -> LResult<OutputPort> {
        let resolved = self.config.resolve_path(path);
        OutputPort::create_file(&resolved)
            .map_err(|e| LError::from_open_error("open-output-file", &e, &Value::string(path)))
    }

    pub fn open_input_string(&mut self, text: &str) -> InputPort {
        InputPort::from_string("string", text)
    }

    /// Close `port` and discard anything cached for it.
    pub fn close_input_port(&mut self, port: &InputPort) -> Value {
        self.purge_read_cache(port);
        port.close();
        Value::Unspecified
    }

    pub fn close_output_port(&mut self, port: &OutputPort) -> LResult<Value> {
        port.close()?;
        Ok(Value::Unspecified)
    }

    // Scoped acquisition

    /// Run `body` with the named file as the current input port.
    ///
    /// The previous current input port is restored, the file's cache entry
    /// purged and the file closed however `body` exits.
    pub fn with_input_from_file<T, F>(&mut self, path: &str, body: F) -> LResult<T>
    where
        F: FnOnce(&mut Session) -> LResult<T>,
    {
        let port = self.open_input_file(path)?;
        let previous = self.set_current_input_port(port.clone());
        let mut scope = PortScope::new(self, Port::Input(port), Some(Port::Input(previous)));
        body(&mut scope)
    }

    /// Run `body` with the named file as the current output port.
    pub fn with_output_to_file<T, F>(&mut self, path: &str, body: F) -> LResult<T>
    where
        F: FnOnce(&mut Session) -> LResult<T>,
    {
        let port = self.open_output_file(path)?;
        let previous = self.set_current_output_port(port.clone());
        let mut scope = PortScope::new(self, Port::Output(port.clone()), Some(Port::Output(previous)));
        let result = body(&mut scope)?;
        port.flush()?;
        Ok(result)
    }

    /// Open the named file and pass the port to `body`, closing it after.
    pub fn call_with_input_file<T, F>(&mut self, path: &str, body: F) -> LResult<T>
    where
        F: FnOnce(&mut Session, &InputPort) -> LResult<T>,
    {
        let port = self.open_input_file(path)?;
        let mut scope = PortScope::new(self, Port::Input(port.clone()), None);
        body(&mut scope, &port)
    }

    pub fn call_with_output_file<T, F>(&mut self, path: &str, body: F) -> LResult<T>
    where
        F: FnOnce(&mut Session, &OutputPort) -> LResult<T>,
    {
        let port = self.open_output_file(path)?;
        let mut scope = PortScope::new(self, Port::Output(port.clone()), None);
        let result = body(&mut scope, &port)?;
        port.flush()?;
        Ok(result)
    }
}

/// Releases a scoped port on drop: restores the previous current port,
/// purges the read cache and closes the port. Runs on `Ok`, `Err` and
/// unwinding alike.
struct PortScope<'s> {
    session: &'s mut Session,
    port: Port,
    previous: Option<Port>,
}

impl<'s> PortScope<'s> {
    fn new(session: &'s mut Session, port: Port, previous: Option<Port>) -> Self {
        debug!(port = %port.id(), name = %port.name(), "scoped port acquired");
        PortScope {
            session,
            port,
            previous,
        }
    }
}

impl Deref for PortScope<'_> {
    type Target = Session;

    fn deref(&self) -> &Session {
        self.session
    }
}

impl DerefMut for PortScope<'_> {
    fn deref_mut(&mut self) -> &mut Session {
        self.session
    }
}

impl Drop for PortScope<'_> {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(Port::Input(previous)) => {
                self.session.set_current_input_port(previous);
            }
            Some(Port::Output(previous)) => {
                self.session.set_current_output_port(previous);
            }
            None => {}
        }
        match &self.port {
            Port::Input(port) => {
                self.session.purge_read_cache(port);
                port.close();
            }
            Port::Output(port) => {
                if let Err(err) = port.close() {
                    warn!(port = %port.id(), error = %err, "failed to close scoped port");
                }
            }
        }
        debug!(port = %self.port.id(), "scoped port released");
    }
}

/// The EOF object.
pub fn eof_object() -> Value {
    Value::Eof
}

pub fn is_eof_object(value: &Value) -> bool {
    value.is_eof()
}
