//! Character ports
//!
//! Ports are reference-counted handles over a character source or sink.
//! Every port gets a unique `PortId` when it is created; the session's read
//! cache is keyed by it, so two handles to the same port share one cache
//! entry.

use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::error::{LError, LResult};
use crate::value::Value;

static NEXT_PORT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub u64);

impl PortId {
    fn fresh() -> Self {
        PortId(NEXT_PORT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port#{}", self.0)
    }
}

/// Either kind of port, as carried by `Value::Port`.
#[derive(Clone)]
pub enum Port {
    Input(InputPort),
    Output(OutputPort),
}

impl Port {
    pub fn id(&self) -> PortId {
        match self {
            Port::Input(port) => port.id(),
            Port::Output(port) => port.id(),
        }
    }

    pub fn name(&self) -> Rc<str> {
        match self {
            Port::Input(port) => port.name(),
            Port::Output(port) => port.name(),
        }
    }
}

const CLOSED: &str = "port has already been closed";

fn closed_error(who: &str, port: Value) -> LError {
    LError::io_port_violation(who, CLOSED, vec![port])
}

fn io_error(who: &str, err: io::Error, port: Value) -> LError {
    LError::io_port_violation(who, err.to_string(), vec![port])
}

enum InputSource {
    /// In-memory text; seekable and fully buffered.
    Buffer { text: String, pos: usize },
    File(BufReader<File>),
    Stream(Box<dyn BufRead>),
}

struct InputState {
    source: InputSource,
    closed: bool,
    /// Set once any data has been handed out.
    delivered: bool,
    peeked: Option<char>,
}

struct InputPortInner {
    id: PortId,
    name: Rc<str>,
    state: RefCell<InputState>,
}

/// Handle to an input port.
#[derive(Clone)]
pub struct InputPort(Rc<InputPortInner>);

impl InputPort {
    fn with_source(name: &str, source: InputSource) -> Self {
        InputPort(Rc::new(InputPortInner {
            id: PortId::fresh(),
            name: Rc::from(name),
            state: RefCell::new(InputState {
                source,
                closed: false,
                delivered: false,
                peeked: None,
            }),
        }))
    }

    /// Port over an in-memory string.
    pub fn from_string(name: &str, text: &str) -> Self {
        Self::with_source(
            name,
            InputSource::Buffer {
                text: text.to_string(),
                pos: 0,
            },
        )
    }

    /// Port over an already-open file, read from its current position.
    pub fn from_file(name: &str, file: File) -> Self {
        Self::with_source(name, InputSource::File(BufReader::new(file)))
    }

    pub fn open_file(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_file(&path.to_string_lossy(), file))
    }

    /// Port over any buffered reader, such as stdin.
    pub fn from_reader(name: &str, reader: Box<dyn BufRead>) -> Self {
        Self::with_source(name, InputSource::Stream(reader))
    }

    pub fn stdin() -> Self {
        Self::from_reader("stdin", Box::new(BufReader::new(io::stdin())))
    }

    pub fn id(&self) -> PortId {
        self.0.id
    }

    pub fn name(&self) -> Rc<str> {
        self.0.name.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.0.state.borrow().closed
    }

    /// Release the underlying source. Closing twice is a no-op.
    pub fn close(&self) {
        let mut state = self.0.state.borrow_mut();
        if !state.closed {
            state.closed = true;
            state.peeked = None;
            state.source = InputSource::Buffer {
                text: String::new(),
                pos: 0,
            };
        }
    }

    fn as_value(&self) -> Value {
        Value::Port(Port::Input(self.clone()))
    }

    /// Next character, or `None` at end of input.
    pub fn read_char(&self) -> LResult<Option<char>> {
        let mut state = self.0.state.borrow_mut();
        if state.closed {
            return Err(closed_error("read-char", self.as_value()));
        }
        if let Some(c) = state.peeked.take() {
            return Ok(Some(c));
        }
        let c = next_char(&mut state.source).map_err(|e| io_error("read-char", e, self.as_value()))?;
        if c.is_some() {
            state.delivered = true;
        }
        Ok(c)
    }

    /// Next character without consuming it.
    pub fn peek_char(&self) -> LResult<Option<char>> {
        let mut state = self.0.state.borrow_mut();
        if state.closed {
            return Err(closed_error("peek-char", self.as_value()));
        }
        if let Some(c) = state.peeked {
            return Ok(Some(c));
        }
        let c = next_char(&mut state.source).map_err(|e| io_error("peek-char", e, self.as_value()))?;
        if c.is_some() {
            state.delivered = true;
        }
        state.peeked = c;
        Ok(c)
    }

    /// Everything still available from the port.
    ///
    /// With `rewind_at_end`, a seekable source that has never handed out any
    /// data and whose cursor already sits at its end is rewound first, so a
    /// freshly written file handed over as-is still reads its content.
    pub fn read_to_end(&self, rewind_at_end: bool) -> LResult<String> {
        let mut state = self.0.state.borrow_mut();
        if state.closed {
            return Err(closed_error("read", self.as_value()));
        }
        let mut text = String::new();
        if let Some(c) = state.peeked.take() {
            text.push(c);
        }
        let may_rewind = rewind_at_end && !state.delivered;
        let port_id = self.0.id;
        match &mut state.source {
            // A string source only advances by delivering, so it never
            // needs the rewind.
            InputSource::Buffer { text: buffer, pos } => {
                text.push_str(&buffer[*pos..]);
                *pos = buffer.len();
            }
            InputSource::File(reader) => {
                if may_rewind {
                    rewind_if_at_end(reader, port_id)
                        .map_err(|e| io_error("read", e, self.as_value()))?;
                }
                reader
                    .read_to_string(&mut text)
                    .map_err(|e| io_error("read", e, self.as_value()))?;
            }
            InputSource::Stream(reader) => {
                reader
                    .read_to_string(&mut text)
                    .map_err(|e| io_error("read", e, self.as_value()))?;
            }
        }
        if !text.is_empty() {
            state.delivered = true;
        }
        Ok(text)
    }
}

fn rewind_if_at_end(reader: &mut BufReader<File>, port_id: PortId) -> io::Result<()> {
    if !reader.buffer().is_empty() {
        return Ok(());
    }
    let file = reader.get_mut();
    let position = file.stream_position()?;
    let length = file.metadata()?.len();
    if length > 0 && position == length {
        debug!(port = %port_id, length, "rewinding seekable source at end");
        reader.seek(SeekFrom::Start(0))?;
    }
    Ok(())
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}

fn next_char(source: &mut InputSource) -> io::Result<Option<char>> {
    let reader: &mut dyn BufRead = match source {
        InputSource::Buffer { text, pos } => {
            let c = text[*pos..].chars().next();
            if let Some(c) = c {
                *pos += c.len_utf8();
            }
            return Ok(c);
        }
        InputSource::File(reader) => reader,
        InputSource::Stream(reader) => reader.as_mut(),
    };

    let mut bytes = [0u8; 4];
    if reader.read(&mut bytes[..1])? == 0 {
        return Ok(None);
    }
    let width = utf8_width(bytes[0]);
    reader.read_exact(&mut bytes[1..width])?;
    match std::str::from_utf8(&bytes[..width]) {
        Ok(s) => Ok(s.chars().next()),
        Err(_) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        )),
    }
}

impl fmt::Debug for InputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<input-port {}>", self.0.name)
    }
}

enum OutputSink {
    String(String),
    File(BufWriter<File>),
    Stream(Box<dyn Write>),
}

struct OutputState {
    sink: OutputSink,
    closed: bool,
}

struct OutputPortInner {
    id: PortId,
    name: Rc<str>,
    state: RefCell<OutputState>,
}

/// Handle to an output port.
#[derive(Clone)]
pub struct OutputPort(Rc<OutputPortInner>);

impl OutputPort {
    fn with_sink(name: &str, sink: OutputSink) -> Self {
        OutputPort(Rc::new(OutputPortInner {
            id: PortId::fresh(),
            name: Rc::from(name),
            state: RefCell::new(OutputState {
                sink,
                closed: false,
            }),
        }))
    }

    /// Port that accumulates into a string, see `contents`.
    pub fn string_port(name: &str) -> Self {
        Self::with_sink(name, OutputSink::String(String::new()))
    }

    pub fn create_file(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_sink(
            &path.to_string_lossy(),
            OutputSink::File(BufWriter::new(file)),
        ))
    }

    pub fn from_writer(name: &str, writer: Box<dyn Write>) -> Self {
        Self::with_sink(name, OutputSink::Stream(writer))
    }

    pub fn stdout() -> Self {
        Self::from_writer("stdout", Box::new(io::stdout()))
    }

    pub fn stderr() -> Self {
        Self::from_writer("stderr", Box::new(io::stderr()))
    }

    pub fn id(&self) -> PortId {
        self.0.id
    }

    pub fn name(&self) -> Rc<str> {
        self.0.name.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.0.state.borrow().closed
    }

    fn as_value(&self) -> Value {
        Value::Port(Port::Output(self.clone()))
    }

    /// Text written so far, for string ports. Still available after close.
    pub fn contents(&self) -> Option<String> {
        match &self.0.state.borrow().sink {
            OutputSink::String(text) => Some(text.clone()),
            _ => None,
        }
    }

    pub fn write_str(&self, who: &str, text: &str) -> LResult<()> {
        let mut state = self.0.state.borrow_mut();
        if state.closed {
            return Err(closed_error(who, self.as_value()));
        }
        let result = match &mut state.sink {
            OutputSink::String(buffer) => {
                buffer.push_str(text);
                Ok(())
            }
            OutputSink::File(writer) => writer.write_all(text.as_bytes()),
            OutputSink::Stream(writer) => writer.write_all(text.as_bytes()),
        };
        result.map_err(|e| io_error(who, e, self.as_value()))
    }

    pub fn flush(&self) -> LResult<()> {
        let mut state = self.0.state.borrow_mut();
        if state.closed {
            return Ok(());
        }
        let result = match &mut state.sink {
            OutputSink::String(_) => Ok(()),
            OutputSink::File(writer) => writer.flush(),
            OutputSink::Stream(writer) => writer.flush(),
        };
        result.map_err(|e| io_error("flush-output-port", e, self.as_value()))
    }

    /// Flush and release the sink. Closing twice is a no-op.
    pub fn close(&self) -> LResult<()> {
        self.flush()?;
        let mut state = self.0.state.borrow_mut();
        if !state.closed {
            state.closed = true;
            if !matches!(state.sink, OutputSink::String(_)) {
                state.sink = OutputSink::Stream(Box::new(io::sink()));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for OutputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<output-port {}>", self.0.name)
    }
}
