//! # cadr - list values, ports and printing for a Scheme runtime
//!
//! The core of a dynamically typed list-processing runtime: the value
//! model and its mutable pairs, the list primitives, the two-mode printer,
//! the batch-parsing port reader, and an inlining pass that turns calls to
//! the basic pair primitives into direct IR operations.
//!
//! ## Quick Start
//!
//! ```
//! use cadr::{display_format, write_format, InputPort, Session, SessionConfig};
//!
//! let mut session = Session::with_ports(
//!     SessionConfig::new(),
//!     InputPort::from_string("in", "(a \"b\" . c) 'd"),
//!     cadr::OutputPort::string_port("out"),
//!     cadr::OutputPort::string_port("err"),
//! );
//!
//! let first = session.read().unwrap();
//! assert_eq!(write_format(&first), "(a \"b\" . c)");
//! assert_eq!(display_format(&first), "(a b . c)");
//! assert_eq!(write_format(&session.read().unwrap()), "'d");
//! assert!(session.read().unwrap().is_eof());
//! ```
//!
//! ## Architecture
//!
//! 1. **Values** - `Value`, a closed enum; pairs are `Rc` cells with
//!    mutable slots
//! 2. **Lists** - `list` module: traversal, construction, destructive
//!    reverse, append with a shared tail
//! 3. **Printer** - `display` and `write` renderings over one traversal
//! 4. **Ports** - a `Session` owns the read cache and current ports
//! 5. **Compiler** - IR lowering, primitive inlining and evaluation

pub mod compiler;
pub mod error;
pub mod list;
pub mod port;
pub mod primitives;
pub mod printer;
pub mod reader;
pub mod session;
pub mod symbol;
pub mod value;

pub use error::{ErrorKind, LError, LResult};
pub use port::{InputPort, OutputPort, PortId};
pub use primitives::{register_primitives, PrimitiveTable};
pub use printer::{display_format, write_format, Mode, PrinterRegistry};
pub use reader::{read_str, DatumParser, Parser};
pub use session::{Session, SessionConfig};
pub use symbol::SymbolTable;
pub use value::{cons, Value};
