//! Display and Debug implementations for values
//!
//! `Display` is the human-oriented `display` rendering and `Debug` is the
//! machine-readable `write` rendering. Both go through the canonical
//! printer so that `format!` and the port-level operations agree.

use crate::printer::{Mode, Printer};
use crate::value::Value;
use std::fmt;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(Mode::Display).print(self, f)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(Mode::Write).print(self, f)
    }
}
