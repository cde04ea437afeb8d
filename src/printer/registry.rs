//! Custom printer registry
//!
//! Maps a runtime type name (a record type's name, or a native object's
//! `type_name`) to a function that renders values of that type. The
//! printer consults it before its built-in record and native-object rules.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::Mode;
use crate::value::Value;

pub type CustomPrinter = Rc<dyn Fn(&Value, Mode, &mut dyn fmt::Write) -> fmt::Result>;

#[derive(Default, Clone)]
pub struct PrinterRegistry {
    printers: FxHashMap<String, CustomPrinter>,
}

impl PrinterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `printer` for `type_name`, replacing any earlier one.
    pub fn register<F>(&mut self, type_name: &str, printer: F)
    where
        F: Fn(&Value, Mode, &mut dyn fmt::Write) -> fmt::Result + 'static,
    {
        self.printers.insert(type_name.to_string(), Rc::new(printer));
    }

    pub fn unregister(&mut self, type_name: &str) -> bool {
        self.printers.remove(type_name).is_some()
    }

    pub fn lookup(&self, type_name: &str) -> Option<&CustomPrinter> {
        self.printers.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.printers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.printers.is_empty()
    }
}

impl fmt::Debug for PrinterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.printers.keys().collect();
        names.sort();
        f.debug_struct("PrinterRegistry")
            .field("types", &names)
            .finish()
    }
}
