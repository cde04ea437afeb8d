//! Canonical value printer
//!
//! One traversal, two modes. `Display` is the human-oriented rendering
//! (strings and characters raw); `Write` is the machine-readable one
//! (strings quoted and escaped, characters as `#\` literals). Everything
//! else renders the same in both modes, recursing in the current mode.
//!
//! The printer is total over non-circular values. A circular `rest` chain
//! makes it loop forever.

mod chars;
mod registry;

use std::fmt;
use std::rc::Rc;

pub use chars::{char_from_name, char_name};
pub use registry::{CustomPrinter, PrinterRegistry};

use crate::value::{Condition, Hashtable, NativeObject, Pair, Port, Record, Value};

/// Rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Display,
    Write,
}

/// Value printer, optionally backed by a registry of custom printers.
#[derive(Clone, Copy)]
pub struct Printer<'a> {
    mode: Mode,
    registry: Option<&'a PrinterRegistry>,
}

impl Printer<'static> {
    pub fn new(mode: Mode) -> Self {
        Printer {
            mode,
            registry: None,
        }
    }
}

impl<'a> Printer<'a> {
    pub fn with_registry(mode: Mode, registry: &'a PrinterRegistry) -> Self {
        Printer {
            mode,
            registry: Some(registry),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Render to a fresh string.
    pub fn render(&self, value: &Value) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.print(value, &mut out);
        out
    }

    pub fn print(&self, value: &Value, out: &mut dyn fmt::Write) -> fmt::Result {
        match value {
            Value::Nil => out.write_str("()"),
            Value::Bool(true) => out.write_str("#t"),
            Value::Bool(false) => out.write_str("#f"),
            Value::Int(_) | Value::Float(_) => {
                out.write_str(&number_to_string(value).unwrap_or_default())
            }
            Value::String(s) => self.print_string(s, out),
            Value::Char(c) => self.print_char(*c, out),
            Value::Symbol(sym) => out.write_str(sym.name()),
            Value::Pair(pair) => self.print_pair(pair, out),
            Value::Vector(elements) => {
                out.write_str("#(")?;
                self.print_sequence(elements.borrow().iter(), out)?;
                out.write_char(')')
            }
            Value::Bytevector(bytes) => {
                out.write_str("#vu8(")?;
                for (i, byte) in bytes.borrow().iter().enumerate() {
                    if i > 0 {
                        out.write_char(' ')?;
                    }
                    write!(out, "{}", byte)?;
                }
                out.write_char(')')
            }
            Value::Procedure(procedure) => write!(out, "#<procedure {}>", procedure.name),
            Value::Port(Port::Input(port)) => write!(out, "#<input-port {}>", port.name()),
            Value::Port(Port::Output(port)) => write!(out, "#<output-port {}>", port.name()),
            Value::Record(record) => self.print_record(value, record, out),
            Value::Condition(condition) => self.print_condition(condition, out),
            Value::Hashtable(table) => self.print_hashtable(&table.borrow(), out),
            Value::Eof => out.write_str("#<eof>"),
            Value::Unspecified => out.write_str("#<unspecified>"),
            Value::MultipleValues(values) => {
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        out.write_char('\n')?;
                    }
                    self.print(v, out)?;
                }
                Ok(())
            }
            Value::Native(object) => self.print_native(value, object.as_ref(), out),
        }
    }

    fn print_string(&self, s: &str, out: &mut dyn fmt::Write) -> fmt::Result {
        if self.mode == Mode::Display {
            return out.write_str(s);
        }
        out.write_char('"')?;
        for c in s.chars() {
            match c {
                '\\' => out.write_str("\\\\")?,
                '"' => out.write_str("\\\"")?,
                '\n' => out.write_str("\\n")?,
                '\r' => out.write_str("\\r")?,
                '\t' => out.write_str("\\t")?,
                c => out.write_char(c)?,
            }
        }
        out.write_char('"')
    }

    fn print_char(&self, c: char, out: &mut dyn fmt::Write) -> fmt::Result {
        if self.mode == Mode::Display {
            return out.write_char(c);
        }
        match char_name(c) {
            Some(name) => write!(out, "#\\{}", name),
            None => write!(out, "#\\{}", c),
        }
    }

    fn print_pair(&self, pair: &Rc<Pair>, out: &mut dyn fmt::Write) -> fmt::Result {
        if let Some((prefix, datum)) = abbreviation(pair) {
            out.write_str(prefix)?;
            return self.print(&datum, out);
        }

        out.write_char('(')?;
        let mut current = pair.clone();
        loop {
            self.print(&current.first(), out)?;
            match current.rest() {
                Value::Nil => break,
                Value::Pair(next) => {
                    out.write_char(' ')?;
                    current = next;
                }
                tail => {
                    out.write_str(" . ")?;
                    self.print(&tail, out)?;
                    break;
                }
            }
        }
        out.write_char(')')
    }

    fn print_sequence<'v>(
        &self,
        values: impl Iterator<Item = &'v Value>,
        out: &mut dyn fmt::Write,
    ) -> fmt::Result {
        for (i, v) in values.enumerate() {
            if i > 0 {
                out.write_char(' ')?;
            }
            self.print(v, out)?;
        }
        Ok(())
    }

    fn print_record(&self, value: &Value, record: &Record, out: &mut dyn fmt::Write) -> fmt::Result {
        if let Some(custom) = self.custom_printer(record.type_name()) {
            return custom(value, self.mode, out);
        }
        write!(out, "#[{}", record.type_name())?;
        for field in record.fields().iter() {
            out.write_char(' ')?;
            self.print(field, out)?;
        }
        out.write_char(']')
    }

    fn print_condition(&self, condition: &Condition, out: &mut dyn fmt::Write) -> fmt::Result {
        match condition {
            Condition::Simple {
                kind,
                who,
                message,
                irritants,
            } => {
                let writer = Printer {
                    mode: Mode::Write,
                    registry: self.registry,
                };
                write!(out, "#<condition {} {} ", kind, who)?;
                writer.print_string(message, out)?;
                for irritant in irritants {
                    out.write_char(' ')?;
                    writer.print(irritant, out)?;
                }
                out.write_char('>')
            }
            Condition::Compound(parts) => {
                out.write_char('<')?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        out.write_char(' ')?;
                    }
                    self.print_condition(part, out)?;
                }
                out.write_char('>')
            }
        }
    }

    fn print_hashtable(&self, table: &Hashtable, out: &mut dyn fmt::Write) -> fmt::Result {
        if table.is_empty() {
            return out.write_str("#[hashtable]");
        }
        let rows: Vec<(String, String)> = table
            .iter()
            .map(|(k, v)| (self.render(k), self.render(v)))
            .collect();
        let key_width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);
        for (i, (k, v)) in rows.iter().enumerate() {
            if i > 0 {
                out.write_char('\n')?;
            }
            write!(
                out,
                "[{:<kw$} => {:<vw$}]",
                k,
                v,
                kw = key_width,
                vw = value_width
            )?;
        }
        Ok(())
    }

    fn print_native(
        &self,
        value: &Value,
        object: &dyn NativeObject,
        out: &mut dyn fmt::Write,
    ) -> fmt::Result {
        if let Some(custom) = self.custom_printer(object.type_name()) {
            return custom(value, self.mode, out);
        }
        write!(out, "{}", object)
    }

    fn custom_printer(&self, type_name: &str) -> Option<&CustomPrinter> {
        self.registry.and_then(|r| r.lookup(type_name))
    }
}

/// Prefix for a two-element list headed by a quotation marker.
fn abbreviation(pair: &Pair) -> Option<(&'static str, Value)> {
    let prefix = match pair.first() {
        Value::Symbol(sym) => match sym.name() {
            "quote" => "'",
            "quasiquote" => "`",
            "unquote" => ",",
            "unquote-splicing" => ",@",
            _ => return None,
        },
        _ => return None,
    };
    match &*pair.rest_ref() {
        Value::Pair(second) if second.rest_ref().is_nil() => Some((prefix, second.first())),
        _ => None,
    }
}

/// Number text. `None` for values that are not numbers.
pub fn number_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Int(n) => Some(n.to_string()),
        Value::Float(f) => Some(format_float(*f)),
        _ => None,
    }
}

// Integral floats always keep a decimal point, so the text never reads
// back as an integer. Past 1e16 the exponent form stays short.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "+nan.0".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "+inf.0" } else { "-inf.0" };
        text.to_string()
    } else if f.fract() != 0.0 {
        format!("{}", f)
    } else if f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        let text = format!("{:e}", f);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !mantissa.contains('.') => {
                format!("{}.0e{}", mantissa, exponent)
            }
            _ => text,
        }
    }
}

pub fn display_format(value: &Value) -> String {
    Printer::new(Mode::Display).render(value)
}

pub fn write_format(value: &Value) -> String {
    Printer::new(Mode::Write).render(value)
}

pub fn display_format_with(value: &Value, registry: &PrinterRegistry) -> String {
    Printer::with_registry(Mode::Display, registry).render(value)
}

pub fn write_format_with(value: &Value, registry: &PrinterRegistry) -> String {
    Printer::with_registry(Mode::Write, registry).render(value)
}
