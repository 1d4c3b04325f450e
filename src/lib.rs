mod convert;
mod error;
mod parser;
mod scanner;

pub use convert::{ConversionError, OptValue};
pub use error::{Error, Result};
pub use parser::{OptionTable, TableEntry, process_options};
pub use scanner::Cursor;
pub use stoml::{Table, Value};

use std::fmt;

/// Whether an option takes a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasArg {
    /// Never takes a value (`--enable`)
    No,
    /// Takes a value only when attached (`--level=3`, `-l3`)
    Optional,
    /// Always takes a value, attached or as the next argument
    Required,
}

/// Declaration and parsed state of a single option
#[derive(Debug, Clone, PartialEq)]
pub struct Opt<T> {
    /// Long spelling (e.g., "start" for --start)
    pub name: String,
    /// Short spelling (e.g., 's' for -s)
    pub short: char,
    /// Whether the option takes a value
    pub has_arg: HasArg,
    /// How many times the option was matched
    pub seen: usize,
    /// The value from the latest match, or the initial value
    pub value: T,
}

impl<T: OptValue> Opt<T> {
    /// Create a new option holding `T::default()`
    pub fn new(name: impl Into<String>, short: char, has_arg: HasArg) -> Self {
        Self {
            name: name.into(),
            short,
            has_arg,
            seen: 0,
            value: T::default(),
        }
    }

    /// Set whether the option takes a value
    pub fn has_arg(mut self, has_arg: HasArg) -> Self {
        self.has_arg = has_arg;
        self
    }

    /// Set the value held until the option is matched
    pub fn default(mut self, value: impl Into<T>) -> Self {
        self.value = value.into();
        self
    }

    /// Convert `text` and record a match.
    ///
    /// Nothing is changed if the conversion fails.
    pub fn apply(&mut self, text: Option<&str>) -> Result<()> {
        let value = T::parse(text).map_err(|e| e.for_option(&self.name))?;
        self.seen += 1;
        self.value = value;
        Ok(())
    }
}

impl<T: fmt::Display> fmt::Display for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} seen: {} value: {}", self.name, self.seen, self.value)
    }
}

/// An option of any supported type
#[derive(Debug, Clone, PartialEq)]
pub enum AnyOpt {
    Flag(Opt<bool>),
    Int(Opt<i64>),
    Float(Opt<f64>),
    Str(Opt<String>),
}

macro_rules! each_opt {
    ($any:expr, $opt:ident => $body:expr) => {
        match $any {
            AnyOpt::Flag($opt) => $body,
            AnyOpt::Int($opt) => $body,
            AnyOpt::Float($opt) => $body,
            AnyOpt::Str($opt) => $body,
        }
    };
}

impl AnyOpt {
    pub fn name(&self) -> &str {
        each_opt!(self, opt => opt.name.as_str())
    }

    pub fn short(&self) -> char {
        each_opt!(self, opt => opt.short)
    }

    pub fn has_arg(&self) -> HasArg {
        each_opt!(self, opt => opt.has_arg)
    }

    pub fn seen(&self) -> usize {
        each_opt!(self, opt => opt.seen)
    }

    /// Name of the value type
    pub fn kind(&self) -> &'static str {
        match self {
            AnyOpt::Flag(_) => "flag",
            AnyOpt::Int(_) => "integer",
            AnyOpt::Float(_) => "decimal",
            AnyOpt::Str(_) => "string",
        }
    }

    /// The current value in TOML form
    pub fn to_value(&self) -> Value {
        each_opt!(self, opt => opt.value.to_value())
    }

    /// Convert `text` to this option's type and record a match
    pub fn apply(&mut self, text: Option<&str>) -> Result<()> {
        each_opt!(self, opt => opt.apply(text))
    }

    /// The typed option, if it holds a `T`
    pub fn get<T: OptValue>(&self) -> Option<&Opt<T>> {
        T::peek(self)
    }

    /// The typed option, if it holds a `T`
    pub fn get_mut<T: OptValue>(&mut self) -> Option<&mut Opt<T>> {
        T::peek_mut(self)
    }
}

impl fmt::Display for AnyOpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each_opt!(self, opt => fmt::Display::fmt(opt, f))
    }
}

impl<T: OptValue> From<Opt<T>> for AnyOpt {
    fn from(opt: Opt<T>) -> Self {
        T::wrap(opt)
    }
}

/// Why [`process_options`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanResult {
    /// All options were consumed; holds the index of the first residual argument
    NoMoreArgs(usize),
    /// Scanning was paused; holds the index scanning would resume at.
    /// No option triggers this yet.
    Paused(usize),
}

impl ScanResult {
    /// Index of the first residual argument
    pub fn residual(&self) -> usize {
        match self {
            ScanResult::NoMoreArgs(index) | ScanResult::Paused(index) => *index,
        }
    }

    /// Returns true if there are no more options to scan
    pub fn is_finished(&self) -> bool {
        matches!(self, ScanResult::NoMoreArgs(_))
    }

    /// The residual arguments of `args`
    pub fn residual_args<'a, S>(&self, args: &'a [S]) -> &'a [S] {
        args.get(self.residual()..).unwrap_or(&[])
    }
}

/// Find a typed option by name
pub fn find<'a, T: OptValue>(opts: &'a [AnyOpt], name: &str) -> Option<&'a Opt<T>> {
    opts.iter().find(|o| o.name() == name).and_then(T::peek)
}

/// Export options as a table of `{ seen, value }` tables keyed by name
pub fn to_table(opts: &[AnyOpt]) -> Table {
    let mut table = Table::new();
    for opt in opts {
        let mut entry = Table::new();
        entry.insert("seen".to_string(), Value::Integer(opt.seen() as i64));
        entry.insert("value".to_string(), opt.to_value());
        table.insert(opt.name().to_string(), Value::Table(entry));
    }
    table
}

/// Convenience function to create a flag (no value)
#[inline]
pub fn flag(name: impl Into<String>, short: char) -> Opt<bool> {
    Opt::new(name, short, HasArg::No)
}

/// Convenience function to create an integer option (value required)
#[inline]
pub fn int(name: impl Into<String>, short: char) -> Opt<i64> {
    Opt::new(name, short, HasArg::Required)
}

/// Convenience function to create a decimal option (value required)
#[inline]
pub fn float(name: impl Into<String>, short: char) -> Opt<f64> {
    Opt::new(name, short, HasArg::Required)
}

/// Convenience function to create a string option (value required)
#[inline]
pub fn string(name: impl Into<String>, short: char) -> Opt<String> {
    Opt::new(name, short, HasArg::Required)
}
