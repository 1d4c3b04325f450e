use std::fmt;

use crate::convert::ConversionError;

/// Result type for option processing
pub type Result<T> = std::result::Result<T, Error>;

/// An error that occurred while building an option table or scanning arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An option's text could not be converted to its declared type
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// An option-looking argument that is not in the table
    UnknownOption { option: String },

    /// An option requires a value but none was provided
    MissingValue { name: String },

    /// A value was attached to an option that takes none
    UnexpectedValue { name: String, value: String },

    /// An abbreviated long option matches more than one name
    AmbiguousOption {
        option: String,
        candidates: Vec<String>,
    },

    /// Two descriptors share a short code
    DuplicateShort {
        short: char,
        first: String,
        second: String,
    },

    /// Two descriptors share a long name
    DuplicateName { name: String },

    /// A long name that cannot be spelled on the command line
    InvalidName { name: String },

    /// A short code that cannot be spelled on the command line
    InvalidShort { name: String, short: char },

    /// The scanner reported a dispatch key no descriptor owns
    UnregisteredKey { key: char },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidValue {
                name,
                value,
                expected,
            } => {
                write!(
                    f,
                    "invalid value '{}' for '{}': expected {}",
                    value, name, expected
                )
            }
            Error::UnknownOption { option } => {
                write!(f, "unrecognized option '{}'", option)
            }
            Error::MissingValue { name } => {
                write!(f, "option '{}' requires a value", name)
            }
            Error::UnexpectedValue { name, value } => {
                write!(f, "option '{}' doesn't allow a value (got '{}')", name, value)
            }
            Error::AmbiguousOption { option, candidates } => {
                write!(
                    f,
                    "option '{}' is ambiguous; possibilities: --{}",
                    option,
                    candidates.join(" --")
                )
            }
            Error::DuplicateShort {
                short,
                first,
                second,
            } => {
                write!(
                    f,
                    "short option '-{}' is declared by both '{}' and '{}'",
                    short, first, second
                )
            }
            Error::DuplicateName { name } => {
                write!(f, "option '{}' is declared more than once", name)
            }
            Error::InvalidName { name } => {
                write!(f, "'{}' is not a valid long option name", name)
            }
            Error::InvalidShort { name, short } => {
                write!(f, "'{}' is not a valid short option for '{}'", short, name)
            }
            Error::UnregisteredKey { key } => {
                write!(
                    f,
                    "scanner returned short option '{}' even though it is not defined",
                    key
                )
            }
        }
    }
}

impl std::error::Error for Error {}

impl ConversionError {
    /// Attach the name of the option whose value failed to convert
    pub(crate) fn for_option(self, name: &str) -> Error {
        Error::InvalidValue {
            name: name.to_string(),
            value: self.value,
            expected: self.expected,
        }
    }
}

impl Error {
    /// Returns true if the error was caused by the command line itself
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidValue { .. }
                | Error::UnknownOption { .. }
                | Error::MissingValue { .. }
                | Error::UnexpectedValue { .. }
                | Error::AmbiguousOption { .. }
        )
    }

    /// Returns true if the option table was declared incorrectly
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Error::DuplicateShort { .. }
                | Error::DuplicateName { .. }
                | Error::InvalidName { .. }
                | Error::InvalidShort { .. }
        )
    }

    /// Returns true if the scanner and the option table disagree
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::UnregisteredKey { .. })
    }

    /// Print the error to stderr and exit with status 1
    pub fn exit(&self) -> ! {
        eprintln!("error: {}", self);
        std::process::exit(1);
    }
}
