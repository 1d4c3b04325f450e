use std::fmt;

use stoml::Value;

use crate::{AnyOpt, Opt};

/// A value that could not be converted to an option's type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    /// The text as it appeared on the command line
    pub value: String,
    /// What the option's type expects, e.g. "an integer"
    pub expected: &'static str,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value '{}': expected {}", self.value, self.expected)
    }
}

impl std::error::Error for ConversionError {}

/// A type an option can hold.
///
/// The set of implementors is closed: `bool`, `i64`, `f64` and `String`,
/// one per [`AnyOpt`] variant.
pub trait OptValue: Sized + Clone + Default + fmt::Display {
    /// Description of accepted text, used in error messages
    const EXPECTED: &'static str;

    /// The value used when the option is given without text
    fn absent() -> Self;

    /// Convert option text to a value
    fn from_text(text: &str) -> Result<Self, ConversionError>;

    /// Convert an optional token, falling back to [`OptValue::absent`]
    fn parse(token: Option<&str>) -> Result<Self, ConversionError> {
        match token {
            Some(text) => Self::from_text(text),
            None => Ok(Self::absent()),
        }
    }

    /// The value in TOML form
    fn to_value(&self) -> Value;

    fn wrap(opt: Opt<Self>) -> AnyOpt;

    fn peek(any: &AnyOpt) -> Option<&Opt<Self>>;

    fn peek_mut(any: &mut AnyOpt) -> Option<&mut Opt<Self>>;
}

macro_rules! variant_access {
    ($variant:ident) => {
        fn wrap(opt: Opt<Self>) -> AnyOpt {
            AnyOpt::$variant(opt)
        }

        fn peek(any: &AnyOpt) -> Option<&Opt<Self>> {
            match any {
                AnyOpt::$variant(opt) => Some(opt),
                _ => None,
            }
        }

        fn peek_mut(any: &mut AnyOpt) -> Option<&mut Opt<Self>> {
            match any {
                AnyOpt::$variant(opt) => Some(opt),
                _ => None,
            }
        }
    };
}

/// Flags only record presence, any attached text is ignored.
impl OptValue for bool {
    const EXPECTED: &'static str = "nothing";

    fn absent() -> Self {
        true
    }

    fn from_text(_text: &str) -> Result<Self, ConversionError> {
        Ok(true)
    }

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    variant_access!(Flag);
}

impl OptValue for i64 {
    const EXPECTED: &'static str = "an integer";

    fn absent() -> Self {
        0
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        text.parse::<i64>().map_err(|_| ConversionError {
            value: text.to_string(),
            expected: Self::EXPECTED,
        })
    }

    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    variant_access!(Int);
}

impl OptValue for f64 {
    const EXPECTED: &'static str = "a number";

    fn absent() -> Self {
        0.0
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        text.parse::<f64>().map_err(|_| ConversionError {
            value: text.to_string(),
            expected: Self::EXPECTED,
        })
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    variant_access!(Float);
}

impl OptValue for String {
    const EXPECTED: &'static str = "a string";

    fn absent() -> Self {
        String::new()
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        Ok(text.to_string())
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    variant_access!(Str);
}
