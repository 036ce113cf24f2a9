//! Error types for stepper-settings library.
//!
//! Only structural failures are errors. A settings value that parses but breaks a
//! product rule is repaired by the fixer and reported as a warning instead.

use core::fmt;

use crate::variant::Product;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Field or product name carried by an error.
pub type Name = heapless::String<32>;

/// Free-form message carried by an error.
pub type Message = heapless::String<128>;

/// Unified error type for all stepper-settings operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Settings document could not be parsed
    Parse(ParseError),
    /// Current-limit table could not be built
    Table(TableError),
    /// A variant's default current limit is not an entry of its table
    DefaultNotInTable {
        /// Offending product
        product: Product,
        /// Default current limit (mA)
        current_limit: u32,
    },
    /// The variant registry has no room for another product
    RegistryFull(usize),
}

/// Structural settings-document errors, reported before any fix rule runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The document is not valid TOML
    Syntax(Message),
    /// The document has no `product` key
    MissingProduct,
    /// The `product` value names no known product
    UnknownProduct(Name),
    /// A key that the selected product does not have
    UnknownField(Name),
    /// An integer that does not fit the field's storage width
    OutOfRange {
        /// Offending field
        field: Name,
    },
    /// A value of the wrong type or an unrecognised name
    InvalidValue {
        /// Offending field
        field: Name,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    Io(Message),
}

/// Current-limit table construction errors.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// No codes were provided
    Empty,
    /// More codes than a table can hold
    TooManyCodes(usize),
    /// A code produced a lower current than the code before it
    NotMonotonic {
        /// Code whose value dropped
        code: usize,
        /// Value at the previous code (mA)
        previous: u32,
        /// Value at this code (mA)
        value: u32,
    },
    /// The ladder model produced NaN or infinity
    NotFinite {
        /// Offending code
        code: usize,
    },
    /// The ladder model produced a negative current
    Negative {
        /// Offending code
        code: usize,
    },
    /// The selectable code range selects nothing
    EmptySelection,
}

#[cfg(feature = "std")]
impl ParseError {
    pub(crate) fn out_of_range(field: &str) -> Self {
        ParseError::OutOfRange { field: name(field) }
    }

    pub(crate) fn invalid_value(field: &str) -> Self {
        ParseError::InvalidValue { field: name(field) }
    }

    pub(crate) fn unknown_field(field: &str) -> Self {
        ParseError::UnknownField(name(field))
    }
}

/// Truncating conversion used for names in error payloads.
#[cfg(feature = "std")]
pub(crate) fn name(s: &str) -> Name {
    let mut out = Name::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Truncating conversion used for messages in error payloads.
#[cfg(feature = "std")]
pub(crate) fn message(s: &str) -> Message {
    let mut out = Message::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "There was an error reading the settings file: {}", e),
            Error::Table(e) => write!(f, "Current limit table error: {}", e),
            Error::DefaultNotInTable {
                product,
                current_limit,
            } => write!(
                f,
                "The default current limit of the {} ({} mA) is not achievable.",
                product, current_limit
            ),
            Error::RegistryFull(max) => write!(f, "Registry full ({} variants max).", max),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax(msg) => write!(f, "Failed to load document: {}", msg),
            ParseError::MissingProduct => {
                write!(f, "No product was specified in the settings file.")
            }
            ParseError::UnknownProduct(name) => write!(f, "Unrecognized product name '{}'.", name),
            ParseError::UnknownField(name) => write!(f, "Unrecognized key '{}'.", name),
            ParseError::OutOfRange { field } => write!(f, "The {} value is out of range.", field),
            ParseError::InvalidValue { field } => write!(f, "Invalid {} value.", field),
            #[cfg(feature = "std")]
            ParseError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Empty => write!(f, "table has no codes"),
            TableError::TooManyCodes(n) => write!(f, "{} codes exceed the table capacity", n),
            TableError::NotMonotonic { code, previous, value } => write!(
                f,
                "code {} gives {} mA, below {} mA at the previous code",
                code, value, previous
            ),
            TableError::NotFinite { code } => write!(f, "code {} gives a non-finite current", code),
            TableError::Negative { code } => write!(f, "code {} gives a negative current", code),
            TableError::EmptySelection => write!(f, "selectable code range is empty"),
        }
    }
}

// Conversion impls
impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<TableError> for Error {
    fn from(e: TableError) -> Self {
        Error::Table(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

#[cfg(feature = "std")]
impl std::error::Error for TableError {}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_field() {
        let e = ParseError::out_of_range("serial_device_number");
        let mut buf = heapless::String::<128>::new();
        core::fmt::write(&mut buf, format_args!("{}", e)).unwrap();
        assert_eq!(buf.as_str(), "The serial_device_number value is out of range.");
    }

    #[test]
    fn test_name_truncates() {
        let long = "a_very_long_field_name_that_does_not_fit_in_thirty_two";
        assert_eq!(name(long).len(), 32);
    }
}
