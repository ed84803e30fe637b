use std::fmt::{Display, Formatter};

/// Failure while scanning an AST dump.
///
/// JSON-level variants carry the 1-based line and column of the input byte
/// the scanner was looking at when it gave up.
#[derive(Debug)]
pub enum ScanError {
    /// The stream ended before the top-level value closed. Also reported
    /// for empty input.
    UnexpectedEndOfInput { line: u64, col: u64 },
    /// A single JSON scalar is larger than the scan window.
    ValueTooLong { line: u64, col: u64 },
    /// Something other than a node object (or a tolerated closer) appeared
    /// where a node was expected. This is also how a key placed after
    /// `inner` surfaces, since the node has already been flushed by then.
    ExpectedNode { line: u64, col: u64 },
    /// A `loc`-shaped key was followed by a non-object value.
    ExpectedObject { line: u64, col: u64 },
    /// A flag key was followed by a non-boolean value.
    ExpectedBool { line: u64, col: u64 },
    /// A scalar-valued key was followed by a structured value.
    ExpectedStringOrNumber { line: u64, col: u64 },
    /// `inner` was followed by a non-array value.
    ExpectedArray { line: u64, col: u64 },
    /// Object keys must be plain ASCII without escape sequences.
    UnsupportedObjectKeyEscapes { line: u64, col: u64 },
    /// A byte that cannot start or continue any JSON token.
    UnexpectedByte { byte: u8, line: u64, col: u64 },
    /// A structurally misplaced token (e.g. `]` closing an object).
    UnexpectedToken { line: u64, col: u64 },
    /// An inherited-location buffer overflowed its fixed capacity.
    StringTooLong { what: &'static str, limit: usize },
    /// The byte producer failed.
    Io(std::io::Error),
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEndOfInput { line, col } => {
                write!(f, "unexpected end of input at {line}:{col}")
            },
            Self::ValueTooLong { line, col } => {
                write!(f, "value at {line}:{col} does not fit in the scan window")
            },
            Self::ExpectedNode { line, col } => write!(f, "expected a node object at {line}:{col}"),
            Self::ExpectedObject { line, col } => write!(f, "expected an object at {line}:{col}"),
            Self::ExpectedBool { line, col } => write!(f, "expected a boolean at {line}:{col}"),
            Self::ExpectedStringOrNumber { line, col } => {
                write!(f, "expected a string or number at {line}:{col}")
            },
            Self::ExpectedArray { line, col } => write!(f, "expected an array at {line}:{col}"),
            Self::UnsupportedObjectKeyEscapes { line, col } => {
                write!(f, "object key at {line}:{col} contains escape sequences")
            },
            Self::UnexpectedByte { byte, line, col } => {
                write!(f, "unexpected byte 0x{byte:02x} at {line}:{col}")
            },
            Self::UnexpectedToken { line, col } => write!(f, "unexpected token at {line}:{col}"),
            Self::StringTooLong { what, limit } => {
                write!(f, "{what} is longer than the {limit}-byte inherit buffer")
            },
            Self::Io(error) => write!(f, "failed to read input: {error}"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScanError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
