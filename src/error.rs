use std::fmt;

/// A source position, tracked by the lexer as it scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A fatal parse failure. No partial tree is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    #[error("unexpected token at {location}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        location: Location,
    },

    #[error("nesting depth exceeds the maximum of {max} at {location}")]
    DepthExceeded { max: usize, location: Location },
}
