//! Error types.

use std::error;
use std::fmt;

/// Why the path data parser stopped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ErrorKind {
    /// The data ended in the middle of a command's arguments.
    UnexpectedEof,

    /// A byte that cannot start the number or flag that was expected.
    UnexpectedByte(u8),

    /// Coordinates were found, but there is no previous command to repeat.
    NoCommand,
}

/// Position and cause of a parse failure.
///
/// Everything before `position` was parsed successfully; the commands it produced
/// are kept by the [`PathBuilder`](crate::PathBuilder).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParseError {
    /// Byte offset into the path data.
    pub position: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    pub(crate) fn new(position: usize, kind: ErrorKind) -> ParseError {
        ParseError { position, kind }
    }
}

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self.kind {
            ErrorKind::UnexpectedEof => "unexpected end of data".to_string(),
            ErrorKind::UnexpectedByte(b) if b.is_ascii_graphic() => {
                format!("unexpected character '{}'", char::from(b))
            }
            ErrorKind::UnexpectedByte(b) => format!("unexpected byte 0x{b:02x}"),
            ErrorKind::NoCommand => "coordinates without a command".to_string(),
        };
        write!(f, "error at position {}: {}", self.position, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_errors() {
        assert_eq!(
            ParseError::new(4, ErrorKind::UnexpectedEof).to_string(),
            "error at position 4: unexpected end of data"
        );
        assert_eq!(
            ParseError::new(2, ErrorKind::UnexpectedByte(b'x')).to_string(),
            "error at position 2: unexpected character 'x'"
        );
        assert_eq!(
            ParseError::new(2, ErrorKind::UnexpectedByte(0xc3)).to_string(),
            "error at position 2: unexpected byte 0xc3"
        );
        assert_eq!(
            ParseError::new(0, ErrorKind::NoCommand).to_string(),
            "error at position 0: coordinates without a command"
        );
    }
}
