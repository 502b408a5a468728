use std::{
    fmt::{Debug, Display},
    str::Utf8Error,
};

/// Errors that may be encountered while decoding a CBOR or MessagePack byte stream.
///
/// Every variant is a stable identifier per the decoder's error taxonomy: once latched, the
/// parser halts and the same [`ParseError`] is returned from every further call until
/// `reset()`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// lower five bits of an item header were 28..30 (reserved)
    InvalidInfo,
    /// the byte source ran out of data before an item, head argument or string chunk was complete
    UnexpectedEof,
    /// a text string (or indefinite-length fragment thereof) contained invalid UTF-8 data
    InvalidUtf8Text(Utf8Error),
    /// a declared length or stringref index exceeded the platform's index width
    NumberTooLarge,
    /// a `tag 25` stringref index pointed past the end of the in-scope table
    StringrefTooLarge,
    /// a `tag 4` decimal-fraction array was malformed (wrong arity or element kind)
    InvalidDecimal,
    /// a `tag 5` bigfloat array was malformed (wrong arity or element kind)
    InvalidBigfloat,
    /// an indefinite-length (byte or text) string fragment had a major type other than its parent's
    InvalidStringFragment,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidInfo => write!(f, "invalid item header"),
            ErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            ErrorKind::InvalidUtf8Text(e) => write!(f, "invalid UTF-8 in text string: {}", e),
            ErrorKind::NumberTooLarge => write!(f, "length or index too large for this platform"),
            ErrorKind::StringrefTooLarge => write!(f, "stringref index past end of table"),
            ErrorKind::InvalidDecimal => write!(f, "malformed decimal fraction (tag 4)"),
            ErrorKind::InvalidBigfloat => write!(f, "malformed bigfloat (tag 5)"),
            ErrorKind::InvalidStringFragment => {
                write!(f, "indefinite-length string fragment of wrong major type")
            }
        }
    }
}

/// A latched decode error, carrying the byte offset at which it was detected.
///
/// Per the decoder's failure semantics, line is always `0` (the formats are not
/// line-oriented); `column` is the source byte position, matching the throwing API's
/// `line()`/`column()` accessors.
#[derive(Clone, PartialEq, Eq)]
pub struct ParseError {
    offset: u64,
    kind: ErrorKind,
}

impl ParseError {
    pub(crate) fn new(offset: u64, kind: ErrorKind) -> Self {
        Self { offset, kind }
    }

    /// The byte offset within the source at which the error was detected.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Always `0`: neither CBOR nor MessagePack is line-oriented.
    pub fn line(&self) -> u64 {
        0
    }

    /// The source byte position, identical to [`ParseError::offset`].
    pub fn column(&self) -> u64 {
        self.offset
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind.clone()
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at byte offset {}", self.kind, self.offset)
    }
}

impl std::error::Error for ParseError {}

impl Debug for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offset() {
        let e = ParseError::new(42, ErrorKind::UnexpectedEof);
        assert_eq!(e.to_string(), "unexpected end of input at byte offset 42");
        assert_eq!(e.line(), 0);
        assert_eq!(e.column(), 42);
    }
}
