//! SQL syntax errors.

use std::fmt;

/// A byte range in the source SQL string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset from the start of the input.
    pub start: usize,
    /// Byte offset of the end of the span (exclusive).
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-length span at `pos`.
    pub fn at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// Syntax error with source position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::new(format!("expected {expected}, found {found}"), span)
    }

    pub fn unexpected_eof(expected: &str, pos: usize) -> Self {
        Self::new(
            format!("unexpected end of input, expected {expected}"),
            Span::at(pos),
        )
    }

    /// 1-based character position for error reporting.
    pub fn position(&self) -> usize {
        self.span.start + 1
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.message, self.position())
    }
}

impl std::error::Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_one_based() {
        let err = SyntaxError::new("test", Span::at(10));
        assert_eq!(err.position(), 11);
    }

    #[test]
    fn test_display() {
        let err = SyntaxError::unexpected_token("FROM", "WHERE", Span::at(5));
        assert_eq!(err.to_string(), "expected FROM, found WHERE at position 6");
    }
}
