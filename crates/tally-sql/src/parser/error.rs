//! Parse error type.

use thiserror::Error;

use crate::lexer::{Span, TokenKind};

/// A statement the dialect cannot express.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at position {}..{}", span.start, span.end)]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Where in the statement the problem was found.
    pub span: Span,
    /// What the parser was looking for, when that is meaningful.
    pub expected: Option<String>,
    /// The token found instead.
    pub found: Option<TokenKind>,
}

impl ParseError {
    /// Creates an error with just a message.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    /// Creates an "expected X, found Y" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        let expected = expected.into();
        Self {
            message: format!("expected {expected}, found {found}"),
            span,
            expected: Some(expected),
            found: Some(found),
        }
    }

    /// Creates an error for syntax that is valid SQL but outside the dialect.
    #[must_use]
    pub fn unsupported(what: impl AsRef<str>, found: TokenKind, span: Span) -> Self {
        Self {
            message: format!("unsupported syntax: {}", what.as_ref()),
            span,
            expected: None,
            found: Some(found),
        }
    }
}
