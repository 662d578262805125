//! Statement lexer.
//!
//! Turns statement text into a stream of tokens with byte spans.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
