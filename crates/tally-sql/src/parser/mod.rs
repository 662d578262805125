//! Statement parser.
//!
//! A hand-written recursive descent parser producing statement descriptors.

mod error;
mod parser;

pub use error::ParseError;
pub use parser::Parser;
