//! Token types for the statement lexer.

use std::fmt;

use super::Span;

/// Reserved words of the dialect.
///
/// Only the words the grammar acts on are reserved, plus a handful
/// (`GROUP`, `JOIN`, `OR`, ...) that are recognized so the parser can reject
/// them with a precise message instead of treating them as identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // Statement leaders
    Select,
    Insert,
    Update,
    Delete,

    // Clauses
    From,
    Where,
    Order,
    By,
    Asc,
    Desc,
    Limit,
    Offset,
    Into,
    Values,
    Set,
    As,

    // Predicates
    And,
    Or,
    Not,
    Like,
    Is,
    Null,
    True,
    False,

    // Recognized only to be refused
    Distinct,
    Group,
    Having,
    Join,
    Inner,
    Left,
    In,
    Between,
    Union,
}

impl Keyword {
    /// Looks up a keyword, ignoring ASCII case.
    #[must_use]
    pub fn lookup(word: &str) -> Option<Self> {
        let kw = match word.to_ascii_uppercase().as_str() {
            "SELECT" => Self::Select,
            "INSERT" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "FROM" => Self::From,
            "WHERE" => Self::Where,
            "ORDER" => Self::Order,
            "BY" => Self::By,
            "ASC" => Self::Asc,
            "DESC" => Self::Desc,
            "LIMIT" => Self::Limit,
            "OFFSET" => Self::Offset,
            "INTO" => Self::Into,
            "VALUES" => Self::Values,
            "SET" => Self::Set,
            "AS" => Self::As,
            "AND" => Self::And,
            "OR" => Self::Or,
            "NOT" => Self::Not,
            "LIKE" => Self::Like,
            "IS" => Self::Is,
            "NULL" => Self::Null,
            "TRUE" => Self::True,
            "FALSE" => Self::False,
            "DISTINCT" => Self::Distinct,
            "GROUP" => Self::Group,
            "HAVING" => Self::Having,
            "JOIN" => Self::Join,
            "INNER" => Self::Inner,
            "LEFT" => Self::Left,
            "IN" => Self::In,
            "BETWEEN" => Self::Between,
            "UNION" => Self::Union,
            _ => return None,
        };
        Some(kw)
    }

    /// Canonical upper-case spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Set => "SET",
            Self::As => "AS",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Like => "LIKE",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Distinct => "DISTINCT",
            Self::Group => "GROUP",
            Self::Having => "HAVING",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Union => "UNION",
        }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Integer literal, e.g. `500`.
    Integer(i64),
    /// Float literal, e.g. `12.5`.
    Float(f64),
    /// Single-quoted string literal with `''` escapes resolved.
    String(String),
    /// Bare or quoted identifier.
    Identifier(String),
    /// Reserved word.
    Keyword(Keyword),

    /// `*`
    Star,
    /// `-`
    Minus,
    /// `=`
    Eq,
    /// `!=` or `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,

    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// `?`
    Question,

    /// End of input.
    Eof,
    /// Character sequence the lexer could not understand.
    Error(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Identifier(name) => write!(f, "identifier `{name}`"),
            Self::Keyword(kw) => f.write_str(kw.as_str()),
            Self::Star => f.write_str("`*`"),
            Self::Minus => f.write_str("`-`"),
            Self::Eq => f.write_str("`=`"),
            Self::NotEq => f.write_str("`!=`"),
            Self::Lt => f.write_str("`<`"),
            Self::LtEq => f.write_str("`<=`"),
            Self::Gt => f.write_str("`>`"),
            Self::GtEq => f.write_str("`>=`"),
            Self::LeftParen => f.write_str("`(`"),
            Self::RightParen => f.write_str("`)`"),
            Self::Comma => f.write_str("`,`"),
            Self::Semicolon => f.write_str("`;`"),
            Self::Dot => f.write_str("`.`"),
            Self::Question => f.write_str("`?`"),
            Self::Eof => f.write_str("end of input"),
            Self::Error(msg) => write!(f, "invalid input ({msg})"),
        }
    }
}

/// A token and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was scanned.
    pub kind: TokenKind,
    /// Where it was scanned.
    pub span: Span,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// True for the end-of-input marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword, if this token is one.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}
