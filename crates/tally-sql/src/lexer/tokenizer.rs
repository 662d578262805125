//! Hand-written scanner producing [`Token`]s.

use super::{Keyword, Span, Token, TokenKind};

/// Scans a statement into tokens on demand.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte offset.
    pos: usize,
    /// Offset where the token being scanned began.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            self.bump_while(char::is_whitespace);
            match (self.peek(), self.peek_second()) {
                (Some('-'), Some('-')) => self.bump_while(|c| c != '\n'),
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    match self.input[self.pos..].find("*/") {
                        Some(off) => self.pos += off + 2,
                        None => self.pos = self.input.len(),
                    }
                }
                _ => break,
            }
        }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error(&self, msg: impl Into<String>) -> Token {
        self.token(TokenKind::Error(msg.into()))
    }

    fn scan_word(&mut self) -> Token {
        self.bump_while(|c| c.is_alphanumeric() || c == '_');
        let word = &self.input[self.start..self.pos];
        match Keyword::lookup(word) {
            Some(kw) => self.token(TokenKind::Keyword(kw)),
            None => self.token(TokenKind::Identifier(word.to_string())),
        }
    }

    /// Scans a quoted run closed by `quote`, where a doubled quote stands for
    /// one literal quote. Returns `None` if the input ends first.
    fn scan_quoted(&mut self, quote: char) -> Option<String> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump()? {
                c if c == quote && self.peek() == Some(quote) => {
                    self.bump();
                    text.push(quote);
                }
                c if c == quote => return Some(text),
                c => text.push(c),
            }
        }
    }

    fn scan_number(&mut self) -> Token {
        let mut is_float = false;
        self.bump_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.bump_while(|c| c.is_ascii_digit());
        }

        let text = &self.input[self.start..self.pos];
        if is_float {
            match text.parse::<f64>() {
                Ok(x) => self.token(TokenKind::Float(x)),
                Err(e) => self.error(format!("invalid float: {e}")),
            }
        } else {
            match text.parse::<i64>() {
                Ok(n) => self.token(TokenKind::Integer(n)),
                Err(e) => self.error(format!("invalid integer: {e}")),
            }
        }
    }

    /// Scans the next token. Returns [`TokenKind::Eof`] forever once the
    /// input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof);
        };

        match c {
            '\'' => match self.scan_quoted('\'') {
                Some(text) => self.token(TokenKind::String(text)),
                None => self.error("unterminated string literal"),
            },
            '"' | '`' => match self.scan_quoted(c) {
                Some(name) => self.token(TokenKind::Identifier(name)),
                None => self.error("unterminated quoted identifier"),
            },
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            _ => {
                self.bump();
                let kind = match c {
                    '(' => TokenKind::LeftParen,
                    ')' => TokenKind::RightParen,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    '.' => TokenKind::Dot,
                    '?' => TokenKind::Question,
                    '*' => TokenKind::Star,
                    '-' => TokenKind::Minus,
                    '=' => TokenKind::Eq,
                    '!' if self.peek() == Some('=') => {
                        self.bump();
                        TokenKind::NotEq
                    }
                    '<' => match self.peek() {
                        Some('=') => {
                            self.bump();
                            TokenKind::LtEq
                        }
                        Some('>') => {
                            self.bump();
                            TokenKind::NotEq
                        }
                        _ => TokenKind::Lt,
                    },
                    '>' if self.peek() == Some('=') => {
                        self.bump();
                        TokenKind::GtEq
                    }
                    '>' => TokenKind::Gt,
                    other => TokenKind::Error(format!("unexpected character `{other}`")),
                };
                self.token(kind)
            }
        }
    }

    /// Scans the whole input, including the trailing [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds(" \n\t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("SELECT -- note\n* /* all */ FROM goals"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Star,
                TokenKind::Keyword(Keyword::From),
                ident("goals"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        assert_eq!(kinds("DELETE /* oops"), vec![
            TokenKind::Keyword(Keyword::Delete),
            TokenKind::Eof
        ]);
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            kinds("= != <> < <= > >="),
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operator_without_spaces() {
        assert_eq!(
            kinds("date>=?"),
            vec![ident("date"), TokenKind::GtEq, TokenKind::Question, TokenKind::Eof]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds("42 12.5 1e3 'it''s'"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Float(12.5),
                TokenKind::Float(1000.0),
                TokenKind::String("it's".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(
            kinds("\"limit\" `user id`"),
            vec![ident("limit"), ident("user id"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = Lexer::new("'abc").tokenize();
        assert!(matches!(&tokens[0].kind, TokenKind::Error(m) if m.contains("unterminated")));
    }

    #[test]
    fn test_bang_alone_is_an_error() {
        assert!(matches!(&kinds("a ! b")[1], TokenKind::Error(_)));
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::new("UPDATE goals").tokenize();
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 12));
        assert_eq!(tokens[2].span, Span::at(12));
    }
}
