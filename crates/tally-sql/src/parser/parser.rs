//! Recursive descent parser for the four supported statement shapes.

use super::error::ParseError;
use crate::ast::{
    Assignment, DeleteStatement, Filter, FilterOp, InsertStatement, Operand, OrderDirection,
    Ordering, Projection, RowBound, SelectStatement, Statement, StatementKind, UpdateStatement,
};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};
use crate::value::SqlValue;

/// Statement parser.
///
/// Grammar (keywords case-insensitive, identifiers lower-cased):
///
/// ```text
/// statement  := select | insert | update | delete [";"]
/// select     := SELECT ("*" | ident ("," ident)*) FROM ident
///               [WHERE predicate] [ORDER BY ident [ASC|DESC]]
///               [LIMIT bound] [OFFSET bound]
/// insert     := INSERT INTO ident "(" ident ("," ident)* ")"
///               VALUES "(" operand ("," operand)* ")"
/// update     := UPDATE ident SET ident "=" operand ("," ident "=" operand)*
///               WHERE predicate
/// delete     := DELETE FROM ident WHERE predicate
/// predicate  := comparison (AND comparison)*
/// comparison := ident IS [NOT] NULL
///             | ident ("!=" | "<>" | LIKE | ">=" | "<=" | ">" | "<" | "=") operand
/// operand    := "?" | string | ["-"] number | TRUE | FALSE | NULL
/// bound      := "?" | integer
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// Placeholders seen so far; the next `?` gets this position.
    param_counter: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            param_counter: 0,
        }
    }

    /// Returns the statement kind named by the first token of `sql`, or
    /// `None` when it does not start with SELECT, INSERT, UPDATE or DELETE.
    #[must_use]
    pub fn classify(sql: &str) -> Option<StatementKind> {
        match Lexer::new(sql).next_token().as_keyword()? {
            Keyword::Select => Some(StatementKind::Select),
            Keyword::Insert => Some(StatementKind::Insert),
            Keyword::Update => Some(StatementKind::Update),
            Keyword::Delete => Some(StatementKind::Delete),
            _ => None,
        }
    }

    /// Number of `?` placeholders consumed so far.
    #[must_use]
    pub const fn param_count(&self) -> usize {
        self.param_counter
    }

    /// Parses exactly one statement, optionally followed by `;`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text is malformed or uses syntax
    /// outside the dialect.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let statement = match self.current.as_keyword() {
            Some(Keyword::Select) => Statement::Select(self.parse_select()?),
            Some(Keyword::Insert) => Statement::Insert(self.parse_insert()?),
            Some(Keyword::Update) => Statement::Update(self.parse_update()?),
            Some(Keyword::Delete) => Statement::Delete(self.parse_delete()?),
            _ => return Err(self.unexpected("SELECT, INSERT, UPDATE, or DELETE")),
        };
        self.finish()?;
        Ok(statement)
    }

    fn parse_select(&mut self) -> Result<SelectStatement, ParseError> {
        self.expect_keyword(Keyword::Select)?;
        if self.check_keyword(Keyword::Distinct) {
            return Err(self.unsupported("DISTINCT"));
        }

        let projection = if self.check(&TokenKind::Star) {
            self.advance();
            Projection::All
        } else {
            let mut cols = vec![self.parse_column()?];
            while self.eat(&TokenKind::Comma) {
                cols.push(self.parse_column()?);
            }
            Projection::Columns(cols)
        };

        self.expect_keyword(Keyword::From)?;
        let table = self.parse_table()?;

        let predicate = if self.eat_keyword(Keyword::Where) {
            self.parse_predicate()?
        } else {
            vec![]
        };

        if self.check_keyword(Keyword::Group) || self.check_keyword(Keyword::Having) {
            return Err(self.unsupported("GROUP BY / HAVING"));
        }

        let ordering = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            let column = self.parse_column()?;
            let direction = if self.eat_keyword(Keyword::Desc) {
                OrderDirection::Desc
            } else {
                self.eat_keyword(Keyword::Asc);
                OrderDirection::Asc
            };
            if self.check(&TokenKind::Comma) {
                return Err(self.unsupported("more than one ORDER BY column"));
            }
            Some(Ordering { column, direction })
        } else {
            None
        };

        let limit = if self.eat_keyword(Keyword::Limit) {
            Some(self.parse_row_bound()?)
        } else {
            None
        };
        let offset = if self.eat_keyword(Keyword::Offset) {
            Some(self.parse_row_bound()?)
        } else {
            None
        };

        Ok(SelectStatement {
            table,
            projection,
            predicate,
            ordering,
            limit,
            offset,
        })
    }

    fn parse_insert(&mut self) -> Result<InsertStatement, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_table()?;

        self.expect(&TokenKind::LeftParen)?;
        let mut columns = vec![self.parse_column()?];
        while self.eat(&TokenKind::Comma) {
            columns.push(self.parse_column()?);
        }
        self.expect(&TokenKind::RightParen)?;

        if self.check_keyword(Keyword::Select) {
            return Err(self.unsupported("INSERT ... SELECT"));
        }
        self.expect_keyword(Keyword::Values)?;
        self.expect(&TokenKind::LeftParen)?;
        let values_span = self.current.span;
        let mut values = vec![self.parse_operand()?];
        while self.eat(&TokenKind::Comma) {
            values.push(self.parse_operand()?);
        }
        self.expect(&TokenKind::RightParen)?;

        if self.check(&TokenKind::Comma) {
            return Err(self.unsupported("multi-row VALUES"));
        }
        if values.len() > columns.len() {
            return Err(ParseError::new(
                format!(
                    "INSERT lists {} columns but {} values",
                    columns.len(),
                    values.len()
                ),
                values_span,
            ));
        }

        Ok(InsertStatement {
            table,
            columns,
            values,
        })
    }

    fn parse_update(&mut self) -> Result<UpdateStatement, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_table()?;
        self.expect_keyword(Keyword::Set)?;

        let mut assignments = vec![];
        loop {
            let column = self.parse_column()?;
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_operand()?;
            assignments.push(Assignment { column, value });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_where("UPDATE")?;
        let predicate = self.parse_predicate()?;

        Ok(UpdateStatement {
            table,
            assignments,
            predicate,
        })
    }

    fn parse_delete(&mut self) -> Result<DeleteStatement, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_table()?;
        self.expect_where("DELETE")?;
        let predicate = self.parse_predicate()?;
        Ok(DeleteStatement { table, predicate })
    }

    /// Parses `comparison (AND comparison)*`.
    fn parse_predicate(&mut self) -> Result<Vec<Filter>, ParseError> {
        let mut filters = vec![self.parse_comparison()?];
        loop {
            if self.eat_keyword(Keyword::And) {
                filters.push(self.parse_comparison()?);
            } else if self.check_keyword(Keyword::Or) {
                return Err(self.unsupported("OR in WHERE"));
            } else {
                return Ok(filters);
            }
        }
    }

    fn parse_comparison(&mut self) -> Result<Filter, ParseError> {
        match &self.current.kind {
            TokenKind::LeftParen => return Err(self.unsupported("parenthesized condition")),
            TokenKind::Keyword(Keyword::Not) => return Err(self.unsupported("NOT condition")),
            _ => {}
        }
        let column = self.parse_column()?;

        let op = match &self.current.kind {
            TokenKind::Keyword(Keyword::Is) => {
                self.advance();
                let negated = self.eat_keyword(Keyword::Not);
                self.expect_keyword(Keyword::Null)?;
                return Ok(Filter::null_check(column, negated));
            }
            TokenKind::NotEq => FilterOp::Neq,
            TokenKind::Keyword(Keyword::Like) => FilterOp::Like,
            TokenKind::GtEq => FilterOp::Gte,
            TokenKind::LtEq => FilterOp::Lte,
            TokenKind::Gt => FilterOp::Gt,
            TokenKind::Lt => FilterOp::Lt,
            TokenKind::Eq => FilterOp::Eq,
            TokenKind::Keyword(kw @ (Keyword::In | Keyword::Between | Keyword::Not)) => {
                let what = format!("{} comparison", kw.as_str());
                return Err(self.unsupported(what));
            }
            _ => return Err(self.unexpected("comparison operator")),
        };
        self.advance();

        let operand = self.parse_operand()?;
        Ok(Filter::compare(column, op, operand))
    }

    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        let value = match &self.current.kind {
            TokenKind::Question => {
                let position = self.param_counter;
                self.param_counter += 1;
                self.advance();
                return Ok(Operand::Param(position));
            }
            TokenKind::String(s) => SqlValue::Text(s.clone()),
            TokenKind::Integer(n) => SqlValue::Int(*n),
            TokenKind::Float(x) => SqlValue::Float(*x),
            TokenKind::Keyword(Keyword::True) => SqlValue::Bool(true),
            TokenKind::Keyword(Keyword::False) => SqlValue::Bool(false),
            TokenKind::Keyword(Keyword::Null) => SqlValue::Null,
            TokenKind::Minus => {
                self.advance();
                let negated = match &self.current.kind {
                    TokenKind::Integer(n) => SqlValue::Int(-*n),
                    TokenKind::Float(x) => SqlValue::Float(-*x),
                    _ => return Err(self.unexpected("number after `-`")),
                };
                self.advance();
                return Ok(Operand::Literal(negated));
            }
            TokenKind::Identifier(_) => {
                return Err(self.unsupported("expression or column on the right-hand side"));
            }
            _ => return Err(self.unexpected("`?` or a literal")),
        };
        self.advance();
        Ok(Operand::Literal(value))
    }

    fn parse_row_bound(&mut self) -> Result<RowBound, ParseError> {
        match self.current.kind {
            TokenKind::Question => {
                let position = self.param_counter;
                self.param_counter += 1;
                self.advance();
                Ok(RowBound::Param(position))
            }
            TokenKind::Integer(n) => {
                let n = u64::try_from(n)
                    .map_err(|_| ParseError::new("row count must not be negative", self.current.span))?;
                self.advance();
                Ok(RowBound::Fixed(n))
            }
            _ => Err(self.unexpected("`?` or a non-negative integer")),
        }
    }

    /// Parses a plain column name, refusing calls and qualified names.
    fn parse_column(&mut self) -> Result<String, ParseError> {
        let name = self.expect_identifier()?;
        match self.current.kind {
            TokenKind::LeftParen => Err(self.unsupported(format!("function call `{name}(...)`"))),
            TokenKind::Dot => Err(self.unsupported("qualified column name")),
            TokenKind::Keyword(Keyword::As) => Err(self.unsupported("column alias")),
            _ => Ok(name.to_lowercase()),
        }
    }

    /// Parses a table name, refusing schemas, aliases and joins.
    fn parse_table(&mut self) -> Result<String, ParseError> {
        if self.check(&TokenKind::LeftParen) {
            return Err(self.unsupported("subquery"));
        }
        let name = self.expect_identifier()?;
        match &self.current.kind {
            TokenKind::Dot => Err(self.unsupported("schema-qualified table")),
            TokenKind::Identifier(_) | TokenKind::Keyword(Keyword::As) => {
                Err(self.unsupported("table alias"))
            }
            TokenKind::Comma
            | TokenKind::Keyword(Keyword::Join | Keyword::Inner | Keyword::Left) => {
                Err(self.unsupported("JOIN"))
            }
            _ => Ok(name.to_lowercase()),
        }
    }

    fn expect_where(&mut self, statement: &str) -> Result<(), ParseError> {
        if self.eat_keyword(Keyword::Where) {
            return Ok(());
        }
        if matches!(self.current.kind, TokenKind::Eof | TokenKind::Semicolon) {
            return Err(ParseError::new(
                format!("{statement} without WHERE would touch every row"),
                self.current.span,
            ));
        }
        Err(self.unexpected("WHERE"))
    }

    /// Accepts an optional `;` and requires end of input.
    fn finish(&mut self) -> Result<(), ParseError> {
        self.eat(&TokenKind::Semicolon);
        match &self.current.kind {
            TokenKind::Eof => Ok(()),
            TokenKind::Keyword(Keyword::Union) => Err(self.unsupported("UNION")),
            TokenKind::Keyword(Keyword::Group | Keyword::Having) => {
                Err(self.unsupported("GROUP BY / HAVING"))
            }
            TokenKind::Keyword(Keyword::Or) => Err(self.unsupported("OR in WHERE")),
            _ => Err(self.unexpected("end of statement")),
        }
    }

    // --- token helpers ---

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.as_keyword() == Some(keyword)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        let hit = self.check(kind);
        if hit {
            self.advance();
        }
        hit
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let hit = self.check_keyword(keyword);
        if hit {
            self.advance();
        }
        hit
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(kind.to_string()))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::unexpected(expected, self.current.kind.clone(), self.current.span)
    }

    fn unsupported(&self, what: impl AsRef<str>) -> ParseError {
        ParseError::unsupported(what, self.current.kind.clone(), self.current.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(sql: &str) -> Result<Statement, ParseError> {
        Parser::new(sql).parse_statement()
    }

    #[test]
    fn test_classify() {
        assert_eq!(Parser::classify("  select * from x"), Some(StatementKind::Select));
        assert_eq!(Parser::classify("DELETE FROM x"), Some(StatementKind::Delete));
        assert_eq!(Parser::classify("PRAGMA foreign_keys = ON"), None);
        assert_eq!(Parser::classify("CREATE TABLE t (id TEXT)"), None);
        assert_eq!(Parser::classify(""), None);
    }

    #[test]
    fn test_select_star() {
        let Statement::Select(s) = parse("SELECT * FROM Budgets").unwrap() else {
            panic!("Expected SELECT statement");
        };
        assert_eq!(s.table, "budgets");
        assert_eq!(s.projection, Projection::All);
        assert!(s.predicate.is_empty());
    }

    #[test]
    fn test_param_positions_follow_text_order() {
        let mut parser = Parser::new("SELECT * FROM t WHERE a = ? AND b > ? LIMIT ? OFFSET ?");
        let Statement::Select(s) = parser.parse_statement().unwrap() else {
            panic!("Expected SELECT statement");
        };
        assert_eq!(s.predicate[0].param_position(), Some(0));
        assert_eq!(s.predicate[1].param_position(), Some(1));
        assert_eq!(s.limit, Some(RowBound::Param(2)));
        assert_eq!(s.offset, Some(RowBound::Param(3)));
        assert_eq!(parser.param_count(), 4);
    }

    #[test]
    fn test_trailing_semicolon() {
        assert!(parse("DELETE FROM goals WHERE id = ?;").is_ok());
        assert!(parse("DELETE FROM goals WHERE id = ?; DELETE").is_err());
    }

    #[test]
    fn test_negative_literal() {
        let Statement::Select(s) = parse("SELECT * FROM t WHERE amount > -2.5").unwrap() else {
            panic!("Expected SELECT statement");
        };
        assert_eq!(
            s.predicate[0].operand,
            Some(Operand::Literal(SqlValue::Float(-2.5)))
        );
    }

    #[test]
    fn test_update_requires_where() {
        let err = parse("UPDATE budgets SET limit_amount = ?").unwrap_err();
        assert!(err.message.contains("without WHERE"));
    }

    #[test]
    fn test_rejects_trailing_garbage() {
        let err = parse("SELECT * FROM t WHERE a = ? b").unwrap_err();
        assert_eq!(err.expected.as_deref(), Some("end of statement"));
    }
}
