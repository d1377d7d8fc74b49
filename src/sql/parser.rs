//! Recursive-descent SQL parser.
//!
//! Statements are dispatched on their leading keyword; WHERE-clause
//! expressions are parsed by precedence climbing over the operator
//! levels in [`BinaryOperator::precedence`]:
//!
//! ```text
//!   OR  <  AND  <  = > <  <  + -  <  *
//! ```

use crate::datum::FieldType;

use super::ast::{
    BinaryOperator, ColumnDef, ColumnRef, CreateTableStmt, DeleteStmt, DropTableStmt, Expr,
    InsertSource, InsertStmt, Literal, SelectColumns, SelectQuery, Statement,
};
use super::error::{Span, SyntaxError};
use super::lexer::Lexer;
use super::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self {
            tokens: Lexer::new(input).collect(),
            pos: 0,
        }
    }

    /// Parses a single statement, optionally terminated by `;`.
    pub fn parse(mut self) -> Result<Statement, SyntaxError> {
        let statement = self.parse_statement()?;
        if matches!(self.peek().kind, TokenKind::Semicolon) {
            self.advance();
        }
        let trailing = self.peek();
        if !trailing.is_eof() {
            return Err(SyntaxError::unexpected_token(
                "end of statement",
                &trailing.kind.display_name(),
                trailing.span,
            ));
        }
        Ok(statement)
    }

    fn parse_statement(&mut self) -> Result<Statement, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Create => self.parse_create_table().map(Statement::CreateTable),
            TokenKind::Drop => self.parse_drop_table().map(Statement::DropTable),
            TokenKind::Insert => self.parse_insert().map(Statement::Insert),
            TokenKind::Delete => self.parse_delete().map(Statement::Delete),
            TokenKind::Select => self.parse_select().map(Statement::Select),
            TokenKind::Error(message) => Err(SyntaxError::new(message, token.span)),
            TokenKind::Eof => Err(SyntaxError::unexpected_eof("a statement", token.span.start)),
            kind => Err(SyntaxError::unexpected_token(
                "CREATE, DROP, INSERT, DELETE, or SELECT",
                &kind.display_name(),
                token.span,
            )),
        }
    }

    fn parse_create_table(&mut self) -> Result<CreateTableStmt, SyntaxError> {
        self.expect(&TokenKind::Create)?;
        self.expect(&TokenKind::Table)?;
        let name = self.expect_identifier("a table name")?;
        self.expect(&TokenKind::LParen)?;
        let mut columns = Vec::new();
        loop {
            let column = self.expect_identifier("a column name")?;
            let field_type = self.parse_field_type()?;
            columns.push(ColumnDef {
                name: column,
                field_type,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(CreateTableStmt { name, columns })
    }

    fn parse_field_type(&mut self) -> Result<FieldType, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Int => {
                self.advance();
                Ok(FieldType::Int)
            }
            TokenKind::Str20 => {
                self.advance();
                Ok(FieldType::Str20)
            }
            kind => Err(SyntaxError::unexpected_token(
                "INT or STR20",
                &kind.display_name(),
                token.span,
            )),
        }
    }

    fn parse_drop_table(&mut self) -> Result<DropTableStmt, SyntaxError> {
        self.expect(&TokenKind::Drop)?;
        self.expect(&TokenKind::Table)?;
        let name = self.expect_identifier("a table name")?;
        Ok(DropTableStmt { name })
    }

    fn parse_insert(&mut self) -> Result<InsertStmt, SyntaxError> {
        self.expect(&TokenKind::Insert)?;
        self.expect(&TokenKind::Into)?;
        let relation = self.expect_identifier("a table name")?;
        self.expect(&TokenKind::LParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.expect_identifier("a column name")?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        let token = self.peek().clone();
        let source = match token.kind {
            TokenKind::Values => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let mut values = Vec::new();
                loop {
                    values.push(self.parse_literal()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RParen)?;
                InsertSource::Values(values)
            }
            TokenKind::Select => InsertSource::Select(self.parse_select()?),
            kind => {
                return Err(SyntaxError::unexpected_token(
                    "VALUES or SELECT",
                    &kind.display_name(),
                    token.span,
                ))
            }
        };
        Ok(InsertStmt {
            relation,
            columns,
            source,
        })
    }

    fn parse_literal(&mut self) -> Result<Literal, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::IntegerLit(n) => {
                self.advance();
                Ok(Literal::Integer(n))
            }
            TokenKind::Minus => {
                self.advance();
                let next = self.peek().clone();
                match next.kind {
                    TokenKind::IntegerLit(n) => {
                        self.advance();
                        Ok(Literal::Integer(n.wrapping_neg()))
                    }
                    kind => Err(SyntaxError::unexpected_token(
                        "an integer",
                        &kind.display_name(),
                        next.span,
                    )),
                }
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(Literal::String(s))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Literal::Null)
            }
            kind => Err(SyntaxError::unexpected_token(
                "a literal value",
                &kind.display_name(),
                token.span,
            )),
        }
    }

    fn parse_delete(&mut self) -> Result<DeleteStmt, SyntaxError> {
        self.expect(&TokenKind::Delete)?;
        self.expect(&TokenKind::From)?;
        let relation = self.expect_identifier("a table name")?;
        let filter = if self.eat(&TokenKind::Where) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        Ok(DeleteStmt { relation, filter })
    }

    fn parse_select(&mut self) -> Result<SelectQuery, SyntaxError> {
        self.expect(&TokenKind::Select)?;
        let distinct = self.eat(&TokenKind::Distinct);

        let columns = if self.eat(&TokenKind::Asterisk) {
            SelectColumns::All
        } else {
            let mut columns = Vec::new();
            loop {
                columns.push(self.parse_column_ref()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            SelectColumns::Columns(columns)
        };

        self.expect(&TokenKind::From)?;
        let mut from = Vec::new();
        loop {
            from.push(self.expect_identifier("a table name")?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        let filter = if self.eat(&TokenKind::Where) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };

        let order_by = if self.eat(&TokenKind::Order) {
            self.expect(&TokenKind::By)?;
            Some(self.parse_column_ref()?)
        } else {
            None
        };

        Ok(SelectQuery {
            distinct,
            columns,
            from,
            filter,
            order_by,
        })
    }

    fn parse_column_ref(&mut self) -> Result<ColumnRef, SyntaxError> {
        let first = self.expect_identifier("a column name")?;
        if self.eat(&TokenKind::Dot) {
            let name = self.expect_identifier("a column name")?;
            Ok(ColumnRef::qualified(first, name))
        } else {
            Ok(ColumnRef::bare(first))
        }
    }

    /// Precedence climbing. `min_prec` is the lowest binding power an
    /// operator must have to be consumed at this level.
    fn parse_expr(&mut self, min_prec: u8) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_primary()?;
        while let Some(op) = self.peek_operator() {
            if op.precedence() < min_prec {
                break;
            }
            self.advance();
            let rhs = self.parse_expr(op.precedence() + 1)?;
            lhs = Expr::BinaryOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn peek_operator(&self) -> Option<BinaryOperator> {
        match self.peek().kind {
            TokenKind::Or => Some(BinaryOperator::Or),
            TokenKind::And => Some(BinaryOperator::And),
            TokenKind::Eq => Some(BinaryOperator::Eq),
            TokenKind::Gt => Some(BinaryOperator::Gt),
            TokenKind::Lt => Some(BinaryOperator::Lt),
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Minus => Some(BinaryOperator::Sub),
            TokenKind::Asterisk => Some(BinaryOperator::Mul),
            _ => None,
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr(0)?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::IntegerLit(n) => {
                self.advance();
                Ok(Expr::Integer(n))
            }
            TokenKind::Minus => {
                self.advance();
                let next = self.peek().clone();
                match next.kind {
                    TokenKind::IntegerLit(n) => {
                        self.advance();
                        Ok(Expr::Integer(n.wrapping_neg()))
                    }
                    kind => Err(SyntaxError::unexpected_token(
                        "an integer",
                        &kind.display_name(),
                        next.span,
                    )),
                }
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(Expr::String(s))
            }
            TokenKind::Identifier(_) => Ok(Expr::Column(self.parse_column_ref()?)),
            TokenKind::Error(message) => Err(SyntaxError::new(message, token.span)),
            TokenKind::Eof => Err(SyntaxError::unexpected_eof(
                "an expression",
                token.span.start,
            )),
            kind => Err(SyntaxError::unexpected_token(
                "an expression",
                &kind.display_name(),
                token.span,
            )),
        }
    }

    fn peek(&self) -> &Token {
        // the token stream always ends with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), SyntaxError> {
        let token = self.peek().clone();
        if &token.kind == kind {
            self.advance();
            return Ok(());
        }
        match token.kind {
            TokenKind::Error(message) => Err(SyntaxError::new(message, token.span)),
            TokenKind::Eof => Err(SyntaxError::unexpected_eof(
                &kind.display_name(),
                token.span.start,
            )),
            found => Err(SyntaxError::unexpected_token(
                &kind.display_name(),
                &found.display_name(),
                token.span,
            )),
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<String, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::Error(message) => Err(SyntaxError::new(message, token.span)),
            TokenKind::Eof => Err(SyntaxError::unexpected_eof(expected, token.span.start)),
            kind => Err(SyntaxError::unexpected_token(
                expected,
                &kind.display_name(),
                token.span,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Statement, SyntaxError> {
        Parser::new(input).parse()
    }

    #[test]
    fn test_create_table() {
        let stmt = parse("CREATE TABLE course (sid INT, grade STR20)").unwrap();
        assert_eq!(
            stmt,
            Statement::CreateTable(CreateTableStmt {
                name: "course".into(),
                columns: vec![
                    ColumnDef {
                        name: "sid".into(),
                        field_type: FieldType::Int
                    },
                    ColumnDef {
                        name: "grade".into(),
                        field_type: FieldType::Str20
                    },
                ],
            })
        );
    }

    #[test]
    fn test_drop_table() {
        assert_eq!(
            parse("DROP TABLE course;").unwrap(),
            Statement::DropTable(DropTableStmt {
                name: "course".into()
            })
        );
    }

    #[test]
    fn test_insert_values() {
        let stmt = parse("INSERT INTO course (sid, grade) VALUES (1, \"A\")").unwrap();
        assert_eq!(
            stmt,
            Statement::Insert(InsertStmt {
                relation: "course".into(),
                columns: vec!["sid".into(), "grade".into()],
                source: InsertSource::Values(vec![
                    Literal::Integer(1),
                    Literal::String("A".into()),
                ]),
            })
        );
    }

    #[test]
    fn test_insert_null_and_negative() {
        let stmt = parse("INSERT INTO t (a, b) VALUES (NULL, -5)").unwrap();
        assert_eq!(
            stmt,
            Statement::Insert(InsertStmt {
                relation: "t".into(),
                columns: vec!["a".into(), "b".into()],
                source: InsertSource::Values(vec![Literal::Null, Literal::Integer(-5)]),
            })
        );
    }

    #[test]
    fn test_insert_select() {
        let stmt = parse("INSERT INTO t (a) SELECT a FROM u").unwrap();
        match stmt {
            Statement::Insert(InsertStmt {
                source: InsertSource::Select(query),
                ..
            }) => assert_eq!(query.from, vec!["u".to_string()]),
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_delete_with_filter() {
        let stmt = parse("DELETE FROM course WHERE grade = \"E\"").unwrap();
        assert_eq!(
            stmt,
            Statement::Delete(DeleteStmt {
                relation: "course".into(),
                filter: Some(Expr::BinaryOp {
                    op: BinaryOperator::Eq,
                    lhs: Box::new(Expr::Column(ColumnRef::bare("grade"))),
                    rhs: Box::new(Expr::String("E".into())),
                }),
            })
        );
    }

    #[test]
    fn test_delete_all() {
        assert_eq!(
            parse("DELETE FROM course").unwrap(),
            Statement::Delete(DeleteStmt {
                relation: "course".into(),
                filter: None,
            })
        );
    }

    #[test]
    fn test_select_star() {
        let stmt = parse("SELECT * FROM course").unwrap();
        assert_eq!(
            stmt,
            Statement::Select(SelectQuery {
                distinct: false,
                columns: SelectColumns::All,
                from: vec!["course".into()],
                filter: None,
                order_by: None,
            })
        );
    }

    #[test]
    fn test_select_full_clause_set() {
        let stmt =
            parse("SELECT DISTINCT c.sid, grade FROM c, d WHERE c.sid = d.sid ORDER BY grade")
                .unwrap();
        match stmt {
            Statement::Select(query) => {
                assert!(query.distinct);
                assert_eq!(
                    query.columns,
                    SelectColumns::Columns(vec![
                        ColumnRef::qualified("c", "sid"),
                        ColumnRef::bare("grade"),
                    ])
                );
                assert_eq!(query.from, vec!["c".to_string(), "d".to_string()]);
                assert!(query.filter.is_some());
                assert_eq!(query.order_by, Some(ColumnRef::bare("grade")));
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_precedence_and_binds_tighter_than_or() {
        // a = 1 OR b = 2 AND c = 3  parses as  a = 1 OR (b = 2 AND c = 3)
        let stmt = parse("SELECT * FROM t WHERE a = 1 OR b = 2 AND c = 3").unwrap();
        let filter = match stmt {
            Statement::Select(SelectQuery {
                filter: Some(filter),
                ..
            }) => filter,
            other => panic!("unexpected statement: {other:?}"),
        };
        match filter {
            Expr::BinaryOp {
                op: BinaryOperator::Or,
                rhs,
                ..
            } => {
                assert!(matches!(
                    *rhs,
                    Expr::BinaryOp {
                        op: BinaryOperator::And,
                        ..
                    }
                ));
            }
            other => panic!("unexpected expression: {other:?}"),
        }
    }

    #[test]
    fn test_precedence_arithmetic_under_comparison() {
        // a + b * 2 = 10  parses as  (a + (b * 2)) = 10
        let stmt = parse("SELECT * FROM t WHERE a + b * 2 = 10").unwrap();
        let filter = match stmt {
            Statement::Select(SelectQuery {
                filter: Some(filter),
                ..
            }) => filter,
            other => panic!("unexpected statement: {other:?}"),
        };
        match filter {
            Expr::BinaryOp {
                op: BinaryOperator::Eq,
                lhs,
                ..
            } => match *lhs {
                Expr::BinaryOp {
                    op: BinaryOperator::Add,
                    rhs,
                    ..
                } => assert!(matches!(
                    *rhs,
                    Expr::BinaryOp {
                        op: BinaryOperator::Mul,
                        ..
                    }
                )),
                other => panic!("unexpected expression: {other:?}"),
            },
            other => panic!("unexpected expression: {other:?}"),
        }
    }

    #[test]
    fn test_parenthesized_expression() {
        let stmt = parse("SELECT * FROM t WHERE (a = 1 OR b = 2) AND c = 3").unwrap();
        let filter = match stmt {
            Statement::Select(SelectQuery {
                filter: Some(filter),
                ..
            }) => filter,
            other => panic!("unexpected statement: {other:?}"),
        };
        assert!(matches!(
            filter,
            Expr::BinaryOp {
                op: BinaryOperator::And,
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(parse("DROP TABLE t t").is_err());
    }

    #[test]
    fn test_lexical_error_surfaces_as_syntax_error() {
        let err = parse("SELECT * FROM t WHERE a = \"oops").unwrap_err();
        assert!(err.message.contains("unterminated string literal"));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn test_unknown_statement_rejected() {
        let err = parse("UPDATE t SET a = 1").unwrap_err();
        assert!(err.message.contains("expected CREATE"));
    }
}
