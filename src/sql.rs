//! SQL front-end: lexer, parser, and the statement AST.
//!
//! The dialect is deliberately small. Statements:
//!
//! ```text
//! CREATE TABLE name (col INT | STR20, ...)
//! DROP TABLE name
//! INSERT INTO name (cols) VALUES (literals) | SELECT ...
//! DELETE FROM name [WHERE expr]
//! SELECT [DISTINCT] * | cols FROM names [WHERE expr] [ORDER BY col]
//! ```
//!
//! String literals are double-quoted, integers are 32-bit, and the WHERE
//! grammar has exactly the operators `OR AND = > < + - *`.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{Span, SyntaxError};

/// Parses one SQL statement.
pub fn parse(input: &str) -> Result<ast::Statement, SyntaxError> {
    parser::Parser::new(input).parse()
}
