//! Abstract syntax tree for the engine's SQL dialect.
//!
//! The statement surface is closed: five statement forms, a small
//! expression grammar, and no extension points. Every variant here is
//! produced by the parser and consumed by the executor; there is no
//! string-typed fallback anywhere in the tree.

use std::fmt;

use crate::datum::FieldType;

/// A parsed SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable(CreateTableStmt),
    DropTable(DropTableStmt),
    Insert(InsertStmt),
    Delete(DeleteStmt),
    Select(SelectQuery),
}

/// `CREATE TABLE name (col type, ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStmt {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub field_type: FieldType,
}

/// `DROP TABLE name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTableStmt {
    pub name: String,
}

/// `INSERT INTO name (cols) VALUES (...)` or `INSERT INTO name (cols) SELECT ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStmt {
    pub relation: String,
    pub columns: Vec<String>,
    pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertSource {
    Values(Vec<Literal>),
    Select(SelectQuery),
}

/// A literal value in a VALUES list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Integer(i32),
    String(String),
    Null,
}

/// `DELETE FROM name [WHERE expr]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStmt {
    pub relation: String,
    pub filter: Option<Expr>,
}

/// `SELECT [DISTINCT] cols FROM rels [WHERE expr] [ORDER BY col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub distinct: bool,
    pub columns: SelectColumns,
    pub from: Vec<String>,
    pub filter: Option<Expr>,
    pub order_by: Option<ColumnRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectColumns {
    /// `SELECT *`
    All,
    Columns(Vec<ColumnRef>),
}

/// A possibly qualified column name, `relation.column` or bare `column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A WHERE-clause expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Column(ColumnRef),
    Integer(i32),
    String(String),
    BinaryOp {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    Gt,
    Lt,
    Add,
    Sub,
    Mul,
}

impl BinaryOperator {
    /// Binding power for precedence-climbing. All operators are
    /// left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 0,
            BinaryOperator::And => 1,
            BinaryOperator::Eq | BinaryOperator::Gt | BinaryOperator::Lt => 2,
            BinaryOperator::Add | BinaryOperator::Sub => 3,
            BinaryOperator::Mul => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Or => "OR",
            BinaryOperator::And => "AND",
            BinaryOperator::Eq => "=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lt => "<",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
        }
    }
}
