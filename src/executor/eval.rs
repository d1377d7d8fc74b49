//! WHERE-clause evaluation over a single tuple.
//!
//! Expressions are evaluated in two contexts. In boolean context, OR and
//! AND combine their operand truth values (both sides are always
//! evaluated), `=` compares two scalars for typed equality, and `>` `<`
//! compare integers. In scalar context, `+` `-` `*` operate on integers
//! with wrapping semantics, and column references index the tuple.
//!
//! A non-boolean node at boolean level is not an error: it logs a
//! warning and evaluates to false, so a malformed predicate filters
//! everything out instead of aborting the scan.

use tracing::warn;

use crate::catalog::Schema;
use crate::datum::Field;
use crate::sql::ast::{BinaryOperator, ColumnRef, Expr};
use crate::storage::Tuple;

use super::error::ExecutorError;

/// Resolves a column reference against a schema, returning the field
/// offset.
///
/// Qualified references first try the stored qualified name
/// (`"relation.column"`, as join output schemas name their fields), then
/// the bare name. Unqualified references try the exact name, then a
/// unique `".column"` suffix match; several suffix matches make the
/// reference ambiguous.
pub fn resolve_column(schema: &Schema, column: &ColumnRef) -> Result<usize, ExecutorError> {
    match &column.qualifier {
        Some(qualifier) => {
            let qualified = format!("{}.{}", qualifier, column.name);
            if let Some(offset) = schema.field_offset(&qualified) {
                return Ok(offset);
            }
            if let Some(offset) = schema.field_offset(&column.name) {
                return Ok(offset);
            }
            Err(ExecutorError::UnknownColumn {
                column: column.to_string(),
            })
        }
        None => {
            if let Some(offset) = schema.field_offset(&column.name) {
                return Ok(offset);
            }
            let suffix = format!(".{}", column.name);
            let mut matches = schema
                .iter()
                .enumerate()
                .filter(|(_, (name, _))| name.ends_with(&suffix));
            match (matches.next(), matches.next()) {
                (Some((offset, _)), None) => Ok(offset),
                (Some(_), Some(_)) => Err(ExecutorError::AmbiguousColumn {
                    column: column.name.clone(),
                }),
                _ => Err(ExecutorError::UnknownColumn {
                    column: column.name.clone(),
                }),
            }
        }
    }
}

/// Evaluates an expression as a predicate over one tuple.
pub fn evaluate_predicate(
    expr: &Expr,
    schema: &Schema,
    tuple: &Tuple,
) -> Result<bool, ExecutorError> {
    match expr {
        Expr::BinaryOp { op, lhs, rhs } => match op {
            BinaryOperator::Or => {
                let l = evaluate_predicate(lhs, schema, tuple)?;
                let r = evaluate_predicate(rhs, schema, tuple)?;
                Ok(l || r)
            }
            BinaryOperator::And => {
                let l = evaluate_predicate(lhs, schema, tuple)?;
                let r = evaluate_predicate(rhs, schema, tuple)?;
                Ok(l && r)
            }
            BinaryOperator::Eq => {
                let l = evaluate_scalar(lhs, schema, tuple)?;
                let r = evaluate_scalar(rhs, schema, tuple)?;
                // cross-type comparison is unequal, not an error
                Ok(l == r)
            }
            BinaryOperator::Gt => {
                let l = evaluate_int(lhs, schema, tuple)?;
                let r = evaluate_int(rhs, schema, tuple)?;
                Ok(l > r)
            }
            BinaryOperator::Lt => {
                let l = evaluate_int(lhs, schema, tuple)?;
                let r = evaluate_int(rhs, schema, tuple)?;
                Ok(l < r)
            }
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul => {
                warn!(op = op.as_str(), "arithmetic result used as a condition");
                Ok(false)
            }
        },
        Expr::Column(_) | Expr::Integer(_) | Expr::String(_) => {
            warn!("non-boolean expression used as a condition");
            Ok(false)
        }
    }
}

/// Evaluates an expression to an integer. Strings and boolean operators
/// are errors here.
fn evaluate_int(expr: &Expr, schema: &Schema, tuple: &Tuple) -> Result<i32, ExecutorError> {
    match evaluate_scalar(expr, schema, tuple)? {
        Field::Int(n) => Ok(n),
        Field::Str(s) => Err(ExecutorError::IntegerExpected {
            found: format!("string \"{s}\""),
        }),
    }
}

/// Evaluates an expression to a field value. Boolean operators have no
/// scalar value and are rejected.
fn evaluate_scalar(expr: &Expr, schema: &Schema, tuple: &Tuple) -> Result<Field, ExecutorError> {
    match expr {
        Expr::Integer(n) => Ok(Field::Int(*n)),
        Expr::String(s) => Ok(Field::Str(s.clone())),
        Expr::Column(column) => {
            let offset = resolve_column(schema, column)?;
            match tuple.field(offset) {
                Some(field) => Ok(field.clone()),
                None => Err(ExecutorError::UnknownColumn {
                    column: column.to_string(),
                }),
            }
        }
        Expr::BinaryOp { op, lhs, rhs } => match op {
            BinaryOperator::Add => {
                let l = evaluate_int(lhs, schema, tuple)?;
                let r = evaluate_int(rhs, schema, tuple)?;
                Ok(Field::Int(l.wrapping_add(r)))
            }
            BinaryOperator::Sub => {
                let l = evaluate_int(lhs, schema, tuple)?;
                let r = evaluate_int(rhs, schema, tuple)?;
                Ok(Field::Int(l.wrapping_sub(r)))
            }
            BinaryOperator::Mul => {
                let l = evaluate_int(lhs, schema, tuple)?;
                let r = evaluate_int(rhs, schema, tuple)?;
                Ok(Field::Int(l.wrapping_mul(r)))
            }
            BinaryOperator::Or
            | BinaryOperator::And
            | BinaryOperator::Eq
            | BinaryOperator::Gt
            | BinaryOperator::Lt => Err(ExecutorError::IntegerExpected {
                found: "a boolean expression".to_string(),
            }),
        },
    }
}
