//! Statement execution.
//!
//! [`execute`] dispatches a parsed [`Statement`] to its handler and tags
//! any failure with the statement form, so the shell can report
//! "error in a SELECT statement: ..." and keep going.

pub mod error;
pub mod result;

mod ddl;
mod delete;
mod eval;
mod insert;
mod join;
mod select;

use crate::db::Database;
use crate::sql::ast::Statement;

pub use error::{ExecutorError, StatementError, StatementKind};
pub use result::QueryResult;

/// What a successfully executed statement produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    Created { relation: String },
    Dropped { relation: String },
    Inserted { relation: String, rows: usize },
    Deleted { relation: String },
    Selected(QueryResult),
}

/// Executes one statement against the database.
pub fn execute(db: &mut Database, statement: &Statement) -> Result<ExecOutcome, StatementError> {
    match statement {
        Statement::CreateTable(stmt) => ddl::run_create(db, stmt)
            .map(|()| ExecOutcome::Created {
                relation: stmt.name.clone(),
            })
            .map_err(|e| StatementError::new(StatementKind::Create, e)),
        Statement::DropTable(stmt) => ddl::run_drop(db, stmt)
            .map(|()| ExecOutcome::Dropped {
                relation: stmt.name.clone(),
            })
            .map_err(|e| StatementError::new(StatementKind::Drop, e)),
        Statement::Insert(stmt) => insert::run_insert(db, stmt)
            .map(|rows| ExecOutcome::Inserted {
                relation: stmt.relation.clone(),
                rows,
            })
            .map_err(|e| StatementError::new(StatementKind::Insert, e)),
        Statement::Delete(stmt) => delete::run_delete(db, stmt)
            .map(|()| ExecOutcome::Deleted {
                relation: stmt.relation.clone(),
            })
            .map_err(|e| StatementError::new(StatementKind::Delete, e)),
        Statement::Select(query) => select::run_select(db, query)
            .map(|output| {
                ExecOutcome::Selected(QueryResult {
                    columns: output.columns,
                    rows: output.rows,
                })
            })
            .map_err(|e| StatementError::new(StatementKind::Select, e)),
    }
}
