//! CREATE TABLE and DROP TABLE.

use tracing::info;

use crate::catalog::Schema;
use crate::db::Database;
use crate::sql::ast::{CreateTableStmt, DropTableStmt};

use super::error::ExecutorError;

pub fn run_create(db: &mut Database, stmt: &CreateTableStmt) -> Result<(), ExecutorError> {
    let schema = Schema::new(
        stmt.columns
            .iter()
            .map(|col| (col.name.clone(), col.field_type))
            .collect(),
    )?;
    db.create_relation(&stmt.name, schema)?;
    info!(relation = %stmt.name, "created relation");
    Ok(())
}

pub fn run_drop(db: &mut Database, stmt: &DropTableStmt) -> Result<(), ExecutorError> {
    let id = db.catalog.relation_id(&stmt.name)?;
    db.truncate(id, 0)?;
    db.catalog.remove(id)?;
    info!(relation = %stmt.name, "dropped relation");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::datum::FieldType;
    use crate::sql::ast::ColumnDef;

    fn create_stmt(name: &str) -> CreateTableStmt {
        CreateTableStmt {
            name: name.into(),
            columns: vec![ColumnDef {
                name: "sid".into(),
                field_type: FieldType::Int,
            }],
        }
    }

    #[test]
    fn test_create_registers_relation() {
        let mut db = Database::new();
        run_create(&mut db, &create_stmt("course")).unwrap();
        assert!(db.catalog.exists("course"));
    }

    #[test]
    fn test_create_duplicate_rejected() {
        let mut db = Database::new();
        run_create(&mut db, &create_stmt("course")).unwrap();
        assert!(matches!(
            run_create(&mut db, &create_stmt("course")),
            Err(ExecutorError::Catalog(
                CatalogError::RelationAlreadyExists { .. }
            ))
        ));
    }

    #[test]
    fn test_drop_removes_relation() {
        let mut db = Database::new();
        run_create(&mut db, &create_stmt("course")).unwrap();
        run_drop(
            &mut db,
            &DropTableStmt {
                name: "course".into(),
            },
        )
        .unwrap();
        assert!(!db.catalog.exists("course"));
    }

    #[test]
    fn test_drop_missing_relation() {
        let mut db = Database::new();
        assert!(matches!(
            run_drop(
                &mut db,
                &DropTableStmt {
                    name: "ghost".into()
                }
            ),
            Err(ExecutorError::Catalog(CatalogError::NoSuchRelation { .. }))
        ));
    }
}
