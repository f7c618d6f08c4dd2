//! Statement AST definitions.
//!
//! Statements arrive already parsed. Identifiers are folded to lower case by
//! the constructors here.

use crate::ast::expr::{ColumnName, WhereClause};
use kvsql_core::{Literal, TypeName};

/// A parsed statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    DropTable { name: String },
    Describe { table: String, form: DescribeForm },
    ShowTables,
    Select(Select),
    Insert(Insert),
    Delete(Delete),
}

/// The keyword a schema description was requested with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescribeForm {
    Desc,
    Describe,
    Explain,
}

impl Statement {
    /// Returns a short name for this statement kind, used in log spans.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::CreateTable(_) => "create_table",
            Statement::DropTable { .. } => "drop_table",
            Statement::Describe { .. } => "describe",
            Statement::ShowTables => "show_tables",
            Statement::Select(_) => "select",
            Statement::Insert(_) => "insert",
            Statement::Delete(_) => "delete",
        }
    }

    pub fn drop_table(name: impl Into<String>) -> Self {
        Statement::DropTable {
            name: name.into().to_lowercase(),
        }
    }

    pub fn desc(table: impl Into<String>) -> Self {
        Self::describe_as(table, DescribeForm::Desc)
    }

    pub fn describe_as(table: impl Into<String>, form: DescribeForm) -> Self {
        Statement::Describe {
            table: table.into().to_lowercase(),
            form,
        }
    }
}

/// A column declared in CREATE TABLE.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub type_name: TypeName,
    pub not_null: bool,
}

/// A table-level constraint clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableConstraint {
    PrimaryKey(Vec<String>),
    ForeignKey {
        column: String,
        ref_table: String,
        ref_column: String,
    },
}

/// CREATE TABLE.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
}

impl CreateTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Adds a column declaration.
    pub fn column(mut self, name: impl Into<String>, type_name: TypeName, not_null: bool) -> Self {
        self.columns.push(ColumnDef {
            name: name.into().to_lowercase(),
            type_name,
            not_null,
        });
        self
    }

    /// Adds a PRIMARY KEY clause.
    pub fn primary_key<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.constraints.push(TableConstraint::PrimaryKey(
            columns.iter().map(|c| c.as_ref().to_lowercase()).collect(),
        ));
        self
    }

    /// Adds a FOREIGN KEY clause.
    pub fn foreign_key(
        mut self,
        column: impl Into<String>,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> Self {
        self.constraints.push(TableConstraint::ForeignKey {
            column: column.into().to_lowercase(),
            ref_table: ref_table.into().to_lowercase(),
            ref_column: ref_column.into().to_lowercase(),
        });
        self
    }
}

impl From<CreateTable> for Statement {
    fn from(create: CreateTable) -> Self {
        Statement::CreateTable(create)
    }
}

/// The select list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Projection {
    All,
    Columns(Vec<ColumnName>),
}

/// SELECT.
#[derive(Clone, Debug, PartialEq)]
pub struct Select {
    pub projection: Projection,
    pub from: Vec<String>,
    pub selection: Option<WhereClause>,
}

impl Select {
    /// Creates `SELECT * FROM tables`.
    pub fn new<S: AsRef<str>>(tables: &[S]) -> Self {
        Self {
            projection: Projection::All,
            from: tables.iter().map(|t| t.as_ref().to_lowercase()).collect(),
            selection: None,
        }
    }

    /// Replaces `*` with an explicit column list.
    pub fn columns(mut self, columns: Vec<ColumnName>) -> Self {
        self.projection = Projection::Columns(columns);
        self
    }

    pub fn filter(mut self, selection: WhereClause) -> Self {
        self.selection = Some(selection);
        self
    }
}

impl From<Select> for Statement {
    fn from(select: Select) -> Self {
        Statement::Select(select)
    }
}

/// INSERT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Insert {
    pub table: String,
    pub columns: Option<Vec<String>>,
    pub values: Vec<Literal>,
}

impl Insert {
    /// Creates `INSERT INTO table VALUES (values)`.
    pub fn new(table: impl Into<String>, values: Vec<Literal>) -> Self {
        Self {
            table: table.into().to_lowercase(),
            columns: None,
            values,
        }
    }

    /// Sets the insert column list.
    pub fn columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.as_ref().to_lowercase()).collect());
        self
    }
}

impl From<Insert> for Statement {
    fn from(insert: Insert) -> Self {
        Statement::Insert(insert)
    }
}

/// DELETE.
#[derive(Clone, Debug, PartialEq)]
pub struct Delete {
    pub table: String,
    pub selection: Option<WhereClause>,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into().to_lowercase(),
            selection: None,
        }
    }

    pub fn filter(mut self, selection: WhereClause) -> Self {
        self.selection = Some(selection);
        self
    }
}

impl From<Delete> for Statement {
    fn from(delete: Delete) -> Self {
        Statement::Delete(delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_fold_case() {
        let create = CreateTable::new("Person")
            .column("ID", TypeName::Int, true)
            .primary_key(&["Id"]);
        assert_eq!(create.name, "person");
        assert_eq!(create.columns[0].name, "id");
        assert_eq!(create.constraints, vec![TableConstraint::PrimaryKey(vec!["id".into()])]);

        let select = Select::new(&["Person", "DEPT"]);
        assert_eq!(select.from, vec!["person".to_string(), "dept".to_string()]);

        let insert = Insert::new("Person", vec![]).columns(&["Name"]);
        assert_eq!(insert.columns, Some(vec!["name".to_string()]));
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(Statement::ShowTables.kind_name(), "show_tables");
        assert_eq!(Statement::desc("t").kind_name(), "describe");
        assert_eq!(Statement::from(Delete::new("t")).kind_name(), "delete");
    }
}
