//! Statement execution.
//!
//! [`QueryExecutor`] runs one parsed statement against a catalog and turns
//! the outcome into a [`QueryResult`]. Every check happens before the first
//! write, so a rejected statement leaves the store untouched.

use crate::ast::{
    CreateTable, Delete, Filter, Insert, Projection, Select, Statement, TableConstraint,
};
use crate::executor::{
    cross_product, FilterExecutor, ProjectExecutor, Relation, TableScanExecutor,
};
use crate::render::{render_result_set, render_schema, render_table_list};
use crate::result::{QueryResult, ResultSet};
use crate::scope::Scope;
use kvsql_core::schema::{Table, TableBuilder};
use kvsql_core::{Error, Result, RowId};
use kvsql_storage::{Catalog, CharLengthPolicy, ConstraintChecker, KvStore};
use tracing::{debug, debug_span, warn};

/// Knobs that change how statements are checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// What to do with a Char value longer than its column.
    pub char_policy: CharLengthPolicy,
}

/// Executes statements against one store.
pub struct QueryExecutor<'a, S: KvStore> {
    catalog: Catalog<'a, S>,
    options: ExecutionOptions,
}

impl<'a, S: KvStore> QueryExecutor<'a, S> {
    /// Creates an executor over `store`.
    pub fn new(store: &'a mut S, options: ExecutionOptions) -> Self {
        Self {
            catalog: Catalog::new(store),
            options,
        }
    }

    /// Executes one statement.
    pub fn execute(&mut self, statement: &Statement) -> QueryResult {
        let span = debug_span!("statement", kind = statement.kind_name());
        let _enter = span.enter();

        match self.dispatch(statement) {
            Ok(result) => result,
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "statement rejected");
                QueryResult::failure(&err)
            }
        }
    }

    fn dispatch(&mut self, statement: &Statement) -> Result<QueryResult> {
        match statement {
            Statement::CreateTable(create) => self.create_table(create),
            Statement::DropTable { name } => self.drop_table(name),
            Statement::Describe { table, .. } => self.describe(table),
            Statement::ShowTables => self.show_tables(),
            Statement::Select(select) => self.select(select),
            Statement::Insert(insert) => self.insert(insert),
            Statement::Delete(delete) => self.delete(delete),
        }
    }

    fn create_table(&mut self, create: &CreateTable) -> Result<QueryResult> {
        let mut builder = TableBuilder::new(create.name.as_str());
        for column in &create.columns {
            builder = builder.add_column(column.name.as_str(), column.type_name, column.not_null);
        }
        for constraint in &create.constraints {
            builder = match constraint {
                TableConstraint::PrimaryKey(columns) => builder.add_primary_key(columns.as_slice()),
                TableConstraint::ForeignKey {
                    column,
                    ref_table,
                    ref_column,
                } => builder.add_foreign_key(
                    column.as_str(),
                    ref_table.as_str(),
                    ref_column.as_str(),
                ),
            };
        }
        let table = builder.build()?;

        ConstraintChecker::check_create(&self.catalog, &table)?;
        self.catalog.create_table(&table)?;
        Ok(QueryResult::success(format!(
            "'{}' table is created",
            table.name()
        )))
    }

    fn drop_table(&mut self, name: &str) -> Result<QueryResult> {
        let name = name.to_lowercase();
        self.catalog.drop_table(&name)?;
        Ok(QueryResult::success(format!("'{}' table is dropped", name)))
    }

    fn describe(&self, table: &str) -> Result<QueryResult> {
        let table = self.catalog.load_table(&table.to_lowercase())?;
        Ok(QueryResult::success(render_schema(&table)))
    }

    fn show_tables(&self) -> Result<QueryResult> {
        let tables = self.catalog.list_tables()?;
        Ok(QueryResult::success(render_table_list(&tables)))
    }

    fn select(&self, select: &Select) -> Result<QueryResult> {
        let mut tables = Vec::with_capacity(select.from.len());
        for name in &select.from {
            let name = name.to_lowercase();
            if !self.catalog.table_exists(&name)? {
                return Err(Error::SelectTableNotFound { name });
            }
            tables.push(self.catalog.load_table(&name)?);
        }

        let scope = Scope::new(&tables);
        let filter = select
            .selection
            .as_ref()
            .map(|clause| scope.compile(clause))
            .transpose()?;
        let columns = match &select.projection {
            Projection::All => scope.columns().to_vec(),
            Projection::Columns(names) => names
                .iter()
                .map(|name| scope.resolve_projection(name))
                .collect::<Result<Vec<_>>>()?,
        };

        let relations = tables
            .iter()
            .map(|table| TableScanExecutor::new(table).execute(&self.catalog))
            .collect::<Result<Vec<_>>>()?;
        let product = cross_product(relations).unwrap_or_default();
        let matched = apply_filter(product, filter);

        let project = ProjectExecutor::new(columns);
        let rows = ResultSet::new(project.column_names(), project.execute(matched));
        debug!(tables = tables.len(), rows = rows.len(), "selection done");
        Ok(QueryResult::success(render_result_set(&rows)).with_rows(rows))
    }

    fn insert(&mut self, insert: &Insert) -> Result<QueryResult> {
        let table = self.catalog.load_table(&insert.table.to_lowercase())?;
        let values = ConstraintChecker::build_insert_row(
            &self.catalog,
            &table,
            insert.columns.as_deref(),
            &insert.values,
            self.options.char_policy,
        )?;
        self.catalog.insert_row(table.name(), values)?;
        Ok(QueryResult::success("1 row inserted"))
    }

    fn delete(&mut self, delete: &Delete) -> Result<QueryResult> {
        let table = self.catalog.load_table(&delete.table.to_lowercase())?;
        let filter = match &delete.selection {
            Some(clause) => Some(Scope::new(std::slice::from_ref(&table)).compile(clause)?),
            None => None,
        };

        let candidates = apply_filter(TableScanExecutor::new(&table).execute(&self.catalog)?, filter);
        ConstraintChecker::check_delete(&self.catalog, &table, &candidates.rows)?;

        let ids: Vec<RowId> = candidates.iter().map(|row| row.id()).collect();
        let removed = delete_all(&mut self.catalog, &table, &ids)?;
        Ok(QueryResult::success(format!("{} row(s) deleted", removed)))
    }
}

fn apply_filter(input: Relation, filter: Option<Filter>) -> Relation {
    match filter {
        Some(filter) => FilterExecutor::new(filter).execute(input),
        None => input,
    }
}

fn delete_all<S: KvStore>(catalog: &mut Catalog<'_, S>, table: &Table, ids: &[RowId]) -> Result<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    catalog.delete_rows(table.name(), ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BooleanFactor, ColumnName, CompareOp, DescribeForm, WhereClause};
    use kvsql_core::{ErrorKind, Literal, TypeName, Value};
    use kvsql_storage::MemoryStore;

    fn run(store: &mut MemoryStore, statement: impl Into<Statement>) -> QueryResult {
        QueryExecutor::new(store, ExecutionOptions::default()).execute(&statement.into())
    }

    fn setup() -> MemoryStore {
        let mut store = MemoryStore::new();
        let dept = CreateTable::new("dept")
            .column("id", TypeName::Int, true)
            .column("name", TypeName::Char(10), false)
            .primary_key(&["id"]);
        let emp = CreateTable::new("emp")
            .column("id", TypeName::Int, true)
            .column("dept_id", TypeName::Int, false)
            .primary_key(&["id"])
            .foreign_key("dept_id", "dept", "id");
        assert!(!run(&mut store, dept).is_error());
        assert!(!run(&mut store, emp).is_error());
        store
    }

    fn insert(store: &mut MemoryStore, table: &str, values: Vec<Literal>) -> QueryResult {
        run(store, Insert::new(table, values))
    }

    #[test]
    fn test_create_and_show() {
        let mut store = setup();
        let result = run(&mut store, Statement::ShowTables);
        let rule = "-".repeat(24);
        assert_eq!(result.message(), format!("{rule}\ndept\nemp\n{rule}"));

        let again = run(&mut store, CreateTable::new("DEPT").column("x", TypeName::Int, false));
        assert!(again.is_error());
        assert_eq!(again.kind(), Some(ErrorKind::Catalog));
    }

    #[test]
    fn test_create_reports_messages() {
        let mut store = MemoryStore::new();
        let result = run(&mut store, CreateTable::new("T").column("a", TypeName::Int, false));
        assert_eq!(result.message(), "'t' table is created");
        let result = run(&mut store, Statement::drop_table("t"));
        assert_eq!(result.message(), "'t' table is dropped");
        let result = run(&mut store, Statement::drop_table("t"));
        assert_eq!(result.message(), "No such table");
    }

    #[test]
    fn test_describe_missing_table() {
        let mut store = MemoryStore::new();
        let result = run(&mut store, Statement::desc("ghost"));
        assert!(result.is_error());
        assert_eq!(result.message(), "No such table");
    }

    #[test]
    fn test_insert_then_select_all() {
        let mut store = setup();
        let result = insert(&mut store, "dept", vec![Literal::Int(1), Literal::Str("Sales".into())]);
        assert_eq!(result.message(), "1 row inserted");
        insert(&mut store, "dept", vec![Literal::Int(2), Literal::Null]);

        let result = run(&mut store, Select::new(&["dept"]));
        assert!(!result.is_error());
        let rows = result.rows().unwrap();
        assert_eq!(rows.columns, vec!["dept.id", "dept.name"]);
        assert_eq!(rows.records, vec![
            vec![Value::Int(1), Value::Text("Sales".into())],
            vec![Value::Int(2), Value::Null],
        ]);
        assert!(result.message().contains("DEPT.ID"));
        assert!(result.message().contains("NULL"));
    }

    #[test]
    fn test_select_join_with_where() {
        let mut store = setup();
        insert(&mut store, "dept", vec![Literal::Int(1), Literal::Str("Sales".into())]);
        insert(&mut store, "dept", vec![Literal::Int(2), Literal::Str("Ops".into())]);
        insert(&mut store, "emp", vec![Literal::Int(10), Literal::Int(1)]);
        insert(&mut store, "emp", vec![Literal::Int(11), Literal::Int(2)]);
        insert(&mut store, "emp", vec![Literal::Int(12), Literal::Int(2)]);

        let all = run(&mut store, Select::new(&["dept", "emp"]));
        assert_eq!(all.rows().unwrap().len(), 6);

        let joined = Select::new(&["dept", "emp"])
            .columns(vec![
                ColumnName::new("name"),
                ColumnName::qualified("emp", "id"),
            ])
            .filter(WhereClause::single(BooleanFactor::compare(
                ColumnName::qualified("dept", "id"),
                CompareOp::Eq,
                ColumnName::new("dept_id"),
            )));
        let result = run(&mut store, joined);
        let rows = result.rows().unwrap();
        assert_eq!(rows.columns, vec!["dept.name", "emp.id"]);
        assert_eq!(rows.records, vec![
            vec![Value::Text("Sales".into()), Value::Int(10)],
            vec![Value::Text("Ops".into()), Value::Int(11)],
            vec![Value::Text("Ops".into()), Value::Int(12)],
        ]);
    }

    #[test]
    fn test_select_errors() {
        let mut store = setup();
        let result = run(&mut store, Select::new(&["dept", "ghost"]));
        assert_eq!(result.message(), "Selection has failed: 'ghost' does not exist");

        let ambiguous = Select::new(&["dept", "emp"]).columns(vec![ColumnName::new("id")]);
        let result = run(&mut store, ambiguous);
        assert_eq!(result.message(), "Selection has failed: fail to resolve 'id'");

        let bad_where = Select::new(&["dept", "emp"]).filter(WhereClause::single(
            BooleanFactor::compare(ColumnName::new("id"), CompareOp::Eq, Literal::Int(1)),
        ));
        let result = run(&mut store, bad_where);
        assert_eq!(result.kind(), Some(ErrorKind::WhereClause));
    }

    #[test]
    fn test_delete_with_referential_gate() {
        let mut store = setup();
        insert(&mut store, "dept", vec![Literal::Int(1), Literal::Str("Sales".into())]);
        insert(&mut store, "dept", vec![Literal::Int(2), Literal::Str("Ops".into())]);
        insert(&mut store, "emp", vec![Literal::Int(10), Literal::Int(1)]);

        let result = run(&mut store, Delete::new("dept"));
        assert_eq!(
            result.message(),
            "2 row(s) are not deleted due to referential integrity"
        );
        assert_eq!(result.kind(), Some(ErrorKind::Integrity));

        let only_ops = Delete::new("dept").filter(WhereClause::single(BooleanFactor::compare(
            ColumnName::new("id"),
            CompareOp::Eq,
            Literal::Int(2),
        )));
        assert_eq!(run(&mut store, only_ops).message(), "1 row(s) deleted");

        let none = Delete::new("dept").filter(WhereClause::single(BooleanFactor::is_null(
            ColumnName::new("name"),
        )));
        assert_eq!(run(&mut store, none).message(), "0 row(s) deleted");

        let rows = run(&mut store, Select::new(&["dept"]));
        assert_eq!(rows.rows().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_where_naming_other_table() {
        let mut store = setup();
        insert(&mut store, "dept", vec![Literal::Int(1), Literal::Str("Sales".into())]);
        insert(&mut store, "emp", vec![Literal::Int(10), Literal::Int(1)]);

        let cross = Delete::new("dept").filter(WhereClause::single(BooleanFactor::compare(
            ColumnName::qualified("emp", "id"),
            CompareOp::Eq,
            Literal::Int(10),
        )));
        let result = run(&mut store, cross);
        assert_eq!(result.kind(), Some(ErrorKind::WhereClause));
        assert_eq!(
            result.message(),
            "Where clause trying to reference tables which are not specified"
        );
        assert_eq!(run(&mut store, Select::new(&["dept"])).rows().unwrap().len(), 1);
        assert_eq!(run(&mut store, Select::new(&["emp"])).rows().unwrap().len(), 1);
    }

    #[test]
    fn test_identifiers_fold_case_in_raw_statements() {
        let mut store = setup();
        insert(&mut store, "dept", vec![Literal::Int(1), Literal::Str("Sales".into())]);
        insert(&mut store, "dept", vec![Literal::Int(2), Literal::Str("Ops".into())]);

        let select = Select {
            projection: Projection::Columns(vec![ColumnName {
                table: Some("Dept".into()),
                column: "NAME".into(),
            }]),
            from: vec!["DEPT".into()],
            selection: Some(WhereClause::single(BooleanFactor::compare(
                ColumnName {
                    table: Some("Dept".into()),
                    column: "Id".into(),
                },
                CompareOp::Eq,
                Literal::Int(1),
            ))),
        };
        let result = run(&mut store, select);
        assert!(!result.is_error(), "{}", result.message());
        let rows = result.rows().unwrap();
        assert_eq!(rows.columns, vec!["dept.name"]);
        assert_eq!(rows.records, vec![vec![Value::Text("Sales".into())]]);

        let delete = Delete {
            table: "Dept".into(),
            selection: Some(WhereClause::single(BooleanFactor::is_null(ColumnName {
                table: Some("DEPT".into()),
                column: "Name".into(),
            }))),
        };
        assert_eq!(run(&mut store, delete).message(), "0 row(s) deleted");
    }

    #[test]
    fn test_describe_aliases_render_like_desc() {
        let mut store = setup();
        let desc = run(&mut store, Statement::desc("emp"));
        assert!(!desc.is_error());
        for form in [DescribeForm::Describe, DescribeForm::Explain] {
            let result = run(&mut store, Statement::describe_as("EMP", form));
            assert_eq!(result, desc);
            let missing = run(&mut store, Statement::describe_as("ghost", form));
            assert_eq!(missing.message(), "No such table");
        }
    }

    #[test]
    fn test_rejected_insert_leaves_store_unchanged() {
        let mut store = setup();
        insert(&mut store, "dept", vec![Literal::Int(1), Literal::Str("Sales".into())]);
        let dup = insert(&mut store, "dept", vec![Literal::Int(1), Literal::Str("Dup".into())]);
        assert_eq!(dup.message(), "Insertion has failed: Primary key duplication");
        let dangling = insert(&mut store, "emp", vec![Literal::Int(5), Literal::Int(9)]);
        assert_eq!(dangling.kind(), Some(ErrorKind::Integrity));

        assert_eq!(run(&mut store, Select::new(&["dept"])).rows().unwrap().len(), 1);
        assert_eq!(run(&mut store, Select::new(&["emp"])).rows().unwrap().len(), 0);
    }

    #[test]
    fn test_strict_char_policy() {
        let mut store = setup();
        let options = ExecutionOptions {
            char_policy: CharLengthPolicy::Reject,
        };
        let long = Insert::new("dept", vec![Literal::Int(1), Literal::Str("Research and development".into())]);
        let result = QueryExecutor::new(&mut store, options).execute(&long.clone().into());
        assert_eq!(result.kind(), Some(ErrorKind::DmlType));

        let result = run(&mut store, long);
        assert!(!result.is_error());
        let rows = run(&mut store, Select::new(&["dept"]));
        assert_eq!(
            rows.rows().unwrap().value(0, "dept.name"),
            Some(&Value::Text("Research a".into()))
        );
    }
}
