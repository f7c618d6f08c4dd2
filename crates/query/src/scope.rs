//! Name resolution and WHERE clause compilation.
//!
//! A [`Scope`] describes the columns of the relation a statement works on:
//! every column of every table in the FROM list, in table order, plus an
//! index from column name to the tables that define it.

use crate::ast::{
    BooleanFactor, ColumnName, ColumnRef, Condition, Consequent, EvalType, Filter, Operand,
    ValuePredicate, WhereClause,
};
use hashbrown::HashMap;
use kvsql_core::schema::Table;
use kvsql_core::{Error, Literal, Result, TypeKind};

/// The columns visible to one statement.
#[derive(Clone, Debug)]
pub struct Scope {
    tables: Vec<String>,
    columns: Vec<ColumnRef>,
    owners: HashMap<String, Vec<String>>,
}

impl Scope {
    /// Builds the scope of the cartesian product of `tables`.
    pub fn new(tables: &[Table]) -> Self {
        let mut columns = Vec::new();
        let mut owners: HashMap<String, Vec<String>> = HashMap::new();
        for table in tables {
            for column in table.columns() {
                owners
                    .entry(column.name().to_string())
                    .or_default()
                    .push(table.name().to_string());
                columns.push(ColumnRef::new(
                    table.name(),
                    column.name(),
                    columns.len(),
                    column.data_type(),
                ));
            }
        }
        Self {
            tables: tables.iter().map(|t| t.name().to_string()).collect(),
            columns,
            owners,
        }
    }

    /// Returns the table names in FROM order.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Returns all columns in relation order.
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    fn lookup(&self, table: &str, column: &str) -> Option<&ColumnRef> {
        self.columns
            .iter()
            .find(|c| c.table == table && c.column == column)
    }

    fn check_table(&self, name: &ColumnName) -> Result<()> {
        match &name.table {
            Some(table) if !self.tables.contains(table) => Err(Error::TableNotInScope {
                table: table.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn check_exists(&self, name: &ColumnName) -> Result<()> {
        let exists = match &name.table {
            Some(table) => self.lookup(table, &name.column).is_some(),
            None => self.owners.contains_key(&name.column),
        };
        if exists {
            Ok(())
        } else {
            Err(Error::UnknownColumn {
                column: name.to_string(),
            })
        }
    }

    /// Resolves a WHERE clause column reference.
    pub fn resolve(&self, name: &ColumnName) -> Result<ColumnRef> {
        let name = &name.folded();
        self.check_table(name)?;
        self.check_exists(name)?;
        self.resolve_existing(name)
    }

    fn resolve_existing(&self, name: &ColumnName) -> Result<ColumnRef> {
        let table = match &name.table {
            Some(table) => table.as_str(),
            None => match self.owners.get(&name.column).map(Vec::as_slice) {
                Some([only]) => only.as_str(),
                Some(_) => {
                    return Err(Error::AmbiguousReference {
                        column: name.column.clone(),
                    })
                }
                None => {
                    return Err(Error::UnknownColumn {
                        column: name.to_string(),
                    })
                }
            },
        };
        self.lookup(table, &name.column)
            .cloned()
            .ok_or_else(|| Error::UnknownColumn {
                column: name.to_string(),
            })
    }

    /// Resolves a select-list column. Every failure is a resolution error.
    pub fn resolve_projection(&self, name: &ColumnName) -> Result<ColumnRef> {
        self.resolve(name).map_err(|_| Error::ColumnResolution {
            column: name.folded().to_string(),
        })
    }

    /// Compiles a WHERE clause against this scope.
    pub fn compile(&self, clause: &WhereClause) -> Result<Filter> {
        let first = self.compile_factor(&clause.first)?;
        match &clause.rest {
            None => Ok(Filter::single(first)),
            Some((op, factor)) => Ok(Filter::combine(first, *op, self.compile_factor(factor)?)),
        }
    }

    /// Checks run in a fixed order: qualifiers, a null operand, existence,
    /// ambiguity, then type compatibility.
    fn compile_factor(&self, factor: &BooleanFactor) -> Result<ValuePredicate> {
        let predicate = match &factor.condition {
            Condition::NullTest { column, is_not } => {
                let column = &column.folded();
                self.check_table(column)?;
                self.check_exists(column)?;
                let column = self.resolve_existing(column)?;
                ValuePredicate::null_test(column, *is_not)
            }
            Condition::Comparison { left, op, right } => {
                let left = &left.folded();
                let right = &match right {
                    Operand::Column(name) => Operand::Column(name.folded()),
                    literal => literal.clone(),
                };
                self.check_table(left)?;
                if let Operand::Column(name) = right {
                    self.check_table(name)?;
                }

                if let Operand::Literal(Literal::Null) = right {
                    return Err(Error::incomparable(None, None));
                }

                self.check_exists(left)?;
                if let Operand::Column(name) = right {
                    self.check_exists(name)?;
                }

                let left = self.resolve_existing(left)?;
                let (consequent, right_kind) = match right {
                    Operand::Column(name) => {
                        let column = self.resolve_existing(name)?;
                        let kind = column.data_type.kind();
                        (Consequent::Column(column), kind)
                    }
                    Operand::Literal(literal) => {
                        let kind = literal.kind().ok_or_else(|| {
                            Error::incomparable(Some(left.data_type.kind()), None)
                        })?;
                        (Consequent::Value(literal.to_value()), kind)
                    }
                };

                let left_kind = left.data_type.kind();
                if left_kind != right_kind {
                    return Err(Error::incomparable(Some(left_kind), Some(right_kind)));
                }
                if left_kind == TypeKind::Char && !op.is_equality() {
                    return Err(Error::incomparable(Some(left_kind), Some(right_kind)));
                }

                ValuePredicate::new(left, EvalType::from(*op), consequent)
            }
        };
        Ok(predicate.negate(factor.negated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CompareOp, Predicate};
    use kvsql_core::schema::TableBuilder;
    use kvsql_core::{DataType, Row, TypeName, Value};

    fn scope() -> Scope {
        let person = TableBuilder::new("person")
            .add_column("id", TypeName::Int, false)
            .add_column("name", TypeName::Char(10), false)
            .build()
            .unwrap();
        let pet = TableBuilder::new("pet")
            .add_column("id", TypeName::Int, false)
            .add_column("owner", TypeName::Int, false)
            .add_column("born", TypeName::Date, false)
            .build()
            .unwrap();
        Scope::new(&[person, pet])
    }

    fn cmp(left: ColumnName, op: CompareOp, right: impl Into<Operand>) -> WhereClause {
        WhereClause::single(BooleanFactor::compare(left, op, right))
    }

    #[test]
    fn test_scope_layout() {
        let scope = scope();
        assert_eq!(scope.tables(), &["person".to_string(), "pet".to_string()]);
        assert_eq!(scope.columns().len(), 5);
        let owner = scope.resolve(&ColumnName::new("owner")).unwrap();
        assert_eq!(owner.index, 3);
        assert_eq!(owner.table, "pet");
        assert_eq!(owner.data_type, DataType::Int);
    }

    #[test]
    fn test_ambiguous_unless_qualified() {
        let scope = scope();
        assert!(matches!(
            scope.resolve(&ColumnName::new("id")),
            Err(Error::AmbiguousReference { .. })
        ));
        assert_eq!(scope.resolve(&ColumnName::qualified("pet", "id")).unwrap().index, 2);
    }

    #[test]
    fn test_resolution_errors() {
        let scope = scope();
        assert!(matches!(
            scope.resolve(&ColumnName::qualified("house", "id")),
            Err(Error::TableNotInScope { .. })
        ));
        assert!(matches!(
            scope.resolve(&ColumnName::new("age")),
            Err(Error::UnknownColumn { .. })
        ));
        assert!(matches!(
            scope.resolve(&ColumnName::qualified("person", "owner")),
            Err(Error::UnknownColumn { .. })
        ));
        assert_eq!(
            scope.resolve_projection(&ColumnName::new("id")).unwrap_err(),
            Error::ColumnResolution { column: "id".into() }
        );
    }

    #[test]
    fn test_incomparable_types() {
        let scope = scope();
        let incomparable = |clause: WhereClause| {
            matches!(scope.compile(&clause), Err(Error::IncomparableTypes { .. }))
        };

        assert!(incomparable(cmp(ColumnName::new("name"), CompareOp::Lt, Literal::from("x"))));
        assert!(incomparable(cmp(ColumnName::new("name"), CompareOp::Eq, Literal::Int(1))));
        assert!(incomparable(cmp(ColumnName::new("owner"), CompareOp::Eq, Literal::Null)));
        assert!(incomparable(cmp(
            ColumnName::new("born"),
            CompareOp::Eq,
            Literal::from("2020-01-01")
        )));
        assert!(incomparable(cmp(
            ColumnName::new("owner"),
            CompareOp::Eq,
            ColumnName::new("born")
        )));
        assert!(scope
            .compile(&cmp(ColumnName::new("name"), CompareOp::Ne, Literal::from("x")))
            .is_ok());
        assert!(scope
            .compile(&cmp(
                ColumnName::new("born"),
                CompareOp::Ge,
                Literal::Date("2020-01-01".into())
            ))
            .is_ok());
    }

    #[test]
    fn test_check_order() {
        let scope = scope();
        // An out-of-scope qualifier is reported before an unknown column.
        let clause = cmp(
            ColumnName::new("age"),
            CompareOp::Eq,
            ColumnName::qualified("house", "id"),
        );
        assert!(matches!(scope.compile(&clause), Err(Error::TableNotInScope { .. })));

        // A null operand is reported before an ambiguous column.
        let clause = cmp(ColumnName::new("id"), CompareOp::Eq, Literal::Null);
        assert!(matches!(scope.compile(&clause), Err(Error::IncomparableTypes { .. })));

        // A missing column is reported before an ambiguous one.
        let clause = cmp(ColumnName::new("id"), CompareOp::Eq, ColumnName::new("age"));
        assert!(matches!(scope.compile(&clause), Err(Error::UnknownColumn { .. })));
    }

    #[test]
    fn test_null_test_skips_type_checks() {
        let scope = scope();
        let clause = WhereClause::single(BooleanFactor::is_not_null(ColumnName::new("name")).not());
        let filter = scope.compile(&clause).unwrap();
        let row = Row::dummy(vec![
            Value::Int(1),
            Value::Null,
            Value::Int(2),
            Value::Int(1),
            Value::Date("2020-01-01".into()),
        ]);
        assert!(filter.eval(&row));
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let scope = scope();
        let mixed = ColumnName {
            table: Some("Pet".into()),
            column: "OWNER".into(),
        };
        assert_eq!(scope.resolve(&mixed).unwrap().index, 3);
        assert_eq!(scope.resolve_projection(&mixed).unwrap().normalized_name(), "pet.owner");

        let clause = WhereClause::single(BooleanFactor {
            negated: false,
            condition: Condition::Comparison {
                left: ColumnName {
                    table: Some("PERSON".into()),
                    column: "Id".into(),
                },
                op: CompareOp::Eq,
                right: Operand::Column(mixed),
            },
        });
        let filter = scope.compile(&clause).unwrap();
        let row = Row::dummy(vec![
            Value::Int(4),
            Value::Null,
            Value::Int(9),
            Value::Int(4),
            Value::Null,
        ]);
        assert!(filter.eval(&row));

        let unknown = ColumnName {
            table: Some("House".into()),
            column: "Id".into(),
        };
        assert_eq!(
            scope.resolve_projection(&unknown).unwrap_err(),
            Error::ColumnResolution { column: "house.id".into() }
        );
    }

    #[test]
    fn test_compile_join_condition() {
        let scope = scope();
        let clause = WhereClause::and(
            BooleanFactor::compare(
                ColumnName::qualified("person", "id"),
                CompareOp::Eq,
                ColumnName::new("owner"),
            ),
            BooleanFactor::compare(ColumnName::new("name"), CompareOp::Eq, Literal::from("Ann")),
        );
        let filter = scope.compile(&clause).unwrap();
        let matching = Row::dummy(vec![
            Value::Int(1),
            Value::Text("Ann".into()),
            Value::Int(9),
            Value::Int(1),
            Value::Null,
        ]);
        let other = Row::dummy(vec![
            Value::Int(2),
            Value::Text("Ann".into()),
            Value::Int(9),
            Value::Int(1),
            Value::Null,
        ]);
        assert!(filter.eval(&matching));
        assert!(!filter.eval(&other));
    }
}
