//! Filter executor.

use crate::ast::Predicate;
use crate::executor::Relation;

/// Filter executor - keeps the rows a predicate accepts.
pub struct FilterExecutor<P: Predicate> {
    predicate: P,
}

impl<P: Predicate> FilterExecutor<P> {
    /// Creates a new filter executor.
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }

    /// Executes the filter on the input relation.
    pub fn execute(&self, input: Relation) -> Relation {
        let Relation {
            rows,
            tables,
            table_column_counts,
        } = input;
        let rows = rows
            .into_iter()
            .filter(|row| self.predicate.eval(row))
            .collect();

        Relation {
            rows,
            tables,
            table_column_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnRef, Consequent, EvalType, ValuePredicate};
    use kvsql_core::{DataType, Row, Value};

    #[test]
    fn test_filter_executor() {
        let rows = vec![
            Row::new(1, vec![Value::Int(10)]),
            Row::new(2, vec![Value::Int(20)]),
            Row::new(3, vec![Value::Null]),
            Row::new(4, vec![Value::Int(30)]),
        ];
        let input = Relation::from_rows(rows, "t", 1);

        let col = ColumnRef::new("t", "value", 0, DataType::Int);
        let pred = ValuePredicate::new(col, EvalType::Gt, Consequent::Value(Value::Int(15)));
        let result = FilterExecutor::new(pred).execute(input);

        assert_eq!(result.len(), 2);
        assert_eq!(result.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(result.tables, ["t".to_string()]);
    }
}
