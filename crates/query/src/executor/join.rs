//! Cartesian product of relations.

use crate::executor::Relation;
use kvsql_core::Row;

/// Nested loop cross join.
///
/// Pairs every left row with every right row, left values first. Filtering
/// always happens afterwards, over the combined rows.
pub struct CrossJoin;

impl CrossJoin {
    /// Executes the cross join.
    pub fn execute(left: Relation, right: Relation) -> Relation {
        let mut rows = Vec::with_capacity(left.len() * right.len());
        for left_row in left.iter() {
            for right_row in right.iter() {
                rows.push(Row::concat(left_row, right_row));
            }
        }

        let mut tables = left.tables;
        tables.extend(right.tables);
        let mut table_column_counts = left.table_column_counts;
        table_column_counts.extend(right.table_column_counts);

        Relation {
            rows,
            tables,
            table_column_counts,
        }
    }
}

/// Folds relations left to right into their cartesian product.
///
/// Any empty input yields an empty product. Returns None for no inputs.
pub fn cross_product(relations: Vec<Relation>) -> Option<Relation> {
    relations.into_iter().reduce(CrossJoin::execute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvsql_core::Value;
    use proptest::prelude::*;

    fn relation(table: &str, values: &[i64]) -> Relation {
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, v)| Row::new(i as u64, vec![Value::Int(*v)]))
            .collect();
        Relation::from_rows(rows, table, 1)
    }

    #[test]
    fn test_cross_join_pairs_every_row() {
        let result = CrossJoin::execute(relation("a", &[1, 2]), relation("b", &[10, 20, 30]));
        assert_eq!(result.len(), 6);
        assert_eq!(result.tables, ["a".to_string(), "b".to_string()]);
        assert_eq!(result.column_count(), 2);
        assert_eq!(result.rows[0].values(), &[Value::Int(1), Value::Int(10)]);
        assert_eq!(result.rows[5].values(), &[Value::Int(2), Value::Int(30)]);
        assert!(result.rows.iter().all(|r| r.is_dummy()));
    }

    #[test]
    fn test_cross_product_three_tables() {
        let result = cross_product(vec![
            relation("a", &[1, 2]),
            relation("b", &[3]),
            relation("c", &[4, 5]),
        ])
        .unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(result.table_column_counts, [1, 1, 1]);
        assert_eq!(result.rows[1].values(), &[Value::Int(1), Value::Int(3), Value::Int(5)]);
    }

    #[test]
    fn test_empty_participant_yields_empty_product() {
        let result = cross_product(vec![relation("a", &[1, 2]), relation("b", &[])]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.column_count(), 2);
        assert!(cross_product(Vec::new()).is_none());
    }

    proptest! {
        #[test]
        fn prop_cardinality_is_product(
            a in prop::collection::vec(any::<i64>(), 0..6),
            b in prop::collection::vec(any::<i64>(), 0..6),
            c in prop::collection::vec(any::<i64>(), 0..6),
        ) {
            let result = cross_product(vec![
                relation("a", &a),
                relation("b", &b),
                relation("c", &c),
            ]).unwrap();
            prop_assert_eq!(result.len(), a.len() * b.len() * c.len());
            prop_assert!(result.iter().all(|r| r.len() == 3));
        }
    }
}
