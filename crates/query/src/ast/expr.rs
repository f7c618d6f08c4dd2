//! Expression AST definitions: column names, operands and WHERE clauses.

use kvsql_core::{DataType, Literal};

/// A column as written in a statement, optionally qualified by table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnName {
    pub table: Option<String>,
    pub column: String,
}

impl ColumnName {
    /// An unqualified column name.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into().to_lowercase(),
        }
    }

    /// A `table.column` name.
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into().to_lowercase()),
            column: column.into().to_lowercase(),
        }
    }

    /// Returns this name with qualifier and column lower-cased.
    pub(crate) fn folded(&self) -> Self {
        Self {
            table: self.table.as_ref().map(|t| t.to_lowercase()),
            column: self.column.to_lowercase(),
        }
    }
}

impl core::fmt::Display for ColumnName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.column),
            None => f.write_str(&self.column),
        }
    }
}

/// Reference to a resolved column of a relation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Owning table.
    pub table: String,
    /// Column name.
    pub column: String,
    /// Position of the column in the relation's rows.
    pub index: usize,
    /// Declared type of the column.
    pub data_type: DataType,
}

impl ColumnRef {
    /// Creates a new column reference.
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        index: usize,
        data_type: DataType,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            index,
            data_type,
        }
    }

    /// Returns the normalized name (table.column).
    pub fn normalized_name(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Returns true if the operator only needs equality.
    pub fn is_equality(&self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }
}

/// Logical operator for combining predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// Right-hand side of a comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Column(ColumnName),
    Literal(Literal),
}

impl From<ColumnName> for Operand {
    fn from(column: ColumnName) -> Self {
        Operand::Column(column)
    }
}

impl From<Literal> for Operand {
    fn from(literal: Literal) -> Self {
        Operand::Literal(literal)
    }
}

/// A single condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// `left op right`
    Comparison {
        left: ColumnName,
        op: CompareOp,
        right: Operand,
    },
    /// `column IS [NOT] NULL`
    NullTest { column: ColumnName, is_not: bool },
}

/// A condition with an optional leading NOT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BooleanFactor {
    pub negated: bool,
    pub condition: Condition,
}

impl BooleanFactor {
    pub fn compare(left: ColumnName, op: CompareOp, right: impl Into<Operand>) -> Self {
        Self {
            negated: false,
            condition: Condition::Comparison {
                left,
                op,
                right: right.into(),
            },
        }
    }

    pub fn is_null(column: ColumnName) -> Self {
        Self {
            negated: false,
            condition: Condition::NullTest {
                column,
                is_not: false,
            },
        }
    }

    pub fn is_not_null(column: ColumnName) -> Self {
        Self {
            negated: false,
            condition: Condition::NullTest {
                column,
                is_not: true,
            },
        }
    }

    /// Prefixes the condition with NOT.
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

/// A WHERE clause: one condition, or two joined by AND or OR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhereClause {
    pub first: BooleanFactor,
    pub rest: Option<(LogicalOp, BooleanFactor)>,
}

impl WhereClause {
    pub fn single(factor: BooleanFactor) -> Self {
        Self {
            first: factor,
            rest: None,
        }
    }

    pub fn and(left: BooleanFactor, right: BooleanFactor) -> Self {
        Self {
            first: left,
            rest: Some((LogicalOp::And, right)),
        }
    }

    pub fn or(left: BooleanFactor, right: BooleanFactor) -> Self {
        Self {
            first: left,
            rest: Some((LogicalOp::Or, right)),
        }
    }

    /// Iterates over the factors in written order.
    pub fn factors(&self) -> impl Iterator<Item = &BooleanFactor> {
        core::iter::once(&self.first).chain(self.rest.as_ref().map(|(_, f)| f))
    }
}
