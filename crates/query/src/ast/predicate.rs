//! Predicate definitions for query filtering.
//!
//! A WHERE clause compiles into a [`Filter`]: one or two [`ValuePredicate`]s
//! over resolved column positions, combined with AND or OR.

use crate::ast::expr::{ColumnRef, CompareOp, LogicalOp};
use core::cmp::Ordering;
use kvsql_core::{Row, Value};

/// Evaluation type for predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvalType {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Is,
    IsNot,
}

impl From<CompareOp> for EvalType {
    fn from(op: CompareOp) -> Self {
        match op {
            CompareOp::Eq => EvalType::Eq,
            CompareOp::Ne => EvalType::Ne,
            CompareOp::Lt => EvalType::Lt,
            CompareOp::Le => EvalType::Le,
            CompareOp::Gt => EvalType::Gt,
            CompareOp::Ge => EvalType::Ge,
        }
    }
}

impl EvalType {
    /// Applies a comparison operator to an ordering. Null tests never match.
    fn matches(self, ordering: Ordering) -> bool {
        match self {
            EvalType::Eq => ordering == Ordering::Equal,
            EvalType::Ne => ordering != Ordering::Equal,
            EvalType::Lt => ordering == Ordering::Less,
            EvalType::Le => ordering != Ordering::Greater,
            EvalType::Gt => ordering == Ordering::Greater,
            EvalType::Ge => ordering != Ordering::Less,
            EvalType::Is | EvalType::IsNot => false,
        }
    }
}

/// A predicate that can be evaluated against rows.
pub trait Predicate {
    /// Evaluates the predicate against a row.
    fn eval(&self, row: &Row) -> bool;
}

/// What a column is compared against.
#[derive(Clone, Debug, PartialEq)]
pub enum Consequent {
    /// The null test form.
    Null,
    /// A literal value.
    Value(Value),
    /// Another column of the same row.
    Column(ColumnRef),
}

/// A single resolved condition.
#[derive(Clone, Debug, PartialEq)]
pub struct ValuePredicate {
    pub negated: bool,
    pub column: ColumnRef,
    pub eval_type: EvalType,
    pub consequent: Consequent,
}

impl ValuePredicate {
    pub fn new(column: ColumnRef, eval_type: EvalType, consequent: Consequent) -> Self {
        Self {
            negated: false,
            column,
            eval_type,
            consequent,
        }
    }

    /// `column IS NULL`, or `column IS NOT NULL` when `is_not`.
    pub fn null_test(column: ColumnRef, is_not: bool) -> Self {
        let eval_type = if is_not { EvalType::IsNot } else { EvalType::Is };
        Self::new(column, eval_type, Consequent::Null)
    }

    pub fn negate(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    fn test(&self, row: &Row) -> bool {
        let left = match row.get(self.column.index) {
            Some(v) => v,
            None => return false,
        };

        let right = match &self.consequent {
            Consequent::Null => return (self.eval_type == EvalType::Is) == left.is_null(),
            Consequent::Value(v) => v,
            Consequent::Column(c) => match row.get(c.index) {
                Some(v) => v,
                None => return false,
            },
        };

        if left.is_null() || right.is_null() {
            return false;
        }

        left.compare(right)
            .map_or(false, |ordering| self.eval_type.matches(ordering))
    }
}

impl Predicate for ValuePredicate {
    fn eval(&self, row: &Row) -> bool {
        self.test(row) != self.negated
    }
}

/// A compiled WHERE clause.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub first: ValuePredicate,
    pub rest: Option<(LogicalOp, ValuePredicate)>,
}

impl Filter {
    pub fn single(predicate: ValuePredicate) -> Self {
        Self {
            first: predicate,
            rest: None,
        }
    }

    pub fn combine(left: ValuePredicate, op: LogicalOp, right: ValuePredicate) -> Self {
        Self {
            first: left,
            rest: Some((op, right)),
        }
    }
}

impl Predicate for Filter {
    fn eval(&self, row: &Row) -> bool {
        let first = self.first.eval(row);
        match &self.rest {
            None => first,
            Some((LogicalOp::And, second)) => first & second.eval(row),
            Some((LogicalOp::Or, second)) => first | second.eval(row),
        }
    }
}
