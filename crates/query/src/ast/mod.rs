//! AST module for statements, expressions and predicates.

mod expr;
mod predicate;
mod statement;

pub use expr::{
    BooleanFactor, ColumnName, ColumnRef, CompareOp, Condition, LogicalOp, Operand, WhereClause,
};
pub use predicate::{Consequent, EvalType, Filter, Predicate, ValuePredicate};
pub use statement::{
    ColumnDef, CreateTable, Delete, DescribeForm, Insert, Projection, Select, Statement,
    TableConstraint,
};
