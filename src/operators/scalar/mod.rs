//! Scalar expressions.

use std::convert::TryFrom;

use crate::operators::scalar::aggregates::AggregateFunction;
use crate::operators::scalar::value::ScalarValue;

pub mod aggregates;
pub mod expr;
pub mod value;

pub use expr::{BinaryOp, ScalarExpr};

/// Creates a reference to a column with the given name.
/// The name is resolved by the [OperatorBuilder](crate::operators::builder::OperatorBuilder).
pub fn col(name: &str) -> ScalarExpr {
    ScalarExpr::ColumnName(name.into())
}

/// Creates a constant expression.
pub fn scalar<T>(value: T) -> ScalarExpr
where
    T: Into<ScalarValue>,
{
    ScalarExpr::Scalar(value.into())
}

/// Creates an alias `expr AS name`.
pub fn alias(expr: ScalarExpr, name: &str) -> ScalarExpr {
    ScalarExpr::Alias(Box::new(expr), name.into())
}

/// Creates a `count(*)` aggregate.
pub fn count_star() -> ScalarExpr {
    ScalarExpr::Aggregate {
        func: AggregateFunction::Count,
        distinct: false,
        args: vec![],
        filter: None,
    }
}

/// Creates a call to the aggregate function with the given name.
///
/// # Panics
///
/// This function panics if there is no aggregate function with the given name.
pub fn aggr(func: &str, args: Vec<ScalarExpr>) -> ScalarExpr {
    let func = AggregateFunction::try_from(func).unwrap_or_else(|_| panic!("Unknown aggregate function: {}", func));
    ScalarExpr::Aggregate {
        func,
        distinct: false,
        args,
        filter: None,
    }
}

/// Creates a binary expression `lhs op rhs`.
pub fn binary(lhs: ScalarExpr, op: BinaryOp, rhs: ScalarExpr) -> ScalarExpr {
    ScalarExpr::BinaryExpr {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
    }
}

/// Adds a `FILTER (WHERE filter)` clause to the given aggregate expression.
/// If the expression is not an aggregate it is returned as is.
pub fn with_filter(expr: ScalarExpr, filter: ScalarExpr) -> ScalarExpr {
    match expr {
        ScalarExpr::Aggregate {
            func, distinct, args, ..
        } => ScalarExpr::Aggregate {
            func,
            distinct,
            args,
            filter: Some(Box::new(filter)),
        },
        ScalarExpr::Alias(expr, name) => ScalarExpr::Alias(Box::new(with_filter(*expr, filter)), name),
        _ => expr,
    }
}
