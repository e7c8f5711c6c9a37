//! Logical operators supported by the optimizer.

use crate::meta::ColumnBinding;
use crate::operators::format::OperatorFormatter;

pub use aggregates::LogicalAggregate;
pub use dummy_scan::LogicalDummyScan;
pub use empty::LogicalEmpty;
pub use expression_get::LogicalExpressionGet;
pub use filter::LogicalFilter;
pub use get::{LogicalGet, TableFilterSet};
pub use join::{JoinType, LogicalJoin};
pub use limit::LogicalLimit;
pub use order::{LogicalOrder, OrderingOption};
pub use projection::LogicalProjection;
pub use set_ops::LogicalUnion;

mod aggregates;
mod dummy_scan;
mod empty;
mod expression_get;
mod filter;
mod get;
mod join;
mod limit;
mod order;
mod projection;
mod set_ops;

/// A logical operator describes a high-level operator without specifying an implementation algorithm to be used.
/// A plan is a tree of logical operators where every operator owns its inputs.
#[derive(Debug, Clone)]
pub enum LogicalOperator {
    /// Logical get/scan operator.
    Get(LogicalGet),
    /// Logical projection operator.
    Projection(LogicalProjection),
    /// Logical filter operator.
    Filter(LogicalFilter),
    /// Logical aggregate operator.
    Aggregate(LogicalAggregate),
    /// Logical join operator.
    Join(LogicalJoin),
    /// Logical union operator.
    Union(LogicalUnion),
    /// Logical limit operator.
    Limit(LogicalLimit),
    /// Logical order operator.
    Order(LogicalOrder),
    /// Relation that produces a single row with no columns.
    DummyScan(LogicalDummyScan),
    /// Relation that produces constant rows.
    ExpressionGet(LogicalExpressionGet),
    /// Relation that produces no rows.
    Empty(LogicalEmpty),
}

impl LogicalOperator {
    /// Returns the inputs of this operator in order.
    pub fn children(&self) -> Vec<&LogicalOperator> {
        match self {
            LogicalOperator::Get(expr) => expr.children(),
            LogicalOperator::Projection(expr) => expr.children(),
            LogicalOperator::Filter(expr) => expr.children(),
            LogicalOperator::Aggregate(expr) => expr.children(),
            LogicalOperator::Join(expr) => expr.children(),
            LogicalOperator::Union(expr) => expr.children(),
            LogicalOperator::Limit(expr) => expr.children(),
            LogicalOperator::Order(expr) => expr.children(),
            LogicalOperator::DummyScan(expr) => expr.children(),
            LogicalOperator::ExpressionGet(expr) => expr.children(),
            LogicalOperator::Empty(expr) => expr.children(),
        }
    }

    /// Returns mutable references to the inputs of this operator in order.
    pub fn children_mut(&mut self) -> Vec<&mut LogicalOperator> {
        match self {
            LogicalOperator::Get(expr) => expr.children_mut(),
            LogicalOperator::Projection(expr) => expr.children_mut(),
            LogicalOperator::Filter(expr) => expr.children_mut(),
            LogicalOperator::Aggregate(expr) => expr.children_mut(),
            LogicalOperator::Join(expr) => expr.children_mut(),
            LogicalOperator::Union(expr) => expr.children_mut(),
            LogicalOperator::Limit(expr) => expr.children_mut(),
            LogicalOperator::Order(expr) => expr.children_mut(),
            LogicalOperator::DummyScan(expr) => expr.children_mut(),
            LogicalOperator::ExpressionGet(expr) => expr.children_mut(),
            LogicalOperator::Empty(expr) => expr.children_mut(),
        }
    }

    /// Returns the bindings of the columns produced by this operator in output order.
    pub fn output_bindings(&self) -> Vec<ColumnBinding> {
        match self {
            LogicalOperator::Get(expr) => expr.output_bindings(),
            LogicalOperator::Projection(expr) => expr.output_bindings(),
            LogicalOperator::Filter(expr) => expr.output_bindings(),
            LogicalOperator::Aggregate(expr) => expr.output_bindings(),
            LogicalOperator::Join(expr) => expr.output_bindings(),
            LogicalOperator::Union(expr) => expr.output_bindings(),
            LogicalOperator::Limit(expr) => expr.output_bindings(),
            LogicalOperator::Order(expr) => expr.output_bindings(),
            LogicalOperator::DummyScan(expr) => expr.output_bindings(),
            LogicalOperator::ExpressionGet(expr) => expr.output_bindings(),
            LogicalOperator::Empty(expr) => expr.output_bindings(),
        }
    }

    /// Returns the first operator in the chain of projections that starts at this operator
    /// that is not a projection.
    pub fn skip_projections(&self) -> &LogicalOperator {
        let mut operator = self;
        while let LogicalOperator::Projection(projection) = operator {
            operator = projection.input.as_ref();
        }
        operator
    }

    pub fn format_expr<F>(&self, f: &mut F)
    where
        F: OperatorFormatter,
    {
        match self {
            LogicalOperator::Get(expr) => expr.format_expr(f),
            LogicalOperator::Projection(expr) => expr.format_expr(f),
            LogicalOperator::Filter(expr) => expr.format_expr(f),
            LogicalOperator::Aggregate(expr) => expr.format_expr(f),
            LogicalOperator::Join(expr) => expr.format_expr(f),
            LogicalOperator::Union(expr) => expr.format_expr(f),
            LogicalOperator::Limit(expr) => expr.format_expr(f),
            LogicalOperator::Order(expr) => expr.format_expr(f),
            LogicalOperator::DummyScan(expr) => expr.format_expr(f),
            LogicalOperator::ExpressionGet(expr) => expr.format_expr(f),
            LogicalOperator::Empty(expr) => expr.format_expr(f),
        }
    }
}

macro_rules! impl_from_operator {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for LogicalOperator {
                fn from(expr: $ty) -> Self {
                    LogicalOperator::$variant(expr)
                }
            }
        )*
    };
}

impl_from_operator!(
    Get(LogicalGet),
    Projection(LogicalProjection),
    Filter(LogicalFilter),
    Aggregate(LogicalAggregate),
    Join(LogicalJoin),
    Union(LogicalUnion),
    Limit(LogicalLimit),
    Order(LogicalOrder),
    DummyScan(LogicalDummyScan),
    ExpressionGet(LogicalExpressionGet),
    Empty(LogicalEmpty),
);
