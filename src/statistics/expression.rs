//! Statistics of scalar expressions.

use std::fmt::Debug;

use crate::datatypes::DataType;
use crate::operators::scalar::aggregates::AggregateFunction;
use crate::operators::scalar::value::ScalarValue;
use crate::operators::scalar::ScalarExpr;
use crate::statistics::column::{ColumnStatistics, StatsInfo};
use crate::statistics::StatisticsMap;

/// Computes statistics of the values of a scalar expression.
pub trait ExpressionPropagator: Debug {
    /// Returns statistics of the given expression. Statistics of the columns the expression
    /// references are looked up in `statistics`. Returns `None` if nothing is known about the result.
    fn propagate_expression(&self, expr: &ScalarExpr, statistics: &StatisticsMap) -> Option<ColumnStatistics>;
}

/// An [ExpressionPropagator] that handles column references, constants, comparisons and the aggregate functions
/// which results can be described without evaluating them.
#[derive(Debug, Default)]
pub struct SimpleExpressionPropagator;

impl ExpressionPropagator for SimpleExpressionPropagator {
    fn propagate_expression(&self, expr: &ScalarExpr, statistics: &StatisticsMap) -> Option<ColumnStatistics> {
        match expr {
            ScalarExpr::Column(binding) => statistics.get(binding).cloned(),
            ScalarExpr::ColumnName(_) => None,
            ScalarExpr::Scalar(value) => Some(ColumnStatistics::from_value(value)),
            ScalarExpr::Alias(expr, _) => self.propagate_expression(expr, statistics),
            ScalarExpr::IsNull(_) => {
                Some(ColumnStatistics::unknown(DataType::Bool).with(StatsInfo::CannotHaveNullValues))
            }
            ScalarExpr::Not(expr) => {
                let input = self.propagate_expression(expr, statistics)?;
                Some(boolean_result(input.can_have_null()))
            }
            ScalarExpr::BinaryExpr { lhs, rhs, .. } => {
                let lhs = self.propagate_expression(lhs, statistics)?;
                let rhs = self.propagate_expression(rhs, statistics)?;
                Some(boolean_result(lhs.can_have_null() || rhs.can_have_null()))
            }
            ScalarExpr::Aggregate { func, args, .. } => match func {
                AggregateFunction::Count => Some(
                    ColumnStatistics::unknown(DataType::Int64)
                        .with(StatsInfo::CannotHaveNullValues)
                        .with_range(Some(ScalarValue::Int64(0)), None),
                ),
                AggregateFunction::Min | AggregateFunction::Max => {
                    let arg = args.first()?;
                    let stats = self.propagate_expression(arg, statistics)?;
                    // min/max of an empty input is NULL.
                    Some(stats.with(StatsInfo::CanHaveNullValues))
                }
                AggregateFunction::Avg | AggregateFunction::Sum => None,
            },
        }
    }
}

fn boolean_result(can_have_null: bool) -> ColumnStatistics {
    let stats = ColumnStatistics::unknown(DataType::Bool);
    if can_have_null {
        stats
    } else {
        stats.with(StatsInfo::CannotHaveNullValues)
    }
}

/// An [ExpressionPropagator] that knows nothing about any expression.
#[derive(Debug, Default)]
pub struct NoExpressionStatistics;

impl ExpressionPropagator for NoExpressionStatistics {
    fn propagate_expression(&self, _expr: &ScalarExpr, _statistics: &StatisticsMap) -> Option<ColumnStatistics> {
        None
    }
}
