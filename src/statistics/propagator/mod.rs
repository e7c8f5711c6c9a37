//! Statistics propagation pass.

use std::cmp::min;
use std::collections::HashMap;

use crate::context::QueryContext;
use crate::error::OptimizerError;
use crate::meta::{ColumnBinding, OperatorId};
use crate::operators::format::format_operator_tree;
use crate::operators::relational::logical::{
    LogicalExpressionGet, LogicalJoin, LogicalLimit, LogicalProjection, LogicalUnion,
};
use crate::operators::scalar::ScalarExpr;
use crate::operators::LogicalOperator;
use crate::statistics::column::ColumnStatistics;
use crate::statistics::expression::{ExpressionPropagator, SimpleExpressionPropagator};
use crate::statistics::partition::PartitionStatistics;
use crate::statistics::{NodeStatistics, StatisticsMap};

mod aggregate;
mod get;

pub use aggregate::distinct_validity;

/// Propagates statistics through the given plan using the default configuration
/// of a [StatisticsPropagator]. Operators of the plan can be replaced with simpler ones.
///
/// Returns statistics of the root operator.
pub fn propagate_statistics(
    context: &QueryContext,
    root: &mut LogicalOperator,
) -> Result<Option<NodeStatistics>, OptimizerError> {
    let mut propagator = StatisticsPropagator::new(context);
    propagator.propagate(root)
}

/// Walks a plan bottom-up, computes statistics of the columns each operator produces and
/// uses them to simplify the plan.
///
/// A propagator collects column statistics in its own [StatisticsMap] so every pass must use
/// a new instance.
#[derive(Debug)]
pub struct StatisticsPropagator<'a> {
    context: &'a QueryContext,
    expression_propagator: Box<dyn ExpressionPropagator + 'a>,
    aggregate_rewrite: bool,
    statistics_map: StatisticsMap,
    scan_partitions: HashMap<OperatorId, Vec<PartitionStatistics>>,
}

impl<'a> StatisticsPropagator<'a> {
    /// Creates a new propagator that uses [SimpleExpressionPropagator] and replaces
    /// aggregates which results are known from statistics with constants.
    pub fn new(context: &'a QueryContext) -> Self {
        StatisticsPropagator {
            context,
            expression_propagator: Box::new(SimpleExpressionPropagator),
            aggregate_rewrite: true,
            statistics_map: StatisticsMap::new(),
            scan_partitions: HashMap::new(),
        }
    }

    /// Sets the propagator used to compute statistics of scalar expressions.
    pub fn with_expression_propagator(mut self, expression_propagator: Box<dyn ExpressionPropagator + 'a>) -> Self {
        self.expression_propagator = expression_propagator;
        self
    }

    /// Enables/disables replacement of `count(*)` aggregates with their results. Enabled by default.
    pub fn with_aggregate_rewrite(mut self, value: bool) -> Self {
        self.aggregate_rewrite = value;
        self
    }

    /// Propagates statistics through the given plan. Returns statistics of the root operator.
    pub fn propagate(&mut self, root: &mut LogicalOperator) -> Result<Option<NodeStatistics>, OptimizerError> {
        log::debug!("Propagating statistics:\n{}", format_operator_tree(root));

        let statistics = self.propagate_operator(root)?;

        log::debug!(
            "Propagated statistics. Root: {:?}. Columns: {}. Plan:\n{}",
            statistics,
            self.statistics_map.len(),
            format_operator_tree(root)
        );
        Ok(statistics)
    }

    /// Column statistics collected so far.
    pub fn statistics_map(&self) -> &StatisticsMap {
        &self.statistics_map
    }

    /// Consumes this propagator and returns the collected column statistics.
    pub fn into_statistics_map(self) -> StatisticsMap {
        self.statistics_map
    }

    /// Propagates statistics through the given operator and its inputs.
    /// If the operator can be replaced with a simpler one the replacement is written to `operator`.
    fn propagate_operator(&mut self, operator: &mut LogicalOperator) -> Result<Option<NodeStatistics>, OptimizerError> {
        let (statistics, replacement) = match operator {
            LogicalOperator::Aggregate(aggr) => self.propagate_aggregate(aggr)?,
            LogicalOperator::Get(get) => (self.propagate_get(get)?, None),
            LogicalOperator::Projection(projection) => (self.propagate_projection(projection)?, None),
            LogicalOperator::Filter(filter) => (self.propagate_operator(&mut filter.input)?, None),
            LogicalOperator::Order(order) => (self.propagate_operator(&mut order.input)?, None),
            LogicalOperator::Limit(limit) => (self.propagate_limit(limit)?, None),
            LogicalOperator::Join(join) => (self.propagate_join(join)?, None),
            LogicalOperator::Union(union) => (self.propagate_union(union)?, None),
            LogicalOperator::ExpressionGet(get) => (self.propagate_expression_get(get)?, None),
            LogicalOperator::DummyScan(_) => (Some(NodeStatistics::new(1)), None),
            LogicalOperator::Empty(_) => (Some(NodeStatistics::new(0)), None),
        };
        if let Some(replacement) = replacement {
            *operator = replacement;
        }
        Ok(statistics)
    }

    fn propagate_expression(&self, expr: &ScalarExpr) -> Option<ColumnStatistics> {
        self.expression_propagator.propagate_expression(expr, &self.statistics_map)
    }

    fn propagate_projection(
        &mut self,
        projection: &mut LogicalProjection,
    ) -> Result<Option<NodeStatistics>, OptimizerError> {
        let statistics = self.propagate_operator(&mut projection.input)?;

        for (i, expr) in projection.exprs.iter().enumerate() {
            if let Some(stats) = self.propagate_expression(expr) {
                self.statistics_map.insert(ColumnBinding::new(projection.table_index, i), stats);
            }
        }
        Ok(statistics)
    }

    fn propagate_limit(&mut self, limit: &mut LogicalLimit) -> Result<Option<NodeStatistics>, OptimizerError> {
        let statistics = self.propagate_operator(&mut limit.input)?;
        let max_cardinality = match statistics {
            Some(input) => min(input.max_cardinality().saturating_sub(limit.offset), limit.limit),
            None => limit.limit,
        };
        Ok(Some(NodeStatistics::new(max_cardinality)))
    }

    fn propagate_join(&mut self, join: &mut LogicalJoin) -> Result<Option<NodeStatistics>, OptimizerError> {
        let left = self.propagate_operator(&mut join.left)?;
        let right = self.propagate_operator(&mut join.right)?;
        match (left, right) {
            (Some(left), Some(right)) => {
                let max_cardinality = left.max_cardinality().saturating_mul(right.max_cardinality());
                Ok(Some(NodeStatistics::new(max_cardinality)))
            }
            _ => Ok(None),
        }
    }

    fn propagate_union(&mut self, union: &mut LogicalUnion) -> Result<Option<NodeStatistics>, OptimizerError> {
        let left = self.propagate_operator(&mut union.left)?;
        let right = self.propagate_operator(&mut union.right)?;

        let left_columns = union.left.output_bindings();
        let right_columns = union.right.output_bindings();
        for (i, (l, r)) in left_columns.iter().zip(right_columns.iter()).enumerate() {
            let merged = match (self.statistics_map.get(l), self.statistics_map.get(r)) {
                (Some(l), Some(r)) => {
                    let mut stats = l.clone();
                    stats.merge(r);
                    stats
                }
                _ => continue,
            };
            self.statistics_map.insert(ColumnBinding::new(union.table_index, i), merged);
        }

        match (left, right) {
            (Some(left), Some(right)) => {
                let max_cardinality = left.max_cardinality().saturating_add(right.max_cardinality());
                Ok(Some(NodeStatistics::new(max_cardinality)))
            }
            _ => Ok(None),
        }
    }

    fn propagate_expression_get(
        &mut self,
        get: &mut LogicalExpressionGet,
    ) -> Result<Option<NodeStatistics>, OptimizerError> {
        let statistics = self.propagate_operator(&mut get.input)?;

        for i in 0..get.types.len() {
            // A column has statistics only if every row has them.
            let merged = get.expressions.iter().try_fold(None, |acc: Option<ColumnStatistics>, row| {
                let stats = row.get(i).and_then(|expr| self.propagate_expression(expr))?;
                let merged = match acc {
                    Some(mut acc) => {
                        acc.merge(&stats);
                        acc
                    }
                    None => stats,
                };
                Some(Some(merged))
            });
            if let Some(Some(stats)) = merged {
                self.statistics_map.insert(ColumnBinding::new(get.table_index, i), stats);
            }
        }

        let rows = get.expressions.len() as u64;
        Ok(statistics.map(|input| NodeStatistics::new(input.max_cardinality().saturating_mul(rows))))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::datatypes::DataType;
    use crate::operators::relational::logical::OrderingOption;
    use crate::operators::scalar::value::ScalarValue;
    use crate::operators::scalar::{alias, binary, col, count_star, scalar, BinaryOp};
    use crate::statistics::column::StatsInfo;
    use crate::statistics::partition::PartitionStatistics;
    use crate::testing::PropagatorTester;

    fn new_tester() -> PropagatorTester {
        let mut tester = PropagatorTester::new();
        tester.add_table("A", |b| {
            b.add_column("a1", DataType::Int32)
                .add_column("a2", DataType::Int32)
                .add_row_count(100)
                .add_partition(PartitionStatistics::exact(40))
                .add_partition(PartitionStatistics::exact(60))
                .add_column_statistics(
                    "a1",
                    ColumnStatistics::unknown(DataType::Int32)
                        .with(StatsInfo::CannotHaveNullValues)
                        .with_range(Some(ScalarValue::Int32(0)), Some(ScalarValue::Int32(99))),
                )
                .add_column_statistics("a2", ColumnStatistics::unknown(DataType::Int32))
        });
        tester.add_table("B", |b| {
            b.add_column("b1", DataType::Int32)
                .add_column("b2", DataType::Int32)
                .add_row_count(10)
                .add_column_statistics(
                    "b1",
                    ColumnStatistics::unknown(DataType::Int32)
                        .with(StatsInfo::CannotHaveNullValues)
                        .with_range(Some(ScalarValue::Int32(100)), Some(ScalarValue::Int32(200))),
                )
        });
        tester
    }

    #[test]
    fn test_get() {
        let tester = new_tester();
        let result = tester.propagate(|b| b.get("A", vec!["a2", "a1"]));

        assert_eq!(result.statistics, Some(NodeStatistics::new(100)));
        let a1 = result.column(1, 1).expect("a1 stats");
        assert!(!a1.can_have_null());
        assert!(result.column(1, 0).expect("a2 stats").can_have_null());
    }

    #[test]
    fn test_get_uses_row_count_without_partitions() {
        let tester = new_tester();
        let result = tester.propagate(|b| b.get("B", vec!["b1"]));
        assert_eq!(result.statistics, Some(NodeStatistics::new(10)));
    }

    #[test]
    fn test_projection() {
        let tester = new_tester();
        let result = tester.propagate(|b| {
            b.get("A", vec!["a1", "a2"])?
                .select(binary(col("a2"), BinaryOp::Gt, scalar(1)))?
                .order_by(vec![OrderingOption::asc(col("a1"))])?
                .project(vec![alias(col("a1"), "x"), binary(col("a1"), BinaryOp::Eq, scalar(1)), col("a2")])
        });

        assert_eq!(result.statistics, Some(NodeStatistics::new(100)));
        let x = result.column(2, 0).expect("x stats");
        assert_eq!(x.max(), Some(&ScalarValue::Int32(99)));
        let eq = result.column(2, 1).expect("a1 = 1 stats");
        assert_eq!(eq.data_type(), &DataType::Bool);
        assert!(!eq.can_have_null());
        assert!(result.column(2, 2).expect("a2 stats").can_have_null());
    }

    #[test]
    fn test_limit() {
        let tester = new_tester();
        let result = tester.propagate(|b| b.get("A", vec!["a1"])?.limit(10));
        assert_eq!(result.statistics, Some(NodeStatistics::new(10)));

        let result = tester.propagate(|b| b.get("A", vec!["a1"])?.limit_with_offset(10, 95));
        assert_eq!(result.statistics, Some(NodeStatistics::new(5)));
    }

    #[test]
    fn test_join() {
        let tester = new_tester();
        let result = tester.propagate(|b| {
            let left = b.get("A", vec!["a1"])?;
            let right = left.new_relation_builder().get("B", vec!["b1"])?;
            left.join(right, Some(binary(col("a1"), BinaryOp::Eq, col("b1"))))
        });
        assert_eq!(result.statistics, Some(NodeStatistics::new(1000)));
    }

    #[test]
    fn test_union_merges_column_statistics() {
        let tester = new_tester();
        let result = tester.propagate(|b| {
            let left = b.get("A", vec!["a1"])?;
            let right = left.new_relation_builder().get("B", vec!["b1"])?;
            left.union_all(right)
        });

        assert_eq!(result.statistics, Some(NodeStatistics::new(110)));
        let stats = result.column(3, 0).expect("union column stats");
        assert!(!stats.can_have_null());
        assert_eq!(stats.min(), Some(&ScalarValue::Int32(0)));
        assert_eq!(stats.max(), Some(&ScalarValue::Int32(200)));
    }

    #[test]
    fn test_values() {
        let tester = new_tester();
        let result = tester.propagate(|b| b.values(vec![vec![scalar(1)], vec![scalar(5)], vec![scalar(3)]]));

        assert_eq!(result.statistics, Some(NodeStatistics::new(3)));
        let stats = result.column(2, 0).expect("values stats");
        assert_eq!(stats.min(), Some(&ScalarValue::Int32(1)));
        assert_eq!(stats.max(), Some(&ScalarValue::Int32(5)));
    }

    #[test]
    fn test_expression_get_repeats_rows_for_every_input_row() {
        let mut tester = new_tester();
        tester.add_table("C", |b| b.add_column("c1", DataType::Int32));
        let context = tester.context();

        let expression_get = |input: LogicalOperator| {
            LogicalOperator::ExpressionGet(LogicalExpressionGet {
                table_index: 10,
                types: vec![DataType::Int32],
                expressions: vec![vec![scalar(1)], vec![scalar(2)]],
                input: Box::new(input),
            })
        };

        let mut plan = expression_get(tester.build(|b| b.get("B", vec!["b1"])));
        let mut propagator = StatisticsPropagator::new(&context);
        let statistics = propagator.propagate(&mut plan).expect("propagate");
        assert_eq!(statistics, Some(NodeStatistics::new(20)));

        let mut plan = expression_get(tester.build(|b| b.get("C", vec!["c1"])));
        let mut propagator = StatisticsPropagator::new(&context);
        let statistics = propagator.propagate(&mut plan).expect("propagate");
        assert_eq!(statistics, None, "unbounded input");

        let stats = propagator.statistics_map().get(&ColumnBinding::new(10, 0)).expect("column stats");
        assert_eq!(stats.min(), Some(&ScalarValue::Int32(1)));
        assert_eq!(stats.max(), Some(&ScalarValue::Int32(2)));
    }

    #[test]
    fn test_empty() {
        let tester = new_tester();
        let result = tester.propagate(|b| b.empty(vec![("x", DataType::Int32)]));
        assert_eq!(result.statistics, Some(NodeStatistics::new(0)));
        assert!(result.statistics_map.is_empty());
    }

    #[test]
    fn test_unknown_table_is_an_error() {
        let tester = new_tester();
        let mut plan = tester.build(|b| b.get("A", vec!["a1"])?.aggregate(vec![count_star()], vec![]));
        tester.catalog().remove_table(crate::catalog::DEFAULT_SCHEMA, "A").expect("remove table A");

        let context = tester.context();
        let result = propagate_statistics(&context, &mut plan);
        assert!(result.is_err(), "table A does not exist");
    }
}
