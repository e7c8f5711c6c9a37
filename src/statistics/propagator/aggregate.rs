use std::convert::TryFrom;

use crate::datatypes::DataType;
use crate::error::OptimizerError;
use crate::meta::ColumnBinding;
use crate::operators::relational::logical::{LogicalAggregate, LogicalDummyScan, LogicalExpressionGet};
use crate::operators::scalar::value::ScalarValue;
use crate::operators::scalar::ScalarExpr;
use crate::operators::LogicalOperator;
use crate::statistics::partition::exact_row_count;
use crate::statistics::propagator::StatisticsPropagator;
use crate::statistics::{DistinctValidity, NodeStatistics, StatisticsMap};

impl StatisticsPropagator<'_> {
    /// Propagates statistics through an aggregate operator. If the result of the aggregate is
    /// known from statistics returns an operator that produces that result.
    pub(super) fn propagate_aggregate(
        &mut self,
        aggr: &mut LogicalAggregate,
    ) -> Result<(Option<NodeStatistics>, Option<LogicalOperator>), OptimizerError> {
        validate_aggregate(aggr)?;

        let statistics = self.propagate_operator(&mut aggr.input)?;

        let mut group_stats = Vec::with_capacity(aggr.groups.len());
        for (i, group) in aggr.groups.iter().enumerate() {
            let stats = self.propagate_expression(group);
            group_stats.push(stats.clone());
            let stats = match stats {
                Some(stats) => stats,
                None => continue,
            };
            // Grouping sets replace columns that are not in the current set with NULLs.
            if aggr.grouping_sets.len() > 1 {
                continue;
            }
            self.statistics_map.insert(ColumnBinding::new(aggr.group_index, i), stats);
        }
        aggr.group_stats = group_stats;

        for (i, expr) in aggr.aggregates.iter().enumerate() {
            if let Some(stats) = self.propagate_expression(expr) {
                self.statistics_map.insert(ColumnBinding::new(aggr.aggregate_index, i), stats);
            }
        }

        aggr.distinct_validity = distinct_validity(&aggr.aggregates, &self.statistics_map);

        let replacement = if self.aggregate_rewrite {
            self.try_execute_aggregates(aggr)
        } else {
            None
        };

        // Every input row can form its own group.
        Ok((statistics, replacement))
    }

    /// Returns an operator that produces the result of the given aggregate if every aggregate
    /// expression is `count(*)` and the exact number of rows of its input is known.
    fn try_execute_aggregates(&self, aggr: &LogicalAggregate) -> Option<LogicalOperator> {
        if !aggr.groups.is_empty() {
            log::debug!("Aggregate {}: has group expressions", aggr.aggregate_index);
            return None;
        }
        let get = match aggr.input.skip_projections() {
            LogicalOperator::Get(get) => get,
            _ => {
                log::debug!("Aggregate {}: input is not a scan", aggr.aggregate_index);
                return None;
            }
        };
        if get.function.partition_statistics().is_none() {
            let function = get.function.name();
            log::debug!("Aggregate {}: {} does not provide partition statistics", aggr.aggregate_index, function);
            return None;
        }
        if !get.table_filters.is_empty() {
            log::debug!("Aggregate {}: scan of {} has filters", aggr.aggregate_index, get.bind_data.table);
            return None;
        }
        if let Some(expr) = aggr.aggregates.iter().find(|expr| !expr.is_count_star()) {
            log::debug!("Aggregate {}: {} is not count(*)", aggr.aggregate_index, expr);
            return None;
        }

        let partitions = self.partition_statistics(get);
        if partitions.is_empty() {
            log::debug!("Aggregate {}: no partition statistics for {}", aggr.aggregate_index, get.bind_data.table);
            return None;
        }
        let count = match exact_row_count(partitions).and_then(|count| i64::try_from(count).ok()) {
            Some(count) => count,
            None => {
                log::debug!("Aggregate {}: row count of {} is not exact", aggr.aggregate_index, get.bind_data.table);
                return None;
            }
        };

        let row = aggr
            .aggregates
            .iter()
            .map(|expr| ScalarExpr::Alias(Box::new(ScalarExpr::Scalar(ScalarValue::Int64(count))), expr.name()))
            .collect();
        let expression_get = LogicalExpressionGet {
            table_index: aggr.aggregate_index,
            types: vec![DataType::Int64; aggr.aggregates.len()],
            expressions: vec![row],
            input: Box::new(LogicalOperator::DummyScan(LogicalDummyScan {
                table_index: aggr.group_index,
            })),
        };

        log::debug!("Aggregate {}: replaced with count {}", aggr.aggregate_index, count);
        Some(LogicalOperator::ExpressionGet(expression_get))
    }
}

/// Returns [DistinctValidity::CannotHaveNullValues] if every argument of every aggregate expression
/// is a column that cannot contain `NULL`s according to the given statistics.
///
/// Any expression that is not an aggregate, an aggregate with a `FILTER` clause, an argument that is not a column
/// or a column without statistics makes the result [DistinctValidity::CanHaveNullValues].
pub fn distinct_validity(aggregates: &[ScalarExpr], statistics: &StatisticsMap) -> DistinctValidity {
    let not_null_column = |arg: &ScalarExpr| match arg {
        ScalarExpr::Column(binding) => statistics.get(binding).map(|s| !s.can_have_null()).unwrap_or_default(),
        _ => false,
    };
    let valid = aggregates.iter().all(|expr| match expr.strip_alias() {
        ScalarExpr::Aggregate {
            args, filter: None, ..
        } => args.iter().all(&not_null_column),
        _ => false,
    });
    if valid {
        DistinctValidity::CannotHaveNullValues
    } else {
        DistinctValidity::CanHaveNullValues
    }
}

fn validate_aggregate(aggr: &LogicalAggregate) -> Result<(), OptimizerError> {
    if aggr.group_index == aggr.aggregate_index {
        let message = format!("Aggregate: group index and aggregate index must differ: {}", aggr.group_index);
        return Err(OptimizerError::internal(message));
    }
    let num_groups = aggr.groups.len();
    if let Some(i) = aggr.grouping_sets.iter().flatten().find(|i| **i >= num_groups) {
        let message = format!("Aggregate: grouping set references unknown group {}. Groups: {}", i, num_groups);
        return Err(OptimizerError::internal(message));
    }
    Ok(())
}
