use std::collections::BTreeSet;

use itertools::Itertools;

use crate::meta::{ColumnBinding, OperatorId};
use crate::operators::format::OperatorFormatter;
use crate::operators::scalar::ScalarExpr;
use crate::operators::LogicalOperator;
use crate::statistics::column::ColumnStatistics;
use crate::statistics::DistinctValidity;

/// Logical aggregate operator. Aggregate operator consumes input rows and produces aggregate results.
///
/// Output columns of group expressions are bound to `group_index` and output columns of aggregate
/// expressions are bound to `aggregate_index`.
#[derive(Debug, Clone)]
pub struct LogicalAggregate {
    /// The identifier of the group expressions.
    pub group_index: OperatorId,
    /// The identifier of the aggregate expressions.
    pub aggregate_index: OperatorId,
    /// The list of grouping expressions (`GROUP BY` clause).
    pub groups: Vec<ScalarExpr>,
    /// The list of aggregate expressions.
    pub aggregates: Vec<ScalarExpr>,
    /// Grouping sets. Each set contains positions of expressions in `groups`.
    /// A plain `GROUP BY` has a single grouping set that contains all group expressions.
    pub grouping_sets: Vec<BTreeSet<usize>>,
    /// Statistics of the group expressions computed by the statistics propagation.
    pub group_stats: Vec<Option<ColumnStatistics>>,
    /// Whether `NULL`s must be taken into account when duplicates are removed from the input of
    /// this aggregate. Computed by the statistics propagation.
    pub distinct_validity: DistinctValidity,
    /// The input operator.
    pub input: Box<LogicalOperator>,
}

impl LogicalAggregate {
    /// Creates an aggregate operator with a single grouping set that contains all the group expressions.
    pub fn new(
        group_index: OperatorId,
        aggregate_index: OperatorId,
        groups: Vec<ScalarExpr>,
        aggregates: Vec<ScalarExpr>,
        input: LogicalOperator,
    ) -> Self {
        let grouping_sets = if groups.is_empty() {
            vec![]
        } else {
            vec![(0..groups.len()).collect()]
        };
        LogicalAggregate {
            group_index,
            aggregate_index,
            groups,
            aggregates,
            grouping_sets,
            group_stats: vec![],
            distinct_validity: DistinctValidity::default(),
            input: Box::new(input),
        }
    }

    pub(super) fn children(&self) -> Vec<&LogicalOperator> {
        vec![self.input.as_ref()]
    }

    pub(super) fn children_mut(&mut self) -> Vec<&mut LogicalOperator> {
        vec![self.input.as_mut()]
    }

    pub(super) fn output_bindings(&self) -> Vec<ColumnBinding> {
        let groups = (0..self.groups.len()).map(|i| ColumnBinding::new(self.group_index, i));
        let aggregates = (0..self.aggregates.len()).map(|i| ColumnBinding::new(self.aggregate_index, i));
        groups.chain(aggregates).collect()
    }

    pub(super) fn format_expr<F>(&self, f: &mut F)
    where
        F: OperatorFormatter,
    {
        f.write_name("LogicalAggregate");
        f.write_value("group_index", self.group_index);
        f.write_value("aggregate_index", self.aggregate_index);
        f.write_values("groups", &self.groups);
        f.write_values("aggregates", &self.aggregates);
        if self.grouping_sets.len() > 1 {
            let sets: Vec<_> = self.grouping_sets.iter().map(|set| format!("({})", set.iter().join(", "))).collect();
            f.write_values("grouping_sets", &sets);
        }
        f.write_input("input", &self.input);
    }
}
