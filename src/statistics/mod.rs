//! Statistics computed by the statistics propagation pass.

use std::collections::hash_map::Iter;
use std::collections::HashMap;

use crate::meta::ColumnBinding;
use crate::statistics::column::ColumnStatistics;

pub mod column;
pub mod expression;
pub mod partition;
pub mod propagator;

/// Statistics of the output of an operator.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct NodeStatistics {
    max_cardinality: u64,
}

impl NodeStatistics {
    /// Creates statistics of an operator that returns at most `max_cardinality` rows.
    pub fn new(max_cardinality: u64) -> Self {
        NodeStatistics { max_cardinality }
    }

    /// The upper bound of the number of rows returned by an operator.
    pub fn max_cardinality(&self) -> u64 {
        self.max_cardinality
    }
}

/// Whether the input of a distinct aggregate can contain `NULL`s.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DistinctValidity {
    /// Inputs of the aggregate expressions may contain `NULL`s.
    CanHaveNullValues,
    /// Every input of every aggregate expression is a column that never contains `NULL`s.
    CannotHaveNullValues,
}

impl Default for DistinctValidity {
    fn default() -> Self {
        DistinctValidity::CanHaveNullValues
    }
}

/// Column statistics collected during a single pass over a plan.
///
/// Entries are written by the operator that produces a column and are never removed.
/// A missing entry means that nothing is known about a column.
#[derive(Debug, Clone, Default)]
pub struct StatisticsMap {
    columns: HashMap<ColumnBinding, ColumnStatistics>,
}

impl StatisticsMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        StatisticsMap::default()
    }

    /// Sets statistics of the given column. Replaces existing statistics of that column.
    pub fn insert(&mut self, binding: ColumnBinding, statistics: ColumnStatistics) {
        self.columns.insert(binding, statistics);
    }

    /// Returns statistics of the given column.
    pub fn get(&self, binding: &ColumnBinding) -> Option<&ColumnStatistics> {
        self.columns.get(binding)
    }

    /// Returns `true` if this map has statistics of the given column.
    pub fn contains(&self, binding: &ColumnBinding) -> bool {
        self.columns.contains_key(binding)
    }

    /// The number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns an iterator over (column, statistics) pairs in arbitrary order.
    pub fn iter(&self) -> Iter<ColumnBinding, ColumnStatistics> {
        self.columns.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::datatypes::DataType;

    #[test]
    fn test_statistics_map() {
        let mut map = StatisticsMap::new();
        assert!(map.is_empty());

        let binding = ColumnBinding::new(1, 0);
        map.insert(binding, ColumnStatistics::unknown(DataType::Int32));
        map.insert(binding, ColumnStatistics::unknown(DataType::Int64));

        assert_eq!(map.len(), 1);
        assert!(map.contains(&binding));
        assert!(!map.contains(&ColumnBinding::new(1, 1)));
        assert_eq!(map.get(&binding).map(|s| s.data_type()), Some(&DataType::Int64));
    }

    #[test]
    fn test_distinct_validity_defaults_to_nullable() {
        assert_eq!(DistinctValidity::default(), DistinctValidity::CanHaveNullValues);
    }
}
