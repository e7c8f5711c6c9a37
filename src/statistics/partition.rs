use crate::catalog::function::{BindData, TableFunction};
use crate::context::QueryContext;
use crate::error::OptimizerError;
use std::fmt::Debug;

/// Whether a row count of a partition is exact or approximate.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CountType {
    /// The number of rows is exactly known.
    Exact,
    /// The number of rows is an estimate.
    Approximate,
}

/// The number of rows in one partition of a table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PartitionStatistics {
    /// The number of rows.
    pub count: u64,
    /// Whether the `count` is exact.
    pub count_type: CountType,
}

impl PartitionStatistics {
    /// Creates statistics of a partition with exactly `count` rows.
    pub fn exact(count: u64) -> Self {
        PartitionStatistics {
            count,
            count_type: CountType::Exact,
        }
    }

    /// Creates statistics of a partition with approximately `count` rows.
    pub fn approximate(count: u64) -> Self {
        PartitionStatistics {
            count,
            count_type: CountType::Approximate,
        }
    }

    /// Returns `true` if the row count of this partition is exact.
    pub fn is_exact(&self) -> bool {
        self.count_type == CountType::Exact
    }
}

/// The input of a [PartitionStatisticsProvider].
#[derive(Debug)]
pub struct PartitionStatsInput<'a> {
    /// The function of the scan.
    pub function: &'a dyn TableFunction,
    /// The bind data of the scan.
    pub bind_data: &'a BindData,
}

/// Reports the number of rows in each partition a scan reads.
pub trait PartitionStatisticsProvider: Debug {
    /// Returns statistics for every partition of the scan described by `input`.
    /// An empty vector means that partition statistics are not available.
    fn get_partition_stats(
        &self,
        context: &QueryContext,
        input: PartitionStatsInput,
    ) -> Result<Vec<PartitionStatistics>, OptimizerError>;
}

/// Returns the total number of rows in the given partitions if the row count of every partition is exact.
/// Returns `None` if there are no partitions, if some count is approximate, or if the total does not fit into `u64`.
pub fn exact_row_count(partitions: &[PartitionStatistics]) -> Option<u64> {
    if partitions.is_empty() {
        return None;
    }
    partitions.iter().try_fold(0u64, |total, partition| {
        if partition.is_exact() {
            total.checked_add(partition.count)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_exact_row_count() {
        let partitions = vec![PartitionStatistics::exact(400), PartitionStatistics::exact(600)];
        assert_eq!(exact_row_count(&partitions), Some(1000));
    }

    #[test]
    fn test_exact_row_count_requires_partitions() {
        assert_eq!(exact_row_count(&[]), None);
    }

    #[test]
    fn test_exact_row_count_with_approximate_partition() {
        let partitions = vec![PartitionStatistics::exact(400), PartitionStatistics::approximate(600)];
        assert_eq!(exact_row_count(&partitions), None);
    }

    #[test]
    fn test_exact_row_count_overflow() {
        let partitions = vec![PartitionStatistics::exact(u64::MAX), PartitionStatistics::exact(1)];
        assert_eq!(exact_row_count(&partitions), None);
    }
}
