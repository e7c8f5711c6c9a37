use crate::error::OptimizerError;
use crate::meta::ColumnBinding;
use crate::operators::relational::logical::LogicalGet;
use crate::statistics::partition::{exact_row_count, PartitionStatistics, PartitionStatsInput};
use crate::statistics::propagator::StatisticsPropagator;
use crate::statistics::NodeStatistics;

impl StatisticsPropagator<'_> {
    pub(super) fn propagate_get(&mut self, get: &LogicalGet) -> Result<Option<NodeStatistics>, OptimizerError> {
        for i in 0..get.names.len() {
            let stats = get.function.column_statistics(self.context, &get.bind_data, i)?;
            if let Some(stats) = stats {
                self.statistics_map.insert(ColumnBinding::new(get.table_index, i), stats);
            }
        }

        let partitions = self.fetch_partition_statistics(get);
        let exact_count = exact_row_count(&partitions);
        self.scan_partitions.insert(get.table_index, partitions);

        if let Some(count) = exact_count {
            return Ok(Some(NodeStatistics::new(count)));
        }
        let max_row_count = get.function.max_row_count(self.context, &get.bind_data)?;
        Ok(max_row_count.map(NodeStatistics::new))
    }

    /// Returns statistics of the partitions the given scan reads collected by [propagate_get](Self::propagate_get).
    /// Returns an empty slice if the function of the scan does not provide them.
    pub(super) fn partition_statistics(&self, get: &LogicalGet) -> &[PartitionStatistics] {
        self.scan_partitions.get(&get.table_index).map(|p| p.as_slice()).unwrap_or(&[])
    }

    fn fetch_partition_statistics(&self, get: &LogicalGet) -> Vec<PartitionStatistics> {
        let provider = match get.function.partition_statistics() {
            Some(provider) => provider,
            None => return Vec::new(),
        };
        let input = PartitionStatsInput {
            function: get.function.as_ref(),
            bind_data: &get.bind_data,
        };
        match provider.get_partition_stats(self.context, input) {
            Ok(partitions) => partitions,
            Err(err) => {
                log::debug!(
                    "Unable to get partition statistics. Function: {} table: {}. Error: {}",
                    get.function.name(),
                    get.bind_data.table,
                    err
                );
                Vec::new()
            }
        }
    }
}
