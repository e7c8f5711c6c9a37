//! Table functions: the functions scan operators use to read data from a source.

use std::fmt::Debug;
use std::sync::Arc;

use crate::catalog::TableRef;
use crate::context::QueryContext;
use crate::error::OptimizerError;
use crate::statistics::column::ColumnStatistics;
use crate::statistics::partition::{PartitionStatistics, PartitionStatisticsProvider, PartitionStatsInput};

pub type TableFunctionRef = Arc<dyn TableFunction>;

/// Bind-time metadata of a scan: which table and which of its columns the scan reads.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BindData {
    /// The name of the table.
    pub table: String,
    /// Positions of the columns of the table in the output of the scan.
    /// The i-th output column of the scan is the `column_ids[i]`-th column of the table.
    pub column_ids: Vec<usize>,
}

/// A function used by a scan to read data.
pub trait TableFunction: Debug {
    /// The name of this function.
    fn name(&self) -> &str;

    /// Returns statistics of the i-th output column of a scan. `None` if statistics are not available.
    fn column_statistics(
        &self,
        context: &QueryContext,
        bind_data: &BindData,
        column: usize,
    ) -> Result<Option<ColumnStatistics>, OptimizerError>;

    /// Returns an upper bound of the number of rows a scan can return. `None` if no bound is known.
    fn max_row_count(&self, context: &QueryContext, bind_data: &BindData) -> Result<Option<u64>, OptimizerError>;

    /// Returns a provider of partition statistics if this function supports it.
    fn partition_statistics(&self) -> Option<&dyn PartitionStatisticsProvider>;
}

/// A table function that reads a table registered in the catalog and uses statistics stored in the catalog.
#[derive(Debug)]
pub struct CatalogTableFunction {
    partition_statistics: bool,
}

impl CatalogTableFunction {
    /// Creates a function that reports both column and partition statistics.
    pub fn new() -> Self {
        CatalogTableFunction {
            partition_statistics: true,
        }
    }

    /// Creates a function that reports column statistics but does not report partition statistics.
    pub fn without_partition_statistics() -> Self {
        CatalogTableFunction {
            partition_statistics: false,
        }
    }

    fn get_table(context: &QueryContext, bind_data: &BindData) -> Result<TableRef, OptimizerError> {
        match context.catalog().get_table(&bind_data.table) {
            Some(table) => Ok(table),
            None => Err(OptimizerError::internal(format!("Table '{}' does not exist", bind_data.table))),
        }
    }
}

impl TableFunction for CatalogTableFunction {
    fn name(&self) -> &str {
        "seq_scan"
    }

    fn column_statistics(
        &self,
        context: &QueryContext,
        bind_data: &BindData,
        column: usize,
    ) -> Result<Option<ColumnStatistics>, OptimizerError> {
        let table = Self::get_table(context, bind_data)?;
        let column = bind_data
            .column_ids
            .get(column)
            .and_then(|id| table.columns().get(*id))
            .ok_or_else(|| {
                OptimizerError::internal(format!("Scan of '{}' has no output column {}", bind_data.table, column))
            })?;
        Ok(table.statistics().column_statistics(column.name()).cloned())
    }

    fn max_row_count(&self, context: &QueryContext, bind_data: &BindData) -> Result<Option<u64>, OptimizerError> {
        let table = Self::get_table(context, bind_data)?;
        Ok(table.statistics().row_count())
    }

    fn partition_statistics(&self) -> Option<&dyn PartitionStatisticsProvider> {
        if self.partition_statistics {
            Some(self)
        } else {
            None
        }
    }
}

impl PartitionStatisticsProvider for CatalogTableFunction {
    fn get_partition_stats(
        &self,
        context: &QueryContext,
        input: PartitionStatsInput,
    ) -> Result<Vec<PartitionStatistics>, OptimizerError> {
        let table = Self::get_table(context, input.bind_data)?;
        Ok(table.statistics().partitions().to_vec())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::mutable::MutableCatalog;
    use crate::catalog::{TableBuilder, DEFAULT_SCHEMA};
    use crate::datatypes::DataType;
    use crate::statistics::column::StatsInfo;

    fn new_context() -> QueryContext {
        let catalog = MutableCatalog::new();
        let table = TableBuilder::new("A")
            .add_column("a1", DataType::Int32)
            .add_column("a2", DataType::Int32)
            .add_row_count(30)
            .add_partition(PartitionStatistics::exact(10))
            .add_partition(PartitionStatistics::exact(20))
            .add_column_statistics("a2", ColumnStatistics::unknown(DataType::Int32).with(StatsInfo::CannotHaveNullValues))
            .build()
            .expect("table A");
        catalog.add_table(DEFAULT_SCHEMA, table).expect("add table A");
        QueryContext::new(Arc::new(catalog))
    }

    #[test]
    fn test_column_statistics_follow_column_ids() -> Result<(), OptimizerError> {
        let context = new_context();
        let function = CatalogTableFunction::new();
        let bind_data = BindData {
            table: "A".into(),
            column_ids: vec![1, 0],
        };

        let stats = function.column_statistics(&context, &bind_data, 0)?.expect("a2 stats");
        assert!(!stats.can_have_null());
        assert_eq!(function.column_statistics(&context, &bind_data, 1)?, None, "a1 has no statistics");
        assert!(function.column_statistics(&context, &bind_data, 2).is_err(), "no such output column");
        Ok(())
    }

    #[test]
    fn test_partition_statistics() -> Result<(), OptimizerError> {
        let context = new_context();
        let bind_data = BindData {
            table: "A".into(),
            column_ids: vec![0],
        };

        let function = CatalogTableFunction::new();
        let provider = function.partition_statistics().expect("partition statistics provider");
        let input = PartitionStatsInput {
            function: &function,
            bind_data: &bind_data,
        };
        let partitions = provider.get_partition_stats(&context, input)?;
        assert_eq!(partitions, vec![PartitionStatistics::exact(10), PartitionStatistics::exact(20)]);
        assert_eq!(function.max_row_count(&context, &bind_data)?, Some(30));

        let function = CatalogTableFunction::without_partition_statistics();
        assert!(function.partition_statistics().is_none());
        Ok(())
    }

    #[test]
    fn test_unknown_table() {
        let context = new_context();
        let bind_data = BindData {
            table: "X".into(),
            column_ids: vec![0],
        };
        let function = CatalogTableFunction::new();
        assert!(function.max_row_count(&context, &bind_data).is_err());
    }
}
