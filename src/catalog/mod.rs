//! Database catalog.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::datatypes::DataType;
use crate::error::OptimizerError;
use crate::statistics::column::ColumnStatistics;
use crate::statistics::partition::PartitionStatistics;

pub mod function;
pub mod mutable;

pub type CatalogRef = Arc<dyn Catalog>;
pub type SchemaRef = Arc<dyn Schema>;
pub type TableRef = Arc<Table>;
pub type ColumnRef = Arc<Column>;

/// Provides access to database objects and their statistics.
pub trait Catalog: Debug + Sync + Send {
    /// Returns this catalog as [`Any`](std::any::Any) in order it can be downcast to its implementation.
    fn as_any(&self) -> &dyn Any;

    /// Returns an iterator over schemas available in the catalog.
    fn get_schemas(&self) -> Vec<SchemaRef>;

    /// Returns a schema with the given name.
    fn get_schema_by_name(&self, name: &str) -> Option<SchemaRef>;

    /// Returns a table with the given name registered in the default schema.
    fn get_table(&self, name: &str) -> Option<TableRef>;
}

/// The name of default schema.
pub const DEFAULT_SCHEMA: &str = "default";

/// Represents a database schema.
pub trait Schema: Debug + Sync + Send {
    /// Returns this schema as [`Any`](std::any::Any) in order it can be downcast to its implementation.
    fn as_any(&self) -> &dyn Any;

    /// Returns an iterator over tables registered in this schema.
    fn get_tables(&self) -> Vec<TableRef>;

    /// Returns a table with the given name.
    fn get_table_by_name(&self, name: &str) -> Option<TableRef>;
}

/// Represents a database table.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<ColumnRef>,
    statistics: TableStatistics,
}

impl Table {
    /// The name of this table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The columns of this table.
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    /// Returns a column with the given name.
    pub fn get_column(&self, name: &str) -> Option<ColumnRef> {
        self.columns.iter().find(|c| c.name == name).cloned()
    }

    /// Returns statistics available for this table.
    pub fn statistics(&self) -> &TableStatistics {
        &self.statistics
    }
}

/// Statistics for a database table.
#[derive(Debug, Clone, Default)]
pub struct TableStatistics {
    row_count: Option<u64>,
    partitions: Vec<PartitionStatistics>,
    columns: HashMap<String, ColumnStatistics>,
}

impl TableStatistics {
    /// The total number of rows in a table.
    pub fn row_count(&self) -> Option<u64> {
        self.row_count
    }

    /// Row counts of the partitions of a table. Empty if partition statistics are not available.
    pub fn partitions(&self) -> &[PartitionStatistics] {
        &self.partitions
    }

    /// Statistics of the column with the given name.
    pub fn column_statistics(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.get(name)
    }
}

/// A builder to create instances of a [table].
///
/// [table]: crate::catalog::Table
#[derive(Debug, Clone)]
pub struct TableBuilder {
    name: String,
    columns: Vec<ColumnRef>,
    statistics: TableStatistics,
}

impl TableBuilder {
    /// Creates a builder for a table the given name.
    pub fn new(name: &str) -> Self {
        TableBuilder {
            name: name.to_string(),
            columns: Vec::new(),
            statistics: TableStatistics::default(),
        }
    }

    /// Adds a column with the given name and data type to this table.
    pub fn add_column(mut self, name: &str, data_type: DataType) -> TableBuilder {
        let column = Column::new(name.to_string(), self.name.clone(), data_type);
        self.columns.push(Arc::new(column));
        self
    }

    /// Sets row count statistics for this table.
    pub fn add_row_count(mut self, row_count: u64) -> TableBuilder {
        self.statistics.row_count = Some(row_count);
        self
    }

    /// Adds statistics of a partition of this table.
    pub fn add_partition(mut self, partition: PartitionStatistics) -> TableBuilder {
        self.statistics.partitions.push(partition);
        self
    }

    /// Sets statistics of the column with the given name.
    pub fn add_column_statistics(mut self, column: &str, statistics: ColumnStatistics) -> TableBuilder {
        self.statistics.columns.insert(column.to_string(), statistics);
        self
    }

    /// Creates an instance of a [table] with previously specified properties.
    ///
    /// [table]: crate::catalog::Table
    pub fn build(self) -> Result<Table, OptimizerError> {
        if self.columns.is_empty() {
            return Err(OptimizerError::argument("No columns has been specified"));
        }

        let mut names = HashSet::new();
        for col in self.columns.iter() {
            let col_name = col.name();
            if !names.insert(col_name) {
                let message = format!("Column already exists. Column: {} table: {}", col_name, self.name);
                return Err(OptimizerError::argument(message));
            }
        }

        for (col_name, statistics) in self.statistics.columns.iter() {
            match self.columns.iter().find(|c| &c.name == col_name) {
                Some(col) if col.data_type() != statistics.data_type() => {
                    let message = format!(
                        "Column statistics type mismatch. Column: {} table: {} expected: {} got: {}",
                        col_name,
                        self.name,
                        col.data_type(),
                        statistics.data_type()
                    );
                    return Err(OptimizerError::argument(message));
                }
                Some(_) => {}
                None => {
                    let message = format!("Statistics of an unknown column. Column: {} table: {}", col_name, self.name);
                    return Err(OptimizerError::argument(message));
                }
            }
        }

        Ok(Table {
            name: self.name,
            columns: self.columns,
            statistics: self.statistics,
        })
    }
}

/// A column of a database table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    table: String,
    data_type: DataType,
}

impl Column {
    pub(crate) fn new(column_name: String, table_name: String, data_type: DataType) -> Self {
        Column {
            name: column_name,
            table: table_name,
            data_type,
        }
    }

    /// The name of this column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the table this column belongs to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The data type of this column.
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }
}

#[doc(hidden)]
pub(crate) fn __ensure_type_is_sync_send<T>()
where
    T: Sync + Send,
{
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::operators::scalar::value::ScalarValue;
    use crate::statistics::column::StatsInfo;

    #[test]
    fn test_table_statistics() -> Result<(), OptimizerError> {
        let a1_stats = ColumnStatistics::unknown(DataType::Int32)
            .with(StatsInfo::CannotHaveNullValues)
            .with_range(Some(ScalarValue::Int32(0)), Some(ScalarValue::Int32(9)));
        let table = TableBuilder::new("A")
            .add_column("a1", DataType::Int32)
            .add_column("a2", DataType::String)
            .add_row_count(10)
            .add_partition(PartitionStatistics::exact(4))
            .add_partition(PartitionStatistics::exact(6))
            .add_column_statistics("a1", a1_stats.clone())
            .build()?;

        let statistics = table.statistics();
        assert_eq!(statistics.row_count(), Some(10));
        assert_eq!(statistics.partitions().len(), 2);
        assert_eq!(statistics.column_statistics("a1"), Some(&a1_stats));
        assert_eq!(statistics.column_statistics("a2"), None);
        Ok(())
    }

    #[test]
    fn test_reject_duplicate_columns() {
        let result = TableBuilder::new("A")
            .add_column("a1", DataType::Int32)
            .add_column("a1", DataType::Int32)
            .build();
        assert!(result.is_err(), "duplicate column");
    }

    #[test]
    fn test_reject_statistics_of_unknown_column() {
        let result = TableBuilder::new("A")
            .add_column("a1", DataType::Int32)
            .add_column_statistics("a2", ColumnStatistics::unknown(DataType::Int32))
            .build();
        assert!(result.is_err(), "unknown column");

        let result = TableBuilder::new("A")
            .add_column("a1", DataType::Int32)
            .add_column_statistics("a1", ColumnStatistics::unknown(DataType::String))
            .build();
        assert!(result.is_err(), "type mismatch");
    }
}
