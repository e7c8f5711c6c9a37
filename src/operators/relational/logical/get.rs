use std::collections::BTreeMap;

use crate::catalog::function::{BindData, TableFunctionRef};
use crate::datatypes::DataType;
use crate::meta::{ColumnBinding, OperatorId};
use crate::operators::format::OperatorFormatter;
use crate::operators::scalar::expr::{BinaryOp, ScalarExpr};
use crate::operators::LogicalOperator;

/// Logical operator that returns data from a source table.
#[derive(Debug, Clone)]
pub struct LogicalGet {
    /// The identifier of this operator.
    pub table_index: OperatorId,
    /// The function used to read the data.
    pub function: TableFunctionRef,
    /// The table and the columns this operator reads.
    pub bind_data: BindData,
    /// The names of the output columns.
    pub names: Vec<String>,
    /// The types of the output columns.
    pub types: Vec<DataType>,
    /// Filters pushed into this scan.
    pub table_filters: TableFilterSet,
}

impl LogicalGet {
    pub(super) fn children(&self) -> Vec<&LogicalOperator> {
        vec![]
    }

    pub(super) fn children_mut(&mut self) -> Vec<&mut LogicalOperator> {
        vec![]
    }

    pub(super) fn output_bindings(&self) -> Vec<ColumnBinding> {
        (0..self.names.len()).map(|i| ColumnBinding::new(self.table_index, i)).collect()
    }

    pub(super) fn format_expr<F>(&self, f: &mut F)
    where
        F: OperatorFormatter,
    {
        f.write_name("LogicalGet");
        f.write_source(&self.bind_data.table);
        f.write_value("index", self.table_index);
        f.write_values("cols", &self.names);
        if !self.table_filters.is_empty() {
            let filters: Vec<_> = self.table_filters.iter().map(|(_, filter)| filter).collect();
            f.write_values("filters", &filters);
        }
    }
}

/// Filters pushed into a scan. A scan with filters returns only the rows that satisfy every filter.
#[derive(Debug, Clone, Default)]
pub struct TableFilterSet {
    filters: BTreeMap<usize, ScalarExpr>,
}

impl TableFilterSet {
    /// Adds a filter on the i-th output column of a scan.
    /// If that column already has a filter both filters are combined with `AND`.
    pub fn push_filter(&mut self, column: usize, filter: ScalarExpr) {
        let filter = match self.filters.remove(&column) {
            Some(existing) => ScalarExpr::BinaryExpr {
                lhs: Box::new(existing),
                op: BinaryOp::And,
                rhs: Box::new(filter),
            },
            None => filter,
        };
        self.filters.insert(column, filter);
    }

    /// Returns `true` if there are no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns an iterator over (column, filter) pairs ordered by column.
    pub fn iter(&self) -> impl Iterator<Item = (&usize, &ScalarExpr)> {
        self.filters.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::operators::scalar::scalar;

    #[test]
    fn test_combine_filters_on_the_same_column() {
        let column = || ScalarExpr::Column(ColumnBinding::new(1, 0));
        let gt = ScalarExpr::BinaryExpr {
            lhs: Box::new(column()),
            op: BinaryOp::Gt,
            rhs: Box::new(scalar(5)),
        };
        let lt = ScalarExpr::BinaryExpr {
            lhs: Box::new(column()),
            op: BinaryOp::Lt,
            rhs: Box::new(scalar(10)),
        };

        let mut filters = TableFilterSet::default();
        assert!(filters.is_empty());

        filters.push_filter(0, gt);
        filters.push_filter(0, lt);

        let filters: Vec<_> = filters.iter().map(|(c, f)| format!("{}: {}", c, f)).collect();
        assert_eq!(filters, vec!["0: col:1.0 > 5 AND col:1.0 < 10"]);
    }
}
