use crate::datatypes::DataType;
use crate::meta::{ColumnBinding, OperatorId};
use crate::operators::format::OperatorFormatter;
use crate::operators::LogicalOperator;

/// Logical operator that produces no rows.
///
/// Replaces subtrees of logical plans that are known to return nothing.
#[derive(Debug, Clone)]
pub struct LogicalEmpty {
    /// The identifier of this operator.
    pub table_index: OperatorId,
    /// The types of the output columns.
    pub types: Vec<DataType>,
}

impl LogicalEmpty {
    pub(super) fn children(&self) -> Vec<&LogicalOperator> {
        vec![]
    }

    pub(super) fn children_mut(&mut self) -> Vec<&mut LogicalOperator> {
        vec![]
    }

    pub(super) fn output_bindings(&self) -> Vec<ColumnBinding> {
        (0..self.types.len()).map(|i| ColumnBinding::new(self.table_index, i)).collect()
    }

    pub(super) fn format_expr<F>(&self, f: &mut F)
    where
        F: OperatorFormatter,
    {
        f.write_name("LogicalEmpty");
        f.write_value("index", self.table_index);
        f.write_values("types", &self.types);
    }
}
