use crate::meta::{ColumnBinding, OperatorId};
use crate::operators::format::OperatorFormatter;
use crate::operators::LogicalOperator;

/// Logical operator that returns exactly one row with no columns.
#[derive(Debug, Clone)]
pub struct LogicalDummyScan {
    /// The identifier of this operator.
    pub table_index: OperatorId,
}

impl LogicalDummyScan {
    pub(super) fn children(&self) -> Vec<&LogicalOperator> {
        vec![]
    }

    pub(super) fn children_mut(&mut self) -> Vec<&mut LogicalOperator> {
        vec![]
    }

    pub(super) fn output_bindings(&self) -> Vec<ColumnBinding> {
        vec![]
    }

    pub(super) fn format_expr<F>(&self, f: &mut F)
    where
        F: OperatorFormatter,
    {
        f.write_name("LogicalDummyScan");
        f.write_value("index", self.table_index);
    }
}
