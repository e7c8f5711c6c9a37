use crate::meta::{ColumnBinding, OperatorId};
use crate::operators::format::OperatorFormatter;
use crate::operators::LogicalOperator;

/// Logical union operator. Both inputs produce the same number of columns.
#[derive(Debug, Clone)]
pub struct LogicalUnion {
    /// The identifier of this operator.
    pub table_index: OperatorId,
    /// The number of columns produced by this operator.
    pub column_count: usize,
    /// If `false` duplicates are removed (`UNION`), otherwise they are preserved (`UNION ALL`).
    pub all: bool,
    /// The left input operator.
    pub left: Box<LogicalOperator>,
    /// The right input operator.
    pub right: Box<LogicalOperator>,
}

impl LogicalUnion {
    pub(super) fn children(&self) -> Vec<&LogicalOperator> {
        vec![self.left.as_ref(), self.right.as_ref()]
    }

    pub(super) fn children_mut(&mut self) -> Vec<&mut LogicalOperator> {
        vec![self.left.as_mut(), self.right.as_mut()]
    }

    pub(super) fn output_bindings(&self) -> Vec<ColumnBinding> {
        (0..self.column_count).map(|i| ColumnBinding::new(self.table_index, i)).collect()
    }

    pub(super) fn format_expr<F>(&self, f: &mut F)
    where
        F: OperatorFormatter,
    {
        f.write_name("LogicalUnion");
        f.write_value("index", self.table_index);
        f.write_value("all", self.all);
        f.write_input("left", &self.left);
        f.write_input("right", &self.right);
    }
}
