use crate::meta::ColumnBinding;
use crate::operators::format::OperatorFormatter;
use crate::operators::LogicalOperator;

/// Logical limit operator. Skips `offset` rows of its input and returns at most `limit` rows.
#[derive(Debug, Clone)]
pub struct LogicalLimit {
    /// The maximum number of rows to return.
    pub limit: u64,
    /// The number of rows to skip.
    pub offset: u64,
    /// The input operator.
    pub input: Box<LogicalOperator>,
}

impl LogicalLimit {
    pub(super) fn children(&self) -> Vec<&LogicalOperator> {
        vec![self.input.as_ref()]
    }

    pub(super) fn children_mut(&mut self) -> Vec<&mut LogicalOperator> {
        vec![self.input.as_mut()]
    }

    pub(super) fn output_bindings(&self) -> Vec<ColumnBinding> {
        self.input.output_bindings()
    }

    pub(super) fn format_expr<F>(&self, f: &mut F)
    where
        F: OperatorFormatter,
    {
        f.write_name("LogicalLimit");
        f.write_value("limit", self.limit);
        if self.offset > 0 {
            f.write_value("offset", self.offset);
        }
        f.write_input("input", &self.input);
    }
}
