use crate::meta::ColumnBinding;
use crate::operators::format::OperatorFormatter;
use crate::operators::scalar::ScalarExpr;
use crate::operators::LogicalOperator;

/// Logical filter operator (`WHERE` clause). Returns rows of its input that satisfy the predicate.
#[derive(Debug, Clone)]
pub struct LogicalFilter {
    /// The filter expression.
    pub predicate: ScalarExpr,
    /// The input operator.
    pub input: Box<LogicalOperator>,
}

impl LogicalFilter {
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
        f.write_name("LogicalFilter");
        f.write_value("predicate", &self.predicate);
        f.write_input("input", &self.input);
    }
}
