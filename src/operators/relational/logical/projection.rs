use crate::meta::{ColumnBinding, OperatorId};
use crate::operators::format::OperatorFormatter;
use crate::operators::scalar::ScalarExpr;
use crate::operators::LogicalOperator;

/// Logical projection operator. Computes one output column for each of its expressions.
#[derive(Debug, Clone)]
pub struct LogicalProjection {
    /// The identifier of this operator.
    pub table_index: OperatorId,
    /// The projection list.
    pub exprs: Vec<ScalarExpr>,
    /// The input operator.
    pub input: Box<LogicalOperator>,
}

impl LogicalProjection {
    pub(super) fn children(&self) -> Vec<&LogicalOperator> {
        vec![self.input.as_ref()]
    }

    pub(super) fn children_mut(&mut self) -> Vec<&mut LogicalOperator> {
        vec![self.input.as_mut()]
    }

    pub(super) fn output_bindings(&self) -> Vec<ColumnBinding> {
        (0..self.exprs.len()).map(|i| ColumnBinding::new(self.table_index, i)).collect()
    }

    pub(super) fn format_expr<F>(&self, f: &mut F)
    where
        F: OperatorFormatter,
    {
        f.write_name("LogicalProjection");
        f.write_value("index", self.table_index);
        f.write_values("exprs", &self.exprs);
        f.write_input("input", &self.input);
    }
}
