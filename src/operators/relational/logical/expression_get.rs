use itertools::Itertools;

use crate::datatypes::DataType;
use crate::meta::{ColumnBinding, OperatorId};
use crate::operators::format::OperatorFormatter;
use crate::operators::scalar::ScalarExpr;
use crate::operators::LogicalOperator;

/// Logical operator that materializes constant rows. For every row of its input it returns
/// every row of `expressions`.
#[derive(Debug, Clone)]
pub struct LogicalExpressionGet {
    /// The identifier of this operator.
    pub table_index: OperatorId,
    /// The types of the output columns.
    pub types: Vec<DataType>,
    /// The rows. Each row has one expression per output column.
    pub expressions: Vec<Vec<ScalarExpr>>,
    /// The input operator.
    pub input: Box<LogicalOperator>,
}

impl LogicalExpressionGet {
    pub(super) fn children(&self) -> Vec<&LogicalOperator> {
        vec![self.input.as_ref()]
    }

    pub(super) fn children_mut(&mut self) -> Vec<&mut LogicalOperator> {
        vec![self.input.as_mut()]
    }

    pub(super) fn output_bindings(&self) -> Vec<ColumnBinding> {
        (0..self.types.len()).map(|i| ColumnBinding::new(self.table_index, i)).collect()
    }

    pub(super) fn format_expr<F>(&self, f: &mut F)
    where
        F: OperatorFormatter,
    {
        f.write_name("LogicalExpressionGet");
        f.write_value("index", self.table_index);
        f.write_values("types", &self.types);
        let rows: Vec<_> = self.expressions.iter().map(|row| format!("[{}]", row.iter().join(", "))).collect();
        f.write_values("rows", &rows);
        f.write_input("input", &self.input);
    }
}
