use std::fmt::{Display, Formatter};

use crate::meta::ColumnBinding;
use crate::operators::format::OperatorFormatter;
use crate::operators::scalar::ScalarExpr;
use crate::operators::LogicalOperator;

/// Logical order operator (`ORDER BY` clause).
#[derive(Debug, Clone)]
pub struct LogicalOrder {
    /// Ordering options.
    pub ordering: Vec<OrderingOption>,
    /// The input operator.
    pub input: Box<LogicalOperator>,
}

/// Specifies how rows are sorted by an expression.
#[derive(Debug, Clone)]
pub struct OrderingOption {
    /// The sort key.
    pub expr: ScalarExpr,
    /// Whether this ordering is descending or not.
    pub descending: bool,
}

impl OrderingOption {
    /// Ascending order by the given expression.
    pub fn asc(expr: ScalarExpr) -> Self {
        OrderingOption {
            expr,
            descending: false,
        }
    }

    /// Descending order by the given expression.
    pub fn desc(expr: ScalarExpr) -> Self {
        OrderingOption { expr, descending: true }
    }
}

impl Display for OrderingOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.expr, if self.descending { "DESC" } else { "ASC" })
    }
}

impl LogicalOrder {
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
        f.write_name("LogicalOrder");
        f.write_values("ordering", &self.ordering);
        f.write_input("input", &self.input);
    }
}
