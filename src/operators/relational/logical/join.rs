use std::fmt::{Display, Formatter};

use crate::meta::ColumnBinding;
use crate::operators::format::OperatorFormatter;
use crate::operators::scalar::ScalarExpr;
use crate::operators::LogicalOperator;

/// Supported join types.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum JoinType {
    Inner,
    Cross,
}

impl Display for JoinType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "Inner"),
            JoinType::Cross => write!(f, "Cross"),
        }
    }
}

/// Logical join operator. The output columns are the columns of the left input followed
/// by the columns of the right input.
#[derive(Debug, Clone)]
pub struct LogicalJoin {
    /// The type of this join.
    pub join_type: JoinType,
    /// The left input operator.
    pub left: Box<LogicalOperator>,
    /// The right input operator.
    pub right: Box<LogicalOperator>,
    /// The join condition. Cross joins have no condition.
    pub condition: Option<ScalarExpr>,
}

impl LogicalJoin {
    pub(super) fn children(&self) -> Vec<&LogicalOperator> {
        vec![self.left.as_ref(), self.right.as_ref()]
    }

    pub(super) fn children_mut(&mut self) -> Vec<&mut LogicalOperator> {
        vec![self.left.as_mut(), self.right.as_mut()]
    }

    pub(super) fn output_bindings(&self) -> Vec<ColumnBinding> {
        let mut bindings = self.left.output_bindings();
        bindings.extend(self.right.output_bindings());
        bindings
    }

    pub(super) fn format_expr<F>(&self, f: &mut F)
    where
        F: OperatorFormatter,
    {
        f.write_name("LogicalJoin");
        f.write_value("type", self.join_type);
        if let Some(condition) = self.condition.as_ref() {
            f.write_value("on", condition);
        }
        f.write_input("left", &self.left);
        f.write_input("right", &self.right);
    }
}
