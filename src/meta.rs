use std::cell::Cell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Identifies an operator that produces columns. Operator identifiers are unique within a logical plan.
pub type OperatorId = usize;

/// Uniquely identifies a column within a logical plan: the operator that produced the column and
/// the position of that column in the output of that operator.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ColumnBinding {
    /// The identifier of the operator that produces this column.
    pub operator_id: OperatorId,
    /// The position of this column in the output of the operator.
    pub column: usize,
}

impl ColumnBinding {
    /// Creates a new column binding.
    pub fn new(operator_id: OperatorId, column: usize) -> Self {
        ColumnBinding { operator_id, column }
    }
}

impl Display for ColumnBinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.operator_id, self.column)
    }
}

/// Hands out operator identifiers. Clones of a generator share the same sequence
/// so every identifier is handed out only once.
#[derive(Debug, Clone)]
pub struct OperatorIdGenerator {
    next: Rc<Cell<OperatorId>>,
}

impl OperatorIdGenerator {
    /// Creates a new generator. The first identifier is `1`.
    pub fn new() -> Self {
        OperatorIdGenerator {
            next: Rc::new(Cell::new(1)),
        }
    }

    /// Returns the next unused identifier.
    pub fn next_id(&self) -> OperatorId {
        let id = self.next.get();
        self.next.set(id + 1);
        id
    }
}
