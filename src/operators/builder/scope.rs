use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::datatypes::DataType;
use crate::error::OptimizerError;
use crate::meta::ColumnBinding;

/// A column visible to/accessible from the current node of an operator tree.
#[derive(Debug, Clone)]
pub struct ColumnInScope {
    /// The name of the column.
    pub name: String,
    /// The binding of the column.
    pub binding: ColumnBinding,
    /// The type of the column.
    pub data_type: DataType,
}

/// Stores columns visible to/accessible from the current node of an operator tree.
#[derive(Debug, Clone, Default)]
pub struct OperatorScope {
    columns: Vec<ColumnInScope>,
}

impl OperatorScope {
    pub fn from_columns(columns: Vec<ColumnInScope>) -> Self {
        OperatorScope { columns }
    }

    /// Returns a scope that contains the columns of this scope followed by the columns of the given scope.
    pub fn join(&self, other: &OperatorScope) -> Self {
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());
        OperatorScope { columns }
    }

    pub fn columns(&self) -> &[ColumnInScope] {
        &self.columns
    }

    /// Finds a column by name. Names are case insensitive.
    /// Returns an error if there is no such column or if more than one column has the given name.
    pub fn find_column_by_name(&self, name: &str) -> Result<&ColumnInScope, OptimizerError> {
        let mut found = self.columns.iter().filter(|c| c.name.eq_ignore_ascii_case(name));
        match (found.next(), found.next()) {
            (Some(column), None) => Ok(column),
            (Some(_), Some(_)) => Err(OptimizerError::argument(format!("Ambiguous column: {}. {}", name, self))),
            (None, _) => Err(OptimizerError::argument(format!("Unexpected column: {}. {}", name, self))),
        }
    }

    pub fn find_column_by_binding(&self, binding: &ColumnBinding) -> Option<&ColumnInScope> {
        self.columns.iter().find(|c| &c.binding == binding)
    }

    /// Returns the position of the column with the given name.
    pub fn position_of(&self, name: &str) -> Result<usize, OptimizerError> {
        let column = self.find_column_by_name(name)?;
        let binding = column.binding;
        // find_column_by_name returned a column of this scope.
        Ok(self.columns.iter().position(|c| c.binding == binding).unwrap_or_default())
    }
}

impl Display for OperatorScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Input columns: [{}]",
            self.columns.iter().map(|c| format!("({}, {})", c.name, c.binding)).join(", ")
        )
    }
}
