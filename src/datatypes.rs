use std::fmt::{Display, Formatter};

/// Data types supported in scalar expressions and column definitions.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum DataType {
    Null,
    Bool,
    Int32,
    Int64,
    Float64,
    String,
    Date,
}

impl DataType {
    /// Returns `true` if values of this type can be compared with `<`, `>` etc.
    /// Only such columns can have range statistics.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, DataType::Null)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Null => write!(f, "Null"),
            DataType::Bool => write!(f, "Bool"),
            DataType::Int32 => write!(f, "Int32"),
            DataType::Int64 => write!(f, "Int64"),
            DataType::Float64 => write!(f, "Float64"),
            DataType::String => write!(f, "String"),
            DataType::Date => write!(f, "Date"),
        }
    }
}
