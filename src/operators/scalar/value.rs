use crate::datatypes::DataType;
use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use std::fmt::{Display, Formatter};

/// Supported scalar values.
///
/// Values of the same type are totally ordered, so they can be used as bounds of column statistics.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float64(OrderedFloat<f64>),
    String(String),
    Date(NaiveDate),
}

impl ScalarValue {
    /// Returns the type of this scalar value.
    pub fn data_type(&self) -> DataType {
        match self {
            ScalarValue::Null => DataType::Null,
            ScalarValue::Bool(_) => DataType::Bool,
            ScalarValue::Int32(_) => DataType::Int32,
            ScalarValue::Int64(_) => DataType::Int64,
            ScalarValue::Float64(_) => DataType::Float64,
            ScalarValue::String(_) => DataType::String,
            ScalarValue::Date(_) => DataType::Date,
        }
    }

    /// Returns `true` if this is a `NULL` value.
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int32(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(OrderedFloat(value))
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<NaiveDate> for ScalarValue {
    fn from(value: NaiveDate) -> Self {
        ScalarValue::Date(value)
    }
}

impl Display for ScalarValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "NULL"),
            ScalarValue::Bool(value) => write!(f, "{}", value),
            ScalarValue::Int32(value) => write!(f, "{}", value),
            ScalarValue::Int64(value) => write!(f, "{}", value),
            ScalarValue::Float64(value) => write!(f, "{}", value),
            ScalarValue::String(value) => write!(f, "'{}'", value),
            ScalarValue::Date(value) => write!(f, "DATE '{}'", value),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scalar_value_data_types() {
        assert_eq!(ScalarValue::Null.data_type(), DataType::Null, "null value");
        assert_eq!(ScalarValue::from(true).data_type(), DataType::Bool, "bool value");
        assert_eq!(ScalarValue::from(1).data_type(), DataType::Int32, "i32 value");
        assert_eq!(ScalarValue::from(1i64).data_type(), DataType::Int64, "i64 value");
        assert_eq!(ScalarValue::from(0.5).data_type(), DataType::Float64, "f64 value");
        assert_eq!(ScalarValue::from("abc").data_type(), DataType::String, "string value");

        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(ScalarValue::from(date).data_type(), DataType::Date, "date value");
    }

    #[test]
    fn test_values_of_the_same_type_are_ordered() {
        assert!(ScalarValue::from(1i64) < ScalarValue::from(10i64));
        assert!(ScalarValue::from(-0.5) < ScalarValue::from(0.25));

        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(ScalarValue::from(jan) < ScalarValue::from(feb));
    }

    #[test]
    fn test_display() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format!("{}", ScalarValue::from(date)), "DATE '2024-03-05'");
        assert_eq!(format!("{}", ScalarValue::from("x")), "'x'");
        assert_eq!(format!("{}", ScalarValue::Null), "NULL");
    }
}
