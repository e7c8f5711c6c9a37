use crate::datatypes::DataType;
use crate::operators::scalar::value::ScalarValue;

/// Flags that describe which kinds of values a column can contain.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StatsInfo {
    /// The column may contain `NULL`s.
    CanHaveNullValues,
    /// The column never contains `NULL`s.
    CannotHaveNullValues,
    /// The column may contain non-null values.
    CanHaveValidValues,
    /// The column contains only `NULL`s.
    CannotHaveValidValues,
    /// The column may contain both `NULL` and non-null values.
    CanHaveNullAndValidValues,
}

/// A summary of the values a single column can contain.
///
/// Statistics are conservative: a flag that is set means "possible", not "present",
/// and bounds are inclusive bounds of the non-null values.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStatistics {
    data_type: DataType,
    has_null: bool,
    has_no_null: bool,
    min: Option<ScalarValue>,
    max: Option<ScalarValue>,
    distinct_count: Option<u64>,
}

impl ColumnStatistics {
    /// Creates statistics that say nothing about a column of the given type:
    /// the column can contain any value including `NULL`.
    pub fn unknown(data_type: DataType) -> Self {
        ColumnStatistics {
            data_type,
            has_null: true,
            has_no_null: true,
            min: None,
            max: None,
            distinct_count: None,
        }
    }

    /// Creates statistics of a column that contains no values at all.
    /// Such statistics are the identity element of [merge](Self::merge).
    pub fn empty(data_type: DataType) -> Self {
        ColumnStatistics {
            data_type,
            has_null: false,
            has_no_null: false,
            min: None,
            max: None,
            distinct_count: Some(0),
        }
    }

    /// Creates statistics of a column that contains only the given value.
    pub fn from_value(value: &ScalarValue) -> Self {
        if value.is_null() {
            let mut stats = ColumnStatistics::empty(DataType::Null);
            stats.set(StatsInfo::CanHaveNullValues);
            stats.distinct_count = Some(1);
            return stats;
        }
        let mut stats = ColumnStatistics::empty(value.data_type());
        stats.set(StatsInfo::CanHaveValidValues);
        if stats.data_type.is_ordered() {
            stats.min = Some(value.clone());
            stats.max = Some(value.clone());
        }
        stats.distinct_count = Some(1);
        stats
    }

    /// Sets the bounds of non-null values of this column.
    pub fn with_range(mut self, min: Option<ScalarValue>, max: Option<ScalarValue>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Sets the upper bound of the number of distinct non-null values of this column.
    pub fn with_distinct_count(mut self, distinct_count: u64) -> Self {
        self.distinct_count = Some(distinct_count);
        self
    }

    /// Updates the null flags of this column. Calls to `set` are not reversible by merging:
    /// once a column may contain nulls, merging never makes it null-free again.
    pub fn set(&mut self, info: StatsInfo) {
        match info {
            StatsInfo::CanHaveNullValues => self.has_null = true,
            StatsInfo::CannotHaveNullValues => self.has_null = false,
            StatsInfo::CanHaveValidValues => self.has_no_null = true,
            StatsInfo::CannotHaveValidValues => self.has_no_null = false,
            StatsInfo::CanHaveNullAndValidValues => {
                self.has_null = true;
                self.has_no_null = true;
            }
        }
    }

    /// Returns a copy of these statistics with the given flag set.
    pub fn with(mut self, info: StatsInfo) -> Self {
        self.set(info);
        self
    }

    /// The type of the column.
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Returns `true` if the column may contain `NULL`s.
    pub fn can_have_null(&self) -> bool {
        self.has_null
    }

    /// Returns `true` if the column may contain non-null values.
    pub fn can_have_no_null(&self) -> bool {
        self.has_no_null
    }

    /// The lower bound of non-null values.
    pub fn min(&self) -> Option<&ScalarValue> {
        self.min.as_ref()
    }

    /// The upper bound of non-null values.
    pub fn max(&self) -> Option<&ScalarValue> {
        self.max.as_ref()
    }

    /// The upper bound of the number of distinct non-null values.
    pub fn distinct_count(&self) -> Option<u64> {
        self.distinct_count
    }

    /// Merges the given statistics into these statistics so the result describes
    /// a column that can contain values of both columns.
    pub fn merge(&mut self, other: &ColumnStatistics) {
        if !other.has_null && !other.has_no_null {
            return;
        }
        if !self.has_null && !self.has_no_null {
            *self = other.clone();
            return;
        }

        self.has_null |= other.has_null;
        self.has_no_null |= other.has_no_null;

        if self.data_type != other.data_type {
            self.min = None;
            self.max = None;
            self.distinct_count = None;
            return;
        }

        self.min = match (self.min.take(), other.min.as_ref()) {
            (Some(l), Some(r)) => Some(std::cmp::min(l, r.clone())),
            _ => None,
        };
        self.max = match (self.max.take(), other.max.as_ref()) {
            (Some(l), Some(r)) => Some(std::cmp::max(l, r.clone())),
            _ => None,
        };
        self.distinct_count = match (self.distinct_count, other.distinct_count) {
            (Some(l), Some(r)) => Some(l.saturating_add(r)),
            _ => None,
        };
    }
}
