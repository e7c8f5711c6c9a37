//! Logical plans: relational operators, scalar expressions and the tools to build and display them.

pub mod builder;
pub mod format;
pub mod relational;
pub mod scalar;

pub use relational::logical::LogicalOperator;
