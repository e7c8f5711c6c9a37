//! Relational operators.

pub mod logical;
