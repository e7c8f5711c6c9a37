//! Statistics propagation for logical query plans.
//!
//! The [propagator](statistics::propagator::StatisticsPropagator) walks a plan bottom-up, computes
//! statistics of the columns every operator produces and replaces aggregates which results are
//! known from table metadata with constants.

pub mod catalog;
pub mod context;
pub mod datatypes;
pub mod error;
pub mod meta;
pub mod operators;
pub mod statistics;
#[cfg(test)]
pub mod testing;
