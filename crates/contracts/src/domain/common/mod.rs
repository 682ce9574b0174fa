//! Common types and traits for all aggregates

pub mod aggregate_id;

pub use aggregate_id::AggregateId;
