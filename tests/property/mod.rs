//! Property-based tests

pub mod sync_proptest;
