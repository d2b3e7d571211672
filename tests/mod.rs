//! Test suite for medfeed
//!
//! This module organizes all tests

pub mod property;
