//! Common test utilities module
//!
//! Provides shared fixtures and temporary file helpers for the integration tests.

#![allow(dead_code)]

pub mod test_utils;

pub use test_utils::{write_fixture, TempCsv, MIXED_CSV, SCENARIO_CSV};
