//! Shared test utilities for hpra integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated batch runs with temp directories and a fixed clock
//! - Builders for XML fixtures and pipeline configurations

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
