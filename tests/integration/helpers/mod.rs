//! Helper utilities for integration tests.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
