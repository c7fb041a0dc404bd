//! Common test utilities for Sitepack CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated bundle directory with CLI execution helpers
//! - Assertion macros: `assert_published!`, `assert_output_contains!`, etc.
//! - Fixtures: Reusable bundle content constants

pub mod assertions;
pub mod env;
pub mod fixtures;

pub use assertions::*;
pub use env::*;
pub use fixtures::*;
