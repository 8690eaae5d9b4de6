//! Shared test fixtures for the imagery-index workspace.
//!
//! Provides capability-document XML fixtures (WMS, WMTS, TMS), source
//! feature builders and float assertion helpers used across the crates.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Assert two floats agree within a tolerance (1e-9 by default).
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        assert_approx_eq!($left, $right, 1e-9)
    };
    ($left:expr, $right:expr, $tol:expr) => {{
        let (left, right) = ($left, $right);
        assert!(
            (left - right).abs() < $tol,
            "assertion failed: `{} ~ {}` (diff {})",
            left,
            right,
            (left - right).abs()
        );
    }};
}
