//! Cross-module tests
//!
//! Unit tests for leaf modules live in their own `#[cfg(test)]`
//! blocks; these modules cover behavior that spans the ensemble, the
//! context selector and the pipeline.

pub mod ensemble_tests;
pub mod support;
