//! Shared test utilities for the atlas-print workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Canned project definitions for the in-memory layout engine
//! - Helpers that write project files into temporary project directories
//! - Query string builders for OWS endpoint tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::fixtures;
//! ```

pub mod fixtures;
pub mod requests;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use requests::*;
