//! Atlas print API service library.
//!
//! This module exposes the internal modules for testing purposes.

pub mod app;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod sanitize;
pub mod state;
pub mod sweeper;
