//! HTTP request handlers for the atlas service endpoints.
//!
//! This module is organized into submodules:
//! - `ows`: OWS entry point and REQUEST dispatch
//! - `capabilities`: GetCapabilities handler
//! - `print`: GetPrint orchestration (validate, export, stream artifact)
//! - `health`: Health check and metrics endpoints
//! - `common`: Shared response helpers

pub mod capabilities;
pub mod common;
pub mod health;
pub mod ows;
pub mod print;

pub use health::{health_handler, metrics_handler};
pub use ows::ows_handler;
