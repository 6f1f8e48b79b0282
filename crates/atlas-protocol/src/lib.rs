//! Request protocol for the atlas print service.
//!
//! Covers query parameter handling and validation for GetPrint, the `$id`
//! filter rewrite, and the GetCapabilities response types. The HTTP layer
//! stays thin: everything that can be checked without a running server
//! lives here.

pub mod capabilities;
pub mod optimizer;
pub mod params;
pub mod validate;

pub use capabilities::{CapabilitiesResponse, ServiceMetadata};
pub use optimizer::{optimize_expression, PkPolicy};
pub use params::RequestParams;
pub use validate::{resolve_print, validate_print_params, PrintParams, ResolvedPrint};
