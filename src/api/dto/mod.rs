//! Data Transfer Objects for REST request/response serialization.
//!
//! View models themselves live in [`crate::domain::view_model`]; this module
//! only adds query parameters and list envelopes.

pub mod common_dto;
pub mod view_dto;

pub use common_dto::*;
pub use view_dto::*;
