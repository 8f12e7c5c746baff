//! Service layer: read-side orchestration.
//!
//! [`ViewService`] fetches raw records through the injected
//! [`crate::source::IndexerClient`], merges them with fallback listings, and
//! returns the view models defined in [`crate::domain::view_model`].

pub mod view_service;

pub use view_service::{PageSizes, ViewService, normalize_address, normalize_entity_id};
