//! # vcat-core
//!
//! Core types shared by every vcat crate:
//! - [`Make`] and [`VehicleType`], the values held by a catalog store
//! - [`FallbackTable`], the offline make → vehicle-type mapping consulted
//!   whenever authoritative type data cannot be resolved

pub mod entities;
pub mod fallback;

pub use entities::{Make, VehicleType};
pub use fallback::FallbackTable;
