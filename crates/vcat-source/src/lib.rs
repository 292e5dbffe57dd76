//! # vcat-source
//!
//! Everything that turns raw catalog data into typed records:
//! - [`DatasetLoader`] reads the bundled XML snapshots
//! - [`RemoteClient`] fetches the live vPIC endpoints under a [`RetryPolicy`]
//! - [`records`] validates decoded XML against the vPIC response shape

pub mod dataset;
pub mod http;
pub mod records;
pub mod retry;
pub mod xml;

mod error;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use dataset::DatasetLoader;
pub use error::SourceError;
pub use http::{HttpTransport, RemoteClient};
pub use records::{MakeRecord, decode_makes, decode_vehicle_types};
pub use retry::{Backoff, RetryPolicy};
