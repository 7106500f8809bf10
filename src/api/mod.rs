pub mod client;
pub mod loader;
pub mod traits;
pub mod types;

pub use client::AvailabilityClient;
pub use loader::{AvailabilityLoader, LoadOutcome};
pub use traits::AvailabilitySource;
pub use types::{AvailabilityQuery, AvailabilityResponse, AvailabilitySnapshot};
