pub mod client;
pub mod errors;
pub mod guard;
pub mod pipeline;
pub mod types;

pub use client::{PageFetcher, build_api_client};
pub use errors::FetchError;
pub use guard::HostPolicy;
pub use types::PageResponse;
