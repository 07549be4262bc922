pub mod endpoint;
pub mod pagespeed;
pub mod traits;

pub use endpoint::EndpointBackend;
pub use pagespeed::PageSpeedBackend;
pub use traits::{ScanBackend, ScanError, ScanReport};
