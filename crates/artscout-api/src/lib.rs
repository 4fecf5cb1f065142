// HTTP client for The Met Collection API
// No key, no auth, no rate limit headers - about as friendly as APIs get
pub mod met;
pub mod retry;

pub use met::{
    MetClient, MetClientConfig, MetError, MetObject, MetSearchResponse, MetTag,
    DEFAULT_TIMEOUT_SECS, MET_API_BASE,
};
pub use retry::RetryConfig;
