//! OctoPrint HTTP client.
//!
//! This module owns everything between a typed resource call and the wire:
//!
//! - **Configuration** of base URL, API key, timeouts and retries
//! - **Authentication** through the `X-Api-Key` header
//! - **Response normalization** to snake_case JSON
//! - **Error mapping** from HTTP statuses to [`OctoPrintError`](crate::OctoPrintError)
//! - **Retries** with exponential backoff, off unless configured
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch    - OctoPrintClient and HTTP operations
//! ├── response - ApiResponse and body normalization
//! ├── config   - Client configuration
//! └── utils    - URL building, status classification, backoff
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`OctoPrintClient`] | HTTP client with typed resource accessors |
//! | [`ClientConfig`] | Client configuration options |
//! | [`ApiResponse`] | Status, headers and normalized body |
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use octoprint_client::client::{ClientConfig, OctoPrintClient};
//!
//! let config = ClientConfig {
//!     max_retries: 3,
//!     retry_delay_ms: 1000,
//!     ..ClientConfig::new("http://octopi.local").with_api_key("API_KEY")
//! };
//! let client = OctoPrintClient::new(config).unwrap();
//! assert_eq!(client.base_url().as_str(), "http://octopi.local/");
//! ```
//!
//! ## Utility Functions
//!
//! ```
//! use octoprint_client::client::{exponential_backoff, is_retryable_status};
//! use std::time::Duration;
//!
//! assert!(is_retryable_status(503));
//! assert!(!is_retryable_status(404));
//!
//! let delay = exponential_backoff(2, 100);
//! assert_eq!(delay, Duration::from_millis(400));
//! ```

mod config;
mod fetch;
mod response;
pub(crate) mod utils;

pub use config::{ClientConfig, ENV_API_KEY, ENV_HOST, ENV_URL};
pub use fetch::OctoPrintClient;
pub use response::ApiResponse;
pub use utils::*;
