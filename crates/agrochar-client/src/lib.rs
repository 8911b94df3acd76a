//! Async client for the AgroChar residue marketplace.
//!
//! Layers, outermost first:
//!
//! - [`MockFallback`]: optional canned-data substitution for failed calls
//! - [`ApiClient`]: one method per backend operation ([`AgroCharApi`])
//! - [`HttpTransport`]: headers, timeout, 401 handling, error mapping
//! - [`HttpBackend`]: the network exchange itself
//!
//! ```no_run
//! use agrochar_client::{AgroCharApi, ApiClient, MockFallback};
//! use agrochar_core::model::NearbyBuyersQuery;
//! use agrochar_core::{ClientConfig, MemorySessionStore};
//! use std::sync::Arc;
//!
//! # async fn run() -> agrochar_core::ApiResult<()> {
//! let config = ClientConfig::default();
//! let client = ApiClient::from_config(&config, Arc::new(MemorySessionStore::new()));
//! let api = MockFallback::from_config(client, &config);
//!
//! let buyers = api
//!     .nearby_buyers(&NearbyBuyersQuery::new("Ludhiana").with_type("biochar"))
//!     .await?;
//! println!("{buyers}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod backend;
pub mod client;
pub mod events;
pub mod mock;
pub mod transport;

pub use api::AgroCharApi;
pub use backend::{BackendError, HttpBackend, OutgoingRequest, RawResponse, ReqwestBackend};
pub use client::ApiClient;
pub use events::{ClearReason, SessionEvent, SessionEvents};
pub use mock::{MockFallback, MockTable};
pub use transport::HttpTransport;
