//! Request and response shapes exchanged with the backend.

pub mod advisory;
pub mod auth;
pub mod buyer;
pub mod farmer;

pub use advisory::AdvisoryRequest;
pub use auth::{LoginRequest, LoginResponse, RegisterRequest, Role};
pub use buyer::{BidRequest, ConnectRequest, ListingFilters, NearbyBuyersQuery};
pub use farmer::FieldRequest;
