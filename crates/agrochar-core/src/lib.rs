//! Core types for the AgroChar marketplace client: the operation table,
//! request descriptors, wire models, session storage contract, configuration
//! and error taxonomy.

pub mod config;
pub mod error;
pub mod model;
pub mod operation;
pub mod request;
pub mod session;

pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ErrorKind, StorageError};
pub use operation::Operation;
pub use request::{HttpMethod, RequestDescriptor};
pub use session::{MemorySessionStore, Session, SessionStore};
