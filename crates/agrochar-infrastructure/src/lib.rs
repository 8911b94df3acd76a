pub mod config_service;
pub mod paths;
pub mod session_store;

pub use crate::config_service::ConfigService;
pub use crate::paths::AgroPaths;
pub use crate::session_store::FileSessionStore;
