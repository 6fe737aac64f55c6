/// Auth Service Library
///
/// Session token issuance, validation, and revocation for Palisade services.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `db`: Database repositories
/// - `error`: Error types
/// - `grpc`: gRPC server implementation
/// - `models`: Data models
/// - `security`: Password hashing, token codec, token revocation
/// - `services`: Token lifecycle service
pub mod config;
pub mod db;
pub mod error;
pub mod grpc;
pub mod models;
pub mod security;
pub mod services;

// Re-export commonly used types
pub use error::{AuthError, Result};
pub use grpc::AuthServer;
