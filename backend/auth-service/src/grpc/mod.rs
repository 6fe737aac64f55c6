/// gRPC server module for auth-service
///
/// Exports:
/// - AuthServer: gRPC server implementation
/// - palisade: Generated protobuf types from auth_service.proto
pub mod server;

pub use server::palisade;
pub use server::AuthServer;
