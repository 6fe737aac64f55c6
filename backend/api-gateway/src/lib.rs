/// API Gateway Library
///
/// Edge HTTP surface for Palisade: public auth endpoints proxied to the auth
/// service over gRPC, and protected routes behind the authentication gate.
///
/// ## Modules
///
/// - `clients`: gRPC client for the auth service
/// - `config`: Gateway configuration
/// - `middleware`: Authentication gate
/// - `rest_api`: HTTP handlers and wire models
pub mod clients;
pub mod config;
pub mod middleware;
pub mod rest_api;
