// Build script for auth-service
// Compiles auth_service.proto for gRPC server code generation
fn main() {
    println!("cargo:rerun-if-changed=../proto/services/auth_service.proto");

    // auth-service PROVIDES AuthService (server implementation)
    // Client code is also generated for integration tests
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["../proto/services/auth_service.proto"],
            &["../proto/services"],
        )
        .expect("Failed to compile auth_service.proto for auth-service");
}
