// Build script for api-gateway
// Compiles auth_service.proto for the gRPC client used by the gateway
fn main() {
    println!("cargo:rerun-if-changed=../proto/services/auth_service.proto");

    // api-gateway CONSUMES AuthService (client only)
    tonic_build::configure()
        .build_server(false)
        .build_client(true)
        .compile_protos(
            &["../proto/services/auth_service.proto"],
            &["../proto/services"],
        )
        .expect("Failed to compile auth_service.proto for api-gateway");
}
