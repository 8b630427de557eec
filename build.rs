use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let proto_files = ["proto/posts.proto", "proto/statistic.proto"];
    let includes = ["proto"];

    // Parsed in-process by protox; no protoc on the build host.
    let descriptors = protox::compile(proto_files, includes)?;

    tonic_prost_build::configure()
        .build_server(false)
        .build_client(true)
        .compile_fds(descriptors)?;

    for file in proto_files {
        println!("cargo:rerun-if-changed={file}");
    }

    Ok(())
}
