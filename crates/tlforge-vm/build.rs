use std::path::PathBuf;

/// Emits Rust bindings for the test schema so the tests can compile and run them.
fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR not set");
    let schema_path = PathBuf::from(&manifest_dir).join("src/fixture.tl");

    let source = std::fs::read_to_string(&schema_path).expect("failed to read src/fixture.tl");
    let schema = tlforge_compiler::compile(&source).expect("src/fixture.tl does not compile");
    let generated = tlforge_compiler::emit::rust::emit(&schema);

    std::fs::write(PathBuf::from(out_dir).join("generated.rs"), generated)
        .expect("failed to write generated bindings");

    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed={}", schema_path.display());
}
