use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let models = manifest_dir.join("src").join("models");

    trackgen_build::generate()
        .package(&models)
        .output_dir(out_dir)
        .run()
        .expect("Failed to generate trackgen routines");

    println!("cargo:rerun-if-changed={}", models.display());
}
