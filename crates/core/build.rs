//! Build script injecting the build identifier into the version descriptor

fn main() {
    println!("cargo:rerun-if-env-changed=TESSERA_BUILD_ID");

    let build_id = std::env::var("TESSERA_BUILD_ID")
        .ok()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| "dev".to_string());

    println!("cargo:rustc-env=TESSERA_BUILD_ID={}", build_id);
}
