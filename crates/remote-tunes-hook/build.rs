//! Marks the `.shared` data section as shared between every process that
//! loads the hook module.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let env = std::env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();

    if os == "windows" && env == "msvc" {
        println!("cargo:rustc-cdylib-link-arg=/SECTION:.shared,RWS");
    } else if os == "windows" {
        println!(
            "cargo:warning=.shared section sharing is only configured for MSVC; \
             hook copies will not see the relay destination"
        );
    }
}
