//! Build script for rtc-bridge.
//!
//! Without the `native` feature nothing is linked and the crate runs on its
//! in-process loopback engine. With it, links against the engine library
//! found in `WEBRTC_LIB_DIR`.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=WEBRTC_LIB_DIR");
    println!("cargo:rerun-if-env-changed=WEBRTC_LIB_NAME");

    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    let lib_name = env::var("WEBRTC_LIB_NAME").unwrap_or_else(|_| "webrtc".to_string());
    let lib_dir = match env::var_os("WEBRTC_LIB_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            println!(
                "cargo:warning=WEBRTC_LIB_DIR not set; relying on the default linker search path for lib{}",
                lib_name
            );
            link_system_libs();
            println!("cargo:rustc-link-lib=static={}", lib_name);
            return;
        }
    };

    if !lib_dir.exists() {
        panic!(
            "WEBRTC_LIB_DIR points at {}, which does not exist",
            lib_dir.display()
        );
    }

    // Tell cargo to link against the engine (static)
    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib=static={}", lib_name);
    link_system_libs();

    // Rerun if the library itself is rebuilt
    let target = env::var("TARGET").unwrap_or_default();
    let lib_file = if target.contains("msvc") {
        lib_dir.join(format!("{}.lib", lib_name))
    } else {
        lib_dir.join(format!("lib{}.a", lib_name))
    };
    if lib_file.exists() {
        println!("cargo:rerun-if-changed={}", lib_file.display());
    }
}

/// System libraries the engine needs, per target OS.
fn link_system_libs() {
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    match target_os.as_str() {
        "macos" | "ios" => {
            println!("cargo:rustc-link-lib=framework=CoreFoundation");
            println!("cargo:rustc-link-lib=framework=Foundation");
            println!("cargo:rustc-link-lib=framework=AudioToolbox");
            println!("cargo:rustc-link-lib=framework=CoreAudio");
            println!("cargo:rustc-link-lib=framework=SystemConfiguration");
            println!("cargo:rustc-link-lib=c++");
        }
        "linux" => {
            println!("cargo:rustc-link-lib=pthread");
            println!("cargo:rustc-link-lib=dl");
            println!("cargo:rustc-link-lib=stdc++");
        }
        "android" => {
            println!("cargo:rustc-link-lib=log");
            println!("cargo:rustc-link-lib=OpenSLES");
            println!("cargo:rustc-link-lib=c++_shared");
        }
        "windows" => {
            println!("cargo:rustc-link-lib=ws2_32");
            println!("cargo:rustc-link-lib=secur32");
            println!("cargo:rustc-link-lib=winmm");
            println!("cargo:rustc-link-lib=iphlpapi");
        }
        _ => {}
    }
}
