//! Build-time fingerprint of the embedded USB ID registry
//!
//! The registry text in `data/usb.ids` is compiled into the library with
//! `include_str!`. This build script hashes it so the binary can report which
//! snapshot of the registry it carries (`hwid info`), even when the header
//! `Version:` line was not bumped by whoever refreshed the file.
//!
//! ## How it works:
//! 1. At build time: Hash the registry data and store it as REGISTRY_DATA_FINGERPRINT
//! 2. At runtime: `hwids::DATA_FINGERPRINT` exposes the value
//! 3. On data change: cargo reruns this script and the fingerprint changes

use std::fs;
use std::path::Path;

/// Registry data files compiled into the library
const EMBEDDED_DATA_FILES: &[&str] = &["data/usb.ids"];

fn main() {
    let fingerprint = compute_data_fingerprint();

    println!("cargo:rustc-env=REGISTRY_DATA_FINGERPRINT={}", fingerprint);

    for file in EMBEDDED_DATA_FILES {
        println!("cargo:rerun-if-changed={}", file);
    }
}

/// Compute a deterministic hash of the embedded registry data
fn compute_data_fingerprint() -> String {
    let mut hasher = blake3::Hasher::new();

    for file_path in EMBEDDED_DATA_FILES {
        let path = Path::new(file_path);

        if !path.exists() {
            panic!("Embedded registry file not found: {}", file_path);
        }

        let content = fs::read(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", file_path, e));

        hasher.update(file_path.as_bytes());
        hasher.update(&content);
    }

    // First 16 hex chars (64 bits) are plenty to tell snapshots apart
    let hash = hasher.finalize();

    hash.as_bytes()[..8]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
}
