use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// The abbreviated commit hash as a number, or `0` outside a git checkout.
fn revision() -> u32 {
    Command::new("git")
        .args(&["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .and_then(|hash| u32::from_str_radix(hash.trim(), 16).ok())
        .unwrap_or(0)
}

fn main() {
    let manifest = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap_or_default());

    let generated = format!("pub const REVISION: u32 = {:#010x};\n", revision());
    if let Err(e) = fs::write(out.join("revision.rs"), generated) {
        panic!("writing revision.rs: {}", e);
    }

    println!("cargo:rustc-link-arg-bins=-T{}", manifest.join("layout.ld").display());
    println!("cargo:rerun-if-changed=layout.ld");
    println!("cargo:rerun-if-changed=../.git/HEAD");
}
