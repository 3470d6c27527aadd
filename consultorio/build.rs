fn main() {
    // Set RUST_LOG_PRETTY=1 at build time for multi-line log output.
    println!("cargo::rustc-check-cfg=cfg(tracing_pretty)");
    println!("cargo::rerun-if-env-changed=RUST_LOG_PRETTY");
    if std::env::var("RUST_LOG_PRETTY").is_ok_and(|value| value == "1") {
        println!("cargo::rustc-cfg=tracing_pretty");
    }
}
