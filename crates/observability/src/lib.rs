//! Tracing/logging setup shared by binaries and tests embedding the engine.

/// Initialize process-wide tracing with the default `info` filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info");
}

/// Like [`init`], with a different fallback filter when `RUST_LOG` is unset
/// (e.g. `"gatehouse_auth=debug"`).
pub fn init_with_default(default_filter: &str) {
    tracing::init(default_filter);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
