//! Process-wide tracing setup shared by the binaries.

/// Initialize structured logging for `service`.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init(service: &'static str) {
    tracing::init(service, tracing::LogFormat::from_env());
}

/// Subscriber configuration (filters, output format).
pub mod tracing;
