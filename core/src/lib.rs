//! # render-debug core
//!
//! Math type aliases, geometric helpers and packed colors shared by the
//! debug drawing crates.

pub mod color;
pub mod math;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logs the library version once at startup.
pub fn init() {
    log::info!("render-debug core v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
