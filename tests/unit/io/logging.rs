//! Tests for diagnostic logging setup

#[cfg(test)]
mod tests {
    use tilemosaic::io::logging::{default_directive, init_logging, log_filter};

    // Tests debug mode selects the debug level
    // Verified by returning info unconditionally
    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true), "debug");
        assert_eq!(default_directive(false), "info");
    }

    // Tests debug mode overrides the environment
    // Verified by reading RUST_LOG before the debug check
    #[test]
    fn test_log_filter_debug() {
        assert_eq!(log_filter(true).to_string(), "debug");
    }

    // Tests the global subscriber is installed at most once
    // Verified by panicking on a second installation
    #[test]
    fn test_init_logging_once() {
        init_logging(false);
        assert!(!init_logging(true));
    }
}
