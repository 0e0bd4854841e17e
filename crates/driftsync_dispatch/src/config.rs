//! Dispatcher configuration.

/// Configuration for the mutation dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Maximum accepted envelope body size in bytes.
    pub max_envelope_bytes: usize,
    /// Whether accepted mutations log their full row payload at debug
    /// level. Off by default; table and row id are always logged.
    pub log_rows: bool,
}

impl DispatcherConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            max_envelope_bytes: 1024 * 1024,
            log_rows: false,
        }
    }

    /// Sets the maximum envelope body size.
    pub fn with_max_envelope_bytes(mut self, bytes: usize) -> Self {
        self.max_envelope_bytes = bytes;
        self
    }

    /// Enables full row payload logging.
    pub fn with_row_logging(mut self) -> Self {
        self.log_rows = true;
        self
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DispatcherConfig::default();
        assert_eq!(config.max_envelope_bytes, 1024 * 1024);
        assert!(!config.log_rows);
    }

    #[test]
    fn config_builder() {
        let config = DispatcherConfig::new()
            .with_max_envelope_bytes(4096)
            .with_row_logging();
        assert_eq!(config.max_envelope_bytes, 4096);
        assert!(config.log_rows);
    }
}
