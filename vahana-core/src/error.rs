//! Error types for the Vahana comparison core.
//!
//! Uses `thiserror` for public API error types. The comparison engine itself never
//! fails (malformed data degrades to sentinels); errors only arise at the edges:
//! loading configuration, loading a catalog, and delivering notifications.

use std::path::PathBuf;

/// Top-level error type for the Vahana core library.
#[derive(Debug, thiserror::Error)]
pub enum VahanaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// Errors from catalog loading and lookup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Vehicle not found: {id}")]
    NotFound { id: String },

    #[error("Duplicate vehicle id in catalog: {id}")]
    DuplicateId { id: String },

    #[error("Catalog parse error: {message}")]
    Parse { message: String },
}

/// Errors reported by a notification sink.
///
/// The selection store logs these and carries on; they never roll back a mutation.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification surface unavailable: {message}")]
    Unavailable { message: String },
}

/// A type alias for results using the top-level `VahanaError`.
pub type Result<T> = std::result::Result<T, VahanaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_catalog() {
        let err = VahanaError::Catalog(CatalogError::NotFound {
            id: "honda-activa-6g".into(),
        });
        assert_eq!(
            err.to_string(),
            "Catalog error: Vehicle not found: honda-activa-6g"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = VahanaError::Config(ConfigError::Invalid {
            message: "selection.max_comparison must be at least 1".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid configuration: selection.max_comparison must be at least 1"
        );
    }

    #[test]
    fn test_error_display_config_file() {
        let err = ConfigError::FileNotFound {
            path: PathBuf::from("/tmp/missing.toml"),
        };
        assert_eq!(
            err.to_string(),
            "Configuration file not found: /tmp/missing.toml"
        );
    }

    #[test]
    fn test_error_from_notify() {
        let err: VahanaError = NotifyError::Unavailable {
            message: "toast host closed".into(),
        }
        .into();
        assert!(matches!(err, VahanaError::Notify(_)));
        assert!(err.to_string().contains("toast host closed"));
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: VahanaError = io.into();
        assert!(matches!(err, VahanaError::Io(_)));
    }
}
