use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    #[error("window placement failed: {0}")]
    Placement(String),

    #[error("no such window: {0}")]
    NoSuchWindow(crate::WindowId),

    #[error("not supported: {0}")]
    NotSupported(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CanopyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("replay error: {0}")]
    Replay(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WindowId;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("tooltip.max_length must be > 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: tooltip.max_length must be > 0"
        );
    }

    #[test]
    fn platform_error_display() {
        let err = PlatformError::WindowCreation("class not registered".into());
        assert_eq!(err.to_string(), "window creation failed: class not registered");

        let err = PlatformError::NoSuchWindow(WindowId(7));
        assert_eq!(err.to_string(), "no such window: window-7");

        let err = PlatformError::NotSupported("headless".into());
        assert_eq!(err.to_string(), "not supported: headless");
    }

    #[test]
    fn canopy_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: CanopyError = config_err.into();
        assert!(matches!(err, CanopyError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn canopy_error_from_platform() {
        let platform_err = PlatformError::Placement("transaction rejected".into());
        let err: CanopyError = platform_err.into();
        assert!(matches!(err, CanopyError::Platform(_)));
        assert!(err.to_string().contains("transaction rejected"));
    }

    #[test]
    fn canopy_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CanopyError = io_err.into();
        assert!(matches!(err, CanopyError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn canopy_error_other_variants() {
        let err = CanopyError::Replay("unknown event".into());
        assert_eq!(err.to_string(), "replay error: unknown event");

        let err = CanopyError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
