//! Crate-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdaterError {
    #[error("config error: {0}")]
    Config(String),

    #[error("registration error: {0}")]
    Registration(String),

    #[error("invalid callback: {0}")]
    InvalidCallback(String),

    #[error("unknown handler id: {0}")]
    UnknownHandler(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = UpdaterError::Config("missing field".into());
        assert!(e.to_string().contains("missing field"));
    }

    #[test]
    fn registration_error_display() {
        let e = UpdaterError::Registration("no host component".into());
        assert!(e.to_string().contains("no host component"));
    }

    #[test]
    fn unknown_handler_display() {
        let e = UpdaterError::UnknownHandler("deadbeef".into());
        assert!(e.to_string().contains("deadbeef"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let e: UpdaterError = io_err.into();
        assert!(e.to_string().contains("io error"));
        // satisfies std::error::Error trait
        let _: &dyn Error = &e;
    }
}
