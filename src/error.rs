use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from reading or writing the bookmark store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bookmark store could not be parsed or serialized.
    #[error("Bookmark file error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A bookmark was requested but none are left to show.
    #[error("No bookmarks left to show")]
    EmptyCollection,

    /// No bookmark with the given identifier exists.
    #[error("Bookmark not found: {0}")]
    NotFound(String),

    /// The log file writer could not be set up.
    #[error("Logging error: {0}")]
    Logging(String),

    /// The URL could not be handed to a browser.
    #[error("Cannot open in browser: {0}")]
    Browser(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Json(_)));
        assert!(app_err.to_string().starts_with("Bookmark file error:"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn empty_collection_display() {
        assert_eq!(
            AppError::EmptyCollection.to_string(),
            "No bookmarks left to show"
        );
    }

    #[test]
    fn not_found_display() {
        let err = AppError::NotFound("abc123".into());
        assert_eq!(err.to_string(), "Bookmark not found: abc123");
    }
}
