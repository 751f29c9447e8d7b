use serde::Serialize;
use thiserror::Error;

/// Patterns (lowercase) that indicate session material not safe for UI display.
/// Used by `contains_sensitive()` for case-insensitive matching.
pub(crate) const SENSITIVE_PATTERNS: &[&str] = &[
    "set-cookie",
    "cookie:",
    "session_id",
    "sessionid",
    "authorization:",
];

/// Returns true if the message contains any sensitive pattern (case-insensitive).
fn contains_sensitive(msg: &str) -> bool {
    let lower = msg.to_ascii_lowercase();
    SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Sanitizes a message for UI display.
/// If sensitive content is detected, returns the fallback instead.
fn sanitize_message(msg: &str, fallback: &str) -> String {
    if contains_sensitive(msg) {
        fallback.into()
    } else {
        msg.to_string()
    }
}

/// Coarse classification used by callers to decide propagation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed upload file (structural).
    Parse,
    /// Incomplete mapping or invalid form field.
    Validation,
    /// Transport failure or non-2xx response.
    Network,
    /// Referenced record does not exist server-side.
    NotFound,
    /// Anything else (decode failures, local I/O, config).
    Internal,
}

/// User-friendly error presentation for the console.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPresentation {
    pub title: String,
    pub message: String,
    pub action: Option<String>,
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    // ── File / CSV ────────────────────────────────────────────────────────────
    #[error("File is not valid UTF-8")]
    NotUtf8,

    #[error("File is empty")]
    EmptyFile,

    #[error("Invalid CSV: {0}")]
    CsvInvalid(String),

    // ── Validation ────────────────────────────────────────────────────────────
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    // ── Network ───────────────────────────────────────────────────────────────
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    // ── Local ─────────────────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    // ── Generic fallback ──────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a single-field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Maps the variant onto the error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotUtf8 | AppError::EmptyFile | AppError::CsvInvalid(_) => ErrorKind::Parse,
            AppError::Validation { .. } => ErrorKind::Validation,
            AppError::ConnectionFailed(_) | AppError::Api { .. } => ErrorKind::Network,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Config(_) | AppError::Io(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The single line pushed to the notification channel for this error.
    ///
    /// API errors surface the server's body text verbatim (sanitized), the
    /// rest use the presentation message.
    pub fn notification_text(&self) -> String {
        match self {
            AppError::Api { message, .. } => {
                sanitize_message(message, "The server rejected the request.")
            }
            AppError::Validation { message, .. } => message.clone(),
            other => other.to_presentation().message,
        }
    }

    /// Converts the error into a user-friendly presentation suitable for UI display.
    /// Never leaks cookies or session identifiers.
    pub fn to_presentation(&self) -> ErrorPresentation {
        match self {
            // ── File / CSV ────────────────────────────────────────────────────
            AppError::NotUtf8 => ErrorPresentation {
                title: "Invalid File Encoding".into(),
                message: "Failed to parse CSV: the file must be UTF-8 encoded.".into(),
                action: Some("Convert file to UTF-8".into()),
            },

            AppError::EmptyFile => ErrorPresentation {
                title: "Empty File".into(),
                message: "Failed to parse CSV: the file is empty.".into(),
                action: Some("Choose a CSV file with a header row".into()),
            },

            AppError::CsvInvalid(msg) => ErrorPresentation {
                title: "Invalid CSV".into(),
                message: format!("Failed to parse CSV: {}", msg),
                action: Some("Fix the CSV file and try again".into()),
            },

            // ── Validation ────────────────────────────────────────────────────
            AppError::Validation { field, message } => ErrorPresentation {
                title: "Invalid Input".into(),
                message: format!("{}: {}", field, message),
                action: Some("Correct the highlighted field".into()),
            },

            // ── Network ───────────────────────────────────────────────────────
            AppError::ConnectionFailed(_) => ErrorPresentation {
                title: "Connection Failed".into(),
                message: "Could not reach the import API. Please check your connection.".into(),
                action: Some("Check network and retry".into()),
            },

            AppError::Api { status, message } => ErrorPresentation {
                title: format!("Request Failed ({})", status),
                message: sanitize_message(message, "The server rejected the request."),
                action: Some("Retry the operation".into()),
            },

            AppError::NotFound(what) => ErrorPresentation {
                title: "Not Found".into(),
                message: sanitize_message(what, "The requested record no longer exists."),
                action: Some("Refresh the list".into()),
            },

            // ── Local ─────────────────────────────────────────────────────────
            AppError::Config(_) => ErrorPresentation {
                title: "Configuration Error".into(),
                message: "The console configuration could not be loaded.".into(),
                action: Some("Check the configuration file".into()),
            },

            AppError::Io(_) => ErrorPresentation {
                title: "File Error".into(),
                message: "A local file could not be read or written.".into(),
                action: Some("Check file permissions and try again".into()),
            },

            // ── Generic ───────────────────────────────────────────────────────
            AppError::Internal(_) => ErrorPresentation {
                title: "Unexpected Error".into(),
                message: "Something went wrong. Please try again.".into(),
                action: Some("Try again".into()),
            },
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_presentation().serialize(serializer)
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(e) => AppError::Io(e.to_string()),
            csv::ErrorKind::Utf8 { .. } => AppError::NotUtf8,
            _ => AppError::CsvInvalid(err.to_string()),
        }
    }
}
