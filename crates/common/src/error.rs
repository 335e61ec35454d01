use serde::Serialize;

/// Coarse classification shared by every layer's error type.
///
/// Callers decide on retries and status codes from the kind alone:
/// `NotFound`, `ValidationFailed` and `VersionConflict` are expected outcomes,
/// the `*Unavailable` kinds are transient infrastructure failures, and
/// `CompensationFailed` means reserved stock may be orphaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    VersionConflict,
    ValidationFailed,
    UnknownEventType,
    StoreUnavailable,
    BusUnavailable,
    CompensationFailed,
    DeadlineExceeded,
    Internal,
}

impl ErrorKind {
    /// Returns true for failures a caller may reasonably retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorKind::VersionConflict
                | ErrorKind::StoreUnavailable
                | ErrorKind::BusUnavailable
                | ErrorKind::DeadlineExceeded
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::VersionConflict => "version_conflict",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::UnknownEventType => "unknown_event_type",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::BusUnavailable => "bus_unavailable",
            ErrorKind::CompensationFailed => "compensation_failed",
            ErrorKind::DeadlineExceeded => "deadline_exceeded",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
