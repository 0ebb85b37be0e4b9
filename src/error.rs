//! Error types for the peg solitaire crate

use thiserror::Error;

/// Main error type for the peg solitaire crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid number of levels {levels} (a board needs at least 2 and a place count that fits in usize)")]
    InvalidLevels { levels: usize },

    #[error("state string has wrong length: expected {expected} places, got {got}")]
    InvalidStateLength { expected: usize, got: usize },

    #[error("invalid character '{character}' at position {position} (expected '0' or '1')")]
    InvalidStateCharacter { character: char, position: usize },

    #[error("invalid initial number of empty places {count} (must be between 1 and {max})")]
    InvalidEmptyCount { count: usize, max: usize },

    #[error("place ordinal {ordinal} is out of range (board has {places} places)")]
    InvalidOrdinal { ordinal: usize, places: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("move {source_ordinal} -> {target_ordinal} is not a legal jump")]
    MoveRejected {
        source_ordinal: usize,
        target_ordinal: usize,
    },

    #[error("action '{action}' rejected: {reason}")]
    ActionRejected { action: String, reason: String },

    #[error("place {ordinal} is already occupied")]
    PlaceAlreadyOccupied { ordinal: usize },

    #[error("place {ordinal} is already empty")]
    PlaceAlreadyEmpty { ordinal: usize },

    #[error("non-terminal state '{state}' has no available actions")]
    NoActionsAvailable { state: String },

    #[error("invalid policy line {line_number}: '{line}'")]
    InvalidPolicyLine { line_number: usize, line: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Error taxonomy shared by every operation of the board core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad level count, state string, ordinal or configuration value.
    InvalidArgument,
    /// A move or action failed the legality check or could not be parsed.
    Rejected,
    /// Occupancy transition that would be a no-op; an engine bug if reached.
    InvalidState,
    /// Filesystem, serialization and reporting failures.
    Infrastructure,
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidLevels { .. }
            | Error::InvalidStateLength { .. }
            | Error::InvalidStateCharacter { .. }
            | Error::InvalidEmptyCount { .. }
            | Error::InvalidOrdinal { .. }
            | Error::InvalidConfiguration { .. } => ErrorKind::InvalidArgument,
            Error::MoveRejected { .. } | Error::ActionRejected { .. } => ErrorKind::Rejected,
            Error::PlaceAlreadyOccupied { .. } | Error::PlaceAlreadyEmpty { .. } => {
                ErrorKind::InvalidState
            }
            Error::NoActionsAvailable { .. }
            | Error::InvalidPolicyLine { .. }
            | Error::Io { .. }
            | Error::Serialization(_)
            | Error::SerializationContext { .. }
            | Error::Csv(_)
            | Error::ProgressBarTemplate { .. } => ErrorKind::Infrastructure,
        }
    }

    /// Rejected moves and actions leave the board untouched; the caller decides
    /// how to continue.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Rejected
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_recoverable() {
        let err = Error::MoveRejected {
            source_ordinal: 1,
            target_ordinal: 4,
        };
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert!(err.is_recoverable());

        let err = Error::ActionRejected {
            action: "x".to_string(),
            reason: "missing separator".to_string(),
        };
        assert!(err.is_recoverable());
    }

    #[test]
    fn argument_and_state_errors_are_fatal() {
        assert_eq!(Error::InvalidLevels { levels: 1 }.kind(), ErrorKind::InvalidArgument);
        assert!(!Error::InvalidLevels { levels: 1 }.is_recoverable());
        assert_eq!(
            Error::PlaceAlreadyEmpty { ordinal: 3 }.kind(),
            ErrorKind::InvalidState
        );
    }
}
