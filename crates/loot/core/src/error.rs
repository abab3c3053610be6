//! Common error infrastructure for loot-core.
//!
//! Domain errors are small thiserror enums classified by severity, so the
//! runtime can decide between user-facing notification, a cue, and a log
//! line without matching on every variant.

/// Severity level of an error, used for categorization and handling
/// strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same interaction may succeed later
    /// (e.g. after moving into reach or the lock being removed).
    Recoverable,

    /// Invalid input that should be rejected without retry.
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for loot-core errors.
pub trait CoreError: core::fmt::Display + core::fmt::Debug {
    /// Severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, for logs and metrics.
    fn error_code(&self) -> &'static str;
}

/// Errors detected while validating an interaction request.
///
/// These never propagate past the interaction entry point: the embedding
/// host surfaces them as user notifications (or a cue, for `Locked`).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InteractionError {
    /// Zero or several controlled tokens attempted the interaction.
    #[error("you must be controlling exactly one token to pick up an item")]
    ControlRequired { found: usize },

    /// The controlling token is farther than one grid cell away.
    #[error("you are too far away to interact with that")]
    OutOfRange { distance: f64, max: f64 },

    /// The target container is locked.
    #[error("the container is locked")]
    Locked,
}

impl CoreError for InteractionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ControlRequired { .. } => ErrorSeverity::Validation,
            Self::OutOfRange { .. } | Self::Locked => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ControlRequired { .. } => "INTERACTION_CONTROL_REQUIRED",
            Self::OutOfRange { .. } => "INTERACTION_OUT_OF_RANGE",
            Self::Locked => "INTERACTION_LOCKED",
        }
    }
}

/// Violations of the container flag invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    /// A locked container cannot be opened.
    #[error("a locked container cannot be opened")]
    OpenWhileLocked,

    /// An open container cannot be locked.
    #[error("an open container cannot be locked")]
    LockWhileOpen,
}

impl CoreError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OpenWhileLocked => "STATE_OPEN_WHILE_LOCKED",
            Self::LockWhileOpen => "STATE_LOCK_WHILE_OPEN",
        }
    }
}
