//! Session-level error type.

use std::fmt;

use orrery_core::{InitError, SceneError};

/// Error from a [`SessionManager`](crate::SessionManager) operation.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    /// `start` was called while a session is still active.
    AlreadyRunning,
    /// The operation needs an active session and none exists.
    NotRunning,
    /// The configuration failed validation.
    InvalidConfig {
        /// What was wrong with it.
        reason: String,
    },
    /// Engine construction failed.
    Init(InitError),
    /// The engine rejected a scene mutation.
    Scene(SceneError),
    /// The worker thread panicked and could not be joined.
    WorkerUnjoinable,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "a simulation is already running"),
            Self::NotRunning => write!(f, "no active simulation"),
            Self::InvalidConfig { reason } => write!(f, "invalid configuration: {reason}"),
            Self::Init(e) => write!(f, "initialization failed: {e}"),
            Self::Scene(e) => write!(f, "scene update failed: {e}"),
            Self::WorkerUnjoinable => write!(f, "worker thread panicked"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Init(e) => Some(e),
            Self::Scene(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InitError> for SessionError {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

impl From<SceneError> for SessionError {
    fn from(e: SceneError) -> Self {
        Self::Scene(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::EntityRef;

    #[test]
    fn display_carries_inner_reason() {
        let e = SessionError::from(InitError::BackendUnavailable {
            backend: "gpu".to_string(),
        });
        assert!(e.to_string().contains("gpu"));

        let e = SessionError::from(SceneError::NoSuchEntity {
            entity: EntityRef(3),
        });
        assert!(e.to_string().contains('3'));
    }

    #[test]
    fn source_points_at_inner_error() {
        use std::error::Error;
        let e = SessionError::Init(InitError::InvalidConfig {
            reason: "bad dt".to_string(),
        });
        assert!(e.source().is_some());
        assert!(SessionError::AlreadyRunning.source().is_none());
    }
}
