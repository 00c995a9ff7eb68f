//! Error types shared across the Orrery workspace.
//!
//! Organized by subsystem: initialization (engine construction), step
//! (failures inside the running loop), and scene (mutation calls on a
//! live engine). Session-level and export errors live with their
//! subsystems in `orrery-session` and `orrery-telemetry`.

use std::error::Error;
use std::fmt;

use crate::id::EntityRef;

/// Errors from engine/session construction.
///
/// Terminal for the `start()` call that triggered them — the session
/// reports the error and returns to idle without spawning a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitError {
    /// The requested compute backend is not available.
    BackendUnavailable {
        /// Name of the backend that could not be brought up.
        backend: String,
    },
    /// Scene or world construction failed inside the engine.
    SceneConstruction {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The engine rejected the session configuration.
    InvalidConfig {
        /// Description of the rejected parameter.
        reason: String,
    },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackendUnavailable { backend } => {
                write!(f, "backend '{backend}' unavailable")
            }
            Self::SceneConstruction { reason } => {
                write!(f, "scene construction failed: {reason}")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "engine rejected config: {reason}")
            }
        }
    }
}

impl Error for InitError {}

/// Errors from [`Engine::step`](crate::Engine::step).
///
/// Terminal for the current run: the worker logs the error and exits
/// its loop, leaving already-collected samples intact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// The engine failed to advance the simulation.
    EngineFault {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The engine handle was torn down while the loop was running.
    HandleLost,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineFault { reason } => write!(f, "engine step failed: {reason}"),
            Self::HandleLost => write!(f, "engine handle lost"),
        }
    }
}

impl Error for StepError {}

/// Errors from scene mutation calls on a live engine
/// (`add_entity`, collision setters, renderer/camera/recording).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// The referenced entity does not exist in the engine.
    NoSuchEntity {
        /// The stale handle.
        entity: EntityRef,
    },
    /// The engine cannot realize the requested spec.
    UnsupportedSpec {
        /// Description of the unsupported feature.
        reason: String,
    },
    /// `stop_recording` was called with no recording in progress.
    RecordingInactive,
    /// The engine failed internally while applying the change.
    EngineFault {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchEntity { entity } => write!(f, "no such entity: {entity}"),
            Self::UnsupportedSpec { reason } => write!(f, "unsupported spec: {reason}"),
            Self::RecordingInactive => write!(f, "no recording in progress"),
            Self::EngineFault { reason } => write!(f, "engine fault: {reason}"),
        }
    }
}

impl Error for SceneError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = InitError::BackendUnavailable {
            backend: "gpu".into(),
        };
        assert_eq!(e.to_string(), "backend 'gpu' unavailable");

        let e = StepError::EngineFault {
            reason: "solver diverged".into(),
        };
        assert_eq!(e.to_string(), "engine step failed: solver diverged");

        let e = SceneError::NoSuchEntity { entity: EntityRef(3) };
        assert_eq!(e.to_string(), "no such entity: 3");
    }
}
