//! Session configuration and validation.

use std::time::Duration;

use orrery_core::{ComputeBackend, ObjectSpec, SimParams, Vec3};
use orrery_telemetry::TrackingFlags;

use crate::error::SessionError;

/// Everything `start()` needs: engine parameters, worker pacing, the
/// baseline scene, and tracking selection.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Simulation timestep in seconds.
    pub dt: f64,
    /// Solver substeps per step.
    pub substeps: u32,
    /// Gravity vector in m/s². Also used for potential energy.
    pub gravity: Vec3,
    /// Compute backend preference, forwarded to the factory.
    pub backend: ComputeBackend,
    /// Target worker stepping rate in steps per wall-clock second.
    pub target_hz: f64,
    /// How often the worker appends a STATUS line to the console.
    pub status_interval: Duration,
    /// When true, `start()` logs the full parameter set as CONFIG
    /// lines before the init banner.
    pub verbose: bool,
    /// Objects created before the worker spawns.
    pub baseline: Vec<ObjectSpec>,
    /// Which per-sample fields the tracker records.
    pub tracking: TrackingFlags,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            substeps: 2,
            gravity: Vec3::new(0.0, 0.0, -9.81),
            backend: ComputeBackend::Cpu,
            target_hz: 100.0,
            status_interval: Duration::from_secs(1),
            verbose: false,
            baseline: vec![
                ObjectSpec::ground_plane(0.0),
                ObjectSpec::sphere(Vec3::new(0.0, 0.0, 1.0), 0.2),
            ],
            tracking: TrackingFlags::default(),
        }
    }
}

impl SessionConfig {
    /// The engine-facing slice of this configuration.
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            dt: self.dt,
            substeps: self.substeps,
            gravity: self.gravity,
            backend: self.backend,
        }
    }

    /// Per-step wall-clock budget derived from `target_hz`.
    ///
    /// Only meaningful after [`validate`](Self::validate) has passed;
    /// validation guarantees the reciprocal is finite.
    pub fn step_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_hz)
    }

    /// Reject configurations the worker cannot honor.
    pub fn validate(&self) -> Result<(), SessionError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SessionError::InvalidConfig {
                reason: format!("dt must be finite and positive, got {}", self.dt),
            });
        }
        if self.substeps < 1 {
            return Err(SessionError::InvalidConfig {
                reason: "substeps must be at least 1".to_string(),
            });
        }
        if !self.gravity.is_finite() {
            return Err(SessionError::InvalidConfig {
                reason: format!("gravity must be finite, got {}", self.gravity),
            });
        }
        // The reciprocal check catches subnormal rates whose per-step
        // budget would overflow to infinity.
        if !self.target_hz.is_finite()
            || self.target_hz <= 0.0
            || !(1.0 / self.target_hz).is_finite()
        {
            return Err(SessionError::InvalidConfig {
                reason: format!("target_hz must be a usable rate, got {}", self.target_hz),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_config_validates() {
        assert!(SessionConfig::default().validate().is_ok());
        assert_eq!(SessionConfig::default().baseline.len(), 2);
    }

    #[test]
    fn zero_dt_rejected() {
        let config = SessionConfig {
            dt: 0.0,
            ..Default::default()
        };
        match config.validate() {
            Err(SessionError::InvalidConfig { reason }) => assert!(reason.contains("dt")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn zero_substeps_rejected() {
        let config = SessionConfig {
            substeps: 0,
            ..Default::default()
        };
        match config.validate() {
            Err(SessionError::InvalidConfig { reason }) => assert!(reason.contains("substeps")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn nan_gravity_rejected() {
        let config = SessionConfig {
            gravity: Vec3::new(0.0, f64::NAN, 0.0),
            ..Default::default()
        };
        match config.validate() {
            Err(SessionError::InvalidConfig { reason }) => assert!(reason.contains("gravity")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn unusable_rates_rejected() {
        for hz in [0.0, -60.0, f64::INFINITY, f64::NAN, 1e-320] {
            let config = SessionConfig {
                target_hz: hz,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "target_hz {hz} should fail");
        }
    }

    #[test]
    fn step_budget_matches_rate() {
        let config = SessionConfig {
            target_hz: 100.0,
            ..Default::default()
        };
        assert_eq!(config.step_budget(), Duration::from_millis(10));
    }

    proptest! {
        #[test]
        fn ordinary_rates_validate(dt in 1e-6..1.0f64, hz in 1.0..10_000.0f64) {
            let config = SessionConfig {
                dt,
                target_hz: hz,
                ..Default::default()
            };
            prop_assert!(config.validate().is_ok());
        }
    }
}
