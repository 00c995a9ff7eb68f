//! Sample tracking and CSV export for Orrery sessions.
//!
//! [`SampleTracker`] accumulates per-step observations (positions,
//! velocities, derived energy) keyed by simulation time, and exports
//! them to delimited files on demand. It is deliberately not
//! thread-safe: the session serializes access externally, so the hot
//! `record` path pays for no locking of its own.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod csv;
pub mod error;

pub use error::ExportError;

use std::path::Path;

use smallvec::SmallVec;

use orrery_core::{EntityQuery, Vec3};

/// Per-sample list of per-entity vectors. Typical scenes track a
/// handful of entities, so four slots live inline; larger scenes
/// spill to the heap.
pub type VecList = SmallVec<[Vec3; 4]>;

// ── EnergySample ─────────────────────────────────────────────────

/// Kinetic, potential, and total energy at one instant, in joules.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnergySample {
    /// Sum of 0.5·m·|v|² over entities with known mass and velocity.
    pub kinetic: f64,
    /// Sum of −m·(g·p) over entities with known mass and position.
    pub potential: f64,
    /// Kinetic plus potential.
    pub total: f64,
}

impl EnergySample {
    /// All-zero energy, returned when nothing has been recorded.
    pub const ZERO: EnergySample = EnergySample {
        kinetic: 0.0,
        potential: 0.0,
        total: 0.0,
    };
}

// ── Sample ───────────────────────────────────────────────────────

/// One timestamped observation of tracked physical quantities.
///
/// A `None` field means "not measured" (its tracking flag was off at
/// record time) — distinct from a measured zero. Once appended to the
/// tracker a sample is never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Simulation time of the observation, in seconds.
    pub t: f64,
    /// Per-entity positions, in query order.
    pub positions: Option<VecList>,
    /// Per-entity velocities, in query order.
    pub velocities: Option<VecList>,
    /// System energy derived from the queries.
    pub energy: Option<EnergySample>,
}

// ── TrackingFlags ────────────────────────────────────────────────

/// Which quantities [`SampleTracker::record`] populates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackingFlags {
    /// Record per-entity positions.
    pub position: bool,
    /// Record per-entity velocities.
    pub velocity: bool,
    /// Record derived kinetic/potential energy.
    pub energy: bool,
}

impl Default for TrackingFlags {
    fn default() -> Self {
        Self {
            position: true,
            velocity: true,
            energy: true,
        }
    }
}

// ── SampleTracker ────────────────────────────────────────────────

/// Accumulates time-series samples produced by the worker loop.
///
/// Not internally thread-safe; the session wraps it in a mutex and
/// serializes the worker's `record` calls against foreground reads
/// and exports.
#[derive(Debug, Default)]
pub struct SampleTracker {
    samples: Vec<Sample>,
    flags: TrackingFlags,
    gravity: Vec3,
}

impl SampleTracker {
    /// Create a tracker with the given flags. Gravity defaults to
    /// zero until [`set_gravity`](Self::set_gravity) is called.
    pub fn new(flags: TrackingFlags) -> Self {
        Self {
            samples: Vec::new(),
            flags,
            gravity: Vec3::ZERO,
        }
    }

    /// Set the gravity vector used for potential-energy sums.
    /// The session applies its configured gravity here on start.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// The gravity vector currently used for potential energy.
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// The active tracking flags.
    pub fn flags(&self) -> TrackingFlags {
        self.flags
    }

    /// Replace the tracking flags. Affects future `record` calls only.
    pub fn set_flags(&mut self, flags: TrackingFlags) {
        self.flags = flags;
    }

    /// Record one observation at simulation time `t`.
    ///
    /// For each enabled flag the relevant field is extracted from
    /// `queries`; entities missing a field are skipped, not errors.
    /// Energy sums skip entities lacking mass or the paired vector.
    pub fn record(&mut self, t: f64, queries: &[EntityQuery]) {
        let positions = self.flags.position.then(|| {
            queries
                .iter()
                .filter_map(|q| q.position)
                .collect::<VecList>()
        });
        let velocities = self.flags.velocity.then(|| {
            queries
                .iter()
                .filter_map(|q| q.velocity)
                .collect::<VecList>()
        });
        let energy = self.flags.energy.then(|| self.compute_energy(queries));

        self.samples.push(Sample {
            t,
            positions,
            velocities,
            energy,
        });
    }

    /// The most recently recorded energy, or all-zero if no sample
    /// carries energy yet.
    pub fn current_energy(&self) -> EnergySample {
        self.samples
            .iter()
            .rev()
            .find_map(|s| s.energy)
            .unwrap_or(EnergySample::ZERO)
    }

    /// Number of recorded samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether any samples have been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All recorded samples, oldest first.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Discard all samples. Flags and gravity persist.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Write up to three CSV files under `dir` (created if absent):
    /// `{prefix}_positions.csv`, `{prefix}_velocities.csv`, and
    /// `{prefix}_energy.csv`, each only when its flag is enabled and
    /// at least one sample carries that field.
    ///
    /// Returns a human-readable success message naming the files
    /// written, or [`ExportError::NoData`] when nothing qualified.
    pub fn export(&self, dir: &Path, prefix: &str) -> Result<String, ExportError> {
        csv::export(self, dir, prefix)
    }

    fn compute_energy(&self, queries: &[EntityQuery]) -> EnergySample {
        let mut kinetic = 0.0;
        let mut potential = 0.0;
        for q in queries {
            let Some(mass) = q.mass else { continue };
            if let Some(v) = q.velocity {
                kinetic += 0.5 * mass * v.norm_sq();
            }
            if let Some(p) = q.position {
                potential += -mass * self.gravity.dot(p);
            }
        }
        EnergySample {
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_query(p: Vec3, v: Vec3, m: f64) -> EntityQuery {
        EntityQuery {
            position: Some(p),
            velocity: Some(v),
            mass: Some(m),
        }
    }

    fn standard_gravity() -> Vec3 {
        Vec3::new(0.0, 0.0, -9.81)
    }

    #[test]
    fn record_produces_one_sample_per_call() {
        let mut tracker = SampleTracker::new(TrackingFlags::default());
        tracker.set_gravity(standard_gravity());
        for i in 0..7 {
            let q = full_query(
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 0.0, -0.1 * i as f64),
                1.0,
            );
            tracker.record(i as f64 * 0.01, &[q, q]);
        }
        assert_eq!(tracker.len(), 7);
        for s in tracker.samples() {
            assert_eq!(s.positions.as_ref().unwrap().len(), 2);
            assert_eq!(s.velocities.as_ref().unwrap().len(), 2);
            assert!(s.energy.is_some());
        }
    }

    #[test]
    fn disabled_flags_leave_fields_unmeasured() {
        let flags = TrackingFlags {
            position: true,
            velocity: false,
            energy: false,
        };
        let mut tracker = SampleTracker::new(flags);
        tracker.record(0.0, &[full_query(Vec3::ZERO, Vec3::ZERO, 1.0)]);

        let s = &tracker.samples()[0];
        assert!(s.positions.is_some());
        assert!(s.velocities.is_none(), "not measured, not empty");
        assert!(s.energy.is_none());
    }

    #[test]
    fn absent_query_fields_are_skipped() {
        let mut tracker = SampleTracker::new(TrackingFlags::default());
        tracker.set_gravity(standard_gravity());
        let plane = EntityQuery::EMPTY;
        let sphere = full_query(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 1.0);
        tracker.record(0.0, &[plane, sphere]);

        let s = &tracker.samples()[0];
        assert_eq!(s.positions.as_ref().unwrap().len(), 1);
        assert_eq!(s.velocities.as_ref().unwrap().len(), 1);
        // The plane contributes zero to both sums.
        let e = s.energy.unwrap();
        assert!((e.potential - 9.81).abs() < 1e-12);
        assert_eq!(e.kinetic, 0.0);
    }

    #[test]
    fn potential_energy_of_unit_mass_at_unit_height() {
        let mut tracker = SampleTracker::new(TrackingFlags::default());
        tracker.set_gravity(standard_gravity());
        tracker.record(
            0.01,
            &[full_query(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 1.0)],
        );
        let e = tracker.current_energy();
        assert!((e.potential - 9.81).abs() < 1e-12);
        assert_eq!(e.kinetic, 0.0);
        assert!((e.total - 9.81).abs() < 1e-12);
    }

    #[test]
    fn kinetic_energy_sums_over_entities() {
        let mut tracker = SampleTracker::new(TrackingFlags::default());
        let a = full_query(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.0); // 2 J
        let b = full_query(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), 2.0); // 9 J
        tracker.record(0.0, &[a, b]);
        assert!((tracker.current_energy().kinetic - 11.0).abs() < 1e-12);
    }

    #[test]
    fn current_energy_is_zero_before_any_sample() {
        let tracker = SampleTracker::new(TrackingFlags::default());
        assert_eq!(tracker.current_energy(), EnergySample::ZERO);
    }

    #[test]
    fn current_energy_zero_when_energy_untracked() {
        let flags = TrackingFlags {
            position: true,
            velocity: true,
            energy: false,
        };
        let mut tracker = SampleTracker::new(flags);
        tracker.record(0.0, &[full_query(Vec3::ZERO, Vec3::ZERO, 1.0)]);
        assert_eq!(tracker.current_energy(), EnergySample::ZERO);
    }

    #[test]
    fn reset_clears_samples_but_keeps_flags_and_gravity() {
        let flags = TrackingFlags {
            position: false,
            velocity: true,
            energy: true,
        };
        let mut tracker = SampleTracker::new(flags);
        tracker.set_gravity(standard_gravity());
        tracker.record(0.0, &[full_query(Vec3::ZERO, Vec3::ZERO, 1.0)]);
        tracker.reset();

        assert!(tracker.is_empty());
        assert_eq!(tracker.flags(), flags);
        assert_eq!(tracker.gravity(), standard_gravity());
    }
}
