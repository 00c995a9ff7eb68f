//! The background stepping thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use orrery_console::{BoundedLog, LogLevel};
use orrery_core::{EntityQuery, StepError, Vec3};
use orrery_telemetry::SampleTracker;

use crate::manager::SessionState;

/// What the worker hands back through its `JoinHandle` when it exits.
#[derive(Debug)]
pub(crate) struct WorkerReport {
    /// Completed engine steps.
    pub frames: u64,
    /// Wall-clock time the worker ran.
    pub elapsed: Duration,
    /// The step failure that ended the run, if any.
    pub error: Option<StepError>,
}

/// Everything the worker thread owns, bundled for the spawn closure.
pub(crate) struct WorkerState {
    pub shared: Arc<Mutex<SessionState>>,
    pub running: Arc<AtomicBool>,
    pub console: Arc<BoundedLog>,
    pub tracker: Arc<Mutex<SampleTracker>>,
    pub dt: f64,
    pub budget: Duration,
    pub status_interval: Duration,
}

impl WorkerState {
    /// Step until the running flag clears or the engine faults.
    ///
    /// Each iteration takes the session lock for exactly one step plus
    /// the entity queries, then releases it before recording, logging,
    /// and the budget sleep, so controller-side operations interleave
    /// between frames.
    pub(crate) fn run(self) -> WorkerReport {
        let started = Instant::now();
        let mut last_status = started;
        let mut frames: u64 = 0;
        let mut error = None;

        while self.running.load(Ordering::Acquire) {
            let iter_started = Instant::now();

            let queries = {
                let mut state = self.shared.lock().unwrap();
                let SessionState {
                    engine, entities, ..
                } = &mut *state;
                let Some(engine) = engine.as_mut() else {
                    break;
                };
                if let Err(e) = engine.step() {
                    error = Some(e);
                    break;
                }
                frames += 1;
                entities
                    .values()
                    .map(|&entity| engine.query(entity))
                    .collect::<Vec<EntityQuery>>()
            };

            self.tracker
                .lock()
                .unwrap()
                .record(frames as f64 * self.dt, &queries);

            if last_status.elapsed() >= self.status_interval {
                last_status = Instant::now();
                self.log_status(frames, started.elapsed(), &queries);
            }

            let elapsed = iter_started.elapsed();
            if elapsed < self.budget {
                // park, not sleep: stop() unparks for immediate
                // shutdown regardless of the configured rate
                thread::park_timeout(self.budget - elapsed);
            }
        }

        if let Some(e) = &error {
            self.running.store(false, Ordering::Release);
            self.console
                .append(format!("Simulation step failed: {e}"), LogLevel::Error);
        }

        WorkerReport {
            frames,
            elapsed: started.elapsed(),
            error,
        }
    }

    fn log_status(&self, frames: u64, elapsed: Duration, queries: &[EntityQuery]) {
        let secs = elapsed.as_secs_f64();
        let fps = if secs > 0.0 { frames as f64 / secs } else { 0.0 };
        // First entity with a position stands in for the scene; static
        // geometry like the ground plane reports nothing.
        let lead = queries.iter().find(|q| q.position.is_some());
        let pos = lead.and_then(|q| q.position).unwrap_or(Vec3::ZERO);
        let vel = lead.and_then(|q| q.velocity).unwrap_or(Vec3::ZERO);
        let energy = self.tracker.lock().unwrap().current_energy();
        self.console.append(
            format!(
                "Frame: {frames} | FPS: {fps:.1} | Position: {pos} | Velocity: {vel} \
                 | KE: {:.2}J | PE: {:.2}J",
                energy.kinetic, energy.potential
            ),
            LogLevel::Status,
        );
    }
}
