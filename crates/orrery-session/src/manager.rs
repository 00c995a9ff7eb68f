//! User-facing `SessionManager` API and session teardown.
//!
//! # Architecture
//!
//! ```text
//! Controller Thread(s)            Worker Thread ("orrery-worker")
//!     |                               |
//!     |--start(config)                |
//!     |   factory.create(params)      |
//!     |   baseline scene under lock   |
//!     |   spawn --------------------->| loop: lock, step, query all
//!     |                               |       tracker.record(t, ..)
//!     |--create_object() [lock]       |       STATUS line (interval)
//!     |--status()/current_energy()    |       park_timeout(budget)
//!     |                               |
//!     |--stop()                       |
//!     |   clear flag, unpark -------->| exits loop
//!     |<--join: WorkerReport----------|
//!     |   engine.destroy()            |
//!     |   clear registry, stats       |
//! ```
//!
//! All operations take `&self`: the manager is shared behind an `Arc`
//! and read-side calls run concurrently with the worker.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use indexmap::IndexMap;

use orrery_console::{BoundedLog, LogLevel};
use orrery_core::{
    Engine, EngineFactory, EntityId, EntityRef, ObjectSpec, RecordingSpec, StepError, VisualSpec,
};
use orrery_telemetry::{EnergySample, ExportError, SampleTracker, TrackingFlags};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::worker::{WorkerReport, WorkerState};

// ── Reports ──────────────────────────────────────────────────────

/// What `start()` hands back once the worker is spawned.
#[derive(Debug)]
pub struct StartReport {
    /// One-line initialization acknowledgement.
    pub init_message: String,
    /// One-line running acknowledgement with the target rate.
    pub status_message: String,
    /// Console snapshot taken right after the banner lines landed.
    pub console: String,
}

/// Statistics from `stop()`.
#[derive(Debug)]
pub struct StopReport {
    /// Whether there was a session to stop.
    pub was_running: bool,
    /// Engine steps completed over the run.
    pub frames: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// Simulated time in seconds (`frames * dt`).
    pub sim_time: f64,
    /// Samples held by the tracker at shutdown.
    pub data_points: usize,
    /// The step failure that ended the run early, if any.
    pub error: Option<StepError>,
}

impl StopReport {
    fn idle() -> Self {
        Self {
            was_running: false,
            frames: 0,
            elapsed: Duration::ZERO,
            sim_time: 0.0,
            data_points: 0,
            error: None,
        }
    }
}

impl fmt::Display for StopReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.was_running {
            write!(f, "No simulation is currently running")
        } else if self.data_points == 0 {
            write!(f, "Simulation stopped (no data collected)")
        } else {
            write!(
                f,
                "Simulation stopped. Frames simulated: {} | Simulated time: {:.2} s \
                 | Data points collected: {}",
                self.frames, self.sim_time, self.data_points
            )
        }
    }
}

// ── Shared state ─────────────────────────────────────────────────

/// State shared between the controller and the worker, behind one
/// mutex. The engine handle is `Some` exactly while a session exists;
/// only the controller mutates the registry, the worker reads it.
pub(crate) struct SessionState {
    pub engine: Option<Box<dyn Engine>>,
    pub entities: IndexMap<EntityId, EntityRef>,
    /// Monotonic serial source; never reset, so ids are unique across
    /// restarts of the same manager.
    pub entity_counter: u64,
    pub recording: Option<RecordingSpec>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            engine: None,
            entities: IndexMap::new(),
            entity_counter: 0,
            recording: None,
        }
    }

    /// Create an object in the engine, apply its collision spec, and
    /// register it under a fresh id.
    fn spawn_object(&mut self, spec: &ObjectSpec) -> Result<EntityId, SessionError> {
        let Self {
            engine,
            entities,
            entity_counter,
            ..
        } = self;
        let Some(engine) = engine.as_mut() else {
            return Err(SessionError::NotRunning);
        };
        let entity = engine.add_entity(spec)?;
        if spec.collision.enabled {
            engine.set_collision(entity, spec.collision.margin, spec.collision.group)?;
        } else {
            engine.disable_collision(entity)?;
        }
        *entity_counter += 1;
        let id = EntityId::new(spec.kind(), *entity_counter);
        entities.insert(id, entity);
        Ok(id)
    }

    /// Destroy the engine (at most once) and clear per-session state.
    fn teardown(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.destroy();
        }
        self.entities.clear();
        self.recording = None;
    }
}

// ── SessionManager ───────────────────────────────────────────────

/// Lifecycle controller for one engine session at a time.
pub struct SessionManager {
    factory: Box<dyn EngineFactory>,
    console: Arc<BoundedLog>,
    tracker: Arc<Mutex<SampleTracker>>,
    running: Arc<AtomicBool>,
    shared: Arc<Mutex<SessionState>>,
    /// `Some` from start to stop. Doubles as the transition guard:
    /// start and stop serialize on this lock.
    worker: Mutex<Option<JoinHandle<WorkerReport>>>,
    /// Configuration of the active (or most recent) session.
    config: Mutex<SessionConfig>,
}

impl SessionManager {
    /// Create an idle manager around an engine factory.
    pub fn new<F: EngineFactory + 'static>(factory: F) -> Self {
        Self {
            factory: Box::new(factory),
            console: Arc::new(BoundedLog::default()),
            tracker: Arc::new(Mutex::new(SampleTracker::new(TrackingFlags::default()))),
            running: Arc::new(AtomicBool::new(false)),
            shared: Arc::new(Mutex::new(SessionState::new())),
            worker: Mutex::new(None),
            config: Mutex::new(SessionConfig::default()),
        }
    }

    /// Start a session: build the engine, create the baseline scene,
    /// and spawn the worker. Returns without waiting for any frames.
    pub fn start(&self, config: SessionConfig) -> Result<StartReport, SessionError> {
        let mut worker_slot = self.worker.lock().unwrap();
        if worker_slot.is_some() {
            return Err(SessionError::AlreadyRunning);
        }
        config.validate()?;

        {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.reset();
            tracker.set_flags(config.tracking);
            tracker.set_gravity(config.gravity);
        }

        self.console.clear();
        if config.verbose {
            self.console.append(
                format!(
                    "dt: {} s | substeps: {} | backend: {}",
                    config.dt, config.substeps, config.backend
                ),
                LogLevel::Config,
            );
            self.console.append(
                format!(
                    "gravity: {} m/s² | target rate: {} Hz",
                    config.gravity, config.target_hz
                ),
                LogLevel::Config,
            );
        }
        self.console
            .append("Initializing simulation...", LogLevel::System);

        let engine = match self.factory.create(&config.sim_params()) {
            Ok(engine) => engine,
            Err(e) => {
                self.console
                    .append(format!("Initialization failed: {e}"), LogLevel::Error);
                return Err(SessionError::Init(e));
            }
        };

        {
            let mut state = self.shared.lock().unwrap();
            state.engine = Some(engine);
            state.entities.clear();
            state.recording = None;
            for spec in &config.baseline {
                if let Err(e) = state.spawn_object(spec) {
                    state.teardown();
                    self.console
                        .append(format!("Scene construction failed: {e}"), LogLevel::Error);
                    return Err(e);
                }
            }
        }

        self.running.store(true, Ordering::Release);
        let worker = WorkerState {
            shared: Arc::clone(&self.shared),
            running: Arc::clone(&self.running),
            console: Arc::clone(&self.console),
            tracker: Arc::clone(&self.tracker),
            dt: config.dt,
            budget: config.step_budget(),
            status_interval: config.status_interval,
        };
        let handle = thread::Builder::new()
            .name("orrery-worker".into())
            .spawn(move || worker.run())
            .expect("failed to spawn worker thread");

        let init_message = "Simulation initialized successfully".to_string();
        let status_message = format!("Simulation running at {} Hz target", config.target_hz);
        self.console.append(init_message.as_str(), LogLevel::Success);
        let console = self
            .console
            .append(status_message.as_str(), LogLevel::System);

        *self.config.lock().unwrap() = config;
        *worker_slot = Some(handle);
        Ok(StartReport {
            init_message,
            status_message,
            console,
        })
    }

    /// Stop the session: signal the worker, join it, destroy the
    /// engine, and report run statistics.
    ///
    /// Idempotent — stopping an idle manager returns an explanatory
    /// report without touching anything. Samples survive the stop and
    /// remain exportable until the next `start`.
    pub fn stop(&self) -> Result<StopReport, SessionError> {
        let mut worker_slot = self.worker.lock().unwrap();
        let Some(handle) = worker_slot.take() else {
            return Ok(StopReport::idle());
        };

        self.running.store(false, Ordering::Release);
        // Wakes the worker if it is parked in its budget sleep.
        handle.thread().unpark();
        let report = match handle.join() {
            Ok(report) => report,
            Err(_) => {
                self.shared.lock().unwrap().teardown();
                self.console
                    .append("Worker thread panicked", LogLevel::Error);
                return Err(SessionError::WorkerUnjoinable);
            }
        };

        self.shared.lock().unwrap().teardown();

        let data_points = self.tracker.lock().unwrap().len();
        let sim_time = report.frames as f64 * self.config.lock().unwrap().dt;
        let stop = StopReport {
            was_running: true,
            frames: report.frames,
            elapsed: report.elapsed,
            sim_time,
            data_points,
            error: report.error,
        };
        let level = if data_points == 0 {
            LogLevel::Warning
        } else {
            LogLevel::System
        };
        self.console.append(stop.to_string(), level);
        Ok(stop)
    }

    /// Create an object in the running session and register it.
    ///
    /// Returns a human-readable acknowledgement naming the assigned
    /// id (`Created Sphere as sphere_3`).
    pub fn create_object(&self, spec: &ObjectSpec) -> Result<String, SessionError> {
        if !self.running.load(Ordering::Acquire) {
            self.console.append("No active simulation", LogLevel::Warning);
            return Err(SessionError::NotRunning);
        }
        let id = self.shared.lock().unwrap().spawn_object(spec)?;
        let message = format!("Created {} as {}", spec.kind().label(), id);
        self.console.append(message.as_str(), LogLevel::Success);
        Ok(message)
    }

    /// Apply renderer and camera settings and reconcile the recording
    /// sub-state: `Some` starts (or retargets) a recording, `None`
    /// stops an active one and flushes it to its output path.
    pub fn update_visualization(&self, spec: &VisualSpec) -> Result<String, SessionError> {
        if !self.running.load(Ordering::Acquire) {
            return Err(SessionError::NotRunning);
        }
        let mut state = self.shared.lock().unwrap();
        let SessionState {
            engine, recording, ..
        } = &mut *state;
        let Some(engine) = engine.as_mut() else {
            return Err(SessionError::NotRunning);
        };
        engine.set_renderer(&spec.renderer)?;
        engine.set_camera(&spec.camera)?;

        let mut message = String::from("Visualization settings updated");
        match (&spec.recording, recording.is_some()) {
            (Some(requested), false) => {
                engine.start_recording()?;
                *recording = Some(requested.clone());
                message.push_str("; recording started");
            }
            (Some(requested), true) => {
                // Already recording; only the save target changes.
                *recording = Some(requested.clone());
            }
            (None, true) => {
                if let Some(active) = recording.take() {
                    let path = active.output_path();
                    engine.stop_recording(&path, active.fps)?;
                    message = format!(
                        "Visualization settings updated; recording saved to {}",
                        path.display()
                    );
                }
            }
            (None, false) => {}
        }
        drop(state);

        self.console.append(message.as_str(), LogLevel::Config);
        Ok(message)
    }

    /// The full console snapshot, one rendered line per entry.
    pub fn status(&self) -> String {
        self.console.snapshot()
    }

    /// Energy of the most recent sample, zeros when nothing has been
    /// measured yet.
    pub fn current_energy(&self) -> EnergySample {
        self.tracker.lock().unwrap().current_energy()
    }

    /// Number of samples the tracker currently holds.
    pub fn sample_count(&self) -> usize {
        self.tracker.lock().unwrap().len()
    }

    /// Whether a worker is actively stepping.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Export tracked data as CSV files under `dir`.
    ///
    /// Safe while the worker runs; the tracker lock is held only for
    /// the duration of the write.
    pub fn export_data(&self, dir: &Path, prefix: &str) -> Result<String, ExportError> {
        let result = self.tracker.lock().unwrap().export(dir, prefix);
        match &result {
            Ok(message) => {
                self.console.append(message.as_str(), LogLevel::Info);
            }
            Err(e @ ExportError::NoData) => {
                self.console.append(e.to_string(), LogLevel::Warning);
            }
            Err(e) => {
                self.console.append(e.to_string(), LogLevel::Error);
            }
        }
        result
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

// Compile-time assertion: the manager is shared behind an Arc across
// controller threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SessionManager>();
};
