//! Test utilities and mock engine for Orrery development.
//!
//! [`MockEngine`] is a gravity-integrating fake of the [`Engine`]
//! trait with a shared call ledger ([`MockProbe`]) that outlives the
//! engine, so tests can assert on teardown behavior after the session
//! has consumed the handle. Step results can be scripted through a
//! crossbeam channel for deterministic failure injection.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender};

use orrery_core::{
    CameraSpec, ComputeBackend, Engine, EngineFactory, EntityQuery, EntityRef, InitError, Morph,
    ObjectSpec, RendererSpec, SceneError, SimParams, StepError, Vec3,
};

/// One simulated body inside the mock.
#[derive(Clone, Debug, Default)]
pub struct MockBody {
    pub position: Option<Vec3>,
    pub velocity: Option<Vec3>,
    pub mass: Option<f64>,
}

/// Shared, inspectable state of a [`MockEngine`].
#[derive(Debug, Default)]
pub struct MockLedger {
    pub bodies: Vec<MockBody>,
    pub steps: u64,
    pub destroy_calls: u32,
    pub recording_active: bool,
    pub recordings_started: u32,
    /// `(path, fps)` of every saved recording, in order.
    pub recordings_saved: Vec<(PathBuf, u32)>,
    pub renderer: Option<RendererSpec>,
    pub camera: Option<CameraSpec>,
    /// `(entity, margin, group)` of every `set_collision` call.
    pub collision_calls: Vec<(EntityRef, f64, i32)>,
    pub collision_disabled: Vec<EntityRef>,
}

/// Handle to a mock engine's ledger, kept by the test after the engine
/// itself has been moved into the session.
#[derive(Clone, Debug, Default)]
pub struct MockProbe(Arc<Mutex<MockLedger>>);

impl MockProbe {
    pub fn steps(&self) -> u64 {
        self.0.lock().unwrap().steps
    }

    pub fn destroy_calls(&self) -> u32 {
        self.0.lock().unwrap().destroy_calls
    }

    pub fn body_count(&self) -> usize {
        self.0.lock().unwrap().bodies.len()
    }

    pub fn recording_active(&self) -> bool {
        self.0.lock().unwrap().recording_active
    }

    pub fn recordings_started(&self) -> u32 {
        self.0.lock().unwrap().recordings_started
    }

    pub fn recordings_saved(&self) -> Vec<(PathBuf, u32)> {
        self.0.lock().unwrap().recordings_saved.clone()
    }

    pub fn renderer(&self) -> Option<RendererSpec> {
        self.0.lock().unwrap().renderer.clone()
    }

    pub fn camera(&self) -> Option<CameraSpec> {
        self.0.lock().unwrap().camera
    }

    pub fn collision_calls(&self) -> Vec<(EntityRef, f64, i32)> {
        self.0.lock().unwrap().collision_calls.clone()
    }

    pub fn collision_disabled(&self) -> Vec<EntityRef> {
        self.0.lock().unwrap().collision_disabled.clone()
    }

    /// Run `f` against the raw ledger for assertions not covered by
    /// the accessors.
    pub fn with<R>(&self, f: impl FnOnce(&MockLedger) -> R) -> R {
        f(&self.0.lock().unwrap())
    }
}

/// A fake [`Engine`] for session tests.
///
/// Dynamic bodies get unit mass regardless of spec density, keeping
/// energy arithmetic in tests transparent. Planes report no position,
/// velocity, or mass, exercising the "field not measured" paths.
pub struct MockEngine {
    ledger: Arc<Mutex<MockLedger>>,
    gravity: Vec3,
    dt: f64,
    /// When true, `step` only counts; bodies do not move.
    frozen: bool,
    script: Option<Receiver<Result<(), StepError>>>,
}

impl MockEngine {
    fn new(params: &SimParams, frozen: bool, script: Option<Receiver<Result<(), StepError>>>) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(MockLedger::default())),
            gravity: params.gravity,
            dt: params.dt,
            frozen,
            script,
        }
    }

    fn probe(&self) -> MockProbe {
        MockProbe(Arc::clone(&self.ledger))
    }
}

impl Engine for MockEngine {
    fn step(&mut self) -> Result<(), StepError> {
        if let Some(rx) = &self.script {
            // Blocks until the test supplies a result; a dropped
            // sender reads as an exhausted script.
            match rx.recv() {
                Ok(result) => result?,
                Err(_) => {
                    return Err(StepError::EngineFault {
                        reason: "step script exhausted".to_string(),
                    })
                }
            }
        }

        let mut ledger = self.ledger.lock().unwrap();
        ledger.steps += 1;
        if !self.frozen {
            for body in &mut ledger.bodies {
                let (Some(p), Some(v)) = (body.position, body.velocity) else {
                    continue;
                };
                let v = v + self.gravity * self.dt;
                body.velocity = Some(v);
                body.position = Some(p + v * self.dt);
            }
        }
        Ok(())
    }

    fn query(&self, entity: EntityRef) -> EntityQuery {
        let ledger = self.ledger.lock().unwrap();
        match ledger.bodies.get(entity.0 as usize) {
            Some(body) => EntityQuery {
                position: body.position,
                velocity: body.velocity,
                mass: body.mass,
            },
            None => EntityQuery::EMPTY,
        }
    }

    fn add_entity(&mut self, spec: &ObjectSpec) -> Result<EntityRef, SceneError> {
        let body = match spec.morph {
            Morph::Plane { .. } => MockBody::default(),
            _ => MockBody {
                position: Some(spec.pos),
                velocity: Some(Vec3::ZERO),
                mass: Some(1.0),
            },
        };
        let mut ledger = self.ledger.lock().unwrap();
        ledger.bodies.push(body);
        Ok(EntityRef((ledger.bodies.len() - 1) as u64))
    }

    fn set_collision(
        &mut self,
        entity: EntityRef,
        margin: f64,
        group: i32,
    ) -> Result<(), SceneError> {
        let mut ledger = self.ledger.lock().unwrap();
        if entity.0 as usize >= ledger.bodies.len() {
            return Err(SceneError::NoSuchEntity { entity });
        }
        ledger.collision_calls.push((entity, margin, group));
        Ok(())
    }

    fn disable_collision(&mut self, entity: EntityRef) -> Result<(), SceneError> {
        let mut ledger = self.ledger.lock().unwrap();
        if entity.0 as usize >= ledger.bodies.len() {
            return Err(SceneError::NoSuchEntity { entity });
        }
        ledger.collision_disabled.push(entity);
        Ok(())
    }

    fn set_renderer(&mut self, spec: &RendererSpec) -> Result<(), SceneError> {
        self.ledger.lock().unwrap().renderer = Some(spec.clone());
        Ok(())
    }

    fn set_camera(&mut self, spec: &CameraSpec) -> Result<(), SceneError> {
        self.ledger.lock().unwrap().camera = Some(*spec);
        Ok(())
    }

    fn start_recording(&mut self) -> Result<(), SceneError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.recording_active = true;
        ledger.recordings_started += 1;
        Ok(())
    }

    fn stop_recording(&mut self, path: &std::path::Path, fps: u32) -> Result<(), SceneError> {
        let mut ledger = self.ledger.lock().unwrap();
        if !ledger.recording_active {
            return Err(SceneError::RecordingInactive);
        }
        ledger.recording_active = false;
        ledger.recordings_saved.push((path.to_path_buf(), fps));
        Ok(())
    }

    fn destroy(&mut self) {
        self.ledger.lock().unwrap().destroy_calls += 1;
    }
}

/// Factory producing [`MockEngine`]s and exposing their probes.
///
/// One factory can serve several `start()` calls; `probe()` returns
/// the ledger of the most recently created engine.
pub struct MockEngineFactory {
    frozen: bool,
    fail_init: bool,
    scripted: bool,
    last_probe: Mutex<Option<MockProbe>>,
    script_tx: Mutex<Option<Sender<Result<(), StepError>>>>,
}

impl MockEngineFactory {
    /// A factory whose engines integrate gravity each step.
    pub fn new() -> Self {
        Self {
            frozen: false,
            fail_init: false,
            scripted: false,
            last_probe: Mutex::new(None),
            script_tx: Mutex::new(None),
        }
    }

    /// Engines count steps but never move bodies — positions stay at
    /// their spawn values, keeping energy assertions exact.
    pub fn frozen() -> Self {
        Self {
            frozen: true,
            ..Self::new()
        }
    }

    /// A factory that always fails initialization.
    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Self::new()
        }
    }

    /// Engines block in `step` until the test supplies a result via
    /// [`script_sender`](Self::script_sender). Dropping the sender
    /// makes the next step fail with an "exhausted" fault.
    pub fn scripted() -> Self {
        Self {
            scripted: true,
            ..Self::new()
        }
    }

    /// The probe for the most recently created engine.
    ///
    /// # Panics
    ///
    /// Panics if no engine has been created yet.
    pub fn probe(&self) -> MockProbe {
        self.last_probe
            .lock()
            .unwrap()
            .clone()
            .expect("no engine created yet")
    }

    /// Take the step-script sender for the most recently created
    /// engine. The factory holds no copy afterwards, so dropping the
    /// returned sender exhausts the script.
    ///
    /// # Panics
    ///
    /// Panics if the factory is not scripted, no engine exists yet, or
    /// the sender was already taken.
    pub fn script_sender(&self) -> Sender<Result<(), StepError>> {
        self.script_tx
            .lock()
            .unwrap()
            .take()
            .expect("no script sender available")
    }
}

impl Default for MockEngineFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineFactory for MockEngineFactory {
    fn create(&self, params: &SimParams) -> Result<Box<dyn Engine>, InitError> {
        if self.fail_init {
            return Err(InitError::BackendUnavailable {
                backend: match params.backend {
                    ComputeBackend::Cpu => "cpu".to_string(),
                    ComputeBackend::Gpu => "gpu".to_string(),
                },
            });
        }

        let script = if self.scripted {
            let (tx, rx) = crossbeam_channel::unbounded();
            *self.script_tx.lock().unwrap() = Some(tx);
            Some(rx)
        } else {
            None
        };

        let engine = MockEngine::new(params, self.frozen, script);
        *self.last_probe.lock().unwrap() = Some(engine.probe());
        Ok(Box::new(engine))
    }
}
