//! The [`Engine`] trait — the narrow seam to the external physics
//! backend.
//!
//! The session treats the engine as single-threaded: all `step`/`query`
//! calls happen on the worker thread, all mutation calls on the
//! controller thread, and both routes go through the session lock.
//! The trait therefore requires `Send` (the handle moves into shared
//! state reachable from the worker) but not `Sync`.

use std::fmt;
use std::path::Path;

use crate::error::{InitError, SceneError, StepError};
use crate::id::EntityRef;
use crate::scene::{CameraSpec, ObjectSpec, RendererSpec};
use crate::vec3::Vec3;

/// Compute backend preference for engine initialization.
///
/// A flag only — device selection policy belongs to the engine. A
/// factory asked for [`Gpu`](ComputeBackend::Gpu) on a machine without
/// one reports [`InitError::BackendUnavailable`] or silently falls
/// back, at its own discretion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComputeBackend {
    /// CPU backend.
    #[default]
    Cpu,
    /// GPU backend.
    Gpu,
}

impl fmt::Display for ComputeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "CPU"),
            Self::Gpu => write!(f, "GPU"),
        }
    }
}

/// The engine-facing slice of a session configuration: everything an
/// [`EngineFactory`] needs to construct a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    /// Simulation timestep in seconds.
    pub dt: f64,
    /// Solver substeps per step.
    pub substeps: u32,
    /// Gravity vector in m/s².
    pub gravity: Vec3,
    /// Compute backend preference.
    pub backend: ComputeBackend,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            dt: 0.01,
            substeps: 2,
            gravity: Vec3::new(0.0, 0.0, -9.81),
            backend: ComputeBackend::Cpu,
        }
    }
}

/// One entity's physical state as reported by the engine.
///
/// Any field may be absent — a plane has no meaningful velocity, a
/// purely visual object may have no mass. Absence means "not
/// measured", which downstream code treats differently from a
/// measured zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EntityQuery {
    /// World-space position, if the engine exposes one.
    pub position: Option<Vec3>,
    /// World-space velocity, if the engine exposes one.
    pub velocity: Option<Vec3>,
    /// Mass in kilograms, if the engine exposes one.
    pub mass: Option<f64>,
}

impl EntityQuery {
    /// A query with all fields absent.
    pub const EMPTY: EntityQuery = EntityQuery {
        position: None,
        velocity: None,
        mass: None,
    };
}

/// Handle to one engine-side simulation session.
///
/// Implementations advance an external stateful process one discrete
/// step at a time. Exactly one `destroy` call is made per handle
/// lifetime, by whichever teardown path runs first.
pub trait Engine: Send {
    /// Advance the simulation by one step.
    fn step(&mut self) -> Result<(), StepError>;

    /// Read an entity's current physical state.
    ///
    /// Unknown handles yield [`EntityQuery::EMPTY`] rather than an
    /// error — absence of data is an ordinary state here.
    fn query(&self, entity: EntityRef) -> EntityQuery;

    /// Create an object in the scene and return its handle.
    fn add_entity(&mut self, spec: &ObjectSpec) -> Result<EntityRef, SceneError>;

    /// Apply collision margin and group to an entity.
    fn set_collision(&mut self, entity: EntityRef, margin: f64, group: i32)
        -> Result<(), SceneError>;

    /// Exclude an entity from collision entirely.
    fn disable_collision(&mut self, entity: EntityRef) -> Result<(), SceneError>;

    /// Replace the active renderer.
    fn set_renderer(&mut self, spec: &RendererSpec) -> Result<(), SceneError>;

    /// Replace the active camera.
    fn set_camera(&mut self, spec: &CameraSpec) -> Result<(), SceneError>;

    /// Begin capturing frames from the active camera.
    fn start_recording(&mut self) -> Result<(), SceneError>;

    /// Finish capturing and save the recording to `path` at `fps`.
    fn stop_recording(&mut self, path: &Path, fps: u32) -> Result<(), SceneError>;

    /// Tear down all engine resources. Called exactly once.
    fn destroy(&mut self);
}

/// Constructor seam for engine handles.
///
/// The session never builds an engine itself; it asks the factory
/// during `start()` and reports any failure back to the caller without
/// spawning a worker.
pub trait EngineFactory: Send + Sync {
    /// Construct a fresh engine session for the given parameters.
    fn create(&self, params: &SimParams) -> Result<Box<dyn Engine>, InitError>;
}

impl<F> EngineFactory for F
where
    F: Fn(&SimParams) -> Result<Box<dyn Engine>, InitError> + Send + Sync,
{
    fn create(&self, params: &SimParams) -> Result<Box<dyn Engine>, InitError> {
        self(params)
    }
}

// Compile-time assertion: Box<dyn Engine> must be Send so the handle
// can live in state shared with the worker thread.
const _: fn() = || {
    fn assert<T: Send>() {}
    assert::<Box<dyn Engine>>();
};
