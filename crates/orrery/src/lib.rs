//! Orrery: a session concurrency core for driving an external physics
//! engine from interactive controllers.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Orrery sub-crates. For most users, adding `orrery` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use orrery::prelude::*;
//!
//! // A minimal engine whose world never changes.
//! struct StaticEngine;
//! impl Engine for StaticEngine {
//!     fn step(&mut self) -> Result<(), StepError> { Ok(()) }
//!     fn query(&self, _entity: EntityRef) -> EntityQuery { EntityQuery::EMPTY }
//!     fn add_entity(&mut self, _spec: &ObjectSpec) -> Result<EntityRef, SceneError> {
//!         Ok(EntityRef(0))
//!     }
//!     fn set_collision(&mut self, _e: EntityRef, _m: f64, _g: i32) -> Result<(), SceneError> {
//!         Ok(())
//!     }
//!     fn disable_collision(&mut self, _e: EntityRef) -> Result<(), SceneError> { Ok(()) }
//!     fn set_renderer(&mut self, _spec: &RendererSpec) -> Result<(), SceneError> { Ok(()) }
//!     fn set_camera(&mut self, _spec: &CameraSpec) -> Result<(), SceneError> { Ok(()) }
//!     fn start_recording(&mut self) -> Result<(), SceneError> { Ok(()) }
//!     fn stop_recording(&mut self, _p: &std::path::Path, _fps: u32) -> Result<(), SceneError> {
//!         Ok(())
//!     }
//!     fn destroy(&mut self) {}
//! }
//!
//! // The factory seam: any matching closure works.
//! let manager = SessionManager::new(
//!     |_params: &SimParams| -> Result<Box<dyn Engine>, InitError> {
//!         Ok(Box::new(StaticEngine))
//!     },
//! );
//!
//! let report = manager.start(SessionConfig::default()).unwrap();
//! assert!(report.console.contains("Simulation initialized successfully"));
//! assert!(manager.is_running());
//!
//! let stop = manager.stop().unwrap();
//! assert!(stop.was_running);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `orrery-core` | `Vec3`, IDs, scene specs, the `Engine` trait, error enums |
//! | [`console`] | `orrery-console` | `BoundedLog` capacity-bounded console log |
//! | [`telemetry`] | `orrery-telemetry` | `SampleTracker`, energy accounting, CSV export |
//! | [`session`] | `orrery-session` | `SessionManager`, configuration, the background worker |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core vocabulary types (`orrery-core`).
///
/// The [`types::Engine`] trait is the seam to the external physics
/// backend; everything else here is plain data shared by the other
/// sub-crates.
pub use orrery_core as types;

/// Capacity-bounded console log (`orrery-console`).
///
/// [`console::BoundedLog`] keeps the last N timestamped entries and is
/// safe to append to and snapshot from any thread.
pub use orrery_console as console;

/// Sample tracking and CSV export (`orrery-telemetry`).
///
/// [`telemetry::SampleTracker`] accumulates per-frame positions,
/// velocities, and energy; [`telemetry::csv`] holds the stream-level
/// writers.
pub use orrery_telemetry as telemetry;

/// Session lifecycle management (`orrery-session`).
///
/// [`session::SessionManager`] constructs engines through a factory,
/// runs the background stepping worker, and serves status, scene, and
/// export requests while the worker runs.
pub use orrery_session as session;

/// Common imports for typical Orrery usage.
///
/// ```rust
/// use orrery::prelude::*;
/// ```
pub mod prelude {
    // Core vocabulary
    pub use orrery_core::{
        CameraSpec, CollisionSpec, ComputeBackend, Engine, EngineFactory, EntityId, EntityQuery,
        EntityRef, Morph, ObjectKind, ObjectSpec, RecordingSpec, RendererSpec, SimParams, Vec3,
        VisualSpec,
    };

    // Errors
    pub use orrery_core::{InitError, SceneError, StepError};

    // Console
    pub use orrery_console::{BoundedLog, LogLevel};

    // Telemetry
    pub use orrery_telemetry::{EnergySample, SampleTracker, TrackingFlags};

    // Session
    pub use orrery_session::{SessionConfig, SessionError, SessionManager};
}
