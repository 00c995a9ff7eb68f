//! Core types and traits for the Orrery simulation session core.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the console, telemetry, and session crates:
//! the [`Engine`] seam to the external physics backend, entity
//! identifiers, scene specification types, and error enums.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod id;
pub mod scene;
pub mod vec3;

pub use engine::{ComputeBackend, Engine, EngineFactory, EntityQuery, SimParams};
pub use error::{InitError, SceneError, StepError};
pub use id::{EntityId, EntityRef, ObjectKind};
pub use scene::{
    CameraSpec, CollisionSpec, Morph, ObjectSpec, RecordingSpec, RendererSpec, VisualSpec,
};
pub use vec3::Vec3;
