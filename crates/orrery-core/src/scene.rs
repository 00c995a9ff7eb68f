//! Scene specification types: objects, collision, renderer, camera,
//! and recording.
//!
//! These are plain data carried from the controller to the engine
//! through [`Engine`](crate::Engine) calls. Defaults match the
//! baseline scene the session constructs on start.

use std::path::PathBuf;

use crate::id::ObjectKind;
use crate::vec3::Vec3;

/// Shape-specific parameters for a scene object.
#[derive(Clone, Debug, PartialEq)]
pub enum Morph {
    /// A sphere of the given radius (meters).
    Sphere {
        /// Radius in meters.
        radius: f64,
    },
    /// An axis-aligned box with the given extents.
    Box {
        /// Width, depth, height in meters.
        size: Vec3,
    },
    /// A capsule along the local Z axis.
    Capsule {
        /// Radius in meters.
        radius: f64,
        /// Cylinder length in meters (excluding caps).
        length: f64,
    },
    /// An infinite plane.
    Plane {
        /// Height offset along the normal.
        height: f64,
        /// Plane normal.
        normal: Vec3,
    },
    /// A triangle mesh loaded from file.
    Mesh {
        /// Path to the mesh file.
        path: PathBuf,
        /// Uniform scale factor.
        scale: f64,
        /// Maximum convex pieces for decomposition; `None` = no
        /// decomposition.
        max_convex: Option<u32>,
    },
}

impl Morph {
    /// The shape category of this morph.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Sphere { .. } => ObjectKind::Sphere,
            Self::Box { .. } => ObjectKind::Box,
            Self::Capsule { .. } => ObjectKind::Capsule,
            Self::Plane { .. } => ObjectKind::Plane,
            Self::Mesh { .. } => ObjectKind::Mesh,
        }
    }
}

/// Collision parameters applied when an object is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionSpec {
    /// Whether the object participates in collision at all.
    pub enabled: bool,
    /// Collision margin in meters.
    pub margin: f64,
    /// Collision group the object belongs to.
    pub group: i32,
}

impl Default for CollisionSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            margin: 0.01,
            group: 0,
        }
    }
}

/// Full description of an object to create in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSpec {
    /// Shape-specific parameters.
    pub morph: Morph,
    /// Initial position.
    pub pos: Vec3,
    /// Initial rotation (Euler angles, degrees).
    pub rot: Vec3,
    /// Material density in kg/m^3.
    pub density: f64,
    /// Collision parameters.
    pub collision: CollisionSpec,
}

impl ObjectSpec {
    /// A sphere with the original UI's defaults: radius 0.2 m,
    /// density 1000, dropped from the given position.
    pub fn sphere(pos: Vec3, radius: f64) -> Self {
        Self {
            morph: Morph::Sphere { radius },
            pos,
            rot: Vec3::ZERO,
            density: 1000.0,
            collision: CollisionSpec::default(),
        }
    }

    /// A ground plane at the given height with a +Z normal.
    pub fn ground_plane(height: f64) -> Self {
        Self {
            morph: Morph::Plane {
                height,
                normal: Vec3::new(0.0, 0.0, 1.0),
            },
            pos: Vec3::ZERO,
            rot: Vec3::ZERO,
            density: 1000.0,
            collision: CollisionSpec::default(),
        }
    }

    /// The shape category of this object.
    pub fn kind(&self) -> ObjectKind {
        self.morph.kind()
    }
}

/// Renderer selection and parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum RendererSpec {
    /// Real-time rasterizer.
    Rasterizer {
        /// Frame rate cap.
        max_fps: u32,
    },
    /// Offline-quality ray tracer.
    RayTracer {
        /// Maximum ray bounce depth.
        tracing_depth: u32,
        /// Russian-roulette start depth (0 disables).
        rr_depth: u32,
        /// Russian-roulette continuation threshold.
        rr_threshold: f64,
        /// Environment sphere radius.
        env_radius: f64,
    },
}

impl Default for RendererSpec {
    fn default() -> Self {
        Self::Rasterizer { max_fps: 60 }
    }
}

/// Camera placement and optics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSpec {
    /// Output resolution (width, height).
    pub resolution: (u32, u32),
    /// Vertical field of view in degrees.
    pub fov: f64,
    /// Camera position.
    pub pos: Vec3,
    /// Look-at target.
    pub lookat: Vec3,
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            resolution: (1280, 720),
            fov: 40.0,
            pos: Vec3::new(3.5, 0.0, 2.5),
            lookat: Vec3::new(0.0, 0.0, 0.5),
        }
    }
}

/// Where and how to save a camera recording.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingSpec {
    /// Output directory; created on save if absent.
    pub dir: PathBuf,
    /// File stem without extension.
    pub filename: String,
    /// Playback frame rate of the saved video.
    pub fps: u32,
}

impl RecordingSpec {
    /// The full output path (`dir/filename.mp4`).
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(format!("{}.mp4", self.filename))
    }
}

impl Default for RecordingSpec {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/recordings"),
            filename: "simulation".to_string(),
            fps: 60,
        }
    }
}

/// A complete visualization update: renderer, camera, and the desired
/// recording sub-state (`Some` = recording on, `None` = off).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualSpec {
    /// Renderer to install.
    pub renderer: RendererSpec,
    /// Camera to install.
    pub camera: CameraSpec,
    /// Requested recording state.
    pub recording: Option<RecordingSpec>,
}
