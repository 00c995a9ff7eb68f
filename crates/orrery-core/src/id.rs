//! Strongly-typed entity identifiers.

use std::fmt;

/// Opaque handle to an entity inside the external engine.
///
/// Only meaningful to the [`Engine`](crate::Engine) that issued it;
/// the session never interprets the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef(pub u64);

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityRef {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// The shape category of a scene object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A sphere primitive.
    Sphere,
    /// An axis-aligned box primitive.
    Box,
    /// A capsule primitive.
    Capsule,
    /// An infinite plane.
    Plane,
    /// A triangle mesh loaded from file.
    Mesh,
}

impl ObjectKind {
    /// Lowercase name used in entity ids (`sphere`, `box`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Box => "box",
            Self::Capsule => "capsule",
            Self::Plane => "plane",
            Self::Mesh => "mesh",
        }
    }

    /// Capitalized label used in user-facing messages (`Sphere`, ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Sphere => "Sphere",
            Self::Box => "Box",
            Self::Capsule => "Capsule",
            Self::Plane => "Plane",
            Self::Mesh => "Mesh",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable controller-side identifier for a registered entity.
///
/// Rendered as `{kind}_{serial}` (`sphere_1`, `box_2`). Serials come
/// from a per-session monotonic counter shared across all kinds, so an
/// id is never reused within a session even after `stop()` clears the
/// registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId {
    /// The shape category.
    pub kind: ObjectKind,
    /// Monotonic per-session serial, starting at 1.
    pub serial: u64,
}

impl EntityId {
    /// Create an id from a kind and serial.
    pub const fn new(kind: ObjectKind, serial: u64) -> Self {
        Self { kind, serial }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.name(), self.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_renders_kind_and_serial() {
        assert_eq!(EntityId::new(ObjectKind::Sphere, 1).to_string(), "sphere_1");
        assert_eq!(EntityId::new(ObjectKind::Box, 12).to_string(), "box_12");
        assert_eq!(EntityId::new(ObjectKind::Mesh, 3).to_string(), "mesh_3");
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ObjectKind::Capsule.label(), "Capsule");
        assert_eq!(ObjectKind::Capsule.name(), "capsule");
        assert_eq!(ObjectKind::Plane.to_string(), "plane");
    }

    #[test]
    fn entity_ref_display() {
        assert_eq!(EntityRef(7).to_string(), "7");
        assert_eq!(EntityRef::from(7u64), EntityRef(7));
    }
}
