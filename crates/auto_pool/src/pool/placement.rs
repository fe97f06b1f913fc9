//! Spawn placement
//!
//! Where and how a spawned instance should appear. The pool forwards this to
//! [`crate::pool::Poolable::on_spawn`] untouched.

use crate::foundation::math::{Quat, Vec3};

/// Opaque reference to a host-side parent or container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentId(pub u64);

/// Placement parameters for a spawn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// Parent to attach the instance to
    pub parent: Option<ParentId>,
    /// World or parent-relative position
    pub position: Option<Vec3>,
    /// Orientation
    pub rotation: Option<Quat>,
    /// Which sub-variant to activate for templates holding several
    pub variant: Option<usize>,
}

impl Placement {
    /// Spawn at the given position and orientation
    pub fn at(position: Vec3, rotation: Quat) -> Self {
        Self {
            position: Some(position),
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    /// Attach to a parent
    pub fn with_parent(mut self, parent: ParentId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Activate only the given sub-variant
    pub fn with_variant(mut self, variant: usize) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Whether explicit position and rotation were supplied
    pub fn has_pose(&self) -> bool {
        self.position.is_some() && self.rotation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fields() {
        let placement = Placement::at(Vec3::new(1.0, 2.0, 3.0), Quat::identity())
            .with_parent(ParentId(7))
            .with_variant(2);

        assert!(placement.has_pose());
        assert_eq!(placement.parent, Some(ParentId(7)));
        assert_eq!(placement.variant, Some(2));
        assert!(!Placement::default().has_pose());
    }
}
