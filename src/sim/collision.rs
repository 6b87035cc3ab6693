//! Collision shapes and overlap tests
//!
//! Most hazards are a single box. The gate is two capped bands with an open
//! gap between them, so it must be tested band by band rather than by its
//! bounding box.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// Shape a hazard presents to the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    /// Plain axis-aligned box
    Rect(Rect),
    /// Top cap and bottom cap; the space between is safe
    DualBand { top: Rect, bottom: Rect },
}

impl CollisionShape {
    /// Does the player's box overlap any solid part of this shape?
    pub fn overlaps(&self, player: &Rect) -> bool {
        match self {
            CollisionShape::Rect(rect) => rect.overlaps(player),
            CollisionShape::DualBand { top, bottom } => {
                top.overlaps(player) || bottom.overlaps(player)
            }
        }
    }

    /// Bounding box of the whole shape
    pub fn bounds(&self) -> Rect {
        match self {
            CollisionShape::Rect(rect) => *rect,
            CollisionShape::DualBand { top, bottom } => Rect {
                min: top.min.min(bottom.min),
                max: top.max.max(bottom.max),
            },
        }
    }
}

/// Circular proximity test used for collectibles
#[inline]
pub fn within_reach(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance(b) < reach
}
