//! Hand landmark data structures.
//!
//! A [`LandmarkSet`] carries one detector observation for a single hand:
//! 21 points in normalized camera coordinates (x, y in [0, 1], z relative
//! depth), a handedness label, and a detection confidence. Instances live
//! for one frame and are never mutated.

use crate::constants::{INDEX_MCP, MIDDLE_MCP, PINKY_MCP, RING_MCP, WRIST};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A single 3D landmark in normalized camera coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar (x, y) distance to another landmark
    #[must_use]
    pub fn distance_2d(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.hypot(dy)
    }
}

/// Which hand a landmark set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Default for Handedness {
    fn default() -> Self {
        Self::Right
    }
}

/// One hand's landmarks for a single frame
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
    handedness: Handedness,
    confidence: f64,
}

impl LandmarkSet {
    /// Wrap a detector observation. The point count is not checked here;
    /// geometry analysis rejects incomplete sets.
    #[must_use]
    pub fn new(points: Vec<Landmark>, handedness: Handedness, confidence: f64) -> Self {
        Self {
            points,
            handedness,
            confidence,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether all 21 landmarks are present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.points.len() == crate::constants::NUM_HAND_LANDMARKS
    }

    #[must_use]
    pub const fn handedness(&self) -> Handedness {
        self.handedness
    }

    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Wrist to middle-MCP distance, used to scale all gesture thresholds
    /// so detection is invariant to hand distance from the camera.
    ///
    /// Requires a complete set; callers validate via [`Self::is_complete`].
    #[must_use]
    pub fn hand_size(&self) -> f64 {
        self.points[WRIST].distance_2d(&self.points[MIDDLE_MCP])
    }

    /// Palm center: average of the wrist and the four finger MCP joints
    #[must_use]
    pub fn palm_center(&self) -> (f64, f64) {
        let indices = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
        let n = indices.len() as f64;
        let (sx, sy) = indices.iter().fold((0.0, 0.0), |(sx, sy), &i| {
            (sx + self.points[i].x, sy + self.points[i].y)
        });
        (sx / n, sy / n)
    }
}

impl Index<usize> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.points[index]
    }
}
