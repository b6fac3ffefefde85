//! Pure per-frame hand geometry.
//!
//! Everything here is derived from a single [`LandmarkSet`] (no cross-frame
//! state), so results are reproducible from the landmarks alone. All
//! thresholds are scaled by the hand size estimate, making the tests
//! invariant to how far the hand is from the camera.

use crate::constants::{
    EPSILON, FINGER_PIPS, FINGER_TIPS, INDEX_TIP, MIDDLE_TIP, NUM_HAND_LANDMARKS, THUMB_TIP,
};
use crate::landmarks::LandmarkSet;
use crate::{Error, Result};

/// Per-finger extension flags plus a continuous openness score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerState {
    /// thumb, index, middle, ring, pinky
    pub extended: [bool; 5],
    /// 0.0 = closed fist, 1.0 = fully open hand
    pub openness: f64,
}

impl FingerState {
    #[must_use]
    pub const fn thumb(&self) -> bool {
        self.extended[0]
    }

    #[must_use]
    pub const fn index(&self) -> bool {
        self.extended[1]
    }

    #[must_use]
    pub const fn middle(&self) -> bool {
        self.extended[2]
    }

    #[must_use]
    pub const fn ring(&self) -> bool {
        self.extended[3]
    }

    #[must_use]
    pub const fn pinky(&self) -> bool {
        self.extended[4]
    }

    #[must_use]
    pub fn extended_count(&self) -> usize {
        self.extended.iter().filter(|&&e| e).count()
    }

    #[must_use]
    pub fn all_extended(&self) -> bool {
        self.extended.iter().all(|&e| e)
    }

    /// Closed fist: no finger extended, thumb included
    #[must_use]
    pub fn is_fist(&self) -> bool {
        self.extended_count() == 0
    }

    /// Fist with only the thumb out
    #[must_use]
    pub fn thumb_only(&self) -> bool {
        self.thumb() && !self.index() && !self.middle() && !self.ring() && !self.pinky()
    }
}

/// Everything the gesture classifier needs to know about one hand
/// for one frame
#[derive(Debug, Clone)]
pub struct HandGeometry {
    pub fingers: FingerState,
    /// Thumb tip / index tip pinched together
    pub thumb_index_pinch: bool,
    /// Index tip / middle tip pinched together
    pub index_middle_pinch: bool,
    /// Index fingertip in normalized camera coordinates; the cursor target
    pub pointer: (f64, f64),
    /// Palm center in normalized camera coordinates
    pub palm_center: (f64, f64),
    /// Midpoint y of the index and middle fingertips; the scroll reference
    pub scroll_center_y: f64,
    /// Wrist to middle-MCP distance
    pub hand_size: f64,
}

/// A single frame's classification input: geometry for up to two hands
/// plus the inter-hand pointer distance when both are visible
#[derive(Debug, Clone)]
pub struct GestureSample {
    pub primary: HandGeometry,
    pub secondary: Option<HandGeometry>,
    /// Distance between the two hands' pointer points, normalized by the
    /// mean hand size; present only when two hands are tracked
    pub inter_hand_distance: Option<f64>,
}

/// Analyze one hand's landmarks.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] when fewer than 21 points are present.
pub fn analyze_hand(
    set: &LandmarkSet,
    finger_threshold: f64,
    pinch_threshold: f64,
) -> Result<HandGeometry> {
    if !set.is_complete() {
        return Err(Error::MalformedInput(format!(
            "expected {} landmarks, got {}",
            NUM_HAND_LANDMARKS,
            set.len()
        )));
    }

    let hand_size = set.hand_size().max(EPSILON);
    let threshold = finger_threshold * hand_size;

    let mut extended = [false; 5];
    let mut openness_sum = 0.0;
    for (i, (&tip_idx, &pip_idx)) in FINGER_TIPS.iter().zip(FINGER_PIPS.iter()).enumerate() {
        let tip = &set[tip_idx];
        let pip = &set[pip_idx];

        // Fingers extend upward in camera space (tip above PIP); the thumb
        // extends sideways, so it is tested on the x axis instead.
        let distance = if tip_idx == THUMB_TIP {
            (tip.x - pip.x).abs()
        } else {
            pip.y - tip.y
        };

        extended[i] = distance > threshold;
        openness_sum += (distance / threshold).clamp(0.0, 1.0);
    }

    let fingers = FingerState {
        extended,
        openness: openness_sum / 5.0,
    };

    let pinch_limit = pinch_threshold * hand_size;
    let thumb_index_pinch = set[THUMB_TIP].distance_2d(&set[INDEX_TIP]) < pinch_limit;
    let index_middle_pinch = set[INDEX_TIP].distance_2d(&set[MIDDLE_TIP]) < pinch_limit;

    let index_tip = &set[INDEX_TIP];
    let middle_tip = &set[MIDDLE_TIP];

    Ok(HandGeometry {
        fingers,
        thumb_index_pinch,
        index_middle_pinch,
        pointer: (index_tip.x, index_tip.y),
        palm_center: set.palm_center(),
        scroll_center_y: (index_tip.y + middle_tip.y) / 2.0,
        hand_size,
    })
}

/// Build the classification input for one frame from up to two hands.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if either hand has an incomplete
/// landmark set.
pub fn build_sample(
    primary: &LandmarkSet,
    secondary: Option<&LandmarkSet>,
    finger_threshold: f64,
    pinch_threshold: f64,
) -> Result<GestureSample> {
    let primary_geometry = analyze_hand(primary, finger_threshold, pinch_threshold)?;
    let secondary_geometry = secondary
        .map(|set| analyze_hand(set, finger_threshold, pinch_threshold))
        .transpose()?;

    let inter_hand_distance = secondary_geometry.as_ref().map(|sec| {
        let (px, py) = primary_geometry.pointer;
        let (sx, sy) = sec.pointer;
        let mean_size = ((primary_geometry.hand_size + sec.hand_size) / 2.0).max(EPSILON);
        (sx - px).hypot(sy - py) / mean_size
    });

    Ok(GestureSample {
        primary: primary_geometry,
        secondary: secondary_geometry,
        inter_hand_distance,
    })
}
