//! Synthetic hand poses for unit tests.
//!
//! All poses share one skeleton: wrist at (0.5, 0.7), middle MCP at
//! (0.5, 0.6), giving a hand size of 0.1. With the default relative
//! thresholds that makes the extension threshold 0.015 and the pinch
//! threshold 0.008 in normalized camera units.

use crate::landmarks::{Handedness, Landmark, LandmarkSet};

type Finger = [(f64, f64); 4];

const WRIST_POINT: (f64, f64) = (0.50, 0.70);

const THUMB_CURLED: Finger = [(0.40, 0.65), (0.35, 0.60), (0.34, 0.58), (0.35, 0.57)];
const THUMB_EXTENDED: Finger = [(0.40, 0.65), (0.30, 0.60), (0.25, 0.55), (0.20, 0.50)];

const INDEX_CURLED: Finger = [(0.55, 0.60), (0.58, 0.50), (0.59, 0.55), (0.60, 0.60)];
const INDEX_EXTENDED: Finger = [(0.55, 0.60), (0.58, 0.50), (0.60, 0.40), (0.62, 0.30)];

const MIDDLE_CURLED: Finger = [(0.50, 0.60), (0.51, 0.50), (0.52, 0.55), (0.53, 0.60)];
const MIDDLE_EXTENDED: Finger = [(0.50, 0.60), (0.51, 0.50), (0.52, 0.40), (0.53, 0.30)];

const RING_CURLED: Finger = [(0.45, 0.60), (0.44, 0.50), (0.43, 0.55), (0.42, 0.60)];
const RING_EXTENDED: Finger = [(0.45, 0.60), (0.44, 0.50), (0.43, 0.40), (0.42, 0.30)];

const PINKY_CURLED: Finger = [(0.40, 0.60), (0.39, 0.50), (0.38, 0.55), (0.37, 0.60)];
const PINKY_EXTENDED: Finger = [(0.40, 0.60), (0.39, 0.50), (0.38, 0.40), (0.37, 0.30)];

fn assemble(thumb: Finger, index: Finger, middle: Finger, ring: Finger, pinky: Finger) -> Vec<(f64, f64)> {
    let mut points = vec![WRIST_POINT];
    for finger in [thumb, index, middle, ring, pinky] {
        points.extend_from_slice(&finger);
    }
    points
}

fn hand_from(points: Vec<(f64, f64)>, handedness: Handedness) -> LandmarkSet {
    let landmarks = points
        .into_iter()
        .map(|(x, y)| Landmark::new(x, y, 0.0))
        .collect();
    LandmarkSet::new(landmarks, handedness, 0.95)
}

/// Only the index finger extended: the cursor-move pose
pub fn pointing_hand() -> LandmarkSet {
    hand_from(
        assemble(THUMB_CURLED, INDEX_EXTENDED, MIDDLE_CURLED, RING_CURLED, PINKY_CURLED),
        Handedness::Right,
    )
}

/// All five fingers extended: the keyboard-mode pose
pub fn open_hand() -> LandmarkSet {
    hand_from(
        assemble(
            THUMB_EXTENDED,
            INDEX_EXTENDED,
            MIDDLE_EXTENDED,
            RING_EXTENDED,
            PINKY_EXTENDED,
        ),
        Handedness::Right,
    )
}

/// Closed fist, shifted vertically by `dy` (positive = downward)
pub fn fist_hand(dy: f64) -> LandmarkSet {
    let points = assemble(THUMB_CURLED, INDEX_CURLED, MIDDLE_CURLED, RING_CURLED, PINKY_CURLED)
        .into_iter()
        .map(|(x, y)| (x, y + dy))
        .collect();
    hand_from(points, Handedness::Right)
}

/// Fist with only the thumb out: the drag-toggle pose
pub fn thumb_out_fist_hand() -> LandmarkSet {
    hand_from(
        assemble(THUMB_EXTENDED, INDEX_CURLED, MIDDLE_CURLED, RING_CURLED, PINKY_CURLED),
        Handedness::Right,
    )
}

/// Index and middle extended with their tips touching: the left-click pose
pub fn index_middle_pinch_hand() -> LandmarkSet {
    let mut points = assemble(
        THUMB_CURLED,
        INDEX_EXTENDED,
        MIDDLE_EXTENDED,
        RING_CURLED,
        PINKY_CURLED,
    );
    points[crate::constants::INDEX_TIP] = (0.525, 0.300);
    points[crate::constants::MIDDLE_TIP] = (0.526, 0.301);
    hand_from(points, Handedness::Right)
}

/// Index, middle and ring extended with index/middle tips touching:
/// the right-click pose
pub fn three_finger_pinch_hand() -> LandmarkSet {
    let mut points = assemble(
        THUMB_CURLED,
        INDEX_EXTENDED,
        MIDDLE_EXTENDED,
        RING_EXTENDED,
        PINKY_CURLED,
    );
    points[crate::constants::INDEX_TIP] = (0.525, 0.300);
    points[crate::constants::MIDDLE_TIP] = (0.526, 0.301);
    hand_from(points, Handedness::Right)
}

/// Thumb tip touching the index tip: the double-click pose
pub fn thumb_index_pinch_hand() -> LandmarkSet {
    let mut points = assemble(
        THUMB_CURLED,
        INDEX_EXTENDED,
        MIDDLE_CURLED,
        RING_CURLED,
        PINKY_CURLED,
    );
    points[crate::constants::THUMB_TIP] = (0.621, 0.301);
    hand_from(points, Handedness::Right)
}

/// Index and middle extended and spread apart, shifted vertically by
/// `dy`: the scroll pose
pub fn scroll_hand(dy: f64) -> LandmarkSet {
    let points = assemble(
        THUMB_CURLED,
        INDEX_EXTENDED,
        MIDDLE_EXTENDED,
        RING_CURLED,
        PINKY_CURLED,
    )
    .into_iter()
    .map(|(x, y)| (x, y + dy))
    .collect();
    hand_from(points, Handedness::Right)
}

/// Pointing pose translated so the index tip sits at (`x`, `y`)
pub fn pointing_hand_at(x: f64, y: f64) -> LandmarkSet {
    let dx = x - 0.62;
    let dy = y - 0.30;
    let points = assemble(THUMB_CURLED, INDEX_EXTENDED, MIDDLE_CURLED, RING_CURLED, PINKY_CURLED)
        .into_iter()
        .map(|(px, py)| (px + dx, py + dy))
        .collect();
    hand_from(points, Handedness::Right)
}

/// Thumb/index pinch pose translated so the index tip sits at `x`,
/// for two-hand gestures
pub fn pinching_hand_at(x: f64, handedness: Handedness) -> LandmarkSet {
    let dx = x - 0.62;
    let mut points = assemble(
        THUMB_CURLED,
        INDEX_EXTENDED,
        MIDDLE_CURLED,
        RING_CURLED,
        PINKY_CURLED,
    );
    points[crate::constants::THUMB_TIP] = (0.621, 0.301);
    let points = points.into_iter().map(|(px, py)| (px + dx, py)).collect();
    hand_from(points, handedness)
}
