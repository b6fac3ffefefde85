//! Per-frame pipeline orchestration.
//!
//! The [`Pipeline`] drives one frame cycle: landmark sets in, exactly one
//! [`ActionEvent`] out. Gestures are evaluated on the raw geometry; only
//! the cursor position is smoothed, since smoothing a discrete gesture
//! decision would add latency without reducing noise.
//!
//! All pipeline state (filter state, gesture history, cooldowns) is
//! mutated in strict frame order; the pipeline is single-consumer and
//! never processes two frames concurrently.

use crate::calibration::{CalibrationMapper, CalibrationTransform};
use crate::config::Config;
use crate::constants::MALFORMED_BURST_LIMIT;
use crate::geometry::{build_sample, GestureSample};
use crate::gesture::{GestureRecognizer, RecognizedGesture};
use crate::landmarks::LandmarkSet;
use crate::smoothing::PointSmoother;
use crate::{Error, Result};
use log::{info, warn};

/// One frame's output: the committed gesture and, for cursor motion,
/// the smoothed screen position
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    pub gesture: RecognizedGesture,
    /// Smoothed screen-space cursor position, present for `Move`
    pub cursor: Option<(f64, f64)>,
    /// Frame timestamp in seconds
    pub timestamp: f64,
}

impl ActionEvent {
    #[must_use]
    pub const fn idle(timestamp: f64) -> Self {
        Self {
            gesture: RecognizedGesture::Idle,
            cursor: None,
            timestamp,
        }
    }
}

/// Side-effecting consumer of action events (OS cursor/keyboard layer)
pub trait ActionDispatcher {
    /// Perform the OS-level action for one event.
    ///
    /// # Errors
    ///
    /// Implementations report failures; the pipeline logs them and never
    /// retries, since a missed single-frame action beats a duplicated one.
    fn dispatch(&mut self, event: &ActionEvent) -> Result<()>;
}

/// One detector observation: up to two hands and a capture timestamp
#[derive(Debug, Clone)]
pub struct TrackedFrame {
    pub first: Option<LandmarkSet>,
    pub second: Option<LandmarkSet>,
    /// Capture time in seconds, non-decreasing
    pub timestamp: f64,
}

/// Non-blocking provider of the most recent detector output. Stale frames
/// are expected to be overwritten at the source, never queued.
pub trait LandmarkSource {
    /// Latest observation, or `None` when the stream has ended
    fn next_frame(&mut self) -> Option<TrackedFrame>;
}

/// Ties geometry, smoothing, calibration and gesture recognition into a
/// single per-frame cycle
pub struct Pipeline {
    config: Config,
    mapper: CalibrationMapper,
    smoother: PointSmoother,
    recognizer: GestureRecognizer,

    paused: bool,
    /// Consecutive frames without a usable hand
    absent_streak: u32,
    was_tracking: bool,
    /// Consecutive malformed frames, for the degraded-mode signal
    malformed_streak: u32,
    /// Raw camera pointer from the latest tracked frame, paired with a
    /// screen anchor when the user confirms a calibration point
    last_pointer: Option<(f64, f64)>,
    /// Last emitted screen position, for sensitivity scaling
    last_cursor: Option<(f64, f64)>,
}

impl Pipeline {
    /// Create a pipeline for the given screen bounds.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration.
    pub fn new(config: Config, screen_width: f64, screen_height: f64) -> Result<Self> {
        config.validate()?;
        let mapper = CalibrationMapper::new(screen_width, screen_height, config.cursor.dead_zone);
        let smoother = PointSmoother::from_config(&config.smoothing)?;
        let recognizer = GestureRecognizer::new(config.gestures.clone());

        info!(
            "Pipeline initialized for {}x{} screen, {} smoothing",
            screen_width,
            screen_height,
            smoother.name()
        );

        Ok(Self {
            config,
            mapper,
            smoother,
            recognizer,
            paused: false,
            absent_streak: 0,
            was_tracking: false,
            malformed_streak: 0,
            last_pointer: None,
            last_cursor: None,
        })
    }

    /// Process one frame. `now` is in seconds and must be non-decreasing
    /// across calls. Emits exactly one event per processed frame.
    pub fn process_frame(
        &mut self,
        first: Option<&LandmarkSet>,
        second: Option<&LandmarkSet>,
        now: f64,
    ) -> ActionEvent {
        if self.paused {
            return ActionEvent::idle(now);
        }

        let (primary, secondary) = self.select_hands(first, second);

        let Some(primary) = primary else {
            return self.handle_hand_absent(now);
        };

        let sample = match build_sample(
            primary,
            secondary,
            self.config.gestures.finger_threshold,
            self.config.gestures.pinch_threshold,
        ) {
            Ok(sample) => sample,
            Err(e) => return self.handle_malformed(&e, now),
        };

        self.absent_streak = 0;
        self.was_tracking = true;
        self.malformed_streak = 0;

        let pointer = sample.primary.pointer;
        self.last_pointer = Some(pointer);
        let cursor = self.map_and_smooth(pointer, now);

        let gesture = self.recognizer.process(Some(&sample), now);
        let cursor = match gesture {
            RecognizedGesture::Move { .. } => Some(cursor),
            _ => None,
        };

        ActionEvent {
            gesture,
            cursor,
            timestamp: now,
        }
    }

    /// Process one frame and hand the event to the dispatcher. Dispatch
    /// failures are logged and never retried.
    pub fn process_and_dispatch(
        &mut self,
        first: Option<&LandmarkSet>,
        second: Option<&LandmarkSet>,
        now: f64,
        dispatcher: &mut dyn ActionDispatcher,
    ) -> ActionEvent {
        let event = self.process_frame(first, second, now);
        if let Err(e) = dispatcher.dispatch(&event) {
            warn!("Dispatch failed (not retried): {e}");
        }
        event
    }

    /// Pull frames from the source until it ends, dispatching one event
    /// per frame
    pub fn run(&mut self, source: &mut dyn LandmarkSource, dispatcher: &mut dyn ActionDispatcher) {
        while let Some(frame) = source.next_frame() {
            self.process_and_dispatch(
                frame.first.as_ref(),
                frame.second.as_ref(),
                frame.timestamp,
                dispatcher,
            );
        }
    }

    /// Pick the dominant and secondary hands from the detector output,
    /// dropping low-confidence detections
    fn select_hands<'a>(
        &self,
        first: Option<&'a LandmarkSet>,
        second: Option<&'a LandmarkSet>,
    ) -> (Option<&'a LandmarkSet>, Option<&'a LandmarkSet>) {
        let min_confidence = self.config.tracking.min_confidence;
        let mut candidates: Vec<&LandmarkSet> = [first, second]
            .into_iter()
            .flatten()
            .filter(|hand| hand.confidence() >= min_confidence)
            .collect();
        candidates.truncate(self.config.tracking.max_num_hands);

        let dominant_index = candidates
            .iter()
            .position(|hand| hand.handedness() == self.config.tracking.dominant_hand)
            .unwrap_or(0);

        let primary = candidates.get(dominant_index).copied();
        let secondary = candidates
            .iter()
            .enumerate()
            .find(|&(i, _)| i != dominant_index)
            .map(|(_, hand)| *hand);
        (primary, secondary)
    }

    fn handle_hand_absent(&mut self, now: f64) -> ActionEvent {
        // Immediate transition to Idle; no stale committed state survives
        self.recognizer.process(None, now);
        self.absent_streak = self.absent_streak.saturating_add(1);
        if self.was_tracking && self.absent_streak >= self.config.tracking.hand_lost_frames {
            info!("Hand lost for {} frames, resetting smoothing", self.absent_streak);
            self.smoother.reset();
            self.last_cursor = None;
            self.was_tracking = false;
        }
        ActionEvent::idle(now)
    }

    fn handle_malformed(&mut self, error: &Error, now: f64) -> ActionEvent {
        self.malformed_streak = self.malformed_streak.saturating_add(1);
        if self.malformed_streak == MALFORMED_BURST_LIMIT {
            warn!(
                "{} consecutive malformed frames, detector output is degraded",
                self.malformed_streak
            );
        }
        warn!("Dropping malformed frame: {error}");
        ActionEvent::idle(now)
    }

    /// Camera pointer → screen position: calibrated mapping when
    /// available, dead-zone linear scale otherwise, then smoothing and
    /// sensitivity amplification
    fn map_and_smooth(&mut self, pointer: (f64, f64), now: f64) -> (f64, f64) {
        let mapped = self
            .mapper
            .map(pointer)
            .unwrap_or_else(|_| self.mapper.fallback_map(pointer));

        let smoothed = self.smoother.filter(mapped, now);

        let sensitivity = self.config.cursor.sensitivity;
        let position = match self.last_cursor {
            Some((lx, ly)) if (sensitivity - 1.0).abs() > f64::EPSILON => {
                let (width, height) = self.mapper.screen_bounds();
                (
                    sensitivity.mul_add(smoothed.0 - lx, lx).clamp(0.0, width),
                    sensitivity.mul_add(smoothed.1 - ly, ly).clamp(0.0, height),
                )
            }
            _ => smoothed,
        };
        self.last_cursor = Some(position);
        position
    }

    // --- calibration control -------------------------------------------

    /// Enter calibration collecting mode
    pub fn begin_calibration(&mut self) {
        self.mapper.begin_collection();
    }

    /// Pair the current pointer position with a confirmed screen anchor.
    ///
    /// # Errors
    ///
    /// Fails if no hand has been tracked yet or collection is not active.
    pub fn confirm_calibration_point(&mut self, screen_anchor: (f64, f64)) -> Result<()> {
        let pointer = self.last_pointer.ok_or_else(|| {
            Error::InvalidInput("no pointer observation to pair with the anchor".to_string())
        })?;
        self.mapper.record_pair(pointer, screen_anchor)
    }

    /// Fit the transform from the collected points.
    ///
    /// On success the smoothing state is reset so the remapped cursor
    /// re-acquires with zero lag. On a degenerate fit the collected
    /// points stay available for retry.
    pub fn end_calibration(&mut self) -> Result<CalibrationTransform> {
        let transform = self.mapper.finish_collection()?;
        self.reset_smoothing();
        Ok(transform)
    }

    /// Abort calibration, discarding collected points
    pub fn cancel_calibration(&mut self) {
        self.mapper.cancel_collection();
    }

    // --- runtime control -----------------------------------------------

    /// Clear smoothing state; the next sample passes through with zero lag
    pub fn reset_smoothing(&mut self) {
        self.smoother.reset();
        self.last_cursor = None;
    }

    /// Freeze event emission. Idle events still pass through.
    pub fn pause(&mut self) {
        self.paused = true;
        self.recognizer.reset();
        info!("Pipeline paused");
    }

    /// Resume event emission with fresh gesture and smoothing state
    pub fn resume(&mut self) {
        self.paused = false;
        self.recognizer.reset();
        self.reset_smoothing();
        info!("Pipeline resumed");
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Persistent malformed input past the burst limit
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.malformed_streak >= MALFORMED_BURST_LIMIT
    }

    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.mapper.is_calibrated()
    }

    #[must_use]
    pub fn mapper(&self) -> &CalibrationMapper {
        &self.mapper
    }

    #[must_use]
    pub fn mapper_mut(&mut self) -> &mut CalibrationMapper {
        &mut self.mapper
    }

    /// Classification input for external inspection (preview overlays)
    pub fn peek_sample(&self, hand: &LandmarkSet) -> Result<GestureSample> {
        build_sample(
            hand,
            None,
            self.config.gestures.finger_threshold,
            self.config.gestures.pinch_threshold,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::RecognizedGesture;
    use crate::landmarks::{Handedness, Landmark};
    use crate::test_hands;

    fn pipeline() -> Pipeline {
        Pipeline::new(Config::default(), 1920.0, 1080.0).unwrap()
    }

    fn feed_move(pipeline: &mut Pipeline, hand: &LandmarkSet, frames: usize, start: f64) -> Vec<ActionEvent> {
        (0..frames)
            .map(|i| pipeline.process_frame(Some(hand), None, start + i as f64 * 0.033))
            .collect()
    }

    #[test]
    fn test_move_event_carries_screen_cursor() {
        let mut pipeline = pipeline();
        let hand = test_hands::pointing_hand();

        let events = feed_move(&mut pipeline, &hand, 3, 0.0);
        let last = events.last().unwrap();
        assert!(matches!(last.gesture, RecognizedGesture::Move { .. }));

        let (x, y) = last.cursor.unwrap();
        assert!((0.0..=1920.0).contains(&x));
        assert!((0.0..=1080.0).contains(&y));
    }

    #[test]
    fn test_malformed_frame_emits_idle_without_state_change() {
        let mut pipeline = pipeline();
        let bad = LandmarkSet::new(
            vec![Landmark::new(0.5, 0.5, 0.0); 7],
            Handedness::Right,
            1.0,
        );

        let event = pipeline.process_frame(Some(&bad), None, 0.0);
        assert_eq!(event.gesture, RecognizedGesture::Idle);
        assert!(!pipeline.is_degraded());
    }

    #[test]
    fn test_persistent_malformed_input_degrades() {
        let mut pipeline = pipeline();
        let bad = LandmarkSet::new(vec![], Handedness::Right, 1.0);

        for i in 0..crate::constants::MALFORMED_BURST_LIMIT {
            pipeline.process_frame(Some(&bad), None, f64::from(i) * 0.033);
        }
        assert!(pipeline.is_degraded());

        // One good frame clears the signal
        let good = test_hands::pointing_hand();
        pipeline.process_frame(Some(&good), None, 1.0);
        assert!(!pipeline.is_degraded());
    }

    #[test]
    fn test_low_confidence_hand_is_absent() {
        let mut pipeline = pipeline();
        let points = test_hands::pointing_hand().points().to_vec();
        let faint = LandmarkSet::new(points, Handedness::Right, 0.2);

        let event = pipeline.process_frame(Some(&faint), None, 0.0);
        assert_eq!(event.gesture, RecognizedGesture::Idle);
    }

    #[test]
    fn test_hand_loss_resets_smoothing() {
        let mut pipeline = pipeline();
        let near = test_hands::pointing_hand_at(0.3, 0.3);
        feed_move(&mut pipeline, &near, 4, 0.0);

        // Two absent frames cross the default loss threshold
        pipeline.process_frame(None, None, 0.2);
        pipeline.process_frame(None, None, 0.233);

        // After the reset the re-acquired pointer passes through with zero
        // lag: the cursor lands exactly on the fallback-mapped position
        // instead of trailing from the pre-loss location
        let far = test_hands::pointing_hand_at(0.7, 0.6);
        let events = feed_move(&mut pipeline, &far, 3, 0.3);
        let (x, y) = events.last().unwrap().cursor.unwrap();
        assert!((x - 1440.0).abs() < 1e-9); // (0.7 - 0.1) / 0.8 * 1920
        assert!((y - 675.0).abs() < 1e-9); // (0.6 - 0.1) / 0.8 * 1080
    }

    #[test]
    fn test_pause_freezes_emission() {
        let mut pipeline = pipeline();
        let hand = test_hands::pointing_hand();

        pipeline.pause();
        let events = feed_move(&mut pipeline, &hand, 4, 0.0);
        assert!(events.iter().all(|e| e.gesture == RecognizedGesture::Idle));

        pipeline.resume();
        let events = feed_move(&mut pipeline, &hand, 3, 1.0);
        assert!(matches!(
            events.last().unwrap().gesture,
            RecognizedGesture::Move { .. }
        ));
    }

    #[test]
    fn test_calibration_flow_through_pipeline() {
        let mut pipeline = pipeline();
        pipeline.begin_calibration();

        let anchors = [
            ((0.15, 0.2), (192.0, 108.0)),
            ((0.85, 0.2), (1728.0, 108.0)),
            ((0.85, 0.8), (1728.0, 972.0)),
            ((0.15, 0.8), (192.0, 972.0)),
        ];
        for (camera, anchor) in anchors {
            let hand = test_hands::pointing_hand_at(camera.0, camera.1);
            pipeline.process_frame(Some(&hand), None, 0.0);
            pipeline.confirm_calibration_point(anchor).unwrap();
        }

        assert!(pipeline.end_calibration().is_ok());
        assert!(pipeline.is_calibrated());
    }

    #[test]
    fn test_confirm_without_pointer_fails() {
        let mut pipeline = pipeline();
        pipeline.begin_calibration();
        assert!(pipeline.confirm_calibration_point((0.0, 0.0)).is_err());
    }

    #[test]
    fn test_dominant_hand_selection() {
        let config = Config::default();
        assert_eq!(config.tracking.dominant_hand, Handedness::Right);
        let mut pipeline = pipeline();

        let left = test_hands::pinching_hand_at(0.3, Handedness::Left);
        let right = test_hands::pointing_hand();

        // Right hand drives the cursor even when listed second
        let events: Vec<_> = (0..3)
            .map(|i| pipeline.process_frame(Some(&left), Some(&right), f64::from(i) * 0.033))
            .collect();
        assert!(matches!(
            events.last().unwrap().gesture,
            RecognizedGesture::Move { .. }
        ));
    }
}
