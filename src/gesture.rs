//! Gesture recognition state machine.
//!
//! Every frame produces a raw guess from the hand geometry alone, in a
//! fixed priority order. A guess commits only after it has appeared in
//! `stability_frames` consecutive frames (debouncing rejects single-frame
//! detector flicker), and committed discrete gestures are suppressed by a
//! per-kind cooldown so held poses cannot fire event storms. `Move` and
//! `Idle` are continuous and bypass the cooldown entirely.
//!
//! Two temporal mechanisms coexist and are deliberately separate: the
//! keyboard-mode hold timer measures *held duration* of the open-palm
//! pose, while the stability window measures *repeated per-frame
//! classification agreement*.

use crate::config::GestureConfig;
use crate::geometry::GestureSample;
use log::debug;
use std::collections::{HashMap, VecDeque};

/// Scroll direction, the sign of the vertical fingertip displacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// A classified gesture with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizedGesture {
    /// No recognized intent
    Idle,
    /// Cursor movement toward the camera-space target point
    Move { cursor: (f64, f64) },
    LeftClick,
    RightClick,
    DoubleClick,
    Scroll { direction: ScrollDirection },
    /// Toggle press-and-hold for dragging
    DragToggle,
    /// Fist held without vertical displacement
    GrabWindow,
    /// Fist pulled downward
    WindowMinimize,
    /// Fist pushed upward
    WindowMaximize,
    /// Two-hand pinch; payload is the change in normalized inter-hand
    /// distance since the previous resize frame
    ResizeWindow { delta: f64 },
    /// Keyboard shortcut request; payload is the number of extended
    /// fingers at commit, mapped to a shortcut by the caller
    KeyboardMode { finger_count: u8 },
}

/// Payload-free gesture discriminant, used for history comparison and
/// the cooldown registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Idle,
    Move,
    LeftClick,
    RightClick,
    DoubleClick,
    Scroll,
    DragToggle,
    GrabWindow,
    WindowMinimize,
    WindowMaximize,
    ResizeWindow,
    KeyboardMode,
}

impl GestureKind {
    /// Continuous kinds repeat every frame and never enter cooldown
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        matches!(self, Self::Idle | Self::Move)
    }
}

impl RecognizedGesture {
    #[must_use]
    pub const fn kind(&self) -> GestureKind {
        match self {
            Self::Idle => GestureKind::Idle,
            Self::Move { .. } => GestureKind::Move,
            Self::LeftClick => GestureKind::LeftClick,
            Self::RightClick => GestureKind::RightClick,
            Self::DoubleClick => GestureKind::DoubleClick,
            Self::Scroll { .. } => GestureKind::Scroll,
            Self::DragToggle => GestureKind::DragToggle,
            Self::GrabWindow => GestureKind::GrabWindow,
            Self::WindowMinimize => GestureKind::WindowMinimize,
            Self::WindowMaximize => GestureKind::WindowMaximize,
            Self::ResizeWindow { .. } => GestureKind::ResizeWindow,
            Self::KeyboardMode { .. } => GestureKind::KeyboardMode,
        }
    }
}

/// Gesture recognizer with stability debouncing and cooldown management
pub struct GestureRecognizer {
    config: GestureConfig,

    /// Ring buffer of the last `stability_frames` raw guesses
    history: VecDeque<GestureKind>,

    /// Earliest-next-allowed commit time per gesture kind, seconds
    cooldowns: HashMap<GestureKind, f64>,

    // Keyboard-mode continuous hold timer
    keyboard_hold_start: Option<f64>,
    keyboard_armed: bool,

    // Grab tracking: palm-center y recorded when the fist closed
    grab_origin_y: Option<f64>,

    // Previous scroll reference (index/middle midpoint y)
    last_scroll_y: Option<f64>,

    // Previous inter-hand distance while both hands pinch
    last_hand_span: Option<f64>,
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        let stability = config.stability_frames;
        Self {
            config,
            history: VecDeque::with_capacity(stability),
            cooldowns: HashMap::new(),
            keyboard_hold_start: None,
            keyboard_armed: false,
            grab_origin_y: None,
            last_scroll_y: None,
            last_hand_span: None,
        }
    }

    /// Process one frame. `now` is in seconds and must be non-decreasing.
    ///
    /// Returns the gesture to act on this frame: a newly committed
    /// discrete gesture, a continuous `Move`, or `Idle` while unstable,
    /// cooling down, or hand-less.
    pub fn process(&mut self, sample: Option<&GestureSample>, now: f64) -> RecognizedGesture {
        let Some(sample) = sample else {
            // Tracking lost: drop any candidate state immediately so no
            // stale gesture can commit on re-acquisition
            self.clear_frame_state();
            return RecognizedGesture::Idle;
        };

        let raw = self.classify_raw(sample, now);
        let kind = raw.kind();

        if self.history.len() >= self.config.stability_frames {
            self.history.pop_front();
        }
        self.history.push_back(kind);

        if self.history.len() < self.config.stability_frames {
            return RecognizedGesture::Idle;
        }
        if !self.history.iter().all(|&k| k == kind) {
            return RecognizedGesture::Idle;
        }

        if kind.is_continuous() {
            return raw;
        }

        if let Some(&allowed_at) = self.cooldowns.get(&kind) {
            if now < allowed_at {
                return RecognizedGesture::Idle;
            }
        }

        self.cooldowns.insert(kind, now + self.cooldown_secs(kind));
        if kind == GestureKind::KeyboardMode {
            // One shortcut per hold: disarm and require a fresh hold
            self.keyboard_armed = false;
            self.keyboard_hold_start = None;
        }
        debug!("Committed gesture: {kind:?}");
        raw
    }

    /// Reset all recognizer state, cooldowns included. Called on explicit
    /// pause/resume, not on transient hand loss.
    pub fn reset(&mut self) {
        self.clear_frame_state();
        self.cooldowns.clear();
    }

    /// Clear per-candidate state while keeping the cooldown registry
    fn clear_frame_state(&mut self) {
        self.history.clear();
        self.keyboard_hold_start = None;
        self.keyboard_armed = false;
        self.grab_origin_y = None;
        self.last_scroll_y = None;
        self.last_hand_span = None;
    }

    fn cooldown_secs(&self, kind: GestureKind) -> f64 {
        let ms = match kind {
            GestureKind::Scroll | GestureKind::ResizeWindow => self.config.cooldown_scroll_ms,
            _ => self.config.cooldown_click_ms,
        };
        ms as f64 / 1000.0
    }

    /// Classify one frame from geometry alone, first match wins.
    ///
    /// The sub-state fields mutated here (hold timer, grab origin, scroll
    /// and resize references) carry measurement baselines across frames;
    /// the classification itself never looks at the guess history.
    fn classify_raw(&mut self, sample: &GestureSample, now: f64) -> RecognizedGesture {
        let hand = &sample.primary;
        let fingers = &hand.fingers;

        let both_hands_pinch = sample
            .secondary
            .as_ref()
            .map_or(false, |sec| hand.thumb_index_pinch && sec.thumb_index_pinch);
        let fist = fingers.is_fist();
        let scroll_pose = fingers.index()
            && fingers.middle()
            && !fingers.ring()
            && !fingers.pinky()
            && !hand.index_middle_pinch;

        // Drop measurement baselines whose pose has ended
        if !both_hands_pinch {
            self.last_hand_span = None;
        }
        if !fist {
            self.grab_origin_y = None;
        }
        if !scroll_pose {
            self.last_scroll_y = None;
        }

        // Keyboard mode: armed after the open palm is held long enough,
        // then the next stable pose supplies the finger count
        if self.keyboard_armed {
            return RecognizedGesture::KeyboardMode {
                finger_count: fingers.extended_count() as u8,
            };
        }
        let all_open = fingers.all_extended()
            && sample
                .secondary
                .as_ref()
                .map_or(true, |sec| sec.fingers.all_extended());
        if all_open {
            let start = *self.keyboard_hold_start.get_or_insert(now);
            if now - start >= self.config.keyboard_hold_time {
                self.keyboard_armed = true;
                return RecognizedGesture::KeyboardMode {
                    finger_count: fingers.extended_count() as u8,
                };
            }
            // Open palm building toward keyboard mode is not yet a gesture
            return RecognizedGesture::Idle;
        }
        self.keyboard_hold_start = None;

        // Two-hand pinch resizes; payload is the span change per frame
        if both_hands_pinch {
            let span = sample.inter_hand_distance.unwrap_or(0.0);
            let delta = self.last_hand_span.map_or(0.0, |prev| span - prev);
            self.last_hand_span = Some(span);
            return RecognizedGesture::ResizeWindow { delta };
        }

        if fingers.thumb_only() {
            return RecognizedGesture::DragToggle;
        }

        // Fist family: grab at the closing position, minimize/maximize on
        // vertical palm displacement while held (camera y grows downward)
        if fist {
            let y = hand.palm_center.1;
            let origin = *self.grab_origin_y.get_or_insert(y);
            let rise = origin - y;
            if rise > self.config.grab_threshold {
                return RecognizedGesture::WindowMaximize;
            }
            if rise < -self.config.grab_threshold {
                return RecognizedGesture::WindowMinimize;
            }
            return RecognizedGesture::GrabWindow;
        }

        if hand.thumb_index_pinch {
            return RecognizedGesture::DoubleClick;
        }

        if fingers.index() && fingers.middle() && fingers.ring() && !fingers.pinky() && hand.index_middle_pinch
        {
            return RecognizedGesture::RightClick;
        }

        if fingers.index() && fingers.middle() && !fingers.ring() && !fingers.pinky() && hand.index_middle_pinch
        {
            return RecognizedGesture::LeftClick;
        }

        if scroll_pose {
            let y = hand.scroll_center_y;
            let delta = self.last_scroll_y.map(|prev| y - prev);
            self.last_scroll_y = Some(y);
            if let Some(delta) = delta {
                if delta.abs() > self.config.scroll_delta_threshold {
                    return RecognizedGesture::Scroll {
                        direction: if delta > 0.0 {
                            ScrollDirection::Down
                        } else {
                            ScrollDirection::Up
                        },
                    };
                }
            }
            return RecognizedGesture::Idle;
        }

        if fingers.index() && !fingers.middle() && !fingers.ring() && !fingers.pinky() && !fingers.thumb()
        {
            return RecognizedGesture::Move { cursor: hand.pointer };
        }

        RecognizedGesture::Idle
    }
}
