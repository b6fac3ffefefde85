//! Screen calibration: camera-space → screen-space mapping.
//!
//! Calibration is a one-shot bootstrap. The caller collects correspondence
//! pairs (where the pointer was in camera space when the user confirmed a
//! known screen anchor), then fits a transform that is applied on every
//! subsequent frame until an explicit re-calibration.
//!
//! With four or more non-collinear pairs the fit is a full perspective
//! transform; three pairs degrade to an affine fit and two pairs to a
//! per-axis scale, each with progressively weaker accuracy. The degraded
//! fits are reported explicitly through [`TransformKind`] and a warning.

use crate::constants::{EPSILON, RANK_EPSILON};
use crate::{Error, Result};
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Minimum correspondence pairs for a perspective fit
pub const MIN_PERSPECTIVE_PAIRS: usize = 4;

/// Default calibration anchors in normalized screen coordinates:
/// four corners inset by 10%, visited in order
pub const CORNER_ANCHORS: [CalibrationAnchor; 4] = [
    CalibrationAnchor {
        name: "Top Left",
        screen: (0.1, 0.1),
    },
    CalibrationAnchor {
        name: "Top Right",
        screen: (0.9, 0.1),
    },
    CalibrationAnchor {
        name: "Bottom Right",
        screen: (0.9, 0.9),
    },
    CalibrationAnchor {
        name: "Bottom Left",
        screen: (0.1, 0.9),
    },
];

/// A named target position shown to the user during calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationAnchor {
    pub name: &'static str,
    /// Normalized screen position (0.0 to 1.0 per axis)
    pub screen: (f64, f64),
}

/// One (camera point, screen point) correspondence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrespondencePair {
    /// Normalized camera coordinates of the pointer at confirmation
    pub camera: (f64, f64),
    /// Screen coordinates in pixels
    pub screen: (f64, f64),
}

/// Which model was fit from the available pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// Full 8-parameter homography (≥4 pairs)
    Perspective,
    /// 6-parameter affine fallback (3 pairs)
    Affine,
    /// Per-axis scale and offset fallback (2 pairs)
    Scale,
}

/// Fitted camera→screen mapping. Immutable once fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTransform {
    matrix: [[f64; 3]; 3],
    kind: TransformKind,
}

impl CalibrationTransform {
    /// Fit the best transform the supplied pairs support.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] with fewer than 2 pairs;
    /// [`Error::DegenerateCalibration`] when the pairs are collinear or
    /// coincident (rank-deficient system).
    pub fn fit(pairs: &[CorrespondencePair]) -> Result<Self> {
        match pairs.len() {
            0 | 1 => Err(Error::InvalidInput(format!(
                "calibration requires at least 2 pairs, got {}",
                pairs.len()
            ))),
            2 => Self::fit_scale(pairs),
            3 => Self::fit_affine(pairs),
            _ => Self::fit_perspective(pairs),
        }
    }

    /// Map a normalized camera point to screen pixels
    #[must_use]
    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        let (x, y) = point;
        let m = &self.matrix;
        let sx = m[0][0] * x + m[0][1] * y + m[0][2];
        let sy = m[1][0] * x + m[1][1] * y + m[1][2];
        let w = m[2][0] * x + m[2][1] * y + m[2][2];
        if w.abs() < EPSILON {
            return (sx, sy);
        }
        (sx / w, sy / w)
    }

    #[must_use]
    pub const fn kind(&self) -> TransformKind {
        self.kind
    }

    /// Per-axis scale and offset from exactly two pairs
    fn fit_scale(pairs: &[CorrespondencePair]) -> Result<Self> {
        let [a, b] = [pairs[0], pairs[1]];
        let dx = b.camera.0 - a.camera.0;
        let dy = b.camera.1 - a.camera.1;
        if dx.abs() < EPSILON || dy.abs() < EPSILON {
            return Err(Error::DegenerateCalibration(
                "scale fit needs two points separated on both axes".to_string(),
            ));
        }

        let sx = (b.screen.0 - a.screen.0) / dx;
        let sy = (b.screen.1 - a.screen.1) / dy;
        warn!("Calibration fit from only 2 pairs; scale-only mapping will be inaccurate");
        Ok(Self {
            matrix: [
                [sx, 0.0, sx.mul_add(-a.camera.0, a.screen.0)],
                [0.0, sy, sy.mul_add(-a.camera.1, a.screen.1)],
                [0.0, 0.0, 1.0],
            ],
            kind: TransformKind::Scale,
        })
    }

    /// 6-parameter affine fit from exactly three pairs
    fn fit_affine(pairs: &[CorrespondencePair]) -> Result<Self> {
        let mut rows = Vec::with_capacity(6 * 6);
        let mut rhs = Vec::with_capacity(6);
        for p in pairs {
            let (cx, cy) = p.camera;
            rows.extend_from_slice(&[cx, cy, 1.0, 0.0, 0.0, 0.0]);
            rhs.push(p.screen.0);
            rows.extend_from_slice(&[0.0, 0.0, 0.0, cx, cy, 1.0]);
            rhs.push(p.screen.1);
        }

        let a = DMatrix::from_row_slice(6, 6, &rows);
        let b = DVector::from_vec(rhs);
        let h = solve_full_rank(a, b, 6)?;

        warn!("Calibration fit from only 3 pairs; affine mapping cannot correct perspective");
        Ok(Self {
            matrix: [
                [h[0], h[1], h[2]],
                [h[3], h[4], h[5]],
                [0.0, 0.0, 1.0],
            ],
            kind: TransformKind::Affine,
        })
    }

    /// Homography via direct linear solve; least squares when
    /// more than four pairs are supplied
    fn fit_perspective(pairs: &[CorrespondencePair]) -> Result<Self> {
        let n = pairs.len();
        let mut rows = Vec::with_capacity(2 * n * 8);
        let mut rhs = Vec::with_capacity(2 * n);
        for p in pairs {
            let (cx, cy) = p.camera;
            let (sx, sy) = p.screen;
            rows.extend_from_slice(&[cx, cy, 1.0, 0.0, 0.0, 0.0, -cx * sx, -cy * sx]);
            rhs.push(sx);
            rows.extend_from_slice(&[0.0, 0.0, 0.0, cx, cy, 1.0, -cx * sy, -cy * sy]);
            rhs.push(sy);
        }

        let a = DMatrix::from_row_slice(2 * n, 8, &rows);
        let b = DVector::from_vec(rhs);
        let h = solve_full_rank(a, b, 8)?;

        Ok(Self {
            matrix: [
                [h[0], h[1], h[2]],
                [h[3], h[4], h[5]],
                [h[6], h[7], 1.0],
            ],
            kind: TransformKind::Perspective,
        })
    }
}

/// Least-squares solve that rejects rank-deficient systems
fn solve_full_rank(a: DMatrix<f64>, b: DVector<f64>, required_rank: usize) -> Result<DVector<f64>> {
    let svd = a.svd(true, true);
    let max_sv = svd.singular_values.max();
    let eps = RANK_EPSILON * max_sv.max(1.0);

    let rank = svd.singular_values.iter().filter(|&&sv| sv > eps).count();
    if rank < required_rank {
        return Err(Error::DegenerateCalibration(format!(
            "correspondence points are collinear or coincident (rank {rank} of {required_rank})"
        )));
    }

    let solution = svd
        .solve(&b, eps)
        .map_err(|e| Error::DegenerateCalibration(e.to_string()))?;
    if solution.iter().any(|v| !v.is_finite()) {
        return Err(Error::DegenerateCalibration(
            "solution is not finite".to_string(),
        ));
    }
    Ok(solution.column(0).into_owned())
}

/// Correspondence pairs collected during calibration mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalibrationSet {
    pairs: Vec<CorrespondencePair>,
}

impl CalibrationSet {
    pub fn push(&mut self, pair: CorrespondencePair) {
        self.pairs.push(pair);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn pairs(&self) -> &[CorrespondencePair] {
        &self.pairs
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}

/// Persisted calibration file layout
#[derive(Debug, Serialize, Deserialize)]
struct CalibrationFile {
    version: String,
    screen_resolution: (f64, f64),
    transform: CalibrationTransform,
}

/// Maps the camera-space pointer to screen pixels.
///
/// Two explicit modes: collecting correspondence pairs, and applying a
/// fitted transform. Mapped output is clamped to the screen minus a
/// dead-zone margin so extreme pixels stay reachable and edge noise
/// cannot fling the cursor.
pub struct CalibrationMapper {
    screen: (f64, f64),
    dead_zone: f64,
    set: CalibrationSet,
    transform: Option<CalibrationTransform>,
    collecting: bool,
}

impl CalibrationMapper {
    #[must_use]
    pub fn new(screen_width: f64, screen_height: f64, dead_zone: f64) -> Self {
        Self {
            screen: (screen_width, screen_height),
            dead_zone,
            set: CalibrationSet::default(),
            transform: None,
            collecting: false,
        }
    }

    /// Enter collecting mode, discarding any previously collected pairs.
    /// An already fitted transform keeps applying until the new fit lands.
    pub fn begin_collection(&mut self) {
        self.set.clear();
        self.collecting = true;
        info!("Calibration collection started");
    }

    /// Record one correspondence pair.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidInput`] outside collecting mode.
    pub fn record_pair(&mut self, camera: (f64, f64), screen: (f64, f64)) -> Result<()> {
        if !self.collecting {
            return Err(Error::InvalidInput(
                "not in calibration collecting mode".to_string(),
            ));
        }
        self.set.push(CorrespondencePair { camera, screen });
        info!(
            "Calibration pair {} recorded: camera ({:.3}, {:.3}) -> screen ({:.0}, {:.0})",
            self.set.len(),
            camera.0,
            camera.1,
            screen.0,
            screen.1
        );
        Ok(())
    }

    /// Fit a transform from the collected pairs and leave collecting mode.
    ///
    /// On a degenerate fit the collected pairs are kept and collecting
    /// mode stays active so the caller can supply more points and retry.
    pub fn finish_collection(&mut self) -> Result<CalibrationTransform> {
        let transform = CalibrationTransform::fit(self.set.pairs())?;
        info!(
            "Calibration fit complete: {:?} from {} pairs",
            transform.kind(),
            self.set.len()
        );
        self.transform = Some(transform.clone());
        self.collecting = false;
        self.set.clear();
        Ok(transform)
    }

    /// Abort collecting mode, discarding collected pairs
    pub fn cancel_collection(&mut self) {
        self.set.clear();
        self.collecting = false;
    }

    #[must_use]
    pub fn is_collecting(&self) -> bool {
        self.collecting
    }

    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.transform.is_some()
    }

    #[must_use]
    pub fn collected_pairs(&self) -> usize {
        self.set.len()
    }

    /// Fraction of the default anchor sequence collected so far
    #[must_use]
    pub fn progress(&self) -> f64 {
        (self.set.len() as f64 / CORNER_ANCHORS.len() as f64).min(1.0)
    }

    #[must_use]
    pub fn transform(&self) -> Option<&CalibrationTransform> {
        self.transform.as_ref()
    }

    #[must_use]
    pub const fn screen_bounds(&self) -> (f64, f64) {
        self.screen
    }

    /// Map a camera point through the fitted transform, clamped to the
    /// dead-zone-inset screen bounds.
    ///
    /// # Errors
    ///
    /// [`Error::NotCalibrated`] before a transform was fit; callers fall
    /// back to [`Self::fallback_map`].
    pub fn map(&self, camera: (f64, f64)) -> Result<(f64, f64)> {
        let transform = self.transform.as_ref().ok_or(Error::NotCalibrated)?;
        Ok(self.clamp_to_screen(transform.apply(camera)))
    }

    /// Default linear mapping used before calibration: the central band of
    /// camera space (inset by the dead zone on each edge) maps to the full
    /// screen.
    #[must_use]
    pub fn fallback_map(&self, camera: (f64, f64)) -> (f64, f64) {
        let remap = |v: f64| {
            let clamped = v.clamp(self.dead_zone, 1.0 - self.dead_zone);
            (clamped - self.dead_zone) / (1.0 - 2.0 * self.dead_zone)
        };
        self.clamp_to_screen((remap(camera.0) * self.screen.0, remap(camera.1) * self.screen.1))
    }

    fn clamp_to_screen(&self, point: (f64, f64)) -> (f64, f64) {
        let margin_x = self.dead_zone * self.screen.0;
        let margin_y = self.dead_zone * self.screen.1;
        (
            point.0.clamp(margin_x, self.screen.0 - margin_x),
            point.1.clamp(margin_y, self.screen.1 - margin_y),
        )
    }

    /// Save the fitted transform as JSON.
    ///
    /// # Errors
    ///
    /// Fails if no transform has been fit or the file cannot be written.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let transform = self.transform.as_ref().ok_or(Error::NotCalibrated)?;
        let file = CalibrationFile {
            version: "1.0".to_string(),
            screen_resolution: self.screen,
            transform: transform.clone(),
        };
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::CalibrationStore(format!("Failed to serialize calibration: {e}")))?;
        std::fs::write(path.as_ref(), content)?;
        info!("Calibration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Load a previously saved transform from JSON.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or malformed.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let file: CalibrationFile = serde_json::from_str(&content)
            .map_err(|e| Error::CalibrationStore(format!("Failed to parse calibration: {e}")))?;
        if file.screen_resolution != self.screen {
            warn!(
                "Calibration was saved for a {}x{} screen, current is {}x{}",
                file.screen_resolution.0, file.screen_resolution.1, self.screen.0, self.screen.1
            );
        }
        self.transform = Some(file.transform);
        info!("Calibration loaded from {}", path.as_ref().display());
        Ok(())
    }
}
