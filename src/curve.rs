// Curve data model: what the curve editor hands us, and what the ray tracer gets back.
// Canvas-space types mirror the editor's JSON (camelCase keys).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Canvas extent of the curve.
/// `x` is the pixel column of the undistorted mirror centerline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasBounds {
    pub x: f64,
    pub y_top: f64,
    pub y_bottom: f64,
}

impl CanvasBounds {
    /// Check what `normalize` and `warp` silently assume.
    /// Both still run on bounds that fail this; they just produce non-finite numbers.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.x.is_finite() || self.x == 0.0 {
            return Err(Error::InvalidBounds(format!("centerline x = {} must be finite and non-zero", self.x)));
        }
        if !self.y_top.is_finite() || !self.y_bottom.is_finite() {
            return Err(Error::InvalidBounds(format!(
                "vertical extent [{}, {}] must be finite",
                self.y_top, self.y_bottom
            )));
        }
        if self.y_bottom <= self.y_top {
            return Err(Error::InvalidBounds(format!(
                "yBottom ({}) must be greater than yTop ({})",
                self.y_bottom, self.y_top
            )));
        }
        Ok(())
    }
}

/// One straight piece of the user-drawn curve, in canvas pixels.
/// No ordering between `y1` and `y2` is assumed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineSegment {
    /// Closed vertical interval `[min(y1, y2), max(y1, y2)]`.
    /// A NaN endpoint stays NaN (`f64::min` would drop it), so such a segment contains nothing.
    #[inline]
    pub fn y_interval(&self) -> (f64, f64) {
        if self.y1 <= self.y2 { (self.y1, self.y2) } else { (self.y2, self.y1) }
    }

    #[inline]
    pub fn contains_y(&self, y: f64) -> bool {
        let (lo, hi) = self.y_interval();
        y >= lo && y <= hi
    }

    /// Curve x at height `y`, linear along the segment.
    /// A zero (or NaN) vertical extent uses 1 as denominator, so `t = y - y1`.
    #[inline]
    pub fn x_at(&self, y: f64) -> f64 {
        let dy = self.y2 - self.y1;
        let denom = if dy == 0.0 || dy.is_nan() { 1.0 } else { dy };
        let t = (y - self.y1) / denom;
        self.x1 + t * (self.x2 - self.x1)
    }
}

/// The whole curve as drawn. Empty `lineSegments` means "no distortion".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveData {
    pub bounds: CanvasBounds,
    #[serde(default)]
    pub line_segments: Vec<LineSegment>,
}

impl CurveData {
    pub fn is_empty(&self) -> bool {
        self.line_segments.is_empty()
    }
}

/// Depth profile over one vertical interval in physical units.
/// Quadratic Bezier style: `z0` at `y_min`, `z1` control, `z2` at `y_max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalSegment {
    pub y_min: f64,
    pub y_max: f64,
    pub z0: f64,
    pub z1: f64,
    pub z2: f64,
}

/// Read and parse a curve JSON file.
pub fn load_curve(path: &Path) -> Result<CurveData, Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::CurveIo { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text).map_err(|source| Error::CurveParse { path: path.to_path_buf(), source })
}

/// Reloads a curve file whenever its modification time moves.
pub struct CurveWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl CurveWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), last_modified: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(Some(curve))` the first time and after every change, `Ok(None)` otherwise.
    /// A failed read is retried on the next poll.
    pub fn poll(&mut self) -> Result<Option<CurveData>, Error> {
        let modified = fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(|source| Error::CurveIo { path: self.path.clone(), source })?;
        if self.last_modified == Some(modified) {
            return Ok(None);
        }
        let curve = load_curve(&self.path)?;
        self.last_modified = Some(modified);
        Ok(Some(curve))
    }
}
