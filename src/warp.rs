// Displacement mapper: the per-frame funhouse warp.
//
// Inverse mapping: every output pixel pulls one source pixel. The curve is
// read along a scan axis (rows for 0/180 degrees, columns for 90/270), and the
// horizontal deviation of the curve from its centerline becomes a shift along
// the other axis. All four rotations share one code path; only the
// `ScanTransform` differs.

use rayon::prelude::*;

use crate::curve::CurveData;
use crate::error::Error;
use crate::lookup::SegmentIndex;
use crate::types::FrameBuffer;

/// Direction of the distortion, in 90 degree steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// 0 -> 90 -> 180 -> 270 -> 0
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    pub fn scan(self) -> ScanTransform {
        match self {
            Rotation::Deg0 => ScanTransform { axis: ScanAxis::Rows, flipped: false, sign: -1.0 },
            Rotation::Deg90 => ScanTransform { axis: ScanAxis::Columns, flipped: false, sign: 1.0 },
            Rotation::Deg180 => ScanTransform { axis: ScanAxis::Rows, flipped: true, sign: 1.0 },
            Rotation::Deg270 => ScanTransform { axis: ScanAxis::Columns, flipped: true, sign: -1.0 },
        }
    }
}

/// Which frame coordinate walks along the curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanAxis {
    /// Curve position from `y`, displacement along `x` (scaled by width).
    Rows,
    /// Curve position from `x`, displacement along `y` (scaled by height).
    Columns,
}

/// Axis + direction pair derived once per frame from the rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanTransform {
    pub axis: ScanAxis,
    /// Walk the curve from the far end of the scan axis.
    pub flipped: bool,
    /// Source = target + sign * displacement.
    pub sign: f64,
}

impl ScanTransform {
    /// (scan length, displacement extent) for a frame.
    #[inline]
    fn extents(&self, width: usize, height: usize) -> (usize, usize) {
        match self.axis {
            ScanAxis::Rows => (height, width),
            ScanAxis::Columns => (width, height),
        }
    }
}

/// Pixel displacement for every position along the scan axis.
/// Displacement depends only on the scan coordinate, so the curve is searched
/// once per scan line instead of once per pixel.
pub fn displacement_profile(curve: &CurveData, rotation: Rotation, width: usize, height: usize) -> Vec<f64> {
    let scan = rotation.scan();
    let (len, extent) = scan.extents(width, height);
    let b = &curve.bounds;
    let index = SegmentIndex::new(&curve.line_segments);

    (0..len)
        .map(|p| {
            let q = if scan.flipped { len - 1 - p } else { p };
            let curve_y = b.y_top + (q as f64 / len as f64) * (b.y_bottom - b.y_top);
            // no segment here: no deviation
            let curve_x = index.find(curve_y).map_or(b.x, |s| s.x_at(curve_y));
            let offset = (b.x - curve_x) / b.x;
            offset * extent as f64 * 0.5
        })
        .collect()
}

/// Warp `frame` into a freshly zeroed buffer of the same size.
/// No segments: an exact copy.
pub fn warp(frame: &FrameBuffer, curve: &CurveData, rotation: Rotation) -> Result<FrameBuffer, Error> {
    frame.check_len()?;
    if curve.is_empty() {
        return Ok(frame.clone());
    }
    let mut out = FrameBuffer::new(frame.width, frame.height);
    warp_into(frame, curve, rotation, &mut out)?;
    Ok(out)
}

/// Warp `frame` into `out`, which must have the same shape.
/// Pixels whose source falls outside the frame keep whatever `out` held.
pub fn warp_into(frame: &FrameBuffer, curve: &CurveData, rotation: Rotation, out: &mut FrameBuffer) -> Result<(), Error> {
    frame.check_len()?;
    out.check_len()?;
    if (out.width, out.height) != (frame.width, frame.height) {
        return Err(Error::FrameSize {
            expected: format!("{}x{}", frame.width, frame.height),
            actual: format!("{}x{}", out.width, out.height),
        });
    }
    if curve.is_empty() {
        out.pixels.copy_from_slice(&frame.pixels);
        return Ok(());
    }
    if frame.width == 0 || frame.height == 0 {
        return Ok(());
    }

    let scan = rotation.scan();
    let profile = displacement_profile(curve, rotation, frame.width, frame.height);

    out.pixels.par_chunks_mut(frame.width).enumerate().for_each(|(y, row)| {
        for (x, px) in row.iter_mut().enumerate() {
            let (sx, sy) = match scan.axis {
                ScanAxis::Rows => (x as f64 + scan.sign * profile[y], y as f64),
                ScanAxis::Columns => (x as f64, y as f64 + scan.sign * profile[x]),
            };
            if let Some(idx) = source_index(frame, sx, sy) {
                *px = frame.pixels[idx];
            }
        }
    });
    Ok(())
}

/// Floor to a pixel; NaN/infinite or outside the frame gives `None` (no clamping, no wrapping).
#[inline]
fn source_index(frame: &FrameBuffer, sx: f64, sy: f64) -> Option<usize> {
    if !sx.is_finite() || !sy.is_finite() {
        return None;
    }
    frame.index_of(sx.floor() as i64, sy.floor() as i64)
}
