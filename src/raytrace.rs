// Ray-traced mode hand-off. The renderer itself is external; it receives one
// parameter set (fixed scene configuration + physical segments) per curve change.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::curve::{CurveData, PhysicalSegment};
use crate::error::Error;
use crate::normalize::normalize;

/// Fixed scene configuration for the renderer, in physical units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub mirror_distance: f64,
    pub mirror_half_width: f64,
    pub mirror_half_height: f64,
    pub image_plane_distance: f64,
    pub fov_degrees: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mirror_distance: 2.0,
            mirror_half_width: 0.3,
            mirror_half_height: 0.4,
            image_plane_distance: 1.0,
            fov_degrees: 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RayTraceParams {
    #[serde(flatten)]
    pub config: RenderConfig,
    pub segments: Vec<PhysicalSegment>,
}

impl RayTraceParams {
    pub fn from_curve(curve: Option<&CurveData>, config: RenderConfig) -> Self {
        Self { config, segments: normalize(curve) }
    }
}

/// Consumer of physical-space mirror descriptions.
pub trait SurfaceRenderer {
    fn submit(&mut self, params: &RayTraceParams) -> Result<(), Error>;
}

/// Hands each parameter set over as a JSON file the renderer picks up.
pub struct ParamsFileRenderer {
    path: PathBuf,
    submitted: usize,
}

impl ParamsFileRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), submitted: 0 }
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }
}

impl SurfaceRenderer for ParamsFileRenderer {
    fn submit(&mut self, params: &RayTraceParams) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(params).map_err(|e| Error::ParamsWrite {
            path: self.path.clone(),
            source: e.into(),
        })?;
        fs::write(&self.path, json).map_err(|source| Error::ParamsWrite { path: self.path.clone(), source })?;
        self.submitted += 1;
        log::info!("submitted {} mirror segment(s) to {}", params.segments.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CanvasBounds, LineSegment};
    use crate::normalize::FLAT_MIRROR;

    #[test]
    fn no_curve_sends_flat_mirror() {
        let params = RayTraceParams::from_curve(None, RenderConfig::default());
        assert_eq!(params.segments, vec![FLAT_MIRROR]);
    }

    #[test]
    fn params_file_is_flat_camel_case_json() {
        let curve = CurveData {
            bounds: CanvasBounds { x: 400.0, y_top: 50.0, y_bottom: 550.0 },
            line_segments: vec![LineSegment { x1: 400.0, y1: 50.0, x2: 300.0, y2: 550.0 }],
        };
        let params = RayTraceParams::from_curve(Some(&curve), RenderConfig::default());

        let path = std::env::temp_dir().join(format!("funhouse-{}-params.json", std::process::id()));
        let mut renderer = ParamsFileRenderer::new(&path);
        renderer.submit(&params).unwrap();
        assert_eq!(renderer.submitted(), 1);

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(written["fovDegrees"], 60.0);
        assert_eq!(written["mirrorHalfHeight"], 0.4);
        assert_eq!(written["segments"][0]["yMin"], -2.0);
        assert_eq!(written["segments"][0]["z1"], -0.125);
        assert_eq!(written["segments"][0]["z2"], -0.25);
    }

    #[test]
    fn unwritable_path_is_reported() {
        let mut renderer = ParamsFileRenderer::new(std::env::temp_dir().join("no-such-dir-funhouse").join("p.json"));
        let params = RayTraceParams::from_curve(None, RenderConfig::default());
        assert!(matches!(renderer.submit(&params), Err(Error::ParamsWrite { .. })));
        assert_eq!(renderer.submitted(), 0);
    }
}
