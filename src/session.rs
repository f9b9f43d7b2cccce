// Control surface: start, stop, rotate, mode toggle.
// Keyboard handling lives in main; this holds the rules.

use crate::warp::Rotation;

/// How the mirror is rendered this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// 2-D pixel remap of the live frame.
    #[default]
    Direct,
    /// Physical segments handed to the external ray tracer.
    RayTraced,
}

impl RenderMode {
    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Direct => "DIRECT",
            RenderMode::RayTraced => "RAYTRACED",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    capturing: bool,
    rotation: Rotation,
    mode: RenderMode,
}

impl Session {
    pub fn new(rotation: Rotation) -> Self {
        Self { rotation, ..Self::default() }
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Returns false if capture was already running.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.capturing, true)
    }

    /// Returns false if capture was already stopped.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.capturing, false)
    }

    /// Stopped sessions schedule no further ticks.
    pub fn should_tick(&self) -> bool {
        self.capturing
    }

    /// Advance 90 degrees. No-op without a curve or while ray tracing.
    pub fn rotate(&mut self, has_curve: bool) -> bool {
        if !has_curve || self.mode == RenderMode::RayTraced {
            return false;
        }
        self.rotation = self.rotation.next();
        true
    }

    /// Switch Direct <-> RayTraced; only while capturing.
    pub fn toggle_mode(&mut self) -> bool {
        if !self.capturing {
            return false;
        }
        self.mode = match self.mode {
            RenderMode::Direct => RenderMode::RayTraced,
            RenderMode::RayTraced => RenderMode::Direct,
        };
        true
    }
}
