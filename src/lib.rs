//! Funhouse mirror: warps a live camera feed along a user-drawn curve.
//!
//! Two renderings share one curve model ([`curve::CurveData`]):
//! * **direct** – [`warp::warp`] remaps pixels of every frame;
//! * **ray-traced** – [`normalize::normalize`] turns the curve into a
//!   physical depth profile for an external renderer ([`raytrace`]).

pub mod camera;
pub mod curve;
pub mod draw;
pub mod error;
pub mod lookup;
pub mod normalize;
pub mod raytrace;
pub mod session;
pub mod types;
pub mod warp;

pub use curve::{CanvasBounds, CurveData, LineSegment, PhysicalSegment};
pub use error::Error;
pub use normalize::normalize;
pub use types::FrameBuffer;
pub use warp::{Rotation, warp, warp_into};
