// One error type for the whole crate.
// Every variant states *where* things went wrong.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Creating the window failed.
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed.
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// Opening/starting/stopping the camera failed.
    #[error("camera init error: {0}")]
    CameraInit(String),

    /// Grabbing/decoding a frame failed.
    #[error("camera frame error: {0}")]
    CameraFrame(String),

    /// The curve file could not be read.
    #[error("cannot read curve {}: {source}", path.display())]
    CurveIo { path: PathBuf, source: io::Error },

    /// The curve file is not valid curve JSON.
    #[error("cannot parse curve {}: {source}", path.display())]
    CurveParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Canvas bounds the normalizer and mapper cannot work with.
    #[error("invalid canvas bounds: {0}")]
    InvalidBounds(String),

    /// A frame buffer whose pixel count or shape does not match.
    #[error("frame size mismatch: expected {expected}, got {actual}")]
    FrameSize { expected: String, actual: String },

    /// Handing the parameter set to the external renderer failed.
    #[error("cannot write renderer params {}: {source}", path.display())]
    ParamsWrite { path: PathBuf, source: io::Error },

    /// Saving a PNG snapshot failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] image::ImageError),
}
