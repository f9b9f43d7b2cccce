// Opens a camera and converts frames into a buffer the warp and the window understand.
// The device is opened once; the stream is started and stopped by the session.

use crate::error::Error;
use crate::types::FrameBuffer;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::RgbImage;

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution. Nothing streams yet.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let cam = Camera::new(idx, req).map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        // The device might settle on a slightly different resolution.
        let actual = cam.resolution();
        log::info!("camera {index} opened at {}x{}", actual.width(), actual.height());

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    pub fn start(&mut self) -> Result<(), Error> {
        self.cam
            .open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))
    }

    pub fn stop(&mut self) -> Result<(), Error> {
        self.cam
            .stop_stream()
            .map_err(|e| Error::CameraInit(format!("Stop stream: {e}")))
    }

    /// Grab one frame (blocks until the camera delivers) as opaque ARGB pixels.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb_img: RgbImage = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        Ok(FrameBuffer::from_rgb_image(&rgb_img))
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
