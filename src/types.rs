// Frame buffer shared by the camera, the displacement mapper and the window.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::error::Error;

/// One video frame, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0xAARRGGBB; minifb ignores the alpha byte
}

impl FrameBuffer {
    /// Fully transparent black frame.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Pack an RGB image into opaque ARGB pixels.
    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|&Rgb([r, g, b])| pack_argb(0xFF, r, g, b))
            .collect();
        Self { width: w as usize, height: h as usize, pixels }
    }

    /// Unpack into an RGBA image (for snapshots).
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let px = self.pixels[y as usize * self.width + x as usize];
            Rgba([
                ((px >> 16) & 0xFF) as u8,
                ((px >> 8) & 0xFF) as u8,
                (px & 0xFF) as u8,
                (px >> 24) as u8,
            ])
        })
    }

    /// `pixels` must hold exactly `width * height` entries.
    pub fn check_len(&self) -> Result<(), Error> {
        let expected = self.width * self.height;
        if self.pixels.len() != expected {
            return Err(Error::FrameSize {
                expected: format!("{expected} pixels ({}x{})", self.width, self.height),
                actual: format!("{} pixels", self.pixels.len()),
            });
        }
        Ok(())
    }

    /// Row-major index of `(x, y)`, or `None` outside the frame.
    #[inline]
    pub fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}

#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_image_packs_opaque_argb() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0x12, 0x34, 0x56]));
        img.put_pixel(1, 0, Rgb([0xFF, 0x00, 0x80]));
        let fb = FrameBuffer::from_rgb_image(&img);
        assert_eq!((fb.width, fb.height), (2, 1));
        assert_eq!(fb.pixels, vec![0xFF12_3456, 0xFFFF_0080]);
    }

    #[test]
    fn rgba_image_keeps_all_channels() {
        let fb = FrameBuffer { width: 1, height: 2, pixels: vec![0x8011_2233, 0x0000_0000] };
        let img = fb.to_rgba_image();
        assert_eq!(img.get_pixel(0, 0), &Rgba([0x11, 0x22, 0x33, 0x80]));
        assert_eq!(img.get_pixel(0, 1), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn index_of_rejects_outside() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.index_of(0, 0), Some(0));
        assert_eq!(fb.index_of(3, 2), Some(11));
        assert_eq!(fb.index_of(-1, 0), None);
        assert_eq!(fb.index_of(4, 0), None);
        assert_eq!(fb.index_of(0, 3), None);
    }

    #[test]
    fn check_len_catches_short_buffers() {
        let mut fb = FrameBuffer::new(4, 3);
        assert!(fb.check_len().is_ok());
        fb.pixels.pop();
        assert!(matches!(fb.check_len(), Err(Error::FrameSize { .. })));
    }
}
