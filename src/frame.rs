//! Output values produced by a [`FrameExtractor`](crate::FrameExtractor).

use std::path::Path;

use image::DynamicImage;

use crate::error::Result;
use crate::time::MediaTime;

/// A rendered bitmap tagged with the pixel density it was rendered at.
///
/// The pixel data is an independent copy; later renders on the same
/// surface never change it.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameImage {
    image: DynamicImage,
    scale: f64,
}

impl FrameImage {
    pub(crate) fn new(image: DynamicImage, scale: f64) -> Self {
        Self { image, scale }
    }

    /// The pixel data.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the wrapper and return the pixel data.
    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Pixels per logical point.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Size in logical points (pixel size divided by scale).
    pub fn logical_size(&self) -> (f64, f64) {
        (
            f64::from(self.image.width()) / self.scale,
            f64::from(self.image.height()) / self.scale,
        )
    }

    /// Save the image; the format is inferred from the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

/// One timed frame of the extracted sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    /// The rendered (and possibly cropped) image.
    pub image: FrameImage,
    /// When this frame starts displaying, measured from sequence start.
    pub presentation_time: MediaTime,
    /// How long this frame displays.
    pub duration: MediaTime,
    /// The animation frame that was rendered.
    pub frame_index: usize,
}

impl AnimationFrame {
    /// When the next frame starts displaying.
    pub fn end_time(&self) -> MediaTime {
        self.presentation_time + self.duration
    }
}
