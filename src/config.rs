//! Output and batch settings.
//!
//! [`ExtractionConfig`] decides what a
//! [`FrameExtractor`](crate::FrameExtractor) produces: canvas size, scale,
//! looping policy, crop rectangle and pixel format. [`ExtractOptions`]
//! decides how a batch runs: who hears about progress, and which token can
//! stop it.
//!
//! ```
//! use std::sync::Arc;
//!
//! use slottie::{
//!     CancellationToken, CropRect, ExtractOptions, ExtractionConfig, PixelFormat,
//!     ProgressCallback, ProgressInfo,
//! };
//!
//! struct Percent;
//! impl ProgressCallback for Percent {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         eprintln!("{:.0}%", info.percentage.unwrap_or_default());
//!     }
//! }
//!
//! let config = ExtractionConfig::new(512, 512)
//!     .with_scale(2.0)
//!     .with_looping(false)
//!     .with_visible_rect(CropRect::new(0, 0, 512, 512))
//!     .with_pixel_format(PixelFormat::Rgba8Premultiplied);
//!
//! let options = ExtractOptions::new()
//!     .with_progress(Arc::new(Percent))
//!     .with_cancellation(CancellationToken::new())
//!     .with_batch_size(10);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Scale value that asks the render surface to use
/// [`default_display_scale`](crate::default_display_scale).
pub const DISPLAY_SCALE: f64 = 0.0;

/// Output pixel format for extracted frames.
///
/// Controls how the engine's premultiplied ARGB canvas is converted into
/// the [`image::DynamicImage`] carried by each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit RGBA with straight (un-premultiplied) alpha. This is the
    /// default and what image files expect.
    #[default]
    Rgba8,
    /// 8-bit RGBA with the colour channels left premultiplied by alpha.
    Rgba8Premultiplied,
    /// 8-bit RGB, alpha dropped. Equivalent to compositing over black.
    Rgb8,
}

/// A rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CropRect {
    /// Create a rectangle from its origin and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The intersection of two rectangles, or `None` if it is empty.
    pub fn intersect(&self, other: &CropRect) -> Option<CropRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (u64::from(self.x) + u64::from(self.width))
            .min(u64::from(other.x) + u64::from(other.width));
        let bottom = (u64::from(self.y) + u64::from(self.height))
            .min(u64::from(other.y) + u64::from(other.height));

        if right <= u64::from(left) || bottom <= u64::from(top) {
            return None;
        }

        Some(CropRect {
            x: left,
            y: top,
            width: (right - u64::from(left)) as u32,
            height: (bottom - u64::from(top)) as u32,
        })
    }
}

/// Output settings for a [`FrameExtractor`](crate::FrameExtractor).
///
/// Defaults follow the common playback case: scale `1.0`, looping
/// allowed, no crop, straight-alpha RGBA.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ExtractionConfig {
    /// Output width before scaling.
    pub output_width: u32,
    /// Output height before scaling.
    pub output_height: u32,
    /// Pixel density multiplier. [`DISPLAY_SCALE`] (`0.0`) substitutes
    /// the default display scale.
    pub scale: f64,
    /// Whether the frame cursor wraps to 0 after the last frame.
    pub allows_looping: bool,
    /// Canvas sub-region to keep. `None` keeps the whole canvas.
    pub visible_rect: Option<CropRect>,
    /// Pixel format of the produced images.
    pub pixel_format: PixelFormat,
}

impl ExtractionConfig {
    /// Create a configuration for the given output size with default
    /// settings.
    pub fn new(output_width: u32, output_height: u32) -> Self {
        Self {
            output_width,
            output_height,
            scale: 1.0,
            allows_looping: true,
            visible_rect: None,
            pixel_format: PixelFormat::default(),
        }
    }

    /// Set the pixel density multiplier.
    ///
    /// Pass [`DISPLAY_SCALE`] to use the default display scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Control whether the sequence wraps around after the last frame.
    pub fn with_looping(mut self, allows_looping: bool) -> Self {
        self.allows_looping = allows_looping;
        self
    }

    /// Crop every frame to `rect` (canvas pixel coordinates).
    pub fn with_visible_rect(mut self, rect: CropRect) -> Self {
        self.visible_rect = Some(rect);
        self
    }

    /// Set the output pixel format.
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }
}

/// Progress and cancellation hooks for batch operations.
///
/// The default reports to nobody, cannot be cancelled and would report
/// after every frame if a callback were attached.
#[derive(Clone)]
#[must_use]
pub struct ExtractOptions {
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) cancellation: Option<CancellationToken>,
    /// Frames between progress reports.
    pub(crate) batch_size: u64,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }
}

impl ExtractOptions {
    /// Options with no callback and no token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report progress to `callback`.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Stop the batch before the next frame once `token` is cancelled.
    ///
    /// The batch then fails with
    /// [`SlottieError::Cancelled`](crate::SlottieError::Cancelled).
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Report every `frames` frames instead of every frame. `0` is treated
    /// as `1`.
    pub fn with_batch_size(mut self, frames: u64) -> Self {
        self.batch_size = frames.max(1);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        matches!(&self.cancellation, Some(token) if token.is_cancelled())
    }
}
