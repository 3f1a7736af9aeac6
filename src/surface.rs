//! The reusable render canvas.
//!
//! A [`RenderSurface`] owns one pixel buffer sized to the output resolution
//! times the resolved scale. Every render overwrites that buffer in place;
//! the snapshot step always copies it out into a fresh image so returned
//! frames never alias the canvas.

use std::env;

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::{
    animation::AnimationSource,
    config::{CropRect, PixelFormat},
    error::{Result, SlottieError},
    frame::FrameImage,
};

/// Environment variable that overrides [`default_display_scale`].
pub const DISPLAY_SCALE_ENV: &str = "SLOTTIE_DISPLAY_SCALE";

const BYTES_PER_PIXEL: usize = 4;

/// The scale substituted when a configuration asks for scale `0.0`.
///
/// There is no display to query in a library context, so this is `1.0`
/// unless `SLOTTIE_DISPLAY_SCALE` holds a positive finite number.
pub fn default_display_scale() -> f64 {
    env::var(DISPLAY_SCALE_ENV)
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|&scale| scale.is_finite() && scale > 0.0)
        .unwrap_or(1.0)
}

/// A fixed-size canvas that renders animation frames into images.
#[derive(Debug)]
pub struct RenderSurface {
    buffer: Vec<u32>,
    width: u32,
    height: u32,
    scale: f64,
    pixel_format: PixelFormat,
}

impl RenderSurface {
    /// Allocate a canvas of `output_width * scale` by `output_height * scale`
    /// pixels.
    ///
    /// A `scale` of `0.0` resolves to [`default_display_scale`].
    ///
    /// # Errors
    ///
    /// Returns [`SlottieError::RendererInit`] if the scale is negative or not
    /// finite, if either resolved dimension is zero or too large, or if the
    /// allocator refuses the buffer.
    pub fn new(output_width: u32, output_height: u32, scale: f64) -> Result<Self> {
        let init_error = |reason: String| SlottieError::RendererInit {
            width: output_width,
            height: output_height,
            scale,
            reason,
        };

        let effective_scale = if scale == 0.0 {
            default_display_scale()
        } else {
            scale
        };
        if !effective_scale.is_finite() || effective_scale < 0.0 {
            return Err(init_error(format!("invalid scale {effective_scale}")));
        }

        let width = scaled_dimension(output_width, effective_scale)
            .ok_or_else(|| init_error("canvas width out of range".to_string()))?;
        let height = scaled_dimension(output_height, effective_scale)
            .ok_or_else(|| init_error("canvas height out of range".to_string()))?;
        if width == 0 || height == 0 {
            return Err(init_error(format!("canvas would be {width}x{height}")));
        }

        let pixel_count = (width as usize)
            .checked_mul(height as usize)
            .filter(|count| count.checked_mul(BYTES_PER_PIXEL).is_some())
            .ok_or_else(|| init_error(format!("{width}x{height} canvas overflows")))?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(pixel_count)
            .map_err(|error| init_error(error.to_string()))?;
        buffer.resize(pixel_count, 0);

        log::debug!(
            "Allocated {width}x{height} render surface (scale {effective_scale}, {} bytes)",
            pixel_count * BYTES_PER_PIXEL,
        );

        Ok(Self {
            buffer,
            width,
            height,
            scale: effective_scale,
            pixel_format: PixelFormat::default(),
        })
    }

    /// Choose the pixel format snapshots are converted to.
    #[must_use]
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    /// Canvas width in pixels.
    pub fn canvas_width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn canvas_height(&self) -> u32 {
        self.height
    }

    /// The resolved scale. Never zero.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Row stride of the canvas in bytes.
    pub fn bytes_per_row(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Pixel format of produced images.
    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// The rectangle covering the whole canvas.
    pub fn full_rect(&self) -> CropRect {
        CropRect::new(0, 0, self.width, self.height)
    }

    /// Render `frame_index` of `source` and return an independent image.
    ///
    /// When `visible_rect` is given and differs from
    /// [`full_rect`](RenderSurface::full_rect), the image is cropped to the
    /// part of the rectangle that lies on the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`SlottieError::UnableToRenderFrame`] if the index is out of
    /// range, the snapshot cannot be built, or the crop rectangle misses
    /// the canvas entirely.
    pub fn render_frame(
        &mut self,
        source: &mut AnimationSource,
        frame_index: usize,
        visible_rect: Option<CropRect>,
    ) -> Result<FrameImage> {
        if frame_index >= source.frame_count() {
            return Err(SlottieError::render(
                frame_index,
                format!("animation has {} frames", source.frame_count()),
            ));
        }

        let bytes_per_row = self.bytes_per_row();
        source.render_into(
            frame_index,
            &mut self.buffer,
            self.width as usize,
            self.height as usize,
            bytes_per_row,
        );

        let snapshot = self
            .snapshot()
            .ok_or_else(|| SlottieError::render(frame_index, "canvas snapshot failed"))?;

        let image = match visible_rect {
            Some(rect) if rect != self.full_rect() => {
                let bounded = rect.intersect(&self.full_rect()).ok_or_else(|| {
                    SlottieError::render(
                        frame_index,
                        format!(
                            "crop rectangle {rect:?} lies outside the {}x{} canvas",
                            self.width, self.height
                        ),
                    )
                })?;
                snapshot.crop_imm(bounded.x, bounded.y, bounded.width, bounded.height)
            }
            _ => snapshot,
        };

        Ok(FrameImage::new(image, self.scale))
    }

    /// Copy the canvas into a freshly allocated image.
    fn snapshot(&self) -> Option<DynamicImage> {
        let pixels = self.buffer.iter().copied().map(unpack_argb);
        match self.pixel_format {
            PixelFormat::Rgba8 => {
                let raw = pixels.flat_map(unpremultiply).collect();
                RgbaImage::from_raw(self.width, self.height, raw).map(DynamicImage::ImageRgba8)
            }
            PixelFormat::Rgba8Premultiplied => {
                let raw = pixels.flat_map(|[a, r, g, b]| [r, g, b, a]).collect();
                RgbaImage::from_raw(self.width, self.height, raw).map(DynamicImage::ImageRgba8)
            }
            PixelFormat::Rgb8 => {
                let raw = pixels.flat_map(|[_, r, g, b]| [r, g, b]).collect();
                RgbImage::from_raw(self.width, self.height, raw).map(DynamicImage::ImageRgb8)
            }
        }
    }
}

fn scaled_dimension(dimension: u32, scale: f64) -> Option<u32> {
    let scaled = (f64::from(dimension) * scale).floor();
    if scaled > f64::from(u32::MAX) {
        return None;
    }
    Some(scaled as u32)
}

/// Split a native ARGB word into `[a, r, g, b]`.
fn unpack_argb(word: u32) -> [u8; 4] {
    word.to_be_bytes()
}

/// Convert a premultiplied `[a, r, g, b]` pixel into straight RGBA.
fn unpremultiply([a, r, g, b]: [u8; 4]) -> [u8; 4] {
    match a {
        0 => [0, 0, 0, 0],
        255 => [r, g, b, a],
        _ => {
            let alpha = u32::from(a);
            let channel = |c: u8| ((u32::from(c) * 255 + alpha / 2) / alpha).min(255) as u8;
            [channel(r), channel(g), channel(b), a]
        }
    }
}
