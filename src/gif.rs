//! Animated GIF export.
//!
//! This module provides [`GifOptions`] and the encoding behind
//! [`FrameExtractor::export_gif`](crate::FrameExtractor::export_gif). One
//! pass of the extractor is rendered and each frame is quantized to a
//! 256-colour palette with the `gif` crate's built-in quantizer.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "rlottie")]
//! # fn example() -> Result<(), slottie::SlottieError> {
//! use slottie::{
//!     AnimationSource, ExtractOptions, ExtractionConfig, FrameExtractor, GifOptions,
//!     RlottieEngine,
//! };
//!
//! let source = AnimationSource::open(&RlottieEngine::new(), "loader.json")?;
//! let mut extractor = FrameExtractor::new(source, ExtractionConfig::new(240, 240))?;
//! extractor.export_gif("loader.gif", &GifOptions::new(), &ExtractOptions::new())?;
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use gif::{Encoder, Frame, Repeat};

use crate::config::ExtractOptions;
use crate::error::{Result, SlottieError};
use crate::extractor::FrameExtractor;
use crate::frame::AnimationFrame;
use crate::progress::{OperationType, ProgressTracker};

/// Configuration for animated GIF export.
#[derive(Debug, Clone)]
#[must_use]
pub struct GifOptions {
    /// Fixed delay between frames in hundredths of a second. `None` derives
    /// each delay from the frame's duration.
    pub frame_delay: Option<u16>,
    /// How many times the GIF repeats. `None` loops forever.
    pub repeat: Option<u16>,
    /// Quantizer speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            frame_delay: None,
            repeat: None,
            speed: 10,
        }
    }
}

impl GifOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed delay (in hundredths of a second) for every frame.
    pub fn with_frame_delay(mut self, delay: u16) -> Self {
        self.frame_delay = Some(delay);
        self
    }

    /// Set the repeat count. `None` means loop forever.
    pub fn with_repeat(mut self, repeat: Option<u16>) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the quantizer speed. Clamped to 1–30.
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed.clamp(1, 30);
        self
    }

    fn delay_for(&self, frame: &AnimationFrame) -> u16 {
        self.frame_delay.unwrap_or_else(|| {
            let centiseconds = (frame.duration.as_secs_f64() * 100.0).round();
            centiseconds.clamp(1.0, f64::from(u16::MAX)) as u16
        })
    }
}

impl FrameExtractor {
    /// Render one pass and write it to `path` as an animated GIF.
    ///
    /// If the pass is empty (a non-looping extractor that is already
    /// exhausted), nothing is written and `path` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SlottieError::GifEncode`] if the frames are larger than a
    /// GIF allows or encoding fails, plus any error of
    /// [`extract_pass`](FrameExtractor::extract_pass).
    pub fn export_gif<P: AsRef<Path>>(
        &mut self,
        path: P,
        gif_options: &GifOptions,
        options: &ExtractOptions,
    ) -> Result<()> {
        log::debug!("Exporting GIF to {:?}", path.as_ref());
        let frames = self.extract_pass(options)?;
        if frames.is_empty() {
            return Ok(());
        }

        let file = File::create(path.as_ref())
            .map_err(|e| SlottieError::GifEncode(format!("Failed to create GIF file: {e}")))?;
        encode_gif(file, &frames, gif_options, options)
    }

    /// Render one pass and return it encoded as an animated GIF.
    ///
    /// # Errors
    ///
    /// Same as [`export_gif`](FrameExtractor::export_gif).
    pub fn export_gif_to_memory(
        &mut self,
        gif_options: &GifOptions,
        options: &ExtractOptions,
    ) -> Result<Vec<u8>> {
        let frames = self.extract_pass(options)?;
        let mut buffer = Vec::new();
        encode_gif(&mut buffer, &frames, gif_options, options)?;
        Ok(buffer)
    }
}

fn encode_gif<W: Write>(
    writer: W,
    frames: &[AnimationFrame],
    gif_options: &GifOptions,
    options: &ExtractOptions,
) -> Result<()> {
    log::debug!(
        "Encoding {} frames to GIF (delay={:?}, repeat={:?})",
        frames.len(),
        gif_options.frame_delay,
        gif_options.repeat,
    );
    let Some(first) = frames.first() else {
        return Ok(());
    };

    let (width, height) = first.image.pixel_size();
    let width = u16::try_from(width)
        .map_err(|_| SlottieError::GifEncode(format!("frame width {width} exceeds GIF limit")))?;
    let height = u16::try_from(height)
        .map_err(|_| SlottieError::GifEncode(format!("frame height {height} exceeds GIF limit")))?;

    let mut encoder = Encoder::new(writer, width, height, &[])
        .map_err(|e| SlottieError::GifEncode(format!("Failed to create GIF encoder: {e}")))?;

    let repeat = match gif_options.repeat {
        None => Repeat::Infinite,
        Some(n) => Repeat::Finite(n),
    };
    encoder
        .set_repeat(repeat)
        .map_err(|e| SlottieError::GifEncode(format!("Failed to set GIF repeat: {e}")))?;

    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::GifExport,
        Some(frames.len() as u64),
        options.batch_size,
    );

    for frame in frames {
        if options.is_cancelled() {
            return Err(SlottieError::Cancelled);
        }

        let mut pixels = frame.image.image().to_rgba8().into_raw();
        let mut gif_frame =
            Frame::from_rgba_speed(width, height, &mut pixels, gif_options.speed.clamp(1, 30));
        gif_frame.delay = gif_options.delay_for(frame);

        encoder
            .write_frame(&gif_frame)
            .map_err(|e| SlottieError::GifEncode(format!("Failed to write GIF frame: {e}")))?;
        tracker.advance(Some(frame.frame_index), Some(frame.presentation_time));
    }

    tracker.finish();
    Ok(())
}
