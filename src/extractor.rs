//! The frame sequence generator.
//!
//! [`FrameExtractor`] binds one [`AnimationSource`] to one
//! [`ExtractionConfig`] and produces timed frames one call at a time. It is
//! a small state machine: while the cursor is inside the animation every
//! call renders and advances; once it runs off the end the extractor either
//! wraps (looping) or reports exhaustion without changing state.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "rlottie")]
//! # fn example() -> Result<(), slottie::SlottieError> {
//! use slottie::{AnimationSource, ExtractionConfig, FrameExtractor, RlottieEngine, SlottieError};
//!
//! let source = AnimationSource::open(&RlottieEngine::new(), "loader.json")?;
//! let config = ExtractionConfig::new(256, 256).with_looping(false);
//! let mut extractor = FrameExtractor::new(source, config)?;
//!
//! loop {
//!     match extractor.next_frame() {
//!         Ok(frame) => frame.image.save(format!("frame_{:04}.png", frame.frame_index))?,
//!         Err(SlottieError::NoMoreFramesAvailable) => break,
//!         Err(error) => return Err(error),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use crate::{
    animation::AnimationSource,
    config::{ExtractOptions, ExtractionConfig},
    error::{Result, SlottieError},
    frame::AnimationFrame,
    iterator::Frames,
    progress::{OperationType, ProgressTracker},
    surface::RenderSurface,
    time::MediaTime,
};

/// Stateful producer of timed animation frames.
///
/// All mutating operations take `&mut self`, so calls on one extractor are
/// always sequential. Independent extractors share nothing and may run on
/// separate threads.
#[derive(Debug)]
pub struct FrameExtractor {
    source: AnimationSource,
    surface: RenderSurface,
    config: ExtractionConfig,
    next_frame_index: usize,
    /// Frames produced since the start of the sequence, across wraps.
    position: u64,
}

impl FrameExtractor {
    /// Create an extractor, allocating its render surface from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SlottieError::RendererInit`] if the surface cannot be
    /// allocated.
    pub fn new(source: AnimationSource, config: ExtractionConfig) -> Result<Self> {
        let surface = RenderSurface::new(config.output_width, config.output_height, config.scale)?
            .with_pixel_format(config.pixel_format);

        Ok(Self {
            source,
            surface,
            config,
            next_frame_index: 0,
            position: 0,
        })
    }

    /// `true` once a non-looping extractor has produced its last frame.
    ///
    /// Always `false` when looping is allowed.
    pub fn finished(&self) -> bool {
        !self.config.allows_looping && self.next_frame_index >= self.source.frame_count()
    }

    /// Rewind the cursor to frame 0 at time zero.
    ///
    /// The render surface is kept as is.
    pub fn reset(&mut self) {
        self.next_frame_index = 0;
        self.position = 0;
    }

    /// Position the cursor at `frame_index`, as if a fresh pass had already
    /// produced the frames before it.
    ///
    /// # Errors
    ///
    /// Returns [`SlottieError::FrameOutOfRange`] if `frame_index` is not a
    /// frame of the animation. The cursor is unchanged in that case.
    pub fn seek(&mut self, frame_index: usize) -> Result<()> {
        let frame_count = self.source.frame_count();
        if frame_index >= frame_count {
            return Err(SlottieError::FrameOutOfRange {
                frame_index,
                frame_count,
            });
        }

        self.next_frame_index = frame_index;
        self.position = frame_index as u64;
        Ok(())
    }

    /// Render the next frame and advance the cursor.
    ///
    /// # Errors
    ///
    /// - [`SlottieError::NoMoreFramesAvailable`] when the sequence is
    ///   exhausted and looping is disabled. Repeated calls keep returning it.
    /// - [`SlottieError::UnableToRenderFrame`] when rendering fails. The
    ///   cursor is not advanced, so the same frame can be retried.
    pub fn next_frame(&mut self) -> Result<AnimationFrame> {
        let mut frame_index = self.next_frame_index;
        if frame_index >= self.source.frame_count() {
            if !self.config.allows_looping {
                return Err(SlottieError::NoMoreFramesAvailable);
            }
            frame_index = 0;
        }

        let image =
            self.surface
                .render_frame(&mut self.source, frame_index, self.config.visible_rect)?;

        let presentation_time = self.source.presentation_time(self.position);
        let end_time = self.source.presentation_time(self.position + 1);
        let frame = AnimationFrame {
            image,
            presentation_time,
            duration: end_time.saturating_sub(presentation_time),
            frame_index,
        };

        self.next_frame_index = frame_index + 1;
        self.position += 1;

        Ok(frame)
    }

    /// Borrow the extractor as an iterator of frames.
    ///
    /// The iterator ends when the sequence is exhausted, and after yielding
    /// the first error. With looping enabled it never ends on its own.
    pub fn frames(&mut self) -> Frames<'_> {
        Frames::new(self)
    }

    /// Render from the cursor to the end of the current pass.
    ///
    /// If the cursor already sits past the last frame, a looping extractor
    /// renders one full pass and a non-looping one returns an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`SlottieError::Cancelled`] if the options' token is
    /// cancelled, or the first render error. Frames rendered before the
    /// failure are discarded, but the cursor stays after the last one.
    pub fn extract_pass(&mut self, options: &ExtractOptions) -> Result<Vec<AnimationFrame>> {
        let remaining = self.remaining_in_pass();
        log::debug!(
            "Extracting {remaining} frame(s) starting at frame {}",
            self.next_frame_index
        );

        let mut tracker = ProgressTracker::new(
            options.progress.clone(),
            OperationType::FrameExtraction,
            Some(remaining as u64),
            options.batch_size,
        );

        let mut frames = Vec::with_capacity(remaining);
        for _ in 0..remaining {
            if options.is_cancelled() {
                return Err(SlottieError::Cancelled);
            }
            let frame = self.next_frame()?;
            tracker.advance(Some(frame.frame_index), Some(frame.presentation_time));
            frames.push(frame);
        }

        tracker.finish();
        Ok(frames)
    }

    /// Number of frames [`extract_pass`](FrameExtractor::extract_pass)
    /// would render from the current cursor.
    pub fn remaining_in_pass(&self) -> usize {
        let frame_count = self.source.frame_count();
        if self.next_frame_index < frame_count {
            frame_count - self.next_frame_index
        } else if self.config.allows_looping {
            frame_count
        } else {
            0
        }
    }

    /// Index of the animation frame the next call will render, before any
    /// wrap-around.
    pub fn next_frame_index(&self) -> usize {
        self.next_frame_index
    }

    /// Presentation time the next frame will carry.
    pub fn next_presentation_time(&self) -> MediaTime {
        self.source.presentation_time(self.position)
    }

    /// The animation being extracted.
    pub fn source(&self) -> &AnimationSource {
        &self.source
    }

    /// The configuration this extractor was built with.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// The render surface frames are drawn on.
    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    /// Drop the render surface and hand back the animation.
    pub fn into_source(self) -> AnimationSource {
        self.source
    }
}
