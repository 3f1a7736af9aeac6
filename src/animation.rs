//! Loaded animations.
//!
//! [`AnimationSource`] owns the engine handle for one parsed animation and
//! caches its [`AnimationMetadata`]. It is the input to a
//! [`FrameExtractor`](crate::FrameExtractor).

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    fs,
    path::Path,
};

use crate::{
    engine::{AnimationEngine, AnimationHandle},
    error::{Result, SlottieError},
    metadata::AnimationMetadata,
    time::MediaTime,
};

/// A parsed animation and its cached metadata.
///
/// The underlying handle is owned exclusively and released exactly once,
/// when the source is dropped.
pub struct AnimationSource {
    handle: Box<dyn AnimationHandle>,
    metadata: AnimationMetadata,
}

impl Debug for AnimationSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AnimationSource")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl AnimationSource {
    /// Parse an animation from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SlottieError::AnimationLoad`] if the engine rejects the
    /// payload or the parsed animation has no frames.
    pub fn from_bytes(engine: &dyn AnimationEngine, bytes: &[u8]) -> Result<Self> {
        log::debug!("Parsing animation payload ({} bytes)", bytes.len());
        let handle = engine
            .parse(bytes)
            .ok_or_else(|| SlottieError::load("engine rejected the animation payload"))?;
        Self::from_handle(handle)
    }

    /// Parse an animation from its textual (JSON) form.
    ///
    /// # Errors
    ///
    /// Same as [`from_bytes`](AnimationSource::from_bytes).
    pub fn from_text(engine: &dyn AnimationEngine, text: &str) -> Result<Self> {
        Self::from_bytes(engine, text.as_bytes())
    }

    /// Read and parse an animation file.
    ///
    /// # Errors
    ///
    /// Returns [`SlottieError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`from_bytes`](AnimationSource::from_bytes).
    pub fn open<P: AsRef<Path>>(engine: &dyn AnimationEngine, path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening animation file: {}", path.display());
        let bytes = fs::read(path)?;
        Self::from_bytes(engine, &bytes)
    }

    /// Wrap an already parsed handle, validating and caching its metadata.
    ///
    /// A rejected handle is dropped (and therefore released) before the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SlottieError::AnimationLoad`] if the handle reports zero
    /// frames or a duration that is not a positive finite number.
    pub fn from_handle(handle: Box<dyn AnimationHandle>) -> Result<Self> {
        let frame_count = handle.frame_count();
        if frame_count == 0 {
            return Err(SlottieError::load("animation has no frames"));
        }

        let duration_seconds = handle.duration_seconds();
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(SlottieError::load(format!(
                "animation duration must be positive, got {duration_seconds}"
            )));
        }

        let frame_rate = handle.frame_rate();
        let (width, height) = handle.intrinsic_size();
        let metadata = AnimationMetadata {
            frame_count,
            duration_seconds,
            total_duration: MediaTime::from_seconds(duration_seconds),
            frame_duration: MediaTime::from_seconds(duration_seconds / frame_count as f64),
            frame_rate,
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
        };

        log::debug!(
            "Loaded animation: {} frames, {:.3}s, {}x{}",
            metadata.frame_count,
            metadata.duration_seconds,
            metadata.width,
            metadata.height,
        );

        Ok(Self { handle, metadata })
    }

    /// Cached metadata for this animation.
    pub fn metadata(&self) -> &AnimationMetadata {
        &self.metadata
    }

    /// Number of frames. Always greater than zero.
    pub fn frame_count(&self) -> usize {
        self.metadata.frame_count
    }

    /// Total duration, rounded to the media timescale.
    pub fn total_duration(&self) -> MediaTime {
        self.metadata.total_duration
    }

    /// Nominal display time of one frame, rounded to the media timescale.
    ///
    /// Individual frames may be a tick longer or shorter than this; see
    /// [`presentation_time`](AnimationSource::presentation_time).
    pub fn frame_duration(&self) -> MediaTime {
        self.metadata.frame_duration
    }

    /// Start time of the frame at `position` in an unbounded sequence that
    /// begins at frame 0 and wraps after the last frame.
    ///
    /// The value is the exact time `position * duration / frame_count`
    /// rounded to the nearest tick, so it never drifts from the ideal
    /// timeline by more than half a tick and a full pass always spans
    /// [`total_duration`](AnimationSource::total_duration).
    pub fn presentation_time(&self, position: u64) -> MediaTime {
        let metadata = &self.metadata;
        MediaTime::from_seconds(
            position as f64 * metadata.duration_seconds / metadata.frame_count as f64,
        )
    }

    /// Nominal frames per second.
    pub fn frame_rate(&self) -> f64 {
        self.metadata.frame_rate
    }

    /// Intrinsic `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.metadata.width, self.metadata.height)
    }

    pub(crate) fn render_into(
        &mut self,
        frame_index: usize,
        buffer: &mut [u32],
        width: usize,
        height: usize,
        bytes_per_row: usize,
    ) {
        log::trace!("Rendering frame {frame_index} into {width}x{height} canvas");
        self.handle
            .render(frame_index, buffer, width, height, bytes_per_row);
    }
}
