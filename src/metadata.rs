//! Animation metadata.
//!
//! [`AnimationMetadata`] is read from the engine once, when an
//! [`AnimationSource`](crate::AnimationSource) is created, and never changes
//! afterwards.

use crate::time::MediaTime;

/// Timing and geometry of a loaded animation.
///
/// # Example
///
/// ```no_run
/// # #[cfg(feature = "rlottie")]
/// # fn example() -> Result<(), slottie::SlottieError> {
/// use slottie::{AnimationSource, RlottieEngine};
///
/// let source = AnimationSource::open(&RlottieEngine::new(), "loader.json")?;
/// let metadata = source.metadata();
/// println!("{} frames over {}", metadata.frame_count, metadata.total_duration);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct AnimationMetadata {
    /// Number of frames. Always greater than zero.
    pub frame_count: usize,
    /// Total duration in seconds, as reported by the engine.
    pub duration_seconds: f64,
    /// Total duration rounded to the media timescale.
    pub total_duration: MediaTime,
    /// Display time of a single frame, rounded to the media timescale.
    pub frame_duration: MediaTime,
    /// Nominal frames per second.
    pub frame_rate: f64,
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
}
