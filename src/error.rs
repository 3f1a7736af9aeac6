//! Error types for the `slottie` crate.
//!
//! This module defines [`SlottieError`], the unified error type returned by
//! all fallible operations in the crate. Each variant maps to one stage of
//! the extraction pipeline (load, surface allocation, render, sequencing) so
//! callers can react to the failure without parsing messages.

use std::io::Error as IoError;

use image::ImageError;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SlottieError>;

/// The unified error type for all `slottie` operations.
///
/// Every failure is reported to the immediate caller; the crate never
/// retries or swallows one internally.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SlottieError {
    /// The animation payload could not be parsed, or parsed into something
    /// with no usable frames.
    #[error("Failed to load animation: {reason}")]
    AnimationLoad {
        /// Why the load was rejected.
        reason: String,
    },

    /// The render canvas could not be allocated.
    #[error("Failed to initialise renderer for {width}x{height} @ {scale}x: {reason}")]
    RendererInit {
        /// Requested output width, before scaling.
        width: u32,
        /// Requested output height, before scaling.
        height: u32,
        /// Scale that was being resolved.
        scale: f64,
        /// Why the allocation was refused.
        reason: String,
    },

    /// The sequence is exhausted and looping is disabled.
    ///
    /// This is the expected termination signal of a non-looping extractor.
    #[error("No more frames available")]
    NoMoreFramesAvailable,

    /// A frame could not be rendered, snapshotted or cropped.
    #[error("Unable to render frame {frame_index}: {reason}")]
    UnableToRenderFrame {
        /// The animation frame that was being rendered.
        frame_index: usize,
        /// Which step failed.
        reason: String,
    },

    /// A frame index beyond the animation's frame count was requested.
    #[error("Frame {frame_index} is out of range (animation has {frame_count} frames)")]
    FrameOutOfRange {
        /// The frame index that was requested.
        frame_index: usize,
        /// The number of frames in the animation.
        frame_count: usize,
    },

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while saving or converting frames.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    /// GIF encoding failed.
    #[cfg(feature = "gif")]
    #[error("GIF encoding error: {0}")]
    GifEncode(String),
}

impl SlottieError {
    pub(crate) fn load(reason: impl Into<String>) -> Self {
        SlottieError::AnimationLoad {
            reason: reason.into(),
        }
    }

    pub(crate) fn render(frame_index: usize, reason: impl Into<String>) -> Self {
        SlottieError::UnableToRenderFrame {
            frame_index,
            reason: reason.into(),
        }
    }
}
