//! Lazy, pull-based frame iterator.
//!
//! [`Frames`] implements [`Iterator`] over a borrowed
//! [`FrameExtractor`](crate::FrameExtractor): each call to
//! [`next()`](Iterator::next) renders exactly one frame. Nothing is buffered.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "rlottie")]
//! # fn example() -> Result<(), slottie::SlottieError> {
//! use slottie::{AnimationSource, ExtractionConfig, FrameExtractor, RlottieEngine};
//!
//! let source = AnimationSource::open(&RlottieEngine::new(), "loader.json")?;
//! let mut extractor = FrameExtractor::new(source, ExtractionConfig::new(128, 128))?;
//!
//! // Looping is on by default, so bound the sequence explicitly.
//! for result in extractor.frames().take(120) {
//!     let frame = result?;
//!     println!("frame {} at {}", frame.frame_index, frame.presentation_time);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SlottieError};
use crate::extractor::FrameExtractor;
use crate::frame::AnimationFrame;

/// An iterator over the frames of a [`FrameExtractor`].
///
/// Created via [`FrameExtractor::frames`]. Dropping it releases the borrow
/// and leaves the extractor's cursor after the last yielded frame.
pub struct Frames<'a> {
    extractor: &'a mut FrameExtractor,
    done: bool,
}

impl<'a> Frames<'a> {
    pub(crate) fn new(extractor: &'a mut FrameExtractor) -> Self {
        Self {
            extractor,
            done: false,
        }
    }
}

impl Iterator for Frames<'_> {
    type Item = Result<AnimationFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.extractor.next_frame() {
            Ok(frame) => Some(Ok(frame)),
            Err(SlottieError::NoMoreFramesAvailable) => {
                self.done = true;
                None
            }
            // The cursor has not moved; retrying would fail the same way.
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        if self.extractor.config().allows_looping {
            (usize::MAX, None)
        } else {
            (0, Some(self.extractor.remaining_in_pass()))
        }
    }
}
