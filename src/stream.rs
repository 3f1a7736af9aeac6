//! Async frame streaming.
//!
//! [`FrameStream`] drives a [`FrameExtractor`] on a
//! `tokio::task::spawn_blocking` thread and hands frames back through a
//! bounded channel, so rendering never occupies the async runtime's worker
//! threads.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "rlottie")]
//! # async fn example() -> Result<(), slottie::SlottieError> {
//! use tokio_stream::StreamExt;
//!
//! use slottie::{AnimationSource, ExtractOptions, ExtractionConfig, FrameExtractor, RlottieEngine};
//!
//! let source = AnimationSource::open(&RlottieEngine::new(), "loader.json")?;
//! let extractor = FrameExtractor::new(source, ExtractionConfig::new(256, 256))?;
//! let mut stream = extractor.into_stream(ExtractOptions::new(), Some(300));
//!
//! while let Some(result) = stream.next().await {
//!     let frame = result?;
//!     println!("frame {} at {}", frame.frame_index, frame.presentation_time);
//! }
//! # Ok(())
//! # }
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc::{Receiver, Sender};
use tokio_stream::Stream;

use crate::config::ExtractOptions;
use crate::error::{Result, SlottieError};
use crate::extractor::FrameExtractor;
use crate::frame::AnimationFrame;

/// Bounded-channel capacity. Kept small because frames are large.
const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// A stream of frames rendered on a background thread.
///
/// Dropping the stream closes the channel; the background thread notices
/// at the next frame boundary and stops.
pub struct FrameStream {
    receiver: Receiver<Result<AnimationFrame>>,
}

impl Stream for FrameStream {
    type Item = Result<AnimationFrame>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl FrameExtractor {
    /// Move the extractor onto a blocking thread and stream its frames.
    ///
    /// The stream ends when the sequence is exhausted, after `limit` frames
    /// if one is given, after the first error, or when `options` is
    /// cancelled (yielding [`SlottieError::Cancelled`]). A looping extractor
    /// without a limit streams until the receiver is dropped.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn into_stream(self, options: ExtractOptions, limit: Option<usize>) -> FrameStream {
        let (sender, receiver) = tokio::sync::mpsc::channel(DEFAULT_CHANNEL_CAPACITY);

        tokio::task::spawn_blocking(move || {
            render_blocking(self, &options, limit, &sender);
        });

        FrameStream { receiver }
    }
}

/// Background render loop.
fn render_blocking(
    mut extractor: FrameExtractor,
    options: &ExtractOptions,
    limit: Option<usize>,
    sender: &Sender<Result<AnimationFrame>>,
) {
    let mut produced = 0usize;
    while limit.is_none_or(|limit| produced < limit) {
        if options.is_cancelled() {
            let _ = sender.blocking_send(Err(SlottieError::Cancelled));
            return;
        }

        let result = match extractor.next_frame() {
            Err(SlottieError::NoMoreFramesAvailable) => return,
            result => result,
        };
        let failed = result.is_err();

        // The receiver may have been dropped.
        if sender.blocking_send(result).is_err() || failed {
            return;
        }
        produced += 1;
    }
}
