//! Batch progress and cooperative cancellation.
//!
//! Long-running operations ([`extract_pass`](crate::FrameExtractor::extract_pass),
//! GIF export, parallel extraction) report through a [`ProgressCallback`]
//! and poll a [`CancellationToken`] between frames. A frame that has begun
//! rendering is never interrupted.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use slottie::{CancellationToken, ExtractOptions, ProgressCallback, ProgressInfo};
//!
//! struct StopAtHalf(CancellationToken);
//!
//! impl ProgressCallback for StopAtHalf {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if info.percentage.is_some_and(|pct| pct >= 50.0) {
//!             self.0.cancel();
//!         }
//!     }
//! }
//!
//! let token = CancellationToken::new();
//! let options = ExtractOptions::new()
//!     .with_progress(Arc::new(StopAtHalf(token.clone())))
//!     .with_cancellation(token);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::time::MediaTime;

/// Which batch operation a [`ProgressInfo`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// A pass of [`FrameExtractor`](crate::FrameExtractor) frames.
    FrameExtraction,
    /// Frames rendered across a worker pool.
    ParallelExtraction,
    /// Frames quantized and written to a GIF.
    GifExport,
}

/// Point-in-time view of a running batch.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// The operation being reported on.
    pub operation: OperationType,
    /// Frames completed so far.
    pub current: u64,
    /// Frames the batch will process, when known up front.
    pub total: Option<u64>,
    /// `current / total` as a percentage.
    pub percentage: Option<f32>,
    /// Time since the batch started.
    pub elapsed: Duration,
    /// Remaining time extrapolated from the average rate so far.
    pub estimated_remaining: Option<Duration>,
    /// Index of the animation frame just completed. `None` in the final
    /// report.
    pub current_frame: Option<usize>,
    /// Presentation time of that frame.
    pub current_timestamp: Option<MediaTime>,
}

/// Receives [`ProgressInfo`] updates from batch operations.
///
/// Implementations are shared across threads by parallel extraction, hence
/// the `Send + Sync` bound. To stop a batch, cancel a
/// [`CancellationToken`] from inside the callback.
pub trait ProgressCallback: Send + Sync {
    /// Invoked every `batch_size` frames and once more when the batch ends.
    fn on_progress(&self, info: &ProgressInfo);
}

pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// A shared cancellation flag.
///
/// Cloning yields another handle to the same flag, so one clone can be
/// handed to [`ExtractOptions`](crate::ExtractOptions) and another kept by
/// whoever decides to stop.
///
/// ```
/// use slottie::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the token (and every clone) as cancelled.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](CancellationToken::cancel) has been called on any
    /// clone.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Counts completed frames for one batch and fires the callback.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    completed: u64,
    report_every: u64,
    started: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
        report_every: u64,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            completed: 0,
            report_every: report_every.max(1),
            started: Instant::now(),
        }
    }

    /// Count one finished frame; report on every `report_every`-th.
    pub(crate) fn advance(&mut self, frame_index: Option<usize>, timestamp: Option<MediaTime>) {
        self.completed += 1;
        if self.completed % self.report_every == 0 {
            self.emit(frame_index, timestamp);
        }
    }

    /// Emit the closing report.
    pub(crate) fn finish(&mut self) {
        self.emit(None, None);
    }

    fn emit(&self, frame_index: Option<usize>, timestamp: Option<MediaTime>) {
        let elapsed = self.started.elapsed();
        let completed = self.completed;

        let (percentage, estimated_remaining) = match self.total {
            Some(total) if total > 0 && completed > 0 => {
                let left = total.saturating_sub(completed);
                (
                    Some(completed as f32 * 100.0 / total as f32),
                    Some(elapsed.mul_f64(left as f64 / completed as f64)),
                )
            }
            Some(total) if total > 0 => (Some(0.0), None),
            _ => (None, None),
        };

        self.callback.on_progress(&ProgressInfo {
            operation: self.operation,
            current: completed,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_frame: frame_index,
            current_timestamp: timestamp,
        });
    }
}
