//! The seam between the extraction pipeline and an animation engine.
//!
//! An [`AnimationEngine`] turns an opaque payload (Lottie JSON, usually)
//! into an [`AnimationHandle`]. The handle answers metadata queries and
//! rasterizes one frame at a time into a buffer owned by the caller.
//!
//! The buffer contract is fixed: one `u32` per pixel holding a
//! premultiplied ARGB word (`a << 24 | r << 16 | g << 8 | b`), rows packed
//! at `bytes_per_row` bytes. On little-endian hosts that is B,G,R,A byte
//! order in memory, which is what rlottie writes.
//!
//! With the `rlottie` feature enabled, [`RlottieEngine`](crate::RlottieEngine)
//! implements this trait over the rlottie C library. Other engines, or test
//! doubles, can be plugged in by implementing the two traits below.

/// A parsed animation owned by exactly one [`AnimationSource`](crate::AnimationSource).
///
/// The handle is released by its `Drop` implementation, which runs exactly
/// once when the owning source is dropped (or when a freshly parsed handle
/// is rejected during source construction).
pub trait AnimationHandle: Send {
    /// Total number of frames.
    fn frame_count(&self) -> usize;

    /// Total playback duration in seconds.
    fn duration_seconds(&self) -> f64;

    /// Nominal frame rate in frames per second.
    fn frame_rate(&self) -> f64 {
        self.frame_count() as f64 / self.duration_seconds()
    }

    /// Intrinsic `(width, height)` of the animation in pixels.
    fn intrinsic_size(&self) -> (usize, usize);

    /// Rasterize `frame_index` into `buffer`, overwriting all of it.
    ///
    /// `buffer` holds at least `height * bytes_per_row / 4` words. The call
    /// blocks until the frame is complete.
    fn render(
        &mut self,
        frame_index: usize,
        buffer: &mut [u32],
        width: usize,
        height: usize,
        bytes_per_row: usize,
    );
}

/// Parses animation payloads into [`AnimationHandle`]s.
pub trait AnimationEngine: Send + Sync {
    /// Parse `payload`, returning `None` if the engine rejects it.
    fn parse(&self, payload: &[u8]) -> Option<Box<dyn AnimationHandle>>;
}
