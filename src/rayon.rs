//! Parallel frame extraction.
//!
//! [`extract_frames_parallel`] splits one pass of an animation into
//! contiguous chunks and renders each chunk on a [`rayon`] worker. Every
//! worker parses its own [`AnimationSource`] and owns its own
//! [`FrameExtractor`], so no handle or canvas is shared between threads.

use ::rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    animation::AnimationSource,
    config::{ExtractOptions, ExtractionConfig},
    engine::AnimationEngine,
    error::{Result, SlottieError},
    extractor::FrameExtractor,
    frame::AnimationFrame,
    progress::{OperationType, ProgressTracker},
};

/// Render every frame of `payload` in parallel.
///
/// The result is in frame order and carries the same presentation times a
/// sequential pass from frame 0 would produce. Looping in `config` is
/// irrelevant: exactly one pass is rendered.
///
/// # Errors
///
/// Returns the load or allocation error of the first failing worker, the
/// first render error, or [`SlottieError::Cancelled`].
pub fn extract_frames_parallel(
    engine: &dyn AnimationEngine,
    payload: &[u8],
    config: &ExtractionConfig,
    options: &ExtractOptions,
) -> Result<Vec<AnimationFrame>> {
    let frame_count = AnimationSource::from_bytes(engine, payload)?.frame_count();
    let chunks = split_into_chunks(frame_count, ::rayon::current_num_threads());
    log::debug!(
        "Rendering {frame_count} frames in {} parallel chunk(s)",
        chunks.len()
    );

    let results: Result<Vec<Vec<AnimationFrame>>> = chunks
        .into_par_iter()
        .map(|(start, end)| {
            if options.is_cancelled() {
                return Err(SlottieError::Cancelled);
            }
            render_chunk(engine, payload, config, start, end, options)
        })
        .collect();

    let frames: Vec<AnimationFrame> = results?.into_iter().flatten().collect();

    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::ParallelExtraction,
        Some(frame_count as u64),
        options.batch_size,
    );
    for frame in &frames {
        tracker.advance(Some(frame.frame_index), Some(frame.presentation_time));
    }
    tracker.finish();

    Ok(frames)
}

/// Split `0..frame_count` into at most `workers` contiguous `(start, end)`
/// ranges of near-equal length.
fn split_into_chunks(frame_count: usize, workers: usize) -> Vec<(usize, usize)> {
    let workers = workers.clamp(1, frame_count.max(1));
    let base = frame_count / workers;
    let extra = frame_count % workers;

    let mut chunks = Vec::with_capacity(workers);
    let mut start = 0;
    for worker in 0..workers {
        let len = base + usize::from(worker < extra);
        if len == 0 {
            continue;
        }
        chunks.push((start, start + len));
        start += len;
    }
    chunks
}

/// Render frames `start..end` with a private source and extractor.
fn render_chunk(
    engine: &dyn AnimationEngine,
    payload: &[u8],
    config: &ExtractionConfig,
    start: usize,
    end: usize,
    options: &ExtractOptions,
) -> Result<Vec<AnimationFrame>> {
    let source = AnimationSource::from_bytes(engine, payload)?;
    let mut extractor = FrameExtractor::new(source, config.clone())?;
    extractor.seek(start)?;

    let mut frames = Vec::with_capacity(end - start);
    for _ in start..end {
        if options.is_cancelled() {
            return Err(SlottieError::Cancelled);
        }
        frames.push(extractor.next_frame()?);
    }
    Ok(frames)
}
