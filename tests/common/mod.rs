//! Deterministic in-process animation engine for integration tests.
//!
//! Payloads are `key=value` pairs separated by `;`:
//!
//! - `frames=N` (required): frame count
//! - `duration=S` (required): total duration in seconds
//! - `size=WxH`: intrinsic size, defaults to `100x100`
//! - `pixel=0xAARRGGBB`: paint every pixel with this word instead of the
//!   default pattern
//!
//! The default pattern paints pixel `(x, y)` of frame `f` as the opaque
//! word `0xFF_ff_xx_yy` (each component truncated to 8 bits), so frame
//! content and crop origin can both be checked from pixel values.

#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use slottie::{AnimationEngine, AnimationHandle};

#[derive(Debug, Default, Clone)]
pub struct TestEngine {
    parsed: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    renders: Arc<AtomicUsize>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles successfully parsed so far.
    pub fn parsed(&self) -> usize {
        self.parsed.load(Ordering::SeqCst)
    }

    /// Handles dropped so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Render calls so far, across all handles.
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl AnimationEngine for TestEngine {
    fn parse(&self, payload: &[u8]) -> Option<Box<dyn AnimationHandle>> {
        let text = std::str::from_utf8(payload).ok()?;
        let mut frame_count = None;
        let mut duration = None;
        let mut size = (100, 100);
        let mut pixel = None;

        for pair in text.split(';').filter(|pair| !pair.trim().is_empty()) {
            let (key, value) = pair.split_once('=')?;
            match key.trim() {
                "frames" => frame_count = Some(value.trim().parse::<usize>().ok()?),
                "duration" => duration = Some(value.trim().parse::<f64>().ok()?),
                "size" => {
                    let (w, h) = value.trim().split_once('x')?;
                    size = (w.parse().ok()?, h.parse().ok()?);
                }
                "pixel" => {
                    let hex = value.trim().trim_start_matches("0x");
                    pixel = Some(u32::from_str_radix(hex, 16).ok()?);
                }
                _ => return None,
            }
        }

        let frame_count = frame_count?;
        let duration = duration?;
        self.parsed.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(TestHandle {
            frame_count,
            duration,
            size,
            pixel,
            released: Arc::clone(&self.released),
            renders: Arc::clone(&self.renders),
        }))
    }
}

struct TestHandle {
    frame_count: usize,
    duration: f64,
    size: (usize, usize),
    pixel: Option<u32>,
    released: Arc<AtomicUsize>,
    renders: Arc<AtomicUsize>,
}

impl AnimationHandle for TestHandle {
    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn duration_seconds(&self) -> f64 {
        self.duration
    }

    fn intrinsic_size(&self) -> (usize, usize) {
        self.size
    }

    fn render(
        &mut self,
        frame_index: usize,
        buffer: &mut [u32],
        width: usize,
        height: usize,
        bytes_per_row: usize,
    ) {
        self.renders.fetch_add(1, Ordering::SeqCst);
        let words_per_row = bytes_per_row / 4;
        for y in 0..height {
            for x in 0..width {
                buffer[y * words_per_row + x] = self.pixel.unwrap_or_else(|| pattern(frame_index, x, y));
            }
        }
    }
}

impl Drop for TestHandle {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// The default pixel word painted at `(x, y)` of `frame_index`.
pub fn pattern(frame_index: usize, x: usize, y: usize) -> u32 {
    0xFF00_0000 | ((frame_index as u32 & 0xFF) << 16) | ((x as u32 & 0xFF) << 8) | (y as u32 & 0xFF)
}

/// Straight RGBA of [`pattern`].
pub fn pattern_rgba(frame_index: usize, x: usize, y: usize) -> [u8; 4] {
    [frame_index as u8, x as u8, y as u8, 0xFF]
}

/// The 10-frame, one-second, 100×100 animation used by most tests.
pub const TEN_FRAMES: &str = "frames=10;duration=1.0;size=100x100";
