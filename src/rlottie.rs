//! rlottie animation engine.
//!
//! Bindings over the rlottie C API via `rlottie-sys`. rlottie renders
//! premultiplied ARGB32 words, which is exactly the canvas format this crate
//! uses, so frames are rasterized straight into the surface buffer.
//!
//! rlottie keeps a process-wide model cache keyed by the cache key passed to
//! `lottie_animation_from_data`. This engine disables it once, on first use,
//! so every parse yields an independent model.

use std::{
    ffi::CString,
    path::{Path, PathBuf},
    ptr::NonNull,
    sync::Once,
};

use rlottie_sys::{
    Lottie_Animation, lottie_animation_destroy, lottie_animation_from_data,
    lottie_animation_get_duration, lottie_animation_get_framerate, lottie_animation_get_size,
    lottie_animation_get_totalframe, lottie_animation_render, lottie_configure_model_cache_size,
};

use crate::engine::{AnimationEngine, AnimationHandle};

static DISABLE_MODEL_CACHE: Once = Once::new();

/// [`AnimationEngine`] backed by rlottie.
///
/// # Example
///
/// ```no_run
/// use slottie::{AnimationSource, RlottieEngine};
///
/// let engine = RlottieEngine::new().with_resource_dir("assets/images");
/// let source = AnimationSource::open(&engine, "assets/hero.json")?;
/// # Ok::<(), slottie::SlottieError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RlottieEngine {
    resource_dir: Option<PathBuf>,
}

impl RlottieEngine {
    /// Create an engine that resolves no external image assets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve image assets referenced by animations relative to `dir`.
    #[must_use]
    pub fn with_resource_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.resource_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl AnimationEngine for RlottieEngine {
    fn parse(&self, payload: &[u8]) -> Option<Box<dyn AnimationHandle>> {
        DISABLE_MODEL_CACHE.call_once(|| unsafe { lottie_configure_model_cache_size(0) });

        // rlottie reads the payload as a C string.
        let data = CString::new(payload).ok()?;
        let key = CString::default();
        let resource_dir = match &self.resource_dir {
            Some(dir) => CString::new(dir.to_string_lossy().into_owned()).ok()?,
            None => CString::default(),
        };

        // SAFETY: all three pointers are valid NUL-terminated strings that
        // outlive the call; rlottie copies what it keeps.
        let raw = unsafe {
            lottie_animation_from_data(data.as_ptr(), key.as_ptr(), resource_dir.as_ptr())
        };
        let animation = NonNull::new(raw)?;
        Some(Box::new(RlottieHandle { animation }))
    }
}

/// An owned rlottie animation, destroyed on drop.
pub struct RlottieHandle {
    animation: NonNull<Lottie_Animation>,
}

// SAFETY: the handle is the only owner of the animation and rlottie does not
// tie animations to the thread that created them.
unsafe impl Send for RlottieHandle {}

impl AnimationHandle for RlottieHandle {
    fn frame_count(&self) -> usize {
        unsafe { lottie_animation_get_totalframe(self.animation.as_ptr()) }
    }

    fn duration_seconds(&self) -> f64 {
        unsafe { lottie_animation_get_duration(self.animation.as_ptr()) }
    }

    fn frame_rate(&self) -> f64 {
        unsafe { lottie_animation_get_framerate(self.animation.as_ptr()) }
    }

    fn intrinsic_size(&self) -> (usize, usize) {
        let mut width = 0;
        let mut height = 0;
        unsafe { lottie_animation_get_size(self.animation.as_ptr(), &mut width, &mut height) };
        (width, height)
    }

    fn render(
        &mut self,
        frame_index: usize,
        buffer: &mut [u32],
        width: usize,
        height: usize,
        bytes_per_row: usize,
    ) {
        debug_assert!(buffer.len() * 4 >= height * bytes_per_row);
        // SAFETY: `buffer` covers `height` rows of `bytes_per_row` bytes and
        // is exclusively borrowed for the duration of the synchronous call.
        unsafe {
            lottie_animation_render(
                self.animation.as_ptr(),
                frame_index,
                buffer.as_mut_ptr(),
                width,
                height,
                bytes_per_row,
            );
        }
    }
}

impl Drop for RlottieHandle {
    fn drop(&mut self) {
        unsafe { lottie_animation_destroy(self.animation.as_ptr()) };
    }
}
