//! # slottie
//!
//! Extract deterministic, time-stamped raster frames from Lottie vector
//! animations, for playback or video-encoding pipelines.
//!
//! The pipeline has four parts:
//!
//! - [`AnimationSource`]: a parsed animation and its cached metadata.
//! - [`ExtractionConfig`]: output size, scale, looping, crop and pixel
//!   format.
//! - [`RenderSurface`]: one reusable canvas that frames are rasterized
//!   into and copied out of.
//! - [`FrameExtractor`]: a cursor that yields one [`AnimationFrame`] per
//!   call, with presentation times that never drift.
//!
//! Parsing and rasterization are delegated to an [`AnimationEngine`]. The
//! `rlottie` feature provides [`RlottieEngine`], backed by the rlottie C
//! library.
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "rlottie")]
//! # fn example() -> Result<(), slottie::SlottieError> {
//! use slottie::{AnimationSource, ExtractionConfig, FrameExtractor, RlottieEngine};
//!
//! let source = AnimationSource::open(&RlottieEngine::new(), "loader.json")?;
//! let config = ExtractionConfig::new(256, 256).with_looping(false);
//! let mut extractor = FrameExtractor::new(source, config)?;
//!
//! for frame in extractor.frames() {
//!     let frame = frame?;
//!     frame.image.save(format!("frame_{:04}.png", frame.frame_index))?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rlottie` | [`RlottieEngine`] and the `slottie` command-line tool |
//! | `async` | `FrameExtractor::into_stream` via Tokio |
//! | `rayon` | `extract_frames_parallel` across rayon threads |
//! | `gif` | `FrameExtractor::export_gif` |
//! | `full` | Enables all of the above |

pub mod animation;
pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod frame;
#[cfg(feature = "gif")]
pub mod gif;
pub mod iterator;
pub mod metadata;
pub mod progress;
#[cfg(feature = "rayon")]
mod rayon;
#[cfg(feature = "rlottie")]
pub mod rlottie;
#[cfg(feature = "async")]
pub mod stream;
pub mod surface;
pub mod time;

pub use animation::AnimationSource;
pub use config::{CropRect, DISPLAY_SCALE, ExtractOptions, ExtractionConfig, PixelFormat};
pub use engine::{AnimationEngine, AnimationHandle};
pub use error::{Result, SlottieError};
pub use extractor::FrameExtractor;
pub use frame::{AnimationFrame, FrameImage};
#[cfg(feature = "gif")]
pub use gif::GifOptions;
pub use iterator::Frames;
pub use metadata::AnimationMetadata;
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
#[cfg(feature = "rayon")]
pub use rayon::extract_frames_parallel;
#[cfg(feature = "rlottie")]
pub use rlottie::{RlottieEngine, RlottieHandle};
#[cfg(feature = "async")]
pub use stream::FrameStream;
pub use surface::{DISPLAY_SCALE_ENV, RenderSurface, default_display_scale};
pub use time::{MediaTime, TIMESCALE};
