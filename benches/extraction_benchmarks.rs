//! Benchmarks for sequential, batch, parallel and streamed frame extraction.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features
//!
//! Uses the in-process test engine, so the numbers measure surface
//! allocation, pixel conversion and cropping rather than vector rendering.

#[path = "../tests/common/mod.rs"]
mod common;

use criterion::Criterion;
use slottie::{
    AnimationSource, CropRect, ExtractOptions, ExtractionConfig, FrameExtractor, PixelFormat,
};

#[cfg(feature = "async")]
use tokio::runtime::Runtime;

use common::TestEngine;

const PAYLOAD: &str = "frames=60;duration=2.0;size=256x256";

fn extractor(engine: &TestEngine, config: ExtractionConfig) -> FrameExtractor {
    let source = AnimationSource::from_text(engine, PAYLOAD).unwrap();
    FrameExtractor::new(source, config).unwrap()
}

fn benchmark_single_frame(criterion: &mut Criterion) {
    let engine = TestEngine::new();

    criterion.bench_function("next_frame 256x256", |bencher| {
        let mut extractor = extractor(&engine, ExtractionConfig::new(256, 256));
        bencher.iter(|| {
            let _frame = extractor.next_frame().unwrap();
        });
    });

    criterion.bench_function("next_frame 256x256 @ 2x", |bencher| {
        let mut extractor = extractor(&engine, ExtractionConfig::new(256, 256).with_scale(2.0));
        bencher.iter(|| {
            let _frame = extractor.next_frame().unwrap();
        });
    });
}

fn benchmark_extract_pass(criterion: &mut Criterion) {
    let engine = TestEngine::new();
    let mut group = criterion.benchmark_group("extract_pass");
    group.sample_size(30);

    group.bench_function("60 frames", |bencher| {
        let mut extractor = extractor(&engine, ExtractionConfig::new(256, 256));
        bencher.iter(|| {
            let _frames = extractor.extract_pass(&ExtractOptions::new()).unwrap();
        });
    });

    group.bench_function("60 frames cropped", |bencher| {
        let config =
            ExtractionConfig::new(256, 256).with_visible_rect(CropRect::new(64, 64, 128, 128));
        let mut extractor = extractor(&engine, config);
        bencher.iter(|| {
            let _frames = extractor.extract_pass(&ExtractOptions::new()).unwrap();
        });
    });

    group.finish();
}

fn benchmark_pixel_formats(criterion: &mut Criterion) {
    let engine = TestEngine::new();
    let mut group = criterion.benchmark_group("pixel_format");

    for (name, format) in [
        ("rgba8", PixelFormat::Rgba8),
        ("rgba8_premultiplied", PixelFormat::Rgba8Premultiplied),
        ("rgb8", PixelFormat::Rgb8),
    ] {
        group.bench_function(name, |bencher| {
            let config = ExtractionConfig::new(256, 256).with_pixel_format(format);
            let mut extractor = extractor(&engine, config);
            bencher.iter(|| {
                let _frame = extractor.next_frame().unwrap();
            });
        });
    }

    group.finish();
}

#[cfg(feature = "rayon")]
fn benchmark_parallel(criterion: &mut Criterion) {
    let engine = TestEngine::new();
    let mut group = criterion.benchmark_group("parallel");
    group.sample_size(30);

    group.bench_function("60 frames", |bencher| {
        let config = ExtractionConfig::new(256, 256);
        bencher.iter(|| {
            let _frames = slottie::extract_frames_parallel(
                &engine,
                PAYLOAD.as_bytes(),
                &config,
                &ExtractOptions::new(),
            )
            .unwrap();
        });
    });

    group.finish();
}

#[cfg(not(feature = "rayon"))]
fn benchmark_parallel(_criterion: &mut Criterion) {}

#[cfg(feature = "async")]
fn benchmark_async(criterion: &mut Criterion) {
    let engine = TestEngine::new();
    let rt = Runtime::new().unwrap();
    let mut group = criterion.benchmark_group("async");
    group.sample_size(30);

    group.bench_function("frame_stream 60 frames", |bencher| {
        bencher.iter(|| {
            rt.block_on(async {
                let config = ExtractionConfig::new(256, 256).with_looping(false);
                let mut stream = extractor(&engine, config).into_stream(ExtractOptions::new(), None);

                use tokio_stream::StreamExt;
                while let Some(result) = stream.next().await {
                    let _ = result.unwrap();
                }
            });
        });
    });

    group.finish();
}

#[cfg(not(feature = "async"))]
fn benchmark_async(_criterion: &mut Criterion) {}

criterion::criterion_group!(
    benches,
    benchmark_single_frame,
    benchmark_extract_pass,
    benchmark_pixel_formats,
    benchmark_parallel,
    benchmark_async,
);
criterion::criterion_main!(benches);
