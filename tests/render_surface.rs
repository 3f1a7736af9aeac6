//! RenderSurface allocation, snapshot and crop tests.

mod common;

use image::{DynamicImage, GenericImageView};
use slottie::{
    AnimationSource, CropRect, DISPLAY_SCALE, PixelFormat, RenderSurface, SlottieError,
    default_display_scale,
};

use common::{TEN_FRAMES, TestEngine, pattern_rgba};

fn ten_frames(engine: &TestEngine) -> AnimationSource {
    AnimationSource::from_text(engine, TEN_FRAMES).expect("Failed to load animation")
}

// ── allocation ─────────────────────────────────────────────────────

#[test]
fn canvas_is_output_size_times_scale() {
    let surface = RenderSurface::new(100, 50, 2.0).expect("Failed to allocate");
    assert_eq!(surface.canvas_width(), 200);
    assert_eq!(surface.canvas_height(), 100);
    assert_eq!(surface.bytes_per_row(), 800);
    assert_eq!(surface.full_rect(), CropRect::new(0, 0, 200, 100));
}

#[test]
fn fractional_scale_truncates() {
    let surface = RenderSurface::new(10, 10, 1.55).expect("Failed to allocate");
    assert_eq!(surface.canvas_width(), 15);
    assert_eq!(surface.canvas_height(), 15);
}

#[test]
fn zero_scale_uses_default_display_scale() {
    let surface = RenderSurface::new(100, 80, DISPLAY_SCALE).expect("Failed to allocate");
    let resolved = default_display_scale();

    assert!(surface.scale() > 0.0);
    assert_eq!(surface.scale(), resolved);
    assert_eq!(surface.canvas_width(), (100.0 * resolved).floor() as u32);
    assert_eq!(surface.canvas_height(), (80.0 * resolved).floor() as u32);
    assert!(surface.canvas_width() > 0 && surface.canvas_height() > 0);
}

#[test]
fn zero_dimension_is_init_failure() {
    for (width, height) in [(0, 100), (100, 0), (0, 0)] {
        let result = RenderSurface::new(width, height, 1.0);
        assert!(
            matches!(result, Err(SlottieError::RendererInit { .. })),
            "{width}x{height} should not allocate"
        );
    }
}

#[test]
fn scale_collapsing_canvas_is_init_failure() {
    let result = RenderSurface::new(3, 3, 0.25);
    assert!(matches!(result, Err(SlottieError::RendererInit { .. })));
}

#[test]
fn invalid_scale_is_init_failure() {
    for scale in [-1.0, f64::NAN, f64::INFINITY] {
        let result = RenderSurface::new(10, 10, scale);
        assert!(
            matches!(result, Err(SlottieError::RendererInit { .. })),
            "scale {scale} should be rejected"
        );
    }
}

#[test]
fn oversized_canvas_is_init_failure() {
    let result = RenderSurface::new(u32::MAX, u32::MAX, 4.0);
    let error = result.expect_err("canvas should be rejected");
    assert!(
        error.to_string().contains("Failed to initialise renderer"),
        "Unexpected message: {error}"
    );
}

// ── rendering & snapshot ───────────────────────────────────────────

#[test]
fn render_converts_argb_to_rgba() {
    let engine = TestEngine::new();
    let mut source = ten_frames(&engine);
    let mut surface = RenderSurface::new(16, 8, 1.0).expect("Failed to allocate");

    let image = surface
        .render_frame(&mut source, 3, None)
        .expect("Failed to render");
    assert_eq!(image.pixel_size(), (16, 8));
    assert_eq!(image.scale(), 1.0);

    let rgba = image.image().to_rgba8();
    assert_eq!(rgba.get_pixel(0, 0).0, pattern_rgba(3, 0, 0));
    assert_eq!(rgba.get_pixel(15, 7).0, pattern_rgba(3, 15, 7));
}

#[test]
fn pixel_formats_handle_premultiplied_alpha() {
    let engine = TestEngine::new();
    let mut source =
        AnimationSource::from_text(&engine, "frames=1;duration=1.0;pixel=0x80402010")
            .expect("Failed to load animation");

    let mut straight = RenderSurface::new(2, 2, 1.0).expect("Failed to allocate");
    let image = straight.render_frame(&mut source, 0, None).expect("render");
    let DynamicImage::ImageRgba8(rgba) = image.image() else {
        panic!("Expected RGBA8 image");
    };
    assert_eq!(rgba.get_pixel(1, 1).0, [128, 64, 32, 128]);

    let mut premultiplied = RenderSurface::new(2, 2, 1.0)
        .expect("Failed to allocate")
        .with_pixel_format(PixelFormat::Rgba8Premultiplied);
    let image = premultiplied.render_frame(&mut source, 0, None).expect("render");
    assert_eq!(image.image().to_rgba8().get_pixel(0, 0).0, [0x40, 0x20, 0x10, 0x80]);

    let mut rgb = RenderSurface::new(2, 2, 1.0)
        .expect("Failed to allocate")
        .with_pixel_format(PixelFormat::Rgb8);
    let image = rgb.render_frame(&mut source, 0, None).expect("render");
    let DynamicImage::ImageRgb8(pixels) = image.image() else {
        panic!("Expected RGB8 image");
    };
    assert_eq!(pixels.get_pixel(0, 1).0, [0x40, 0x20, 0x10]);
}

#[test]
fn transparent_pixels_stay_zero() {
    let engine = TestEngine::new();
    let mut source = AnimationSource::from_text(&engine, "frames=1;duration=1.0;pixel=0x00000000")
        .expect("Failed to load animation");
    let mut surface = RenderSurface::new(4, 4, 1.0).expect("Failed to allocate");

    let image = surface.render_frame(&mut source, 0, None).expect("render");
    assert!(image.image().to_rgba8().pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[test]
fn snapshots_are_independent_of_later_renders() {
    let engine = TestEngine::new();
    let mut source = ten_frames(&engine);
    let mut surface = RenderSurface::new(8, 8, 1.0).expect("Failed to allocate");

    let first = surface.render_frame(&mut source, 1, None).expect("render");
    let kept = first.clone();
    let _second = surface.render_frame(&mut source, 7, None).expect("render");

    assert_eq!(first, kept);
    assert_eq!(first.image().to_rgba8().get_pixel(2, 2).0, pattern_rgba(1, 2, 2));
}

#[test]
fn out_of_range_frame_is_render_failure() {
    let engine = TestEngine::new();
    let mut source = ten_frames(&engine);
    let mut surface = RenderSurface::new(8, 8, 1.0).expect("Failed to allocate");

    let result = surface.render_frame(&mut source, 10, None);
    assert!(matches!(
        result,
        Err(SlottieError::UnableToRenderFrame { frame_index: 10, .. })
    ));
    assert_eq!(engine.renders(), 0);
}

// ── cropping ───────────────────────────────────────────────────────

#[test]
fn full_rect_crop_matches_uncropped() {
    let engine = TestEngine::new();
    let mut source = ten_frames(&engine);
    let mut surface = RenderSurface::new(100, 100, 1.0).expect("Failed to allocate");

    let uncropped = surface.render_frame(&mut source, 4, None).expect("render");
    let full = surface.full_rect();
    let cropped = surface
        .render_frame(&mut source, 4, Some(full))
        .expect("render");

    assert_eq!(uncropped, cropped);
}

#[test]
fn crop_extracts_sub_region() {
    let engine = TestEngine::new();
    let mut source = ten_frames(&engine);
    let mut surface = RenderSurface::new(50, 40, 1.0).expect("Failed to allocate");

    let image = surface
        .render_frame(&mut source, 2, Some(CropRect::new(10, 5, 20, 15)))
        .expect("render");
    assert_eq!(image.pixel_size(), (20, 15));

    let rgba = image.image().to_rgba8();
    assert_eq!(rgba.get_pixel(0, 0).0, pattern_rgba(2, 10, 5));
    assert_eq!(rgba.get_pixel(19, 14).0, pattern_rgba(2, 29, 19));
}

#[test]
fn crop_at_origin_with_smaller_size_is_applied() {
    let engine = TestEngine::new();
    let mut source = ten_frames(&engine);
    let mut surface = RenderSurface::new(50, 50, 1.0).expect("Failed to allocate");

    let image = surface
        .render_frame(&mut source, 0, Some(CropRect::new(0, 0, 25, 50)))
        .expect("render");
    assert_eq!(image.pixel_size(), (25, 50));
}

#[test]
fn crop_is_clipped_to_canvas() {
    let engine = TestEngine::new();
    let mut source = ten_frames(&engine);
    let mut surface = RenderSurface::new(50, 50, 1.0).expect("Failed to allocate");

    let image = surface
        .render_frame(&mut source, 0, Some(CropRect::new(40, 30, 100, 100)))
        .expect("render");
    assert_eq!(image.pixel_size(), (10, 20));
    assert_eq!(image.image().get_pixel(0, 0).0, pattern_rgba(0, 40, 30));
}

#[test]
fn crop_outside_canvas_is_render_failure() {
    let engine = TestEngine::new();
    let mut source = ten_frames(&engine);
    let mut surface = RenderSurface::new(50, 50, 1.0).expect("Failed to allocate");

    let result = surface.render_frame(&mut source, 0, Some(CropRect::new(60, 60, 10, 10)));
    let error = result.expect_err("crop should fail");
    assert!(matches!(error, SlottieError::UnableToRenderFrame { .. }));
    assert!(error.to_string().contains("outside"), "Unexpected message: {error}");
}

#[test]
fn scaled_image_reports_logical_size() {
    let engine = TestEngine::new();
    let mut source = ten_frames(&engine);
    let mut surface = RenderSurface::new(30, 20, 3.0).expect("Failed to allocate");

    let image = surface.render_frame(&mut source, 0, None).expect("render");
    assert_eq!(image.pixel_size(), (90, 60));
    assert_eq!(image.scale(), 3.0);
    assert_eq!(image.logical_size(), (30.0, 20.0));
}
