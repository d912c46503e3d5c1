use std::path::Path;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tessera_core::{Pos, Rect};
use tessera_render::software::{SoftwareDeviceConfig, SoftwareRenderDevice};
use tessera_render::{
    BlendMode, Color, FileSystemLocation, MouseCursor, QuadColors, RenderDevice, RenderFont,
    RenderImage, ResourceLocator,
};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// A device whose resources are looked up in `dir`.
fn device_in(dir: &Path, width: u32, height: u32) -> SoftwareRenderDevice {
    let locator = ResourceLocator::new().with_location(FileSystemLocation::new(dir));
    SoftwareRenderDevice::new(
        SoftwareDeviceConfig::with_size(width, height).with_resource_loader(Arc::new(locator)),
    )
}

fn device(width: u32, height: u32) -> SoftwareRenderDevice {
    SoftwareRenderDevice::new(SoftwareDeviceConfig::with_size(width, height))
}

fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 4]) {
    RgbaImage::from_pixel(width, height, Rgba(color))
        .save(dir.join(name))
        .unwrap();
}

/// A two-glyph font: 'A' is a solid 4x6 block, ' ' only advances.
fn write_font(dir: &Path) {
    write_png(dir, "mini_0.png", 8, 8, WHITE);
    std::fs::write(
        dir.join("mini.fnt"),
        "info face=\"Mini\" size=8\n\
         common lineHeight=8 base=6 scaleW=8 scaleH=8 pages=1\n\
         page id=0 file=\"mini_0.png\"\n\
         char id=65 x=0 y=0 width=4 height=6 xoffset=0 yoffset=1 xadvance=5 page=0\n\
         char id=32 x=0 y=0 width=0 height=0 xoffset=0 yoffset=0 xadvance=3 page=0\n",
    )
    .unwrap();
}

#[test]
fn drawing_outside_a_frame_is_illegal_state() {
    let mut dev = device(4, 4);
    let err = dev.render_quad(Rect::new(0, 0, 2, 2), Color::WHITE).unwrap_err();
    assert!(err.is_illegal_state());

    dev.begin_frame().unwrap();
    dev.end_frame().unwrap();
    assert!(dev.clear().unwrap_err().is_illegal_state());
    assert!(dev.set_blend_mode(BlendMode::Additive).unwrap_err().is_illegal_state());
    assert!(dev.enable_clip(0, 0, 1, 1).unwrap_err().is_illegal_state());
    assert!(dev.framebuffer().pixels().iter().all(|p| *p == BLACK));
}

#[test]
fn frames_do_not_nest() {
    let mut dev = device(4, 4);
    dev.begin_frame().unwrap();
    assert!(dev.begin_frame().unwrap_err().is_illegal_state());
    dev.end_frame().unwrap();
    assert!(dev.end_frame().unwrap_err().is_illegal_state());
    assert_eq!(dev.frames_completed(), 1);
}

#[test]
fn clip_outside_quad_has_no_effect() {
    let mut dev = device(16, 16);
    dev.begin_frame().unwrap();
    dev.enable_clip(10, 10, 16, 16).unwrap();
    dev.render_quad(Rect::new(0, 0, 8, 8), Color::WHITE).unwrap();
    dev.end_frame().unwrap();
    assert!(dev.framebuffer().pixels().iter().all(|p| *p == BLACK));
}

#[test]
fn quads_at_coordinate_limits_are_ignored() {
    let mut dev = device(16, 16);
    dev.begin_frame().unwrap();
    dev.render_quad(Rect::new(i32::MAX - 4, 0, 10, 10), Color::WHITE)
        .unwrap();
    dev.render_quad(Rect::new(0, i32::MAX, i32::MAX, i32::MAX), Color::WHITE)
        .unwrap();
    dev.render_quad_gradient(
        Rect::new(i32::MAX - 1, i32::MAX - 1, 8, 8),
        QuadColors::uniform(Color::WHITE),
    )
    .unwrap();
    dev.enable_clip(i32::MIN, i32::MIN, i32::MAX, i32::MAX).unwrap();
    dev.render_quad(Rect::new(i32::MIN, i32::MIN, 4, 4), Color::WHITE)
        .unwrap();
    dev.end_frame().unwrap();
    assert!(dev.framebuffer().pixels().iter().all(|p| *p == BLACK));
}

#[test]
fn clip_containing_quad_draws_it_whole() {
    let mut dev = device(16, 16);
    dev.begin_frame().unwrap();
    dev.enable_clip(0, 0, 16, 16).unwrap();
    dev.render_quad(Rect::new(2, 2, 4, 4), Color::WHITE).unwrap();
    dev.end_frame().unwrap();

    let lit = dev.framebuffer().pixels().iter().filter(|p| **p == WHITE).count();
    assert_eq!(lit, 16);
}

#[test]
fn clip_cuts_partially_covered_quad() {
    let mut dev = device(16, 16);
    dev.begin_frame().unwrap();
    dev.enable_clip(4, 4, 8, 8).unwrap();
    dev.render_quad(Rect::new(0, 0, 6, 6), Color::WHITE).unwrap();
    dev.disable_clip().unwrap();
    assert_eq!(dev.clip(), None);
    dev.end_frame().unwrap();

    let fb = dev.framebuffer();
    assert_eq!(fb.pixel(4, 4), Some(WHITE));
    assert_eq!(fb.pixel(5, 5), Some(WHITE));
    assert_eq!(fb.pixel(3, 3), Some(BLACK));
    assert_eq!(fb.pixel(6, 6), Some(BLACK));
}

#[test]
fn blend_mode_persists_across_draws_and_frames() {
    let mut dev = device(4, 1);
    dev.begin_frame().unwrap();
    dev.set_blend_mode(BlendMode::Additive).unwrap();
    let half = Color::rgb(0.5, 0.5, 0.5);
    dev.render_quad(Rect::new(0, 0, 2, 1), half).unwrap();
    dev.render_quad(Rect::new(0, 0, 1, 1), half).unwrap();
    dev.end_frame().unwrap();

    assert_eq!(dev.blend_mode(), BlendMode::Additive);
    assert_eq!(dev.framebuffer().pixel(0, 0), Some(WHITE));
    assert_eq!(dev.framebuffer().pixel(1, 0), Some([128, 128, 128, 255]));

    dev.begin_frame().unwrap();
    assert_eq!(dev.blend_mode(), BlendMode::Additive);
    dev.render_quad(Rect::new(1, 0, 1, 1), half).unwrap();
    dev.end_frame().unwrap();
    assert_eq!(dev.framebuffer().pixel(1, 0), Some(WHITE));
}

#[test]
fn clear_resets_to_background() {
    let mut dev = SoftwareRenderDevice::new(
        SoftwareDeviceConfig::with_size(2, 2).with_background(Color::BLUE),
    );
    dev.begin_frame().unwrap();
    dev.render_quad(Rect::new(0, 0, 2, 2), Color::RED).unwrap();
    dev.clear().unwrap();
    dev.end_frame().unwrap();
    assert!(dev.framebuffer().pixels().iter().all(|p| *p == [0, 0, 255, 255]));
}

#[test]
fn gradient_hits_corner_colors() {
    let mut dev = device(4, 4);
    dev.begin_frame().unwrap();
    dev.set_blend_mode(BlendMode::Replace).unwrap();
    dev.render_quad_gradient(
        Rect::new(0, 0, 4, 4),
        QuadColors {
            top_left: Color::RED,
            top_right: Color::GREEN,
            bottom_right: Color::BLUE,
            bottom_left: Color::WHITE,
        },
    )
    .unwrap();
    dev.end_frame().unwrap();

    let fb = dev.framebuffer();
    assert_eq!(fb.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(fb.pixel(3, 0), Some([0, 255, 0, 255]));
    assert_eq!(fb.pixel(3, 3), Some([0, 0, 255, 255]));
    assert_eq!(fb.pixel(0, 3), Some(WHITE));
}

#[test]
fn image_is_loaded_and_stretched() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "red.png", 2, 2, [255, 0, 0, 255]);

    let mut dev = device_in(dir.path(), 8, 8);
    let image = dev.create_image("red.png", false).unwrap();
    assert_eq!((image.width(), image.height()), (2, 2));

    dev.begin_frame().unwrap();
    dev.render_image(image.as_ref(), Rect::new(0, 0, 8, 8), Color::WHITE, 1.0)
        .unwrap();
    dev.end_frame().unwrap();
    assert!(dev.framebuffer().pixels().iter().all(|p| *p == [255, 0, 0, 255]));
}

#[test]
fn image_tint_modulates_texels() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "white.png", 1, 1, WHITE);

    let mut dev = device_in(dir.path(), 2, 2);
    let image = dev.create_image("white.png", true).unwrap();
    dev.begin_frame().unwrap();
    dev.render_image(image.as_ref(), Rect::new(0, 0, 2, 2), Color::GREEN, 1.0)
        .unwrap();
    dev.end_frame().unwrap();
    assert_eq!(dev.framebuffer().pixel(1, 1), Some([0, 255, 0, 255]));
}

#[test]
fn image_scale_shrinks_about_center() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "white.png", 4, 4, WHITE);

    let mut dev = device_in(dir.path(), 8, 8);
    let image = dev.create_image("white.png", false).unwrap();
    dev.begin_frame().unwrap();
    dev.render_image(image.as_ref(), Rect::new(0, 0, 8, 8), Color::WHITE, 0.5)
        .unwrap();
    dev.end_frame().unwrap();

    let fb = dev.framebuffer();
    assert_eq!(fb.pixel(0, 0), Some(BLACK));
    assert_eq!(fb.pixel(2, 2), Some(WHITE));
    assert_eq!(fb.pixel(5, 5), Some(WHITE));
    assert_eq!(fb.pixel(6, 6), Some(BLACK));
}

#[test]
fn image_region_outside_bounds_is_argument_error() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "tiles.png", 4, 4, WHITE);

    let mut dev = device_in(dir.path(), 8, 8);
    let image = dev.create_image("tiles.png", false).unwrap();
    dev.begin_frame().unwrap();
    let err = dev
        .render_image_region(
            image.as_ref(),
            Rect::new(0, 0, 4, 4),
            Rect::new(2, 2, 4, 4),
            Color::WHITE,
            1.0,
            Pos::new(2, 2),
        )
        .unwrap_err();
    assert!(err.is_argument());

    dev.render_image_region(
        image.as_ref(),
        Rect::new(0, 0, 2, 2),
        Rect::new(2, 2, 2, 2),
        Color::WHITE,
        1.0,
        Pos::new(1, 1),
    )
    .unwrap();
    dev.end_frame().unwrap();
    assert_eq!(dev.framebuffer().pixel(1, 1), Some(WHITE));
}

#[test]
fn missing_resources_are_resource_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut dev = device_in(dir.path(), 4, 4);
    assert!(dev.create_image("nope.png", false).unwrap_err().is_resource());
    assert!(dev.create_font("nope.fnt").unwrap_err().is_resource());
    assert!(dev.create_mouse_cursor("nope.png", 0, 0).unwrap_err().is_resource());
}

#[test]
fn corrupt_image_is_resource_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
    let mut dev = device_in(dir.path(), 4, 4);
    assert!(dev.create_image("broken.png", false).unwrap_err().is_resource());
}

#[test]
fn font_metrics_come_from_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    write_font(dir.path());

    let mut dev = device_in(dir.path(), 16, 16);
    let font = dev.create_font("mini.fnt").unwrap();
    assert_eq!(font.height(), 8);
    assert_eq!(font.width("A"), 5);
    assert_eq!(font.width("A A"), 13);
    assert_eq!(font.width(""), 0);
}

#[test]
fn text_renders_glyph_boxes() {
    let dir = tempfile::tempdir().unwrap();
    write_font(dir.path());

    let mut dev = device_in(dir.path(), 16, 16);
    let font = dev.create_font("mini.fnt").unwrap();
    dev.begin_frame().unwrap();
    dev.render_font(font.as_ref(), "A", Pos::new(2, 2), Color::WHITE, 1.0, 1.0)
        .unwrap();
    dev.end_frame().unwrap();

    let fb = dev.framebuffer();
    // yoffset=1 puts the glyph one row below the line box top
    assert_eq!(fb.pixel(2, 2), Some(BLACK));
    assert_eq!(fb.pixel(2, 3), Some(WHITE));
    assert_eq!(fb.pixel(5, 8), Some(WHITE));
    assert_eq!(fb.pixel(6, 3), Some(BLACK));
    assert_eq!(fb.pixel(2, 9), Some(BLACK));
}

#[test]
fn text_scale_stretches_glyphs() {
    let dir = tempfile::tempdir().unwrap();
    write_font(dir.path());

    let mut dev = device_in(dir.path(), 16, 16);
    let font = dev.create_font("mini.fnt").unwrap();
    dev.begin_frame().unwrap();
    dev.render_font(font.as_ref(), "A", Pos::new(0, 0), Color::WHITE, 2.0, 1.0)
        .unwrap();
    dev.end_frame().unwrap();

    let fb = dev.framebuffer();
    assert_eq!(fb.pixel(7, 1), Some(WHITE));
    assert_eq!(fb.pixel(8, 1), Some(BLACK));
}

#[test]
fn cursor_is_selected_outside_frames() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "arrow.png", 8, 8, WHITE);

    let mut dev = device_in(dir.path(), 4, 4);
    let cursor = dev.create_mouse_cursor("arrow.png", 1, 2).unwrap();
    assert_eq!(cursor.hotspot(), Pos::new(1, 2));

    dev.enable_mouse_cursor(&cursor).unwrap();
    assert!(dev.active_cursor().is_some());
    dev.disable_mouse_cursor().unwrap();
    assert!(dev.active_cursor().is_none());

    assert!(dev.create_mouse_cursor("arrow.png", 9, 0).unwrap_err().is_argument());
}

#[test]
fn resize_is_reported_immediately() {
    let mut dev = device(4, 4);
    dev.resize(10, 6);
    assert_eq!((dev.width(), dev.height()), (10, 6));
    assert_eq!(dev.framebuffer().pixels().len(), 60);
}
