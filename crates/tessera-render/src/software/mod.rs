//! CPU rasterizer backend.
//!
//! Renders into an in-memory RGBA8 [`Framebuffer`]. It needs no window or
//! GPU, which makes it the reference backend for headless rendering,
//! screenshots and tests.

mod font;
mod framebuffer;
mod image;

pub use font::{FontDescriptor, Glyph, SoftwareFont};
pub use framebuffer::{Framebuffer, blend_color};
pub use self::image::{SoftwareCursor, SoftwareImage};

use std::sync::Arc;

use tessera_core::profiling::profile_function;
use tessera_core::{Pos, Rect};

use crate::blend::BlendMode;
use crate::color::Color;
use crate::device::{
    CursorHandle, FontHandle, ImageHandle, QuadColors, RenderDevice, RenderFont, RenderImage,
    downcast_handle,
};
use crate::error::{RenderError, RenderResult};
use crate::frame::FrameTracker;
use crate::resource::{ResourceLoader, ResourceLocator};

use self::image::TexturedQuad;

/// Construction options for [`SoftwareRenderDevice`].
#[derive(Debug, Clone)]
pub struct SoftwareDeviceConfig {
    pub width: u32,
    pub height: u32,
    /// Color written by [`RenderDevice::clear`].
    pub background: Color,
    pub resource_loader: Arc<dyn ResourceLoader>,
}

impl Default for SoftwareDeviceConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            background: Color::BLACK,
            resource_loader: Arc::new(ResourceLocator::working_directory()),
        }
    }
}

impl SoftwareDeviceConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_resource_loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.resource_loader = loader;
        self
    }
}

/// A [`RenderDevice`] that rasterizes on the CPU.
#[derive(Debug)]
pub struct SoftwareRenderDevice {
    framebuffer: Framebuffer,
    background: Color,
    loader: Arc<dyn ResourceLoader>,
    frame: FrameTracker,
    blend_mode: BlendMode,
    clip: Option<Rect<i32>>,
    cursor: Option<CursorHandle>,
}

impl SoftwareRenderDevice {
    pub fn new(config: SoftwareDeviceConfig) -> Self {
        tracing::debug!(
            width = config.width,
            height = config.height,
            "creating software render device"
        );
        Self {
            framebuffer: Framebuffer::new(config.width, config.height, config.background),
            background: config.background,
            loader: config.resource_loader,
            frame: FrameTracker::new(),
            blend_mode: BlendMode::default(),
            clip: None,
            cursor: None,
        }
    }

    /// Change the surface size. The contents are reset to the background and
    /// any clip rectangle is dropped.
    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "resizing software framebuffer");
        self.framebuffer.resize(width, height, self.background);
        self.clip = None;
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// The cursor selected with `enable_mouse_cursor`, if any.
    pub fn active_cursor(&self) -> Option<&CursorHandle> {
        self.cursor.as_ref()
    }

    pub fn frames_completed(&self) -> u64 {
        self.frame.frames_completed()
    }

    /// Area that draw calls may touch: the clip rectangle limited to the surface.
    fn draw_area(&self) -> Rect<i32> {
        let bounds = self.framebuffer.bounds();
        match &self.clip {
            Some(clip) => clip.intersect(&bounds),
            None => bounds,
        }
    }

    fn check_scale(scale: f32) -> RenderResult<()> {
        if scale.is_finite() {
            Ok(())
        } else {
            Err(RenderError::Argument(format!("scale must be finite, got {}", scale)))
        }
    }
}

impl RenderDevice for SoftwareRenderDevice {
    fn create_image(&mut self, path: &str, filter_linear: bool) -> RenderResult<ImageHandle> {
        let resolved = self.loader.resolve(path)?;
        let image = SoftwareImage::load(&resolved, filter_linear)?;
        tracing::debug!(path, width = image.width(), height = image.height(), "loaded image");
        Ok(Arc::new(image))
    }

    fn create_font(&mut self, path: &str) -> RenderResult<FontHandle> {
        let resolved = self.loader.resolve(path)?;
        let font = SoftwareFont::load(&resolved)?;
        tracing::debug!(path, line_height = font.height(), "loaded font");
        Ok(Arc::new(font))
    }

    fn create_mouse_cursor(
        &mut self,
        path: &str,
        hotspot_x: i32,
        hotspot_y: i32,
    ) -> RenderResult<CursorHandle> {
        let resolved = self.loader.resolve(path)?;
        let image = SoftwareImage::load(&resolved, false)?;
        let bounds = image.bounds();
        if !bounds.contains(Pos::new(hotspot_x, hotspot_y)) {
            return Err(RenderError::Argument(format!(
                "cursor hotspot ({}, {}) lies outside the {}x{} image",
                hotspot_x, hotspot_y, bounds.width, bounds.height
            )));
        }
        Ok(Arc::new(SoftwareCursor::new(
            image,
            Pos::new(hotspot_x, hotspot_y),
        )))
    }

    fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    fn begin_frame(&mut self) -> RenderResult<()> {
        self.frame.begin()
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        self.frame.end()
    }

    fn clear(&mut self) -> RenderResult<()> {
        self.frame.ensure_active("clear")?;
        self.framebuffer.fill(self.background);
        Ok(())
    }

    fn set_blend_mode(&mut self, mode: BlendMode) -> RenderResult<()> {
        self.frame.ensure_active("set_blend_mode")?;
        self.blend_mode = mode;
        Ok(())
    }

    fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    fn render_quad(&mut self, rect: Rect<i32>, color: Color) -> RenderResult<()> {
        self.frame.ensure_active("render_quad")?;
        if rect.is_empty() {
            return Ok(());
        }
        let visible = rect.intersect(&self.draw_area());
        for y in visible.y..visible.bottom() {
            for x in visible.x..visible.right() {
                self.framebuffer.blend(Pos::new(x, y), color, self.blend_mode);
            }
        }
        Ok(())
    }

    fn render_quad_gradient(&mut self, rect: Rect<i32>, colors: QuadColors) -> RenderResult<()> {
        self.frame.ensure_active("render_quad_gradient")?;
        if rect.is_empty() {
            return Ok(());
        }
        profile_function!();

        // Corner colors land exactly on the first and last pixel of each axis
        let span_x = (rect.width - 1).max(1) as f32;
        let span_y = (rect.height - 1).max(1) as f32;
        let visible = rect.intersect(&self.draw_area());
        for y in visible.y..visible.bottom() {
            let v = (y - rect.y) as f32 / span_y;
            for x in visible.x..visible.right() {
                let u = (x - rect.x) as f32 / span_x;
                self.framebuffer
                    .blend(Pos::new(x, y), colors.sample(u, v), self.blend_mode);
            }
        }
        Ok(())
    }

    fn render_image(
        &mut self,
        image: &dyn RenderImage,
        dest: Rect<i32>,
        color: Color,
        scale: f32,
    ) -> RenderResult<()> {
        self.frame.ensure_active("render_image")?;
        Self::check_scale(scale)?;
        let center = dest.center();
        let source = Rect::new(0, 0, image.width() as i32, image.height() as i32);
        self.render_image_region(image, dest, source, color, scale, center)
    }

    fn render_image_region(
        &mut self,
        image: &dyn RenderImage,
        dest: Rect<i32>,
        source: Rect<i32>,
        color: Color,
        scale: f32,
        center: Pos<i32>,
    ) -> RenderResult<()> {
        self.frame.ensure_active("render_image_region")?;
        Self::check_scale(scale)?;
        let image = downcast_handle::<SoftwareImage>(image.as_any(), "image")?;

        if source.width < 0 || source.height < 0 || !image.bounds().contains_rect(&source) {
            return Err(RenderError::Argument(format!(
                "source region {:?} exceeds image bounds {:?}",
                source,
                image.bounds()
            )));
        }
        if dest.is_empty() || source.is_empty() {
            return Ok(());
        }
        profile_function!();

        let clip = self.draw_area();
        TexturedQuad {
            image,
            source,
            dest,
            tint: color,
            scale,
            center,
        }
        .draw(&mut self.framebuffer, &clip, self.blend_mode);
        Ok(())
    }

    fn render_font(
        &mut self,
        font: &dyn RenderFont,
        text: &str,
        pos: Pos<i32>,
        color: Color,
        size_x: f32,
        size_y: f32,
    ) -> RenderResult<()> {
        self.frame.ensure_active("render_font")?;
        let font = downcast_handle::<SoftwareFont>(font.as_any(), "font")?;
        if text.is_empty() || size_x <= 0.0 || size_y <= 0.0 {
            return Ok(());
        }
        profile_function!();

        let clip = self.draw_area();
        font.draw(
            &mut self.framebuffer,
            &clip,
            self.blend_mode,
            text,
            pos,
            color,
            (size_x, size_y),
        );
        Ok(())
    }

    fn enable_clip(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> RenderResult<()> {
        self.frame.ensure_active("enable_clip")?;
        self.clip = Some(Rect::from_corners(
            x0.min(x1),
            y0.min(y1),
            x0.max(x1),
            y0.max(y1),
        ));
        Ok(())
    }

    fn disable_clip(&mut self) -> RenderResult<()> {
        self.frame.ensure_active("disable_clip")?;
        self.clip = None;
        Ok(())
    }

    fn clip(&self) -> Option<Rect<i32>> {
        self.clip
    }

    fn enable_mouse_cursor(&mut self, cursor: &CursorHandle) -> RenderResult<()> {
        downcast_handle::<SoftwareCursor>(cursor.as_any(), "cursor")?;
        self.cursor = Some(Arc::clone(cursor));
        Ok(())
    }

    fn disable_mouse_cursor(&mut self) -> RenderResult<()> {
        self.cursor = None;
        Ok(())
    }
}
