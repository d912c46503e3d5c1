//! A device that logs every call before delegating to another device.

use tessera_core::{Pos, Rect};
use tracing::{trace, warn};

use crate::blend::BlendMode;
use crate::color::Color;
use crate::device::{
    CursorHandle, FontHandle, ImageHandle, QuadColors, RenderDevice, RenderFont, RenderImage,
};
use crate::error::RenderResult;

/// Wraps a [`RenderDevice`] and emits a `tracing` event per call.
///
/// Layering one backend on another is always done by delegation like this:
/// the wrapper owns the inner device and forwards, it never re-implements
/// drawing.
#[derive(Debug)]
pub struct TracingRenderDevice<D> {
    inner: D,
    calls: u64,
}

impl<D: RenderDevice> TracingRenderDevice<D> {
    pub fn new(inner: D) -> Self {
        Self { inner, calls: 0 }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }

    /// Number of calls forwarded so far.
    pub fn call_count(&self) -> u64 {
        self.calls
    }

    fn forward<T>(&mut self, op: &'static str, result: RenderResult<T>) -> RenderResult<T> {
        self.calls += 1;
        if let Err(err) = &result {
            warn!(target: "tessera_render::device", op, %err, "device call failed");
        }
        result
    }
}

impl<D: RenderDevice> RenderDevice for TracingRenderDevice<D> {
    fn create_image(&mut self, path: &str, filter_linear: bool) -> RenderResult<ImageHandle> {
        trace!(target: "tessera_render::device", path, filter_linear, "create_image");
        let result = self.inner.create_image(path, filter_linear);
        self.forward("create_image", result)
    }

    fn create_font(&mut self, path: &str) -> RenderResult<FontHandle> {
        trace!(target: "tessera_render::device", path, "create_font");
        let result = self.inner.create_font(path);
        self.forward("create_font", result)
    }

    fn create_mouse_cursor(
        &mut self,
        path: &str,
        hotspot_x: i32,
        hotspot_y: i32,
    ) -> RenderResult<CursorHandle> {
        trace!(target: "tessera_render::device", path, hotspot_x, hotspot_y, "create_mouse_cursor");
        let result = self.inner.create_mouse_cursor(path, hotspot_x, hotspot_y);
        self.forward("create_mouse_cursor", result)
    }

    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn begin_frame(&mut self) -> RenderResult<()> {
        trace!(target: "tessera_render::device", "begin_frame");
        let result = self.inner.begin_frame();
        self.forward("begin_frame", result)
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        trace!(target: "tessera_render::device", "end_frame");
        let result = self.inner.end_frame();
        self.forward("end_frame", result)
    }

    fn clear(&mut self) -> RenderResult<()> {
        trace!(target: "tessera_render::device", "clear");
        let result = self.inner.clear();
        self.forward("clear", result)
    }

    fn set_blend_mode(&mut self, mode: BlendMode) -> RenderResult<()> {
        trace!(target: "tessera_render::device", mode = mode.name(), "set_blend_mode");
        let result = self.inner.set_blend_mode(mode);
        self.forward("set_blend_mode", result)
    }

    fn blend_mode(&self) -> BlendMode {
        self.inner.blend_mode()
    }

    fn render_quad(&mut self, rect: Rect<i32>, color: Color) -> RenderResult<()> {
        trace!(target: "tessera_render::device", ?rect, %color, "render_quad");
        let result = self.inner.render_quad(rect, color);
        self.forward("render_quad", result)
    }

    fn render_quad_gradient(&mut self, rect: Rect<i32>, colors: QuadColors) -> RenderResult<()> {
        trace!(target: "tessera_render::device", ?rect, "render_quad_gradient");
        let result = self.inner.render_quad_gradient(rect, colors);
        self.forward("render_quad_gradient", result)
    }

    fn render_image(
        &mut self,
        image: &dyn RenderImage,
        dest: Rect<i32>,
        color: Color,
        scale: f32,
    ) -> RenderResult<()> {
        trace!(target: "tessera_render::device", ?dest, scale, "render_image");
        let result = self.inner.render_image(image, dest, color, scale);
        self.forward("render_image", result)
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
        trace!(target: "tessera_render::device", ?dest, ?source, scale, "render_image_region");
        let result = self
            .inner
            .render_image_region(image, dest, source, color, scale, center);
        self.forward("render_image_region", result)
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
        trace!(target: "tessera_render::device", text, x = pos.x, y = pos.y, "render_font");
        let result = self
            .inner
            .render_font(font, text, pos, color, size_x, size_y);
        self.forward("render_font", result)
    }

    fn enable_clip(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> RenderResult<()> {
        trace!(target: "tessera_render::device", x0, y0, x1, y1, "enable_clip");
        let result = self.inner.enable_clip(x0, y0, x1, y1);
        self.forward("enable_clip", result)
    }

    fn disable_clip(&mut self) -> RenderResult<()> {
        trace!(target: "tessera_render::device", "disable_clip");
        let result = self.inner.disable_clip();
        self.forward("disable_clip", result)
    }

    fn clip(&self) -> Option<Rect<i32>> {
        self.inner.clip()
    }

    fn enable_mouse_cursor(&mut self, cursor: &CursorHandle) -> RenderResult<()> {
        trace!(target: "tessera_render::device", hotspot = ?cursor.hotspot(), "enable_mouse_cursor");
        let result = self.inner.enable_mouse_cursor(cursor);
        self.forward("enable_mouse_cursor", result)
    }

    fn disable_mouse_cursor(&mut self) -> RenderResult<()> {
        trace!(target: "tessera_render::device", "disable_mouse_cursor");
        let result = self.inner.disable_mouse_cursor();
        self.forward("disable_mouse_cursor", result)
    }
}
