//! Per-node drawing surface handed to painters.
//!
//! A [`Canvas`] works in node-local coordinates: `(0, 0)` is the node's
//! top-left corner. It translates every call to screen space, culls
//! rectangles that fall entirely outside the node's effective clip, and
//! forwards the rest to the [`RenderDevice`].

use tessera_core::{Pos, Rect, Size};
use tessera_render::{Color, QuadColors, RenderDevice, RenderFont, RenderImage};

use crate::error::UiResult;
use crate::tree::Node;

/// Paint strategy for a node.
///
/// Called once per frame for every visible node that has one. Painters see
/// the node read-only and must not change layout state.
pub trait CanvasPainter {
    fn paint(&self, node: &Node, canvas: &mut Canvas<'_>) -> UiResult<()>;
}

impl<F> CanvasPainter for F
where
    F: Fn(&Node, &mut Canvas<'_>) -> UiResult<()>,
{
    fn paint(&self, node: &Node, canvas: &mut Canvas<'_>) -> UiResult<()> {
        self(node, canvas)
    }
}

pub struct Canvas<'a> {
    device: &'a mut dyn RenderDevice,
    origin: Pos<i32>,
    size: Size<u32>,
    /// Effective clip in screen space.
    clip: Rect<i32>,
    text_color: Color,
    fill_color: Color,
}

impl<'a> Canvas<'a> {
    /// A canvas for a node occupying `bounds` whose drawing is limited to `clip`.
    /// Both rectangles are in screen space.
    pub fn new(device: &'a mut dyn RenderDevice, bounds: Rect<i32>, clip: Rect<i32>) -> Self {
        Self {
            device,
            origin: bounds.position(),
            size: Size::new(bounds.width.max(0) as u32, bounds.height.max(0) as u32),
            clip,
            text_color: Color::WHITE,
            fill_color: Color::WHITE,
        }
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn size(&self) -> Size<u32> {
        self.size
    }

    /// The node's local bounds, `(0, 0, width, height)`.
    pub fn local_bounds(&self) -> Rect<i32> {
        Rect::new(0, 0, self.size.width as i32, self.size.height as i32)
    }

    /// The effective clip translated into node-local coordinates.
    pub fn clip_rect(&self) -> Rect<i32> {
        self.clip.translate(Pos::new(
            self.origin.x.saturating_neg(),
            self.origin.y.saturating_neg(),
        ))
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn to_screen(&self, rect: Rect<i32>) -> Rect<i32> {
        rect.translate(self.origin)
    }

    /// True if `screen` cannot produce a single visible pixel.
    fn culled(&self, screen: &Rect<i32>) -> bool {
        screen.is_empty() || !screen.intersects(&self.clip)
    }

    /// Fill a rectangle with the current fill color.
    pub fn fill_rect(&mut self, rect: Rect<i32>) -> UiResult<()> {
        let screen = self.to_screen(rect);
        if self.culled(&screen) {
            return Ok(());
        }
        self.device.render_quad(screen, self.fill_color)?;
        Ok(())
    }

    pub fn fill_rect_gradient(&mut self, rect: Rect<i32>, colors: QuadColors) -> UiResult<()> {
        let screen = self.to_screen(rect);
        if self.culled(&screen) {
            return Ok(());
        }
        self.device.render_quad_gradient(screen, colors)?;
        Ok(())
    }

    /// Draw the whole image stretched over `dest`, tinted with the fill color.
    pub fn draw_image(&mut self, image: &dyn RenderImage, dest: Rect<i32>, scale: f32) -> UiResult<()> {
        let screen = self.to_screen(dest);
        if self.culled(&scaled(screen, scale)) {
            return Ok(());
        }
        self.device
            .render_image(image, screen, self.fill_color, scale)?;
        Ok(())
    }

    /// Draw the `source` region of an image over `dest`, scaled about the
    /// center of `dest`.
    pub fn draw_image_region(
        &mut self,
        image: &dyn RenderImage,
        dest: Rect<i32>,
        source: Rect<i32>,
        scale: f32,
    ) -> UiResult<()> {
        let screen = self.to_screen(dest);
        if self.culled(&scaled(screen, scale)) {
            return Ok(());
        }
        self.device
            .render_image_region(image, screen, source, self.fill_color, scale, screen.center())?;
        Ok(())
    }

    /// Draw a line of text with its line box at `pos`, in the text color.
    pub fn text(&mut self, font: &dyn RenderFont, text: &str, pos: Pos<i32>) -> UiResult<()> {
        self.text_scaled(font, text, pos, 1.0, 1.0)
    }

    pub fn text_scaled(
        &mut self,
        font: &dyn RenderFont,
        text: &str,
        pos: Pos<i32>,
        size_x: f32,
        size_y: f32,
    ) -> UiResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let extent = Rect::new(
            pos.x,
            pos.y,
            (font.width(text) as f32 * size_x).ceil() as i32,
            (font.height() as f32 * size_y).ceil() as i32,
        );
        let screen = self.to_screen(extent);
        if self.culled(&screen) {
            return Ok(());
        }
        self.device.render_font(
            font,
            text,
            screen.position(),
            self.text_color,
            size_x,
            size_y,
        )?;
        Ok(())
    }

    /// Run `f` with drawing further restricted to `rect` (node-local).
    ///
    /// The device clip and the canvas clip are restored afterwards, also when
    /// `f` fails.
    pub fn with_clip<R>(
        &mut self,
        rect: Rect<i32>,
        f: impl FnOnce(&mut Canvas<'a>) -> UiResult<R>,
    ) -> UiResult<R> {
        let saved_canvas = self.clip;
        let saved_device = self.device.clip();

        let narrowed = self.clip.intersect(&self.to_screen(rect));
        self.device.enable_clip(
            narrowed.x,
            narrowed.y,
            narrowed.right(),
            narrowed.bottom(),
        )?;
        self.clip = narrowed;

        let result = f(self);

        self.clip = saved_canvas;
        let restored = self.device.restore_clip(saved_device);
        let value = result?;
        restored?;
        Ok(value)
    }
}

/// Bounding box of `rect` scaled by `scale` about its center.
fn scaled(rect: Rect<i32>, scale: f32) -> Rect<i32> {
    if scale == 1.0 || !scale.is_finite() {
        return rect;
    }
    let cx = rect.x as f32 + rect.width as f32 / 2.0;
    let cy = rect.y as f32 + rect.height as f32 / 2.0;
    let w = rect.width as f32 * scale;
    let h = rect.height as f32 * scale;
    Rect::from_corners(
        (cx - w / 2.0).floor() as i32,
        (cy - h / 2.0).floor() as i32,
        (cx + w / 2.0).ceil() as i32,
        (cy + h / 2.0).ceil() as i32,
    )
}
