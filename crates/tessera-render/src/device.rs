//! The backend-agnostic drawing surface.
//!
//! Everything above this module talks to pixels exclusively through
//! [`RenderDevice`]. A backend plugs into Tessera by implementing the trait
//! together with its three resource handle traits.
//!
//! # Coordinate system
//!
//! All coordinates are surface pixels with the origin in the top-left corner
//! and y increasing downward.
//!
//! # Frame bracket
//!
//! Drawing, clearing, blend and clip calls are only legal between
//! [`begin_frame`](RenderDevice::begin_frame) and
//! [`end_frame`](RenderDevice::end_frame). Resource creation, size queries and
//! cursor selection are legal at any time. Violations are reported as
//! [`RenderError::IllegalState`](crate::RenderError::IllegalState).
//!
//! # Degenerate geometry
//!
//! Quads, images and text with a non-positive width or height are skipped
//! silently. Layouts routinely produce empty boxes, so this is not an error.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use tessera_core::{Pos, Rect};

use crate::blend::BlendMode;
use crate::color::Color;
use crate::error::RenderResult;

/// A font owned by a backend.
///
/// Metric queries must be pure: the same text always yields the same width.
pub trait RenderFont: Any + Debug + Send + Sync {
    /// Width in pixels of `text` rendered at natural size.
    fn width(&self, text: &str) -> u32;

    /// Line height in pixels at natural size.
    fn height(&self) -> u32;

    fn as_any(&self) -> &dyn Any;
}

/// A decoded image owned by a backend.
pub trait RenderImage: Any + Debug + Send + Sync {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn as_any(&self) -> &dyn Any;
}

/// A pointer image owned by a backend.
pub trait MouseCursor: Any + Debug + Send + Sync {
    /// Offset of the pointer's active point inside the cursor image.
    fn hotspot(&self) -> Pos<i32>;

    fn as_any(&self) -> &dyn Any;
}

pub type FontHandle = Arc<dyn RenderFont>;
pub type ImageHandle = Arc<dyn RenderImage>;
pub type CursorHandle = Arc<dyn MouseCursor>;

/// Corner colors of a gradient quad, interpolated bilinearly across it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadColors {
    pub top_left: Color,
    pub top_right: Color,
    pub bottom_right: Color,
    pub bottom_left: Color,
}

impl QuadColors {
    pub fn uniform(color: Color) -> Self {
        Self {
            top_left: color,
            top_right: color,
            bottom_right: color,
            bottom_left: color,
        }
    }

    pub fn vertical(top: Color, bottom: Color) -> Self {
        Self {
            top_left: top,
            top_right: top,
            bottom_right: bottom,
            bottom_left: bottom,
        }
    }

    pub fn horizontal(left: Color, right: Color) -> Self {
        Self {
            top_left: left,
            top_right: right,
            bottom_right: right,
            bottom_left: left,
        }
    }

    /// Color at normalized position `(u, v)` inside the quad.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let top = self.top_left.lerp(self.top_right, u);
        let bottom = self.bottom_left.lerp(self.bottom_right, u);
        top.lerp(bottom, v)
    }
}

/// Backend-agnostic drawing surface.
pub trait RenderDevice {
    /// Load an image. `filter_linear` selects bilinear rather than nearest
    /// sampling and is fixed for the image's lifetime.
    fn create_image(&mut self, path: &str, filter_linear: bool) -> RenderResult<ImageHandle>;

    /// Load a font.
    fn create_font(&mut self, path: &str) -> RenderResult<FontHandle>;

    /// Load a cursor image whose active point is `(hotspot_x, hotspot_y)`.
    fn create_mouse_cursor(
        &mut self,
        path: &str,
        hotspot_x: i32,
        hotspot_y: i32,
    ) -> RenderResult<CursorHandle>;

    /// Current surface width; reflects resizes immediately.
    fn width(&self) -> u32;

    /// Current surface height; reflects resizes immediately.
    fn height(&self) -> u32;

    fn begin_frame(&mut self) -> RenderResult<()>;

    fn end_frame(&mut self) -> RenderResult<()>;

    /// Reset the whole surface to the device's background color.
    fn clear(&mut self) -> RenderResult<()>;

    /// Mode applied to every following draw call until changed again.
    fn set_blend_mode(&mut self, mode: BlendMode) -> RenderResult<()>;

    fn blend_mode(&self) -> BlendMode;

    /// Fill `rect` with a flat color.
    fn render_quad(&mut self, rect: Rect<i32>, color: Color) -> RenderResult<()>;

    /// Fill `rect` with colors interpolated between its four corners.
    fn render_quad_gradient(&mut self, rect: Rect<i32>, colors: QuadColors) -> RenderResult<()>;

    /// Blit the whole image stretched over `dest`, tinted by `color` and
    /// scaled by `scale` about the center of `dest`.
    fn render_image(
        &mut self,
        image: &dyn RenderImage,
        dest: Rect<i32>,
        color: Color,
        scale: f32,
    ) -> RenderResult<()>;

    /// Blit the `source` region of the image stretched over `dest`, tinted by
    /// `color` and scaled by `scale` about the surface point `center`.
    ///
    /// A `source` region outside the image bounds is an argument error.
    fn render_image_region(
        &mut self,
        image: &dyn RenderImage,
        dest: Rect<i32>,
        source: Rect<i32>,
        color: Color,
        scale: f32,
        center: Pos<i32>,
    ) -> RenderResult<()>;

    /// Draw a single line of text whose line box starts at `pos`.
    ///
    /// `size_x` and `size_y` scale the font's natural metrics independently.
    fn render_font(
        &mut self,
        font: &dyn RenderFont,
        text: &str,
        pos: Pos<i32>,
        color: Color,
        size_x: f32,
        size_y: f32,
    ) -> RenderResult<()>;

    /// Restrict drawing to the rectangle spanned by the two corners.
    ///
    /// There is a single active clip rectangle: enabling a new one replaces
    /// the previous one. Callers that nest clips save and restore themselves.
    fn enable_clip(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> RenderResult<()>;

    fn disable_clip(&mut self) -> RenderResult<()>;

    /// The active clip rectangle, if any.
    fn clip(&self) -> Option<Rect<i32>>;

    /// Use `cursor` as the pointer image.
    ///
    /// Legal outside a frame; backends must not report `IllegalState` here.
    fn enable_mouse_cursor(&mut self, cursor: &CursorHandle) -> RenderResult<()>;

    /// Revert to the platform's default pointer. Legal outside a frame.
    fn disable_mouse_cursor(&mut self) -> RenderResult<()>;

    /// Restore a previously saved clip state.
    fn restore_clip(&mut self, clip: Option<Rect<i32>>) -> RenderResult<()> {
        match clip {
            Some(rect) => self.enable_clip(rect.x, rect.y, rect.right(), rect.bottom()),
            None => self.disable_clip(),
        }
    }
}

/// Downcast a backend handle, failing with an argument error when the handle
/// belongs to a different backend.
pub fn downcast_handle<'a, T: Any>(handle: &'a dyn Any, kind: &str) -> RenderResult<&'a T> {
    handle.downcast_ref::<T>().ok_or_else(|| {
        crate::RenderError::Argument(format!(
            "{} handle was not created by this device (expected {})",
            kind,
            std::any::type_name::<T>()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_corners_sample_exactly() {
        let colors = QuadColors {
            top_left: Color::RED,
            top_right: Color::GREEN,
            bottom_right: Color::BLUE,
            bottom_left: Color::BLACK,
        };
        assert_eq!(colors.sample(0.0, 0.0), Color::RED);
        assert_eq!(colors.sample(1.0, 0.0), Color::GREEN);
        assert_eq!(colors.sample(1.0, 1.0), Color::BLUE);
        assert_eq!(colors.sample(0.0, 1.0), Color::BLACK);
    }

    #[test]
    fn uniform_gradient_is_flat() {
        let colors = QuadColors::uniform(Color::WHITE);
        assert_eq!(colors.sample(0.3, 0.8), Color::WHITE);
    }
}
