//! Aligned single-line text placement.

use tessera_core::{HAlign, Pos, Size, VAlign};
use tessera_render::RenderFont;

use crate::canvas::Canvas;
use crate::error::UiResult;

/// Positions a run of text inside a box according to its alignment.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer<'f> {
    font: &'f dyn RenderFont,
    halign: HAlign,
    valign: VAlign,
    scale_x: f32,
    scale_y: f32,
}

impl<'f> TextRenderer<'f> {
    pub fn new(font: &'f dyn RenderFont) -> Self {
        Self {
            font,
            halign: HAlign::default(),
            valign: VAlign::default(),
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn with_align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Size of `text` at the configured scale.
    pub fn measure(&self, text: &str) -> Size<u32> {
        Size::new(
            (self.font.width(text) as f32 * self.scale_x).ceil() as u32,
            (self.font.height() as f32 * self.scale_y).ceil() as u32,
        )
    }

    /// Top-left corner of the line box of `text` inside a box of `area`.
    pub fn position(&self, text: &str, area: Size<u32>) -> Pos<i32> {
        let content = self.measure(text);
        Pos::new(
            self.halign
                .offset(area.width as i32, content.width as i32),
            self.valign
                .offset(area.height as i32, content.height as i32),
        )
    }

    /// Draw `text` aligned inside the canvas' node bounds.
    pub fn draw(&self, canvas: &mut Canvas<'_>, text: &str) -> UiResult<()> {
        let pos = self.position(text, canvas.size());
        canvas.text_scaled(self.font, text, pos, self.scale_x, self.scale_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    #[derive(Debug)]
    struct Mono;

    impl RenderFont for Mono {
        fn width(&self, text: &str) -> u32 {
            text.chars().count() as u32 * 8
        }

        fn height(&self) -> u32 {
            10
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn centered_by_default() {
        let renderer = TextRenderer::new(&Mono);
        assert_eq!(renderer.position("ab", Size::new(100, 30)), Pos::new(42, 10));
    }

    #[test]
    fn corner_alignments() {
        let area = Size::new(100, 30);
        let top_left = TextRenderer::new(&Mono).with_align(HAlign::Left, VAlign::Top);
        assert_eq!(top_left.position("ab", area), Pos::new(0, 0));

        let bottom_right = TextRenderer::new(&Mono).with_align(HAlign::Right, VAlign::Bottom);
        assert_eq!(bottom_right.position("ab", area), Pos::new(84, 20));
    }

    #[test]
    fn scale_multiplies_metrics() {
        let renderer = TextRenderer::new(&Mono).with_scale(2.0, 1.5);
        assert_eq!(renderer.measure("abc"), Size::new(48, 15));
    }
}
