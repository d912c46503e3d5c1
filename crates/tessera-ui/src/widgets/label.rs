use std::any::Any;

use tessera_core::{HAlign, Size, VAlign};
use tessera_render::{Color, FontHandle, RenderFont};

use crate::behavior::{Behavior, Invalidation, NodeSetup};
use crate::canvas::{Canvas, CanvasPainter};
use crate::error::{UiError, UiResult};
use crate::text::TextRenderer;
use crate::tree::Node;

/// A single line of text.
///
/// The label's minimum size is the size of its text in its font. Changing
/// the text or font requests a relayout; color and alignment only repaint.
/// Measuring or painting a label without a font fails with
/// [`UiError::MissingFont`].
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    color: Color,
    font: Option<FontHandle>,
    halign: HAlign,
    valign: VAlign,
    invalidation: Invalidation,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Color::WHITE,
            font: None,
            halign: HAlign::Center,
            valign: VAlign::Center,
            invalidation: Invalidation::default(),
        }
    }

    pub fn with_font(mut self, font: FontHandle) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn font(&self) -> Option<&FontHandle> {
        self.font.as_ref()
    }

    pub fn halign(&self) -> HAlign {
        self.halign
    }

    pub fn valign(&self) -> VAlign {
        self.valign
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.invalidation.layout();
        }
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.invalidation.redraw();
    }

    pub fn set_font(&mut self, font: FontHandle) {
        self.font = Some(font);
        self.invalidation.layout();
    }

    pub fn set_halign(&mut self, halign: HAlign) {
        self.halign = halign;
        self.invalidation.redraw();
    }

    pub fn set_valign(&mut self, valign: VAlign) {
        self.valign = valign;
        self.invalidation.redraw();
    }

    pub fn set_align(&mut self, halign: HAlign, valign: VAlign) {
        self.set_halign(halign);
        self.set_valign(valign);
    }

    fn require_font(&self) -> UiResult<&dyn RenderFont> {
        self.font.as_deref().ok_or(UiError::MissingFont)
    }

    pub fn text_width(&self) -> UiResult<u32> {
        Ok(self.require_font()?.width(&self.text))
    }

    pub fn text_height(&self) -> UiResult<u32> {
        Ok(self.require_font()?.height())
    }

    fn label_of(node: &Node) -> UiResult<&Label> {
        node.behavior::<Label>().ok_or(UiError::WrongBehavior {
            node: node.id(),
            expected: "Label",
        })
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::new("")
    }
}

impl Behavior for Label {
    fn init(&mut self, node: &mut NodeSetup<'_>) {
        node.set_painter(LabelPainter);
        node.enable_min_size(|node| {
            let label = Label::label_of(node)?;
            Ok(Size::new(label.text_width()?, label.text_height()?))
        });
        node.default_style_class("label");
    }

    fn type_name(&self) -> &'static str {
        "Label"
    }

    fn take_invalidation(&mut self) -> crate::dirty::DirtyFlags {
        self.invalidation.take()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Draws a [`Label`]'s text aligned inside its node.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelPainter;

impl CanvasPainter for LabelPainter {
    fn paint(&self, node: &Node, canvas: &mut Canvas<'_>) -> UiResult<()> {
        let label = Label::label_of(node)?;
        let font = label.require_font()?;
        canvas.set_text_color(label.color);
        TextRenderer::new(font)
            .with_align(label.halign, label.valign)
            .draw(canvas, &label.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirty::DirtyFlags;
    use std::sync::Arc;
    use tessera_test_utils::FixedFont;

    #[test]
    fn defaults() {
        let label = Label::new("Hi");
        assert_eq!(label.color(), Color::WHITE);
        assert_eq!(label.halign(), HAlign::Center);
        assert_eq!(label.valign(), VAlign::Center);
        assert!(label.font().is_none());
    }

    #[test]
    fn metrics_need_a_font() {
        let label = Label::new("Hi");
        assert_eq!(label.text_width(), Err(UiError::MissingFont));

        let label = label.with_font(Arc::new(FixedFont::new(10, 10)));
        assert_eq!(label.text_width(), Ok(20));
        assert_eq!(label.text_height(), Ok(10));
    }

    #[test]
    fn setters_record_invalidation() {
        let mut label = Label::new("Hi");
        label.set_color(Color::RED);
        assert_eq!(label.take_invalidation(), DirtyFlags::REDRAW);

        label.set_text("Hello");
        assert_eq!(
            label.take_invalidation(),
            DirtyFlags::LAYOUT | DirtyFlags::REDRAW
        );

        label.set_text("Hello");
        assert_eq!(label.take_invalidation(), DirtyFlags::NONE);

        label.set_font(Arc::new(FixedFont::new(12, 12)));
        assert_eq!(
            label.take_invalidation(),
            DirtyFlags::LAYOUT | DirtyFlags::REDRAW
        );
    }
}
