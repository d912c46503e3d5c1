//! Resource handles with fixed, predictable metrics.

use std::any::Any;

use tessera_core::Pos;
use tessera_core::alloc::HashMap;
use tessera_render::{MouseCursor, RenderFont, RenderImage};

/// A monospaced font: every character is `char_width` pixels wide unless
/// overridden with [`with_glyph_width`](Self::with_glyph_width).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedFont {
    char_width: u32,
    height: u32,
    overrides: HashMap<char, u32>,
}

impl FixedFont {
    pub fn new(char_width: u32, height: u32) -> Self {
        Self {
            char_width,
            height,
            overrides: HashMap::new(),
        }
    }

    pub fn with_glyph_width(mut self, ch: char, width: u32) -> Self {
        self.overrides.insert(ch, width);
        self
    }
}

impl RenderFont for FixedFont {
    fn width(&self, text: &str) -> u32 {
        text.chars()
            .map(|ch| self.overrides.get(&ch).copied().unwrap_or(self.char_width))
            .sum()
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An image with dimensions but no pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeImage {
    pub width: u32,
    pub height: u32,
}

impl FakeImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl RenderImage for FakeImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeCursor {
    pub image: FakeImage,
    pub hotspot: Pos<i32>,
}

impl MouseCursor for FakeCursor {
    fn hotspot(&self) -> Pos<i32> {
        self.hotspot
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
