//! RGBA8 pixel storage and per-pixel blending.

use tessera_core::{Pos, Rect};

use crate::blend::BlendMode;
use crate::color::Color;

/// A row-major RGBA8 framebuffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill.to_rgba_u8(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect<i32> {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Reallocate to a new size. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32, fill: Color) {
        *self = Self::new(width, height, fill);
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color.to_rgba_u8());
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        self.index(Pos::new(x, y)).map(|i| self.pixels[i])
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// The framebuffer as tightly packed RGBA bytes, ready for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Blend `src` into the pixel at `pos`. Positions outside the buffer are ignored.
    pub fn blend(&mut self, pos: Pos<i32>, src: Color, mode: BlendMode) {
        let Some(i) = self.index(pos) else {
            return;
        };
        let dst = Color::from(self.pixels[i]);
        self.pixels[i] = blend_color(src, dst, mode).to_rgba_u8();
    }

    fn index(&self, pos: Pos<i32>) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i32 || pos.y >= self.height as i32 {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }
}

/// Combine a source and destination color according to `mode`.
pub fn blend_color(src: Color, dst: Color, mode: BlendMode) -> Color {
    match mode {
        BlendMode::Replace => src,
        BlendMode::Alpha => {
            let inv = 1.0 - src.a;
            Color::rgba(
                src.r * src.a + dst.r * inv,
                src.g * src.a + dst.g * inv,
                src.b * src.a + dst.b * inv,
                src.a + dst.a * inv,
            )
        }
        BlendMode::Additive => Color::rgba(
            (dst.r + src.r * src.a).min(1.0),
            (dst.g + src.g * src.a).min(1.0),
            (dst.b + src.b * src.a).min(1.0),
            (dst.a + src.a).min(1.0),
        ),
        BlendMode::Multiply => src.modulate(dst),
    }
}
