//! Decoded images and the textured-quad rasterizer.

use std::any::Any;
use std::path::Path;

use tessera_core::{Pos, Rect};

use crate::blend::BlendMode;
use crate::color::Color;
use crate::device::{MouseCursor, RenderImage};
use crate::error::{RenderError, RenderResult};
use crate::software::framebuffer::Framebuffer;

/// An RGBA8 image held in memory by the software device.
#[derive(Debug, Clone)]
pub struct SoftwareImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
    filter_linear: bool,
}

impl SoftwareImage {
    /// Build an image from raw pixels. `pixels` must hold `width * height` entries.
    pub fn from_rgba(
        width: u32,
        height: u32,
        pixels: Vec<[u8; 4]>,
        filter_linear: bool,
    ) -> RenderResult<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(RenderError::Argument(format!(
                "expected {} pixels for a {}x{} image, got {}",
                width as usize * height as usize,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
            filter_linear,
        })
    }

    /// Decode an image file.
    pub fn load(path: &Path, filter_linear: bool) -> RenderResult<Self> {
        let decoded = ::image::open(path)
            .map_err(|e| RenderError::resource(path.display().to_string(), e))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        let pixels = decoded.pixels().map(|p| p.0).collect();
        Self::from_rgba(width, height, pixels, filter_linear)
    }

    pub fn filter_linear(&self) -> bool {
        self.filter_linear
    }

    pub fn bounds(&self) -> Rect<i32> {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    fn texel(&self, x: i32, y: i32) -> Color {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        Color::from(self.pixels[y * self.width as usize + x])
    }

    /// Sample at continuous image coordinates, restricted to `region`.
    fn sample(&self, x: f32, y: f32, region: &Rect<i32>) -> Color {
        let min_x = region.x as f32;
        let min_y = region.y as f32;
        let max_x = (region.right() - 1) as f32;
        let max_y = (region.bottom() - 1) as f32;

        if !self.filter_linear {
            let sx = x.floor().clamp(min_x, max_x) as i32;
            let sy = y.floor().clamp(min_y, max_y) as i32;
            return self.texel(sx, sy);
        }

        // Texel centers sit at +0.5
        let fx = (x - 0.5).clamp(min_x, max_x);
        let fy = (y - 0.5).clamp(min_y, max_y);
        let x0 = fx.floor() as i32;
        let y0 = fy.floor() as i32;
        let x1 = (x0 + 1).min(region.right() - 1);
        let y1 = (y0 + 1).min(region.bottom() - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let top = self.texel(x0, y0).lerp(self.texel(x1, y0), tx);
        let bottom = self.texel(x0, y1).lerp(self.texel(x1, y1), tx);
        top.lerp(bottom, ty)
    }
}

impl RenderImage for SoftwareImage {
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

/// A cursor image with its hotspot.
#[derive(Debug, Clone)]
pub struct SoftwareCursor {
    image: SoftwareImage,
    hotspot: Pos<i32>,
}

impl SoftwareCursor {
    pub fn new(image: SoftwareImage, hotspot: Pos<i32>) -> Self {
        Self { image, hotspot }
    }

    pub fn image(&self) -> &SoftwareImage {
        &self.image
    }
}

impl MouseCursor for SoftwareCursor {
    fn hotspot(&self) -> Pos<i32> {
        self.hotspot
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One textured quad: a region of an image mapped onto a surface rectangle.
pub(crate) struct TexturedQuad<'a> {
    pub image: &'a SoftwareImage,
    pub source: Rect<i32>,
    pub dest: Rect<i32>,
    pub tint: Color,
    pub scale: f32,
    pub center: Pos<i32>,
}

impl TexturedQuad<'_> {
    /// Rasterize into `target`, restricted to `clip`.
    pub fn draw(&self, target: &mut Framebuffer, clip: &Rect<i32>, mode: BlendMode) {
        if self.source.is_empty() || self.dest.is_empty() || self.scale <= 0.0 {
            return;
        }

        // Scale the destination about the center point
        let cx = self.center.x as f32;
        let cy = self.center.y as f32;
        let x0 = cx + (self.dest.x as f32 - cx) * self.scale;
        let y0 = cy + (self.dest.y as f32 - cy) * self.scale;
        let w = self.dest.width as f32 * self.scale;
        let h = self.dest.height as f32 * self.scale;
        if w <= 0.0 || h <= 0.0 {
            return;
        }

        let covered = Rect::from_corners(
            x0.floor() as i32,
            y0.floor() as i32,
            (x0 + w).ceil() as i32,
            (y0 + h).ceil() as i32,
        );
        let visible = covered.intersect(clip).intersect(&target.bounds());

        let sx_per_px = self.source.width as f32 / w;
        let sy_per_px = self.source.height as f32 / h;

        for py in visible.y..visible.bottom() {
            let cy_px = py as f32 + 0.5;
            if cy_px < y0 || cy_px >= y0 + h {
                continue;
            }
            let sy = self.source.y as f32 + (cy_px - y0) * sy_per_px;
            for px in visible.x..visible.right() {
                let cx_px = px as f32 + 0.5;
                if cx_px < x0 || cx_px >= x0 + w {
                    continue;
                }
                let sx = self.source.x as f32 + (cx_px - x0) * sx_per_px;
                let color = self.image.sample(sx, sy, &self.source).modulate(self.tint);
                target.blend(Pos::new(px, py), color, mode);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> SoftwareImage {
        SoftwareImage::from_rgba(
            2,
            2,
            vec![[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [255, 255, 255, 255]],
            false,
        )
        .unwrap()
    }

    #[test]
    fn pixel_count_must_match_dimensions() {
        let err = SoftwareImage::from_rgba(2, 2, vec![[0; 4]; 3], false).unwrap_err();
        assert!(err.is_argument());
    }

    #[test]
    fn nearest_sampling_picks_texels() {
        let image = checker();
        let region = image.bounds();
        assert_eq!(image.sample(0.2, 0.2, &region), Color::RED);
        assert_eq!(image.sample(1.7, 0.2, &region), Color::GREEN);
        assert_eq!(image.sample(0.2, 1.9, &region), Color::BLUE);
    }

    #[test]
    fn sampling_stays_inside_region() {
        let image = checker();
        let region = Rect::new(1, 1, 1, 1);
        assert_eq!(image.sample(0.0, 0.0, &region), Color::WHITE);
    }

    #[test]
    fn upscaled_blit_covers_destination() {
        let image = checker();
        let mut fb = Framebuffer::new(4, 4, Color::BLACK);
        let quad = TexturedQuad {
            image: &image,
            source: image.bounds(),
            dest: Rect::new(0, 0, 4, 4),
            tint: Color::WHITE,
            scale: 1.0,
            center: Pos::new(2, 2),
        };
        let clip = fb.bounds();
        quad.draw(&mut fb, &clip, BlendMode::Replace);
        assert_eq!(fb.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(3, 0), Some([0, 255, 0, 255]));
        assert_eq!(fb.pixel(3, 3), Some([255, 255, 255, 255]));
    }
}
