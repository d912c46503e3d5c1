//! Bitmap fonts in the AngelCode BMFont text format.
//!
//! Only the lines needed for layout and rendering are interpreted:
//!
//! ```text
//! common lineHeight=16 base=12
//! page id=0 file="font_0.png"
//! char id=72 x=0 y=0 width=8 height=12 xoffset=0 yoffset=2 xadvance=9 page=0
//! kerning first=72 second=105 amount=-1
//! ```
//!
//! Everything else (`info`, `chars`, `kernings`, unknown keys) is ignored.

use std::any::Any;
use std::path::Path;

use tessera_core::alloc::HashMap;
use tessera_core::{Pos, Rect};

use crate::blend::BlendMode;
use crate::color::Color;
use crate::device::RenderFont;
use crate::error::{RenderError, RenderResult};
use crate::software::framebuffer::Framebuffer;
use crate::software::image::{SoftwareImage, TexturedQuad};

/// Placement of one glyph on a font page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_advance: i32,
    pub page: usize,
}

/// Parsed contents of a BMFont text descriptor.
#[derive(Debug, Clone, Default)]
pub struct FontDescriptor {
    pub line_height: u32,
    pub base: u32,
    /// Page image file names, indexed by page id.
    pub pages: Vec<String>,
    pub glyphs: HashMap<char, Glyph>,
    pub kernings: HashMap<(char, char), i32>,
}

impl FontDescriptor {
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut descriptor = FontDescriptor::default();
        let mut saw_common = false;

        for (line_no, line) in source.lines().enumerate() {
            let mut tokens = tokenize(line).into_iter();
            let Some(tag) = tokens.next() else {
                continue;
            };
            let attrs: HashMap<String, String> = tokens
                .filter_map(|token| {
                    token
                        .split_once('=')
                        .map(|(k, v)| (k.to_string(), v.trim_matches('"').to_string()))
                })
                .collect();
            let line_no = line_no + 1;

            match tag.as_str() {
                "common" => {
                    descriptor.line_height = int_attr(&attrs, "lineHeight", line_no)? as u32;
                    descriptor.base = int_attr(&attrs, "base", line_no).unwrap_or(0).max(0) as u32;
                    saw_common = true;
                }
                "page" => {
                    let id = int_attr(&attrs, "id", line_no)? as usize;
                    let file = attrs
                        .get("file")
                        .ok_or_else(|| format!("line {}: page without file", line_no))?;
                    if descriptor.pages.len() <= id {
                        descriptor.pages.resize(id + 1, String::new());
                    }
                    descriptor.pages[id] = file.clone();
                }
                "char" => {
                    let id = int_attr(&attrs, "id", line_no)?;
                    let ch = char::from_u32(id as u32)
                        .ok_or_else(|| format!("line {}: invalid char id {}", line_no, id))?;
                    let glyph = Glyph {
                        x: int_attr(&attrs, "x", line_no)?,
                        y: int_attr(&attrs, "y", line_no)?,
                        width: int_attr(&attrs, "width", line_no)?,
                        height: int_attr(&attrs, "height", line_no)?,
                        x_offset: int_attr(&attrs, "xoffset", line_no).unwrap_or(0),
                        y_offset: int_attr(&attrs, "yoffset", line_no).unwrap_or(0),
                        x_advance: int_attr(&attrs, "xadvance", line_no)?,
                        page: int_attr(&attrs, "page", line_no).unwrap_or(0).max(0) as usize,
                    };
                    descriptor.glyphs.insert(ch, glyph);
                }
                "kerning" => {
                    let first = int_attr(&attrs, "first", line_no)?;
                    let second = int_attr(&attrs, "second", line_no)?;
                    let amount = int_attr(&attrs, "amount", line_no)?;
                    if let (Some(a), Some(b)) =
                        (char::from_u32(first as u32), char::from_u32(second as u32))
                    {
                        descriptor.kernings.insert((a, b), amount);
                    }
                }
                _ => {}
            }
        }

        if !saw_common {
            return Err("missing 'common' line".into());
        }
        Ok(descriptor)
    }

    fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch).or_else(|| self.glyphs.get(&'?'))
    }

    fn kerning(&self, previous: Option<char>, ch: char) -> i32 {
        previous
            .and_then(|p| self.kernings.get(&(p, ch)).copied())
            .unwrap_or(0)
    }

    /// Width of `text` at natural size: advances plus kerning.
    pub fn text_width(&self, text: &str) -> u32 {
        let mut width = 0i32;
        let mut previous = None;
        for ch in text.chars() {
            if let Some(glyph) = self.glyph(ch) {
                width += glyph.x_advance + self.kerning(previous, ch);
            }
            previous = Some(ch);
        }
        width.max(0) as u32
    }
}

/// Split a descriptor line on whitespace, keeping quoted values intact.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                current.push(ch);
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn int_attr(attrs: &HashMap<String, String>, key: &str, line_no: usize) -> Result<i32, String> {
    let raw = attrs
        .get(key)
        .ok_or_else(|| format!("line {}: missing '{}'", line_no, key))?;
    raw.parse::<i32>()
        .map_err(|_| format!("line {}: '{}' is not an integer: {}", line_no, key, raw))
}

/// A BMFont loaded by the software device.
#[derive(Debug)]
pub struct SoftwareFont {
    descriptor: FontDescriptor,
    pages: Vec<SoftwareImage>,
}

impl SoftwareFont {
    pub fn new(descriptor: FontDescriptor, pages: Vec<SoftwareImage>) -> RenderResult<Self> {
        if let Some(glyph) = descriptor.glyphs.values().find(|g| g.page >= pages.len()) {
            return Err(RenderError::Argument(format!(
                "glyph references page {} but only {} page(s) were supplied",
                glyph.page,
                pages.len()
            )));
        }
        Ok(Self { descriptor, pages })
    }

    /// Load a descriptor and its page images. Page files are resolved
    /// relative to the descriptor's directory.
    pub fn load(path: &Path) -> RenderResult<Self> {
        let display = path.display().to_string();
        let source =
            std::fs::read_to_string(path).map_err(|e| RenderError::resource(&display, e))?;
        let descriptor =
            FontDescriptor::parse(&source).map_err(|e| RenderError::resource(&display, e))?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let pages = descriptor
            .pages
            .iter()
            .map(|file| SoftwareImage::load(&dir.join(file), true))
            .collect::<RenderResult<Vec<_>>>()?;

        Self::new(descriptor, pages).map_err(|e| RenderError::resource(display, e))
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    /// Rasterize `text` with its line box starting at `pos`.
    pub(crate) fn draw(
        &self,
        target: &mut Framebuffer,
        clip: &Rect<i32>,
        mode: BlendMode,
        text: &str,
        pos: Pos<i32>,
        color: Color,
        size: (f32, f32),
    ) {
        let (size_x, size_y) = size;
        let mut pen_x = pos.x as f32;
        let mut previous = None;

        for ch in text.chars() {
            let Some(glyph) = self.descriptor.glyph(ch) else {
                previous = Some(ch);
                continue;
            };
            pen_x += self.descriptor.kerning(previous, ch) as f32 * size_x;

            let dest = Rect::new(
                (pen_x + glyph.x_offset as f32 * size_x).round() as i32,
                (pos.y as f32 + glyph.y_offset as f32 * size_y).round() as i32,
                (glyph.width as f32 * size_x).round() as i32,
                (glyph.height as f32 * size_y).round() as i32,
            );
            let quad = TexturedQuad {
                image: &self.pages[glyph.page],
                source: Rect::new(glyph.x, glyph.y, glyph.width, glyph.height),
                dest,
                tint: color,
                scale: 1.0,
                center: dest.position(),
            };
            quad.draw(target, clip, mode);

            pen_x += glyph.x_advance as f32 * size_x;
            previous = Some(ch);
        }
    }
}

impl RenderFont for SoftwareFont {
    fn width(&self, text: &str) -> u32 {
        self.descriptor.text_width(text)
    }

    fn height(&self) -> u32 {
        self.descriptor.line_height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"info face="Test Sans" size=16 bold=0
common lineHeight=16 base=12 scaleW=64 scaleH=64 pages=1
page id=0 file="test_0.png"
chars count=3
char id=72   x=0  y=0 width=8 height=12 xoffset=0 yoffset=2 xadvance=9 page=0 chnl=15
char id=105  x=8  y=0 width=3 height=12 xoffset=1 yoffset=2 xadvance=4 page=0 chnl=15
char id=63   x=11 y=0 width=6 height=12 xoffset=0 yoffset=2 xadvance=7 page=0 chnl=15
kernings count=1
kerning first=72 second=105 amount=-1
"#;

    #[test]
    fn parses_common_pages_and_glyphs() {
        let d = FontDescriptor::parse(DESCRIPTOR).unwrap();
        assert_eq!(d.line_height, 16);
        assert_eq!(d.base, 12);
        assert_eq!(d.pages, vec!["test_0.png".to_string()]);
        assert_eq!(d.glyphs.len(), 3);
        assert_eq!(d.glyphs[&'i'].x_advance, 4);
        assert_eq!(d.kernings[&('H', 'i')], -1);
    }

    #[test]
    fn width_applies_advance_and_kerning() {
        let d = FontDescriptor::parse(DESCRIPTOR).unwrap();
        assert_eq!(d.text_width("H"), 9);
        assert_eq!(d.text_width("Hi"), 9 + 4 - 1);
        assert_eq!(d.text_width(""), 0);
    }

    #[test]
    fn unknown_chars_fall_back_to_question_mark() {
        let d = FontDescriptor::parse(DESCRIPTOR).unwrap();
        assert_eq!(d.text_width("Z"), 7);
    }

    #[test]
    fn quoted_values_may_contain_spaces() {
        assert_eq!(
            tokenize(r#"info face="Test Sans" size=16"#),
            vec!["info", r#"face="Test Sans""#, "size=16"]
        );
    }

    #[test]
    fn missing_common_is_rejected() {
        assert!(FontDescriptor::parse("char id=65 x=0 y=0 width=1 height=1 xadvance=1").is_err());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = FontDescriptor::parse("common lineHeight=tall base=1").unwrap_err();
        assert!(err.contains("lineHeight"));
    }

    #[test]
    fn glyph_pages_must_exist() {
        let d = FontDescriptor::parse(DESCRIPTOR).unwrap();
        assert!(SoftwareFont::new(d, Vec::new()).is_err());
    }
}
