//! A render device that records calls instead of drawing.

use std::sync::Arc;

use parking_lot::Mutex;
use tessera_core::alloc::HashMap;
use tessera_core::{Pos, Rect};
use tessera_render::device::downcast_handle;
use tessera_render::{
    BlendMode, Color, CursorHandle, FontHandle, FrameTracker, ImageHandle, QuadColors,
    RenderDevice, RenderError, RenderFont, RenderImage, RenderResult,
};

use crate::fakes::{FakeCursor, FakeImage, FixedFont};

/// A recorded device call.
///
/// Draw calls capture the blend mode and clip rectangle that were active
/// when they were issued, so tests can check state without replaying the log.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateImage {
        path: String,
        filter_linear: bool,
    },
    CreateFont {
        path: String,
    },
    CreateMouseCursor {
        path: String,
        hotspot: Pos<i32>,
    },
    BeginFrame,
    EndFrame,
    Clear,
    SetBlendMode(BlendMode),
    Quad {
        rect: Rect<i32>,
        color: Color,
        blend: BlendMode,
        clip: Option<Rect<i32>>,
    },
    QuadGradient {
        rect: Rect<i32>,
        colors: QuadColors,
        blend: BlendMode,
        clip: Option<Rect<i32>>,
    },
    ImageRegion {
        dest: Rect<i32>,
        source: Rect<i32>,
        color: Color,
        scale: f32,
        center: Pos<i32>,
        blend: BlendMode,
        clip: Option<Rect<i32>>,
    },
    Text {
        text: String,
        pos: Pos<i32>,
        color: Color,
        size_x: f32,
        size_y: f32,
        blend: BlendMode,
        clip: Option<Rect<i32>>,
    },
    EnableClip(Rect<i32>),
    DisableClip,
    EnableMouseCursor {
        hotspot: Pos<i32>,
    },
    DisableMouseCursor,
}

impl DeviceCall {
    /// True for calls that put pixels on the surface.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            DeviceCall::Quad { .. }
                | DeviceCall::QuadGradient { .. }
                | DeviceCall::ImageRegion { .. }
                | DeviceCall::Text { .. }
        )
    }
}

/// Shared handle to a device's call log.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<DeviceCall>>>,
}

impl CallLog {
    fn push(&self, call: DeviceCall) {
        self.calls.lock().push(call);
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().clone()
    }

    /// Recorded draw calls only.
    pub fn draw_calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().iter().filter(|c| c.is_draw()).cloned().collect()
    }

    pub fn count(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| predicate(c)).count()
    }

    /// Strings passed to `render_font`, in call order.
    pub fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                DeviceCall::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// A [`RenderDevice`] that enforces the device protocol and records every
/// successful call in a [`CallLog`].
///
/// Resources are served from an in-memory table filled with
/// [`with_font`](Self::with_font) and [`with_image`](Self::with_image); any
/// other path fails with a resource error.
#[derive(Debug)]
pub struct RecordingRenderDevice {
    width: u32,
    height: u32,
    log: CallLog,
    frame: FrameTracker,
    blend_mode: BlendMode,
    clip: Option<Rect<i32>>,
    fonts: HashMap<String, Arc<FixedFont>>,
    images: HashMap<String, FakeImage>,
    cursor: Option<CursorHandle>,
}

impl RecordingRenderDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            log: CallLog::default(),
            frame: FrameTracker::new(),
            blend_mode: BlendMode::default(),
            clip: None,
            fonts: HashMap::new(),
            images: HashMap::new(),
            cursor: None,
        }
    }

    pub fn with_font(mut self, path: impl Into<String>, font: FixedFont) -> Self {
        self.fonts.insert(path.into(), Arc::new(font));
        self
    }

    pub fn with_image(mut self, path: impl Into<String>, image: FakeImage) -> Self {
        self.images.insert(path.into(), image);
        self
    }

    /// A handle to the call log that stays valid while the device is borrowed.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn in_frame(&self) -> bool {
        self.frame.is_active()
    }

    pub fn active_cursor(&self) -> Option<&CursorHandle> {
        self.cursor.as_ref()
    }

    fn image(&self, path: &str) -> RenderResult<FakeImage> {
        self.images
            .get(path)
            .copied()
            .ok_or_else(|| RenderError::resource(path, "no such image registered"))
    }
}

impl RenderDevice for RecordingRenderDevice {
    fn create_image(&mut self, path: &str, filter_linear: bool) -> RenderResult<ImageHandle> {
        let image = self.image(path)?;
        self.log.push(DeviceCall::CreateImage {
            path: path.to_string(),
            filter_linear,
        });
        Ok(Arc::new(image))
    }

    fn create_font(&mut self, path: &str) -> RenderResult<FontHandle> {
        let font = self
            .fonts
            .get(path)
            .cloned()
            .ok_or_else(|| RenderError::resource(path, "no such font registered"))?;
        self.log.push(DeviceCall::CreateFont {
            path: path.to_string(),
        });
        Ok(font as FontHandle)
    }

    fn create_mouse_cursor(
        &mut self,
        path: &str,
        hotspot_x: i32,
        hotspot_y: i32,
    ) -> RenderResult<CursorHandle> {
        let image = self.image(path)?;
        let hotspot = Pos::new(hotspot_x, hotspot_y);
        self.log.push(DeviceCall::CreateMouseCursor {
            path: path.to_string(),
            hotspot,
        });
        Ok(Arc::new(FakeCursor { image, hotspot }))
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn begin_frame(&mut self) -> RenderResult<()> {
        self.frame.begin()?;
        self.log.push(DeviceCall::BeginFrame);
        Ok(())
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        self.frame.end()?;
        self.log.push(DeviceCall::EndFrame);
        Ok(())
    }

    fn clear(&mut self) -> RenderResult<()> {
        self.frame.ensure_active("clear")?;
        self.log.push(DeviceCall::Clear);
        Ok(())
    }

    fn set_blend_mode(&mut self, mode: BlendMode) -> RenderResult<()> {
        self.frame.ensure_active("set_blend_mode")?;
        self.blend_mode = mode;
        self.log.push(DeviceCall::SetBlendMode(mode));
        Ok(())
    }

    fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    fn render_quad(&mut self, rect: Rect<i32>, color: Color) -> RenderResult<()> {
        self.frame.ensure_active("render_quad")?;
        self.log.push(DeviceCall::Quad {
            rect,
            color,
            blend: self.blend_mode,
            clip: self.clip,
        });
        Ok(())
    }

    fn render_quad_gradient(&mut self, rect: Rect<i32>, colors: QuadColors) -> RenderResult<()> {
        self.frame.ensure_active("render_quad_gradient")?;
        self.log.push(DeviceCall::QuadGradient {
            rect,
            colors,
            blend: self.blend_mode,
            clip: self.clip,
        });
        Ok(())
    }

    fn render_image(
        &mut self,
        image: &dyn RenderImage,
        dest: Rect<i32>,
        color: Color,
        scale: f32,
    ) -> RenderResult<()> {
        let source = Rect::new(0, 0, image.width() as i32, image.height() as i32);
        let center = Pos::new(dest.x + dest.width / 2, dest.y + dest.height / 2);
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
        let image = downcast_handle::<FakeImage>(image.as_any(), "image")?;
        let bounds = Rect::new(0, 0, image.width as i32, image.height as i32);
        if source.width < 0 || source.height < 0 || !bounds.contains_rect(&source) {
            return Err(RenderError::Argument(format!(
                "source region {:?} exceeds image bounds {:?}",
                source, bounds
            )));
        }
        self.log.push(DeviceCall::ImageRegion {
            dest,
            source,
            color,
            scale,
            center,
            blend: self.blend_mode,
            clip: self.clip,
        });
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
        downcast_handle::<FixedFont>(font.as_any(), "font")?;
        self.log.push(DeviceCall::Text {
            text: text.to_string(),
            pos,
            color,
            size_x,
            size_y,
            blend: self.blend_mode,
            clip: self.clip,
        });
        Ok(())
    }

    fn enable_clip(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> RenderResult<()> {
        self.frame.ensure_active("enable_clip")?;
        let rect = Rect::from_corners(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1));
        self.clip = Some(rect);
        self.log.push(DeviceCall::EnableClip(rect));
        Ok(())
    }

    fn disable_clip(&mut self) -> RenderResult<()> {
        self.frame.ensure_active("disable_clip")?;
        self.clip = None;
        self.log.push(DeviceCall::DisableClip);
        Ok(())
    }

    fn clip(&self) -> Option<Rect<i32>> {
        self.clip
    }

    fn enable_mouse_cursor(&mut self, cursor: &CursorHandle) -> RenderResult<()> {
        let fake = downcast_handle::<FakeCursor>(cursor.as_any(), "cursor")?;
        self.log.push(DeviceCall::EnableMouseCursor {
            hotspot: fake.hotspot,
        });
        self.cursor = Some(Arc::clone(cursor));
        Ok(())
    }

    fn disable_mouse_cursor(&mut self) -> RenderResult<()> {
        self.cursor = None;
        self.log.push(DeviceCall::DisableMouseCursor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_draws_with_active_state() {
        let mut device = RecordingRenderDevice::new(100, 100);
        let log = device.log();

        device.begin_frame().unwrap();
        device.set_blend_mode(BlendMode::Additive).unwrap();
        device.enable_clip(0, 0, 10, 10).unwrap();
        device.render_quad(Rect::new(1, 1, 2, 2), Color::RED).unwrap();
        device.end_frame().unwrap();

        assert_eq!(
            log.draw_calls(),
            vec![DeviceCall::Quad {
                rect: Rect::new(1, 1, 2, 2),
                color: Color::RED,
                blend: BlendMode::Additive,
                clip: Some(Rect::new(0, 0, 10, 10)),
            }]
        );
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn rejected_calls_are_not_recorded() {
        let mut device = RecordingRenderDevice::new(10, 10);
        let log = device.log();
        assert!(device.render_quad(Rect::new(0, 0, 1, 1), Color::RED).is_err());
        assert!(device.create_font("missing.fnt").unwrap_err().is_resource());
        assert!(log.is_empty());
    }

    #[test]
    fn foreign_font_handles_are_rejected() {
        #[derive(Debug)]
        struct OtherFont;
        impl RenderFont for OtherFont {
            fn width(&self, _: &str) -> u32 {
                0
            }
            fn height(&self) -> u32 {
                0
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        let mut device = RecordingRenderDevice::new(10, 10);
        device.begin_frame().unwrap();
        let err = device
            .render_font(&OtherFont, "x", Pos::new(0, 0), Color::WHITE, 1.0, 1.0)
            .unwrap_err();
        assert!(err.is_argument());
    }

    #[test]
    fn registered_resources_are_served() {
        let mut device = RecordingRenderDevice::new(10, 10)
            .with_font("a.fnt", FixedFont::new(6, 8))
            .with_image("a.png", FakeImage::new(4, 4));

        assert_eq!(device.create_font("a.fnt").unwrap().height(), 8);
        assert_eq!(device.create_image("a.png", true).unwrap().width(), 4);
        let cursor = device.create_mouse_cursor("a.png", 1, 1).unwrap();
        device.enable_mouse_cursor(&cursor).unwrap();
        assert!(device.active_cursor().is_some());
    }
}
