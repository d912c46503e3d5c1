use std::fmt;
use std::str::FromStr;

/// An RGBA color with `f32` components in the `0.0..=1.0` range.
///
/// Colors can be constructed from floats, `u8` values, hex codes or parsed
/// from style-sheet notation:
///
/// ```
/// use tessera_render::Color;
///
/// let red = Color::rgb(1.0, 0.0, 0.0);
/// let from_hex = Color::from_hex(0xFF8800);
/// let parsed: Color = "#ff880080".parse().unwrap();
/// assert_eq!(parsed.to_rgba_u8(), [255, 136, 0, 128]);
/// ```
///
/// The struct is `#[repr(C)]` and implements `bytemuck::Pod`, so backends can
/// hand slices of colors straight to vertex or uniform buffers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from RGB components with full opacity (alpha = 1.0).
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGBA values (0–255 mapped to 0.0–1.0).
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create a color from 8-bit RGB values with full opacity.
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Create a color from a 24-bit RGB hex value (e.g. `0xFF8800`).
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as u8;
        let g = ((hex >> 8) & 0xFF) as u8;
        let b = (hex & 0xFF) as u8;
        Self::from_rgb_u8(r, g, b)
    }

    /// Create a color from a 32-bit RGBA hex value (e.g. `0xFF880080`).
    pub fn from_hex_alpha(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as u8;
        let g = ((hex >> 16) & 0xFF) as u8;
        let b = ((hex >> 8) & 0xFF) as u8;
        let a = (hex & 0xFF) as u8;
        Self::from_rgba_u8(r, g, b, a)
    }

    /// Scale each channel to `0..=255`, clamping out-of-range input.
    pub fn to_rgba_u8(self) -> [u8; 4] {
        fn channel(v: f32) -> u8 {
            // NaN clamps to 0
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }

    /// Convert to an `[r, g, b, a]` array.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise product, used to tint image and glyph samples.
    pub fn modulate(self, other: Color) -> Self {
        Self {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
            a: self.a * other.a,
        }
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    pub fn lerp(self, other: Color, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Color {
    fn from(arr: [f32; 4]) -> Self {
        Self {
            r: arr[0],
            g: arr[1],
            b: arr[2],
            a: arr[3],
        }
    }
}

impl From<[u8; 4]> for Color {
    fn from(arr: [u8; 4]) -> Self {
        Self::from_rgba_u8(arr[0], arr[1], arr[2], arr[3])
    }
}

impl From<Color> for [f32; 4] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{value}': expected #rgb, #rgba, #rrggbb, #rrggbbaa or a color name")]
pub struct ParseColorError {
    pub value: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` or one of the named colors.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let err = || ParseColorError {
            value: value.to_string(),
        };

        let Some(hex) = value.strip_prefix('#') else {
            return match value.to_ascii_lowercase().as_str() {
                "white" => Ok(Color::WHITE),
                "black" => Ok(Color::BLACK),
                "red" => Ok(Color::RED),
                "green" => Ok(Color::GREEN),
                "blue" => Ok(Color::BLUE),
                "transparent" => Ok(Color::TRANSPARENT),
                _ => Err(err()),
            };
        };

        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let bits = u32::from_str_radix(hex, 16).map_err(|_| err())?;

        match hex.len() {
            // Short forms repeat each nibble: #f80 == #ff8800
            3 => Ok(Color::from_hex(expand_nibbles(bits, 3))),
            4 => Ok(Color::from_hex_alpha(expand_nibbles(bits, 4))),
            6 => Ok(Color::from_hex(bits)),
            8 => Ok(Color::from_hex_alpha(bits)),
            _ => Err(err()),
        }
    }
}

fn expand_nibbles(bits: u32, count: u32) -> u32 {
    (0..count).rev().fold(0, |acc, i| {
        let nibble = (bits >> (i * 4)) & 0xF;
        (acc << 8) | (nibble << 4) | nibble
    })
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba_u8();
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_long_and_short_hex() {
        assert_eq!("#FFFFFF".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!("#fff".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!("#f00f".parse::<Color>(), Ok(Color::RED));
        assert_eq!("#00000000".parse::<Color>(), Ok(Color::TRANSPARENT));
        assert_eq!(
            "#f80".parse::<Color>().map(Color::to_rgba_u8),
            Ok([255, 136, 0, 255])
        );
    }

    #[test]
    fn parse_named() {
        assert_eq!("black".parse::<Color>(), Ok(Color::BLACK));
        assert_eq!("White".parse::<Color>(), Ok(Color::WHITE));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("#ggg".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#+12".parse::<Color>().is_err());
        assert!("chartreuse".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn channel_scaling_stays_in_bounds() {
        let steps = [0.0, 0.001, 0.25, 0.5, 0.999, 1.0];
        for &r in &steps {
            for &g in &steps {
                for &b in &steps {
                    for &a in &steps {
                        let bytes = Color::rgba(r, g, b, a).to_rgba_u8();
                        let back = Color::from(bytes);
                        assert!((back.r - r).abs() <= 0.5 / 255.0 + f32::EPSILON);
                        assert!((back.a - a).abs() <= 0.5 / 255.0 + f32::EPSILON);
                    }
                }
            }
        }
    }

    #[test]
    fn channel_scaling_clamps_out_of_range() {
        assert_eq!(Color::rgba(1.5, -0.5, f32::NAN, 2.0).to_rgba_u8(), [255, 0, 0, 255]);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let color = Color::from_rgba_u8(12, 34, 56, 78);
        assert_eq!(color.to_string().parse::<Color>(), Ok(color));
    }
}
