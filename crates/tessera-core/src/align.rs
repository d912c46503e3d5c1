//! Text alignment enums used by text layout.

use std::fmt;
use std::str::FromStr;

/// Horizontal alignment of content inside a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical alignment of content inside a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl HAlign {
    /// Offset of content of width `content` inside a box of width `available`.
    ///
    /// Content wider than the box is aligned the same way and overflows.
    pub fn offset(self, available: i32, content: i32) -> i32 {
        match self {
            HAlign::Left => 0,
            HAlign::Center => (available - content) / 2,
            HAlign::Right => available - content,
        }
    }
}

impl VAlign {
    /// Offset of content of height `content` inside a box of height `available`.
    pub fn offset(self, available: i32, content: i32) -> i32 {
        match self {
            VAlign::Top => 0,
            VAlign::Center => (available - content) / 2,
            VAlign::Bottom => available - content,
        }
    }
}

/// Returned when an alignment keyword is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAlignError {
    pub value: String,
}

impl fmt::Display for ParseAlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown alignment '{}'", self.value)
    }
}

impl std::error::Error for ParseAlignError {}

impl FromStr for HAlign {
    type Err = ParseAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(HAlign::Left),
            "center" => Ok(HAlign::Center),
            "right" => Ok(HAlign::Right),
            other => Err(ParseAlignError {
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for VAlign {
    type Err = ParseAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top" => Ok(VAlign::Top),
            "center" => Ok(VAlign::Center),
            "bottom" => Ok(VAlign::Bottom),
            other => Err(ParseAlignError {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keywords() {
        assert_eq!("left".parse::<HAlign>(), Ok(HAlign::Left));
        assert_eq!(" right ".parse::<HAlign>(), Ok(HAlign::Right));
        assert_eq!("bottom".parse::<VAlign>(), Ok(VAlign::Bottom));
        assert!("middle".parse::<VAlign>().is_err());
        assert!("top".parse::<HAlign>().is_err());
    }

    #[test]
    fn offsets() {
        assert_eq!(HAlign::Left.offset(100, 20), 0);
        assert_eq!(HAlign::Center.offset(100, 20), 40);
        assert_eq!(HAlign::Right.offset(100, 20), 80);
        assert_eq!(VAlign::Center.offset(10, 30), -10);
    }
}
