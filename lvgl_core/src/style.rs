//! # Style Value Types
//!
//! Small value types shared by widgets and pages: colours, sizes, anchor
//! alignment, layout hints and scroll directions.
//!
//! All of them serialize to the spelling the LVGL config loader expects
//! (`0xRRGGBB`, `SIZE_CONTENT`, `TOP_LEFT`, ...), so documents stay
//! readable and round-trip without translation.
//!
//! ## Example
//!
//! ```rust
//! use lvgl_core::style::{Align, Color, Size};
//!
//! let c: Color = "#1A2B3C".parse().unwrap();
//! assert_eq!(c.to_string(), "0x1A2B3C");
//!
//! assert_eq!(Size::default(), Size::Content);
//! assert_eq!("center".parse::<Align>().unwrap(), Align::Center);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

// ============================================================================
// Color
// ============================================================================

/// 24-bit RGB colour.
///
/// Parses `0xRRGGBB`, `#RRGGBB`, bare `RRGGBB` and integers; always
/// formats as `0xRRGGBB`. Black is an ordinary colour here: "no colour
/// chosen" is modelled with `Option<Color>` by the fields that need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const BLACK: Color = Color(0x000000);
    pub const RED: Color = Color(0xFF0000);
    pub const GRAY: Color = Color(0x808080);

    /// Named palette offered by colour pickers.
    pub const PRESETS: [(&'static str, Color); 11] = [
        ("White", Color(0xFFFFFF)),
        ("Black", Color(0x000000)),
        ("Red", Color(0xFF0000)),
        ("Green", Color(0x00FF00)),
        ("Blue", Color(0x0000FF)),
        ("Yellow", Color(0xFFFF00)),
        ("Cyan", Color(0x00FFFF)),
        ("Magenta", Color(0xFF00FF)),
        ("Gray", Color(0x808080)),
        ("Light Gray", Color(0xC0C0C0)),
        ("Dark Gray", Color(0x404040)),
    ];

    /// Build a colour from its channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Parse a JSON/YAML value (string or integer) into a colour.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n
                .as_u64()
                .filter(|v| *v <= 0xFFFFFF)
                .map(|v| Color(v as u32)),
            _ => None,
        }
    }

    pub fn to_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0 & 0xFFFFFF)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .or_else(|| trimmed.strip_prefix('#'))
            .unwrap_or(trimmed);
        if hex.len() != 6 {
            return Err(format!("expected 6 hex digits, got '{}'", s));
        }
        u32::from_str_radix(hex, 16)
            .map(Color)
            .map_err(|e| format!("invalid colour '{}': {}", s, e))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColorVisitor;

        impl Visitor<'_> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a colour like 0xRRGGBB or #RRGGBB")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Color, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Color, E> {
                if v <= 0xFFFFFF {
                    Ok(Color(v as u32))
                } else {
                    Err(E::custom(format!("colour {} out of range", v)))
                }
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Color, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("colour {} out of range", v)))
                    .and_then(|v| self.visit_u64(v))
            }
        }

        deserializer.deserialize_any(ColorVisitor)
    }
}

// ============================================================================
// Size
// ============================================================================

/// Marker LVGL uses for "size computed from content".
pub const SIZE_CONTENT: &str = "SIZE_CONTENT";

/// Widget width or height: a pixel count or the content-sized sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Size {
    #[default]
    Content,
    Px(u32),
}

impl Size {
    /// Parse an integer, numeric string or `SIZE_CONTENT`.
    ///
    /// Anything else (negative numbers, percentages, other keywords) is
    /// rejected; callers decide on the fallback.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    u32::try_from(v).ok().map(Size::Px)
                } else {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                        .map(|f| Size::Px(f as u32))
                }
            }
            Value::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case(SIZE_CONTENT) {
                    Some(Size::Content)
                } else {
                    s.parse::<u32>().ok().map(Size::Px)
                }
            }
            _ => None,
        }
    }

    pub fn to_value(self) -> Value {
        match self {
            Size::Content => Value::String(SIZE_CONTENT.to_string()),
            Size::Px(px) => Value::from(px),
        }
    }

    /// Pixel value, or `fallback` for content-sized.
    pub fn px_or(self, fallback: u32) -> u32 {
        match self {
            Size::Content => fallback,
            Size::Px(px) => px,
        }
    }
}

impl From<u32> for Size {
    fn from(px: u32) -> Self {
        Size::Px(px)
    }
}

// ============================================================================
// Keyword enums
// ============================================================================

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every value in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Keyword as written in config documents.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Parse a JSON/YAML string value (case-insensitive).
            pub fn from_value(value: &Value) -> Option<Self> {
                value.as_str().and_then(|s| s.parse().ok())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let upper = s.trim().to_ascii_uppercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == upper)
                    .ok_or_else(|| format!("unknown {} '{}'", stringify!($name), s))
            }
        }
    };
}

keyword_enum! {
    /// Anchor position of a widget relative to its parent (or, for the
    /// `OUT_*` values, to a sibling).
    Align {
        TopLeft => "TOP_LEFT",
        TopMid => "TOP_MID",
        TopRight => "TOP_RIGHT",
        BottomLeft => "BOTTOM_LEFT",
        BottomMid => "BOTTOM_MID",
        BottomRight => "BOTTOM_RIGHT",
        LeftMid => "LEFT_MID",
        Center => "CENTER",
        RightMid => "RIGHT_MID",
        OutTopLeft => "OUT_TOP_LEFT",
        OutTopMid => "OUT_TOP_MID",
        OutTopRight => "OUT_TOP_RIGHT",
        OutBottomLeft => "OUT_BOTTOM_LEFT",
        OutBottomMid => "OUT_BOTTOM_MID",
        OutBottomRight => "OUT_BOTTOM_RIGHT",
        OutLeftTop => "OUT_LEFT_TOP",
        OutLeftMid => "OUT_LEFT_MID",
        OutLeftBottom => "OUT_LEFT_BOTTOM",
        OutRightTop => "OUT_RIGHT_TOP",
        OutRightMid => "OUT_RIGHT_MID",
        OutRightBottom => "OUT_RIGHT_BOTTOM",
    }
}

impl Default for Align {
    fn default() -> Self {
        Align::TopLeft
    }
}

impl Align {
    /// Whether this anchors outside the reference object.
    pub fn is_outside(&self) -> bool {
        self.as_str().starts_with("OUT_")
    }
}

keyword_enum! {
    /// Layout hint passed through to LVGL; the model does no layout itself.
    LayoutType {
        None => "NONE",
        Flex => "FLEX",
        Grid => "GRID",
    }
}

impl Default for LayoutType {
    fn default() -> Self {
        LayoutType::None
    }
}

keyword_enum! {
    /// Page scroll direction.
    ScrollDirection {
        Both => "BOTH",
        Horizontal => "HORIZONTAL",
        Vertical => "VERTICAL",
    }
}

impl Default for ScrollDirection {
    fn default() -> Self {
        ScrollDirection::Both
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_parsing() {
        assert_eq!("0xFF0000".parse::<Color>().unwrap(), Color::RED);
        assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::RED);
        assert_eq!("808080".parse::<Color>().unwrap(), Color::GRAY);
        assert!("0xFFF".parse::<Color>().is_err());
        assert!("red".parse::<Color>().is_err());
        assert_eq!(Color::from_value(&json!(255)), Some(Color(0x0000FF)));
        assert_eq!(Color::from_value(&json!(true)), None);
    }

    #[test]
    fn test_color_serialization() {
        let json = serde_json::to_string(&Color::rgb(0x1a, 0x1a, 0x1a)).unwrap();
        assert_eq!(json, "\"0x1A1A1A\"");

        let roundtrip: Color = serde_json::from_str("\"#CCCCCC\"").unwrap();
        assert_eq!(roundtrip, Color(0xCCCCCC));
    }

    #[test]
    fn test_size_values() {
        assert_eq!(Size::from_value(&json!(220)), Some(Size::Px(220)));
        assert_eq!(Size::from_value(&json!("SIZE_CONTENT")), Some(Size::Content));
        assert_eq!(Size::from_value(&json!("40")), Some(Size::Px(40)));
        assert_eq!(Size::from_value(&json!(-5)), None);
        assert_eq!(Size::from_value(&json!("50%")), None);
        assert_eq!(Size::Content.to_value(), json!("SIZE_CONTENT"));
        assert_eq!(Size::Content.px_or(100), 100);
    }

    #[test]
    fn test_align_keywords() {
        assert_eq!(Align::ALL.len(), 21);
        assert_eq!(Align::default(), Align::TopLeft);
        assert_eq!("out_left_mid".parse::<Align>().unwrap(), Align::OutLeftMid);
        assert!(Align::OutTopMid.is_outside());
        assert!(!Align::Center.is_outside());

        let json = serde_json::to_string(&Align::BottomRight).unwrap();
        assert_eq!(json, "\"BOTTOM_RIGHT\"");
    }

    #[test]
    fn test_layout_and_scroll_keywords() {
        assert_eq!(LayoutType::from_value(&json!("flex")), Some(LayoutType::Flex));
        assert_eq!(LayoutType::from_value(&json!("ROW")), None);
        assert_eq!(ScrollDirection::default().as_str(), "BOTH");
    }
}
