//! Widget variant tags and the palette catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of widget variants.
///
/// The tag decides which property table applies (see
/// [`schema`](super::schema)). Variants without a table carry only the
/// common properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    /// Plain base object, usually a container
    Obj,
    Label,
    Button,
    Image,
    Arc,
    Bar,
    Slider,
    Switch,
    Checkbox,
    Dropdown,
    Roller,
    Textarea,
    Spinbox,
    Meter,
    Led,
    Line,
    Qrcode,
    Canvas,
    Buttonmatrix,
    Keyboard,
    Spinner,
    Tabview,
    Tileview,
    Animimg,
}

/// Palette grouping used by the widget library panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Basic,
    Input,
    Display,
    Container,
    Special,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Basic,
        Category::Input,
        Category::Display,
        Category::Container,
        Category::Special,
    ];
}

impl WidgetType {
    /// All variants in declaration order
    pub const ALL: [WidgetType; 24] = [
        WidgetType::Obj,
        WidgetType::Label,
        WidgetType::Button,
        WidgetType::Image,
        WidgetType::Arc,
        WidgetType::Bar,
        WidgetType::Slider,
        WidgetType::Switch,
        WidgetType::Checkbox,
        WidgetType::Dropdown,
        WidgetType::Roller,
        WidgetType::Textarea,
        WidgetType::Spinbox,
        WidgetType::Meter,
        WidgetType::Led,
        WidgetType::Line,
        WidgetType::Qrcode,
        WidgetType::Canvas,
        WidgetType::Buttonmatrix,
        WidgetType::Keyboard,
        WidgetType::Spinner,
        WidgetType::Tabview,
        WidgetType::Tileview,
        WidgetType::Animimg,
    ];

    /// Tag as written in documents (`"label"`, `"qrcode"`, ...)
    pub fn tag(&self) -> &'static str {
        match self {
            WidgetType::Obj => "obj",
            WidgetType::Label => "label",
            WidgetType::Button => "button",
            WidgetType::Image => "image",
            WidgetType::Arc => "arc",
            WidgetType::Bar => "bar",
            WidgetType::Slider => "slider",
            WidgetType::Switch => "switch",
            WidgetType::Checkbox => "checkbox",
            WidgetType::Dropdown => "dropdown",
            WidgetType::Roller => "roller",
            WidgetType::Textarea => "textarea",
            WidgetType::Spinbox => "spinbox",
            WidgetType::Meter => "meter",
            WidgetType::Led => "led",
            WidgetType::Line => "line",
            WidgetType::Qrcode => "qrcode",
            WidgetType::Canvas => "canvas",
            WidgetType::Buttonmatrix => "buttonmatrix",
            WidgetType::Keyboard => "keyboard",
            WidgetType::Spinner => "spinner",
            WidgetType::Tabview => "tabview",
            WidgetType::Tileview => "tileview",
            WidgetType::Animimg => "animimg",
        }
    }

    /// Resolve a tag; `None` for anything outside the closed set.
    pub fn from_tag(tag: &str) -> Option<WidgetType> {
        WidgetType::ALL.iter().copied().find(|t| t.tag() == tag)
    }

    /// Human-readable name for the palette
    pub fn display_name(&self) -> &'static str {
        match self {
            WidgetType::Obj => "Object",
            WidgetType::Label => "Label",
            WidgetType::Button => "Button",
            WidgetType::Image => "Image",
            WidgetType::Arc => "Arc",
            WidgetType::Bar => "Bar",
            WidgetType::Slider => "Slider",
            WidgetType::Switch => "Switch",
            WidgetType::Checkbox => "Checkbox",
            WidgetType::Dropdown => "Dropdown",
            WidgetType::Roller => "Roller",
            WidgetType::Textarea => "Text Area",
            WidgetType::Spinbox => "Spinbox",
            WidgetType::Meter => "Meter",
            WidgetType::Led => "LED",
            WidgetType::Line => "Line",
            WidgetType::Qrcode => "QR Code",
            WidgetType::Canvas => "Canvas",
            WidgetType::Buttonmatrix => "Button Matrix",
            WidgetType::Keyboard => "Keyboard",
            WidgetType::Spinner => "Spinner",
            WidgetType::Tabview => "Tab View",
            WidgetType::Tileview => "Tile View",
            WidgetType::Animimg => "Animated Image",
        }
    }

    /// Palette category
    pub fn category(&self) -> Category {
        match self {
            WidgetType::Obj | WidgetType::Label | WidgetType::Button | WidgetType::Image => {
                Category::Basic
            }
            WidgetType::Slider
            | WidgetType::Arc
            | WidgetType::Switch
            | WidgetType::Checkbox
            | WidgetType::Dropdown
            | WidgetType::Roller
            | WidgetType::Textarea
            | WidgetType::Spinbox => Category::Input,
            WidgetType::Bar | WidgetType::Led | WidgetType::Qrcode | WidgetType::Meter => {
                Category::Display
            }
            WidgetType::Tabview | WidgetType::Tileview => Category::Container,
            WidgetType::Keyboard
            | WidgetType::Buttonmatrix
            | WidgetType::Canvas
            | WidgetType::Line
            | WidgetType::Animimg
            | WidgetType::Spinner => Category::Special,
        }
    }

    /// One-line palette description
    pub fn description(&self) -> &'static str {
        match self {
            WidgetType::Obj => "Base container object",
            WidgetType::Label => "Display text",
            WidgetType::Button => "Clickable button",
            WidgetType::Image => "Display images",
            WidgetType::Arc => "Circular progress/input",
            WidgetType::Bar => "Progress bar",
            WidgetType::Slider => "Value slider",
            WidgetType::Switch => "On/off switch",
            WidgetType::Checkbox => "Checkbox with label",
            WidgetType::Dropdown => "Selection dropdown",
            WidgetType::Roller => "Scrolling option roller",
            WidgetType::Textarea => "Text input area",
            WidgetType::Spinbox => "Numeric input",
            WidgetType::Meter => "Gauge meter",
            WidgetType::Led => "Status LED",
            WidgetType::Line => "Line drawing",
            WidgetType::Qrcode => "QR code display",
            WidgetType::Canvas => "Drawing canvas",
            WidgetType::Buttonmatrix => "Matrix of buttons",
            WidgetType::Keyboard => "On-screen keyboard",
            WidgetType::Spinner => "Loading spinner",
            WidgetType::Tabview => "Tabbed container",
            WidgetType::Tileview => "Swipeable tiles",
            WidgetType::Animimg => "Animated image frames",
        }
    }

    /// Nominal (width, height) used when placing a new widget, and as the
    /// fallback for unusable sizes on import.
    pub fn default_size(&self) -> (u32, u32) {
        match self {
            WidgetType::Obj => (100, 100),
            WidgetType::Label => (100, 30),
            WidgetType::Button => (80, 40),
            WidgetType::Image => (100, 100),
            WidgetType::Arc => (100, 100),
            WidgetType::Bar => (150, 20),
            WidgetType::Slider => (150, 20),
            WidgetType::Switch => (60, 30),
            WidgetType::Checkbox => (100, 30),
            WidgetType::Dropdown => (120, 30),
            WidgetType::Roller => (120, 100),
            WidgetType::Textarea => (150, 80),
            WidgetType::Spinbox => (100, 30),
            WidgetType::Meter => (120, 120),
            WidgetType::Led => (30, 30),
            WidgetType::Line => (100, 2),
            WidgetType::Qrcode => (100, 100),
            WidgetType::Canvas => (200, 150),
            WidgetType::Buttonmatrix => (180, 120),
            WidgetType::Keyboard => (240, 120),
            WidgetType::Spinner => (50, 50),
            WidgetType::Tabview => (200, 150),
            WidgetType::Tileview => (200, 150),
            WidgetType::Animimg => (100, 100),
        }
    }

    /// Default of the `clickable` flag
    pub fn default_clickable(&self) -> bool {
        true
    }

    /// Default of the `checkable` flag (toggle-style widgets start checkable)
    pub fn default_checkable(&self) -> bool {
        matches!(self, WidgetType::Switch | WidgetType::Checkbox)
    }

    /// Default of the `scrollable` flag
    pub fn default_scrollable(&self) -> bool {
        true
    }

    /// Default of the `hidden` flag
    pub fn default_hidden(&self) -> bool {
        false
    }

    /// Variants of one palette category, in declaration order
    pub fn in_category(category: Category) -> impl Iterator<Item = WidgetType> {
        WidgetType::ALL
            .into_iter()
            .filter(move |t| t.category() == category)
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for WidgetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetType::from_tag(s).ok_or_else(|| format!("unknown widget type '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_roundtrip() {
        for t in WidgetType::ALL {
            assert_eq!(WidgetType::from_tag(t.tag()), Some(t));
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.tag()));
        }
        assert_eq!(WidgetType::from_tag("btn"), None);
    }

    #[test]
    fn test_flag_defaults() {
        assert!(WidgetType::Switch.default_checkable());
        assert!(WidgetType::Checkbox.default_checkable());
        assert!(!WidgetType::Button.default_checkable());
        assert!(WidgetType::Button.default_clickable());
        assert!(WidgetType::Obj.default_scrollable());
    }

    #[test]
    fn test_catalog() {
        assert_eq!(WidgetType::Slider.default_size(), (150, 20));
        assert_eq!(WidgetType::Qrcode.display_name(), "QR Code");
        let basic: Vec<_> = WidgetType::in_category(Category::Basic).collect();
        assert_eq!(
            basic,
            vec![WidgetType::Obj, WidgetType::Label, WidgetType::Button, WidgetType::Image]
        );
        let total: usize = Category::ALL
            .iter()
            .map(|c| WidgetType::in_category(*c).count())
            .sum();
        assert_eq!(total, WidgetType::ALL.len());
    }
}
