//! # Variant Property Tables
//!
//! Each widget variant declares its extra properties as a static table of
//! [`PropertySpec`]s: name, value kind, default and emission rule. The
//! widget stores one value per row; the serializer walks the same table, so
//! adding a property is a one-line change here.
//!
//! ```rust
//! use lvgl_core::widgets::{schema, WidgetType};
//!
//! let slider = schema::variant_schema(WidgetType::Slider);
//! let value = schema::find(WidgetType::Slider, "value").unwrap();
//! assert_eq!(slider[0].name, "value");
//! assert_eq!(value.emission, schema::Emission::Always);
//! ```

use serde_json::Value;

use super::types::WidgetType;
use crate::style::Color;

/// Value kind of a property; drives coercion on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Int,
    /// Integer that may be unset (`null`)
    OptInt,
    Float,
    Bool,
    Str,
    Color,
    /// Colour that may be unset (`null`)
    OptColor,
    StrList,
}

/// Static default of a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(&'static str),
    Color(u32),
    StrList(&'static [&'static str]),
    Unset,
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Int(v) => Value::from(v),
            DefaultValue::Float(v) => Value::from(v),
            DefaultValue::Bool(v) => Value::Bool(v),
            DefaultValue::Str(v) => Value::String(v.to_string()),
            DefaultValue::Color(v) => Color(v).to_value(),
            DefaultValue::StrList(items) => {
                Value::Array(items.iter().map(|s| Value::String(s.to_string())).collect())
            }
            DefaultValue::Unset => Value::Null,
        }
    }
}

/// When the serializer writes a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Value-bearing field, written even when equal to its default
    Always,
    /// Written only when it differs from the default
    UnlessDefault,
}

/// One row of a variant's property table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub default: DefaultValue,
    pub emission: Emission,
}

const fn prop(name: &'static str, kind: PropertyKind, default: DefaultValue) -> PropertySpec {
    PropertySpec {
        name,
        kind,
        default,
        emission: Emission::UnlessDefault,
    }
}

const fn always(name: &'static str, kind: PropertyKind, default: DefaultValue) -> PropertySpec {
    PropertySpec {
        name,
        kind,
        default,
        emission: Emission::Always,
    }
}

use DefaultValue as D;
use PropertyKind as K;

const LABEL: &[PropertySpec] = &[
    always("text", K::Str, D::Str("Label")),
    prop("text_color", K::OptColor, D::Unset),
    prop("text_font", K::Str, D::Str("montserrat_14")),
    prop("text_align", K::Str, D::Str("LEFT")),
    prop("long_mode", K::Str, D::Str("WRAP")),
    prop("recolor", K::Bool, D::Bool(false)),
];

const IMAGE: &[PropertySpec] = &[
    prop("src", K::Str, D::Str("")),
    prop("angle", K::Float, D::Float(0.0)),
    prop("zoom", K::Float, D::Float(1.0)),
    prop("antialias", K::Bool, D::Bool(false)),
    prop("pivot_x", K::OptInt, D::Unset),
    prop("pivot_y", K::OptInt, D::Unset),
    prop("offset_x", K::Int, D::Int(0)),
    prop("offset_y", K::Int, D::Int(0)),
];

const ARC: &[PropertySpec] = &[
    always("value", K::Int, D::Int(0)),
    prop("min_value", K::Int, D::Int(0)),
    prop("max_value", K::Int, D::Int(100)),
    prop("start_angle", K::Int, D::Int(135)),
    prop("end_angle", K::Int, D::Int(45)),
    prop("adjustable", K::Bool, D::Bool(false)),
    prop("arc_color", K::Color, D::Color(0x808080)),
    prop("arc_width", K::Int, D::Int(10)),
    prop("arc_rounded", K::Bool, D::Bool(true)),
];

const BAR: &[PropertySpec] = &[
    always("value", K::Int, D::Int(0)),
    prop("min_value", K::Int, D::Int(0)),
    prop("max_value", K::Int, D::Int(100)),
    prop("animated", K::Bool, D::Bool(true)),
    prop("mode", K::Str, D::Str("NORMAL")),
];

const SLIDER: &[PropertySpec] = &[
    always("value", K::Int, D::Int(0)),
    prop("min_value", K::Int, D::Int(0)),
    prop("max_value", K::Int, D::Int(100)),
    prop("animated", K::Bool, D::Bool(true)),
];

const CHECKBOX: &[PropertySpec] = &[prop("text", K::Str, D::Str("Checkbox"))];

const DROPDOWN: &[PropertySpec] = &[
    always(
        "options",
        K::StrList,
        D::StrList(&["Option 1", "Option 2", "Option 3"]),
    ),
    prop("selected_index", K::Int, D::Int(0)),
    prop("dir", K::Str, D::Str("BOTTOM")),
];

const TEXTAREA: &[PropertySpec] = &[
    prop("text", K::Str, D::Str("")),
    prop("placeholder_text", K::Str, D::Str("Enter text...")),
    prop("one_line", K::Bool, D::Bool(false)),
    prop("password_mode", K::Bool, D::Bool(false)),
    prop("max_length", K::OptInt, D::Unset),
    prop("accepted_chars", K::Str, D::Str("")),
];

const SPINBOX: &[PropertySpec] = &[
    always("value", K::Float, D::Float(0.0)),
    prop("range_from", K::Float, D::Float(0.0)),
    prop("range_to", K::Float, D::Float(100.0)),
    prop("step", K::Float, D::Float(1.0)),
    prop("digits", K::Int, D::Int(4)),
    prop("decimal_places", K::Int, D::Int(0)),
    prop("rollover", K::Bool, D::Bool(false)),
];

const LED: &[PropertySpec] = &[
    always("color", K::Color, D::Color(0xFF0000)),
    prop("brightness", K::Str, D::Str("100%")),
];

const QRCODE: &[PropertySpec] = &[
    always("text", K::Str, D::Str("https://esphome.io")),
    always("size", K::Int, D::Int(100)),
    prop("light_color", K::Color, D::Color(0xFFFFFF)),
    prop("dark_color", K::Color, D::Color(0x000000)),
];

/// Property table of a variant; empty for variants with only common props.
pub fn variant_schema(widget_type: WidgetType) -> &'static [PropertySpec] {
    match widget_type {
        WidgetType::Label => LABEL,
        WidgetType::Image => IMAGE,
        WidgetType::Arc => ARC,
        WidgetType::Bar => BAR,
        WidgetType::Slider => SLIDER,
        WidgetType::Checkbox => CHECKBOX,
        WidgetType::Dropdown => DROPDOWN,
        WidgetType::Textarea => TEXTAREA,
        WidgetType::Spinbox => SPINBOX,
        WidgetType::Led => LED,
        WidgetType::Qrcode => QRCODE,
        _ => &[],
    }
}

/// Look up one property of a variant.
pub fn find(widget_type: WidgetType, name: &str) -> Option<&'static PropertySpec> {
    variant_schema(widget_type).iter().find(|p| p.name == name)
}

/// Position of a property within its variant table.
pub(crate) fn index_of(widget_type: WidgetType, name: &str) -> Option<usize> {
    variant_schema(widget_type).iter().position(|p| p.name == name)
}

impl PropertySpec {
    pub fn default_value(&self) -> Value {
        self.default.to_value()
    }

    /// Whether `value` (already coerced) equals this property's default.
    pub fn is_default(&self, value: &Value) -> bool {
        match (self.default, value) {
            (D::Float(d), Value::Number(n)) => n.as_f64() == Some(d),
            _ => *value == self.default_value(),
        }
    }

    /// Whether the serializer writes this value.
    pub fn should_emit(&self, value: &Value) -> bool {
        match self.emission {
            Emission::Always => true,
            Emission::UnlessDefault => !self.is_default(value),
        }
    }

    /// Normalize `value` to this property's kind.
    pub fn coerce(&self, value: &Value) -> Result<Value, String> {
        coerce(self.kind, value)
    }
}

/// Normalize a JSON/YAML value to a property kind.
///
/// Integers accept integral floats and numeric strings, floats accept
/// integers, bools accept `"true"`/`"false"`, strings accept scalars,
/// string lists accept a newline-separated string.
pub fn coerce(kind: PropertyKind, value: &Value) -> Result<Value, String> {
    match kind {
        PropertyKind::Int => as_i64(value)
            .map(Value::from)
            .ok_or_else(|| format!("expected an integer, found {}", value)),
        PropertyKind::OptInt => match value {
            Value::Null => Ok(Value::Null),
            other => coerce(PropertyKind::Int, other),
        },
        PropertyKind::Float => as_f64(value)
            .map(Value::from)
            .ok_or_else(|| format!("expected a number, found {}", value)),
        PropertyKind::Bool => as_bool(value)
            .map(Value::Bool)
            .ok_or_else(|| format!("expected true or false, found {}", value)),
        PropertyKind::Str => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            other => Err(format!("expected text, found {}", other)),
        },
        PropertyKind::Color => Color::from_value(value)
            .map(Color::to_value)
            .ok_or_else(|| format!("expected a colour like 0xRRGGBB, found {}", value)),
        PropertyKind::OptColor => match value {
            Value::Null => Ok(Value::Null),
            other => coerce(PropertyKind::Color, other),
        },
        PropertyKind::StrList => match value {
            Value::Array(items) => items
                .iter()
                .map(|item| coerce(PropertyKind::Str, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::String(s) => Ok(Value::Array(
                s.lines().map(|l| Value::String(l.to_string())).collect(),
            )),
            other => Err(format!("expected a list of text, found {}", other)),
        },
    }
}

/// Integer view of a value (integral floats and numeric strings included).
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

/// Boolean view of a value (`"true"`/`"false"` strings included).
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tables_have_unique_names() {
        for t in WidgetType::ALL {
            let table = variant_schema(t);
            for (i, spec) in table.iter().enumerate() {
                assert!(
                    table[i + 1..].iter().all(|other| other.name != spec.name),
                    "duplicate property {} on {}",
                    spec.name,
                    t
                );
                // defaults must survive their own coercion
                let default = spec.default_value();
                assert_eq!(spec.coerce(&default).unwrap(), default);
            }
        }
    }

    #[test]
    fn test_always_emitted_fields() {
        let always: Vec<_> = WidgetType::ALL
            .iter()
            .flat_map(|t| {
                variant_schema(*t)
                    .iter()
                    .filter(|p| p.emission == Emission::Always)
                    .map(move |p| format!("{}.{}", t, p.name))
            })
            .collect();
        assert_eq!(
            always,
            vec![
                "label.text",
                "arc.value",
                "bar.value",
                "slider.value",
                "dropdown.options",
                "spinbox.value",
                "led.color",
                "qrcode.text",
                "qrcode.size",
            ]
        );
    }

    #[test]
    fn test_coercion() {
        assert_eq!(coerce(K::Int, &json!("42")).unwrap(), json!(42));
        assert_eq!(coerce(K::Int, &json!(7.0)).unwrap(), json!(7));
        assert!(coerce(K::Int, &json!(7.5)).is_err());
        assert_eq!(coerce(K::Float, &json!(3)).unwrap(), json!(3.0));
        assert_eq!(coerce(K::Bool, &json!("TRUE")).unwrap(), json!(true));
        assert!(coerce(K::Bool, &json!(1)).is_err());
        assert_eq!(coerce(K::Str, &json!(12)).unwrap(), json!("12"));
        assert_eq!(coerce(K::Color, &json!("#00ff00")).unwrap(), json!("0x00FF00"));
        assert_eq!(coerce(K::OptColor, &Value::Null).unwrap(), Value::Null);
        assert_eq!(
            coerce(K::StrList, &json!("A\nB")).unwrap(),
            json!(["A", "B"])
        );
    }

    #[test]
    fn test_float_default_comparison() {
        let zoom = find(WidgetType::Image, "zoom").unwrap();
        assert!(zoom.is_default(&json!(1.0)));
        assert!(!zoom.should_emit(&json!(1.0)));
        assert!(zoom.should_emit(&json!(1.5)));
    }
}
