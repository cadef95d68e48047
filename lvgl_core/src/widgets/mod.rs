//! # Widget Model
//!
//! A [`Widget`] is one node of the layout tree: a fixed variant tag, the
//! common geometry/style/flag properties every LVGL object has, the
//! variant's extra properties (from its [`schema`] table), owned children
//! and event actions.
//!
//! ## Property access
//!
//! Every declared property, common or variant-specific, is reachable
//! through one name-indexed accessor pair:
//!
//! - [`Widget::get`] returns the current value as JSON, or `None` for
//!   names the variant does not declare.
//! - [`Widget::set`] coerces and stores a value. Undeclared names are
//!   rejected with [`LayoutError::UnknownProperty`] and leave the widget
//!   untouched; `widget_type` is read-only.
//!
//! ## Example
//!
//! ```rust
//! use lvgl_core::widgets::{create_widget, Widget, WidgetType};
//! use serde_json::{json, Map};
//!
//! let mut slider = Widget::new(WidgetType::Slider);
//! slider.set("value", json!(30)).unwrap();
//! assert_eq!(slider.get("value"), Some(json!(30)));
//! assert!(slider.set("text", json!("nope")).is_err());
//!
//! // Unknown tags fall back to the base object
//! let w = create_widget("chart", &Map::new());
//! assert_eq!(w.widget_type(), WidgetType::Obj);
//! ```

pub mod schema;
mod types;

pub use types::{Category, WidgetType};

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::actions::{ActionSpec, Actions};
use crate::errors::{LayoutError, LayoutResult};
use crate::style::{Align, Color, LayoutType, Size};
use schema::PropertySpec;

/// Names of the properties every variant declares.
pub const COMMON_PROPERTIES: &[&str] = &[
    "widget_type",
    "id",
    "x",
    "y",
    "width",
    "height",
    "bg_color",
    "bg_opa",
    "border_width",
    "border_color",
    "border_opa",
    "radius",
    "pad_all",
    "pad_top",
    "pad_bottom",
    "pad_left",
    "pad_right",
    "align",
    "hidden",
    "clickable",
    "checkable",
    "scrollable",
    "checked",
    "disabled",
    "layout_type",
];

/// Default background opacity keyword
pub const OPA_COVER: &str = "COVER";

/// One UI element of the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    widget_type: WidgetType,

    /// Unique within a page; empty is allowed
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub width: Size,
    pub height: Size,

    pub bg_color: Color,
    pub bg_opa: String,
    pub border_width: u32,
    /// `None` leaves the framework's border colour in place
    pub border_color: Option<Color>,
    pub border_opa: String,
    pub radius: u32,

    /// Shorthand for all four sides; wins over the per-side values on export
    pub pad_all: u32,
    pub pad_top: u32,
    pub pad_bottom: u32,
    pub pad_left: u32,
    pub pad_right: u32,

    pub align: Align,

    pub hidden: bool,
    pub clickable: bool,
    pub checkable: bool,
    pub scrollable: bool,

    pub checked: bool,
    pub disabled: bool,

    pub layout_type: LayoutType,

    /// Owned child widgets in z-order
    pub children: Vec<Widget>,

    /// Trigger name → actions
    pub actions: Actions,

    /// One value per row of the variant's schema table
    props: Vec<Value>,
}

impl Widget {
    /// Create a widget with every property at its variant default.
    pub fn new(widget_type: WidgetType) -> Self {
        Widget {
            widget_type,
            id: String::new(),
            x: 0,
            y: 0,
            width: Size::Content,
            height: Size::Content,
            bg_color: Color::WHITE,
            bg_opa: OPA_COVER.to_string(),
            border_width: 0,
            border_color: None,
            border_opa: OPA_COVER.to_string(),
            radius: 0,
            pad_all: 0,
            pad_top: 0,
            pad_bottom: 0,
            pad_left: 0,
            pad_right: 0,
            align: Align::TopLeft,
            hidden: widget_type.default_hidden(),
            clickable: widget_type.default_clickable(),
            checkable: widget_type.default_checkable(),
            scrollable: widget_type.default_scrollable(),
            checked: false,
            disabled: false,
            layout_type: LayoutType::None,
            children: Vec::new(),
            actions: Actions::new(),
            props: schema::variant_schema(widget_type)
                .iter()
                .map(PropertySpec::default_value)
                .collect(),
        }
    }

    /// Builder-style `set`.
    pub fn with(mut self, name: &str, value: Value) -> LayoutResult<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Builder-style id assignment.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder-style position.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Builder-style fixed size.
    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.width = Size::Px(width);
        self.height = Size::Px(height);
        self
    }

    /// The variant tag (fixed at construction).
    pub fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    /// The variant's property table.
    pub fn schema(&self) -> &'static [PropertySpec] {
        schema::variant_schema(self.widget_type)
    }

    /// Variant properties with their current values, in table order.
    pub fn variant_properties(&self) -> impl Iterator<Item = (&'static PropertySpec, &Value)> {
        self.schema().iter().zip(self.props.iter())
    }

    /// Every readable property name: common names, then variant names.
    pub fn property_names(&self) -> Vec<&'static str> {
        COMMON_PROPERTIES
            .iter()
            .copied()
            .chain(self.schema().iter().map(|p| p.name))
            .collect()
    }

    /// Whether `name` is declared for this widget.
    pub fn has_property(&self, name: &str) -> bool {
        COMMON_PROPERTIES.contains(&name) || schema::index_of(self.widget_type, name).is_some()
    }

    /// Read a property by name.
    pub fn get(&self, name: &str) -> Option<Value> {
        let value = match name {
            "widget_type" => Value::String(self.widget_type.tag().to_string()),
            "id" => Value::String(self.id.clone()),
            "x" => Value::from(self.x),
            "y" => Value::from(self.y),
            "width" => self.width.to_value(),
            "height" => self.height.to_value(),
            "bg_color" => self.bg_color.to_value(),
            "bg_opa" => Value::String(self.bg_opa.clone()),
            "border_width" => Value::from(self.border_width),
            "border_color" => self.border_color.map(Color::to_value).unwrap_or(Value::Null),
            "border_opa" => Value::String(self.border_opa.clone()),
            "radius" => Value::from(self.radius),
            "pad_all" => Value::from(self.pad_all),
            "pad_top" => Value::from(self.pad_top),
            "pad_bottom" => Value::from(self.pad_bottom),
            "pad_left" => Value::from(self.pad_left),
            "pad_right" => Value::from(self.pad_right),
            "align" => Value::String(self.align.as_str().to_string()),
            "hidden" => Value::Bool(self.hidden),
            "clickable" => Value::Bool(self.clickable),
            "checkable" => Value::Bool(self.checkable),
            "scrollable" => Value::Bool(self.scrollable),
            "checked" => Value::Bool(self.checked),
            "disabled" => Value::Bool(self.disabled),
            "layout_type" => Value::String(self.layout_type.as_str().to_string()),
            other => {
                let index = schema::index_of(self.widget_type, other)?;
                return self.props.get(index).cloned();
            }
        };
        Some(value)
    }

    /// Write a property by name, coercing the value to the declared kind.
    pub fn set(&mut self, name: &str, value: Value) -> LayoutResult<()> {
        match name {
            "widget_type" => {
                return Err(LayoutError::ReadOnlyProperty {
                    property: name.to_string(),
                })
            }
            "id" => self.id = text(name, &value)?,
            "x" => self.x = int_in_range(name, &value)?,
            "y" => self.y = int_in_range(name, &value)?,
            "width" => self.width = size(name, &value)?,
            "height" => self.height = size(name, &value)?,
            "bg_color" => self.bg_color = color(name, &value)?,
            "bg_opa" => self.bg_opa = text(name, &value)?,
            "border_width" => self.border_width = int_in_range(name, &value)?,
            "border_color" => {
                self.border_color = match value {
                    Value::Null => None,
                    ref v => Some(color(name, v)?),
                }
            }
            "border_opa" => self.border_opa = text(name, &value)?,
            "radius" => self.radius = int_in_range(name, &value)?,
            "pad_all" => self.pad_all = int_in_range(name, &value)?,
            "pad_top" => self.pad_top = int_in_range(name, &value)?,
            "pad_bottom" => self.pad_bottom = int_in_range(name, &value)?,
            "pad_left" => self.pad_left = int_in_range(name, &value)?,
            "pad_right" => self.pad_right = int_in_range(name, &value)?,
            "align" => {
                self.align = Align::from_value(&value)
                    .ok_or_else(|| invalid(name, &value, "unknown alignment"))?
            }
            "hidden" => self.hidden = flag(name, &value)?,
            "clickable" => self.clickable = flag(name, &value)?,
            "checkable" => self.checkable = flag(name, &value)?,
            "scrollable" => self.scrollable = flag(name, &value)?,
            "checked" => self.checked = flag(name, &value)?,
            "disabled" => self.disabled = flag(name, &value)?,
            "layout_type" => {
                self.layout_type = LayoutType::from_value(&value)
                    .ok_or_else(|| invalid(name, &value, "expected NONE, FLEX or GRID"))?
            }
            other => {
                let index = schema::index_of(self.widget_type, other).ok_or_else(|| {
                    LayoutError::unknown_property(self.widget_type.tag(), other)
                })?;
                let spec = &self.schema()[index];
                let coerced = spec
                    .coerce(&value)
                    .map_err(|reason| invalid(name, &value, &reason))?;
                self.props[index] = coerced;
            }
        }
        Ok(())
    }

    /// Apply a batch of overrides, skipping names the variant does not
    /// declare and values that fail coercion.
    pub fn apply_overrides(&mut self, overrides: &Map<String, Value>) {
        for (name, value) in overrides {
            match self.set(name, value.clone()) {
                Ok(()) => {}
                Err(LayoutError::UnknownProperty { .. }) | Err(LayoutError::ReadOnlyProperty { .. }) => {
                    debug!("ignoring field '{}' on {} widget", name, self.widget_type);
                }
                Err(e) => warn!("skipping override on {} widget: {}", self.widget_type, e),
            }
        }
    }

    /// Direct children, in drawing order.
    pub fn children(&self) -> &[Widget] {
        &self.children
    }

    /// Append a child widget.
    pub fn add_child(&mut self, child: Widget) {
        self.children.push(child);
    }

    /// Remove a direct or nested child by id.
    pub fn remove_child(&mut self, id: &str) -> Option<Widget> {
        remove_from(&mut self.children, id)
    }

    /// Bind actions to a trigger, replacing any previous binding.
    pub fn set_action(&mut self, trigger: impl Into<String>, spec: ActionSpec) {
        self.actions.insert(trigger.into(), spec);
    }

    /// Depth-first search of this widget and its descendants.
    pub fn find(&self, id: &str) -> Option<&Widget> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Mutable depth-first search.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Widget> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Visit this widget and every descendant, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Widget)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Visit mutably, parents before children.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Widget)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    /// Number of widgets in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Widget::subtree_len).sum::<usize>()
    }

    /// Flattened view of every property, for live rendering.
    ///
    /// Unlike the export form nothing is elided: all common and variant
    /// properties are present. Children appear under `widgets`, actions
    /// under `actions`.
    pub fn to_full_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for name in self.property_names() {
            if let Some(value) = self.get(name) {
                map.insert(name.to_string(), value);
            }
        }
        if !self.children.is_empty() {
            map.insert(
                "widgets".to_string(),
                Value::Array(
                    self.children
                        .iter()
                        .map(|c| Value::Object(c.to_full_map()))
                        .collect(),
                ),
            );
        }
        if !self.actions.is_empty() {
            let actions = self
                .actions
                .iter()
                .map(|(trigger, spec)| (trigger.clone(), spec.to_value()))
                .collect();
            map.insert("actions".to_string(), Value::Object(actions));
        }
        map
    }
}

/// Construct a defaulted widget from a tag and apply field overrides.
///
/// Unknown tags produce a base `obj` widget. Override names outside the
/// variant's schema are ignored, as are values that fail coercion.
pub fn create_widget(tag: &str, overrides: &Map<String, Value>) -> Widget {
    let widget_type = WidgetType::from_tag(tag).unwrap_or_else(|| {
        debug!("unknown widget type '{}', using base object", tag);
        WidgetType::Obj
    });
    let mut widget = Widget::new(widget_type);
    widget.apply_overrides(overrides);
    widget
}

/// Remove a widget by id from a list or any nested child list.
pub(crate) fn remove_from(list: &mut Vec<Widget>, id: &str) -> Option<Widget> {
    if let Some(pos) = list.iter().position(|w| w.id == id) {
        return Some(list.remove(pos));
    }
    list.iter_mut().find_map(|w| remove_from(&mut w.children, id))
}

fn invalid(name: &str, value: &Value, reason: &str) -> LayoutError {
    LayoutError::invalid_property(name, value.to_string(), reason)
}

fn text(name: &str, value: &Value) -> LayoutResult<String> {
    match schema::coerce(schema::PropertyKind::Str, value) {
        Ok(Value::String(s)) => Ok(s),
        Ok(_) => Err(invalid(name, value, "expected text")),
        Err(reason) => Err(invalid(name, value, &reason)),
    }
}

fn flag(name: &str, value: &Value) -> LayoutResult<bool> {
    schema::as_bool(value).ok_or_else(|| invalid(name, value, "expected true or false"))
}

fn int_in_range<T: TryFrom<i64>>(name: &str, value: &Value) -> LayoutResult<T> {
    let raw = schema::as_i64(value).ok_or_else(|| invalid(name, value, "expected an integer"))?;
    T::try_from(raw).map_err(|_| invalid(name, value, "out of range"))
}

fn size(name: &str, value: &Value) -> LayoutResult<Size> {
    Size::from_value(value)
        .ok_or_else(|| invalid(name, value, "expected a non-negative integer or SIZE_CONTENT"))
}

fn color(name: &str, value: &Value) -> LayoutResult<Color> {
    Color::from_value(value).ok_or_else(|| invalid(name, value, "expected a colour like 0xRRGGBB"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn overrides(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("overrides must be an object"),
        }
    }

    #[test]
    fn test_variant_defaults() {
        let switch = Widget::new(WidgetType::Switch);
        assert!(switch.checkable);
        assert!(switch.clickable);
        assert!(switch.scrollable);

        let label = Widget::new(WidgetType::Label);
        assert_eq!(label.get("text"), Some(json!("Label")));
        assert_eq!(label.get("text_color"), Some(Value::Null));
        assert_eq!(label.width, Size::Content);
        assert_eq!(label.bg_color, Color::WHITE);
    }

    #[test]
    fn test_factory_applies_overrides() {
        let w = create_widget(
            "slider",
            &overrides(json!({"id": "volume", "x": 10, "value": 50, "max_value": "200"})),
        );
        assert_eq!(w.widget_type(), WidgetType::Slider);
        assert_eq!(w.id, "volume");
        assert_eq!(w.x, 10);
        assert_eq!(w.get("value"), Some(json!(50)));
        assert_eq!(w.get("max_value"), Some(json!(200)));
    }

    #[test]
    fn test_factory_ignores_unknown_fields() {
        let w = create_widget(
            "button",
            &overrides(json!({"id": "ok", "text": "OK", "bogus": 1, "widget_type": "label"})),
        );
        assert_eq!(w.widget_type(), WidgetType::Button);
        assert_eq!(w.id, "ok");
        assert_eq!(w.get("text"), None);
    }

    #[test]
    fn test_factory_unknown_tag_falls_back_to_obj() {
        let w = create_widget("chart", &overrides(json!({"x": 5})));
        assert_eq!(w.widget_type(), WidgetType::Obj);
        assert_eq!(w.x, 5);
        assert!(w.schema().is_empty());
    }

    #[test]
    fn test_set_rejects_undeclared_names() {
        let mut bar = Widget::new(WidgetType::Bar);
        let before = bar.clone();
        let err = bar.set("placeholder_text", json!("x")).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PROPERTY");
        assert_eq!(bar, before);

        let err = bar.set("widget_type", json!("label")).unwrap_err();
        assert_eq!(err.error_code(), "READ_ONLY_PROPERTY");
    }

    #[test]
    fn test_set_coerces_and_validates() {
        let mut w = Widget::new(WidgetType::Label);
        w.set("width", json!("SIZE_CONTENT")).unwrap();
        w.set("height", json!(20)).unwrap();
        w.set("align", json!("center")).unwrap();
        w.set("border_color", json!("#000000")).unwrap();
        w.set("text_color", json!("#CCCCCC")).unwrap();

        assert_eq!(w.height, Size::Px(20));
        assert_eq!(w.align, Align::Center);
        assert_eq!(w.border_color, Some(Color::BLACK));
        assert_eq!(w.get("text_color"), Some(json!("0xCCCCCC")));

        assert!(w.set("width", json!(-4)).is_err());
        assert!(w.set("radius", json!("round")).is_err());
        assert!(w.set("align", json!("MIDDLE")).is_err());

        w.set("border_color", Value::Null).unwrap();
        assert_eq!(w.border_color, None);
    }

    #[test]
    fn test_property_names() {
        let w = Widget::new(WidgetType::Led);
        let names = w.property_names();
        assert_eq!(names.len(), COMMON_PROPERTIES.len() + 2);
        assert!(names.ends_with(&["color", "brightness"]));
        for name in names {
            assert!(w.get(name).is_some(), "{} should be readable", name);
        }
    }

    #[test]
    fn test_children_tree_operations() {
        let mut panel = Widget::new(WidgetType::Obj).with_id("panel");
        let mut row = Widget::new(WidgetType::Obj).with_id("row");
        row.add_child(Widget::new(WidgetType::Label).with_id("caption"));
        panel.add_child(row);
        panel.add_child(Widget::new(WidgetType::Button).with_id("ok"));

        assert_eq!(panel.subtree_len(), 4);
        assert!(panel.find("caption").is_some());

        let mut order = Vec::new();
        panel.walk(&mut |w| order.push(w.id.clone()));
        assert_eq!(order, vec!["panel", "row", "caption", "ok"]);

        let removed = panel.remove_child("caption").unwrap();
        assert_eq!(removed.widget_type(), WidgetType::Label);
        assert_eq!(panel.subtree_len(), 3);
        assert!(panel.remove_child("missing").is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Widget::new(WidgetType::Label).with_id("a");
        let mut copy = original.clone();
        copy.set("text", json!("changed")).unwrap();
        assert_eq!(original.get("text"), Some(json!("Label")));
    }

    #[test]
    fn test_full_map_contains_everything() {
        let mut w = Widget::new(WidgetType::Slider).with_id("s").at(4, 8);
        w.set_action("on_value", ActionSpec::new().then("logger.log", json!("v")));
        let map = w.to_full_map();
        assert_eq!(map["widget_type"], json!("slider"));
        assert_eq!(map["x"], json!(4));
        assert_eq!(map["width"], json!("SIZE_CONTENT"));
        assert_eq!(map["min_value"], json!(0));
        assert_eq!(map["clickable"], json!(true));
        assert!(map.contains_key("actions"));
    }
}
