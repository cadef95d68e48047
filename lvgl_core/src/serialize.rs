//! # Widget Serializer
//!
//! Turns a [`Widget`] into its canonical minimal mapping. Every field is
//! compared against its default and left out when equal, so a fresh widget
//! serializes to (almost) nothing and a document only records what the user
//! changed.
//!
//! Field order is fixed: identity, geometry, style, padding, alignment,
//! flags, `state`, `layout`, children, actions, then the variant's own
//! properties in schema order.
//!
//! ## Example
//!
//! ```rust
//! use lvgl_core::serialize::{to_document, SerializeOptions};
//! use lvgl_core::widgets::{Widget, WidgetType};
//! use serde_json::json;
//!
//! let label = Widget::new(WidgetType::Label)
//!     .at(50, 100)
//!     .sized(220, 20)
//!     .with("text", json!("Volume: 50%"))
//!     .unwrap();
//!
//! let doc = to_document(&label, &SerializeOptions::default());
//! assert_eq!(
//!     serde_json::Value::Object(doc),
//!     json!({"x": 50, "y": 100, "width": 220, "height": 20, "text": "Volume: 50%"})
//! );
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::foreign;
use crate::style::{Align, Color, LayoutType, Size};
use crate::widgets::{Widget, OPA_COVER};

/// Key holding the child widget list.
pub const CHILDREN_KEY: &str = "widgets";
/// Key holding the variant tag in project files.
pub const TYPE_KEY: &str = "widget_type";
/// Key of the nested mapping shared by `checked` and `disabled`.
pub const STATE_KEY: &str = "state";
/// Key of the nested layout mapping.
pub const LAYOUT_KEY: &str = "layout";
/// Key actions nest under with [`ActionPlacement::Nested`].
pub const ACTIONS_KEY: &str = "actions";

/// Where a widget's actions go in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPlacement {
    /// Trigger names become top-level keys next to the structural fields.
    /// This is what ESPHome reads; a trigger named like a structural field
    /// replaces that field.
    #[default]
    Flat,
    /// Actions nest under an `actions` mapping, so no key can collide.
    Nested,
}

/// Serializer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeOptions {
    pub actions: ActionPlacement,
}

/// How child entries identify their variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryStyle {
    /// `{widget_type: label, ...fields}` (project files)
    Tagged,
    /// `{label: {...fields}}` (LVGL config)
    Wrapped,
}

/// Whether shorthand fields hide the fields they shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fidelity {
    /// `pad_all` hides the sides and a zero-width border hides its colour
    /// (exports and [`to_document`])
    Minimal,
    /// Every field that differs from its default is written (project files)
    Lossless,
}

/// Canonical minimal mapping of one widget.
///
/// The widget's own variant tag is not included; children carry theirs as
/// a `widget_type` field so the tree can be rebuilt.
pub fn to_document(widget: &Widget, options: &SerializeOptions) -> Map<String, Value> {
    encode(widget, options, EntryStyle::Tagged, Fidelity::Minimal)
}

/// Project-file entry: `widget_type` followed by the widget's fields.
///
/// Unlike [`to_document`], the per-side padding is written next to
/// `pad_all` and a border colour is kept on a zero-width border, so loading
/// the entry restores the widget exactly.
pub fn to_project_entry(widget: &Widget, options: &SerializeOptions) -> Map<String, Value> {
    tagged(
        widget,
        encode(widget, options, EntryStyle::Tagged, Fidelity::Lossless),
    )
}

fn tagged(widget: &Widget, doc: Map<String, Value>) -> Map<String, Value> {
    let mut entry = Map::with_capacity(doc.len() + 1);
    entry.insert(
        TYPE_KEY.to_string(),
        Value::String(widget.widget_type().tag().to_string()),
    );
    entry.extend(doc);
    entry
}

pub(crate) fn encode(
    widget: &Widget,
    options: &SerializeOptions,
    style: EntryStyle,
    fidelity: Fidelity,
) -> Map<String, Value> {
    let mut doc = Map::new();

    if !widget.id.is_empty() {
        doc.insert("id".into(), Value::String(widget.id.clone()));
    }

    // position: zero is the default, not "unset"
    if widget.x != 0 {
        doc.insert("x".into(), Value::from(widget.x));
    }
    if widget.y != 0 {
        doc.insert("y".into(), Value::from(widget.y));
    }
    if widget.width != Size::Content {
        doc.insert("width".into(), widget.width.to_value());
    }
    if widget.height != Size::Content {
        doc.insert("height".into(), widget.height.to_value());
    }

    write_style(widget, fidelity, &mut doc);
    write_padding(widget, fidelity, &mut doc);

    if widget.align != Align::TopLeft {
        doc.insert("align".into(), Value::String(widget.align.as_str().into()));
    }

    write_flags(widget, &mut doc);
    write_state(widget, &mut doc);

    if widget.layout_type != LayoutType::None {
        let mut layout = Map::new();
        layout.insert("type".into(), Value::String(widget.layout_type.as_str().into()));
        doc.insert(LAYOUT_KEY.into(), Value::Object(layout));
    }

    if !widget.children.is_empty() {
        let children = widget
            .children
            .iter()
            .map(|child| {
                let body = encode(child, options, style, fidelity);
                Value::Object(match style {
                    EntryStyle::Tagged => tagged(child, body),
                    EntryStyle::Wrapped => foreign::wrap(child.widget_type(), body),
                })
            })
            .collect();
        doc.insert(CHILDREN_KEY.into(), Value::Array(children));
    }

    write_actions(widget, options, &mut doc);

    for (spec, value) in widget.variant_properties() {
        if spec.should_emit(value) {
            doc.insert(spec.name.into(), value.clone());
        }
    }

    doc
}

fn write_style(widget: &Widget, fidelity: Fidelity, doc: &mut Map<String, Value>) {
    if widget.bg_color != Color::WHITE {
        doc.insert("bg_color".into(), widget.bg_color.to_value());
    }
    if widget.bg_opa != OPA_COVER {
        doc.insert("bg_opa".into(), Value::String(widget.bg_opa.clone()));
    }
    if widget.border_width > 0 {
        doc.insert("border_width".into(), Value::from(widget.border_width));
    }
    // a zero-width border never carries a colour in exports
    if widget.border_width > 0 || fidelity == Fidelity::Lossless {
        if let Some(color) = widget.border_color {
            doc.insert("border_color".into(), color.to_value());
        }
    }
    if widget.border_opa != OPA_COVER {
        doc.insert("border_opa".into(), Value::String(widget.border_opa.clone()));
    }
    if widget.radius > 0 {
        doc.insert("radius".into(), Value::from(widget.radius));
    }
}

fn write_padding(widget: &Widget, fidelity: Fidelity, doc: &mut Map<String, Value>) {
    if widget.pad_all > 0 {
        doc.insert("pad_all".into(), Value::from(widget.pad_all));
        if fidelity == Fidelity::Minimal {
            return;
        }
    }
    let sides = [
        ("pad_top", widget.pad_top),
        ("pad_bottom", widget.pad_bottom),
        ("pad_left", widget.pad_left),
        ("pad_right", widget.pad_right),
    ];
    for (name, value) in sides {
        if value > 0 {
            doc.insert(name.into(), Value::from(value));
        }
    }
}

fn write_flags(widget: &Widget, doc: &mut Map<String, Value>) {
    let t = widget.widget_type();
    let flags = [
        ("hidden", widget.hidden, t.default_hidden()),
        ("clickable", widget.clickable, t.default_clickable()),
        ("checkable", widget.checkable, t.default_checkable()),
        ("scrollable", widget.scrollable, t.default_scrollable()),
    ];
    for (name, value, default) in flags {
        if value != default {
            doc.insert(name.into(), Value::Bool(value));
        }
    }
}

fn write_state(widget: &Widget, doc: &mut Map<String, Value>) {
    let mut state = Map::new();
    if widget.checked {
        state.insert("checked".into(), Value::Bool(true));
    }
    if widget.disabled {
        state.insert("disabled".into(), Value::Bool(true));
    }
    if !state.is_empty() {
        doc.insert(STATE_KEY.into(), Value::Object(state));
    }
}

fn write_actions(widget: &Widget, options: &SerializeOptions, doc: &mut Map<String, Value>) {
    if widget.actions.is_empty() {
        return;
    }
    match options.actions {
        ActionPlacement::Flat => {
            for (trigger, spec) in &widget.actions {
                if doc.contains_key(trigger) {
                    warn!(
                        "action trigger '{}' on widget '{}' replaces a field of the same name",
                        trigger, widget.id
                    );
                }
                doc.insert(trigger.clone(), spec.to_value());
            }
        }
        ActionPlacement::Nested => {
            let actions = widget
                .actions
                .iter()
                .map(|(trigger, spec)| (trigger.clone(), spec.to_value()))
                .collect();
            doc.insert(ACTIONS_KEY.into(), Value::Object(actions));
        }
    }
}
