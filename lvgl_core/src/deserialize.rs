//! # Widget Deserializer
//!
//! Rebuilds widget trees from documents. Parsing is tolerant: bad values
//! never abort an import. Each problem becomes an [`ImportWarning`] in the
//! caller's [`ImportReport`] and the affected field keeps a usable value:
//!
//! - malformed `x`/`y` fall back to `0`
//! - malformed `width`/`height` fall back to the variant's nominal size
//! - any other malformed property keeps its default
//! - unparsable action blocks are dropped
//!
//! The same routine serves project files and LVGL configs. The config
//! importer in [`foreign`](crate::foreign) translates tags and field names
//! first and then hands each entry to [`widget_from_document`].

use std::fmt;

use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::actions::{is_trigger_name, ActionSpec};
use crate::errors::LayoutError;
use crate::foreign;
use crate::serialize::{EntryStyle, ACTIONS_KEY, CHILDREN_KEY, LAYOUT_KEY, STATE_KEY, TYPE_KEY};
use crate::style::{LayoutType, Size};
use crate::widgets::schema::as_bool;
use crate::widgets::{Widget, WidgetType};

/// One non-fatal problem met during an import.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportWarning {
    /// Tag outside the known vocabulary; a fallback variant was used
    UnknownWidgetType { tag: String, fallback: WidgetType },

    /// Position or size that is not a usable number
    MalformedNumber {
        widget_id: String,
        field: String,
        value: String,
        fallback: String,
    },

    /// Value that failed coercion; the field keeps its default
    InvalidProperty {
        widget_id: String,
        field: String,
        reason: String,
    },

    /// Action block that could not be parsed; the trigger is dropped
    InvalidAction {
        widget_id: String,
        trigger: String,
        reason: String,
    },

    /// Entry that is not a widget mapping at all; skipped
    InvalidEntry { context: String, reason: String },

    /// Widgets listed for a page with no page entry; the page was created
    OrphanWidgets { page_id: String, count: usize },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::UnknownWidgetType { tag, fallback } => {
                write!(f, "unknown widget type '{}', imported as {}", tag, fallback)
            }
            ImportWarning::MalformedNumber {
                widget_id,
                field,
                value,
                fallback,
            } => write!(
                f,
                "widget '{}': {} = {} is not a usable number, using {}",
                widget_id, field, value, fallback
            ),
            ImportWarning::InvalidProperty {
                widget_id,
                field,
                reason,
            } => write!(f, "widget '{}': skipped {}: {}", widget_id, field, reason),
            ImportWarning::InvalidAction {
                widget_id,
                trigger,
                reason,
            } => write!(
                f,
                "widget '{}': dropped action '{}': {}",
                widget_id, trigger, reason
            ),
            ImportWarning::InvalidEntry { context, reason } => {
                write!(f, "skipped entry in {}: {}", context, reason)
            }
            ImportWarning::OrphanWidgets { page_id, count } => write!(
                f,
                "{} widget(s) reference missing page '{}', page created",
                count, page_id
            ),
        }
    }
}

/// Warnings collected over one import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub warnings: Vec<ImportWarning>,
}

impl ImportReport {
    pub fn new() -> Self {
        ImportReport::default()
    }

    /// Record (and log) a warning.
    pub fn push(&mut self, warning: ImportWarning) {
        warn!("import: {}", warning);
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Rebuild a widget of a known variant from its field mapping.
///
/// Accepts the minimal form, the project-entry form and the full
/// flattened map. Actions may be flat `on_*` keys or nested under
/// `actions`.
pub fn widget_from_document(
    widget_type: WidgetType,
    doc: &Map<String, Value>,
    report: &mut ImportReport,
) -> Widget {
    build(widget_type, doc, EntryStyle::Tagged, report)
}

/// Rebuild one project-file entry (`{widget_type: ..., ...}`).
///
/// A missing `widget_type` means `obj`; an unknown one falls back to
/// `obj` with a warning.
pub fn widget_from_entry(entry: &Value, report: &mut ImportReport) -> Option<Widget> {
    let Some(doc) = entry.as_object() else {
        report.push(ImportWarning::InvalidEntry {
            context: "widget list".into(),
            reason: format!("expected a mapping, found {}", entry),
        });
        return None;
    };
    let widget_type = match doc.get(TYPE_KEY) {
        None => WidgetType::Obj,
        Some(Value::String(tag)) => WidgetType::from_tag(tag).unwrap_or_else(|| {
            report.push(ImportWarning::UnknownWidgetType {
                tag: tag.clone(),
                fallback: WidgetType::Obj,
            });
            WidgetType::Obj
        }),
        Some(other) => {
            report.push(ImportWarning::UnknownWidgetType {
                tag: other.to_string(),
                fallback: WidgetType::Obj,
            });
            WidgetType::Obj
        }
    };
    Some(widget_from_document(widget_type, doc, report))
}

pub(crate) fn build(
    widget_type: WidgetType,
    doc: &Map<String, Value>,
    style: EntryStyle,
    report: &mut ImportReport,
) -> Widget {
    let mut widget = Widget::new(widget_type);

    // the id first, so later warnings can name the widget
    if let Some(id) = doc.get("id") {
        set_or_warn(&mut widget, "id", id, report);
    }

    for (key, value) in doc {
        match key.as_str() {
            TYPE_KEY | "id" => {}
            "x" | "y" => {
                if widget.set(key, value.clone()).is_err() {
                    malformed(&mut widget, key, value, 0, report);
                }
            }
            "width" | "height" => {
                if widget.set(key, value.clone()).is_err() {
                    let (w, h) = widget_type.default_size();
                    let nominal = if key == "width" { w } else { h };
                    malformed(&mut widget, key, value, nominal, report);
                }
            }
            STATE_KEY => apply_state(&mut widget, value, report),
            LAYOUT_KEY => apply_layout(&mut widget, value, report),
            CHILDREN_KEY => apply_children(&mut widget, value, style, report),
            ACTIONS_KEY if !widget.has_property(key) => match value {
                Value::Object(actions) => {
                    for (trigger, spec) in actions {
                        apply_action(&mut widget, trigger, spec, report);
                    }
                }
                other => report.push(ImportWarning::InvalidAction {
                    widget_id: widget.id.clone(),
                    trigger: ACTIONS_KEY.into(),
                    reason: format!("expected a mapping of triggers, found {}", other),
                }),
            },
            _ if widget.has_property(key) => set_or_warn(&mut widget, key, value, report),
            _ if is_trigger_name(key) => apply_action(&mut widget, key, value, report),
            _ => debug!("ignoring field '{}' on {} widget", key, widget_type),
        }
    }

    widget
}

fn set_or_warn(widget: &mut Widget, field: &str, value: &Value, report: &mut ImportReport) {
    if let Err(e) = widget.set(field, value.clone()) {
        let reason = match e {
            LayoutError::InvalidProperty { reason, .. } => reason,
            other => other.to_string(),
        };
        report.push(ImportWarning::InvalidProperty {
            widget_id: widget.id.clone(),
            field: field.to_string(),
            reason,
        });
    }
}

fn malformed(widget: &mut Widget, field: &str, value: &Value, fallback: u32, report: &mut ImportReport) {
    match field {
        "x" => widget.x = fallback as i32,
        "y" => widget.y = fallback as i32,
        "width" => widget.width = Size::Px(fallback),
        _ => widget.height = Size::Px(fallback),
    }
    report.push(ImportWarning::MalformedNumber {
        widget_id: widget.id.clone(),
        field: field.to_string(),
        value: value.to_string(),
        fallback: fallback.to_string(),
    });
}

fn apply_state(widget: &mut Widget, value: &Value, report: &mut ImportReport) {
    match value {
        Value::Object(state) => {
            for (key, flag) in state {
                match key.as_str() {
                    "checked" | "disabled" => set_or_warn(widget, key, flag, report),
                    other => debug!("ignoring state '{}' on widget '{}'", other, widget.id),
                }
            }
        }
        // switch/led configs write `state: true`
        other => match as_bool(other) {
            Some(checked) => widget.checked = checked,
            None => report.push(ImportWarning::InvalidProperty {
                widget_id: widget.id.clone(),
                field: STATE_KEY.into(),
                reason: format!("expected a mapping or bool, found {}", other),
            }),
        },
    }
}

fn apply_layout(widget: &mut Widget, value: &Value, report: &mut ImportReport) {
    let kind = match value {
        Value::Object(layout) => layout.get("type").unwrap_or(&Value::Null),
        other => other,
    };
    match LayoutType::from_value(kind) {
        Some(layout) => widget.layout_type = layout,
        None => report.push(ImportWarning::InvalidProperty {
            widget_id: widget.id.clone(),
            field: LAYOUT_KEY.into(),
            reason: format!("unknown layout {}", kind),
        }),
    }
}

fn apply_children(widget: &mut Widget, value: &Value, style: EntryStyle, report: &mut ImportReport) {
    let Some(entries) = value.as_array() else {
        report.push(ImportWarning::InvalidEntry {
            context: format!("children of '{}'", widget.id),
            reason: format!("expected a list, found {}", value),
        });
        return;
    };
    for entry in entries {
        let child = match style {
            EntryStyle::Tagged => widget_from_entry(entry, report),
            EntryStyle::Wrapped => foreign::widget_from_config_entry(entry, report),
        };
        if let Some(child) = child {
            widget.add_child(child);
        }
    }
}

fn apply_action(widget: &mut Widget, trigger: &str, value: &Value, report: &mut ImportReport) {
    match ActionSpec::from_value(value) {
        Ok(spec) => widget.set_action(trigger, spec),
        Err(reason) => report.push(ImportWarning::InvalidAction {
            widget_id: widget.id.clone(),
            trigger: trigger.to_string(),
            reason,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::{to_document, ActionPlacement, SerializeOptions};
    use crate::style::{Align, Color};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    /// A widget with every common field and every variant field moved off
    /// its default.
    fn customized(t: WidgetType) -> Widget {
        let mut w = Widget::new(t).with_id(format!("{}_1", t)).at(12, -7).sized(90, 45);
        w.bg_color = Color(0x102030);
        w.bg_opa = "50%".into();
        w.border_width = 2;
        w.border_color = Some(Color::BLACK);
        w.border_opa = "TRANSP".into();
        w.radius = 6;
        w.pad_top = 1;
        w.pad_bottom = 2;
        w.pad_left = 3;
        w.pad_right = 4;
        w.align = Align::BottomMid;
        w.hidden = true;
        w.clickable = false;
        w.checkable = !t.default_checkable();
        w.scrollable = false;
        w.checked = true;
        w.disabled = true;
        w.layout_type = LayoutType::Grid;
        w.set_action(
            "on_click",
            ActionSpec::new()
                .then("logger.log", json!("clicked"))
                .then("lvgl.page.next", json!({})),
        );
        for spec in w.schema() {
            let changed = match spec.name {
                "text_color" | "arc_color" | "light_color" | "dark_color" | "color" => {
                    json!("0x123456")
                }
                "options" => json!(["A", "B"]),
                "angle" | "zoom" | "range_from" | "range_to" | "step" => json!(2.5),
                "value" if t == WidgetType::Spinbox => json!(7.5),
                "recolor" | "antialias" | "adjustable" | "one_line" | "password_mode"
                | "rollover" => json!(true),
                "arc_rounded" | "animated" => json!(false),
                "pivot_x" | "pivot_y" | "max_length" => json!(17),
                _ => match spec.kind {
                    crate::widgets::schema::PropertyKind::Int => json!(3),
                    _ => json!("changed"),
                },
            };
            w.set(spec.name, changed).unwrap();
        }
        w
    }

    #[test]
    fn test_round_trip_every_variant() {
        for t in WidgetType::ALL {
            let options = SerializeOptions::default();
            for original in [Widget::new(t), customized(t)] {
                let doc = to_document(&original, &options);
                let mut report = ImportReport::new();
                let restored = widget_from_document(t, &doc, &mut report);
                assert!(report.is_clean(), "{}: {:?}", t, report);
                assert_eq!(restored, original, "{} did not round-trip", t);
            }
        }
    }

    #[test]
    fn test_round_trip_nested_actions() {
        let original = customized(WidgetType::Button);
        let options = SerializeOptions {
            actions: ActionPlacement::Nested,
        };
        let doc = to_document(&original, &options);
        let restored = widget_from_document(WidgetType::Button, &doc, &mut ImportReport::new());
        assert_eq!(restored, original);
    }

    #[test]
    fn test_children_order_survives() {
        let mut panel = Widget::new(WidgetType::Obj).with_id("panel");
        panel.add_child(Widget::new(WidgetType::Label).with_id("first"));
        panel.add_child(Widget::new(WidgetType::Switch).with_id("second"));
        panel.add_child(Widget::new(WidgetType::Bar).with_id("third"));

        let doc = to_document(&panel, &SerializeOptions::default());
        let restored = widget_from_document(WidgetType::Obj, &doc, &mut ImportReport::new());
        let ids: Vec<_> = restored.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
        assert_eq!(restored, panel);
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let doc = object(json!({
            "id": "broken",
            "x": "left",
            "y": 12.5,
            "width": "wide",
            "height": -3
        }));
        let mut report = ImportReport::new();
        let w = widget_from_document(WidgetType::Slider, &doc, &mut report);

        assert_eq!((w.x, w.y), (0, 0));
        assert_eq!(w.width, Size::Px(150));
        assert_eq!(w.height, Size::Px(20));
        assert_eq!(report.len(), 4);
        assert!(matches!(
            &report.warnings[0],
            ImportWarning::MalformedNumber { widget_id, field, .. }
                if widget_id == "broken" && field == "x"
        ));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let doc = object(json!({"text": "ok", "text_color": "not a colour", "recolor": "maybe"}));
        let mut report = ImportReport::new();
        let w = widget_from_document(WidgetType::Label, &doc, &mut report);
        assert_eq!(w.get("text"), Some(json!("ok")));
        assert_eq!(w.get("text_color"), Some(Value::Null));
        assert_eq!(w.get("recolor"), Some(json!(false)));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let doc = object(json!({"id": "b", "text": "Click", "flavour": "mint"}));
        let mut report = ImportReport::new();
        let w = widget_from_document(WidgetType::Button, &doc, &mut report);
        assert_eq!(w.id, "b");
        assert!(report.is_clean());
    }

    #[test]
    fn test_bool_state_sets_checked() {
        let doc = object(json!({"state": true}));
        let w = widget_from_document(WidgetType::Switch, &doc, &mut ImportReport::new());
        assert!(w.checked);
        assert!(!w.disabled);
    }

    #[test]
    fn test_bad_action_is_dropped() {
        let doc = object(json!({
            "on_click": 5,
            "on_release": [{"logger.log": "up"}]
        }));
        let mut report = ImportReport::new();
        let w = widget_from_document(WidgetType::Button, &doc, &mut report);
        assert!(!w.actions.contains_key("on_click"));
        assert_eq!(w.actions["on_release"].then[0].action, "logger.log");
        assert!(matches!(
            report.warnings[0],
            ImportWarning::InvalidAction { .. }
        ));
    }

    #[test]
    fn test_entry_type_resolution() {
        let mut report = ImportReport::new();
        let w = widget_from_entry(&json!({"widget_type": "led", "id": "l"}), &mut report).unwrap();
        assert_eq!(w.widget_type(), WidgetType::Led);

        let w = widget_from_entry(&json!({"id": "plain"}), &mut report).unwrap();
        assert_eq!(w.widget_type(), WidgetType::Obj);
        assert!(report.is_clean());

        let w = widget_from_entry(&json!({"widget_type": "chart"}), &mut report).unwrap();
        assert_eq!(w.widget_type(), WidgetType::Obj);
        assert_eq!(report.len(), 1);

        assert!(widget_from_entry(&json!("label"), &mut report).is_none());
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_full_map_is_accepted() {
        let mut original = Widget::new(WidgetType::Dropdown).with_id("menu").at(3, 4);
        original.set_action("on_change", ActionSpec::new().then("logger.log", json!("x")));
        original.add_child(Widget::new(WidgetType::Label).with_id("hint"));

        let full = original.to_full_map();
        let mut report = ImportReport::new();
        let restored = widget_from_document(WidgetType::Dropdown, &full, &mut report);
        assert_eq!(restored, original);
        assert!(report.is_clean(), "{:?}", report);
    }
}
