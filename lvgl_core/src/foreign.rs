//! # ESPHome LVGL Configs
//!
//! Export of a project as the `lvgl:` section of an ESPHome YAML config,
//! and import of such a section back into a project.
//!
//! ```yaml
//! lvgl:
//!   displays:
//!     - width: 320
//!       height: 240
//!       color_depth: 16
//!   buffer_size: 100%
//!   pages:
//!     - id: main_page
//!       widgets:
//!         - label:
//!             x: 50
//!             text: Hello
//! ```
//!
//! Widgets are written as single-key mappings named by their tag, fields in
//! the minimal serialized form. The default page always comes first
//! because LVGL shows the first page on boot.
//!
//! On import, older and alternate spellings are accepted: `btn`, `img` and
//! `btnmatrix` tags, `{type: slider, ...}` entries, and the `range_min` /
//! `range_max` / `placeholder` field names. Tags outside the vocabulary are
//! imported as labels so the content stays visible.

use std::collections::HashMap;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::deserialize::{build, ImportReport, ImportWarning};
use crate::document::Imported;
use crate::errors::{LayoutError, LayoutResult};
use crate::project::{unique_widget_id, DisplayConfig, Page, Project, MAIN_PAGE_ID};
use crate::serialize::{encode, EntryStyle, Fidelity, SerializeOptions, CHILDREN_KEY, LAYOUT_KEY};
use crate::style::{Color, LayoutType, ScrollDirection};
use crate::widgets::schema::{as_bool, as_i64};
use crate::widgets::{Widget, WidgetType};

/// Top-level key of the config section
pub const CONFIG_ROOT_KEY: &str = "lvgl";

const DISPLAYS_KEY: &str = "displays";
const BUFFER_KEY: &str = "buffer_size";
const PAGES_KEY: &str = "pages";
const TYPE_KEY: &str = "type";

/// Variant imported for tags outside the vocabulary
pub const FALLBACK_TYPE: WidgetType = WidgetType::Label;

/// Config tag → variant. Every internal tag maps to itself; the rest are
/// legacy LVGL spellings.
static TAGS: Lazy<HashMap<&'static str, WidgetType>> = Lazy::new(|| {
    let mut tags: HashMap<&'static str, WidgetType> =
        WidgetType::ALL.iter().map(|t| (t.tag(), *t)).collect();
    tags.insert("btn", WidgetType::Button);
    tags.insert("img", WidgetType::Image);
    tags.insert("btnmatrix", WidgetType::Buttonmatrix);
    tags
});

/// Field renames applied on import: (variant, config name, model name).
const FIELD_ALIASES: &[(WidgetType, &str, &str)] = &[
    (WidgetType::Slider, "range_min", "min_value"),
    (WidgetType::Slider, "range_max", "max_value"),
    (WidgetType::Bar, "range_min", "min_value"),
    (WidgetType::Bar, "range_max", "max_value"),
    (WidgetType::Arc, "range_min", "min_value"),
    (WidgetType::Arc, "range_max", "max_value"),
    (WidgetType::Spinbox, "min_value", "range_from"),
    (WidgetType::Spinbox, "max_value", "range_to"),
    (WidgetType::Textarea, "placeholder", "placeholder_text"),
];

/// Resolve a config tag.
pub fn resolve_tag(tag: &str) -> Option<WidgetType> {
    TAGS.get(tag).copied()
}

/// Rename config field names to model names for one variant.
pub fn translate_fields(widget_type: WidgetType, fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| {
            let name = FIELD_ALIASES
                .iter()
                .find(|(t, from, _)| *t == widget_type && *from == key.as_str())
                .map_or(key.as_str(), |(_, _, to)| *to);
            (name.to_string(), value.clone())
        })
        .collect()
}

/// `{tag: fields}`
pub(crate) fn wrap(widget_type: WidgetType, body: Map<String, Value>) -> Map<String, Value> {
    let mut entry = Map::with_capacity(1);
    entry.insert(widget_type.tag().to_string(), Value::Object(body));
    entry
}

// ============================================================================
// Export
// ============================================================================

/// Config entry of one widget.
pub fn to_config_entry(widget: &Widget, options: &SerializeOptions) -> Map<String, Value> {
    wrap(widget.widget_type(), encode(widget, options, EntryStyle::Wrapped, Fidelity::Minimal))
}

/// The whole `lvgl:` document as a value.
pub fn export_config(project: &Project, options: &SerializeOptions) -> Value {
    let mut display = Map::new();
    display.insert("width".into(), Value::from(project.display.width));
    display.insert("height".into(), Value::from(project.display.height));
    display.insert("color_depth".into(), Value::from(project.display.color_depth));

    let mut lvgl = Map::new();
    lvgl.insert(DISPLAYS_KEY.into(), Value::Array(vec![Value::Object(display)]));
    lvgl.insert(
        BUFFER_KEY.into(),
        Value::String(project.display.buffer_size.clone()),
    );

    let ordered = project
        .pages()
        .filter(|p| p.is_default)
        .chain(project.pages().filter(|p| !p.is_default));
    let pages = ordered.map(|page| Value::Object(page_entry(page, options))).collect();
    lvgl.insert(PAGES_KEY.into(), Value::Array(pages));

    let mut root = Map::new();
    root.insert(CONFIG_ROOT_KEY.into(), Value::Object(lvgl));
    Value::Object(root)
}

fn page_entry(page: &Page, options: &SerializeOptions) -> Map<String, Value> {
    let mut entry = Map::new();
    entry.insert("id".into(), Value::String(page.id.clone()));
    if page.background_color != Color::BLACK {
        entry.insert("bg_color".into(), page.background_color.to_value());
    }
    if page.scrollable {
        entry.insert("scrollable".into(), Value::Bool(true));
    }
    if page.scroll_direction != ScrollDirection::Both {
        entry.insert(
            "scroll_dir".into(),
            Value::String(page.scroll_direction.as_str().into()),
        );
    }
    if page.layout != LayoutType::None {
        let mut layout = Map::new();
        layout.insert(TYPE_KEY.into(), Value::String(page.layout.as_str().into()));
        entry.insert(LAYOUT_KEY.into(), Value::Object(layout));
    }
    if !page.widgets.is_empty() {
        let widgets = page
            .widgets
            .iter()
            .map(|w| Value::Object(to_config_entry(w, options)))
            .collect();
        entry.insert(CHILDREN_KEY.into(), Value::Array(widgets));
    }
    entry
}

/// The `lvgl:` document as YAML text.
pub fn to_yaml(project: &Project, options: &SerializeOptions) -> LayoutResult<String> {
    serde_yaml::to_string(&export_config(project, options)).map_err(|e| {
        LayoutError::SerializationError {
            reason: e.to_string(),
        }
    })
}

// ============================================================================
// Import
// ============================================================================

/// Rebuild one widget from a config list entry.
///
/// Accepts `{tag: {fields}}` and `{type: tag, ...fields}`; an entry with
/// neither is a plain `obj`.
pub fn widget_from_config_entry(entry: &Value, report: &mut ImportReport) -> Option<Widget> {
    let Some(map) = entry.as_object() else {
        report.push(ImportWarning::InvalidEntry {
            context: "widget list".into(),
            reason: format!("expected a mapping, found {}", entry),
        });
        return None;
    };

    let empty = Map::new();
    let (tag, fields): (Option<String>, &Map<String, Value>) = match map.get(TYPE_KEY) {
        Some(tag) => (Some(tag_text(tag)), map),
        None if map.len() == 1 => match map.iter().next() {
            Some((tag, Value::Object(fields))) => (Some(tag.clone()), fields),
            Some((tag, Value::Null)) => (Some(tag.clone()), &empty),
            _ => (None, map),
        },
        None => (None, map),
    };

    let widget_type = match tag {
        None => WidgetType::Obj,
        Some(tag) => resolve_tag(&tag).unwrap_or_else(|| {
            report.push(ImportWarning::UnknownWidgetType {
                tag,
                fallback: FALLBACK_TYPE,
            });
            FALLBACK_TYPE
        }),
    };

    let mut fields = translate_fields(widget_type, fields);
    fields.remove(TYPE_KEY);
    Some(build(widget_type, &fields, EntryStyle::Wrapped, report))
}

fn tag_text(tag: &Value) -> String {
    match tag {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Rebuild a project from a parsed config (`{lvgl: {...}}`).
pub fn import_config(value: &Value) -> Imported {
    let mut report = ImportReport::new();
    let mut project = Project::empty();

    let empty = Map::new();
    let lvgl = match value.get(CONFIG_ROOT_KEY) {
        Some(Value::Object(lvgl)) => lvgl,
        Some(Value::Null) | None => &empty,
        Some(other) => {
            report.push(ImportWarning::InvalidEntry {
                context: CONFIG_ROOT_KEY.into(),
                reason: format!("expected a mapping, found {}", other),
            });
            &empty
        }
    };

    project.display = import_display(lvgl, &mut report);

    match lvgl.get(PAGES_KEY) {
        Some(Value::Array(pages)) => {
            for (index, entry) in pages.iter().enumerate() {
                if let Some(page) = import_page(index, entry, &project, &mut report) {
                    // ids are made unique by import_page
                    if let Err(e) = project.insert_page(page) {
                        debug!("skipping page: {}", e);
                    }
                }
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => report.push(ImportWarning::InvalidEntry {
            context: PAGES_KEY.into(),
            reason: format!("expected a list, found {}", other),
        }),
    }

    if project.page_count() == 0 {
        debug!("config has no pages, adding the main page");
        if let Err(e) = project.insert_page(Page::new(MAIN_PAGE_ID, "Main Page")) {
            warn!("could not add the main page: {}", e);
        }
    }
    project.normalize_default();

    info!(
        "imported LVGL config: {} page(s), {} widget(s), {} warning(s)",
        project.page_count(),
        project.widget_count(),
        report.len()
    );
    Imported { project, report }
}

fn import_display(lvgl: &Map<String, Value>, report: &mut ImportReport) -> DisplayConfig {
    let mut display = DisplayConfig::default();

    let first = match lvgl.get(DISPLAYS_KEY) {
        Some(Value::Array(items)) => items.first(),
        Some(single @ Value::Object(_)) => Some(single),
        _ => None,
    };
    if let Some(Value::Object(fields)) = first {
        if let Some(v) = fields.get("width") {
            number_field(v, "display.width", &mut display.width, report);
        }
        if let Some(v) = fields.get("height") {
            number_field(v, "display.height", &mut display.height, report);
        }
        if let Some(v) = fields.get("color_depth") {
            number_field(v, "display.color_depth", &mut display.color_depth, report);
        }
    }

    match lvgl.get(BUFFER_KEY) {
        Some(Value::String(s)) => display.buffer_size = s.clone(),
        Some(Value::Number(n)) => display.buffer_size = n.to_string(),
        _ => {}
    }
    display
}

fn number_field<T: TryFrom<i64> + ToString>(
    value: &Value,
    field: &str,
    target: &mut T,
    report: &mut ImportReport,
) {
    match as_i64(value).and_then(|n| T::try_from(n).ok()) {
        Some(n) => *target = n,
        None => report.push(ImportWarning::MalformedNumber {
            widget_id: String::new(),
            field: field.to_string(),
            value: value.to_string(),
            fallback: target.to_string(),
        }),
    }
}

fn import_page(index: usize, entry: &Value, project: &Project, report: &mut ImportReport) -> Option<Page> {
    let Some(fields) = entry.as_object() else {
        report.push(ImportWarning::InvalidEntry {
            context: format!("page {}", index + 1),
            reason: format!("expected a mapping, found {}", entry),
        });
        return None;
    };

    let mut id = match fields.get("id") {
        Some(id) => tag_text(id),
        None => format!("page_{}", index + 1),
    };
    if project.page(&id).is_some() {
        let original = id.clone();
        id = (2..)
            .map(|n| format!("{}_{}", original, n))
            .find(|candidate| project.page(candidate).is_none())
            .unwrap_or_default();
        report.push(ImportWarning::InvalidEntry {
            context: format!("page '{}'", original),
            reason: format!("duplicate page id, imported as '{}'", id),
        });
    }

    let mut page = Page::new(id.clone(), id.clone());
    page.is_default = index == 0;
    let context = format!("page '{}'", id);

    if let Some(v) = fields.get("bg_color") {
        match Color::from_value(v) {
            Some(color) => page.background_color = color,
            None => page_warning(report, &context, "bg_color", v),
        }
    }
    if let Some(v) = fields.get("scrollable") {
        match as_bool(v) {
            Some(flag) => page.scrollable = flag,
            None => page_warning(report, &context, "scrollable", v),
        }
    }
    if let Some(v) = fields.get("scroll_dir") {
        match ScrollDirection::from_value(v) {
            Some(dir) => page.scroll_direction = dir,
            None => page_warning(report, &context, "scroll_dir", v),
        }
    }
    if let Some(v) = fields.get(LAYOUT_KEY) {
        let kind = match v {
            Value::Object(layout) => layout.get(TYPE_KEY).unwrap_or(&Value::Null),
            other => other,
        };
        match LayoutType::from_value(kind) {
            Some(layout) => page.layout = layout,
            None => page_warning(report, &context, LAYOUT_KEY, v),
        }
    }

    match fields.get(CHILDREN_KEY) {
        Some(Value::Array(entries)) => {
            page.widgets = entries
                .iter()
                .filter_map(|e| widget_from_config_entry(e, report))
                .collect();
        }
        Some(Value::Null) | None => {}
        Some(other) => report.push(ImportWarning::InvalidEntry {
            context: format!("widgets of {}", context),
            reason: format!("expected a list, found {}", other),
        }),
    }
    assign_missing_ids(&mut page);
    Some(page)
}

fn page_warning(report: &mut ImportReport, context: &str, field: &str, value: &Value) {
    report.push(ImportWarning::InvalidEntry {
        context: context.to_string(),
        reason: format!("ignored {} = {}", field, value),
    });
}

/// Give every id-less widget a `<type>_<n>` id unique on the page.
fn assign_missing_ids(page: &mut Page) {
    let mut used = page.widget_ids();
    for widget in &mut page.widgets {
        widget.walk_mut(&mut |w| {
            if w.id.is_empty() {
                let id = unique_widget_id(w.widget_type(), |candidate| used.contains(candidate));
                used.insert(id.clone());
                w.id = id;
            }
        });
    }
}
