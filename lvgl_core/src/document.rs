//! # Project Documents
//!
//! The `.lvgl` project format and format detection for imports.
//!
//! ## Project format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "meta": { "created": "...", "modified": "..." },
//!   "display_config": { "width": 320, "height": 240, "color_depth": 16, "buffer_size": "100%" },
//!   "pages": { "main_page": { "id": "main_page", "name": "Main Page", "is_default": true, ... } },
//!   "widgets": { "main_page": [ { "widget_type": "label", "id": "title", "text": "Hi" } ] }
//! }
//! ```
//!
//! Widgets are stored with `widget_type` first and actions nested under
//! `actions`. Defaults are left out as in an export, but per-side padding
//! next to `pad_all` and a colour on a zero-width border are kept, so saving
//! and loading is lossless. Every section is optional when loading.
//!
//! ## Import
//!
//! [`import_document`] accepts either a project file or an ESPHome LVGL
//! config and tells them apart by their top-level keys. Only text that
//! cannot be parsed at all (or has an incompatible version) is an error;
//! everything else is repaired and reported in the [`ImportReport`].
//!
//! ```rust
//! use lvgl_core::document::import_document;
//!
//! let imported = import_document("lvgl:\n  pages:\n    - id: home\n").unwrap();
//! assert_eq!(imported.project.default_page().unwrap().id, "home");
//! assert!(import_document("- not a document").is_err());
//! ```

use log::{debug, info};
use serde_json::{Map, Value};

use crate::deserialize::{widget_from_entry, ImportReport, ImportWarning};
use crate::errors::{LayoutError, LayoutResult};
use crate::foreign::{self, CONFIG_ROOT_KEY};
use crate::project::{DisplayConfig, Page, Project, ProjectMetadata, MAIN_PAGE_ID, SCHEMA_VERSION};
use crate::serialize::{to_project_entry, ActionPlacement, SerializeOptions};

const VERSION_KEY: &str = "version";
const META_KEY: &str = "meta";
const DISPLAY_KEY: &str = "display_config";
const PAGES_KEY: &str = "pages";
const WIDGETS_KEY: &str = "widgets";

/// Serializer settings used for project files.
pub const PROJECT_OPTIONS: SerializeOptions = SerializeOptions {
    actions: ActionPlacement::Nested,
};

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct Imported {
    pub project: Project,
    pub report: ImportReport,
}

/// Which vocabulary a document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.lvgl` project file
    Project,
    /// ESPHome `lvgl:` config
    Config,
}

// ============================================================================
// Writing
// ============================================================================

/// Project file contents as a JSON value.
pub fn to_value(project: &Project, options: &SerializeOptions) -> Value {
    let mut doc = Map::new();
    doc.insert(VERSION_KEY.into(), Value::String(project.version.clone()));
    doc.insert(META_KEY.into(), json_or_null(&project.meta));
    doc.insert(DISPLAY_KEY.into(), json_or_null(&project.display));

    let mut pages = Map::new();
    let mut widgets = Map::new();
    for page in project.pages() {
        pages.insert(page.id.clone(), json_or_null(page));
        let entries = page
            .widgets
            .iter()
            .map(|w| Value::Object(to_project_entry(w, options)))
            .collect();
        widgets.insert(page.id.clone(), Value::Array(entries));
    }
    doc.insert(PAGES_KEY.into(), Value::Object(pages));
    doc.insert(WIDGETS_KEY.into(), Value::Object(widgets));

    Value::Object(doc)
}

/// Pretty-printed project file.
pub fn to_json(project: &Project) -> LayoutResult<String> {
    serde_json::to_string_pretty(&to_value(project, &PROJECT_OPTIONS)).map_err(|e| {
        LayoutError::SerializationError {
            reason: e.to_string(),
        }
    })
}

// the settings types serialize infallibly (plain fields, string keys)
fn json_or_null<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// ============================================================================
// Reading
// ============================================================================

/// Rebuild a project from parsed project-file contents.
pub fn from_value(value: &Value) -> LayoutResult<Imported> {
    let doc = value.as_object().ok_or_else(|| LayoutError::UnrecognizedDocument {
        reason: "a project file must be a mapping".into(),
    })?;
    let mut report = ImportReport::new();
    let mut project = Project::empty();

    if let Some(version) = doc.get(VERSION_KEY) {
        let version = match version {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        validate_version(&version)?;
    }

    let meta = match doc.get(META_KEY) {
        Some(meta) => serde_json::from_value::<ProjectMetadata>(meta.clone()).unwrap_or_else(|e| {
            report.push(ImportWarning::InvalidEntry {
                context: META_KEY.into(),
                reason: e.to_string(),
            });
            ProjectMetadata::default()
        }),
        None => ProjectMetadata::default(),
    };

    if let Some(display) = doc.get(DISPLAY_KEY) {
        match serde_json::from_value::<DisplayConfig>(display.clone()) {
            Ok(display) => project.display = display,
            Err(e) => report.push(ImportWarning::InvalidEntry {
                context: DISPLAY_KEY.into(),
                reason: e.to_string(),
            }),
        }
    }

    if let Some(pages) = section(doc, PAGES_KEY, &mut report) {
        for (page_id, entry) in pages {
            let page = parse_page(page_id, entry, &mut report);
            project.insert_page(page)?;
        }
    }

    if let Some(widgets) = section(doc, WIDGETS_KEY, &mut report) {
        for (page_id, entries) in widgets {
            let Some(entries) = entries.as_array() else {
                report.push(ImportWarning::InvalidEntry {
                    context: format!("widgets of page '{}'", page_id),
                    reason: format!("expected a list, found {}", entries),
                });
                continue;
            };
            let parsed: Vec<_> = entries
                .iter()
                .filter_map(|entry| widget_from_entry(entry, &mut report))
                .collect();
            if project.page(page_id).is_none() {
                report.push(ImportWarning::OrphanWidgets {
                    page_id: page_id.clone(),
                    count: parsed.len(),
                });
                project.insert_page(Page::new(page_id.clone(), page_id.clone()))?;
            }
            if let Some(page) = project.page_mut(page_id) {
                page.widgets.extend(parsed);
            }
        }
    }

    if project.page_count() == 0 {
        debug!("project file has no pages, adding the main page");
        project.insert_page(Page::new(MAIN_PAGE_ID, "Main Page"))?;
    }
    project.normalize_default();
    // building the page set bumped the timestamp; keep the stored one
    project.meta = meta;

    info!(
        "loaded project: {} page(s), {} widget(s), {} warning(s)",
        project.page_count(),
        project.widget_count(),
        report.len()
    );
    Ok(Imported { project, report })
}

fn section<'a>(
    doc: &'a Map<String, Value>,
    key: &str,
    report: &mut ImportReport,
) -> Option<&'a Map<String, Value>> {
    match doc.get(key)? {
        Value::Object(map) => Some(map),
        Value::Null => None,
        other => {
            report.push(ImportWarning::InvalidEntry {
                context: key.to_string(),
                reason: format!("expected a mapping, found {}", other),
            });
            None
        }
    }
}

fn parse_page(page_id: &str, entry: &Value, report: &mut ImportReport) -> Page {
    let mut page = match serde_json::from_value::<Page>(entry.clone()) {
        Ok(page) => page,
        Err(e) => {
            report.push(ImportWarning::InvalidEntry {
                context: format!("page '{}'", page_id),
                reason: e.to_string(),
            });
            Page::default()
        }
    };
    // the map key is authoritative
    page.id = page_id.to_string();
    if page.name.is_empty() {
        page.name = page_id.to_string();
    }
    page
}

/// Validate that a file version is compatible with this library.
///
/// The major version must match. Within 0.x a newer minor version is
/// also rejected. Missing components count as zero (`"1.0"` is `1.0.0`).
pub fn validate_version(file_version: &str) -> LayoutResult<()> {
    let parse = |v: &str| -> Option<(u64, u64)> {
        let mut parts = v.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().map(str::parse::<u64>).transpose().ok()?.unwrap_or(0);
        Some((major, minor))
    };

    let mismatch = || LayoutError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (file_major, file_minor) = parse(file_version).ok_or_else(mismatch)?;
    let (current_major, current_minor) = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != current_major {
        return Err(mismatch());
    }
    if current_major == 0 && file_minor > current_minor {
        return Err(mismatch());
    }
    Ok(())
}

// ============================================================================
// Import
// ============================================================================

/// Parse text as JSON or YAML into a generic value.
pub fn parse_text(text: &str) -> LayoutResult<Value> {
    if text.trim_start().starts_with('{') {
        serde_json::from_str(text).map_err(|e| LayoutError::parse_error("JSON", e.to_string()))
    } else {
        serde_yaml::from_str(text).map_err(|e| LayoutError::parse_error("YAML", e.to_string()))
    }
}

/// Work out which vocabulary a parsed document uses.
pub fn detect_format(value: &Value) -> LayoutResult<DocumentFormat> {
    let Some(doc) = value.as_object() else {
        return Err(LayoutError::UnrecognizedDocument {
            reason: "the top level is not a mapping".into(),
        });
    };
    if doc.contains_key(CONFIG_ROOT_KEY) {
        Ok(DocumentFormat::Config)
    } else if [DISPLAY_KEY, PAGES_KEY, WIDGETS_KEY]
        .iter()
        .any(|key| doc.contains_key(*key))
    {
        Ok(DocumentFormat::Project)
    } else {
        Err(LayoutError::UnrecognizedDocument {
            reason: "expected an 'lvgl' section or project sections".into(),
        })
    }
}

/// Parse and rebuild a project from a project file or an LVGL config.
pub fn import_document(text: &str) -> LayoutResult<Imported> {
    let value = parse_text(text)?;
    match detect_format(&value)? {
        DocumentFormat::Project => from_value(&value),
        DocumentFormat::Config => Ok(foreign::import_config(&value)),
    }
}

impl Project {
    /// Replace this project with the contents of `text`.
    ///
    /// On error the project is left exactly as it was.
    pub fn import_replace(&mut self, text: &str) -> LayoutResult<ImportReport> {
        let Imported { project, report } = import_document(text)?;
        self.replace_with(project);
        Ok(report)
    }
}
