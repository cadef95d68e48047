//! # lvgl_core - LVGL Layout Project Model
//!
//! `lvgl_core` holds the data side of a visual LVGL layout editor: the widget
//! model, the editor's own project format and two-way conversion to the
//! `lvgl:` configuration block that ESPHome loads onto the device.
//!
//! ## Design Philosophy
//!
//! - **Closed widget set**: one `WidgetType` enum, per-variant property tables
//! - **Minimal documents**: only values that differ from defaults are written
//! - **Tolerant import**: bad fields fall back and are reported, not fatal
//! - **No I/O outside [`file_io`]**: everything else is in-memory
//!
//! ## Quick Start
//!
//! ```rust
//! use lvgl_core::foreign::to_yaml;
//! use lvgl_core::project::{Project, MAIN_PAGE_ID};
//! use lvgl_core::serialize::SerializeOptions;
//! use lvgl_core::widgets::{Widget, WidgetType};
//! use serde_json::json;
//!
//! let mut project = Project::new();
//! let title = Widget::new(WidgetType::Label)
//!     .with_id("title")
//!     .with("text", json!("Hello"))
//!     .unwrap()
//!     .at(50, 0);
//! project.add_widget(MAIN_PAGE_ID, title).unwrap();
//!
//! let yaml = to_yaml(&project, &SerializeOptions::default()).unwrap();
//! assert!(yaml.contains("text: Hello"));
//! ```
//!
//! ## Modules
//!
//! - [`widgets`] - Widget variants, property schema tables and the factory
//! - [`style`] - Colours, sizes, alignment and layout enums
//! - [`actions`] - Trigger → action bindings
//! - [`serialize`] / [`deserialize`] - Widget ↔ document conversion
//! - [`project`] - Display settings, pages and their widgets
//! - [`document`] - Project file format and format detection
//! - [`foreign`] - ESPHome `lvgl:` config export and import
//! - [`editor`] - Selection, clipboard and arrangement
//! - [`summary`] - Markdown project overview
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic saves, loading and file locking

pub mod actions;
pub mod deserialize;
pub mod document;
pub mod editor;
pub mod errors;
pub mod file_io;
pub mod foreign;
pub mod project;
pub mod serialize;
pub mod style;
pub mod summary;
pub mod widgets;

pub use deserialize::{ImportReport, ImportWarning};
pub use document::{import_document, Imported};
pub use editor::EditorSession;
pub use errors::{LayoutError, LayoutResult};
pub use file_io::{load_project, save_project, FileLock};
pub use project::{DisplayConfig, Page, Project};
pub use serialize::{ActionPlacement, SerializeOptions};
pub use widgets::{create_widget, Widget, WidgetType};
