//! # Project Data Structures
//!
//! The `Project` struct is the root container for a layout: display
//! settings plus an ordered set of pages, each owning its widget trees.
//! Projects save to `.lvgl` files as JSON (see [`document`](crate::document))
//! and export to ESPHome LVGL configs (see [`foreign`](crate::foreign)).
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── version, meta (created / modified timestamps)
//! ├── display: DisplayConfig (resolution, colour depth, buffer size)
//! └── pages: IndexMap<String, Page> (in tab order)
//!     └── widgets: Vec<Widget> (z-order, children nested)
//! ```
//!
//! Exactly one page is the default (start-up) page whenever the project
//! has pages. The page operations below keep that invariant.
//!
//! ## Example
//!
//! ```rust
//! use lvgl_core::project::Project;
//! use lvgl_core::widgets::{Widget, WidgetType};
//!
//! let mut project = Project::new();
//! let settings = project.add_page("Settings");
//!
//! project
//!     .add_widget(&settings, Widget::new(WidgetType::Switch).with_id("wifi"))
//!     .unwrap();
//!
//! assert_eq!(project.default_page().unwrap().id, "main_page");
//! assert_eq!(project.widget_count(), 1);
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::{LayoutError, LayoutResult};
use crate::style::{Color, LayoutType, ScrollDirection};
use crate::widgets::{remove_from, Widget, WidgetType};

/// Current schema version for .lvgl files
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Id of the page every new project starts with
pub const MAIN_PAGE_ID: &str = "main_page";

/// Root project container.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub meta: ProjectMetadata,

    pub display: DisplayConfig,

    /// Pages keyed by id, in tab order
    pages: IndexMap<String, Page>,
}

impl Project {
    /// Create a project with a single default page `main_page`.
    pub fn new() -> Self {
        let mut project = Project::empty();
        project.pages.insert(
            MAIN_PAGE_ID.to_string(),
            Page {
                is_default: true,
                ..Page::new(MAIN_PAGE_ID, "Main Page")
            },
        );
        project
    }

    /// Create a project without any pages.
    pub fn empty() -> Self {
        Project {
            version: SCHEMA_VERSION.to_string(),
            meta: ProjectMetadata::default(),
            display: DisplayConfig::default(),
            pages: IndexMap::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Swap in a freshly imported project.
    ///
    /// Imports build a whole new value before anything is replaced, so a
    /// failed parse leaves the current project as it was.
    pub fn replace_with(&mut self, imported: Project) {
        *self = imported;
        self.touch();
    }

    // ========================================================================
    // Pages
    // ========================================================================

    /// Pages in tab order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    pub fn page_ids(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.get(page_id)
    }

    /// Mutable page access. Marks the project as modified when found.
    pub fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        if self.pages.contains_key(page_id) {
            self.meta.modified = Utc::now();
            self.pages.get_mut(page_id)
        } else {
            None
        }
    }

    /// The start-up page.
    pub fn default_page(&self) -> Option<&Page> {
        self.pages.values().find(|p| p.is_default)
    }

    /// Create an empty page and return its generated id.
    ///
    /// The first page of a project becomes the default.
    pub fn add_page(&mut self, name: impl Into<String>) -> String {
        let page_id = self.fresh_page_id();
        let mut page = Page::new(page_id.clone(), name);
        page.is_default = self.pages.is_empty();
        self.pages.insert(page_id.clone(), page);
        self.touch();
        page_id
    }

    /// Insert a fully built page under its own id.
    ///
    /// A page marked default takes the flag from the current default; the
    /// first page inserted becomes default regardless.
    pub fn insert_page(&mut self, mut page: Page) -> LayoutResult<()> {
        if self.pages.contains_key(&page.id) {
            return Err(LayoutError::DuplicatePage { page_id: page.id });
        }
        if self.pages.is_empty() {
            page.is_default = true;
        } else if page.is_default {
            self.pages.values_mut().for_each(|p| p.is_default = false);
        }
        self.pages.insert(page.id.clone(), page);
        self.touch();
        Ok(())
    }

    /// Delete a page and its widgets.
    ///
    /// Removing the default page promotes the first remaining page.
    pub fn remove_page(&mut self, page_id: &str) -> LayoutResult<Page> {
        let page = self
            .pages
            .shift_remove(page_id)
            .ok_or_else(|| LayoutError::page_not_found(page_id))?;
        if page.is_default {
            if let Some(first) = self.pages.values_mut().next() {
                debug!("default page '{}' removed, promoting '{}'", page_id, first.id);
                first.is_default = true;
            }
        }
        self.touch();
        Ok(page)
    }

    pub fn rename_page(&mut self, page_id: &str, name: impl Into<String>) -> LayoutResult<()> {
        let page = self
            .pages
            .get_mut(page_id)
            .ok_or_else(|| LayoutError::page_not_found(page_id))?;
        page.name = name.into();
        self.touch();
        Ok(())
    }

    /// Copy a page with all of its widgets.
    ///
    /// The copy is named "<name> Copy", is never the default, and every
    /// widget id (children included) gets a `_copy_<hex>` suffix. Returns
    /// the new page id.
    pub fn duplicate_page(&mut self, page_id: &str) -> LayoutResult<String> {
        let source = self
            .pages
            .get(page_id)
            .ok_or_else(|| LayoutError::page_not_found(page_id))?;

        let new_id = self.fresh_page_id();
        let mut copy = source.clone();
        copy.id = new_id.clone();
        copy.name = format!("{} Copy", source.name);
        copy.is_default = false;
        for widget in &mut copy.widgets {
            widget.walk_mut(&mut |w| {
                if !w.id.is_empty() {
                    w.id = format!("{}_copy_{}", w.id, short_hex(4));
                }
            });
        }

        self.pages.insert(new_id.clone(), copy);
        self.touch();
        Ok(new_id)
    }

    /// Make `page_id` the default page, clearing the flag elsewhere.
    pub fn set_default_page(&mut self, page_id: &str) -> LayoutResult<()> {
        if !self.pages.contains_key(page_id) {
            return Err(LayoutError::page_not_found(page_id));
        }
        for page in self.pages.values_mut() {
            page.is_default = page.id == page_id;
        }
        self.touch();
        Ok(())
    }

    /// Page after `page_id` in tab order, wrapping at the end.
    pub fn next_page_id(&self, page_id: &str) -> Option<&str> {
        let index = self.pages.get_index_of(page_id)?;
        let next = (index + 1) % self.pages.len();
        self.pages.get_index(next).map(|(id, _)| id.as_str())
    }

    /// Page before `page_id` in tab order, wrapping at the start.
    pub fn previous_page_id(&self, page_id: &str) -> Option<&str> {
        let index = self.pages.get_index_of(page_id)?;
        let previous = (index + self.pages.len() - 1) % self.pages.len();
        self.pages.get_index(previous).map(|(id, _)| id.as_str())
    }

    /// Restore the one-default invariant after a bulk load.
    pub(crate) fn normalize_default(&mut self) {
        let mut seen = false;
        for page in self.pages.values_mut() {
            if page.is_default && seen {
                page.is_default = false;
            }
            seen |= page.is_default;
        }
        if !seen {
            if let Some(first) = self.pages.values_mut().next() {
                first.is_default = true;
            }
        }
    }

    fn fresh_page_id(&self) -> String {
        loop {
            let id = format!("page_{}", short_hex(8));
            if !self.pages.contains_key(&id) {
                return id;
            }
        }
    }

    // ========================================================================
    // Widgets
    // ========================================================================

    /// Append a top-level widget to a page.
    pub fn add_widget(&mut self, page_id: &str, widget: Widget) -> LayoutResult<()> {
        self.page_mut(page_id)
            .ok_or_else(|| LayoutError::page_not_found(page_id))?
            .widgets
            .push(widget);
        Ok(())
    }

    /// Remove a widget (top-level or nested) by id.
    pub fn remove_widget(&mut self, page_id: &str, widget_id: &str) -> LayoutResult<Widget> {
        let page = self
            .pages
            .get_mut(page_id)
            .ok_or_else(|| LayoutError::page_not_found(page_id))?;
        let removed = remove_from(&mut page.widgets, widget_id)
            .ok_or_else(|| LayoutError::widget_not_found(page_id, widget_id))?;
        self.touch();
        Ok(removed)
    }

    /// Depth-first lookup through a page's widget trees.
    pub fn find_widget(&self, page_id: &str, widget_id: &str) -> Option<&Widget> {
        self.pages.get(page_id)?.find(widget_id)
    }

    /// Mutable lookup. Marks the project as modified when found.
    pub fn find_widget_mut(&mut self, page_id: &str, widget_id: &str) -> Option<&mut Widget> {
        let page = self.pages.get_mut(page_id)?;
        let widget = page.widgets.iter_mut().find_map(|w| w.find_mut(widget_id))?;
        self.meta.modified = Utc::now();
        Some(widget)
    }

    /// Total number of widgets in the project, nested ones included.
    pub fn widget_count(&self) -> usize {
        self.pages.values().map(Page::widget_count).sum()
    }

    /// Flattened property maps of a page's top-level widgets, for live
    /// previews. Every property is present, defaults included. An unknown
    /// page yields an empty list.
    pub fn widgets_for_page(&self, page_id: &str) -> Vec<Map<String, Value>> {
        self.pages
            .get(page_id)
            .map(|page| page.widgets.iter().map(Widget::to_full_map).collect())
            .unwrap_or_default()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new()
    }
}

/// Project timestamps stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMetadata {
    /// When the project was created (UTC)
    pub created: DateTime<Utc>,

    /// When the project was last modified (UTC)
    pub modified: DateTime<Utc>,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        let now = Utc::now();
        ProjectMetadata {
            created: now,
            modified: now,
        }
    }
}

/// Target display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub color_depth: u8,

    /// Frame buffer size as a share of the screen (`"100%"`, `"25%"`, ...)
    pub buffer_size: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 320,
            height: 240,
            color_depth: 16,
            buffer_size: "100%".to_string(),
        }
    }
}

/// One screen of the layout.
///
/// The serde impls cover the page settings only; widgets are stored in a
/// separate per-page list in project files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub id: String,
    pub name: String,
    pub layout: LayoutType,
    pub background_color: Color,
    pub scrollable: bool,
    pub scroll_direction: ScrollDirection,
    pub is_default: bool,

    /// Top-level widgets in z-order (last drawn on top)
    #[serde(skip)]
    pub widgets: Vec<Widget>,
}

impl Page {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Page {
            id: id.into(),
            name: name.into(),
            ..Page::default()
        }
    }

    /// Depth-first lookup through this page's widget trees.
    pub fn find(&self, widget_id: &str) -> Option<&Widget> {
        self.widgets.iter().find_map(|w| w.find(widget_id))
    }

    pub fn find_mut(&mut self, widget_id: &str) -> Option<&mut Widget> {
        self.widgets.iter_mut().find_map(|w| w.find_mut(widget_id))
    }

    /// Number of widgets on the page, nested ones included.
    pub fn widget_count(&self) -> usize {
        self.widgets.iter().map(Widget::subtree_len).sum()
    }

    /// Smallest `<type>_<n>` id not yet used on this page.
    pub fn next_widget_id(&self, widget_type: WidgetType) -> String {
        unique_widget_id(widget_type, |id| self.find(id).is_some())
    }

    /// Every widget id on the page, nested ones included.
    pub fn widget_ids(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        for widget in &self.widgets {
            widget.walk(&mut |w| {
                ids.insert(w.id.clone());
            });
        }
        ids
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            id: String::new(),
            name: String::new(),
            layout: LayoutType::None,
            background_color: Color::BLACK,
            scrollable: false,
            scroll_direction: ScrollDirection::Both,
            is_default: false,
            widgets: Vec::new(),
        }
    }
}

/// Smallest `<type>_<n>` for which `taken` is false.
pub(crate) fn unique_widget_id(widget_type: WidgetType, taken: impl Fn(&str) -> bool) -> String {
    (1u32..)
        .map(|n| format!("{}_{}", widget_type, n))
        .find(|id| !taken(id.as_str()))
        .unwrap_or_else(|| format!("{}_{}", widget_type, short_hex(8)))
}

/// First `len` hex digits of a fresh v4 UUID.
fn short_hex(len: usize) -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(len);
    hex
}
