//! # Editor Session
//!
//! Selection, clipboard and arrangement operations of an editing session.
//!
//! The session never holds references into the project. Selection is a set
//! of widget ids on the current page and the clipboard owns clones, so a
//! selected widget can be edited from anywhere without aliasing. Every
//! operation takes the project explicitly.
//!
//! ```rust
//! use lvgl_core::editor::{Alignment, EditorSession};
//! use lvgl_core::project::{Project, MAIN_PAGE_ID};
//! use lvgl_core::widgets::{Widget, WidgetType};
//!
//! let mut project = Project::new();
//! project.add_widget(MAIN_PAGE_ID, Widget::new(WidgetType::Button).with_id("a").at(10, 5)).unwrap();
//! project.add_widget(MAIN_PAGE_ID, Widget::new(WidgetType::Button).with_id("b").at(40, 60)).unwrap();
//!
//! let mut session = EditorSession::new(MAIN_PAGE_ID);
//! session.select_all(&project);
//! session.align_selected(&mut project, Alignment::Left).unwrap();
//! assert_eq!(project.find_widget(MAIN_PAGE_ID, "b").unwrap().x, 10);
//! ```

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};
use crate::project::{unique_widget_id, Page, Project};
use crate::widgets::{remove_from, Widget};

/// Offset applied to pasted widgets.
pub const PASTE_OFFSET: i32 = 20;

/// Extent assumed for content-sized widgets when arranging.
pub const NOMINAL_WIDTH: u32 = 100;
pub const NOMINAL_HEIGHT: u32 = 30;

/// Edge or centre line to align a selection on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Right,
    /// Common vertical centre line
    CenterH,
    Top,
    Bottom,
    /// Common horizontal centre line
    Middle,
}

/// Axis to spread a selection along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    Horizontal,
    Vertical,
}

/// Per-session editing state.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    page_id: String,
    selection: BTreeSet<String>,
    clipboard: Vec<Widget>,
}

impl EditorSession {
    pub fn new(page_id: impl Into<String>) -> Self {
        EditorSession {
            page_id: page_id.into(),
            ..EditorSession::default()
        }
    }

    /// Session on the project's default page.
    pub fn for_project(project: &Project) -> Self {
        EditorSession::new(project.default_page().map(|p| p.id.clone()).unwrap_or_default())
    }

    /// Page the session edits.
    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    /// Switch pages. The selection is cleared; the clipboard is kept.
    pub fn set_page(&mut self, project: &Project, page_id: &str) -> LayoutResult<()> {
        if project.page(page_id).is_none() {
            return Err(LayoutError::page_not_found(page_id));
        }
        self.page_id = page_id.to_string();
        self.selection.clear();
        Ok(())
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn is_selected(&self, widget_id: &str) -> bool {
        self.selection.contains(widget_id)
    }

    /// Select a single widget, replacing the selection.
    pub fn select(&mut self, project: &Project, widget_id: &str) -> LayoutResult<()> {
        self.require_widget(project, widget_id)?;
        self.selection.clear();
        self.selection.insert(widget_id.to_string());
        Ok(())
    }

    /// Add or remove one widget. Returns whether it is now selected.
    pub fn toggle(&mut self, project: &Project, widget_id: &str) -> LayoutResult<bool> {
        self.require_widget(project, widget_id)?;
        if self.selection.remove(widget_id) {
            Ok(false)
        } else {
            self.selection.insert(widget_id.to_string());
            Ok(true)
        }
    }

    /// Select every top-level widget of the page.
    pub fn select_all(&mut self, project: &Project) -> usize {
        self.selection = project
            .page(&self.page_id)
            .map(|page| page.widgets.iter().map(|w| w.id.clone()).collect())
            .unwrap_or_default();
        self.selection.len()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ========================================================================
    // Clipboard
    // ========================================================================

    pub fn clipboard(&self) -> &[Widget] {
        &self.clipboard
    }

    /// Copy the selected widgets (with their children) to the clipboard,
    /// in page order. Returns how many were copied.
    pub fn copy_selected(&mut self, project: &Project) -> LayoutResult<usize> {
        let page = self.current_page(project)?;
        let mut copied = Vec::new();
        for widget in &page.widgets {
            widget.walk(&mut |w| {
                if self.selection.contains(&w.id) {
                    copied.push(w.clone());
                }
            });
        }
        debug!("copied {} widget(s)", copied.len());
        self.clipboard = copied;
        Ok(self.clipboard.len())
    }

    /// Paste the clipboard onto the current page.
    ///
    /// Each copy is offset by +20/+20 and it and its children get fresh
    /// `<type>_<n>` ids. The pasted widgets become the selection; their ids
    /// are returned.
    pub fn paste(&mut self, project: &mut Project) -> LayoutResult<Vec<String>> {
        if self.clipboard.is_empty() {
            return Ok(Vec::new());
        }
        let page = project
            .page_mut(&self.page_id)
            .ok_or_else(|| LayoutError::page_not_found(&self.page_id))?;

        let mut used = page.widget_ids();
        let mut pasted = Vec::with_capacity(self.clipboard.len());
        for source in &self.clipboard {
            let mut widget = source.clone();
            widget.walk_mut(&mut |w| {
                let id = unique_widget_id(w.widget_type(), |candidate| used.contains(candidate));
                used.insert(id.clone());
                w.id = id;
            });
            widget.x += PASTE_OFFSET;
            widget.y += PASTE_OFFSET;
            pasted.push(widget.id.clone());
            page.widgets.push(widget);
        }

        self.selection = pasted.iter().cloned().collect();
        Ok(pasted)
    }

    /// Delete every selected widget. Returns how many were removed.
    pub fn delete_selected(&mut self, project: &mut Project) -> LayoutResult<usize> {
        let page = project
            .page_mut(&self.page_id)
            .ok_or_else(|| LayoutError::page_not_found(&self.page_id))?;
        let removed = self
            .selection
            .iter()
            .filter(|id| remove_from(&mut page.widgets, id).is_some())
            .count();
        self.selection.clear();
        Ok(removed)
    }

    // ========================================================================
    // Z-order
    // ========================================================================

    /// Draw a widget above its siblings.
    pub fn bring_to_front(&self, project: &mut Project, widget_id: &str) -> LayoutResult<()> {
        let page_id = self.page_id.clone();
        let page = project
            .page_mut(&page_id)
            .ok_or_else(|| LayoutError::page_not_found(&page_id))?;
        let (siblings, index) = containing_list(&mut page.widgets, widget_id)
            .ok_or_else(|| LayoutError::widget_not_found(&page_id, widget_id))?;
        let widget = siblings.remove(index);
        siblings.push(widget);
        Ok(())
    }

    /// Draw a widget below its siblings.
    pub fn send_to_back(&self, project: &mut Project, widget_id: &str) -> LayoutResult<()> {
        let page_id = self.page_id.clone();
        let page = project
            .page_mut(&page_id)
            .ok_or_else(|| LayoutError::page_not_found(&page_id))?;
        let (siblings, index) = containing_list(&mut page.widgets, widget_id)
            .ok_or_else(|| LayoutError::widget_not_found(&page_id, widget_id))?;
        let widget = siblings.remove(index);
        siblings.insert(0, widget);
        Ok(())
    }

    // ========================================================================
    // Arrangement
    // ========================================================================

    /// Line the selection up on a common edge or centre.
    ///
    /// Needs at least two selected widgets; with fewer nothing moves and
    /// 0 is returned. Content-sized widgets count as 100×30.
    pub fn align_selected(&self, project: &mut Project, alignment: Alignment) -> LayoutResult<usize> {
        let mut boxes = self.selected_boxes(project)?;
        if boxes.len() < 2 {
            return Ok(0);
        }
        let count = boxes.len() as f64;

        match alignment {
            Alignment::Left => {
                let left = boxes.iter().map(|b| b.x).min().unwrap_or(0);
                boxes.iter_mut().for_each(|b| b.x = left);
            }
            Alignment::Right => {
                let right = boxes.iter().map(|b| b.x + b.width).max().unwrap_or(0);
                boxes.iter_mut().for_each(|b| b.x = right - b.width);
            }
            Alignment::CenterH => {
                let center = boxes.iter().map(|b| b.x as f64 + b.width as f64 / 2.0).sum::<f64>() / count;
                boxes
                    .iter_mut()
                    .for_each(|b| b.x = (center - b.width as f64 / 2.0).round() as i32);
            }
            Alignment::Top => {
                let top = boxes.iter().map(|b| b.y).min().unwrap_or(0);
                boxes.iter_mut().for_each(|b| b.y = top);
            }
            Alignment::Bottom => {
                let bottom = boxes.iter().map(|b| b.y + b.height).max().unwrap_or(0);
                boxes.iter_mut().for_each(|b| b.y = bottom - b.height);
            }
            Alignment::Middle => {
                let middle = boxes.iter().map(|b| b.y as f64 + b.height as f64 / 2.0).sum::<f64>() / count;
                boxes
                    .iter_mut()
                    .for_each(|b| b.y = (middle - b.height as f64 / 2.0).round() as i32);
            }
        }

        self.apply_boxes(project, &boxes);
        Ok(boxes.len())
    }

    /// Spread the selection evenly between its two outermost widgets.
    ///
    /// Needs at least three selected widgets; the outermost two stay put.
    pub fn distribute_selected(
        &self,
        project: &mut Project,
        distribution: Distribution,
    ) -> LayoutResult<usize> {
        let mut boxes = self.selected_boxes(project)?;
        if boxes.len() < 3 {
            return Ok(0);
        }

        let position = |b: &Bounds| match distribution {
            Distribution::Horizontal => b.x,
            Distribution::Vertical => b.y,
        };
        boxes.sort_by_key(position);
        let first = position(&boxes[0]);
        let last = position(&boxes[boxes.len() - 1]);
        let spacing = (last - first) as f64 / (boxes.len() - 1) as f64;

        let end = boxes.len() - 1;
        for (i, b) in boxes.iter_mut().enumerate().take(end).skip(1) {
            let target = first + (i as f64 * spacing).round() as i32;
            match distribution {
                Distribution::Horizontal => b.x = target,
                Distribution::Vertical => b.y = target,
            }
        }

        self.apply_boxes(project, &boxes);
        Ok(boxes.len())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn current_page<'a>(&self, project: &'a Project) -> LayoutResult<&'a Page> {
        project
            .page(&self.page_id)
            .ok_or_else(|| LayoutError::page_not_found(&self.page_id))
    }

    fn require_widget(&self, project: &Project, widget_id: &str) -> LayoutResult<()> {
        match self.current_page(project)?.find(widget_id) {
            Some(_) => Ok(()),
            None => Err(LayoutError::widget_not_found(&self.page_id, widget_id)),
        }
    }

    fn selected_boxes(&self, project: &Project) -> LayoutResult<Vec<Bounds>> {
        let page = self.current_page(project)?;
        Ok(self
            .selection
            .iter()
            .filter_map(|id| page.find(id))
            .map(Bounds::of)
            .collect())
    }

    fn apply_boxes(&self, project: &mut Project, boxes: &[Bounds]) {
        for b in boxes {
            if let Some(widget) = project.find_widget_mut(&self.page_id, &b.id) {
                widget.x = b.x;
                widget.y = b.y;
            }
        }
    }
}

/// Position and effective extent of one widget.
#[derive(Debug, Clone)]
struct Bounds {
    id: String,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Bounds {
    fn of(widget: &Widget) -> Self {
        Bounds {
            id: widget.id.clone(),
            x: widget.x,
            y: widget.y,
            width: widget.width.px_or(NOMINAL_WIDTH) as i32,
            height: widget.height.px_or(NOMINAL_HEIGHT) as i32,
        }
    }
}

/// The sibling list holding `widget_id`, and its index there.
fn containing_list<'a>(list: &'a mut Vec<Widget>, widget_id: &str) -> Option<(&'a mut Vec<Widget>, usize)> {
    if let Some(index) = list.iter().position(|w| w.id == widget_id) {
        return Some((list, index));
    }
    list.iter_mut()
        .find_map(|w| containing_list(&mut w.children, widget_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MAIN_PAGE_ID;
    use crate::widgets::WidgetType;
    use serde_json::json;

    fn ids(project: &Project) -> Vec<String> {
        project
            .page(MAIN_PAGE_ID)
            .unwrap()
            .widgets
            .iter()
            .map(|w| w.id.clone())
            .collect()
    }

    fn project_with(widgets: Vec<Widget>) -> Project {
        let mut project = Project::new();
        for w in widgets {
            project.add_widget(MAIN_PAGE_ID, w).unwrap();
        }
        project
    }

    fn pos(project: &Project, id: &str) -> (i32, i32) {
        let w = project.find_widget(MAIN_PAGE_ID, id).unwrap();
        (w.x, w.y)
    }

    #[test]
    fn test_selection_by_id() {
        let project = project_with(vec![
            Widget::new(WidgetType::Label).with_id("a"),
            Widget::new(WidgetType::Label).with_id("b"),
        ]);
        let mut session = EditorSession::for_project(&project);
        assert_eq!(session.page_id(), MAIN_PAGE_ID);

        session.select(&project, "a").unwrap();
        assert!(session.is_selected("a"));
        assert!(session.toggle(&project, "b").unwrap());
        assert!(!session.toggle(&project, "a").unwrap());
        assert_eq!(session.selection().iter().collect::<Vec<_>>(), vec!["b"]);

        assert!(matches!(
            session.select(&project, "ghost"),
            Err(LayoutError::WidgetNotFound { .. })
        ));
        assert_eq!(session.select_all(&project), 2);
        session.clear_selection();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_copy_paste_gives_fresh_ids_and_offsets() {
        let mut panel = Widget::new(WidgetType::Obj).with_id("panel").at(10, 10);
        panel.add_child(Widget::new(WidgetType::Label).with_id("caption"));
        let mut project = project_with(vec![
            panel,
            Widget::new(WidgetType::Button).with_id("button_1").at(5, 50),
        ]);
        let mut session = EditorSession::new(MAIN_PAGE_ID);
        session.select_all(&project);
        assert_eq!(session.copy_selected(&project).unwrap(), 2);

        let pasted = session.paste(&mut project).unwrap();
        assert_eq!(pasted, vec!["obj_1", "button_2"]);
        assert_eq!(pos(&project, "obj_1"), (30, 30));
        assert_eq!(pos(&project, "button_2"), (25, 70));
        let copy = project.find_widget(MAIN_PAGE_ID, "obj_1").unwrap();
        assert_eq!(copy.children[0].id, "label_1");

        // originals untouched, pasted widgets selected
        assert_eq!(pos(&project, "panel"), (10, 10));
        assert!(session.is_selected("obj_1") && session.is_selected("button_2"));
        assert!(!session.is_selected("panel"));

        // the clipboard is an owned copy
        project
            .find_widget_mut(MAIN_PAGE_ID, "panel")
            .unwrap()
            .set("radius", json!(9))
            .unwrap();
        assert_eq!(session.clipboard()[0].radius, 0);
    }

    #[test]
    fn test_paste_empty_clipboard() {
        let mut project = Project::new();
        let mut session = EditorSession::new(MAIN_PAGE_ID);
        assert!(session.paste(&mut project).unwrap().is_empty());
    }

    #[test]
    fn test_delete_selected() {
        let mut project = project_with(vec![
            Widget::new(WidgetType::Label).with_id("a"),
            Widget::new(WidgetType::Label).with_id("b"),
            Widget::new(WidgetType::Label).with_id("c"),
        ]);
        let mut session = EditorSession::new(MAIN_PAGE_ID);
        session.select(&project, "a").unwrap();
        session.toggle(&project, "c").unwrap();
        assert_eq!(session.delete_selected(&mut project).unwrap(), 2);
        assert_eq!(ids(&project), vec!["b"]);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_z_order() {
        let mut project = project_with(vec![
            Widget::new(WidgetType::Label).with_id("a"),
            Widget::new(WidgetType::Label).with_id("b"),
            Widget::new(WidgetType::Label).with_id("c"),
        ]);
        let session = EditorSession::new(MAIN_PAGE_ID);
        session.bring_to_front(&mut project, "a").unwrap();
        assert_eq!(ids(&project), vec!["b", "c", "a"]);
        session.send_to_back(&mut project, "c").unwrap();
        assert_eq!(ids(&project), vec!["c", "b", "a"]);
        assert!(session.bring_to_front(&mut project, "ghost").is_err());
    }

    #[test]
    fn test_z_order_within_parent() {
        let mut panel = Widget::new(WidgetType::Obj).with_id("panel");
        panel.add_child(Widget::new(WidgetType::Label).with_id("x"));
        panel.add_child(Widget::new(WidgetType::Label).with_id("y"));
        let mut project = project_with(vec![panel]);
        EditorSession::new(MAIN_PAGE_ID)
            .bring_to_front(&mut project, "x")
            .unwrap();
        let panel = project.find_widget(MAIN_PAGE_ID, "panel").unwrap();
        assert_eq!(panel.children[1].id, "x");
    }

    #[test]
    fn test_align() {
        let mut project = project_with(vec![
            Widget::new(WidgetType::Button).with_id("a").at(10, 10).sized(50, 20),
            Widget::new(WidgetType::Button).with_id("b").at(100, 40).sized(80, 40),
            // content-sized: counts as 100x30
            Widget::new(WidgetType::Label).with_id("c").at(30, 100),
        ]);
        let mut session = EditorSession::new(MAIN_PAGE_ID);
        session.select_all(&project);

        session.align_selected(&mut project, Alignment::Right).unwrap();
        assert_eq!(pos(&project, "a").0, 130);
        assert_eq!(pos(&project, "b").0, 100);
        assert_eq!(pos(&project, "c").0, 80);

        session.align_selected(&mut project, Alignment::Top).unwrap();
        assert!(["a", "b", "c"].iter().all(|id| pos(&project, id).1 == 10));

        session.align_selected(&mut project, Alignment::Bottom).unwrap();
        assert_eq!(pos(&project, "a").1, 30);
        assert_eq!(pos(&project, "b").1, 10);
        assert_eq!(pos(&project, "c").1, 20);
    }

    #[test]
    fn test_align_center() {
        let mut project = project_with(vec![
            Widget::new(WidgetType::Obj).with_id("a").at(0, 0).sized(100, 10),
            Widget::new(WidgetType::Obj).with_id("b").at(100, 0).sized(50, 10),
        ]);
        let mut session = EditorSession::new(MAIN_PAGE_ID);
        session.select_all(&project);
        session.align_selected(&mut project, Alignment::CenterH).unwrap();
        // centres 50 and 125 average to 87.5
        assert_eq!(pos(&project, "a").0, 38);
        assert_eq!(pos(&project, "b").0, 63);
    }

    #[test]
    fn test_align_needs_two() {
        let mut project = project_with(vec![Widget::new(WidgetType::Obj).with_id("a").at(5, 5)]);
        let mut session = EditorSession::new(MAIN_PAGE_ID);
        session.select_all(&project);
        assert_eq!(session.align_selected(&mut project, Alignment::Left).unwrap(), 0);
        assert_eq!(pos(&project, "a"), (5, 5));
    }

    #[test]
    fn test_distribute() {
        let mut project = project_with(vec![
            Widget::new(WidgetType::Obj).with_id("a").at(0, 0),
            Widget::new(WidgetType::Obj).with_id("b").at(90, 7),
            Widget::new(WidgetType::Obj).with_id("c").at(10, 3),
            Widget::new(WidgetType::Obj).with_id("d").at(300, 1),
        ]);
        let mut session = EditorSession::new(MAIN_PAGE_ID);
        session.select_all(&project);
        session
            .distribute_selected(&mut project, Distribution::Horizontal)
            .unwrap();
        assert_eq!(pos(&project, "a").0, 0);
        assert_eq!(pos(&project, "c").0, 100);
        assert_eq!(pos(&project, "b").0, 200);
        assert_eq!(pos(&project, "d").0, 300);
        // other axis untouched
        assert_eq!(pos(&project, "b").1, 7);

        session.select(&project, "a").unwrap();
        session.toggle(&project, "b").unwrap();
        assert_eq!(
            session
                .distribute_selected(&mut project, Distribution::Vertical)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_set_page_clears_selection() {
        let mut project = project_with(vec![Widget::new(WidgetType::Obj).with_id("a")]);
        let other = project.add_page("Other");
        let mut session = EditorSession::new(MAIN_PAGE_ID);
        session.select(&project, "a").unwrap();
        session.copy_selected(&project).unwrap();
        session.set_page(&project, &other).unwrap();
        assert!(session.selection().is_empty());
        assert_eq!(session.clipboard().len(), 1);
        assert!(session.set_page(&project, "missing").is_err());

        session.paste(&mut project).unwrap();
        assert_eq!(project.page(&other).unwrap().widgets[0].id, "obj_1");
    }
}
