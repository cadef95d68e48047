//! # Project Summary
//!
//! Renders a human-readable Markdown overview of a project: display
//! settings, one widget table per page and widget totals by type.
//!
//! ```rust
//! use lvgl_core::project::Project;
//! use lvgl_core::summary::render_summary;
//!
//! let text = render_summary(&Project::new());
//! assert!(text.starts_with("# LVGL Project Summary"));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::project::{Page, Project};
use crate::style::{Size, SIZE_CONTENT};
use crate::widgets::Widget;

/// Markdown summary of the whole project. Pages appear in project order.
pub fn render_summary(project: &Project) -> String {
    let mut out = String::new();
    let display = &project.display;

    // writes into a String cannot fail
    let _ = writeln!(out, "# LVGL Project Summary\n");
    let _ = writeln!(out, "## Display\n");
    let _ = writeln!(out, "- Resolution: {}x{}", display.width, display.height);
    let _ = writeln!(out, "- Color depth: {}-bit", display.color_depth);
    let _ = writeln!(out, "- Buffer size: {}", display.buffer_size);
    let _ = writeln!(out, "- Schema version: {}\n", project.version);

    let _ = writeln!(out, "## Pages ({})\n", project.page_count());
    for page in project.pages() {
        render_page(&mut out, page);
    }

    let _ = writeln!(out, "## Widget Totals\n");
    let totals = type_totals(project);
    if totals.is_empty() {
        let _ = writeln!(out, "No widgets.");
    } else {
        let _ = writeln!(out, "| Type | Count |");
        let _ = writeln!(out, "|------|-------|");
        for (tag, count) in &totals {
            let _ = writeln!(out, "| {} | {} |", tag, count);
        }
        let _ = writeln!(out, "\nTotal widgets: {}", project.widget_count());
    }

    out
}

fn render_page(out: &mut String, page: &Page) {
    let marker = if page.is_default { " (default)" } else { "" };
    let _ = writeln!(out, "### {} `{}`{}\n", escape_markdown(&page.name), page.id, marker);
    let _ = writeln!(
        out,
        "- Layout: {}, background {}, scrollable: {}\n",
        page.layout,
        page.background_color,
        if page.scrollable { "yes" } else { "no" }
    );

    if page.widgets.is_empty() {
        let _ = writeln!(out, "No widgets.\n");
        return;
    }

    let _ = writeln!(out, "| ID | Type | Position | Size | Actions |");
    let _ = writeln!(out, "|----|------|----------|------|---------|");
    for widget in &page.widgets {
        render_rows(out, widget, 0);
    }
    let _ = writeln!(out);
}

/// One row per widget, children indented under their parent.
fn render_rows(out: &mut String, widget: &Widget, depth: usize) {
    let indent = "&nbsp;&nbsp;".repeat(depth);
    let triggers = widget.actions.keys().map(String::as_str).collect::<Vec<_>>();
    let _ = writeln!(
        out,
        "| {}{} | {} | ({}, {}) | {}x{} | {} |",
        indent,
        escape_markdown(&widget.id),
        widget.widget_type(),
        widget.x,
        widget.y,
        size_text(widget.width),
        size_text(widget.height),
        if triggers.is_empty() { "-".to_string() } else { triggers.join(", ") }
    );
    for child in widget.children() {
        render_rows(out, child, depth + 1);
    }
}

fn type_totals(project: &Project) -> BTreeMap<&'static str, usize> {
    let mut totals = BTreeMap::new();
    for page in project.pages() {
        for widget in &page.widgets {
            widget.walk(&mut |w| *totals.entry(w.widget_type().tag()).or_insert(0) += 1);
        }
    }
    totals
}

fn size_text(size: Size) -> String {
    match size {
        Size::Content => SIZE_CONTENT.to_string(),
        Size::Px(px) => px.to_string(),
    }
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|")
}
