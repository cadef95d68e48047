//! The demo project: a main page with navigation buttons and a volume
//! slider, and a settings page with two toggles.

use anyhow::Result;
use lvgl_core::actions::ActionSpec;
use lvgl_core::project::{Page, Project, MAIN_PAGE_ID};
use lvgl_core::style::{Align, Color, LayoutType};
use lvgl_core::widgets::{Widget, WidgetType};
use serde_json::json;

pub const SETTINGS_PAGE_ID: &str = "settings_page";

pub fn demo_project() -> Result<Project> {
    let mut project = Project::new();

    for widget in main_page_widgets()? {
        project.add_widget(MAIN_PAGE_ID, widget)?;
    }

    let settings = Page {
        layout: LayoutType::Flex,
        background_color: Color(0x1A1A1A),
        scrollable: true,
        ..Page::new(SETTINGS_PAGE_ID, "Settings")
    };
    project.insert_page(settings)?;
    for widget in settings_page_widgets()? {
        project.add_widget(SETTINGS_PAGE_ID, widget)?;
    }

    Ok(project)
}

fn main_page_widgets() -> Result<Vec<Widget>> {
    let show_settings = ActionSpec::new().then("lvgl.page.show", json!(SETTINGS_PAGE_ID));

    let mut start = button("start_btn", "Start", (50, 60), (100, 40))?;
    start.set_action(
        "on_click",
        ActionSpec::new()
            .then("logger.log", json!("Start button clicked"))
            .then("lvgl.page.show", json!(SETTINGS_PAGE_ID)),
    );

    let mut settings = button("settings_btn", "Settings", (170, 60), (100, 40))?;
    settings.set_action("on_click", show_settings);

    let mut slider = Widget::new(WidgetType::Slider)
        .with_id("volume_slider")
        .at(50, 120)
        .sized(220, 20)
        .with("value", json!(50))?;
    slider.set_action(
        "on_value_changed",
        ActionSpec::new().then("logger.log", json!("Volume changed to ${volume_slider.value}")),
    );

    let volume = label("volume_label", "Volume: 50%", (50, 100), (220, 20))?
        .with("text_color", json!("0xCCCCCC"))?;

    Ok(vec![
        title("title_label", "LVGL Demo")?,
        start,
        settings,
        slider,
        volume,
    ])
}

fn settings_page_widgets() -> Result<Vec<Widget>> {
    let mut back = button("back_btn", "Back", (50, 180), (80, 30))?;
    back.set_action(
        "on_click",
        ActionSpec::new().then("lvgl.page.show", json!(MAIN_PAGE_ID)),
    );

    Ok(vec![
        title("settings_title", "Settings")?,
        toggle("wifi_switch", (50, 60)),
        white_label("wifi_label", "Wi-Fi", (120, 65))?,
        toggle("bluetooth_switch", (50, 100)),
        white_label("bluetooth_label", "Bluetooth", (120, 105))?,
        back,
    ])
}

fn label(id: &str, text: &str, (x, y): (i32, i32), (w, h): (u32, u32)) -> Result<Widget> {
    Ok(Widget::new(WidgetType::Label)
        .with_id(id)
        .at(x, y)
        .sized(w, h)
        .with("text", json!(text))?)
}

fn white_label(id: &str, text: &str, pos: (i32, i32)) -> Result<Widget> {
    Ok(label(id, text, pos, (100, 20))?.with("text_color", json!("0xFFFFFF"))?)
}

fn title(id: &str, text: &str) -> Result<Widget> {
    Ok(label(id, text, (10, 10), (300, 30))?
        .with("text_color", json!("0xFFFFFF"))?
        .with("text_font", json!("montserrat_18"))?
        .with("text_align", json!("CENTER"))?)
}

/// A button carrying a centred caption label.
fn button(id: &str, text: &str, (x, y): (i32, i32), (w, h): (u32, u32)) -> Result<Widget> {
    let mut caption = Widget::new(WidgetType::Label)
        .with_id(format!("{}_label", id))
        .with("text", json!(text))?;
    caption.align = Align::Center;

    let mut button = Widget::new(WidgetType::Button).with_id(id).at(x, y).sized(w, h);
    button.add_child(caption);
    Ok(button)
}

fn toggle(id: &str, (x, y): (i32, i32)) -> Widget {
    Widget::new(WidgetType::Switch).with_id(id).at(x, y).sized(60, 30)
}
