//! Small shared widgets used across pages.

use eframe::egui::{self, Color32, Frame, Margin, RichText, Ui};

use super::style;
use crate::list_view::{ListPage, PageLink, SortSpec, page_window};

/// Dismissable error banner; returns `true` when dismissed.
pub(super) fn error_banner(ui: &mut Ui, message: &str) -> bool {
    let palette = style::palette();
    let mut dismissed = false;
    Frame::new()
        .fill(Color32::from_rgb(60, 28, 28))
        .stroke(egui::Stroke::new(1.0, palette.warning))
        .inner_margin(Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(message).color(Color32::WHITE));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    dismissed = ui.small_button("Dismiss").clicked();
                });
            });
        });
    ui.add_space(6.0);
    dismissed
}

pub(super) fn empty_state(ui: &mut Ui, text: &str) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(text).color(style::palette().text_muted));
    });
    ui.add_space(24.0);
}

pub(super) fn loading(ui: &mut Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(RichText::new(text).color(style::palette().text_muted));
    });
}

pub(super) fn stat_card(ui: &mut Ui, label: &str, value: &str) {
    Frame::new()
        .fill(style::compartment_fill())
        .stroke(style::inner_border())
        .inner_margin(Margin::symmetric(14, 10))
        .show(ui, |ui| {
            ui.set_min_width(150.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(label).color(style::palette().text_muted).small());
                ui.label(RichText::new(value).strong().size(20.0));
            });
        });
}

pub(super) fn badge(ui: &mut Ui, text: &str, color: Color32) {
    Frame::new()
        .stroke(egui::Stroke::new(1.0, color))
        .inner_margin(Margin::symmetric(6, 1))
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).small());
        });
}

pub(super) fn section_heading(ui: &mut Ui, text: &str) {
    ui.add_space(10.0);
    ui.label(RichText::new(text).strong().color(style::palette().accent_ice));
    ui.separator();
}

/// Page bar under a list; returns the page the user picked.
pub(super) fn pagination(ui: &mut Ui, page: &ListPage) -> Option<usize> {
    if page.total_pages <= 1 {
        return None;
    }
    let mut target = None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(page.page > 1, egui::Button::new("Previous"))
            .clicked()
        {
            target = Some(page.page - 1);
        }
        for link in page_window(page.page, page.total_pages) {
            match link {
                PageLink::Page(number) => {
                    if ui
                        .selectable_label(number == page.page, number.to_string())
                        .clicked()
                    {
                        target = Some(number);
                    }
                }
                PageLink::Gap => {
                    ui.label("…");
                }
            }
        }
        if ui
            .add_enabled(page.page < page.total_pages, egui::Button::new("Next"))
            .clicked()
        {
            target = Some(page.page + 1);
        }
        ui.label(
            RichText::new(format!("{} results", page.total_matches))
                .color(style::palette().text_muted),
        );
    });
    target
}

/// Clickable column header showing the active sort arrow.
pub(super) fn sort_header<S: Copy + Eq>(
    ui: &mut Ui,
    label: &str,
    key: S,
    sort: Option<SortSpec<S>>,
) -> bool {
    let text = match sort {
        Some(spec) if spec.key == key => format!("{label} {}", spec.direction.arrow()),
        _ => label.to_string(),
    };
    ui.add(egui::Button::new(RichText::new(text).strong()).frame(false))
        .clicked()
}

/// Exact-match filter dropdown; returns the new value when it changed.
pub(super) fn filter_combo(
    ui: &mut Ui,
    id_salt: &str,
    all_label: &str,
    current: Option<&str>,
    options: &[String],
) -> Option<Option<String>> {
    let mut changed = None;
    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(current.unwrap_or(all_label))
        .show_ui(ui, |ui| {
            if ui.selectable_label(current.is_none(), all_label).clicked() {
                changed = Some(None);
            }
            for option in options {
                if ui
                    .selectable_label(current == Some(option.as_str()), option)
                    .clicked()
                {
                    changed = Some(Some(option.clone()));
                }
            }
        });
    changed
}

/// Dropdown over fixed choices; an empty string means "not set".
pub(super) fn choice_combo(ui: &mut Ui, id_salt: &str, value: &mut String, options: &[&str]) {
    let shown = if value.is_empty() { "Select…" } else { value.as_str() }.to_string();
    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(shown)
        .show_ui(ui, |ui| {
            for option in options {
                ui.selectable_value(value, option.to_string(), *option);
            }
        });
}

/// Label + single-line input inside a two-column grid.
pub(super) fn text_row(ui: &mut Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(360.0));
    ui.end_row();
}

pub(super) fn multiline_row(ui: &mut Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(
        egui::TextEdit::multiline(value)
            .desired_rows(3)
            .desired_width(360.0),
    );
    ui.end_row();
}

/// Read-only label/value pair inside a two-column grid.
pub(super) fn field_row(ui: &mut Ui, label: &str, value: &str) {
    ui.label(RichText::new(label).color(style::palette().text_muted));
    ui.label(value);
    ui.end_row();
}

/// Distinct non-empty values of one field, sorted, for filter dropdowns.
pub(super) fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen: Vec<String> = values
        .flatten()
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .collect();
    seen.sort();
    seen.dedup();
    seen
}
