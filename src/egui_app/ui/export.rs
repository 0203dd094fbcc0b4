use eframe::egui::{self, RichText};

use super::boards::{self, BoardEvent, Card};
use super::{EguiApp, style};
use crate::buckets::{BucketBoard, Selection};
use crate::egui_app::state::ExportTarget;
use crate::export::{ExportRecord, label_for};
use crate::model::{Metric, Segment};

impl EguiApp {
    pub(super) fn render_export_modal(&mut self, ctx: &egui::Context) {
        let Some(modal) = self.controller.ui.export.clone() else {
            return;
        };
        let (selected, pool) = match modal.target {
            ExportTarget::Metrics => column_cards::<Metric>(&modal.columns),
            ExportTarget::Segments => column_cards::<Segment>(&modal.columns),
        };
        let last_export = self.controller.last_export().map(|path| path.display().to_string());

        let mut open = true;
        let mut event = None;
        let mut export = false;
        let mut reveal = false;
        let title = format!("Export {} to CSV", modal.target.file_stem());
        egui::Window::new(title)
            .open(&mut open)
            .collapsible(false)
            .default_width(600.0)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("Drag columns into the export list; order follows the list.")
                        .color(style::palette().text_muted),
                );
                if let Some(error) = &modal.error {
                    ui.label(RichText::new(error).color(style::palette().warning));
                }
                ui.columns(2, |columns| {
                    if let Some(found) =
                        boards::zone(&mut columns[0], "export_pool", "Available", "", &pool, "Add")
                    {
                        event = Some(match found {
                            BoardEvent::Dropped(key) => (key, false),
                            BoardEvent::Clicked(key) => (key, true),
                        });
                    }
                    if let Some(found) = boards::zone(
                        &mut columns[1],
                        "export_selected",
                        "Columns",
                        "drop again to move last",
                        &selected,
                        "✕",
                    ) {
                        event = Some(match found {
                            BoardEvent::Dropped(key) => (key, true),
                            BoardEvent::Clicked(key) => (key, false),
                        });
                    }
                });
                ui.separator();
                ui.horizontal(|ui| {
                    export = ui
                        .add_enabled(!selected.is_empty(), egui::Button::new("Export…"))
                        .clicked();
                    if let Some(path) = &last_export {
                        reveal = ui.button("Open exported file").on_hover_text(path).clicked();
                    }
                });
            });

        if let Some((key, selected)) = event {
            self.controller.drop_export_column(key, selected);
        }
        if export {
            self.controller.run_export();
        }
        if reveal {
            self.controller.open_last_export();
        }
        if !open {
            self.controller.close_export();
        }
    }
}

type ColumnCards = (Vec<Card<&'static str>>, Vec<Card<&'static str>>);

fn column_cards<R: ExportRecord>(board: &BucketBoard<Selection, &'static str>) -> ColumnCards {
    let card = |key: &'static str| Card {
        id: key,
        title: label_for::<R>(key).unwrap_or(key).to_string(),
        subtitle: String::new(),
    };
    let selected = board.selected().iter().map(|key| card(*key)).collect();
    let pool = board.pool().into_iter().map(card).collect();
    (selected, pool)
}
