use eframe::egui::{self, RichText, Ui};

use super::boards::{self, BoardEvent, Card};
use super::metrics::metric_cards;
use super::{EguiApp, style, widgets};
use crate::egui_app::state::{ExportTarget, RecordKind};
use crate::format::{DateStyle, MISSING, format_date, format_number};
use crate::forms::{MAX_SEGMENT_METRICS, REFRESH_PERIODS, SEGMENT_CATEGORIES};
use crate::model::{Metric, Segment, SegmentFilter, SegmentSort};
use crate::routes::Route;

impl EguiApp {
    pub(super) fn render_segment_list(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Segments");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("New segment").clicked() {
                    self.navigate(Route::SegmentNew);
                }
                if ui.button("Export CSV").clicked() {
                    self.controller.open_export(ExportTarget::Segments);
                }
                if self.controller.last_export().is_some()
                    && ui.button("Open last export").clicked()
                {
                    self.controller.open_last_export();
                }
            });
        });
        if let Some(stats) = self.controller.ui.segments.stats {
            ui.horizontal(|ui| {
                widgets::stat_card(ui, "Segments", &stats.total_segments.to_string());
                widgets::stat_card(ui, "Customers", &count(stats.total_customers));
                widgets::stat_card(ui, "Active", &count(stats.active_customers));
                widgets::stat_card(ui, "At risk", &count(stats.at_risk_customers));
            });
        }
        ui.add_space(8.0);

        let list = &mut self.controller.ui.segments.list;
        if let Some(error) = list.error.clone() {
            if widgets::error_banner(ui, &error) {
                list.error = None;
            }
        }
        let categories = widgets::distinct(list.records.iter().map(|s| s.category.as_deref()));
        ui.horizontal(|ui| {
            let mut search = list.query.search().to_string();
            if ui
                .add(egui::TextEdit::singleline(&mut search).hint_text("Search segments"))
                .changed()
            {
                list.query.set_search(search);
            }
            let current = list.query.filter(SegmentFilter::Category).map(str::to_string);
            if let Some(value) = widgets::filter_combo(
                ui,
                "segment_category",
                "All categories",
                current.as_deref(),
                &categories,
            ) {
                list.query.set_filter(SegmentFilter::Category, value);
            }
        });
        ui.add_space(6.0);

        let page = list.page();
        if list.loading && !list.loaded {
            widgets::loading(ui, "Loading segments…");
            return;
        }
        if page.is_empty() {
            widgets::empty_state(ui, "No data");
            return;
        }
        let rows: Vec<Segment> = page
            .rows
            .iter()
            .filter_map(|index| list.records.get(*index).cloned())
            .collect();
        let sort = list.query.sort();
        let mut sort_clicked = None;
        let mut open = None;
        egui::Grid::new("segment_table")
            .striped(true)
            .num_columns(5)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for (label, key) in [
                    ("Name", SegmentSort::Name),
                    ("Category", SegmentSort::Category),
                    ("Customers", SegmentSort::CustomerCount),
                    ("Last touch", SegmentSort::LastTouch),
                ] {
                    if widgets::sort_header(ui, label, key, sort) {
                        sort_clicked = Some(key);
                    }
                }
                ui.label(RichText::new("Tags").strong());
                ui.end_row();
                for segment in &rows {
                    if ui.link(&segment.name).clicked() {
                        open = Some(segment.id);
                    }
                    ui.label(segment.category.as_deref().unwrap_or(MISSING));
                    ui.label(format_number(segment.customer_count.map(|c| c as f64), 0));
                    ui.label(last_touch(segment));
                    ui.label(segment.tag_list().join(", "));
                    ui.end_row();
                }
            });
        if let Some(key) = sort_clicked {
            list.query.toggle_sort(key);
        }
        if let Some(target) = widgets::pagination(ui, &page) {
            list.query.set_page(target);
        }
        if let Some(id) = open {
            self.navigate(Route::SegmentDetail(id));
        }
    }

    pub(super) fn render_segment_detail(&mut self, ui: &mut Ui) {
        let detail = &mut self.controller.ui.segments.detail;
        if let Some(error) = detail.error.clone() {
            if widgets::error_banner(ui, &error) {
                detail.error = None;
            }
        }
        let Some(segment) = detail.record.clone() else {
            if detail.loading {
                widgets::loading(ui, "Loading segment…");
            } else {
                widgets::empty_state(ui, "Segment not found");
            }
            return;
        };
        ui.horizontal(|ui| {
            ui.heading(&segment.name);
            if let Some(category) = &segment.category {
                widgets::badge(ui, category, style::palette().accent_ice);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Delete").clicked() {
                    self.controller
                        .request_delete(RecordKind::Segment, segment.id, &segment.name);
                }
                if ui.button("Edit").clicked() {
                    self.navigate(Route::SegmentEdit(segment.id));
                }
            });
        });
        ui.label(segment.description.as_deref().unwrap_or(MISSING));
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            widgets::stat_card(
                ui,
                "Customers",
                &format_number(segment.customer_count.map(|c| c as f64), 0),
            );
            widgets::stat_card(
                ui,
                "Refresh",
                segment.refresh_period.as_deref().unwrap_or(MISSING),
            );
            widgets::stat_card(ui, "Last touch", &last_touch(&segment));
        });

        widgets::section_heading(ui, "Details");
        egui::Grid::new("segment_fields")
            .num_columns(2)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                widgets::field_row(ui, "Owner", segment.segment_owner.as_deref().unwrap_or(MISSING));
                let tags = segment.tag_list();
                let tags = if tags.is_empty() { MISSING.to_string() } else { tags.join(", ") };
                widgets::field_row(ui, "Tags", &tags);
                widgets::field_row(
                    ui,
                    "Created",
                    &format_date(segment.created_at.as_deref(), DateStyle::Long),
                );
                widgets::field_row(
                    ui,
                    "Updated",
                    &format_date(segment.updated_at.as_deref(), DateStyle::Long),
                );
            });

        widgets::section_heading(ui, "Tracked metrics");
        let slots = segment.metric_slots();
        if slots.is_empty() {
            ui.label(RichText::new("No metrics attached").color(style::palette().text_muted));
        }
        let mut open = None;
        for (label, value) in slots {
            let linked = value.trim().parse::<i64>().ok();
            ui.horizontal(|ui| match linked {
                Some(id) => {
                    if ui.link(label).clicked() {
                        open = Some(id);
                    }
                }
                None => {
                    ui.label(label);
                    if !value.is_empty() {
                        ui.label(RichText::new(value).color(style::palette().text_muted));
                    }
                }
            });
        }

        widgets::section_heading(ui, "Query");
        ui.monospace(segment.query.as_deref().unwrap_or(MISSING));
        if let Some(id) = open {
            self.navigate(Route::MetricDetail(id));
        }
    }

    pub(super) fn render_segment_form(&mut self, ui: &mut Ui) {
        let editing = self.controller.ui.segments.form.editing;
        ui.heading(if editing.is_some() { "Edit segment" } else { "New segment" });
        let metric_records = self.controller.ui.metrics.list.records.clone();
        let form = &mut self.controller.ui.segments.form;
        if form.loading {
            widgets::loading(ui, "Loading segment…");
            return;
        }
        if let Some(error) = form.error.clone() {
            if widgets::error_banner(ui, &error) {
                form.error = None;
            }
        }
        let draft = &mut form.draft;
        egui::Grid::new("segment_form")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                widgets::text_row(ui, "Name *", &mut draft.name);
                widgets::multiline_row(ui, "Description *", &mut draft.description);
                ui.label("Category *");
                widgets::choice_combo(ui, "segment_form_category", &mut draft.category, &SEGMENT_CATEGORIES);
                ui.end_row();
                widgets::text_row(ui, "Owner", &mut draft.segment_owner);
                widgets::text_row(ui, "Tags (comma separated)", &mut draft.tags);
                ui.label("Refresh period");
                widgets::choice_combo(
                    ui,
                    "segment_form_refresh",
                    &mut draft.refresh_period,
                    &REFRESH_PERIODS,
                );
                ui.end_row();
                widgets::multiline_row(ui, "Query", &mut draft.query);
            });

        let selected = draft.metrics.selected().to_vec();
        let saving = form.saving;
        widgets::section_heading(
            ui,
            &format!("Metrics ({}/{MAX_SEGMENT_METRICS})", selected.len()),
        );
        let mut remove = None;
        let mut pick = false;
        ui.horizontal_wrapped(|ui| {
            for card in metric_cards(&metric_records, &selected) {
                if ui.button(format!("{} ✕", card.title)).clicked() {
                    remove = Some(card.id);
                }
            }
            pick = ui.button("Choose metrics…").clicked();
        });
        ui.add_space(10.0);
        let mut save = false;
        let mut cancel = false;
        ui.horizontal(|ui| {
            let label = if saving { "Saving…" } else { "Save" };
            save = ui.add_enabled(!saving, egui::Button::new(label)).clicked();
            cancel = ui.button("Cancel").clicked();
        });

        if let Some(id) = remove {
            self.controller.toggle_segment_metric(id);
        }
        if pick {
            self.controller.open_segment_metric_picker();
        }
        if save {
            self.controller.save_segment_form();
        } else if cancel {
            self.controller.cancel_segment_form();
        }
    }

    pub(super) fn render_segment_metric_picker(&mut self, ctx: &egui::Context) {
        let Some(picker) = self.controller.ui.segments.metric_picker.clone() else {
            return;
        };
        let records = &self.controller.ui.metrics.list.records;
        let board = &self.controller.ui.segments.form.draft.metrics;
        let selected: Vec<Card<i64>> = metric_cards(records, board.selected()).collect();
        let pool: Vec<Card<i64>> = board
            .pool_matching(records, |metric: &Metric| metric.id, &picker.search)
            .into_iter()
            .map(|metric| Card {
                id: metric.id,
                title: metric.name.clone(),
                subtitle: metric.category.clone().unwrap_or_default(),
            })
            .collect();
        let loading = self.controller.ui.metrics.list.loading;

        let mut open = true;
        let mut search = picker.search.clone();
        let mut event = None;
        let mut done = false;
        egui::Window::new("Segment metrics")
            .open(&mut open)
            .collapsible(false)
            .default_width(640.0)
            .show(ctx, |ui| {
                if let Some(error) = &picker.error {
                    ui.label(RichText::new(error).color(style::palette().warning));
                }
                ui.columns(2, |columns| {
                    columns[0].add(egui::TextEdit::singleline(&mut search).hint_text("Search metrics"));
                    if loading {
                        widgets::loading(&mut columns[0], "Loading metrics…");
                    }
                    egui::ScrollArea::vertical()
                        .id_salt("segment_metric_pool")
                        .max_height(360.0)
                        .show(&mut columns[0], |ui| {
                            if let Some(found) =
                                boards::zone(ui, "segment_metric_pool", "Available", "", &pool, "Add")
                            {
                                event = Some(match found {
                                    BoardEvent::Dropped(id) => (id, false),
                                    BoardEvent::Clicked(id) => (id, true),
                                });
                            }
                        });
                    let note = format!("up to {MAX_SEGMENT_METRICS}");
                    if let Some(found) = boards::zone(
                        &mut columns[1],
                        "segment_metric_selected",
                        "Selected",
                        &note,
                        &selected,
                        "✕",
                    ) {
                        event = Some(match found {
                            BoardEvent::Dropped(id) => (id, true),
                            BoardEvent::Clicked(id) => (id, false),
                        });
                    }
                });
                ui.separator();
                done = ui.button("Done").clicked();
            });

        if let Some(current) = self.controller.ui.segments.metric_picker.as_mut() {
            current.search = search;
        }
        if let Some((id, selected)) = event {
            self.controller.drop_segment_metric(id, selected);
        }
        if !open || done {
            self.controller.close_segment_metric_picker();
        }
    }
}

fn count(value: u64) -> String {
    format_number(Some(value as f64), 0)
}

fn last_touch(segment: &Segment) -> String {
    match (&segment.last_touch_channel, &segment.last_touch_date) {
        (Some(channel), date) => format!(
            "{channel} · {}",
            format_date(date.as_deref(), DateStyle::Medium)
        ),
        (None, date) => format_date(date.as_deref(), DateStyle::Medium),
    }
}
