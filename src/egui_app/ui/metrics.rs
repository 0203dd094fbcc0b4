use eframe::egui::{self, RichText, Sense, Shape, Stroke, Ui};

use super::boards::{self, BoardEvent, Card};
use super::{EguiApp, style, widgets};
use crate::api::TimeRange;
use crate::egui_app::state::{ExportTarget, RecordKind};
use crate::format::{DateStyle, MISSING, format_currency, format_date, format_number};
use crate::forms::{AGGREGATION_PERIODS, METRIC_CATEGORIES, METRIC_STATUSES};
use crate::model::{Metric, MetricFilter, MetricSort, Priority, TimeseriesPoint};
use crate::routes::Route;

impl EguiApp {
    pub(super) fn render_metric_list(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Metrics");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("New metric").clicked() {
                    self.navigate(Route::MetricNew);
                }
                if ui.button("Edit priorities").clicked() {
                    self.controller.open_priority_modal();
                }
                if ui.button("Export CSV").clicked() {
                    self.controller.open_export(ExportTarget::Metrics);
                }
                if self.controller.last_export().is_some()
                    && ui.button("Open last export").clicked()
                {
                    self.controller.open_last_export();
                }
            });
        });
        if let Some(stats) = self.controller.ui.metrics.stats {
            ui.horizontal(|ui| {
                widgets::stat_card(ui, "Total", &stats.total.to_string());
                widgets::stat_card(ui, "Active", &stats.active.to_string());
                widgets::stat_card(ui, "Inactive", &stats.inactive.to_string());
                widgets::stat_card(ui, "Warning", &stats.warning.to_string());
            });
        }
        ui.add_space(8.0);

        let list = &mut self.controller.ui.metrics.list;
        if let Some(error) = list.error.clone() {
            if widgets::error_banner(ui, &error) {
                list.error = None;
            }
        }

        let categories = widgets::distinct(list.records.iter().map(|m| m.category.as_deref()));
        let statuses = widgets::distinct(list.records.iter().map(|m| m.status.as_deref()));
        let priorities: Vec<String> = Priority::ALL.iter().map(|p| p.to_string()).collect();
        ui.horizontal(|ui| {
            let mut search = list.query.search().to_string();
            if ui
                .add(egui::TextEdit::singleline(&mut search).hint_text("Search metrics"))
                .changed()
            {
                list.query.set_search(search);
            }
            for (key, salt, all, options) in [
                (MetricFilter::Category, "metric_category", "All categories", &categories),
                (MetricFilter::Status, "metric_status", "All statuses", &statuses),
                (MetricFilter::Priority, "metric_priority", "All priorities", &priorities),
            ] {
                let current = list.query.filter(key).map(str::to_string);
                if let Some(value) =
                    widgets::filter_combo(ui, salt, all, current.as_deref(), options)
                {
                    list.query.set_filter(key, value);
                }
            }
            if ui.button("Clear").clicked() {
                list.query.set_search("");
                list.query.clear_filters();
            }
        });
        ui.add_space(6.0);

        let page = list.page();
        if list.loading && !list.loaded {
            widgets::loading(ui, "Loading metrics…");
            return;
        }
        if page.is_empty() {
            widgets::empty_state(ui, "No data");
            return;
        }
        let rows: Vec<Metric> = page
            .rows
            .iter()
            .filter_map(|index| list.records.get(*index).cloned())
            .collect();
        let sort = list.query.sort();
        let mut sort_clicked = None;
        let mut open = None;
        egui::Grid::new("metric_table")
            .striped(true)
            .num_columns(6)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for (label, key) in [
                    ("Name", MetricSort::Name),
                    ("Category", MetricSort::Category),
                    ("Priority", MetricSort::Priority),
                    ("Status", MetricSort::Status),
                    ("Value", MetricSort::Value),
                    ("Updated", MetricSort::UpdatedAt),
                ] {
                    if widgets::sort_header(ui, label, key, sort) {
                        sort_clicked = Some(key);
                    }
                }
                ui.end_row();
                for metric in &rows {
                    if ui.link(&metric.name).clicked() {
                        open = Some(metric.id);
                    }
                    ui.label(metric.category.as_deref().unwrap_or(MISSING));
                    priority_badge(ui, metric.priority);
                    status_label(ui, metric.status.as_deref());
                    ui.label(value_text(metric));
                    ui.label(format_date(metric.updated_at.as_deref(), DateStyle::Short));
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
            self.navigate(Route::MetricDetail(id));
        }
    }

    pub(super) fn render_metric_detail(&mut self, ui: &mut Ui) {
        let detail = &mut self.controller.ui.metrics.detail;
        if let Some(error) = detail.error.clone() {
            if widgets::error_banner(ui, &error) {
                detail.error = None;
            }
        }
        let Some(metric) = detail.record.clone() else {
            if detail.loading {
                widgets::loading(ui, "Loading metric…");
            } else {
                widgets::empty_state(ui, "Metric not found");
            }
            return;
        };
        ui.horizontal(|ui| {
            ui.heading(&metric.name);
            priority_badge(ui, metric.priority);
            status_label(ui, metric.status.as_deref());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Delete").clicked() {
                    self.controller
                        .request_delete(RecordKind::Metric, metric.id, &metric.name);
                }
                if ui.button("Edit").clicked() {
                    self.navigate(Route::MetricEdit(metric.id));
                }
            });
        });
        ui.label(metric.description_text());
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            widgets::stat_card(ui, "Current value", &value_text(&metric));
            widgets::stat_card(
                ui,
                "Aggregation",
                metric.aggregation_period.as_deref().unwrap_or(MISSING),
            );
            widgets::stat_card(ui, "Version", metric.version.as_deref().unwrap_or(MISSING));
        });

        widgets::section_heading(ui, "Definition");
        egui::Grid::new("metric_fields")
            .num_columns(2)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                widgets::field_row(ui, "Category", metric.category.as_deref().unwrap_or(MISSING));
                widgets::field_row(ui, "Owner", metric.metric_owner.as_deref().unwrap_or(MISSING));
                widgets::field_row(ui, "Data source", metric.data_source.as_deref().unwrap_or(MISSING));
                widgets::field_row(ui, "Unit", metric.unit.as_deref().unwrap_or(MISSING));
                widgets::field_row(
                    ui,
                    "Created",
                    &format_date(metric.created_at.as_deref(), DateStyle::Long),
                );
                widgets::field_row(
                    ui,
                    "Updated",
                    &format_date(metric.updated_at.as_deref(), DateStyle::Long),
                );
            });
        widgets::section_heading(ui, "Calculation logic");
        ui.monospace(metric.calculation_logic.as_deref().unwrap_or(MISSING));

        widgets::section_heading(ui, "History");
        let current = self.controller.ui.metrics.time_range;
        let mut picked = current;
        ui.horizontal(|ui| {
            for range in TimeRange::ALL {
                ui.selectable_value(&mut picked, range, range.label());
            }
        });
        if picked != current {
            self.controller.set_time_range(picked);
        }
        let metrics = &self.controller.ui.metrics;
        if let Some(error) = &metrics.timeseries_error {
            ui.label(RichText::new(error).color(style::palette().warning));
        } else if metrics.timeseries.is_empty() {
            widgets::empty_state(ui, "No data");
        } else {
            timeseries_chart(ui, &metrics.timeseries);
        }
    }

    pub(super) fn render_metric_form(&mut self, ui: &mut Ui) {
        let editing = self.controller.ui.metrics.form.editing;
        ui.heading(if editing.is_some() { "Edit metric" } else { "New metric" });
        let form = &mut self.controller.ui.metrics.form;
        if form.loading {
            widgets::loading(ui, "Loading metric…");
            return;
        }
        if let Some(error) = form.error.clone() {
            if widgets::error_banner(ui, &error) {
                form.error = None;
            }
        }
        let draft = &mut form.draft;
        egui::Grid::new("metric_form")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                widgets::text_row(ui, "Name *", &mut draft.name);
                widgets::multiline_row(ui, "Description *", &mut draft.description);
                ui.label("Category *");
                widgets::choice_combo(ui, "metric_form_category", &mut draft.category, &METRIC_CATEGORIES);
                ui.end_row();
                ui.label("Priority *");
                ui.horizontal(|ui| {
                    for priority in Priority::ALL {
                        ui.selectable_value(&mut draft.priority, Some(priority), priority.as_str())
                            .on_hover_text(priority.description());
                    }
                });
                ui.end_row();
                widgets::multiline_row(ui, "Calculation logic *", &mut draft.calculation_logic);
                widgets::text_row(ui, "Owner", &mut draft.metric_owner);
                ui.label("Status");
                widgets::choice_combo(ui, "metric_form_status", &mut draft.status, &METRIC_STATUSES);
                ui.end_row();
                widgets::text_row(ui, "Data source", &mut draft.data_source);
                ui.label("Aggregation period");
                widgets::choice_combo(
                    ui,
                    "metric_form_period",
                    &mut draft.aggregation_period,
                    &AGGREGATION_PERIODS,
                );
                ui.end_row();
                widgets::text_row(ui, "Unit", &mut draft.unit);
            });
        ui.add_space(10.0);
        let saving = form.saving;
        ui.horizontal(|ui| {
            let label = if saving { "Saving…" } else { "Save" };
            if ui.add_enabled(!saving, egui::Button::new(label)).clicked() {
                self.controller.save_metric_form();
            }
            if ui.button("Cancel").clicked() {
                self.controller.cancel_metric_form();
            }
        });
    }

    pub(super) fn render_priority_modal(&mut self, ctx: &egui::Context) {
        let Some(modal) = self.controller.ui.metrics.priority.clone() else {
            return;
        };
        let records = &self.controller.ui.metrics.list.records;
        let card = |id: &i64| {
            records.iter().find(|m| m.id == *id).map(|metric| Card {
                id: metric.id,
                title: metric.name.clone(),
                subtitle: metric.category.clone().unwrap_or_default(),
            })
        };
        let buckets: Vec<(Priority, Vec<Card<i64>>)> = Priority::ALL
            .iter()
            .map(|priority| {
                let cards = modal.board.contents(*priority).iter().filter_map(card).collect();
                (*priority, cards)
            })
            .collect();
        let pool: Vec<Card<i64>> = modal
            .board
            .pool_matching(records, |metric: &Metric| metric.id, &modal.search)
            .into_iter()
            .map(|metric| Card {
                id: metric.id,
                title: metric.name.clone(),
                subtitle: metric.description_text().to_string(),
            })
            .collect();

        let mut open = true;
        let mut search = modal.search.clone();
        let mut drop = None;
        let mut save = false;
        egui::Window::new("Metric priorities")
            .open(&mut open)
            .collapsible(false)
            .default_width(760.0)
            .show(ctx, |ui| {
                if let Some(error) = &modal.error {
                    ui.label(RichText::new(error).color(style::palette().warning));
                }
                ui.columns(2, |columns| {
                    columns[0].add(
                        egui::TextEdit::singleline(&mut search).hint_text("Search unprioritized"),
                    );
                    egui::ScrollArea::vertical()
                        .id_salt("priority_pool")
                        .max_height(360.0)
                        .show(&mut columns[0], |ui| {
                            if let Some(event) =
                                boards::zone(ui, "priority_pool", "Unprioritized", "", &pool, "P2")
                            {
                                drop = Some(match event {
                                    BoardEvent::Dropped(id) => (id, None),
                                    BoardEvent::Clicked(id) => (id, Some(Priority::P2)),
                                });
                            }
                        });
                    for (priority, cards) in &buckets {
                        let salt = format!("priority_{priority}");
                        if let Some(event) = boards::zone(
                            &mut columns[1],
                            &salt,
                            priority.as_str(),
                            priority.description(),
                            cards,
                            "✕",
                        ) {
                            drop = Some(match event {
                                BoardEvent::Dropped(id) => (id, Some(*priority)),
                                BoardEvent::Clicked(id) => (id, None),
                            });
                        }
                        columns[1].add_space(6.0);
                    }
                });
                ui.separator();
                ui.horizontal(|ui| {
                    let label = if modal.saving { "Saving…" } else { "Save priorities" };
                    save = ui.add_enabled(!modal.saving, egui::Button::new(label)).clicked();
                });
            });

        if let Some(current) = self.controller.ui.metrics.priority.as_mut() {
            current.search = search;
        }
        if let Some((id, priority)) = drop {
            self.controller.drop_metric_priority(id, priority);
        }
        if save {
            self.controller.save_priorities();
        }
        if !open {
            self.controller.close_priority_modal();
        }
    }
}

fn value_text(metric: &Metric) -> String {
    match (&metric.value, metric.unit.as_deref()) {
        (value, Some("KRW" | "원")) => format_currency(*value),
        (Some(value), Some(unit)) if !unit.is_empty() => {
            format!("{} {unit}", format_number(Some(*value), 2))
        }
        (value, _) => format_number(*value, 2),
    }
}

fn priority_badge(ui: &mut Ui, priority: Option<Priority>) {
    match priority {
        Some(priority) => widgets::badge(ui, priority.as_str(), style::priority_color(priority)),
        None => {
            ui.label(MISSING);
        }
    }
}

fn status_label(ui: &mut Ui, status: Option<&str>) {
    match status {
        Some(status) => {
            ui.label(RichText::new(status).color(style::metric_status_color(status)));
        }
        None => {
            ui.label(MISSING);
        }
    }
}

/// Line chart of the metric history, oldest point on the left.
fn timeseries_chart(ui: &mut Ui, points: &[TimeseriesPoint]) {
    let palette = style::palette();
    let size = egui::vec2(ui.available_width().min(900.0), 200.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, palette.bg_primary);

    let (min, max) = points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), point| {
        (lo.min(point.value), hi.max(point.value))
    });
    let span = if (max - min).abs() < f64::EPSILON { 1.0 } else { max - min };
    let step = rect.width() / (points.len().saturating_sub(1).max(1)) as f32;
    let positions: Vec<egui::Pos2> = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let t = ((point.value - min) / span) as f32;
            egui::pos2(
                rect.left() + step * index as f32,
                rect.bottom() - 12.0 - t * (rect.height() - 24.0),
            )
        })
        .collect();
    painter.add(Shape::line(positions.clone(), Stroke::new(2.0, palette.accent_mint)));
    for position in &positions {
        painter.circle_filled(*position, 2.5, palette.accent_ice);
    }

    if let Some(hover) = response.hover_pos() {
        let nearest = positions
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.x - hover.x).abs().total_cmp(&(b.x - hover.x).abs())
            })
            .map(|(index, _)| index);
        if let Some(point) = nearest.and_then(|index| points.get(index)) {
            let visitors = point
                .visitor_count
                .map(|count| format!(" · {count} visitors"))
                .unwrap_or_default();
            response.on_hover_text(format!(
                "{}: {}{visitors}",
                format_date(Some(&point.timestamp), DateStyle::Medium),
                format_number(Some(point.value), 2)
            ));
        }
    }
    ui.label(
        RichText::new(format!(
            "min {} · max {}",
            format_number(Some(min), 2),
            format_number(Some(max), 2)
        ))
        .color(palette.text_muted)
        .small(),
    );
}

/// Metric names for a list of ids, falling back to the id.
pub(super) fn metric_names(records: &[Metric], ids: &[i64]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            records
                .iter()
                .find(|metric| metric.id == *id)
                .map(|metric| metric.name.clone())
                .unwrap_or_else(|| format!("#{id}"))
        })
        .collect()
}

pub(super) fn metric_cards<'a>(
    records: &'a [Metric],
    ids: &'a [i64],
) -> impl Iterator<Item = Card<i64>> + 'a {
    ids.iter().map(move |id| {
        let metric = records.iter().find(|metric| metric.id == *id);
        Card {
            id: *id,
            title: metric.map_or_else(|| format!("#{id}"), |metric| metric.name.clone()),
            subtitle: metric
                .and_then(|metric| metric.category.clone())
                .unwrap_or_default(),
        }
    })
}
