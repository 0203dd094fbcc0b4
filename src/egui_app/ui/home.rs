use eframe::egui::{self, RichText, Ui};

use super::{EguiApp, style, widgets};
use crate::format::{MISSING, format_number, format_time_ago};
use crate::model::{ExperimentStatus, Priority};
use crate::routes::Route;

const RECENT_ROWS: usize = 5;

impl EguiApp {
    pub(super) fn render_home(&mut self, ui: &mut Ui) {
        ui.heading("Overview");
        ui.add_space(6.0);
        let ui_state = &self.controller.ui;
        let metrics = &ui_state.metrics;
        let segments = &ui_state.segments;
        let experiments = &ui_state.experiments;

        ui.horizontal_wrapped(|ui| {
            let total = metrics
                .stats
                .map(|stats| stats.total.to_string())
                .unwrap_or_else(|| metrics.list.records.len().to_string());
            widgets::stat_card(ui, "Metrics", &total);
            let critical = metrics
                .list
                .records
                .iter()
                .filter(|metric| metric.priority == Some(Priority::P0))
                .count();
            widgets::stat_card(ui, "P0 metrics", &critical.to_string());
            let customers = segments
                .stats
                .map(|stats| format_number(Some(stats.total_customers as f64), 0))
                .unwrap_or_else(|| MISSING.to_string());
            widgets::stat_card(ui, "Customers in segments", &customers);
            let running = experiments
                .list
                .records
                .iter()
                .filter(|experiment| experiment.status == ExperimentStatus::Running)
                .count();
            widgets::stat_card(ui, "Running experiments", &running.to_string());
            widgets::stat_card(
                ui,
                "Insights",
                &ui_state.insights.list.records.len().to_string(),
            );
        });

        let mut open = None;
        ui.columns(2, |columns| {
            let ui = &mut columns[0];
            widgets::section_heading(ui, "Running experiments");
            let mut shown = 0;
            for experiment in experiments
                .list
                .records
                .iter()
                .filter(|experiment| experiment.status == ExperimentStatus::Running)
                .take(RECENT_ROWS)
            {
                shown += 1;
                ui.horizontal(|ui| {
                    if ui.link(&experiment.name).clicked() {
                        open = Some(Route::ExperimentDetail(experiment.id));
                    }
                    let progress = experiment.progress.unwrap_or(0.0).clamp(0.0, 100.0);
                    ui.add(
                        egui::ProgressBar::new((progress / 100.0) as f32)
                            .desired_width(140.0)
                            .text(format!("{progress:.0}%")),
                    );
                });
            }
            if shown == 0 {
                ui.label(RichText::new("No running experiments").color(style::palette().text_muted));
            }

            let ui = &mut columns[1];
            widgets::section_heading(ui, "Latest insights");
            let now = time::OffsetDateTime::now_utc();
            let mut insights: Vec<_> = ui_state.insights.list.records.iter().collect();
            insights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            if insights.is_empty() {
                ui.label(RichText::new("No insights yet").color(style::palette().text_muted));
            }
            for insight in insights.into_iter().take(RECENT_ROWS) {
                ui.horizontal(|ui| {
                    if ui.link(&insight.title).clicked() {
                        open = Some(Route::InsightDetail {
                            category: insight.route_category().to_string(),
                            id: insight.id,
                        });
                    }
                    ui.label(
                        RichText::new(format_time_ago(insight.created_at.as_deref(), now))
                            .color(style::palette().text_muted)
                            .small(),
                    );
                });
            }
        });

        let loading = [
            metrics.list.loading,
            segments.list.loading,
            experiments.list.loading,
            ui_state.insights.list.loading,
        ];
        if loading.iter().any(|busy| *busy) {
            ui.add_space(8.0);
            widgets::loading(ui, "Loading…");
        }
        if let Some(route) = open {
            self.navigate(route);
        }
    }
}
