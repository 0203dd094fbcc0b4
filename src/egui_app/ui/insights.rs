use eframe::egui::{self, RichText, Ui};

use super::{EguiApp, style, widgets};
use crate::format::{DateStyle, MISSING, format_date, format_lift, format_percent};
use crate::insight_wizard::{MAX_IMPACT, MIN_IMPACT, WizardAction, WizardStep};
use crate::model::{Experiment, Insight, InsightFilter, InsightSort};
use crate::routes::Route;

impl EguiApp {
    pub(super) fn render_insight_list(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Insights");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("New insight").clicked() {
                    self.navigate(Route::InsightNew);
                }
            });
        });
        ui.add_space(8.0);

        let list = &mut self.controller.ui.insights.list;
        if let Some(error) = list.error.clone() {
            if widgets::error_banner(ui, &error) {
                list.error = None;
            }
        }
        let categories = widgets::distinct(list.records.iter().map(|i| i.category.as_deref()));
        let types = widgets::distinct(list.records.iter().map(|i| i.insight_type.as_deref()));
        ui.horizontal(|ui| {
            let mut search = list.query.search().to_string();
            if ui
                .add(egui::TextEdit::singleline(&mut search).hint_text("Search insights"))
                .changed()
            {
                list.query.set_search(search);
            }
            for (key, salt, all, options) in [
                (InsightFilter::Category, "insight_category", "All categories", &categories),
                (InsightFilter::Type, "insight_type", "All types", &types),
            ] {
                let current = list.query.filter(key).map(str::to_string);
                if let Some(value) =
                    widgets::filter_combo(ui, salt, all, current.as_deref(), options)
                {
                    list.query.set_filter(key, value);
                }
            }
        });
        ui.horizontal(|ui| {
            ui.label(RichText::new("Sort by").color(style::palette().text_muted));
            let sort = list.query.sort();
            for (label, key) in [
                ("Title", InsightSort::Title),
                ("Impact", InsightSort::Impact),
                ("Created", InsightSort::CreatedAt),
            ] {
                if widgets::sort_header(ui, label, key, sort) {
                    list.query.toggle_sort(key);
                }
            }
        });
        ui.add_space(6.0);

        let page = list.page();
        if list.loading && !list.loaded {
            widgets::loading(ui, "Loading insights…");
            return;
        }
        if page.is_empty() {
            widgets::empty_state(ui, "No data");
            return;
        }
        let rows: Vec<Insight> = page
            .rows
            .iter()
            .filter_map(|index| list.records.get(*index).cloned())
            .collect();
        let mut open = None;
        for insight in &rows {
            egui::Frame::new()
                .fill(style::compartment_fill())
                .stroke(style::inner_border())
                .inner_margin(egui::Margin::symmetric(12, 8))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        if ui.link(RichText::new(&insight.title).strong()).clicked() {
                            open = Some(Route::InsightDetail {
                                category: insight.route_category().to_string(),
                                id: insight.id,
                            });
                        }
                        if let Some(category) = &insight.category {
                            widgets::badge(ui, category, style::palette().accent_ice);
                        }
                        if let Some(kind) = &insight.insight_type {
                            widgets::badge(ui, kind, style::palette().accent_copper);
                        }
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(format_date(insight.created_at.as_deref(), DateStyle::Medium));
                            ui.label(impact_stars(insight.impact_score));
                        });
                    });
                    if let Some(summary) = &insight.summary {
                        ui.label(RichText::new(summary).color(style::palette().text_muted));
                    }
                });
            ui.add_space(4.0);
        }
        if let Some(target) = widgets::pagination(ui, &page) {
            list.query.set_page(target);
        }
        if let Some(route) = open {
            self.navigate(route);
        }
    }

    pub(super) fn render_insight_detail(&mut self, ui: &mut Ui) {
        let detail = &mut self.controller.ui.insights.detail;
        if let Some(error) = detail.error.clone() {
            if widgets::error_banner(ui, &error) {
                detail.error = None;
            }
        }
        let Some(insight) = detail.record.clone() else {
            if detail.loading {
                widgets::loading(ui, "Loading insight…");
            } else {
                widgets::empty_state(ui, "Insight not found");
            }
            return;
        };
        ui.horizontal(|ui| {
            ui.heading(&insight.title);
            ui.label(impact_stars(insight.impact_score));
        });
        ui.horizontal(|ui| {
            if let Some(category) = &insight.category {
                widgets::badge(ui, category, style::palette().accent_ice);
            }
            if let Some(kind) = &insight.insight_type {
                widgets::badge(ui, kind, style::palette().accent_copper);
            }
            ui.label(
                RichText::new(format_date(insight.created_at.as_deref(), DateStyle::Long))
                    .color(style::palette().text_muted),
            );
        });
        let mut open = None;
        if let Some(id) = insight.experiment_id {
            let name = self
                .controller
                .ui
                .experiments
                .find(id)
                .map(|experiment| experiment.name.clone())
                .unwrap_or_else(|| format!("Experiment #{id}"));
            ui.horizontal(|ui| {
                ui.label(RichText::new("Source").color(style::palette().text_muted));
                if ui.link(name).clicked() {
                    open = Some(id);
                }
            });
        }
        for (heading, body) in [
            ("Summary", &insight.summary),
            ("Key findings", &insight.findings),
            ("Recommendations", &insight.recommendations),
        ] {
            widgets::section_heading(ui, heading);
            ui.label(body.as_deref().unwrap_or(MISSING));
        }
        if let Some(id) = open {
            self.navigate(Route::ExperimentDetail(id));
        }
    }

    pub(super) fn render_insight_wizard(&mut self, ui: &mut Ui) {
        ui.heading("New insight");
        let wizard = self.controller.ui.insights.wizard.clone();
        let step = wizard.state.step;
        ui.horizontal(|ui| {
            for (index, candidate) in WizardStep::ALL.iter().enumerate() {
                if index > 0 {
                    ui.label(RichText::new("›").color(style::palette().text_muted));
                }
                let text = format!("{}. {}", candidate.number(), candidate.label());
                let color = if *candidate == step {
                    style::palette().accent_mint
                } else if *candidate < step {
                    style::palette().text_primary
                } else {
                    style::palette().text_muted
                };
                ui.label(RichText::new(text).color(color));
            }
        });
        ui.separator();
        if let Some(error) = &wizard.error {
            ui.label(RichText::new(error).color(style::palette().warning));
        }

        let mut actions = Vec::new();
        let mut search = wizard.search.clone();
        let mut finish = false;
        match step {
            WizardStep::SelectExperiment => {
                let experiments = &self.controller.ui.experiments.list;
                ui.add(egui::TextEdit::singleline(&mut search).hint_text("Search experiments"));
                if experiments.loading && !experiments.loaded {
                    widgets::loading(ui, "Loading experiments…");
                }
                let needle = search.trim().to_lowercase();
                let candidates: Vec<&Experiment> = experiments
                    .records
                    .iter()
                    .filter(|experiment| experiment.status.is_finished())
                    .filter(|experiment| {
                        needle.is_empty() || experiment.name.to_lowercase().contains(&needle)
                    })
                    .collect();
                if candidates.is_empty() && experiments.loaded {
                    widgets::empty_state(ui, "No finished experiments");
                }
                for experiment in candidates {
                    let chosen = wizard.state.experiment.as_ref().map(|e| e.id) == Some(experiment.id);
                    ui.horizontal(|ui| {
                        let text = format!("{} ({})", experiment.name, experiment.period_label());
                        if ui.selectable_label(chosen, text).clicked() {
                            actions.push(WizardAction::SelectExperiment(Box::new(experiment.clone())));
                        }
                        let lift = experiment
                            .results
                            .as_ref()
                            .and_then(|results| results.lift_percent());
                        ui.label(RichText::new(format_lift(lift)).color(style::palette().text_muted));
                    });
                }
            }
            WizardStep::ReviewResults => match &wizard.state.experiment {
                Some(experiment) => review_results(ui, experiment),
                None => widgets::empty_state(ui, "Select an experiment first"),
            },
            WizardStep::Author => {
                let form = &wizard.state.form;
                egui::Grid::new("insight_author")
                    .num_columns(2)
                    .spacing([24.0, 8.0])
                    .show(ui, |ui| {
                        edit_row(ui, "Title *", &form.title, false, WizardAction::SetTitle, &mut actions);
                        edit_row(ui, "Category", &form.category, false, WizardAction::SetCategory, &mut actions);
                        edit_row(ui, "Type", &form.insight_type, false, WizardAction::SetType, &mut actions);
                        edit_row(ui, "Summary", &form.summary, true, WizardAction::SetSummary, &mut actions);
                        edit_row(ui, "Key findings", &form.findings, true, WizardAction::SetFindings, &mut actions);
                        edit_row(
                            ui,
                            "Recommendations",
                            &form.recommendations,
                            true,
                            WizardAction::SetRecommendations,
                            &mut actions,
                        );
                        ui.label("Impact");
                        let mut impact = form.impact_score;
                        if ui
                            .add(egui::Slider::new(&mut impact, MIN_IMPACT..=MAX_IMPACT))
                            .changed()
                        {
                            actions.push(WizardAction::SetImpact(i64::from(impact)));
                        }
                        ui.end_row();
                        ui.label("Charts");
                        let mut attach = form.attach_charts;
                        if ui.checkbox(&mut attach, "Attach result charts").changed() {
                            actions.push(WizardAction::SetAttachCharts(attach));
                        }
                        ui.end_row();
                    });
            }
            WizardStep::Preview => {
                let form = &wizard.state.form;
                egui::Frame::new()
                    .fill(style::compartment_fill())
                    .stroke(style::inner_border())
                    .inner_margin(egui::Margin::same(12))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.heading(&form.title);
                        ui.horizontal(|ui| {
                            if !form.category.is_empty() {
                                widgets::badge(ui, &form.category, style::palette().accent_ice);
                            }
                            widgets::badge(ui, &form.insight_type, style::palette().accent_copper);
                            ui.label(impact_stars(Some(form.impact_score)));
                        });
                        for (heading, body) in [
                            ("Summary", &form.summary),
                            ("Key findings", &form.findings),
                            ("Recommendations", &form.recommendations),
                        ] {
                            widgets::section_heading(ui, heading);
                            ui.label(if body.trim().is_empty() { MISSING } else { body.as_str() });
                        }
                        if form.attach_charts {
                            if let Some(experiment) = &wizard.state.experiment {
                                widgets::section_heading(ui, "Attached results");
                                review_results(ui, experiment);
                            }
                        }
                    });
            }
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if step != WizardStep::SelectExperiment && ui.button("Back").clicked() {
                actions.push(WizardAction::Back);
            }
            if step == WizardStep::Preview {
                let label = if wizard.saving { "Publishing…" } else { "Publish" };
                finish = ui.add_enabled(!wizard.saving, egui::Button::new(label)).clicked();
            } else if ui.button("Next").clicked() {
                actions.push(WizardAction::Next);
            }
        });

        self.controller.ui.insights.wizard.search = search;
        for action in actions {
            self.controller.wizard_dispatch(action);
        }
        if finish {
            self.controller.finish_wizard();
        }
    }
}

fn impact_stars(score: Option<u8>) -> String {
    match score {
        Some(score) => {
            let filled = usize::from(score.min(MAX_IMPACT));
            format!(
                "{}{}",
                "★".repeat(filled),
                "☆".repeat(usize::from(MAX_IMPACT) - filled)
            )
        }
        None => MISSING.to_string(),
    }
}

fn edit_row(
    ui: &mut Ui,
    label: &str,
    current: &str,
    multiline: bool,
    action: fn(String) -> WizardAction,
    actions: &mut Vec<WizardAction>,
) {
    ui.label(label);
    let mut value = current.to_string();
    let edit = if multiline {
        egui::TextEdit::multiline(&mut value).desired_rows(3)
    } else {
        egui::TextEdit::singleline(&mut value)
    };
    if ui.add(edit.desired_width(420.0)).changed() {
        actions.push(action(value));
    }
    ui.end_row();
}

fn review_results(ui: &mut Ui, experiment: &Experiment) {
    ui.label(RichText::new(&experiment.name).strong());
    ui.label(
        RichText::new(experiment.period_label()).color(style::palette().text_muted),
    );
    match &experiment.results {
        Some(results) => {
            egui::Grid::new("wizard_results")
                .num_columns(2)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    widgets::field_row(ui, "Metric", &results.metric);
                    widgets::field_row(ui, "Control", &format_percent(Some(results.baseline_value), 2));
                    widgets::field_row(
                        ui,
                        "Treatment",
                        &format_percent(Some(results.treatment_value), 2),
                    );
                    widgets::field_row(ui, "Lift", &format_lift(results.lift_percent()));
                    widgets::field_row(ui, "Confidence", &format_percent(results.confidence, 1));
                });
            for segment in &results.segments {
                ui.label(format!(
                    "{}: {} → {} ({})",
                    segment.name,
                    format_percent(Some(segment.baseline), 2),
                    format_percent(Some(segment.result), 2),
                    format_lift(segment.lift_percent()),
                ));
            }
        }
        None => {
            ui.label(RichText::new("No results recorded yet").color(style::palette().text_muted));
        }
    }
}
