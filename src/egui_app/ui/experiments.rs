use eframe::egui::{self, RichText, Ui};

use super::boards::{self, BoardEvent, Card};
use super::metrics::{metric_cards, metric_names};
use super::{EguiApp, style, widgets};
use crate::egui_app::state::RecordKind;
use crate::format::{
    DateStyle, MISSING, format_change, format_date, format_lift, format_number, format_percent,
};
use crate::forms::{EXPERIMENT_OBJECTIVES, EXPERIMENT_TEAMS, EXPERIMENT_TYPES, MetricRole};
use crate::model::{
    Experiment, ExperimentFilter, ExperimentResults, ExperimentSort, ExperimentStatus, Metric,
    Segment,
};
use crate::routes::Route;
use crate::traffic::FULL_TRAFFIC;

const ICE_SCORES: std::ops::RangeInclusive<u32> = 1..=10;

impl EguiApp {
    pub(super) fn render_experiment_list(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Experiments");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("New experiment").clicked() {
                    self.navigate(Route::ExperimentNew);
                }
            });
        });
        ui.add_space(8.0);

        let list = &mut self.controller.ui.experiments.list;
        if let Some(error) = list.error.clone() {
            if widgets::error_banner(ui, &error) {
                list.error = None;
            }
        }
        let teams = widgets::distinct(list.records.iter().map(|e| e.team.as_deref()));
        let types = widgets::distinct(list.records.iter().map(|e| e.experiment_type.as_deref()));
        ui.horizontal(|ui| {
            let mut search = list.query.search().to_string();
            if ui
                .add(egui::TextEdit::singleline(&mut search).hint_text("Search experiments"))
                .changed()
            {
                list.query.set_search(search);
            }
            let current = list.query.filter(ExperimentFilter::Status).map(str::to_string);
            let shown = current
                .as_deref()
                .map(status_label_for)
                .unwrap_or("All statuses");
            egui::ComboBox::from_id_salt("experiment_status")
                .selected_text(shown)
                .show_ui(ui, |ui| {
                    if ui.selectable_label(current.is_none(), "All statuses").clicked() {
                        list.query.set_filter(ExperimentFilter::Status, None);
                    }
                    for status in ExperimentStatus::KNOWN {
                        let selected = current.as_deref() == Some(status.as_str());
                        if ui.selectable_label(selected, status.label()).clicked() {
                            list.query
                                .set_filter(ExperimentFilter::Status, Some(status.as_str().into()));
                        }
                    }
                });
            for (key, salt, all, options) in [
                (ExperimentFilter::Team, "experiment_team", "All teams", &teams),
                (ExperimentFilter::Type, "experiment_type", "All types", &types),
            ] {
                let current = list.query.filter(key).map(str::to_string);
                if let Some(value) =
                    widgets::filter_combo(ui, salt, all, current.as_deref(), options)
                {
                    list.query.set_filter(key, value);
                }
            }
        });
        ui.add_space(6.0);

        let page = list.page();
        if list.loading && !list.loaded {
            widgets::loading(ui, "Loading experiments…");
            return;
        }
        if page.is_empty() {
            widgets::empty_state(ui, "No data");
            return;
        }
        let rows: Vec<Experiment> = page
            .rows
            .iter()
            .filter_map(|index| list.records.get(*index).cloned())
            .collect();
        let sort = list.query.sort();
        let mut sort_clicked = None;
        let mut open = None;
        egui::Grid::new("experiment_table")
            .striped(true)
            .num_columns(6)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for (label, key) in [
                    ("Name", ExperimentSort::Name),
                    ("Status", ExperimentSort::Status),
                    ("Owner", ExperimentSort::Owner),
                    ("Start", ExperimentSort::StartDate),
                    ("End", ExperimentSort::EndDate),
                    ("Progress", ExperimentSort::Progress),
                ] {
                    if widgets::sort_header(ui, label, key, sort) {
                        sort_clicked = Some(key);
                    }
                }
                ui.end_row();
                for experiment in &rows {
                    if ui.link(&experiment.name).clicked() {
                        open = Some(experiment.id);
                    }
                    status_badge(ui, experiment.status);
                    ui.label(experiment.owner.as_deref().unwrap_or(MISSING));
                    ui.label(format_date(experiment.start_date.as_deref(), DateStyle::Medium));
                    ui.label(format_date(experiment.end_date.as_deref(), DateStyle::Medium));
                    progress_bar(ui, experiment.progress);
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
            self.navigate(Route::ExperimentDetail(id));
        }
    }

    pub(super) fn render_experiment_detail(&mut self, ui: &mut Ui) {
        let detail = &mut self.controller.ui.experiments.detail;
        if let Some(error) = detail.error.clone() {
            if widgets::error_banner(ui, &error) {
                detail.error = None;
            }
        }
        let Some(experiment) = detail.record.clone() else {
            if detail.loading {
                widgets::loading(ui, "Loading experiment…");
            } else {
                widgets::empty_state(ui, "Experiment not found");
            }
            return;
        };
        ui.horizontal(|ui| {
            ui.heading(&experiment.name);
            status_badge(ui, experiment.status);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Delete").clicked() {
                    self.controller.request_delete(
                        RecordKind::Experiment,
                        experiment.id,
                        &experiment.name,
                    );
                }
                if ui.button("Edit").clicked() {
                    self.navigate(Route::ExperimentEdit(experiment.id));
                }
            });
        });
        ui.label(experiment.description.as_deref().unwrap_or(MISSING));
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            widgets::stat_card(ui, "Period", &experiment.period_label());
            let days = experiment
                .days_left
                .map(|days| format!("{days} days left"))
                .unwrap_or_else(|| MISSING.to_string());
            widgets::stat_card(ui, "Remaining", &days);
            let ice = experiment
                .ice_total()
                .map(|total| total.to_string())
                .unwrap_or_else(|| MISSING.to_string());
            widgets::stat_card(ui, "ICE score", &ice);
            widgets::stat_card(
                ui,
                "Sample size",
                &format_number(experiment.sample_size.map(|n| n as f64), 0),
            );
        });
        progress_bar(ui, experiment.progress);

        widgets::section_heading(ui, "Plan");
        let segments = &self.controller.ui.segments.list.records;
        let target = experiment.target_segment_id.map(|id| segment_name(segments, id));
        egui::Grid::new("experiment_fields")
            .num_columns(2)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                widgets::field_row(ui, "Owner", experiment.owner.as_deref().unwrap_or(MISSING));
                widgets::field_row(ui, "Team", experiment.team.as_deref().unwrap_or(MISSING));
                widgets::field_row(
                    ui,
                    "Type",
                    experiment.experiment_type.as_deref().unwrap_or(MISSING),
                );
                widgets::field_row(ui, "Objective", experiment.objective.as_deref().unwrap_or(MISSING));
                widgets::field_row(ui, "Hypothesis", experiment.hypothesis.as_deref().unwrap_or(MISSING));
                widgets::field_row(ui, "Background", experiment.background.as_deref().unwrap_or(MISSING));
                widgets::field_row(ui, "Target segment", target.as_deref().unwrap_or(MISSING));
                widgets::field_row(
                    ui,
                    "Significance / power / MDE",
                    &format!(
                        "{} / {} / {}",
                        format_percent(experiment.significance_level, 0),
                        format_percent(experiment.statistical_power, 0),
                        format_percent(experiment.minimum_detectable_effect, 1),
                    ),
                );
                widgets::field_row(ui, "Conditions", experiment.conditions.as_deref().unwrap_or(MISSING));
                widgets::field_row(
                    ui,
                    "Confounding factors",
                    experiment.confounding_factors.as_deref().unwrap_or(MISSING),
                );
            });

        widgets::section_heading(ui, "Variants");
        match experiment.decode_variants() {
            Ok(variants) if !variants.is_empty() => {
                egui::Grid::new("experiment_variants")
                    .striped(true)
                    .num_columns(3)
                    .show(ui, |ui| {
                        for variant in &variants {
                            ui.label(RichText::new(&variant.name).strong());
                            ui.label(format!("{}%", variant.traffic_allocation));
                            ui.label(&variant.description);
                            ui.end_row();
                        }
                    });
            }
            Ok(_) => widgets::empty_state(ui, "No variants"),
            Err(err) => {
                ui.label(RichText::new(err.to_string()).color(style::palette().warning));
            }
        }

        widgets::section_heading(ui, "Metrics");
        let metrics = &self.controller.ui.metrics.list.records;
        let roles = [
            (MetricRole::Primary, experiment.decode_primary_metrics()),
            (MetricRole::Secondary, experiment.decode_secondary_metrics()),
            (MetricRole::Guardrail, experiment.decode_guardrail_metrics()),
        ];
        let mut open = None;
        for (role, ids) in roles {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(role.label()).color(style::palette().text_muted));
                match ids {
                    Ok(ids) if ids.is_empty() => {
                        ui.label(MISSING);
                    }
                    Ok(ids) => {
                        for (id, name) in ids.iter().zip(metric_names(metrics, &ids)) {
                            if ui.link(name).clicked() {
                                open = Some(*id);
                            }
                        }
                    }
                    Err(err) => {
                        ui.label(RichText::new(err.to_string()).color(style::palette().warning));
                    }
                }
            });
        }

        if let Some(results) = &experiment.results {
            widgets::section_heading(ui, "Results");
            render_results(ui, results);
        }
        if let Some(id) = open {
            self.navigate(Route::MetricDetail(id));
        }
    }

    pub(super) fn render_experiment_form(&mut self, ui: &mut Ui) {
        let editing = self.controller.ui.experiments.form.editing;
        ui.heading(if editing.is_some() { "Edit experiment" } else { "New experiment" });
        let metric_records = self.controller.ui.metrics.list.records.clone();
        let segment_records = self.controller.ui.segments.list.records.clone();
        let form = &mut self.controller.ui.experiments.form;
        if form.loading {
            widgets::loading(ui, "Loading experiment…");
            return;
        }
        if let Some(error) = form.error.clone() {
            if widgets::error_banner(ui, &error) {
                form.error = None;
            }
        }
        let saving = form.saving;
        let draft = &mut form.draft;

        widgets::section_heading(ui, "Basics");
        egui::Grid::new("experiment_form_basics")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                widgets::text_row(ui, "Name *", &mut draft.name);
                widgets::multiline_row(ui, "Description", &mut draft.description);
                widgets::text_row(ui, "Owner *", &mut draft.owner);
                ui.label("Team");
                widgets::choice_combo(ui, "experiment_form_team", &mut draft.team, &EXPERIMENT_TEAMS);
                ui.end_row();
                ui.label("Type *");
                widgets::choice_combo(ui, "experiment_form_type", &mut draft.experiment_type, &EXPERIMENT_TYPES);
                ui.end_row();
                ui.label("Status");
                egui::ComboBox::from_id_salt("experiment_form_status")
                    .selected_text(draft.status.label())
                    .show_ui(ui, |ui| {
                        for status in ExperimentStatus::KNOWN {
                            ui.selectable_value(&mut draft.status, status, status.label());
                        }
                    });
                ui.end_row();
                ui.label("Objective *");
                widgets::choice_combo(
                    ui,
                    "experiment_form_objective",
                    &mut draft.objective,
                    &EXPERIMENT_OBJECTIVES,
                );
                ui.end_row();
                widgets::multiline_row(ui, "Hypothesis *", &mut draft.hypothesis);
                widgets::multiline_row(ui, "Background", &mut draft.background);
            });

        widgets::section_heading(ui, "Schedule");
        egui::Grid::new("experiment_form_schedule")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                widgets::text_row(ui, "Start date * (YYYY-MM-DD)", &mut draft.start_date);
                widgets::text_row(ui, "End date * (YYYY-MM-DD)", &mut draft.end_date);
                let duration = draft
                    .duration_days()
                    .map(|days| format!("{days} days"))
                    .unwrap_or_else(|| MISSING.to_string());
                widgets::field_row(ui, "Duration", &duration);
            });

        widgets::section_heading(ui, "ICE score");
        ui.horizontal(|ui| {
            score_combo(ui, "ice_impact", "Impact", &mut draft.ice_impact);
            score_combo(ui, "ice_confidence", "Confidence", &mut draft.ice_confidence);
            score_combo(ui, "ice_ease", "Ease", &mut draft.ice_ease);
            let total = draft
                .ice_total()
                .map(|total| total.to_string())
                .unwrap_or_else(|| MISSING.to_string());
            ui.label(RichText::new(format!("Total {total}")).strong());
        });

        widgets::section_heading(ui, "Statistics");
        egui::Grid::new("experiment_form_stats")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                ui.label("Significance level (%)");
                ui.add(egui::DragValue::new(&mut draft.significance_level).range(50.0..=99.9).speed(0.1));
                ui.end_row();
                ui.label("Statistical power (%)");
                ui.add(egui::DragValue::new(&mut draft.statistical_power).range(50.0..=99.9).speed(0.1));
                ui.end_row();
                ui.label("Minimum detectable effect (%)");
                ui.add(
                    egui::DragValue::new(&mut draft.minimum_detectable_effect)
                        .range(0.1..=100.0)
                        .speed(0.1),
                );
                ui.end_row();
                ui.label("Sample size");
                let mut size = draft.sample_size.unwrap_or(0);
                if ui
                    .add(egui::DragValue::new(&mut size).range(0..=u64::MAX).speed(100.0))
                    .changed()
                {
                    draft.sample_size = (size > 0).then_some(size);
                }
                ui.end_row();
                widgets::multiline_row(ui, "Conditions", &mut draft.conditions);
                widgets::multiline_row(ui, "Confounding factors", &mut draft.confounding_factors);
            });

        widgets::section_heading(ui, "Variants");
        let mut remove = None;
        let mut add = false;
        let mut split = false;
        egui::Grid::new("experiment_form_variants")
            .num_columns(4)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for index in 0..draft.variants.len() {
                    let Some(variant) = draft.variants.get_mut(index) else {
                        continue;
                    };
                    ui.add(egui::TextEdit::singleline(&mut variant.name).desired_width(140.0));
                    ui.add(
                        egui::TextEdit::singleline(&mut variant.description)
                            .hint_text("Description")
                            .desired_width(240.0),
                    );
                    ui.add(
                        egui::DragValue::new(&mut variant.traffic_allocation)
                            .range(0..=FULL_TRAFFIC)
                            .suffix("%"),
                    );
                    if ui.small_button("Remove").clicked() {
                        remove = Some(index);
                    }
                    ui.end_row();
                }
            });
        ui.horizontal(|ui| {
            add = ui.button("Add variant").clicked();
            split = ui.button("Split evenly").clicked();
            let total = draft.variants.total();
            let color = if draft.variants.is_valid() {
                style::palette().success
            } else {
                style::palette().warning
            };
            ui.label(RichText::new(format!("Total {total}% / {FULL_TRAFFIC}%")).color(color));
        });

        widgets::section_heading(ui, "Metrics and target");
        let mut open_metrics = false;
        let mut open_segment = false;
        let mut clear_segment = false;
        for role in MetricRole::ALL {
            let ids = draft.metrics.contents(role).to_vec();
            ui.horizontal_wrapped(|ui| {
                ui.label(
                    RichText::new(format!("{} ({}/{})", role.label(), ids.len(), role.capacity()))
                        .color(style::palette().text_muted),
                );
                for name in metric_names(&metric_records, &ids) {
                    ui.label(name);
                }
            });
        }
        ui.horizontal(|ui| {
            open_metrics = ui.button("Assign metrics…").clicked();
        });
        ui.horizontal(|ui| {
            ui.label(RichText::new("Target segment *").color(style::palette().text_muted));
            match draft.target_segment() {
                Some(id) => {
                    ui.label(segment_name(&segment_records, id));
                    clear_segment = ui.small_button("✕").clicked();
                }
                None => {
                    ui.label(MISSING);
                }
            }
            open_segment = ui.button("Choose segment…").clicked();
        });

        ui.add_space(10.0);
        let mut save = false;
        let mut cancel = false;
        ui.horizontal(|ui| {
            let label = if saving { "Saving…" } else { "Save" };
            save = ui.add_enabled(!saving, egui::Button::new(label)).clicked();
            cancel = ui.button("Cancel").clicked();
        });

        if let Some(index) = remove {
            self.controller.remove_variant(index);
        }
        if add {
            self.controller.add_variant();
        }
        if split {
            self.controller.split_traffic_evenly();
        }
        if clear_segment {
            self.controller.clear_target_segment();
        }
        if open_metrics {
            self.controller.open_metric_role_modal();
        }
        if open_segment {
            self.controller.open_segment_picker();
        }
        if save {
            self.controller.save_experiment_form();
        } else if cancel {
            self.controller.cancel_experiment_form();
        }
    }

    pub(super) fn render_metric_role_modal(&mut self, ctx: &egui::Context) {
        let Some(modal) = self.controller.ui.experiments.metric_modal.clone() else {
            return;
        };
        let records = &self.controller.ui.metrics.list.records;
        let board = &self.controller.ui.experiments.form.draft.metrics;
        let buckets: Vec<(MetricRole, Vec<Card<i64>>)> = MetricRole::ALL
            .iter()
            .map(|role| (*role, metric_cards(records, board.contents(*role)).collect()))
            .collect();
        let pool: Vec<Card<i64>> = board
            .pool_matching(records, |metric: &Metric| metric.id, &modal.search)
            .into_iter()
            .map(|metric| Card {
                id: metric.id,
                title: metric.name.clone(),
                subtitle: metric.category.clone().unwrap_or_default(),
            })
            .collect();

        enum Action {
            Drop(i64, Option<MetricRole>),
            Add(i64),
            Focus(MetricRole),
        }
        let mut open = true;
        let mut done = false;
        let mut search = modal.search.clone();
        let mut action = None;
        egui::Window::new("Experiment metrics")
            .open(&mut open)
            .collapsible(false)
            .default_width(760.0)
            .show(ctx, |ui| {
                if let Some(error) = &modal.error {
                    ui.label(RichText::new(error).color(style::palette().warning));
                }
                ui.horizontal(|ui| {
                    ui.label("Add clicked metrics to:");
                    for role in MetricRole::ALL {
                        if ui.selectable_label(modal.focus == role, role.label()).clicked() {
                            action = Some(Action::Focus(role));
                        }
                    }
                });
                ui.columns(2, |columns| {
                    columns[0].add(egui::TextEdit::singleline(&mut search).hint_text("Search metrics"));
                    egui::ScrollArea::vertical()
                        .id_salt("experiment_metric_pool")
                        .max_height(380.0)
                        .show(&mut columns[0], |ui| {
                            if let Some(event) =
                                boards::zone(ui, "experiment_metric_pool", "Available", "", &pool, "Add")
                            {
                                action = Some(match event {
                                    BoardEvent::Dropped(id) => Action::Drop(id, None),
                                    BoardEvent::Clicked(id) => Action::Add(id),
                                });
                            }
                        });
                    for (role, cards) in &buckets {
                        let salt = format!("experiment_role_{}", role.label());
                        let note = format!("up to {}", role.capacity());
                        if let Some(event) =
                            boards::zone(&mut columns[1], &salt, role.label(), &note, cards, "✕")
                        {
                            action = Some(match event {
                                BoardEvent::Dropped(id) => Action::Drop(id, Some(*role)),
                                BoardEvent::Clicked(id) => Action::Drop(id, None),
                            });
                        }
                        columns[1].add_space(6.0);
                    }
                });
                ui.separator();
                done = ui.button("Done").clicked();
            });

        if let Some(current) = self.controller.ui.experiments.metric_modal.as_mut() {
            current.search = search;
        }
        match action {
            Some(Action::Drop(id, role)) => self.controller.drop_experiment_metric(id, role),
            Some(Action::Add(id)) => self.controller.add_experiment_metric(id),
            Some(Action::Focus(role)) => self.controller.focus_metric_role(role),
            None => {}
        }
        if !open || done {
            self.controller.close_metric_role_modal();
        }
    }

    pub(super) fn render_segment_picker(&mut self, ctx: &egui::Context) {
        let Some(picker) = self.controller.ui.experiments.segment_picker.clone() else {
            return;
        };
        let needle = picker.search.trim().to_lowercase();
        let segments: Vec<Segment> = self
            .controller
            .ui
            .segments
            .list
            .records
            .iter()
            .filter(|segment| needle.is_empty() || segment.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let current = self.controller.ui.experiments.form.draft.target_segment();
        let loading = self.controller.ui.segments.list.loading;

        let mut open = true;
        let mut search = picker.search.clone();
        let mut chosen = None;
        egui::Window::new("Target segment")
            .open(&mut open)
            .collapsible(false)
            .default_width(420.0)
            .show(ctx, |ui| {
                if let Some(error) = &picker.error {
                    ui.label(RichText::new(error).color(style::palette().warning));
                }
                ui.add(egui::TextEdit::singleline(&mut search).hint_text("Search segments"));
                if loading {
                    widgets::loading(ui, "Loading segments…");
                }
                egui::ScrollArea::vertical()
                    .id_salt("segment_picker_list")
                    .max_height(360.0)
                    .show(ui, |ui| {
                        if segments.is_empty() && !loading {
                            widgets::empty_state(ui, "No data");
                        }
                        for segment in &segments {
                            let customers =
                                format_number(segment.customer_count.map(|c| c as f64), 0);
                            let text = format!("{} · {customers} customers", segment.name);
                            if ui
                                .selectable_label(current == Some(segment.id), text)
                                .clicked()
                            {
                                chosen = Some(segment.id);
                            }
                        }
                    });
            });

        if let Some(current) = self.controller.ui.experiments.segment_picker.as_mut() {
            current.search = search;
        }
        if let Some(id) = chosen {
            self.controller.select_target_segment(id);
        }
        if !open {
            self.controller.close_segment_picker();
        }
    }
}

fn status_label_for(value: &str) -> &'static str {
    ExperimentStatus::KNOWN
        .iter()
        .find(|status| status.as_str() == value)
        .map(|status| status.label())
        .unwrap_or("Unknown")
}

fn status_badge(ui: &mut Ui, status: ExperimentStatus) {
    widgets::badge(ui, status.label(), style::experiment_status_color(status));
}

fn progress_bar(ui: &mut Ui, progress: Option<f64>) {
    match progress {
        Some(progress) => {
            let progress = progress.clamp(0.0, 100.0);
            ui.add(
                egui::ProgressBar::new((progress / 100.0) as f32)
                    .desired_width(120.0)
                    .text(format!("{progress:.0}%")),
            );
        }
        None => {
            ui.label(MISSING);
        }
    }
}

fn segment_name(segments: &[Segment], id: i64) -> String {
    segments
        .iter()
        .find(|segment| segment.id == id)
        .map(|segment| segment.name.clone())
        .unwrap_or_else(|| format!("#{id}"))
}

fn score_combo(ui: &mut Ui, id_salt: &str, label: &str, value: &mut Option<u32>) {
    ui.label(label);
    let shown = value.map(|v| v.to_string()).unwrap_or_else(|| MISSING.to_string());
    egui::ComboBox::from_id_salt(id_salt)
        .width(56.0)
        .selected_text(shown)
        .show_ui(ui, |ui| {
            ui.selectable_value(value, None, MISSING);
            for score in ICE_SCORES {
                ui.selectable_value(value, Some(score), score.to_string());
            }
        });
}

fn render_results(ui: &mut Ui, results: &ExperimentResults) {
    let lift = format_change(results.lift_percent(), true);
    ui.horizontal(|ui| {
        widgets::stat_card(ui, "Metric", &results.metric);
        widgets::stat_card(ui, "Control", &format_percent(Some(results.baseline_value), 2));
        widgets::stat_card(ui, "Treatment", &format_percent(Some(results.treatment_value), 2));
        widgets::stat_card(ui, "Lift", &format_lift(results.lift_percent()));
    });
    ui.label(RichText::new(&lift.text).color(style::tone_color(lift.tone)));
    egui::Grid::new("experiment_result_stats")
        .num_columns(2)
        .spacing([24.0, 6.0])
        .show(ui, |ui| {
            widgets::field_row(
                ui,
                "Samples (control / treatment)",
                &format!(
                    "{} / {}",
                    format_number(results.baseline_sample_size.map(|n| n as f64), 0),
                    format_number(results.treatment_sample_size.map(|n| n as f64), 0),
                ),
            );
            widgets::field_row(ui, "Confidence", &format_percent(results.confidence, 1));
            widgets::field_row(ui, "p-value", &format_number(results.p_value, 4));
        });
    if results.segments.is_empty() {
        return;
    }
    ui.add_space(6.0);
    egui::Grid::new("experiment_segment_results")
        .striped(true)
        .num_columns(4)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            for header in ["Segment", "Control", "Treatment", "Lift"] {
                ui.label(RichText::new(header).strong());
            }
            ui.end_row();
            for segment in &results.segments {
                ui.label(&segment.name);
                ui.label(format_percent(Some(segment.baseline), 2));
                ui.label(format_percent(Some(segment.result), 2));
                let change = format_change(segment.lift_percent(), true);
                ui.label(RichText::new(change.text).color(style::tone_color(change.tone)));
                ui.end_row();
            }
        });
}
