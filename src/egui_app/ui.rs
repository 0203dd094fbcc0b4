//! egui renderer for the console.

mod boards;
mod experiments;
mod export;
mod home;
mod insights;
mod metrics;
mod segments;
pub mod style;
mod widgets;

use eframe::egui::{self, Frame, Margin, RichText, Ui};

use crate::egui_app::controller::EguiController;
use crate::routes::Route;

/// Smallest window the layout still fits in.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(1024.0, 680.0);

const NAV: [Route; 5] = [
    Route::Home,
    Route::Metrics,
    Route::Segments,
    Route::Experiments,
    Route::Insights,
];

/// Renders the console using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
    path_input: String,
    path_focused: bool,
}

impl EguiApp {
    /// Attach the controller to `ctx` and load the starting page.
    pub fn new(ctx: &egui::Context, mut controller: EguiController) -> Self {
        controller.attach_context(ctx);
        controller.start();
        let path_input = controller.ui.route().path();
        Self {
            controller,
            visuals_set: false,
            path_input,
            path_focused: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn navigate(&mut self, route: Route) {
        self.controller.navigate(route);
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .inner_margin(Margin::symmetric(10, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("DATAHUB").strong().color(palette.accent_mint));
                    ui.add_space(12.0);
                    let section = self.controller.ui.route().section();
                    for route in NAV {
                        if ui
                            .selectable_label(section == route, route.title())
                            .clicked()
                        {
                            self.navigate(route);
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Refresh").clicked() {
                            self.controller.refresh_current();
                        }
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut self.path_input)
                                .desired_width(200.0)
                                .hint_text("/metrics/1"),
                        );
                        self.path_focused = response.has_focus();
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
                        {
                            let path = self.path_input.clone();
                            self.controller.navigate_path(&path);
                        }
                        if ui
                            .add_enabled(
                                self.controller.ui.history.can_go_back(),
                                egui::Button::new("Back"),
                            )
                            .clicked()
                        {
                            self.controller.go_back();
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(rect.center(), 5.0, status.badge_color);
                    ui.label(RichText::new(&status.badge_label).color(status.badge_color));
                    ui.separator();
                    ui.label(&status.text).on_hover_text(status.log_text());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(self.controller.api_base_url())
                                .color(palette.text_muted)
                                .small(),
                        );
                        let in_flight = self.controller.jobs_in_flight();
                        if in_flight > 0 {
                            ui.spinner();
                        }
                    });
                });
            });
    }

    fn render_breadcrumbs(&mut self, ui: &mut Ui) {
        let crumbs = self.controller.ui.route().breadcrumbs();
        let mut target = None;
        ui.horizontal(|ui| {
            for (index, crumb) in crumbs.iter().enumerate() {
                if index > 0 {
                    ui.label(RichText::new("›").color(style::palette().text_muted));
                }
                match &crumb.route {
                    Some(route) => {
                        if ui.link(&crumb.label).clicked() {
                            target = Some(route.clone());
                        }
                    }
                    None => {
                        ui.label(RichText::new(&crumb.label).strong());
                    }
                }
            }
        });
        if let Some(route) = target {
            self.navigate(route);
        }
    }

    fn render_page(&mut self, ui: &mut Ui) {
        match self.controller.ui.route().clone() {
            Route::Home => self.render_home(ui),
            Route::Metrics => self.render_metric_list(ui),
            Route::MetricNew | Route::MetricEdit(_) => self.render_metric_form(ui),
            Route::MetricDetail(_) => self.render_metric_detail(ui),
            Route::Segments => self.render_segment_list(ui),
            Route::SegmentNew | Route::SegmentEdit(_) => self.render_segment_form(ui),
            Route::SegmentDetail(_) => self.render_segment_detail(ui),
            Route::Experiments => self.render_experiment_list(ui),
            Route::ExperimentNew | Route::ExperimentEdit(_) => self.render_experiment_form(ui),
            Route::ExperimentDetail(_) => self.render_experiment_detail(ui),
            Route::Insights => self.render_insight_list(ui),
            Route::InsightNew => self.render_insight_wizard(ui),
            Route::InsightDetail { .. } => self.render_insight_detail(ui),
        }
    }

    fn render_modals(&mut self, ctx: &egui::Context) {
        self.render_confirm_delete(ctx);
        self.render_export_modal(ctx);
        self.render_priority_modal(ctx);
        self.render_segment_metric_picker(ctx);
        self.render_metric_role_modal(ctx);
        self.render_segment_picker(ctx);
    }

    fn render_confirm_delete(&mut self, ctx: &egui::Context) {
        let Some(confirm) = self.controller.ui.confirm_delete.clone() else {
            return;
        };
        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Confirm delete")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "Delete {} \"{}\"? This cannot be undone.",
                    confirm.kind.label(),
                    confirm.name
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    confirmed = ui.button("Delete").clicked();
                    cancelled = ui.button("Cancel").clicked();
                });
            });
        if confirmed {
            self.controller.confirm_delete();
        } else if cancelled {
            self.controller.cancel_delete();
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.tick();
        if !self.path_focused {
            self.path_input = self.controller.ui.route().path();
        }
        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_breadcrumbs(ui);
            ui.add_space(6.0);
            egui::ScrollArea::vertical()
                .id_salt("page_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| self.render_page(ui));
        });
        self.render_modals(ctx);
    }
}
