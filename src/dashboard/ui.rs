//! egui renderer for the dashboard window.

use std::sync::Arc;
use std::time::Duration;

use egui::epaint::CornerRadius;
use egui::{
    Align, Button, Frame, Label, Layout, Margin, Rect, RichText, Spinner, Stroke, Ui, vec2,
};

use crate::api::{ConversionApi, Origin, Status};

use super::chart::{self, Bar};
use super::controller::DashboardController;
use super::style;

/// Height of each chart plot area.
const CHART_HEIGHT: f32 = 320.0;
/// Smallest window that still fits both panels.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::Vec2::new(640.0, 720.0);

/// Renders the dashboard using the shared controller state.
pub struct DashApp {
    controller: DashboardController,
    visuals_set: bool,
}

impl DashApp {
    /// Create the app and kick off the initial fetches.
    pub fn new(api: Arc<dyn ConversionApi>) -> Self {
        let mut controller = DashboardController::new(api);
        controller.start();
        Self {
            controller,
            visuals_set: false,
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

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_secondary)
                    .inner_margin(Margin::same(8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Conversion Rates");
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        // Right-to-left layout, so iterate in reverse to keep
                        // the fixed origin order on screen.
                        for origin in Origin::ALL.iter().rev() {
                            let selected = self.controller.ui.origin_chart.selected == *origin;
                            if ui.selectable_label(selected, origin.label()).clicked() {
                                self.controller.select_origin(*origin);
                            }
                        }
                    });
                });
            });
    }

    fn render_origin_panel(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        panel_frame().show(ui, |ui| {
            let state = self.controller.ui.origin_chart.clone();
            let bars: Vec<Bar> = state
                .data
                .as_ref()
                .map(|data| {
                    data.conversion_rates
                        .iter()
                        .map(|rate| Bar {
                            label: rate.status.to_string(),
                            percentage: rate.percentage.clone(),
                            count: rate.count,
                        })
                        .collect()
                })
                .unwrap_or_default();

            let chart_rect =
                chart::draw_bar_chart(ui, &bars, palette.accent_origin, CHART_HEIGHT);
            if state.loading {
                loading_overlay(ui, chart_rect);
            } else if let Some(message) = state.error.as_deref() {
                if error_overlay(ui, chart_rect, message) {
                    self.controller.refetch_origin();
                }
            }

            if let Some(data) = state.data.as_ref() {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label(format!("Total conversions: {}", format_count(data.total)));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("Source: {}", data.origin));
                    });
                });
            }
        });
    }

    fn render_combined_panel(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        panel_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Combined Status Comparison");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    for status in Status::ALL.iter().rev() {
                        let selected = self.controller.ui.combined_chart.selected == *status;
                        if ui
                            .selectable_label(selected, format!("Status {status}"))
                            .clicked()
                        {
                            self.controller.select_status(*status);
                        }
                    }
                });
            });
            ui.add_space(8.0);

            let state = self.controller.ui.combined_chart.clone();
            let bars: Vec<Bar> = state
                .rows
                .iter()
                .map(|row| Bar {
                    label: row.origin.as_str().to_string(),
                    percentage: row.percentage.clone(),
                    count: row.count,
                })
                .collect();

            let chart_rect =
                chart::draw_bar_chart(ui, &bars, palette.accent_combined, CHART_HEIGHT);
            if state.loading {
                loading_overlay(ui, chart_rect);
            } else if let Some(message) = state.error.as_deref() {
                if error_overlay(ui, chart_rect, message) {
                    self.controller.refetch_combined();
                }
            }

            ui.add_space(8.0);
            ui.label(
                RichText::new(format!(
                    "Showing Status {} comparison across all origins",
                    state.selected
                ))
                .color(palette.text_muted),
            );
        });
    }
}

impl eframe::App for DashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_jobs();

        self.render_top_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_origin_panel(ui);
                ui.add_space(16.0);
                self.render_combined_panel(ui);
            });
        });

        // Worker results arrive over a channel; keep repainting while any
        // fetch is in flight so they are picked up promptly.
        if self.controller.busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

fn panel_frame() -> Frame {
    let palette = style::palette();
    Frame::new()
        .fill(palette.bg_secondary)
        .stroke(Stroke::new(1.0, palette.panel_outline))
        .inner_margin(Margin::same(12))
        .corner_radius(CornerRadius::same(4))
}

fn loading_overlay(ui: &mut Ui, rect: Rect) {
    ui.painter()
        .rect_filled(rect, CornerRadius::same(2), style::palette().overlay);
    ui.put(
        Rect::from_center_size(rect.center(), vec2(40.0, 40.0)),
        Spinner::new().size(32.0),
    );
}

/// Paint the error message plus a retry button; true when retry was clicked.
fn error_overlay(ui: &mut Ui, rect: Rect, message: &str) -> bool {
    let palette = style::palette();
    ui.painter()
        .rect_filled(rect, CornerRadius::same(2), palette.overlay);
    ui.put(
        Rect::from_center_size(rect.center() - vec2(0.0, 18.0), vec2(rect.width() - 40.0, 20.0)),
        Label::new(RichText::new(message).color(palette.error).strong()),
    );
    ui.put(
        Rect::from_center_size(rect.center() + vec2(0.0, 16.0), vec2(90.0, 26.0)),
        Button::new("Retry"),
    )
    .clicked()
}

/// Group digits for display ("1200" -> "1,200").
fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1200), "1,200");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
