//! Shared colors for the dashboard UI.

use egui::{Color32, Stroke, Visuals};

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_plot: Color32,
    pub panel_outline: Color32,
    pub grid: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    /// Bar fill for the per-origin chart (blue).
    pub accent_origin: Color32,
    /// Bar fill for the combined comparison chart (green).
    pub accent_combined: Color32,
    pub error: Color32,
    /// Backdrop painted over a chart while it loads or shows an error.
    pub overlay: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(14, 15, 18),
        bg_secondary: Color32::from_rgb(24, 26, 30),
        bg_plot: Color32::from_rgb(30, 32, 36),
        panel_outline: Color32::from_rgb(44, 48, 54),
        grid: Color32::from_rgb(52, 56, 62),
        text_primary: Color32::from_rgb(190, 196, 204),
        text_muted: Color32::from_rgb(140, 146, 155),
        accent_origin: Color32::from_rgb(59, 130, 246),
        accent_combined: Color32::from_rgb(34, 197, 94),
        error: Color32::from_rgb(235, 100, 92),
        overlay: Color32::from_rgba_premultiplied(10, 10, 12, 170),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_primary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.error;
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    visuals.selection.bg_fill = palette.grid;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_origin);
}
