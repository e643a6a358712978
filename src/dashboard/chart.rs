//! Bar chart geometry and painting for the dashboard panels.
//!
//! Bars are painted directly with the egui painter; geometry lives in pure
//! helpers so layout math stays testable without a UI context.

use egui::epaint::CornerRadius;
use egui::{Align2, Color32, FontId, Rect, Sense, Stroke, Ui, pos2, vec2};

use super::style;

/// Left margin reserved for y-axis tick labels.
const AXIS_MARGIN: f32 = 44.0;
/// Bottom margin reserved for category labels.
const LABEL_MARGIN: f32 = 20.0;
/// Fraction of each slot left empty on either side of a bar.
const SLOT_GAP: f32 = 0.18;
/// Y-axis gridline positions in percent.
const TICKS: [f32; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

/// One bar of a chart: category label plus the values shown on hover.
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub percentage: String,
    pub count: u64,
}

impl Bar {
    /// Numeric bar height parsed from the percentage text.
    pub fn percent_value(&self) -> f32 {
        parse_percent(&self.percentage)
    }
}

/// Parse decimal percentage text to a number; malformed text renders as 0.
pub fn parse_percent(text: &str) -> f32 {
    text.trim().parse().unwrap_or(0.0)
}

/// Compute bar rectangles inside `plot`, left to right in even slots.
///
/// Values are interpreted against a 0..=100 scale and clamped to it.
pub fn bar_rects(plot: Rect, values: &[f32]) -> Vec<Rect> {
    if values.is_empty() {
        return Vec::new();
    }
    let slot_width = plot.width() / values.len() as f32;
    let gap = slot_width * SLOT_GAP;
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let left = plot.min.x + slot_width * index as f32 + gap;
            let right = left + slot_width - 2.0 * gap;
            let height = plot.height() * value.clamp(0.0, 100.0) / 100.0;
            Rect::from_min_max(pos2(left, plot.max.y - height), pos2(right, plot.max.y))
        })
        .collect()
}

/// Paint a bar chart with a 0..100% y-axis into the next available area.
pub fn draw_bar_chart(ui: &mut Ui, bars: &[Bar], fill: Color32, height: f32) -> Rect {
    let palette = style::palette();
    let width = ui.available_width();
    let (rect, response) = ui.allocate_exact_size(vec2(width, height), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, CornerRadius::same(2), palette.bg_plot);

    let plot = Rect::from_min_max(
        pos2(rect.min.x + AXIS_MARGIN, rect.min.y + 10.0),
        pos2(rect.max.x - 12.0, rect.max.y - LABEL_MARGIN),
    );

    for tick in TICKS {
        let y = plot.max.y - plot.height() * tick / 100.0;
        painter.line_segment(
            [pos2(plot.min.x, y), pos2(plot.max.x, y)],
            Stroke::new(1.0, palette.grid),
        );
        painter.text(
            pos2(plot.min.x - 6.0, y),
            Align2::RIGHT_CENTER,
            format!("{tick:.0}%"),
            FontId::proportional(10.0),
            palette.text_muted,
        );
    }

    let values: Vec<f32> = bars.iter().map(Bar::percent_value).collect();
    let rects = bar_rects(plot, &values);
    for (bar, bar_rect) in bars.iter().zip(&rects) {
        if bar_rect.height() > 0.0 {
            painter.rect_filled(*bar_rect, CornerRadius::same(2), fill);
        }
        painter.text(
            pos2(bar_rect.center().x, plot.max.y + 4.0),
            Align2::CENTER_TOP,
            &bar.label,
            FontId::proportional(11.0),
            palette.text_muted,
        );
    }

    if let Some(pointer) = response.hover_pos() {
        let hovered = rects.iter().position(|bar_rect| {
            let mut column = *bar_rect;
            column.min.y = plot.min.y;
            column.contains(pointer)
        });
        if let Some(index) = hovered {
            let bar = bars[index].clone();
            response.on_hover_ui(|ui| {
                ui.label(format!("{}: {}%", bar.label, bar.percentage));
                ui.label(format!("Count: {}", bar.count));
            });
        }
    }

    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(300.0, 100.0))
    }

    #[test]
    fn parse_percent_handles_decimals_and_noise() {
        assert_eq!(parse_percent("42.5"), 42.5);
        assert_eq!(parse_percent(" 7 "), 7.0);
        assert_eq!(parse_percent("not-a-number"), 0.0);
        assert_eq!(parse_percent(""), 0.0);
    }

    #[test]
    fn bar_heights_are_proportional_to_values() {
        let rects = bar_rects(plot(), &[0.0, 50.0, 100.0]);
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0].height(), 0.0);
        assert_eq!(rects[1].height(), 50.0);
        assert_eq!(rects[2].height(), 100.0);
        // All bars sit on the baseline.
        for rect in &rects {
            assert_eq!(rect.max.y, 100.0);
        }
    }

    #[test]
    fn bars_occupy_distinct_slots() {
        let rects = bar_rects(plot(), &[10.0, 10.0, 10.0]);
        assert!(rects[0].max.x < rects[1].min.x);
        assert!(rects[1].max.x < rects[2].min.x);
        assert!(rects[2].max.x <= 300.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let rects = bar_rects(plot(), &[250.0, -5.0]);
        assert_eq!(rects[0].height(), 100.0);
        assert_eq!(rects[1].height(), 0.0);
    }

    #[test]
    fn empty_values_produce_no_rects() {
        assert!(bar_rects(plot(), &[]).is_empty());
    }
}
