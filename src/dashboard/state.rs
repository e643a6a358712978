//! Shared state types for the dashboard UI.

use crate::api::{CombinedRow, ConversionData, Origin, Status};

/// Top-level UI model consumed by the egui renderer.
///
/// The two panels are independent: each carries its own selection, loading
/// flag and error slot, and one never blocks or clears the other.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub origin_chart: OriginChartState,
    pub combined_chart: CombinedChartState,
}

/// Per-status chart for the currently selected origin.
#[derive(Clone, Debug, Default)]
pub struct OriginChartState {
    /// Which origin's summary is shown.
    pub selected: Origin,
    /// Latest successfully fetched summary, if any.
    pub data: Option<ConversionData>,
    /// True while a fetch for this panel is in flight.
    pub loading: bool,
    /// Generic user-facing message when the last fetch failed.
    pub error: Option<String>,
}

/// Per-origin comparison for the currently selected status.
#[derive(Clone, Debug, Default)]
pub struct CombinedChartState {
    /// Which funnel status is compared across origins.
    pub selected: Status,
    /// One row per origin, in fixed origin order; empty until the first
    /// successful round.
    pub rows: Vec<CombinedRow>,
    pub loading: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_starts_on_default_selections() {
        let state = UiState::default();
        assert_eq!(state.origin_chart.selected, Origin::Email);
        assert_eq!(state.combined_chart.selected.code(), 4);
        assert!(state.origin_chart.data.is_none());
        assert!(state.combined_chart.rows.is_empty());
        assert!(!state.origin_chart.loading);
        assert!(!state.combined_chart.loading);
    }
}
