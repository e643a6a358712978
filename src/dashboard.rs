//! Dashboard controller and egui UI.

/// Bar chart geometry and painting.
pub mod chart;
/// State orchestration and background fetches.
pub mod controller;
/// Shared state types consumed by the renderer.
pub mod state;
/// Shared colors and visual tweaks.
pub mod style;
/// egui renderer for the dashboard window.
pub mod ui;
