//! Status bar UI rendering
//!
//! Bottom bar with memory usage, the data source and the last update's counts.

use eframe::egui;
use egui::RichText;

use crate::app::AppState;
use crate::state::TreeSource;
use crate::utils::{format_count, format_memory_mb, get_current_memory_mb};

/// Renders the status panel at the bottom of the window
pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        let memory_text = format_memory_mb(get_current_memory_mb());
        ui.label(RichText::new(&memory_text).strong());
        ui.label(RichText::new("|").strong());

        let renderer = state.card.renderer();
        let Some(tree) = renderer.tree() else {
            ui.label(RichText::new("No tree loaded").strong());
            return;
        };

        let source = match state.card.source() {
            Some(TreeSource::File(path)) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Some(TreeSource::Random { seed }) => format!("Random tree | Seed: {}", seed),
            None => "Tree".to_string(),
        };

        let stats = renderer.stats();
        ui.label(RichText::new(format!(
            "{} | Nodes: {} | Height: {} | Shown: {} | Links: {}",
            source,
            format_count(tree.len()),
            tree.root().height,
            format_count(stats.nodes),
            format_count(stats.links),
        )).strong());

        ui.label(RichText::new("|").strong());
        ui.label(format!(
            "Last update: +{} ~{} -{}",
            stats.entered, stats.updated, stats.exited
        ));

        if let Some(id) = state.card.hovered() {
            if let Some(node) = tree.get(id) {
                ui.label(RichText::new("|").strong());
                let hint = if node.is_collapsed() {
                    "click to expand"
                } else if node.is_internal() {
                    "click to collapse"
                } else {
                    "leaf"
                };
                ui.label(format!("{} (depth {}, {})", node.name, node.depth, hint));
            }
        }
    });
}
