//! Panel orchestration and layout management.
//!
//! Lays out the header, the status bar and the card, and funnels their
//! interactions into one result for the application coordinator.

use crate::app::AppState;
use crate::io::AsyncLoader;
use crate::ui::{card_panel, header, status_bar};
use treecard::hierarchy::NodeId;
use treecard::{ExpansionPolicy, Modifiers};

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    /// User requested to open a file
    OpenFileRequested(std::path::PathBuf),
    /// User requested a generated tree
    RandomTreeRequested,
    /// User requested an SVG export
    ExportSvgRequested(std::path::PathBuf),
    /// User picked another expansion policy
    PolicyChanged(ExpansionPolicy),
    /// A node on the card was clicked
    NodeClicked { id: NodeId, modifiers: Modifiers },
    /// The card changed width
    CardResized,
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels; called from `eframe::App::update`.
    ///
    /// Interactions are returned in the order they happened.
    pub fn render_all_panels(
        ctx: &egui::Context,
        state: &mut AppState,
        loader: &AsyncLoader,
    ) -> Vec<PanelInteraction> {
        let mut interactions = Vec::new();

        let theme_colors = state.theme.current_theme().colors.clone();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(header_interaction) = header::render_header(ui, state) {
                interactions.push(match header_interaction {
                    header::HeaderInteraction::OpenFileRequested(path) => {
                        PanelInteraction::OpenFileRequested(path)
                    }
                    header::HeaderInteraction::RandomTreeRequested => {
                        PanelInteraction::RandomTreeRequested
                    }
                    header::HeaderInteraction::ExportSvgRequested(path) => {
                        PanelInteraction::ExportSvgRequested(path)
                    }
                    header::HeaderInteraction::PolicyChanged(policy) => {
                        PanelInteraction::PolicyChanged(policy)
                    }
                });
            }
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state);
        });

        let card_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(8))
            .fill(ctx.style().visuals.extreme_bg_color);

        egui::CentralPanel::default().frame(card_frame).show(ctx, |ui| {
            for card_interaction in card_panel::render_card_panel(ui, state, loader, &theme_colors) {
                interactions.push(match card_interaction {
                    card_panel::CardInteraction::NodeClicked { id, modifiers } => {
                        PanelInteraction::NodeClicked { id, modifiers }
                    }
                    card_panel::CardInteraction::Resized => PanelInteraction::CardResized,
                });
            }
        });

        interactions
    }
}
