//! Header panel UI rendering
//!
//! Top bar with file controls, the expansion policy and the theme selector.

use eframe::egui;
use egui::Color32;
use std::path::PathBuf;
use treecard::ExpansionPolicy;

use crate::app::AppState;
use crate::utils::describe_policy;

/// Policies offered in the header menu.
const POLICIES: [ExpansionPolicy; 5] = [
    ExpansionPolicy::LabelLength(7),
    ExpansionPolicy::Collapsed,
    ExpansionPolicy::MaxDepth(2),
    ExpansionPolicy::MaxDepth(3),
    ExpansionPolicy::Expanded,
];

/// Result of user interaction with the header panel
pub enum HeaderInteraction {
    /// User picked a file to open
    OpenFileRequested(PathBuf),
    /// User asked for a generated tree
    RandomTreeRequested,
    /// User picked a destination for an SVG export
    ExportSvgRequested(PathBuf),
    /// User picked another expansion policy
    PolicyChanged(ExpansionPolicy),
}

/// Renders the application header
pub fn render_header(ui: &mut egui::Ui, state: &mut AppState) -> Option<HeaderInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        if ui.button("📁 Open Tree").clicked() {
            let mut dialog = rfd::FileDialog::new()
                .add_filter("All Tree Files", &["json", "jsonl", "br"])
                .add_filter("Nested JSON", &["json"])
                .add_filter("Node Records", &["jsonl"]);

            if let Ok(cwd) = std::env::current_dir() {
                dialog = dialog.set_directory(cwd);
            }

            if let Some(path) = dialog.pick_file() {
                interaction = Some(HeaderInteraction::OpenFileRequested(path));
            }
        }

        if ui.button("🎲 Random Tree").clicked() {
            interaction = Some(HeaderInteraction::RandomTreeRequested);
        }

        let can_export = state.card.has_tree();
        if ui.add_enabled(can_export, egui::Button::new("💾 Export SVG")).clicked() {
            let path = rfd::FileDialog::new()
                .add_filter("SVG", &["svg"])
                .set_file_name("tree.svg")
                .save_file();
            if let Some(path) = path {
                interaction = Some(HeaderInteraction::ExportSvgRequested(path));
            }
        }

        ui.separator();

        let current = state.config().expansion;
        let mut selected = current;
        ui.label("Start expanded:");
        egui::ComboBox::from_id_salt("policy_selector")
            .selected_text(describe_policy(selected))
            .show_ui(ui, |ui| {
                for policy in POLICIES {
                    ui.selectable_value(&mut selected, policy, describe_policy(policy));
                }
            });
        if selected != current {
            interaction = Some(HeaderInteraction::PolicyChanged(selected));
        }

        ui.label(egui::RichText::new("Alt+click: slow motion").weak());

        // Push theme selector to the right
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let old_theme = state.theme.current_theme_name().to_string();
            let mut current_theme = old_theme.clone();
            egui::ComboBox::from_id_salt("theme_selector")
                .selected_text(&current_theme)
                .show_ui(ui, |ui| {
                    for theme_name in state.theme.theme_manager().list_themes() {
                        ui.selectable_value(&mut current_theme, theme_name.to_string(), theme_name);
                    }
                });

            if old_theme != current_theme {
                state.theme.set_theme(current_theme);
                ui.ctx().request_repaint();
            }

            ui.label("Theme:");
        });
    });

    if let Some(err) = &state.error_message {
        ui.colored_label(Color32::RED, err);
    }

    interaction
}
