//! Theme management and persistence coordination.

use crate::app::AppState;

const THEME_KEY: &str = "theme_preference";

/// Coordinates theme management and persistence.
pub struct ThemeCoordinator;

impl ThemeCoordinator {
    /// Loads the theme preference, defaulting to "Light".
    pub fn load_theme_from_storage(storage: Option<&dyn eframe::Storage>) -> String {
        storage
            .and_then(|storage| storage.get_string(THEME_KEY))
            .unwrap_or_else(|| "Light".to_string())
    }

    /// Saves the current theme preference.
    pub fn save_theme_to_storage(storage: &mut dyn eframe::Storage, theme_name: &str) {
        storage.set_string(THEME_KEY, theme_name.to_string());
        storage.flush();
    }

    /// Applies the current theme to egui and to the card palette.
    ///
    /// Called every frame. A changed palette reaches node fills on the next
    /// update; links and labels pick it up immediately.
    pub fn apply_current_theme(ctx: &egui::Context, state: &mut AppState) {
        let theme = state.theme.current_theme();
        let mut visuals = if theme.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        state.theme.theme_manager().apply_theme(theme, &mut visuals);
        ctx.set_visuals(visuals);

        let palette = theme.card;
        let renderer = state.card.renderer_mut();
        if *renderer.palette() != palette {
            renderer.set_palette(palette);
        }
    }
}
