//! Tree Card Viewer GUI Application
//!
//! Interactive desktop host for the tree card, built with egui:
//! - Collapsible node-link tree with animated transitions (Alt+click to slow down)
//! - Asynchronous file loading with a loading indicator
//! - Random trees for trying out expansion policies
//! - SVG export of the current drawing
//! - Multiple themes with persistent preferences
//!
//! Modules:
//! - `app/` - Application state management and coordination
//! - `io/` - Background file loading
//! - `presentation/` - Card colors mapped onto egui
//! - `state/` - Card and theme state
//! - `ui/` - Panel rendering and input
//! - `utils/` - Formatting helpers

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::sync::mpsc;
use treecard::RendererConfig;

mod utils;
mod presentation;
mod io;
mod app;
mod ui;
mod state;

use app::{AppState, ApplicationCoordinator, SettingsCoordinator, ThemeCoordinator};
use io::AsyncLoader;
use ui::panel_manager::{PanelInteraction, PanelManager};

const RENDERER_CONFIG_KEY: &str = "renderer_config";
const LAST_FILE_KEY: &str = "last_file";

fn main() -> eframe::Result {
    let log_path = std::env::temp_dir().join("tree-card-gui.log");
    if let Ok(log_file) = File::create(&log_path) {
        let _ = WriteLogger::init(treecard::log_level(), Config::default(), log_file);
    }

    let initial_file = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_title("Tree Card"),
        ..Default::default()
    };

    eframe::run_native(
        "Tree Card",
        options,
        Box::new(move |cc| Ok(Box::new(TreeCardApp::new(cc, initial_file)))),
    )
}

/// The tree card viewer.
///
/// Delegates to coordinators:
/// - `ApplicationCoordinator` handles loading, clicks and exports
/// - `ThemeCoordinator` handles theme persistence and application
/// - `PanelManager` handles UI panel layout and rendering
struct TreeCardApp {
    /// Centralized application state
    state: AppState,
    /// Asynchronous file loader
    loader: AsyncLoader,
    /// Optional file to load on first frame
    pending_file_load: Option<PathBuf>,
}

impl TreeCardApp {
    /// Creates the viewer with settings from persistent storage.
    ///
    /// The command-line file wins over the last opened one.
    fn new(cc: &eframe::CreationContext, initial_file: Option<PathBuf>) -> Self {
        let theme_name = ThemeCoordinator::load_theme_from_storage(cc.storage);
        let config: RendererConfig =
            SettingsCoordinator::load_setting_or(cc.storage, RENDERER_CONFIG_KEY, RendererConfig::default());
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("ignoring stored renderer config: {}", e);
                RendererConfig::default()
            }
        };
        let last_file: Option<PathBuf> = SettingsCoordinator::load_setting_or(cc.storage, LAST_FILE_KEY, None);

        let (updates, receiver) = mpsc::channel();

        Self {
            state: AppState::new(theme_name, config, receiver),
            loader: AsyncLoader::new(updates),
            pending_file_load: initial_file.or_else(|| last_file.filter(|path| path.exists())),
        }
    }

    fn handle_panel_interaction(&mut self, interaction: PanelInteraction, ctx: &egui::Context) {
        match interaction {
            PanelInteraction::OpenFileRequested(path) => {
                ApplicationCoordinator::open_file(&mut self.state, &mut self.loader, path, ctx);
            }
            PanelInteraction::RandomTreeRequested => {
                ApplicationCoordinator::open_random_tree(&mut self.state, &mut self.loader);
            }
            PanelInteraction::ExportSvgRequested(path) => {
                ApplicationCoordinator::export_svg(&mut self.state, &path);
            }
            PanelInteraction::PolicyChanged(policy) => {
                ApplicationCoordinator::set_expansion_policy(&mut self.state, policy);
            }
            PanelInteraction::NodeClicked { id, modifiers } => {
                ApplicationCoordinator::handle_node_click(&mut self.state, id, modifiers);
            }
            PanelInteraction::CardResized => {
                ApplicationCoordinator::handle_resize(&mut self.state);
            }
        }
        ctx.request_repaint();
    }

    fn save_preferences(&self, storage: &mut dyn eframe::Storage) {
        ThemeCoordinator::save_theme_to_storage(storage, self.state.theme.current_theme_name());
        SettingsCoordinator::save_setting(storage, RENDERER_CONFIG_KEY, self.state.config());
        let last_file = self.state.card.file_path().map(|path| path.to_path_buf());
        SettingsCoordinator::save_setting(storage, LAST_FILE_KEY, &last_file);
    }
}

impl eframe::App for TreeCardApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.save_preferences(storage);
    }

    /// Main update loop:
    /// 1. Check for async loading completion and render new trees
    /// 2. Apply theme
    /// 3. Load initial file if specified (only on first frame)
    /// 4. Render all panels and handle their interactions
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ApplicationCoordinator::check_loading_completion(&mut self.state, &mut self.loader);
        ApplicationCoordinator::pump_updates(&mut self.state);

        ThemeCoordinator::apply_current_theme(ctx, &mut self.state);

        if let Some(path) = self.pending_file_load.take() {
            ApplicationCoordinator::open_file(&mut self.state, &mut self.loader, path, ctx);
        }

        for interaction in PanelManager::render_all_panels(ctx, &mut self.state, &self.loader) {
            self.handle_panel_interaction(interaction, ctx);
        }
    }
}
