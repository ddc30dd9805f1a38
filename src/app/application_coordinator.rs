//! Application-level coordination and workflow management.
//!
//! Handles file loading, random trees, clicks on the card, policy changes
//! and SVG export, keeping error reporting in one place.

use crate::app::AppState;
use crate::io::{AsyncLoader, LoadResult};
use crate::state::TreeSource;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Instant;
use treecard::hierarchy::NodeId;
use treecard::{ClickEvent, ExpansionPolicy, Modifiers, RendererConfig};

/// Coordinates application-level operations and workflows.
pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    /// Initiates asynchronous file loading.
    ///
    /// The current tree stays on screen until the new one arrives.
    pub fn open_file(state: &mut AppState, loader: &mut AsyncLoader, path: PathBuf, ctx: &egui::Context) {
        state.error_message = None;
        loader.start_file_load(path, ctx);
    }

    /// Checks for loading completion and records where the tree came from.
    ///
    /// Called once per frame in the update loop.
    /// Returns true if a load operation completed (success or error).
    pub fn check_loading_completion(state: &mut AppState, loader: &mut AsyncLoader) -> bool {
        match loader.check_completion() {
            LoadResult::Success { nodes, path } => {
                log::info!("loaded {} nodes from {}", nodes, path.display());
                state.card.set_source(TreeSource::File(path));
                state.error_message = None;
                true
            }
            LoadResult::Error(error_msg) => {
                state.error_message = Some(format!("Error loading tree: {}", error_msg));
                true
            }
            LoadResult::None => false,
        }
    }

    /// Generates a random tree and queues it for rendering.
    pub fn open_random_tree(state: &mut AppState, loader: &mut AsyncLoader) {
        let seed = state.card.take_seed();
        match loader.load_random_tree(seed) {
            Ok(nodes) => {
                log::info!("generated random tree of {} nodes (seed {})", nodes, seed);
                state.card.set_source(TreeSource::Random { seed });
                state.error_message = None;
            }
            Err(e) => {
                state.error_message = Some(format!("Error generating tree: {}", e));
            }
        }
    }

    /// Renders any tree waiting on the update stream.
    pub fn pump_updates(state: &mut AppState) {
        // Failures are reported through the surface.
        let _ = state.card.renderer_mut().pump_updates();
        state.collect_render_errors();
    }

    /// Toggles a clicked node; Alt slows the animation down.
    pub fn handle_node_click(state: &mut AppState, id: NodeId, modifiers: Modifiers) {
        let event = ClickEvent { modifiers };
        let _ = state.card.renderer_mut().toggle(id, &event);
        state.collect_render_errors();
    }

    /// Lays the tree out again after the card was resized.
    pub fn handle_resize(state: &mut AppState) {
        if state.card.has_tree() {
            let _ = state.card.renderer_mut().relayout();
            state.collect_render_errors();
        }
    }

    /// Switches the expansion policy and re-renders the current tree.
    pub fn set_expansion_policy(state: &mut AppState, policy: ExpansionPolicy) {
        let config = RendererConfig {
            expansion: policy,
            ..state.config().clone()
        };
        Self::apply_config(state, config);
    }

    /// Replaces the renderer configuration and re-renders the current tree.
    pub fn apply_config(state: &mut AppState, config: RendererConfig) {
        let renderer = state.card.renderer_mut();
        renderer.set_config(config);
        if renderer.tree().is_some() {
            let _ = renderer.rerender();
        }
        state.collect_render_errors();
    }

    /// Writes the current drawing to an SVG file.
    pub fn export_svg(state: &mut AppState, path: &Path) {
        let Some(svg) = state.card.renderer().to_svg(Instant::now()) else {
            state.error_message = Some("Nothing to export yet".to_string());
            return;
        };
        match std::fs::write(path, svg).with_context(|| format!("Failed to write {}", path.display())) {
            Ok(()) => log::info!("exported {}", path.display()),
            Err(e) => state.error_message = Some(format!("{:#}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    fn setup() -> (AppState, AsyncLoader) {
        let (tx, rx) = channel();
        (AppState::new("Light".to_string(), RendererConfig::default(), rx), AsyncLoader::new(tx))
    }

    #[test]
    fn test_random_tree_renders() {
        let (mut state, mut loader) = setup();
        ApplicationCoordinator::open_random_tree(&mut state, &mut loader);
        ApplicationCoordinator::pump_updates(&mut state);

        assert!(state.card.has_tree());
        assert_eq!(state.card.source(), Some(&TreeSource::Random { seed: 42 }));
        assert!(state.error_message.is_none());
    }

    #[test]
    fn test_bad_click_shows_error() {
        let (mut state, _loader) = setup();
        ApplicationCoordinator::handle_node_click(&mut state, 3, Modifiers::default());
        assert!(state.error_message.unwrap().contains("nothing has been rendered"));
    }

    #[test]
    fn test_policy_change_rerenders() {
        let (mut state, mut loader) = setup();
        ApplicationCoordinator::open_random_tree(&mut state, &mut loader);
        ApplicationCoordinator::pump_updates(&mut state);

        ApplicationCoordinator::set_expansion_policy(&mut state, ExpansionPolicy::Collapsed);
        assert_eq!(state.config().expansion, ExpansionPolicy::Collapsed);
        let tree = state.card.renderer().tree().unwrap();
        assert_eq!(tree.visible().len(), 1 + tree.root().children().len());
    }
}
