//! Centralized application state for the tree card viewer.
//!
//! Composes focused state components so each keeps its invariants local and
//! the borrow checker can hand out disjoint borrows.

use std::sync::mpsc::Receiver;

use treecard::{RendererConfig, TreeNode};

use crate::state::{CardState, ThemeState};

/// Main application state composed of focused state components.
pub struct AppState {
    /// Renderer, surface and data source
    pub card: CardState,

    /// Theme and styling state
    pub theme: ThemeState,

    /// Current error message to display (if any)
    pub error_message: Option<String>,
}

impl AppState {
    /// Creates the state with settings loaded from storage.
    pub fn new(theme_name: String, config: RendererConfig, updates: Receiver<TreeNode>) -> Self {
        Self {
            card: CardState::new(config, updates),
            theme: ThemeState::with_theme(theme_name),
            error_message: None,
        }
    }

    /// The renderer configuration currently in effect.
    pub fn config(&self) -> &RendererConfig {
        self.card.renderer().config()
    }

    /// Moves errors reported by the renderer into the error banner.
    pub fn collect_render_errors(&mut self) {
        let errors = self.card.renderer_mut().container_mut().take_errors();
        if let Some(last) = errors.into_iter().last() {
            self.error_message = Some(format!("Render error: {}", last));
        }
    }
}
