//! Tree card state management.
//!
//! Owns the renderer and the surface it draws into, plus where the current
//! tree came from.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use treecard::hierarchy::NodeId;
use treecard::transition::Viewport;
use treecard::{Container, RendererConfig, TreeError, TreeNode, TreeRenderer};

/// Where the tree on screen was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    File(PathBuf),
    Random { seed: u64 },
}

/// The egui-side container handed to the renderer.
///
/// egui hands out the panel size every frame, so resizes are observed and
/// forwarded as a relayout by the card panel.
#[derive(Debug, Default)]
pub struct CardSurface {
    width: Option<f32>,
    errors: Vec<String>,
}

impl CardSurface {
    /// Records the panel width; returns true if it differs from the last one.
    pub fn set_width(&mut self, width: f32) -> bool {
        let changed = self.width.map_or(true, |w| (w - width).abs() > 0.5);
        self.width = Some(width);
        changed
    }

    /// Errors reported since the last call.
    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }
}

impl Container for CardSurface {
    fn width(&self) -> Option<f32> {
        self.width
    }

    fn layout_changed(&mut self, viewport: &Viewport) {
        log::trace!("viewport now {:?}", viewport);
    }

    fn report(&mut self, error: &TreeError) {
        self.errors.push(error.to_string());
    }
}

/// State of the tree card and its data source.
pub struct CardState {
    renderer: TreeRenderer<CardSurface>,
    source: Option<TreeSource>,
    hovered: Option<NodeId>,
    next_seed: u64,
}

impl CardState {
    /// Creates the card; trees arriving on `updates` are rendered by `pump_updates`.
    pub fn new(config: RendererConfig, updates: Receiver<TreeNode>) -> Self {
        Self {
            renderer: TreeRenderer::with_updates(CardSurface::default(), config, updates),
            source: None,
            hovered: None,
            next_seed: 42,
        }
    }

    // ===== Queries =====

    pub fn renderer(&self) -> &TreeRenderer<CardSurface> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut TreeRenderer<CardSurface> {
        &mut self.renderer
    }

    pub fn source(&self) -> Option<&TreeSource> {
        self.source.as_ref()
    }

    /// Path of the loaded file, if the tree came from one.
    pub fn file_path(&self) -> Option<&Path> {
        match &self.source {
            Some(TreeSource::File(path)) => Some(path),
            _ => None,
        }
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn has_tree(&self) -> bool {
        self.renderer.tree().is_some()
    }

    // ===== Mutations =====

    pub fn set_source(&mut self, source: TreeSource) {
        self.source = Some(source);
        self.hovered = None;
    }

    pub fn set_hovered(&mut self, hovered: Option<NodeId>) {
        self.hovered = hovered;
    }

    /// Hands out a fresh seed for each generated tree.
    pub fn take_seed(&mut self) -> u64 {
        let seed = self.next_seed;
        self.next_seed += 1;
        seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_surface_width_change() {
        let mut surface = CardSurface::default();
        assert!(surface.set_width(600.0));
        assert!(!surface.set_width(600.2));
        assert!(surface.set_width(700.0));
        assert_eq!(surface.width(), Some(700.0));
    }

    #[test]
    fn test_surface_collects_errors() {
        let mut surface = CardSurface::default();
        surface.report(&TreeError::NotRendered);
        assert_eq!(surface.take_errors(), vec!["nothing has been rendered yet".to_string()]);
        assert!(surface.take_errors().is_empty());
    }

    #[test]
    fn test_card_renders_from_channel() {
        let (tx, rx) = channel();
        let mut card = CardState::new(RendererConfig::default(), rx);
        assert!(!card.has_tree());

        tx.send(TreeNode::with_children("root", vec![TreeNode::leaf("a")])).unwrap();
        assert!(card.renderer_mut().pump_updates().unwrap());
        assert!(card.has_tree());
        assert_eq!(card.take_seed(), 42);
        assert_eq!(card.take_seed(), 43);
    }
}
