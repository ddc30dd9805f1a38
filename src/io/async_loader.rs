//! Asynchronous tree file loading.
//!
//! Files are parsed on a background thread, keeping the GUI responsive. A
//! parsed tree goes straight onto the renderer's update stream; the loader
//! only reports how the load went.

use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use treecard::{read_tree, RandomTreeReader, TreeNode};

/// Depth of generated trees.
pub const RANDOM_TREE_DEPTH: usize = 4;
/// Maximum children per generated node.
pub const RANDOM_TREE_FANOUT: usize = 5;
/// Parsing recurses once per nesting level; the deepest accepted trees
/// need more than the default thread stack.
const LOADER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Holds the state of an async file loading operation.
///
/// Only the in_progress flag is shared; results come through a channel.
pub struct LoadingState {
    /// True if a file loading operation is currently in progress
    pub in_progress: bool,
}

/// Result of a completed loading operation.
pub enum LoadResult {
    /// The tree was queued for rendering
    Success {
        /// Number of nodes in the loaded tree
        nodes: usize,
        /// Path to the file that was loaded
        path: PathBuf,
    },
    /// Loading failed with an error
    Error(String),
    /// No loading operation in progress
    None,
}

/// Manages asynchronous loading of tree files.
pub struct AsyncLoader {
    /// Shared loading state flag
    loading_state: Arc<Mutex<LoadingState>>,

    /// Renderer update stream
    updates: Sender<TreeNode>,

    /// Channel receiver for loading outcomes (node count or error)
    loading_receiver: Option<Receiver<Result<usize, String>>>,

    /// Path of the file currently being loaded
    pending_load_path: Option<PathBuf>,
}

impl AsyncLoader {
    /// Creates a loader that delivers trees to `updates`.
    pub fn new(updates: Sender<TreeNode>) -> Self {
        Self {
            loading_state: Arc::new(Mutex::new(LoadingState { in_progress: false })),
            updates,
            loading_receiver: None,
            pending_load_path: None,
        }
    }

    /// Checks if a loading operation is currently in progress.
    pub fn is_loading(&self) -> bool {
        self.loading_state
            .lock()
            .map(|state| state.in_progress)
            .unwrap_or(false)
    }

    /// Starts loading a tree file in the background.
    ///
    /// Call `check_completion()` once per frame to pick up the outcome.
    pub fn start_file_load(&mut self, path: PathBuf, ctx: &egui::Context) {
        let (sender, receiver) = channel();
        self.loading_receiver = Some(receiver);
        set_in_progress(&self.loading_state, true);
        self.pending_load_path = Some(path.clone());

        let loading_state = Arc::clone(&self.loading_state);
        let updates = self.updates.clone();
        let ctx_handle = ctx.clone();
        let path_string = path.to_string_lossy().into_owned();

        let failure = sender.clone();
        let spawned = thread::Builder::new()
            .name("tree-loader".to_string())
            .stack_size(LOADER_STACK_SIZE)
            .spawn(move || {
                log::info!("loading {}", path_string);
                let result = match read_tree(&path_string) {
                    Ok(tree) => {
                        let nodes = tree.node_count();
                        // The tree is queued before the outcome so the UI thread
                        // finds it when it sees the success.
                        updates
                            .send(tree)
                            .map(|_| nodes)
                            .map_err(|_| "renderer is gone".to_string())
                    }
                    Err(e) => Err(format!("{:#}", e)),
                };
                if let Err(msg) = &result {
                    log::error!("failed to load {}: {}", path_string, msg);
                }

                let _ = sender.send(result);
                set_in_progress(&loading_state, false);
                ctx_handle.request_repaint();
            });

        if let Err(e) = spawned {
            log::error!("failed to start loader thread: {}", e);
            let _ = failure.send(Err(format!("Failed to start loader thread: {}", e)));
            set_in_progress(&self.loading_state, false);
        }
    }

    /// Generates a random tree and queues it for rendering.
    ///
    /// Generation is quick, so it runs on the calling thread.
    pub fn load_random_tree(&mut self, seed: u64) -> Result<usize, String> {
        let tree = RandomTreeReader::with_config(RANDOM_TREE_DEPTH, RANDOM_TREE_FANOUT, seed).generate();
        let nodes = tree.node_count();
        self.updates
            .send(tree)
            .map_err(|_| "renderer is gone".to_string())?;
        Ok(nodes)
    }

    /// Returns the outcome of a finished background load, if any.
    pub fn check_completion(&mut self) -> LoadResult {
        let Some(receiver) = &self.loading_receiver else {
            return LoadResult::None;
        };
        let Ok(result) = receiver.try_recv() else {
            return LoadResult::None;
        };

        self.loading_receiver = None;
        let path = self.pending_load_path.take();
        match (result, path) {
            (Ok(nodes), Some(path)) => LoadResult::Success { nodes, path },
            (Ok(_), None) => LoadResult::Error("load finished without a path".to_string()),
            (Err(error_msg), _) => LoadResult::Error(error_msg),
        }
    }
}

fn set_in_progress(state: &Mutex<LoadingState>, in_progress: bool) {
    if let Ok(mut state) = state.lock() {
        state.in_progress = in_progress;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_async_loader_creation() {
        let (tx, _rx) = channel();
        let loader = AsyncLoader::new(tx);
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_random_tree_goes_to_update_stream() {
        let (tx, rx) = channel();
        let mut loader = AsyncLoader::new(tx);
        let nodes = loader.load_random_tree(42).unwrap();
        let tree = rx.try_recv().unwrap();
        assert_eq!(tree.node_count(), nodes);
    }

    #[test]
    fn test_random_tree_without_renderer() {
        let (tx, rx) = channel();
        drop(rx);
        let mut loader = AsyncLoader::new(tx);
        assert!(loader.load_random_tree(1).is_err());
    }

    #[test]
    fn test_check_completion_when_idle() {
        let (tx, _rx) = channel();
        let mut loader = AsyncLoader::new(tx);
        assert!(matches!(loader.check_completion(), LoadResult::None));
    }
}
