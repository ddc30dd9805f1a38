pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod expansion;
pub mod hierarchy;
pub mod layout;
pub mod reader;
pub mod renderer;
pub mod svg;
pub mod theme;
pub mod transition;
pub mod writer;

// Export input model
pub use data::{NodeRecord, TreeNode};
pub use error::{ConfigError, TreeError};
pub use expansion::ExpansionPolicy;

// Export renderer
pub use config::{Margins, RendererConfig};
pub use renderer::{ClickEvent, Container, Detached, Modifiers, RenderStats, TreeRenderer};
pub use transition::{Frame, Point, Viewport};

// Export readers and writer
pub use reader::{read_tree, JsonTreeReader, RandomTreeReader, RecordTreeReader, TreeReader};
pub use writer::TreeWriter;

// Export theme support
pub use theme::{CardPalette, Theme, ThemeColors, ThemeManager, with_alpha};

/// Log level for the binaries, read from `TREE_CARD_LOG` (default `info`).
pub fn log_level() -> log::LevelFilter {
    std::env::var("TREE_CARD_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(log::LevelFilter::Info)
}
