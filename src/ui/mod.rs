//! UI panel rendering subsystem
//!
//! - Header panel (file controls, expansion policy, theme selector)
//! - Card panel (the animated tree)
//! - Status bar (tree size, last update counts)
//! - Panel manager (panel orchestration and layout)

pub mod header;
pub mod card_panel;
pub mod status_bar;
pub mod panel_manager;
