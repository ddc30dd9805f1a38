//! State management modules for the tree card viewer.
//!
//! State-only logic, no UI concerns: the card (renderer, data source) and the
//! theme selection.

mod card_state;
mod theme_state;

pub use card_state::{CardState, TreeSource};
pub use theme_state::ThemeState;
