//! Theme state management.

use treecard::{Theme, ThemeManager};

/// Built-in themes and the current selection.
pub struct ThemeState {
    theme_manager: ThemeManager,
    current_theme_name: String,
}

impl std::fmt::Debug for ThemeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeState")
            .field("current_theme_name", &self.current_theme_name)
            .finish_non_exhaustive()
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeState {
    /// Creates a new theme state with the light theme, the card's native look.
    pub fn new() -> Self {
        Self::with_theme("Light".to_string())
    }

    pub fn with_theme(theme_name: String) -> Self {
        Self {
            theme_manager: ThemeManager::new(),
            current_theme_name: theme_name,
        }
    }

    pub fn theme_manager(&self) -> &ThemeManager {
        &self.theme_manager
    }

    pub fn current_theme_name(&self) -> &str {
        &self.current_theme_name
    }

    /// The selected theme, or Light if the stored name is unknown.
    pub fn current_theme(&self) -> &Theme {
        self.theme_manager.theme_or_default(&self.current_theme_name)
    }

    pub fn set_theme(&mut self, theme_name: String) {
        self.current_theme_name = theme_name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_theme_falls_back_to_light() {
        let mut state = ThemeState::default();
        assert_eq!(state.current_theme().name, "Light");

        state.set_theme("No Such Theme".to_string());
        assert_eq!(state.current_theme_name(), "No Such Theme");
        assert_eq!(state.current_theme().name, "Light");
    }
}
