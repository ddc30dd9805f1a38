//! Theme support for the tree card.
//!
//! A theme bundles the colors the card itself paints (links, halos, the
//! collapsed-node fill) with the window chrome colors used by the desktop
//! host. Built-in themes: Light, Dark, Dracula, One Dark Pro.
//!
//! # Examples
//!
//! ```
//! use treecard::theme::ThemeManager;
//!
//! let manager = ThemeManager::new();
//! let dracula = manager.get_theme("Dracula").unwrap();
//! println!("Dracula link stroke: {}", dracula.card.link);
//! ```

use egui::Color32;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::color::{Rgb, COLLAPSED_FILL};

/// Colors painted by the tree card itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPalette {
    pub background: Rgb,
    pub link: Rgb,
    pub link_opacity: f32,
    /// Stroke drawn behind labels so they stay readable over links.
    pub halo: Rgb,
    pub text: Rgb,
    /// Fill of internal nodes whose children are hidden.
    pub collapsed: Rgb,
}

impl Default for CardPalette {
    fn default() -> Self {
        Self {
            background: Rgb::new(255, 255, 255),
            link: Rgb::new(0x55, 0x55, 0x55),
            link_opacity: 0.4,
            halo: Rgb::new(255, 255, 255),
            text: Rgb::new(0, 0, 0),
            collapsed: COLLAPSED_FILL,
        }
    }
}

/// Window chrome colors for the desktop host.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub panel_background: Color32,
    pub extreme_background: Color32,
    pub text: Color32,
    pub text_dim: Color32,
    pub selection: Color32,
    pub hover: Color32,
    pub accent: Color32,
    pub error: Color32,
    pub warn: Color32,
}

/// A complete theme definition with metadata and color palette
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub dark: bool,
    pub colors: ThemeColors,
    pub card: CardPalette,
}

static BUILTIN_THEMES: Lazy<Vec<Theme>> =
    Lazy::new(|| vec![light_theme(), dark_theme(), dracula_theme(), one_dark_pro_theme()]);

/// Centralized theme manager providing access to all available themes
pub struct ThemeManager {
    themes: HashMap<String, Theme>,
}

impl ThemeManager {
    /// Creates a new ThemeManager initialized with all built-in themes
    pub fn new() -> Self {
        let themes = BUILTIN_THEMES
            .iter()
            .map(|theme| (theme.name.clone(), theme.clone()))
            .collect();
        Self { themes }
    }

    /// Retrieves a theme by name
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    /// Retrieves a theme by name, falling back to Light.
    pub fn theme_or_default(&self, name: &str) -> &Theme {
        self.themes
            .get(name)
            .unwrap_or_else(|| &BUILTIN_THEMES[0])
    }

    /// Returns a list of all available theme names
    pub fn list_themes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Applies a theme's colors to egui visuals
    pub fn apply_theme(&self, theme: &Theme, visuals: &mut egui::Visuals) {
        let colors = &theme.colors;

        visuals.panel_fill = colors.panel_background;
        visuals.extreme_bg_color = colors.extreme_background;
        visuals.faint_bg_color = colors.hover;
        visuals.override_text_color = Some(colors.text);

        visuals.selection.bg_fill = colors.selection;
        visuals.selection.stroke.color = colors.accent;

        visuals.widgets.noninteractive.bg_fill = colors.panel_background;
        visuals.widgets.inactive.bg_fill = colors.hover;
        visuals.widgets.hovered.bg_fill = colors.hover;
        visuals.widgets.active.bg_fill = colors.selection;

        visuals.hyperlink_color = colors.accent;
        visuals.error_fg_color = colors.error;
        visuals.warn_fg_color = colors.warn;
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

fn light_theme() -> Theme {
    Theme {
        name: "Light".to_string(),
        description: "White card, as embedded in a light dashboard".to_string(),
        dark: false,
        colors: ThemeColors {
            panel_background: Color32::from_rgb(248, 248, 248),
            extreme_background: Color32::from_rgb(255, 255, 255),
            text: Color32::from_rgb(0, 0, 0),
            text_dim: Color32::from_rgb(120, 120, 120),
            selection: Color32::from_rgb(180, 200, 255),
            hover: Color32::from_rgb(220, 220, 220),
            accent: Color32::from_rgb(40, 100, 200),
            error: Color32::from_rgb(200, 40, 40),
            warn: Color32::from_rgb(230, 120, 20),
        },
        card: CardPalette::default(),
    }
}

fn dark_theme() -> Theme {
    Theme {
        name: "Dark".to_string(),
        description: "Dark card with egui default chrome".to_string(),
        dark: true,
        colors: ThemeColors {
            panel_background: Color32::from_rgb(39, 39, 39),
            extreme_background: Color32::from_rgb(16, 16, 16),
            text: Color32::from_rgb(255, 255, 255),
            text_dim: Color32::from_rgb(160, 160, 160),
            selection: Color32::from_rgb(50, 80, 120),
            hover: Color32::from_rgb(70, 70, 70),
            accent: Color32::from_rgb(52, 152, 219),
            error: Color32::from_rgb(231, 76, 60),
            warn: Color32::from_rgb(243, 156, 18),
        },
        card: CardPalette {
            background: Rgb::new(16, 16, 16),
            link: Rgb::new(0xaa, 0xaa, 0xaa),
            link_opacity: 0.5,
            halo: Rgb::new(16, 16, 16),
            text: Rgb::new(240, 240, 240),
            collapsed: Rgb::new(0x88, 0x88, 0x88),
        },
    }
}

/// Official colors from: https://draculatheme.com/spec
fn dracula_theme() -> Theme {
    Theme {
        name: "Dracula".to_string(),
        description: "Official Dracula theme color palette".to_string(),
        dark: true,
        colors: ThemeColors {
            panel_background: hex("#282a36"),
            extreme_background: hex("#21222c"),
            text: hex("#f8f8f2"),
            text_dim: hex("#6272a4"),
            selection: hex("#44475a"),
            hover: hex("#44475a"),
            accent: hex("#bd93f9"),
            error: hex("#ff5555"),
            warn: hex("#ffb86c"),
        },
        card: CardPalette {
            background: rgb("#21222c"),
            link: rgb("#6272a4"),
            link_opacity: 0.6,
            halo: rgb("#21222c"),
            text: rgb("#f8f8f2"),
            collapsed: rgb("#6272a4"),
        },
    }
}

/// Official colors from: https://github.com/Binaryify/OneDark-Pro
fn one_dark_pro_theme() -> Theme {
    Theme {
        name: "One Dark Pro".to_string(),
        description: "VSCode One Dark Pro color palette".to_string(),
        dark: true,
        colors: ThemeColors {
            panel_background: hex("#282c34"),
            extreme_background: hex("#21252b"),
            text: hex("#abb2bf"),
            text_dim: hex("#5c6370"),
            selection: hex("#4b5263"),
            hover: hex("#4b5263"),
            accent: hex("#61afef"),
            error: hex("#e06c75"),
            warn: hex("#d19a66"),
        },
        card: CardPalette {
            background: rgb("#21252b"),
            link: rgb("#5c6370"),
            link_opacity: 0.6,
            halo: rgb("#21252b"),
            text: rgb("#abb2bf"),
            collapsed: rgb("#5c6370"),
        },
    }
}

/// Built-in palettes only use well-formed literals; black is the fallback.
fn rgb(code: &str) -> Rgb {
    Rgb::from_hex(code).unwrap_or(Rgb::new(0, 0, 0))
}

fn hex(code: &str) -> Color32 {
    rgb(code).into()
}

/// Sets the alpha channel of a color
pub fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_themes() {
        let manager = ThemeManager::new();
        assert_eq!(manager.list_themes(), vec!["Dark", "Dracula", "Light", "One Dark Pro"]);
        assert_eq!(manager.get_theme("Light").unwrap().card, CardPalette::default());
        assert!(manager.get_theme("Dracula").unwrap().dark);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_light() {
        let manager = ThemeManager::new();
        assert_eq!(manager.theme_or_default("Solarized").name, "Light");
    }

    #[test]
    fn test_palette_literals_parse() {
        let dracula = ThemeManager::new().get_theme("Dracula").unwrap().card;
        assert_eq!(dracula.text, Rgb::new(0xf8, 0xf8, 0xf2));
    }
}
