//! Renderer configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::expansion::ExpansionPolicy;

/// Margins around the drawn tree, in viewBox units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
            left: 40.0,
        }
    }
}

/// Tunables for layout, animation and drawing.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Width used when the container does not report one.
    pub width: f32,
    pub margins: Margins,
    /// Breadth allotted to each node.
    pub node_spacing: f32,
    pub node_radius: f32,
    pub transition_ms: u64,
    /// Duration when the triggering click held Alt.
    pub slow_transition_ms: u64,
    pub expansion: ExpansionPolicy,
    pub font_size: f32,
    /// Distance between a node's circle and its label.
    pub label_offset: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 628.0,
            margins: Margins::default(),
            node_spacing: 10.0,
            node_radius: 2.5,
            transition_ms: 250,
            slow_transition_ms: 2500,
            expansion: ExpansionPolicy::default(),
            font_size: 10.0,
            label_offset: 6.0,
        }
    }
}

impl RendererConfig {
    /// Loads a config from JSON; missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the config describes a drawable card.
    ///
    /// The width must leave room between the left and right margins, or the
    /// depth spacing would turn negative and mirror the tree.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numbers = [
            ("width", self.width),
            ("margins.top", self.margins.top),
            ("margins.right", self.margins.right),
            ("margins.bottom", self.margins.bottom),
            ("margins.left", self.margins.left),
            ("node_spacing", self.node_spacing),
            ("node_radius", self.node_radius),
            ("font_size", self.font_size),
            ("label_offset", self.label_offset),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::NotFinite(*name));
        }
        if self.width <= self.margins.left + self.margins.right {
            return Err(ConfigError::TooNarrow {
                width: self.width,
                left: self.margins.left,
                right: self.margins.right,
            });
        }
        Ok(())
    }

    pub fn transition(&self, slow: bool) -> Duration {
        Duration::from_millis(if slow {
            self.slow_transition_ms
        } else {
            self.transition_ms
        })
    }

    /// Depth spacing for a tree of the given height drawn `width` wide.
    ///
    /// A container narrower than the margins gets zero spacing rather than a
    /// mirrored tree.
    pub fn depth_spacing(&self, width: f32, height: usize) -> f32 {
        ((width - self.margins.right - self.margins.left) / (1 + height) as f32).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RendererConfig::from_json_str(r#"{"width": 800, "expansion": "Expanded"}"#).unwrap();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.expansion, ExpansionPolicy::Expanded);
        assert_eq!(config.margins, Margins::default());
        assert_eq!(config.transition_ms, 250);
    }

    #[test]
    fn test_partial_margins_use_defaults() {
        let config = RendererConfig::from_json_str(r#"{"margins": {"top": 5}}"#).unwrap();
        assert_eq!(config.margins.top, 5.0);
        assert_eq!(config.margins.left, 40.0);
        assert_eq!(config.margins.bottom, 10.0);
    }

    #[test]
    fn test_rejects_width_inside_margins() {
        let err = RendererConfig::from_json_str(r#"{"width": 45}"#).unwrap_err();
        assert!(matches!(err, ConfigError::TooNarrow { left, right, .. } if left == 40.0 && right == 10.0));

        let config = RendererConfig {
            width: 50.0,
            ..RendererConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(RendererConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_numbers() {
        let err = RendererConfig::from_json_str(r#"{"node_radius": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotFinite("node_radius")));
        assert!(matches!(
            RendererConfig::from_json_str("[1]").unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn test_transition_durations() {
        let config = RendererConfig::default();
        assert_eq!(config.transition(false), Duration::from_millis(250));
        assert_eq!(config.transition(true), Duration::from_millis(2500));
    }

    #[test]
    fn test_depth_spacing() {
        let config = RendererConfig::default();
        assert_eq!(config.depth_spacing(628.0, 0), 578.0);
        assert_eq!(config.depth_spacing(628.0, 1), 289.0);
        assert_eq!(config.depth_spacing(20.0, 1), 0.0);
    }
}
