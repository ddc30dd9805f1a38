//! Generic settings persistence coordination.
//!
//! Any serializable setting is stored in eframe's storage as a JSON string,
//! next to the theme preference kept by `ThemeCoordinator`.

use serde::{Deserialize, Serialize};

/// Coordinates generic settings persistence.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads a setting, falling back to `default` if it is missing or no
    /// longer parses (e.g. after a field was renamed).
    ///
    /// # Examples
    /// ```ignore
    /// let config: RendererConfig = SettingsCoordinator::load_setting_or(
    ///     storage,
    ///     "renderer_config",
    ///     RendererConfig::default(),
    /// );
    /// ```
    pub fn load_setting_or<T>(storage: Option<&dyn eframe::Storage>, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de>,
    {
        Self::try_load_setting(storage, key).unwrap_or(default)
    }

    /// Attempts to load a setting, returning None if not found or invalid.
    pub fn try_load_setting<T>(storage: Option<&dyn eframe::Storage>, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let storage = storage?;
        let json_str = storage.get_string(key)?;
        match serde_json::from_str(&json_str) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring stored setting {}: {}", key, e);
                None
            }
        }
    }

    /// Saves a setting to persistent storage.
    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        if let Ok(json_str) = serde_json::to_string(value) {
            storage.set_string(key, json_str);
            storage.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use treecard::{ExpansionPolicy, RendererConfig};

    /// Simple mock storage for testing
    #[derive(Default)]
    struct MockStorage {
        data: HashMap<String, String>,
    }

    impl eframe::Storage for MockStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.data.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.data.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_save_and_load_config() {
        let mut storage = MockStorage::default();
        let config = RendererConfig {
            expansion: ExpansionPolicy::MaxDepth(2),
            transition_ms: 400,
            ..RendererConfig::default()
        };

        SettingsCoordinator::save_setting(&mut storage, "renderer_config", &config);
        let loaded: RendererConfig =
            SettingsCoordinator::load_setting_or(Some(&storage), "renderer_config", RendererConfig::default());
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_key_uses_default() {
        let storage = MockStorage::default();
        let loaded: RendererConfig =
            SettingsCoordinator::load_setting_or(Some(&storage), "renderer_config", RendererConfig::default());
        assert_eq!(loaded, RendererConfig::default());

        let none: Option<PathBuf> = SettingsCoordinator::try_load_setting(None, "last_file");
        assert_eq!(none, None);
    }

    #[test]
    fn test_corrupt_value_is_ignored() {
        let mut storage = MockStorage::default();
        eframe::Storage::set_string(&mut storage, "last_file", "{not json".to_string());
        let loaded: Option<PathBuf> = SettingsCoordinator::try_load_setting(Some(&storage), "last_file");
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_optional_path_round_trip() {
        let mut storage = MockStorage::default();
        let path = Some(PathBuf::from("/tmp/tree.json"));
        SettingsCoordinator::save_setting(&mut storage, "last_file", &path);
        let loaded: Option<PathBuf> = SettingsCoordinator::load_setting_or(Some(&storage), "last_file", None);
        assert_eq!(loaded, path);
    }
}
