//! Output settings, defaults and property descriptors

use std::collections::HashMap;

/// Sender name as seen by receivers on the network
pub const NDI_NAME: &str = "ndi_name";
pub const USES_VIDEO: &str = "uses_video";
pub const USES_AUDIO: &str = "uses_audio";

pub const DEFAULT_NDI_NAME: &str = "obs-ndi output (changeme)";

/// Localization key of the sender name property label
pub const NDI_NAME_LABEL_KEY: &str = "NDIPlugin.OutputProps.NDIName";

/// Read side of a settings object
pub trait Settings {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_bool(&self, key: &str) -> Option<bool>;
}

/// Default-value side of a settings object
pub trait SettingsDefaults {
    fn set_default_string(&mut self, key: &str, value: &str);
    fn set_default_bool(&mut self, key: &str, value: bool);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    String(String),
    Bool(bool),
}

/// In-memory settings with defaults layered under explicit values
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, SettingValue>,
    defaults: HashMap<String, SettingValue>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings pre-populated with the output's defaults
    pub fn with_defaults() -> Self {
        let mut settings = Self::new();
        apply_defaults(&mut settings);
        settings
    }

    pub fn set_string(&mut self, key: &str, value: &str) -> &mut Self {
        self.values
            .insert(key.to_string(), SettingValue::String(value.to_string()));
        self
    }

    pub fn set_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.values.insert(key.to_string(), SettingValue::Bool(value));
        self
    }

    fn lookup(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key).or_else(|| self.defaults.get(key))
    }
}

impl Settings for MemorySettings {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            SettingValue::String(value) => Some(value.clone()),
            SettingValue::Bool(_) => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.lookup(key)? {
            SettingValue::Bool(value) => Some(*value),
            SettingValue::String(_) => None,
        }
    }
}

impl SettingsDefaults for MemorySettings {
    fn set_default_string(&mut self, key: &str, value: &str) {
        self.defaults
            .insert(key.to_string(), SettingValue::String(value.to_string()));
    }

    fn set_default_bool(&mut self, key: &str, value: bool) {
        self.defaults.insert(key.to_string(), SettingValue::Bool(value));
    }
}

/// Register the output's default settings
pub fn apply_defaults(sink: &mut dyn SettingsDefaults) {
    sink.set_default_string(NDI_NAME, DEFAULT_NDI_NAME);
    sink.set_default_bool(USES_VIDEO, true);
    sink.set_default_bool(USES_AUDIO, true);
}

/// Identity and feature flags of an output instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub ndi_name: String,
    pub uses_video: bool,
    pub uses_audio: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            ndi_name: DEFAULT_NDI_NAME.to_string(),
            uses_video: true,
            uses_audio: true,
        }
    }
}

impl OutputConfig {
    /// Read the config, falling back to defaults for missing keys
    pub fn from_settings(settings: &dyn Settings) -> Self {
        let defaults = Self::default();
        Self {
            ndi_name: settings.get_string(NDI_NAME).unwrap_or(defaults.ndi_name),
            uses_video: settings.get_bool(USES_VIDEO).unwrap_or(defaults.uses_video),
            uses_audio: settings.get_bool(USES_AUDIO).unwrap_or(defaults.uses_audio),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Single-line text field
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    /// Localization key of the label
    pub label_key: &'static str,
    pub kind: PropertyKind,
}

/// Property sheet shown by the host for an output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    /// Apply edits only when the dialog is confirmed
    pub defer_update: bool,
    pub items: Vec<Property>,
}

/// Property sheet of the network output: a single sender name field
pub fn output_properties() -> Properties {
    Properties {
        defer_update: true,
        items: vec![Property {
            name: NDI_NAME,
            label_key: NDI_NAME_LABEL_KEY,
            kind: PropertyKind::Text,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = MemorySettings::with_defaults();

        assert_eq!(
            settings.get_string(NDI_NAME).as_deref(),
            Some("obs-ndi output (changeme)")
        );
        assert_eq!(settings.get_bool(USES_VIDEO), Some(true));
        assert_eq!(settings.get_bool(USES_AUDIO), Some(true));
    }

    #[test]
    fn test_explicit_value_overrides_default() {
        let mut settings = MemorySettings::with_defaults();
        settings.set_string(NDI_NAME, "Studio A").set_bool(USES_AUDIO, false);

        let config = OutputConfig::from_settings(&settings);
        assert_eq!(config.ndi_name, "Studio A");
        assert!(config.uses_video);
        assert!(!config.uses_audio);
    }

    #[test]
    fn test_missing_keys_fall_back() {
        let settings = MemorySettings::new();
        assert_eq!(OutputConfig::from_settings(&settings), OutputConfig::default());
    }

    #[test]
    fn test_type_mismatch_reads_as_missing() {
        let mut settings = MemorySettings::new();
        settings.set_bool(NDI_NAME, true);
        assert_eq!(settings.get_string(NDI_NAME), None);
    }

    #[test]
    fn test_properties() {
        let props = output_properties();
        assert!(props.defer_update);
        assert_eq!(props.items.len(), 1);
        assert_eq!(props.items[0].name, "ndi_name");
        assert_eq!(props.items[0].kind, PropertyKind::Text);
    }
}
