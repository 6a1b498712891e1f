//! Output type descriptor registered with the host

use crate::host::CaptureFlags;
use crate::settings::{apply_defaults, output_properties, Properties, SettingsDefaults};

pub const OUTPUT_ID: &str = "ndi_output";

/// Localization key of the output's display name
pub const DISPLAY_NAME_KEY: &str = "NDIPlugin.OutputName";

/// Static description of the output type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputInfo {
    pub id: &'static str,
    pub flags: CaptureFlags,
    pub name_key: &'static str,
}

pub const NDI_OUTPUT_INFO: OutputInfo = OutputInfo {
    id: OUTPUT_ID,
    flags: CaptureFlags::AV,
    name_key: DISPLAY_NAME_KEY,
};

impl OutputInfo {
    /// Display name through the host's localization lookup
    pub fn display_name<F>(&self, localize: F) -> String
    where
        F: FnOnce(&str) -> Option<String>,
    {
        localize(self.name_key).unwrap_or_else(|| self.name_key.to_string())
    }

    pub fn properties(&self) -> Properties {
        output_properties()
    }

    pub fn defaults(&self, sink: &mut dyn SettingsDefaults) {
        apply_defaults(sink);
    }
}
