//! NDI Output - host output that sends mixed video and audio over NDI
//!
//! The instance negotiates formats with the host at start, converts or
//! repacks each frame the SDK cannot take as is, and hands it to an NDI
//! sender. Host and SDK are reached through the `OutputHost` and `NdiSdk`
//! traits; the C bindings live in `ndi-ffi`.

pub mod error;
pub mod frame;
pub mod host;
pub mod output;
pub mod registration;
pub mod sdk;
pub mod settings;

#[cfg(test)]
mod mock;

pub use error::StartError;
pub use frame::*;
pub use host::{CaptureFlags, OutputHost};
pub use output::NdiOutput;
pub use registration::*;
pub use sdk::*;
pub use settings::*;
