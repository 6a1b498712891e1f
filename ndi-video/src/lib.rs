//! NDI Video - host frame handling for the network output
//!
//! - Host pixel formats and the raw frame view delivered per callback
//! - I444 to UYVY conversion (sequential and row-band parallel)
//! - Aligned conversion buffer owned by a running output

pub mod conv_buffer;
pub mod format_conversion;
pub mod types;

pub use conv_buffer::*;
pub use format_conversion::*;
pub use types::*;
