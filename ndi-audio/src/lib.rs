//! NDI Audio - host audio handling for the network output
//!
//! Raw output callbacks deliver planar float audio, one buffer per channel.
//! The sender wants one contiguous block, so each frame is repacked into a
//! grow-only scratch buffer that lives as long as the output instance.

pub mod repack;
pub mod scratch;
pub mod types;

pub use repack::*;
pub use scratch::*;
pub use types::*;
