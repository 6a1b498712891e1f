//! Output lifecycle errors

use ndi_video::{BufferError, VideoFormat};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StartError {
    #[error("output is already running")]
    AlreadyStarted,

    #[error("no video and audio available")]
    NoMediaAvailable,

    #[error("unsupported pixel format {0:?}")]
    UnsupportedFormat(VideoFormat),

    #[error("{0} audio channels, at most 8 supported")]
    TooManyChannels(usize),

    #[error("ndi sender init failed")]
    SenderCreateFailed,

    #[error("data capture start failed")]
    CaptureBeginFailed,

    #[error("conversion buffer: {0}")]
    ConversionBuffer(#[from] BufferError),
}

impl StartError {
    /// Errors caused by the output's configuration rather than a resource
    /// failure. The instance can be started again once settings change.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StartError::NoMediaAvailable
                | StartError::UnsupportedFormat(_)
                | StartError::TooManyChannels(_)
        )
    }
}
