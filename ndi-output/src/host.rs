//! Host pipeline seam

use std::ops::{BitOr, BitOrAssign};

use ndi_audio::AudioOutputInfo;
use ndi_video::VideoOutputInfo;

/// Media flags for data capture and output registration (host bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureFlags(u32);

impl CaptureFlags {
    pub const VIDEO: CaptureFlags = CaptureFlags(1 << 0);
    pub const AUDIO: CaptureFlags = CaptureFlags(1 << 1);
    pub const AV: CaptureFlags = CaptureFlags(Self::VIDEO.0 | Self::AUDIO.0);

    pub const fn empty() -> Self {
        CaptureFlags(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: CaptureFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for CaptureFlags {
    type Output = CaptureFlags;

    fn bitor(self, rhs: CaptureFlags) -> CaptureFlags {
        CaptureFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for CaptureFlags {
    fn bitor_assign(&mut self, rhs: CaptureFlags) {
        self.0 |= rhs.0;
    }
}

/// The host side of one registered output
///
/// Frame callbacks are only delivered between a successful
/// `begin_data_capture` and the matching `end_data_capture`.
pub trait OutputHost: Send + Sync {
    /// Video mix attached to the output, if any
    fn video(&self) -> Option<VideoOutputInfo>;

    /// Audio mix attached to the output, if any
    fn audio(&self) -> Option<AudioOutputInfo>;

    fn begin_data_capture(&self, flags: CaptureFlags) -> bool;

    fn end_data_capture(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_flags() {
        let mut flags = CaptureFlags::empty();
        assert!(flags.is_empty());

        flags |= CaptureFlags::VIDEO;
        assert!(flags.contains(CaptureFlags::VIDEO));
        assert!(!flags.contains(CaptureFlags::AUDIO));

        flags |= CaptureFlags::AUDIO;
        assert_eq!(flags, CaptureFlags::AV);
        assert_eq!(CaptureFlags::AV.bits(), 3);
    }
}
