//! Host audio data types

/// Maximum number of planes the host hands over per frame
pub const MAX_AV_PLANES: usize = 8;

/// Size of one planar float sample, the only format raw output callbacks deliver
pub const FLOAT_SAMPLE_BYTES: usize = std::mem::size_of::<f32>();

/// Raw audio frame as delivered by the host (layout matches `struct audio_data`)
///
/// One planar float buffer per channel, each `frames` samples long.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AudioData {
    pub data: [*mut u8; MAX_AV_PLANES],
    pub frames: u32,
    pub timestamp: u64,
}

unsafe impl Send for AudioData {}
unsafe impl Sync for AudioData {}

impl AudioData {
    pub fn new(frames: u32, timestamp: u64) -> Self {
        Self {
            data: [std::ptr::null_mut(); MAX_AV_PLANES],
            frames,
            timestamp,
        }
    }

    /// Byte length of each channel plane
    pub fn channel_stride(&self) -> usize {
        self.frames as usize * FLOAT_SAMPLE_BYTES
    }

    /// View channel `index`, or `None` if the plane is absent.
    ///
    /// # Safety
    /// The plane pointer must be valid for reads of `channel_stride()` bytes
    /// for the lifetime of the returned slice.
    pub unsafe fn channel(&self, index: usize) -> Option<&[u8]> {
        let ptr = *self.data.get(index)?;
        if ptr.is_null() {
            return None;
        }
        Some(std::slice::from_raw_parts(ptr, self.channel_stride()))
    }
}

/// Audio output description queried from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioOutputInfo {
    pub sample_rate: u32,
    pub channels: usize,
}
