//! Aligned scratch buffer for converted video frames

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;

use thiserror::Error;

const FRAME_ALIGNMENT: usize = 32; // AVX2 requires 32-byte alignment

/// Frame slots per buffer. Consecutive conversions alternate slots, so the
/// frame handed to the last async send is not overwritten by the next one.
pub const CONV_SLOTS: usize = 2;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("invalid buffer layout (size {size}, align {align})")]
    InvalidLayout { size: usize, align: usize },
    #[error("failed to allocate {size} bytes")]
    AllocationFailed { size: usize },
}

/// Zeroed, fixed-size UYVY destination for one frame geometry
///
/// Holds `CONV_SLOTS` frames, each starting on a `FRAME_ALIGNMENT` boundary.
/// Allocated once per output session and released when dropped.
pub struct ConversionBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
    linesize: u32,
    frame_len: usize,
    slot_stride: usize,
}

unsafe impl Send for ConversionBuffer {}
unsafe impl Sync for ConversionBuffer {}

impl ConversionBuffer {
    /// Allocate a UYVY buffer for a `width` x `height` frame
    ///
    /// The row stride is `width * 2`; each slot covers `height * linesize`
    /// bytes, rounded up to the alignment.
    pub fn for_uyvy(width: u32, height: u32) -> Result<Self, BufferError> {
        let overflow = BufferError::InvalidLayout {
            size: usize::MAX,
            align: FRAME_ALIGNMENT,
        };
        let linesize = width.checked_mul(2).ok_or(overflow.clone())?;
        let frame_len = (height as usize)
            .checked_mul(linesize as usize)
            .ok_or(overflow.clone())?;
        let slot_stride = frame_len
            .checked_add(FRAME_ALIGNMENT - 1)
            .map(|len| len / FRAME_ALIGNMENT * FRAME_ALIGNMENT)
            .ok_or(overflow.clone())?;
        let size = slot_stride.checked_mul(CONV_SLOTS).ok_or(overflow)?;

        Self::allocate(size, linesize, frame_len, slot_stride)
    }

    fn allocate(
        size: usize,
        linesize: u32,
        frame_len: usize,
        slot_stride: usize,
    ) -> Result<Self, BufferError> {
        let invalid = BufferError::InvalidLayout {
            size,
            align: FRAME_ALIGNMENT,
        };
        if size == 0 {
            return Err(invalid);
        }
        let layout = Layout::from_size_align(size, FRAME_ALIGNMENT).map_err(|_| invalid)?;

        // SAFETY: layout has a non-zero size.
        let ptr = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).ok_or(BufferError::AllocationFailed { size })?;

        log::debug!("[obs-ndi] allocated {} byte conversion buffer", size);

        Ok(Self {
            ptr,
            layout,
            linesize,
            frame_len,
            slot_stride,
        })
    }

    /// Output row stride in bytes
    pub fn linesize(&self) -> u32 {
        self.linesize
    }

    /// Bytes of one converted frame
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn len(&self) -> usize {
        self.layout.size()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.size() == 0
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr is a live allocation of layout.size() initialized bytes.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.layout.size()) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and &mut self guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout.size()) }
    }

    /// Start of frame slot `index % CONV_SLOTS`
    pub fn slot_ptr(&self, index: usize) -> *const u8 {
        self.as_slice()[self.slot_range(index)].as_ptr()
    }

    /// Frame slot `index % CONV_SLOTS`, exactly `frame_len` bytes
    pub fn slot_mut(&mut self, index: usize) -> &mut [u8] {
        let range = self.slot_range(index);
        &mut self.as_mut_slice()[range]
    }

    fn slot_range(&self, index: usize) -> std::ops::Range<usize> {
        let start = (index % CONV_SLOTS) * self.slot_stride;
        start..start + self.frame_len
    }
}

impl Drop for ConversionBuffer {
    fn drop(&mut self) {
        // SAFETY: ptr was returned by alloc_zeroed with this exact layout.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

impl std::fmt::Debug for ConversionBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionBuffer")
            .field("len", &self.len())
            .field("linesize", &self.linesize)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uyvy_buffer_geometry() {
        let buffer = ConversionBuffer::for_uyvy(1920, 1080).unwrap();

        assert_eq!(buffer.linesize(), 3840);
        assert_eq!(buffer.frame_len(), 1080 * 3840);
        assert_eq!(buffer.len(), 1080 * 3840 * CONV_SLOTS);
    }

    #[test]
    fn test_slots_are_disjoint_and_aligned() {
        // 4x2 UYVY is 16 bytes, padded to a 32-byte slot
        let mut buffer = ConversionBuffer::for_uyvy(4, 2).unwrap();
        assert_eq!(buffer.frame_len(), 16);
        assert_eq!(buffer.len(), 64);

        buffer.slot_mut(0).fill(1);
        buffer.slot_mut(1).fill(2);

        assert_eq!(buffer.slot_mut(0).len(), 16);
        assert_eq!(buffer.slot_ptr(1) as usize - buffer.slot_ptr(0) as usize, 32);
        assert_eq!(buffer.slot_ptr(1) as usize % FRAME_ALIGNMENT, 0);
        assert!(buffer.as_slice()[..16].iter().all(|&b| b == 1));
        assert!(buffer.as_slice()[32..48].iter().all(|&b| b == 2));
        // Padding between slots is untouched
        assert!(buffer.as_slice()[16..32].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_slot_index_wraps() {
        let buffer = ConversionBuffer::for_uyvy(8, 4).unwrap();
        assert_eq!(buffer.slot_ptr(CONV_SLOTS), buffer.slot_ptr(0));
        assert_eq!(buffer.slot_ptr(CONV_SLOTS + 1), buffer.slot_ptr(1));
    }

    #[test]
    fn test_buffer_alignment() {
        let buffer = ConversionBuffer::for_uyvy(640, 480).unwrap();
        assert_eq!(buffer.as_ptr() as usize % FRAME_ALIGNMENT, 0, "buffer not aligned");
    }

    #[test]
    fn test_buffer_starts_zeroed() {
        let buffer = ConversionBuffer::for_uyvy(16, 4).unwrap();
        assert!(buffer.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_buffer_write_read() {
        let mut buffer = ConversionBuffer::for_uyvy(4, 2).unwrap();
        buffer.as_mut_slice()[3] = 42;
        assert_eq!(buffer.as_slice()[3], 42);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            ConversionBuffer::for_uyvy(0, 1080),
            Err(BufferError::InvalidLayout { .. })
        ));
        assert!(matches!(
            ConversionBuffer::for_uyvy(1920, 0),
            Err(BufferError::InvalidLayout { .. })
        ));
    }
}
