//! Host video data types and constants

/// Maximum number of planes the host hands over per frame
pub const MAX_AV_PLANES: usize = 8;

/// Host pixel format enumeration (values match the host's `video_format`)
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoFormat {
    None = 0,
    I420 = 1,  // Planar YUV 4:2:0
    NV12 = 2,  // Semi-planar YUV 4:2:0 (Y plane, interleaved UV)
    YVYU = 3,  // Packed YUV 4:2:2
    YUY2 = 4,  // Packed YUV 4:2:2
    UYVY = 5,  // Packed YUV 4:2:2
    RGBA = 6,  // Packed RGB
    BGRA = 7,  // Packed BGR
    BGRX = 8,  // Packed BGR (no alpha)
    Y800 = 9,  // Grayscale
    I444 = 10, // Planar YUV 4:4:4
    BGR3 = 11, // Packed BGR 24-bit
    I422 = 12, // Planar YUV 4:2:2
    I40A = 13, // Planar YUVA 4:2:0
    I42A = 14, // Planar YUVA 4:2:2
    YUVA = 15, // Planar YUVA 4:4:4
    AYUV = 16, // Packed YUVA 4:4:4
    I010 = 17, // Planar YUV 4:2:0 10-bit
    P010 = 18, // Semi-planar YUV 4:2:0 10-bit
    I210 = 19, // Planar YUV 4:2:2 10-bit
    I412 = 20, // Planar YUV 4:4:4 12-bit
    YA2L = 21, // Packed YUVA 4:2:2 10-bit
    P216 = 22, // Semi-planar YUV 4:2:2 16-bit
    P416 = 23, // Semi-planar YUV 4:4:4 16-bit
    V210 = 24, // Packed YUV 4:2:2 10-bit
    R10L = 25, // Packed RGB 10-bit
}

impl VideoFormat {
    const ALL: [VideoFormat; 26] = [
        VideoFormat::None,
        VideoFormat::I420,
        VideoFormat::NV12,
        VideoFormat::YVYU,
        VideoFormat::YUY2,
        VideoFormat::UYVY,
        VideoFormat::RGBA,
        VideoFormat::BGRA,
        VideoFormat::BGRX,
        VideoFormat::Y800,
        VideoFormat::I444,
        VideoFormat::BGR3,
        VideoFormat::I422,
        VideoFormat::I40A,
        VideoFormat::I42A,
        VideoFormat::YUVA,
        VideoFormat::AYUV,
        VideoFormat::I010,
        VideoFormat::P010,
        VideoFormat::I210,
        VideoFormat::I412,
        VideoFormat::YA2L,
        VideoFormat::P216,
        VideoFormat::P416,
        VideoFormat::V210,
        VideoFormat::R10L,
    ];

    /// Map a raw host format value; unknown values collapse to `None`
    pub fn from_raw(raw: u32) -> Self {
        Self::ALL
            .get(raw as usize)
            .copied()
            .unwrap_or(VideoFormat::None)
    }
}

/// Raw video frame as delivered by the host (layout matches `struct video_data`)
///
/// Plane pointers are borrowed from the host and are only valid for the
/// duration of the callback that delivered them.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct VideoData {
    pub data: [*mut u8; MAX_AV_PLANES],
    pub linesize: [u32; MAX_AV_PLANES],
    pub timestamp: u64,
}

unsafe impl Send for VideoData {}
unsafe impl Sync for VideoData {}

impl VideoData {
    pub fn new(timestamp: u64) -> Self {
        Self {
            data: [std::ptr::null_mut(); MAX_AV_PLANES],
            linesize: [0; MAX_AV_PLANES],
            timestamp,
        }
    }

    /// View `rows` lines of plane `index`, or `None` if the plane is absent.
    ///
    /// # Safety
    /// The plane pointer must be valid for reads of `linesize * rows` bytes
    /// for the lifetime of the returned slice.
    pub unsafe fn plane(&self, index: usize, rows: u32) -> Option<&[u8]> {
        let ptr = *self.data.get(index)?;
        if ptr.is_null() {
            return None;
        }
        let len = self.linesize[index] as usize * rows as usize;
        Some(std::slice::from_raw_parts(ptr, len))
    }
}

/// Negotiated video output description queried from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoOutputInfo {
    pub format: VideoFormat,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}
