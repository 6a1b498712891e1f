//! Planar channel repacking
//!
//! The host delivers one buffer per channel; the network sender wants all
//! channels back to back in a single block (channel 0, channel 1, ...), each
//! keeping its own stride.

use crate::scratch::ScratchBuffer;
use crate::types::{AudioData, FLOAT_SAMPLE_BYTES, MAX_AV_PLANES};

/// Copy `channels` into `scratch`, channel `i` at offset `i * channel_stride`
///
/// The scratch buffer grows to `channels.len() * channel_stride` if it is
/// smaller. Every channel is trusted to hold at least `channel_stride` bytes.
/// Returns the packed block.
pub fn repack_planar<'a>(
    channels: &[&[u8]],
    channel_stride: usize,
    scratch: &'a mut ScratchBuffer,
) -> &'a [u8] {
    let required = channels.len() * channel_stride;
    scratch.ensure_capacity(required);

    let packed = &mut scratch.as_mut_slice()[..required];
    if channel_stride > 0 {
        for (dst, src) in packed.chunks_exact_mut(channel_stride).zip(channels) {
            dst.copy_from_slice(&src[..channel_stride]);
        }
    }

    &scratch.as_slice()[..required]
}

/// [`repack_planar`] for float sample slices
pub fn repack_planar_f32<'a>(channels: &[&[f32]], scratch: &'a mut ScratchBuffer) -> &'a [u8] {
    let frames = channels.first().map_or(0, |c| c.len());
    let mut planes: [&[u8]; MAX_AV_PLANES] = [&[][..]; MAX_AV_PLANES];
    let count = channels.len().min(MAX_AV_PLANES);
    for (plane, channel) in planes.iter_mut().zip(&channels[..count]) {
        *plane = bytemuck::cast_slice(channel);
    }

    repack_planar(&planes[..count], frames * FLOAT_SAMPLE_BYTES, scratch)
}

/// Repack the first `channels` planes of a host frame
///
/// Returns `None` if any of those planes is missing.
///
/// # Safety
/// Each of the first `channels` non-null plane pointers must be valid for
/// reads of `frame.channel_stride()` bytes.
pub unsafe fn repack_audio_data<'a>(
    frame: &AudioData,
    channels: usize,
    scratch: &'a mut ScratchBuffer,
) -> Option<&'a [u8]> {
    let count = channels.min(MAX_AV_PLANES);
    let mut planes: [&[u8]; MAX_AV_PLANES] = [&[][..]; MAX_AV_PLANES];
    for (index, plane) in planes.iter_mut().enumerate().take(count) {
        *plane = frame.channel(index)?;
    }

    Some(repack_planar(&planes[..count], frame.channel_stride(), scratch))
}
