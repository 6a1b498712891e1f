//! Planar 4:4:4 to packed UYVY conversion
//!
//! The network sender has no 4:4:4 input path, so full-chroma frames are
//! squeezed into UYVY (4:2:2). Horizontal chroma is decimated, not averaged:
//! each pixel pair keeps the even-indexed U/V sample and drops the odd one.
//!
//! UYVY byte order per pixel pair: U0 Y0 V0 Y1

use rayon::prelude::*;

/// Signature shared by the row-range converters
///
/// Arguments are the Y/U/V planes, their strides, the row interval
/// `[start_y, end_y)`, the output buffer and the output stride.
pub type UyvyConvFn = fn(
    input: [&[u8]; 3],
    in_linesize: [u32; 3],
    start_y: u32,
    end_y: u32,
    output: &mut [u8],
    out_linesize: u32,
);

/// Luma samples converted per row
///
/// Clipped to the smaller of the Y stride and the output stride, then to what
/// fits in one output row, and rounded down to whole pixel pairs. A trailing
/// odd column is never emitted.
fn effective_width(in_linesize: [u32; 3], out_linesize: u32) -> usize {
    let width = in_linesize[0].min(out_linesize) as usize;
    let width = width
        .min(out_linesize as usize / 2)
        .min(in_linesize[1] as usize)
        .min(in_linesize[2] as usize);
    width & !1
}

#[inline]
fn input_row(plane: &[u8], linesize: u32, y: usize, width: usize) -> &[u8] {
    let start = y * linesize as usize;
    &plane[start..start + width]
}

#[inline]
fn convert_row(y: &[u8], u: &[u8], v: &[u8], out: &mut [u8]) {
    for (pair, px) in out.chunks_exact_mut(4).enumerate() {
        let x = pair * 2;
        px[0] = u[x];
        px[1] = y[x];
        px[2] = v[x];
        px[3] = y[x + 1];
    }
}

/// Convert rows `[start_y, end_y)` of an I444 frame to UYVY
///
/// Output row `y` starts at `y * out_linesize`; bytes past the converted
/// width of each row are left untouched.
pub fn convert_i444_to_uyvy(
    input: [&[u8]; 3],
    in_linesize: [u32; 3],
    start_y: u32,
    end_y: u32,
    output: &mut [u8],
    out_linesize: u32,
) {
    let width = effective_width(in_linesize, out_linesize);
    if width == 0 {
        return;
    }
    let row_bytes = width * 2;

    for y in start_y as usize..end_y as usize {
        let out_start = y * out_linesize as usize;
        convert_row(
            input_row(input[0], in_linesize[0], y, width),
            input_row(input[1], in_linesize[1], y, width),
            input_row(input[2], in_linesize[2], y, width),
            &mut output[out_start..out_start + row_bytes],
        );
    }
}

/// Row-band parallel variant of [`convert_i444_to_uyvy`]
///
/// Rows are distributed over the rayon pool; the result is byte-identical to
/// the sequential converter.
pub fn convert_i444_to_uyvy_par(
    input: [&[u8]; 3],
    in_linesize: [u32; 3],
    start_y: u32,
    end_y: u32,
    output: &mut [u8],
    out_linesize: u32,
) {
    let width = effective_width(in_linesize, out_linesize);
    if width == 0 || end_y <= start_y {
        return;
    }
    let row_bytes = width * 2;

    output
        .par_chunks_mut(out_linesize as usize)
        .enumerate()
        .skip(start_y as usize)
        .take((end_y - start_y) as usize)
        .for_each(|(y, out_row)| {
            convert_row(
                input_row(input[0], in_linesize[0], y, width),
                input_row(input[1], in_linesize[1], y, width),
                input_row(input[2], in_linesize[2], y, width),
                &mut out_row[..row_bytes],
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    const Y: [u8; 8] = [10, 20, 30, 40, 50, 60, 70, 80];
    const U: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
    const V: [u8; 8] = [100, 101, 102, 103, 104, 105, 106, 107];

    #[test]
    fn test_i444_to_uyvy_byte_order() {
        let mut output = vec![0u8; 16];

        convert_i444_to_uyvy([&Y, &U, &V], [4, 4, 4], 0, 2, &mut output, 8);

        assert_eq!(&output[..8], &[1, 10, 100, 20, 3, 30, 102, 40]);
        assert_eq!(&output[8..], &[5, 50, 104, 60, 7, 70, 106, 80]);
    }

    #[test]
    fn test_row_range_only_touches_requested_rows() {
        let mut output = vec![0xAAu8; 16];

        convert_i444_to_uyvy([&Y, &U, &V], [4, 4, 4], 1, 2, &mut output, 8);

        assert!(output[..8].iter().all(|&b| b == 0xAA), "row 0 was written");
        assert_eq!(&output[8..], &[5, 50, 104, 60, 7, 70, 106, 80]);
    }

    #[test]
    fn test_odd_width_drops_last_column() {
        // 3 wide, 1 tall
        let y = [10u8, 20, 30];
        let u = [1u8, 2, 3];
        let v = [100u8, 101, 102];
        let mut output = vec![0xEEu8; 6];

        convert_i444_to_uyvy([&y, &u, &v], [3, 3, 3], 0, 1, &mut output, 6);

        assert_eq!(&output[..4], &[1, 10, 100, 20]);
        assert_eq!(&output[4..], &[0xEE, 0xEE], "partial pair must not be written");
    }

    #[test]
    fn test_width_clipped_to_output_stride() {
        // Input rows are wider than the output can hold
        let width = 8usize;
        let height = 3usize;
        let y: Vec<u8> = (0..width * height).map(|i| i as u8).collect();
        let u = vec![1u8; width * height];
        let v = vec![2u8; width * height];
        let out_linesize = 6u32;
        let mut output = vec![0xEEu8; out_linesize as usize * height + 8];

        convert_i444_to_uyvy(
            [&y, &u, &v],
            [width as u32; 3],
            0,
            height as u32,
            &mut output,
            out_linesize,
        );

        // Only one pair (4 bytes) fits in a 6-byte row
        for row in 0..height {
            let out = &output[row * 6..row * 6 + 6];
            let base = (row * width) as u8;
            assert_eq!(&out[..4], &[1, base, 2, base + 1]);
            assert_eq!(&out[4..], &[0xEE, 0xEE]);
        }
        assert!(
            output[out_linesize as usize * height..]
                .iter()
                .all(|&b| b == 0xEE),
            "wrote past out_linesize * height"
        );
    }

    #[test]
    fn test_padded_input_stride() {
        // Y stride padded beyond the visible width
        let y = [10u8, 20, 0, 0, 30, 40, 0, 0];
        let u = [1u8, 2, 0, 0, 3, 4, 0, 0];
        let v = [5u8, 6, 0, 0, 7, 8, 0, 0];
        let mut output = vec![0u8; 8];

        convert_i444_to_uyvy([&y, &u, &v], [4, 4, 4], 0, 2, &mut output, 4);

        assert_eq!(output, vec![1, 10, 5, 20, 3, 30, 7, 40]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let width = 64usize;
        let height = 37usize;
        let mut planes = vec![vec![0u8; width * height]; 3];
        for (p, plane) in planes.iter_mut().enumerate() {
            for (i, byte) in plane.iter_mut().enumerate() {
                *byte = ((i * 7 + p * 13) % 256) as u8;
            }
        }
        let out_linesize = (width * 2) as u32;
        let mut sequential = vec![0u8; height * out_linesize as usize * 2];
        let mut parallel = sequential.clone();

        let input = [&planes[0][..], &planes[1][..], &planes[2][..]];
        convert_i444_to_uyvy(input, [width as u32; 3], 0, height as u32, &mut sequential, out_linesize);
        convert_i444_to_uyvy_par(input, [width as u32; 3], 0, height as u32, &mut parallel, out_linesize);

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_empty_range_is_noop() {
        let mut output = vec![0xAAu8; 16];
        convert_i444_to_uyvy_par([&Y, &U, &V], [4, 4, 4], 2, 2, &mut output, 8);
        convert_i444_to_uyvy([&Y, &U, &V], [4, 4, 4], 2, 2, &mut output, 8);
        assert!(output.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_conv_fn_pointer() {
        let conv: UyvyConvFn = convert_i444_to_uyvy;
        let mut output = vec![0u8; 16];
        conv([&Y, &U, &V], [4, 4, 4], 0, 2, &mut output, 8);
        assert_eq!(output[0], 1);
        assert_eq!(output[15], 80);
    }
}
