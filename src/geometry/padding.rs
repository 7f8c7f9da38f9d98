//! Same-mode padding derivation
//!
//! `Same` mode pads the input so the output size depends only on input size
//! and stride. The total padding per dimension is
//! `(out - 1) * stride + e_kernel - in`; when that quantity is odd the extra
//! cell goes to the bottom/right side, so the two halves are computed
//! separately.

use crate::geometry::kernel::effective_kernel_size;
use crate::{ConvError, Result};

/// Get top and left padding for `Same` mode only.
///
/// `pad[i] = floor(((out[i] - 1) * strides[i] + e_kernel[i] - in[i]) / 2)`;
/// the bottom/right padding is 1 bigger than this when the bracketed term is
/// not divisible by 2.
pub fn get_same_mode_top_left_padding(
    out_size: &[usize],
    in_size: &[usize],
    kernel: &[usize],
    strides: &[usize],
    dilation: &[usize],
) -> Result<[usize; 2]> {
    same_mode_padding(out_size, in_size, kernel, strides, dilation, 0)
}

/// Get bottom and right padding for `Same` mode only.
///
/// As [`get_same_mode_top_left_padding`], with the bracketed term increased by
/// 1 before halving: the top/left padding is 1 smaller than this when the
/// bracketed term is not divisible by 2.
pub fn get_same_mode_bottom_right_padding(
    out_size: &[usize],
    in_size: &[usize],
    kernel: &[usize],
    strides: &[usize],
    dilation: &[usize],
) -> Result<[usize; 2]> {
    same_mode_padding(out_size, in_size, kernel, strides, dilation, 1)
}

fn same_mode_padding(
    out_size: &[usize],
    in_size: &[usize],
    kernel: &[usize],
    strides: &[usize],
    dilation: &[usize],
    bias: i64,
) -> Result<[usize; 2]> {
    for (arg, len) in [
        ("output size", out_size.len()),
        ("input size", in_size.len()),
        ("kernel", kernel.len()),
        ("strides", strides.len()),
        ("dilation", dilation.len()),
    ] {
        if len != 2 {
            return Err(ConvError::invalid_argument(
                "same_mode_padding",
                format!("Expected {arg} with 2 values (height/width), got: {len}"),
            ));
        }
    }

    let e_kernel = effective_kernel_size(kernel, dilation)?;

    let mut out_pad = [0i64; 2];
    for i in 0..2 {
        let bracket = (out_size[i] as i64 - 1) * strides[i] as i64 + e_kernel[i] as i64
            - in_size[i] as i64;
        out_pad[i] = (bracket + bias) / 2;
    }

    if out_pad[0] < 0 || out_pad[1] < 0 {
        return Err(ConvError::invalid_state(format!(
            "Invalid padding values calculated: {out_pad:?} - layer configuration is invalid? \
             Input size {in_size:?}, output size {out_size:?}, kernel {kernel:?}, \
             strides {strides:?}, dilation {dilation:?}"
        )));
    }

    Ok([out_pad[0] as usize, out_pad[1] as usize])
}
