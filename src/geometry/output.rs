//! Forward and deconvolution output-size calculators
//!
//! Input shapes are full channel-first tensor shapes (batch, channels, height,
//! width); only the two spatial dimensions are covered here, so all results
//! are (height, width) pairs.

use crate::geometry::kernel::{effective_kernel_size, has_dilation, UNIT_DILATION};
use crate::geometry::validate::validate_shapes;
use crate::{ConvError, ConvolutionMode, Result};

/// Get the output size (height/width) for the given input shape and CNN
/// configuration, with no kernel dilation.
pub fn get_output_size(
    input_shape: &[usize],
    kernel: &[usize],
    strides: &[usize],
    padding: &[usize],
    mode: ConvolutionMode,
) -> Result<[usize; 2]> {
    get_output_size_with_dilation(input_shape, kernel, strides, padding, mode, &UNIT_DILATION)
}

/// Get the output size (height/width) for the given input shape and CNN
/// configuration.
///
/// The kernel is first expanded by the dilation, and the resulting effective
/// kernel is validated against the padded input. In `Same` mode the output is
/// `ceil(in / stride)` per dimension; otherwise it is
/// `(in - e_kernel + 2 * padding) / stride + 1` with integer division, which
/// in `Strict` mode is exact by validation.
pub fn get_output_size_with_dilation(
    input_shape: &[usize],
    kernel: &[usize],
    strides: &[usize],
    padding: &[usize],
    mode: ConvolutionMode,
    dilation: &[usize],
) -> Result<[usize; 2]> {
    let spatial_in = spatial_from_input(input_shape, "get_output_size")?;
    check_rank_2("get_output_size", kernel, strides, padding, dilation)?;

    let e_kernel = effective_kernel_size(kernel, dilation)?;
    let dilated = has_dilation(dilation);

    validate_shapes(
        input_shape,
        &e_kernel,
        strides,
        padding,
        mode,
        dilation,
        &spatial_in,
        dilated,
    )?;

    if mode == ConvolutionMode::Same {
        let out_h = (spatial_in[0] + strides[0] - 1) / strides[0];
        let out_w = (spatial_in[1] + strides[1] - 1) / strides[1];
        return Ok([out_h, out_w]);
    }

    let out_h = (spatial_in[0] + 2 * padding[0] - e_kernel[0]) / strides[0] + 1;
    let out_w = (spatial_in[1] + 2 * padding[1] - e_kernel[1]) / strides[1] + 1;

    Ok([out_h, out_w])
}

/// Get the output size of a deconvolution (transposed convolution) for the
/// given input shape, with no kernel dilation.
pub fn get_deconvolution_output_size(
    input_shape: &[usize],
    kernel: &[usize],
    strides: &[usize],
    padding: &[usize],
    mode: ConvolutionMode,
) -> Result<[usize; 2]> {
    get_deconvolution_output_size_with_dilation(
        input_shape,
        kernel,
        strides,
        padding,
        mode,
        &UNIT_DILATION,
    )
}

/// Get the output size of a deconvolution (transposed convolution) for the
/// given input shape. In deconvolution we compute the inverse of the shape
/// computation of a convolution.
///
/// In `Same` mode the output is `stride * in` per dimension; otherwise it is
/// `stride * (in - 1) + e_kernel - 2 * padding`. Note that the raw,
/// non-dilated kernel is what gets validated against the padded input here.
pub fn get_deconvolution_output_size_with_dilation(
    input_shape: &[usize],
    kernel: &[usize],
    strides: &[usize],
    padding: &[usize],
    mode: ConvolutionMode,
    dilation: &[usize],
) -> Result<[usize; 2]> {
    let spatial_in = spatial_from_input(input_shape, "get_deconvolution_output_size")?;
    check_rank_2(
        "get_deconvolution_output_size",
        kernel,
        strides,
        padding,
        dilation,
    )?;

    let e_kernel = effective_kernel_size(kernel, dilation)?;
    let dilated = has_dilation(dilation);

    validate_shapes(
        input_shape,
        kernel,
        strides,
        padding,
        mode,
        dilation,
        &spatial_in,
        dilated,
    )?;

    if mode == ConvolutionMode::Same {
        return Ok([strides[0] * spatial_in[0], strides[1] * spatial_in[1]]);
    }

    let mut out = [0usize; 2];
    for i in 0..2 {
        let size = strides[i] as i64 * (spatial_in[i] as i64 - 1) + e_kernel[i] as i64
            - 2 * padding[i] as i64;
        if size < 0 {
            return Err(ConvError::invalid_state(format!(
                "Invalid deconvolution output size calculated: {size} - layer configuration is \
                 invalid? Input size {spatial_in:?}, kernel {kernel:?}, strides {strides:?}, \
                 padding {padding:?}, dilation {dilation:?}"
            )));
        }
        out[i] = size as usize;
    }

    Ok(out)
}

fn spatial_from_input(input_shape: &[usize], operation: &str) -> Result<[usize; 2]> {
    if input_shape.len() != 4 {
        return Err(ConvError::invalid_argument(
            operation,
            format!(
                "Expected input of rank 4 ([numExamples, inputDepth, inputHeight, inputWidth]), \
                 got rank {} with shape {input_shape:?}",
                input_shape.len()
            ),
        ));
    }
    Ok([input_shape[2], input_shape[3]])
}

fn check_rank_2(
    operation: &str,
    kernel: &[usize],
    strides: &[usize],
    padding: &[usize],
    dilation: &[usize],
) -> Result<()> {
    for (arg, len) in [
        ("kernel", kernel.len()),
        ("strides", strides.len()),
        ("padding", padding.len()),
        ("dilation", dilation.len()),
    ] {
        if len != 2 {
            return Err(ConvError::invalid_argument(
                operation,
                format!("Expected {arg} with 2 values (height/width), got: {len}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_mode_floors_the_output_size() {
        // (7 - 2 + 0)/2 + 1 = floor(2.5) + 1 = 3
        let out = get_output_size(
            &[1, 1, 7, 7],
            &[2, 2],
            &[2, 2],
            &[0, 0],
            ConvolutionMode::Truncate,
        )
        .unwrap();
        assert_eq!(out, [3, 3]);
    }

    #[test]
    fn strict_mode_fails_on_the_same_configuration() {
        let err = get_output_size(
            &[1, 1, 7, 7],
            &[2, 2],
            &[2, 2],
            &[0, 0],
            ConvolutionMode::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, crate::ConvError::InvalidConfig { .. }));
    }

    #[test]
    fn strict_mode_matches_the_closed_formula_when_exact() {
        // (28 - 3 + 2)/1 + 1 = 28
        let out = get_output_size(
            &[4, 3, 28, 28],
            &[3, 3],
            &[1, 1],
            &[1, 1],
            ConvolutionMode::Strict,
        )
        .unwrap();
        assert_eq!(out, [28, 28]);
    }

    #[test]
    fn same_mode_is_ceil_of_input_over_stride() {
        let out = get_output_size(
            &[1, 3, 7, 9],
            &[3, 3],
            &[2, 2],
            &[0, 0],
            ConvolutionMode::Same,
        )
        .unwrap();
        assert_eq!(out, [4, 5]);
    }

    #[test]
    fn dilation_shrinks_the_output() {
        // effective kernel 5x5: (7 - 5 + 0)/1 + 1 = 3
        let out = get_output_size_with_dilation(
            &[1, 1, 7, 7],
            &[3, 3],
            &[1, 1],
            &[0, 0],
            ConvolutionMode::Truncate,
            &[2, 2],
        )
        .unwrap();
        assert_eq!(out, [3, 3]);
    }

    #[test]
    fn rejects_non_4d_input() {
        let err = get_output_size(
            &[1, 7, 7],
            &[2, 2],
            &[1, 1],
            &[0, 0],
            ConvolutionMode::Truncate,
        )
        .unwrap_err();
        assert!(matches!(err, crate::ConvError::InvalidArgument { .. }));
    }

    #[test]
    fn deconvolution_inverts_the_forward_size() {
        let out = get_deconvolution_output_size(
            &[1, 1, 3, 3],
            &[2, 2],
            &[2, 2],
            &[0, 0],
            ConvolutionMode::Truncate,
        )
        .unwrap();
        assert_eq!(out, [6, 6]);

        // and forward on that size recovers the deconvolution input
        let forward = get_output_size(
            &[1, 1, 6, 6],
            &[2, 2],
            &[2, 2],
            &[0, 0],
            ConvolutionMode::Truncate,
        )
        .unwrap();
        assert_eq!(forward, [3, 3]);
    }

    #[test]
    fn deconvolution_same_mode_scales_by_stride() {
        let out = get_deconvolution_output_size(
            &[1, 1, 5, 4],
            &[3, 3],
            &[2, 3],
            &[0, 0],
            ConvolutionMode::Same,
        )
        .unwrap();
        assert_eq!(out, [10, 12]);
    }

    #[test]
    fn deconvolution_rejects_negative_output() {
        // stride*(1-1) + 1 - 2*1 = -1
        let err = get_deconvolution_output_size(
            &[1, 1, 1, 1],
            &[1, 1],
            &[1, 1],
            &[1, 1],
            ConvolutionMode::Truncate,
        )
        .unwrap_err();
        assert!(matches!(err, crate::ConvError::InvalidState { .. }));
    }
}
