//! Validation of convolution geometry
//!
//! Checks that kernel, stride, padding and mode are mutually consistent with
//! an input's spatial extent before any output size is derived. Failures carry
//! complete diagnostic text: the caller is expected to surface the message
//! verbatim rather than map it to a code.

use crate::{ConvError, ConvolutionMode, Result};

const DIM_NAMES: [&str; 3] = ["height", "width", "channels"];

/// Validate kernel/stride/padding/mode against an input's spatial extent.
///
/// `e_kernel` is the (possibly dilation-adjusted) kernel to check, of rank 2
/// or 3; `spatial_in` holds the matching per-dimension input sizes.
/// `input_shape` is the full tensor shape and is used for diagnostics only.
/// `dilated` reports whether dilation is in effect, which controls the
/// "effective kernel" wording in error messages.
///
/// Two families of checks run per spatial dimension:
/// 1. unless the mode is `Same`, the kernel must fit the padded input:
///    `0 < e_kernel[i] <= spatial_in[i] + 2 * padding[i]`;
/// 2. in `Strict` mode, `(spatial_in[i] - e_kernel[i] + 2 * padding[i])` must
///    be divisible by `strides[i]`, so the output size is an exact integer.
#[allow(clippy::too_many_arguments)]
pub fn validate_shapes(
    input_shape: &[usize],
    e_kernel: &[usize],
    strides: &[usize],
    padding: &[usize],
    mode: ConvolutionMode,
    dilation: &[usize],
    spatial_in: &[usize],
    dilated: bool,
) -> Result<()> {
    let rank = e_kernel.len();
    if rank != 2 && rank != 3 {
        return Err(ConvError::invalid_argument(
            "validate_shapes",
            format!("Kernel size has to be either two or three, got: {rank}"),
        ));
    }
    for (arg, len) in [
        ("strides", strides.len()),
        ("padding", padding.len()),
        ("dilation", dilation.len()),
        ("input spatial sizes", spatial_in.len()),
    ] {
        if len != rank {
            return Err(ConvError::invalid_argument(
                "validate_shapes",
                format!("Expected {arg} of rank {rank} to match the kernel, got: {len}"),
            ));
        }
    }
    if strides.iter().any(|&s| s == 0) {
        return Err(ConvError::invalid_argument(
            "validate_shapes",
            format!("Stride values must be positive (> 0) for all dimensions. Got: {strides:?}"),
        ));
    }

    if mode != ConvolutionMode::Same {
        for i in 0..rank {
            if e_kernel[i] == 0 || e_kernel[i] > spatial_in[i] + 2 * padding[i] {
                return Err(ConvError::invalid_input(kernel_bound_message(
                    i,
                    input_shape,
                    e_kernel,
                    strides,
                    padding,
                    dilation,
                    spatial_in,
                    dilated,
                )));
            }
        }
    }

    if mode == ConvolutionMode::Strict {
        for i in 0..2 {
            if (spatial_in[i] + 2 * padding[i] - e_kernel[i]) % strides[i] != 0 {
                return Err(ConvError::invalid_config(strict_remainder_message(
                    i,
                    input_shape,
                    e_kernel,
                    strides,
                    padding,
                    dilation,
                    spatial_in,
                    dilated,
                )));
            }
        }
        if rank == 3 && (spatial_in[2] + 2 * padding[2] - e_kernel[2]) % strides[2] != 0 {
            return Err(ConvError::invalid_config(strict_channel_remainder_message(
                input_shape,
                e_kernel,
                strides,
                padding,
                dilation,
                spatial_in,
                dilated,
            )));
        }
    }

    Ok(())
}

/// Check that the convolution mode is consistent with the padding
/// specification. `Same` mode derives its own implicit padding, so supplying
/// explicit nonzero padding alongside it is a configuration error.
pub fn validate_convolution_mode_padding(mode: ConvolutionMode, padding: &[usize]) -> Result<()> {
    if mode == ConvolutionMode::Same && padding.iter().any(|&p| p != 0) {
        return Err(ConvError::invalid_argument(
            "validate_convolution_mode_padding",
            format!(
                "Padding cannot be used when using the `same' convolution mode. Got padding: {padding:?}"
            ),
        ));
    }
    Ok(())
}

/// Sanity-check a CNN layer's kernel/stride/padding configuration.
///
/// Each argument must hold exactly 2 values; kernel size and stride must be
/// strictly positive in both dimensions.
pub fn validate_cnn_kernel_stride_padding(
    kernel_size: &[usize],
    stride: &[usize],
    padding: &[usize],
) -> Result<()> {
    if kernel_size.len() != 2 {
        return Err(ConvError::invalid_state(format!(
            "Invalid kernel size: expected 2 values, got {kernel_size:?}"
        )));
    }

    if stride.len() != 2 {
        return Err(ConvError::invalid_state(format!(
            "Invalid stride configuration: expected 2 values, got {stride:?}"
        )));
    }

    if padding.len() != 2 {
        return Err(ConvError::invalid_state(format!(
            "Invalid padding configuration: expected 2 values, got {padding:?}"
        )));
    }

    if kernel_size[0] == 0 || kernel_size[1] == 0 {
        return Err(ConvError::invalid_state(format!(
            "Invalid kernel size: values must be positive (> 0) for all dimensions. Got: {kernel_size:?}"
        )));
    }

    if stride[0] == 0 || stride[1] == 0 {
        return Err(ConvError::invalid_state(format!(
            "Invalid stride configuration: values must be positive (> 0) for all dimensions. Got: {stride:?}"
        )));
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn kernel_bound_message(
    dim: usize,
    input_shape: &[usize],
    e_kernel: &[usize],
    strides: &[usize],
    padding: &[usize],
    dilation: &[usize],
    spatial_in: &[usize],
    dilated: bool,
) -> String {
    let name = DIM_NAMES[dim];
    let eff = if dilated { "effective " } else { "" };
    let bound = spatial_in[dim] + 2 * padding[dim];
    format!(
        "Invalid input data or configuration: {eff}kernel {name} and input {name} must satisfy \
         0 < {eff}kernel {name} <= input {name} + 2 * padding {name}. \nGot {eff}kernel {name} = {ek}, \
         input {name} = {inp} and padding {name} = {pad} which do not satisfy 0 < {ek} <= {bound}{context}",
        ek = e_kernel[dim],
        inp = spatial_in[dim],
        pad = padding[dim],
        context = common_context(input_shape, e_kernel, strides, padding, dilation, dilated),
    )
}

#[allow(clippy::too_many_arguments)]
fn strict_remainder_message(
    dim: usize,
    input_shape: &[usize],
    e_kernel: &[usize],
    strides: &[usize],
    padding: &[usize],
    dilation: &[usize],
    spatial_in: &[usize],
    dilated: bool,
) -> String {
    let name = DIM_NAMES[dim];
    let inp = spatial_in[dim];
    let stride = strides[dim];
    let d = (inp + 2 * padding[dim] - e_kernel[dim]) as f64 / stride as f64 + 1.0;
    let truncated = d as i64;
    let same_size = (inp + stride - 1) / stride;
    format!(
        "Invalid input data or configuration: Combination of kernel size, stride and padding are \
         not valid for given input {name}, using ConvolutionMode::Strict\n\
         ConvolutionMode::Strict requires: output {name} = (input {name} - kernelSize + 2*padding)/stride + 1 \
         to be an integer. Got: ({inp} - {ek} + 2*{pad})/{stride} + 1 = {d:.2}\n\
         See \"Constraints on strides\" at https://cs231n.github.io/convolutional-networks/\n\
         To truncate/crop the input, such that output {name} = floor({d:.2}) = {truncated}, \
         use ConvolutionMode::Truncate.\n\
         Alternatively use ConvolutionMode::Same, which will use padding to give an output {name} \
         of ceil({inp}/{stride}) = {same_size}{context}",
        ek = e_kernel[dim],
        pad = padding[dim],
        context = common_context(input_shape, e_kernel, strides, padding, dilation, dilated),
    )
}

// Channel-dimension variant of the message above. The wording and hint labels
// stay in terms of width; the checked arithmetic uses the channel stride
// throughout.
fn strict_channel_remainder_message(
    input_shape: &[usize],
    e_kernel: &[usize],
    strides: &[usize],
    padding: &[usize],
    dilation: &[usize],
    spatial_in: &[usize],
    dilated: bool,
) -> String {
    let inp = spatial_in[2];
    let d = (inp + 2 * padding[2] - e_kernel[2]) as f64 / strides[2] as f64 + 1.0;
    let truncated = d as i64;
    let same_size = (inp + strides[2] - 1) / strides[2];
    format!(
        "Invalid input data or configuration: Combination of kernel size, stride and padding are \
         not valid for given input width, using ConvolutionMode::Strict\n\
         ConvolutionMode::Strict requires: output channels = (input - kernelSize + 2*padding)/stride + 1 \
         to be an integer. Got: ({inp} - {ek} + 2*{pad})/{stride_text} + 1 = {d:.2}\n\
         See \"Constraints on strides\" at https://cs231n.github.io/convolutional-networks/\n\
         To truncate/crop the input, such that output width = floor({d:.2}) = {truncated}, \
         use ConvolutionMode::Truncate.\n\
         Alternatively use ConvolutionMode::Same, which will use padding to give an output width \
         of ceil({in_w}/{stride}) = {same_size}{context}",
        ek = e_kernel[2],
        pad = padding[2],
        stride_text = strides[1],
        in_w = spatial_in[1],
        stride = strides[2],
        context = common_context(input_shape, e_kernel, strides, padding, dilation, dilated),
    )
}

fn common_context(
    input_shape: &[usize],
    e_kernel: &[usize],
    strides: &[usize],
    padding: &[usize],
    dilation: &[usize],
    dilated: bool,
) -> String {
    let mut s = format!(
        "\nInput size: [numExamples, inputDepth, inputHeight, inputWidth] = {input_shape:?}, \
         kernel = {e_kernel:?}"
    );
    if dilated {
        s.push_str(" (effective kernel, given dilation)");
    }
    s.push_str(&format!(
        ", strides = {strides:?}, padding = {padding:?}, dilation = {dilation:?}"
    ));
    s
}
