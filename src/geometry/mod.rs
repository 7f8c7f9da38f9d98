//! Convolution geometry: effective kernel sizing, configuration validation,
//! output-size derivation and same-mode padding.

pub mod kernel;
pub mod output;
pub mod padding;
pub mod validate;

pub use kernel::{effective_kernel_size, has_dilation, UNIT_DILATION};
pub use output::{
    get_deconvolution_output_size, get_deconvolution_output_size_with_dilation, get_output_size,
    get_output_size_with_dilation,
};
pub use padding::{get_same_mode_bottom_right_padding, get_same_mode_top_left_padding};
pub use validate::{
    validate_cnn_kernel_stride_padding, validate_convolution_mode_padding, validate_shapes,
};
