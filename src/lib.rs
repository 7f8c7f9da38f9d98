//! Shape and padding arithmetic for convolutional neural network layers.
//!
//! This crate derives the geometric parameters of sliding-window tensor
//! operations - 2D and 3D convolution and deconvolution - from input shape,
//! kernel, stride, padding, dilation and a convolution mode. It validates
//! that a configuration is consistent with the input shape, derives the
//! implicit padding behind "same"-size outputs, and performs the 4D/2D
//! reshapes (and mask broadcasts) around a compute step.
//!
//! Everything here is a pure function over shape vectors and
//! [`ndarray::ArrayD`] handles: no layer state, no compute kernels, no
//! workspace management. All functions may be called concurrently.

pub mod config;
pub mod error;
pub mod geometry;
pub mod input_type;
pub mod mode;
pub mod reshape;
pub mod shape;

pub use config::ConvolutionConfig;
pub use error::{ConvError, Result};
pub use geometry::{
    effective_kernel_size, get_deconvolution_output_size,
    get_deconvolution_output_size_with_dilation, get_output_size, get_output_size_with_dilation,
    get_same_mode_bottom_right_padding, get_same_mode_top_left_padding, has_dilation,
    validate_cnn_kernel_stride_padding, validate_convolution_mode_padding, validate_shapes,
    UNIT_DILATION,
};
pub use input_type::{get_hwd_from_input_type, InputType};
pub use mode::ConvolutionMode;
pub use reshape::{
    adapt_2d_mask, reshape_2d_to_4d, reshape_3d_mask, reshape_4d_mask, reshape_4d_to_2d,
    reshape_mask_if_required,
};
pub use shape::{get_height_and_width, num_channels};
