//! Plain-data convolution layer configuration
//!
//! Bundles the hyperparameters a 2D convolution layer is built from, with the
//! aggregate validation a layer constructor runs before accepting them.

use crate::geometry::{
    effective_kernel_size, get_output_size_with_dilation, validate_cnn_kernel_stride_padding,
    validate_convolution_mode_padding, UNIT_DILATION,
};
use crate::{ConvolutionMode, Result};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Hyperparameters of a 2D convolution layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ConvolutionConfig {
    pub kernel_size: [usize; 2],
    pub stride: [usize; 2],
    pub padding: [usize; 2],
    pub dilation: [usize; 2],
    pub mode: ConvolutionMode,
    /// Number of filters (output feature maps) the layer applies
    pub filters: usize,
}

impl ConvolutionConfig {
    /// Create a configuration with the given kernel size and filter count.
    /// Stride defaults to (1, 1), padding to (0, 0), dilation to (1, 1) and
    /// the mode to [`ConvolutionMode::Truncate`] when not given.
    pub fn new(
        kernel_size: [usize; 2],
        filters: usize,
        stride: Option<[usize; 2]>,
        padding: Option<[usize; 2]>,
        dilation: Option<[usize; 2]>,
        mode: Option<ConvolutionMode>,
    ) -> Self {
        Self {
            kernel_size,
            stride: stride.unwrap_or([1, 1]),
            padding: padding.unwrap_or([0, 0]),
            dilation: dilation.unwrap_or(UNIT_DILATION),
            mode: mode.unwrap_or_default(),
            filters,
        }
    }

    /// The kernel's height and width, last two dims reversed, in the same
    /// order as [`crate::get_height_and_width`].
    pub fn height_and_width(&self) -> [usize; 2] {
        [self.kernel_size[1], self.kernel_size[0]]
    }

    /// The number of filters (feature maps) this layer applies
    pub fn num_filters(&self) -> usize {
        self.filters
    }

    /// The dilation-adjusted kernel size
    pub fn effective_kernel(&self) -> Result<Vec<usize>> {
        effective_kernel_size(&self.kernel_size, &self.dilation)
    }

    /// Run the sanity checks a layer constructor runs: kernel and stride must
    /// be strictly positive, and explicit padding is incompatible with
    /// `Same` mode.
    pub fn validate(&self) -> Result<()> {
        validate_cnn_kernel_stride_padding(&self.kernel_size, &self.stride, &self.padding)?;
        validate_convolution_mode_padding(self.mode, &self.padding)
    }

    /// Output height/width this configuration produces for the given
    /// channel-first input shape
    pub fn output_size(&self, input_shape: &[usize]) -> Result<[usize; 2]> {
        get_output_size_with_dilation(
            input_shape,
            &self.kernel_size,
            &self.stride,
            &self.padding,
            self.mode,
            &self.dilation,
        )
    }
}
