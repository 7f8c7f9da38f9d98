#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Convolution mode, controlling how output spatial sizes are derived.
///
/// * `Same` - output size depends only on input size and stride; the padding
///   needed to make this possible is computed internally and applied as
///   symmetrically as the arithmetic allows.
/// * `Strict` - the standard output-size formula must yield an exact integer;
///   any fractional remainder is a configuration error.
/// * `Truncate` - the standard formula with floor division; a fractional
///   remainder is silently discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ConvolutionMode {
    Same,
    Strict,
    Truncate,
}

impl Default for ConvolutionMode {
    fn default() -> Self {
        ConvolutionMode::Truncate
    }
}

impl std::fmt::Display for ConvolutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConvolutionMode::Same => "Same",
            ConvolutionMode::Strict => "Strict",
            ConvolutionMode::Truncate => "Truncate",
        };
        write!(f, "{name}")
    }
}
