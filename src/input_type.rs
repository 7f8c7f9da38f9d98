//! Layer input type descriptors
//!
//! A layer's expected input is described by a small tagged union rather than a
//! full tensor: feed-forward and recurrent inputs carry flat sizes, while the
//! two convolutional variants carry spatial extents. Only the convolutional
//! variants can answer a height/width/depth query.

use crate::{ConvError, Result};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Description of the input a layer expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum InputType {
    /// Flat activations of the given size
    FeedForward { size: usize },
    /// Time series with the given feature size and sequence length
    Recurrent { size: usize, timesteps: usize },
    /// Channel-first image data: (batch, channels, height, width)
    Convolutional {
        height: usize,
        width: usize,
        channels: usize,
    },
    /// Image data flattened to 2D row vectors, one image per row
    ConvolutionalFlat {
        height: usize,
        width: usize,
        depth: usize,
    },
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputType::FeedForward { size } => write!(f, "FeedForward(size={size})"),
            InputType::Recurrent { size, timesteps } => {
                write!(f, "Recurrent(size={size}, timesteps={timesteps})")
            }
            InputType::Convolutional {
                height,
                width,
                channels,
            } => write!(f, "Convolutional(height={height}, width={width}, channels={channels})"),
            InputType::ConvolutionalFlat {
                height,
                width,
                depth,
            } => write!(f, "ConvolutionalFlat(height={height}, width={width}, depth={depth})"),
        }
    }
}

/// Get height/width/depth as a length-3 array from the input type.
///
/// Only the convolutional variants carry spatial extents; any other variant
/// fails with an invalid-state error.
pub fn get_hwd_from_input_type(input_type: &InputType) -> Result<[usize; 3]> {
    match input_type {
        InputType::Convolutional {
            height,
            width,
            channels,
        } => Ok([*height, *width, *channels]),
        InputType::ConvolutionalFlat {
            height,
            width,
            depth,
        } => Ok([*height, *width, *depth]),
        other => Err(ConvError::invalid_state(format!(
            "Invalid input type: expected Convolutional or ConvolutionalFlat. Got: {other}"
        ))),
    }
}
