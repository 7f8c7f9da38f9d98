//! Shape vector accessors for channel-first tensors

use crate::{ConvError, Result};

/// Get the height and width from a shape vector.
///
/// Reads the last two dimensions in reverse: `result[0]` is the last element
/// and `result[1]` the second-to-last. Callers rely on this order.
pub fn get_height_and_width(shape: &[usize]) -> Result<[usize; 2]> {
    if shape.len() < 2 {
        return Err(ConvError::invalid_argument(
            "get_height_and_width",
            "No width and height able to be found: array must be at least length 2",
        ));
    }
    Ok([shape[shape.len() - 1], shape[shape.len() - 2]])
}

/// Number of channels for a given shape, assuming channel-first layout.
/// Shapes with fewer than 4 dimensions are treated as single-channel.
pub fn num_channels(shape: &[usize]) -> usize {
    if shape.len() < 4 {
        return 1;
    }
    shape[1]
}
