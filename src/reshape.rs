//! Reshapes between channel-first 4D activations and the flattened 2D layout
//! consumed by matrix compute and loss functions, plus the matching mask
//! adapters.
//!
//! All functions take their array by value and reuse the input allocation
//! whenever the requested view is already contiguous in row-major order; a
//! fresh allocation is made only when re-materialization is required. The
//! returned array therefore may or may not share storage with the input, and
//! never does after a copy.

use crate::{ConvError, Result};
use ndarray::{ArrayD, Axis, IxDyn};
use num_traits::Zero;

/// Reshape channel-first activations from `[n, c, h, w]` to `[n*h*w, c]`.
///
/// The array is permuted to `[n, h, w, c]` and the leading three axes are
/// collapsed. When the permuted view is not contiguous in row-major order the
/// data is copied into a fresh contiguous buffer first; otherwise the input
/// allocation is reused.
pub fn reshape_4d_to_2d<T>(input: ArrayD<T>) -> Result<ArrayD<T>>
where
    T: Clone,
{
    if input.ndim() != 4 {
        return Err(ConvError::invalid_argument(
            "reshape_4d_to_2d",
            format!(
                "Invalid input: expect array with rank 4, got rank {} with shape {:?}",
                input.ndim(),
                input.shape()
            ),
        ));
    }
    let shape = input.shape().to_vec();

    let permuted = input.permuted_axes(IxDyn(&[0, 2, 3, 1]));
    let contiguous = if permuted.is_standard_layout() {
        permuted
    } else {
        permuted.as_standard_layout().into_owned()
    };

    contiguous
        .into_shape_with_order(IxDyn(&[shape[0] * shape[2] * shape[3], shape[1]]))
        .map_err(|e| ConvError::invalid_argument("reshape_4d_to_2d", format!("Reshape failed: {e}")))
}

/// Reshape flattened activations of shape `[n*h*w, c]` back to the
/// channel-first 4D layout described by `to_shape = [n, c, h, w]`.
///
/// The rows are first unflattened to `[n, h, w, c]` and the channel axis is
/// then permuted back to position 1. The permute is a metadata operation, so
/// the result is generally not in standard layout.
pub fn reshape_2d_to_4d<T>(in2d: ArrayD<T>, to_shape: &[usize]) -> Result<ArrayD<T>>
where
    T: Clone,
{
    if in2d.ndim() != 2 {
        return Err(ConvError::invalid_argument(
            "reshape_2d_to_4d",
            format!("Invalid input: expect array with rank 2, got rank {}", in2d.ndim()),
        ));
    }
    if to_shape.len() != 4 {
        return Err(ConvError::invalid_argument(
            "reshape_2d_to_4d",
            format!("Invalid input: expect to_shape with 4 elements: got {to_shape:?}"),
        ));
    }
    let expected: usize = to_shape.iter().product();
    if in2d.len() != expected {
        return Err(ConvError::invalid_argument(
            "reshape_2d_to_4d",
            format!(
                "Cannot reshape array of {} elements to shape {to_shape:?} ({expected} elements)",
                in2d.len()
            ),
        ));
    }

    let contiguous = if in2d.is_standard_layout() {
        in2d
    } else {
        in2d.as_standard_layout().into_owned()
    };

    let nhwc = contiguous
        .into_shape_with_order(IxDyn(&[to_shape[0], to_shape[2], to_shape[3], to_shape[1]]))
        .map_err(|e| {
            ConvError::invalid_argument("reshape_2d_to_4d", format!("Reshape failed: {e}"))
        })?;

    Ok(nhwc.permuted_axes(IxDyn(&[0, 3, 1, 2])))
}

/// Reshape a mask to match activations flattened by [`reshape_4d_to_2d`],
/// dispatching on the mask's rank.
///
/// * absent mask - passed through
/// * rank 2, `[n, 1]` - per-example mask, broadcast over the output's spatial
///   extent and flattened to `[n*h*w, 1]`
/// * rank 3, `[n, h, w]` - per-position mask, flattened to `[n*h*w, 1]`
/// * anything else - flattened through the activation path, which accepts
///   rank 4 only
pub fn reshape_mask_if_required<T>(
    mask: Option<ArrayD<T>>,
    output: &ArrayD<T>,
) -> Result<Option<ArrayD<T>>>
where
    T: Clone + Zero,
{
    let mask = match mask {
        None => return Ok(None),
        Some(mask) => mask,
    };

    let reshaped = match mask.ndim() {
        2 => adapt_2d_mask(&mask, output)?,
        3 => reshape_3d_mask(mask)?,
        _ => reshape_4d_to_2d(mask)?,
    };
    Ok(Some(reshaped))
}

/// Broadcast a per-example mask of shape `[n, 1]` over the spatial extent of
/// a channel-first output, then flatten it to `[n*h*w, 1]`.
///
/// The mask is broadcast-copied into an `[n, 1, h, w]` buffer, the singleton
/// channel axis is moved to the end, and the result is flattened the same way
/// as the activations. Always allocates.
pub fn adapt_2d_mask<T>(mask: &ArrayD<T>, output: &ArrayD<T>) -> Result<ArrayD<T>>
where
    T: Clone + Zero,
{
    if mask.ndim() != 2 {
        return Err(ConvError::invalid_argument(
            "adapt_2d_mask",
            format!("Invalid mask: expect array with rank 2, got rank {}", mask.ndim()),
        ));
    }
    if output.ndim() != 4 {
        return Err(ConvError::invalid_argument(
            "adapt_2d_mask",
            format!(
                "Invalid output: expect array with rank 4, got rank {} with shape {:?}",
                output.ndim(),
                output.shape()
            ),
        ));
    }
    let s = output.shape().to_vec();
    if mask.shape()[0] != s[0] || mask.shape()[1] != 1 {
        return Err(ConvError::invalid_argument(
            "adapt_2d_mask",
            format!(
                "Invalid mask: expect shape [{}, 1] for output shape {s:?}, got {:?}",
                s[0],
                mask.shape()
            ),
        ));
    }

    let mut b_mask = ArrayD::<T>::zeros(IxDyn(&[s[0], 1, s[2], s[3]]));
    b_mask.assign(&mask.view().insert_axis(Axis(2)).insert_axis(Axis(3)));

    let permuted = b_mask
        .permuted_axes(IxDyn(&[0, 2, 3, 1]))
        .as_standard_layout()
        .into_owned();

    permuted
        .into_shape_with_order(IxDyn(&[s[0] * s[2] * s[3], 1]))
        .map_err(|e| ConvError::invalid_argument("adapt_2d_mask", format!("Reshape failed: {e}")))
}

/// Flatten a per-position mask of shape `[n, h, w]` to `[n*h*w, 1]`; the
/// single column is implicitly broadcast across channels by the consumer.
pub fn reshape_3d_mask<T>(mask: ArrayD<T>) -> Result<ArrayD<T>>
where
    T: Clone,
{
    if mask.ndim() != 3 {
        return Err(ConvError::invalid_argument(
            "reshape_3d_mask",
            format!("Invalid mask: expect array with rank 3, got rank {}", mask.ndim()),
        ));
    }
    let len = mask.len();

    let contiguous = if mask.is_standard_layout() {
        mask
    } else {
        mask.as_standard_layout().into_owned()
    };

    contiguous
        .into_shape_with_order(IxDyn(&[len, 1]))
        .map_err(|e| ConvError::invalid_argument("reshape_3d_mask", format!("Reshape failed: {e}")))
}

/// Flatten a rank-4 mask through the same path as the activations.
pub fn reshape_4d_mask<T>(mask: ArrayD<T>) -> Result<ArrayD<T>>
where
    T: Clone,
{
    reshape_4d_to_2d(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    fn iota(shape: &[usize]) -> ArrayD<f32> {
        let len: usize = shape.iter().product();
        ArrayD::from_shape_vec(IxDyn(shape), (0..len).map(|v| v as f32).collect()).unwrap()
    }

    #[test]
    fn activations_flatten_to_rows_by_position() {
        let input = iota(&[2, 3, 4, 5]);
        let out = reshape_4d_to_2d(input.clone()).unwrap();
        assert_eq!(out.shape(), &[40, 3]);

        // row index enumerates (n, h, w) in order, columns are channels
        for n in 0..2 {
            for c in 0..3 {
                for h in 0..4 {
                    for w in 0..5 {
                        let row = (n * 4 + h) * 5 + w;
                        assert_eq!(out[[row, c]], input[[n, c, h, w]]);
                    }
                }
            }
        }
    }

    #[test]
    fn flattening_round_trips() {
        let input = iota(&[2, 3, 4, 5]);
        let flat = reshape_4d_to_2d(input.clone()).unwrap();
        let back = reshape_2d_to_4d(flat, &[2, 3, 4, 5]).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn rank_mismatches_are_rejected() {
        let err = reshape_4d_to_2d(iota(&[2, 3, 4])).unwrap_err();
        assert!(matches!(err, ConvError::InvalidArgument { .. }));

        let err = reshape_2d_to_4d(iota(&[2, 3, 4]), &[2, 3, 4, 1]).unwrap_err();
        assert!(matches!(err, ConvError::InvalidArgument { .. }));

        let err = reshape_2d_to_4d(iota(&[40, 3]), &[2, 3, 4]).unwrap_err();
        assert!(matches!(err, ConvError::InvalidArgument { .. }));

        let err = reshape_2d_to_4d(iota(&[40, 3]), &[2, 3, 4, 4]).unwrap_err();
        assert!(matches!(err, ConvError::InvalidArgument { .. }));
    }

    #[test]
    fn per_example_mask_broadcasts_over_positions() {
        let output = iota(&[2, 3, 4, 5]);
        let mask = ArrayD::from_shape_vec(IxDyn(&[2, 1]), vec![1.0f32, 0.0]).unwrap();

        let adapted = adapt_2d_mask(&mask, &output).unwrap();
        assert_eq!(adapted.shape(), &[40, 1]);
        for row in 0..20 {
            assert_eq!(adapted[[row, 0]], 1.0);
        }
        for row in 20..40 {
            assert_eq!(adapted[[row, 0]], 0.0);
        }
    }

    #[test]
    fn mask_dispatch_follows_rank() {
        let output = iota(&[2, 3, 4, 5]);

        assert!(reshape_mask_if_required(None::<ArrayD<f32>>, &output)
            .unwrap()
            .is_none());

        let m2 = ArrayD::from_shape_vec(IxDyn(&[2, 1]), vec![1.0f32, 1.0]).unwrap();
        let out = reshape_mask_if_required(Some(m2), &output).unwrap().unwrap();
        assert_eq!(out.shape(), &[40, 1]);

        let m3 = iota(&[2, 4, 5]);
        let out = reshape_mask_if_required(Some(m3), &output).unwrap().unwrap();
        assert_eq!(out.shape(), &[40, 1]);

        let m4 = iota(&[2, 3, 4, 5]);
        let out = reshape_mask_if_required(Some(m4), &output).unwrap().unwrap();
        assert_eq!(out.shape(), &[40, 3]);

        // rank 5 falls through to the activation path, which rejects it
        let m5 = iota(&[2, 3, 4, 5, 1]);
        let err = reshape_mask_if_required(Some(m5), &output).unwrap_err();
        assert!(matches!(err, ConvError::InvalidArgument { .. }));
    }

    #[test]
    fn position_mask_flattens_in_order() {
        let mask = iota(&[2, 4, 5]);
        let flat = reshape_3d_mask(mask.clone()).unwrap();
        assert_eq!(flat.shape(), &[40, 1]);
        for n in 0..2 {
            for h in 0..4 {
                for w in 0..5 {
                    assert_eq!(flat[[(n * 4 + h) * 5 + w, 0]], mask[[n, h, w]]);
                }
            }
        }
    }
}
