use crate::{ConvError, Result};

/// Unit dilation, the no-dilation default for 2D convolutions
pub const UNIT_DILATION: [usize; 2] = [1, 1];

/// Returns true when any dilation component differs from 1, i.e. the
/// convolution is atrous and the effective kernel differs from the raw kernel.
pub fn has_dilation(dilation: &[usize]) -> bool {
    dilation.iter().any(|&d| d != 1)
}

/// Determine the effective kernel size, accounting for dilation.
///
/// Each dilated dimension grows to `k + (k - 1) * (d - 1)`; with unit dilation
/// the kernel is returned unchanged (as a fresh copy). Supports 2D and 3D
/// kernels; any other rank is rejected, as is a dilation of mismatched rank.
///
/// See <https://deeplearning.net/software/theano/tutorial/conv_arithmetic.html#dilated-convolutions>
pub fn effective_kernel_size(kernel: &[usize], dilation: &[usize]) -> Result<Vec<usize>> {
    if kernel.len() != 2 && kernel.len() != 3 {
        return Err(ConvError::invalid_argument(
            "effective_kernel_size",
            format!("Kernel size has to be either two or three, got: {}", kernel.len()),
        ));
    }
    if dilation.len() != kernel.len() {
        return Err(ConvError::invalid_argument(
            "effective_kernel_size",
            format!(
                "Dilation rank must match kernel rank {}, got: {}",
                kernel.len(),
                dilation.len()
            ),
        ));
    }

    if !has_dilation(dilation) {
        return Ok(kernel.to_vec());
    }

    Ok(kernel
        .iter()
        .zip(dilation.iter())
        .map(|(&k, &d)| k + (k - 1) * (d - 1))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_dilation_returns_kernel_unchanged() {
        assert_eq!(effective_kernel_size(&[3, 3], &[1, 1]).unwrap(), vec![3, 3]);
        assert_eq!(
            effective_kernel_size(&[2, 4, 3], &[1, 1, 1]).unwrap(),
            vec![2, 4, 3]
        );
    }

    #[test]
    fn dilation_expands_kernel() {
        // 3x3 kernel with dilation 2 covers a 5x5 receptive field
        assert_eq!(effective_kernel_size(&[3, 3], &[2, 2]).unwrap(), vec![5, 5]);
        assert_eq!(
            effective_kernel_size(&[3, 3, 3], &[1, 2, 3]).unwrap(),
            vec![3, 5, 7]
        );
    }

    #[test]
    fn rejects_unsupported_ranks() {
        let err = effective_kernel_size(&[3], &[1]).unwrap_err();
        assert!(matches!(err, ConvError::InvalidArgument { .. }));

        let err = effective_kernel_size(&[3, 3, 3, 3], &[1, 1, 1, 1]).unwrap_err();
        assert!(matches!(err, ConvError::InvalidArgument { .. }));

        let err = effective_kernel_size(&[3, 3], &[2]).unwrap_err();
        assert!(matches!(err, ConvError::InvalidArgument { .. }));
    }

    #[test]
    fn detects_dilation() {
        assert!(!has_dilation(&UNIT_DILATION));
        assert!(!has_dilation(&[1, 1, 1]));
        assert!(has_dilation(&[1, 2]));
        assert!(has_dilation(&[2, 1, 1]));
    }
}
