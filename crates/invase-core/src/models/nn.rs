//! Shared building blocks for the INVASE networks.
use candle_core::{Result, Tensor};

// SELU constants from Klambauer et al. (2017).
const SELU_ALPHA: f64 = 1.6732632423543772;
const SELU_SCALE: f64 = 1.0507009873554805;

/// Scaled exponential linear unit, applied element-wise.
///
/// `selu(x) = scale * x` for positive inputs and
/// `scale * alpha * (exp(x) - 1)` otherwise.
pub fn selu(x: &Tensor) -> Result<Tensor> {
    let zeros = x.zeros_like()?;
    let negative = x.exp()?.affine(SELU_ALPHA, -SELU_ALPHA)?;
    let out = x.gt(&zeros)?.where_cond(x, &negative)?;
    out.affine(SELU_SCALE, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn selu_matches_reference_values() {
        let device = Device::Cpu;
        let x = Tensor::new(&[-2.0f32, -0.5, 0.0, 0.5, 2.0], &device).unwrap();
        let y = selu(&x).unwrap().to_vec1::<f32>().unwrap();

        // Reference values computed from the closed form.
        let expected = [-1.520166, -0.691758, 0.0, 0.525350, 2.101402];
        for (got, want) in y.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-4, "got {} want {}", got, want);
        }
    }

    #[test]
    fn selu_is_identity_scaled_for_positive_inputs() {
        let device = Device::Cpu;
        let x = Tensor::new(&[1.0f32, 3.0, 10.0], &device).unwrap();
        let y = selu(&x).unwrap().to_vec1::<f32>().unwrap();
        for (got, orig) in y.iter().zip([1.0f32, 3.0, 10.0]) {
            assert!((got - orig * 1.0507009873554805f32).abs() < 1e-4);
        }
    }
}
