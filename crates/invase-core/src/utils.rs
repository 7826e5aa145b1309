use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use ndarray::Array2;

/// Converts a device string to a Candle Device.
///
/// # Supported Device Strings
///
/// - `"cpu"`: Returns the CPU device
/// - `"cuda"`: Returns the default CUDA device (index 0)
/// - `"cuda:N"`: Returns the CUDA device with the specified index
///
/// # Errors
///
/// Returns an error if the CUDA device is not available or an unsupported
/// device type is specified.
pub fn get_device(device_str: &str) -> Result<Device> {
    if device_str.starts_with("cuda") {
        let cuda_index = if device_str == "cuda" {
            0
        } else {
            device_str
                .split(':')
                .nth(1)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0)
        };

        let device = Device::cuda_if_available(cuda_index)?;
        if !device.is_cuda() {
            return Err(anyhow!("CUDA device {} is not available", cuda_index));
        }
        Ok(device)
    } else {
        match device_str {
            "cpu" => Ok(Device::Cpu),
            _ => Err(anyhow!("Unsupported device type: {}", device_str)),
        }
    }
}

/// Copy a host matrix into a `(rows, cols)` tensor on the given device.
pub fn to_tensor(m: &Array2<f32>, device: &Device) -> candle_core::Result<Tensor> {
    let (rows, cols) = m.dim();
    let data: Vec<f32> = m.iter().copied().collect();
    Tensor::from_vec(data, (rows, cols), device)
}

/// Copy a rank-2 tensor back into a host matrix.
pub fn to_array2(t: &Tensor) -> candle_core::Result<Array2<f32>> {
    let (rows, cols) = t.dims2()?;
    let data = t.to_vec2::<f32>()?;
    Ok(Array2::from_shape_fn((rows, cols), |(i, j)| data[i][j]))
}
