use super::cache::ModelOptions;
use candle_core::Device;

use crate::error::{DetectorError, Result};

#[derive(Clone, Default)]
pub enum DeviceRequest {
    #[default]
    Cpu,
    Cuda(usize),
}

impl DeviceRequest {
    pub fn resolve(self) -> Result<Device> {
        match self {
            DeviceRequest::Cpu => Ok(Device::Cpu),
            DeviceRequest::Cuda(i) => Device::new_cuda(i).map_err(|e| {
                DetectorError::Device(format!(
                    "failed to init CUDA device {i}: {e}. Try CPU as fallback."
                ))
            }),
        }
    }
}

pub fn build_cache_key<O: ModelOptions>(options: &O, device: &Device) -> String {
    format!("{}-{:?}", options.cache_key(), device.location())
}
