//! 🜂 Жрецы Железа - выбор устройства для инференса
//!
//! CPU доступен всегда. CUDA и Metal проверяются только если
//! соответствующая cargo feature включена при сборке.

use anyhow::{anyhow, Result};
use candle_core::{DType, Device};
use serde::Serialize;

/// Тип устройства
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeviceType {
    Cpu { cores: usize },
    Cuda { device_id: usize },
    Metal { device_id: usize },
}

impl DeviceType {
    pub fn name(&self) -> &str {
        match self {
            DeviceType::Cpu { .. } => "CPU",
            DeviceType::Cuda { .. } => "CUDA",
            DeviceType::Metal { .. } => "Metal",
        }
    }

    pub fn is_gpu(&self) -> bool {
        matches!(self, DeviceType::Cuda { .. } | DeviceType::Metal { .. })
    }
}

/// Доступное устройство и что о нём известно
#[derive(Debug, Clone)]
pub struct DeviceChoice {
    pub device: Device,
    pub device_type: DeviceType,
}

impl DeviceChoice {
    /// Тип весов: половинная точность только на CUDA
    pub fn dtype(&self) -> DType {
        match self.device_type {
            DeviceType::Cuda { .. } => DType::F16,
            _ => DType::F32,
        }
    }

    pub fn describe(&self) -> String {
        let name = self.device_type.name();
        match &self.device_type {
            DeviceType::Cpu { cores } => format!("{name} ({cores} cores)"),
            DeviceType::Cuda { device_id } | DeviceType::Metal { device_id } => {
                format!("{name} #{device_id}")
            }
        }
    }
}

/// Все доступные устройства, CPU первым
pub fn discover_devices() -> Vec<DeviceChoice> {
    let mut devices = vec![DeviceChoice {
        device: Device::Cpu,
        device_type: DeviceType::Cpu {
            cores: num_cpus::get(),
        },
    }];

    #[cfg(feature = "cuda")]
    {
        if candle_core::utils::cuda_is_available() {
            match Device::new_cuda(0) {
                Ok(device) => devices.push(DeviceChoice {
                    device,
                    device_type: DeviceType::Cuda { device_id: 0 },
                }),
                Err(err) => tracing::warn!(%err, "CUDA reported available but failed to open"),
            }
        }
    }

    #[cfg(feature = "metal")]
    {
        if candle_core::utils::metal_is_available() {
            match Device::new_metal(0) {
                Ok(device) => devices.push(DeviceChoice {
                    device,
                    device_type: DeviceType::Metal { device_id: 0 },
                }),
                Err(err) => tracing::warn!(%err, "Metal reported available but failed to open"),
            }
        }
    }

    devices
}

/// GPU предпочтительнее CPU, если не задан `force_cpu`
pub fn choose_device(candidates: Vec<DeviceChoice>, force_cpu: bool) -> Result<DeviceChoice> {
    let mut candidates: Vec<_> = candidates
        .into_iter()
        .filter(|c| !force_cpu || !c.device_type.is_gpu())
        .collect();
    candidates.sort_by_key(|c| !c.device_type.is_gpu());
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no compute device satisfies the requirements"))
}

pub fn select_device(force_cpu: bool) -> Result<DeviceChoice> {
    let choice = choose_device(discover_devices(), force_cpu)?;
    tracing::info!(device = %choice.describe(), "device selected");
    Ok(choice)
}
