use nvmex_common::error::{NvmexError, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::runner::CommandRunner;

pub const LIST_ARGS: [&str; 3] = ["list", "-o", "json"];

/// An attached NVMe device as reported by `nvme list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub path: String,
    pub model: String,
}

#[derive(Debug, Deserialize)]
struct Inventory {
    #[serde(rename = "Devices", default)]
    devices: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct InventoryEntry {
    #[serde(rename = "DevicePath")]
    device_path: String,
    #[serde(rename = "ModelNumber")]
    model_number: String,
}

pub async fn enumerate(runner: &dyn CommandRunner) -> Result<Vec<DeviceDescriptor>> {
    let stdout = runner.run(&LIST_ARGS).await?;
    let devices = parse_inventory(&stdout)?;
    debug!(count = devices.len(), "enumerated nvme devices");
    Ok(devices)
}

/// Decodes `nvme list -o json` output. Each device keeps the model of its own entry.
pub fn parse_inventory(stdout: &[u8]) -> Result<Vec<DeviceDescriptor>> {
    let inventory: Inventory =
        serde_json::from_slice(stdout).map_err(|err| NvmexError::Parse {
            context: "nvme list".to_string(),
            reason: err.to_string(),
        })?;

    inventory
        .devices
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry: InventoryEntry =
                serde_json::from_value(entry).map_err(|err| NvmexError::Parse {
                    context: "nvme list".to_string(),
                    reason: format!("device entry {index}: {err}"),
                })?;
            Ok(DeviceDescriptor {
                path: entry.device_path,
                model: entry.model_number,
            })
        })
        .collect()
}
