use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use nvmex_common::error::{NvmexError, Result};

use crate::runner::CommandRunner;

/// Canned responses keyed by the space-joined argument list.
#[derive(Default)]
pub struct FakeRunner {
    responses: HashMap<String, std::result::Result<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inventory(self, json: &str) -> Self {
        self.respond("list -o json", json)
    }

    pub fn with_smart_log(self, device: &str, json: &str) -> Self {
        self.respond(&format!("smart-log {device} -o json"), json)
    }

    pub fn with_failure(mut self, args: &str, reason: &str) -> Self {
        self.responses
            .insert(args.to_string(), Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn respond(mut self, args: &str, json: &str) -> Self {
        self.responses.insert(args.to_string(), Ok(json.to_string()));
        self
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let key = args.join(" ");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }

        match self.responses.get(&key) {
            Some(Ok(stdout)) => Ok(stdout.clone().into_bytes()),
            Some(Err(reason)) => Err(NvmexError::Execution {
                command: format!("nvme {key}"),
                reason: reason.clone(),
            }),
            None => Err(NvmexError::Execution {
                command: format!("nvme {key}"),
                reason: "no canned response".to_string(),
            }),
        }
    }
}

/// A complete smart-log record with distinct values per field.
pub fn smart_log_json(temperature_kelvin: u64) -> String {
    format!(
        r#"{{
  "critical_warning": 0,
  "temperature": {temperature_kelvin},
  "avail_spare": 100,
  "spare_thresh": 10,
  "percent_used": 3,
  "endurance_grp_critical_warning_summary": 0,
  "data_units_read": "12,345,678",
  "data_units_written": "9,876,543",
  "host_read_commands": 123456789,
  "host_write_commands": 98765432,
  "controller_busy_time": 1234,
  "power_cycles": 56,
  "power_on_hours": 7890,
  "unsafe_shutdowns": 12,
  "media_errors": 0,
  "num_err_log_entries": 34,
  "warning_temp_time": 2,
  "critical_comp_time": 1,
  "thm_temp1_trans_count": 5,
  "thm_temp2_trans_count": 6,
  "thm_temp1_total_time": 700,
  "thm_temp2_total_time": 800
}}"#
    )
}
