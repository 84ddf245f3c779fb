mod guards;

use std::{sync::Arc, time::Duration};

use clap::{Parser, ValueEnum};
use nvmex_collector::{Collector, CollectorConfig, DeviceErrorPolicy, NvmeCli};
use nvmex_exporter::{ExporterState, exporter_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OnDeviceError {
    /// Leave the failing device out of the scrape
    Skip,
    /// Fail the whole scrape
    Abort,
}

impl From<OnDeviceError> for DeviceErrorPolicy {
    fn from(value: OnDeviceError) -> Self {
        match value {
            OnDeviceError::Skip => DeviceErrorPolicy::Skip,
            OnDeviceError::Abort => DeviceErrorPolicy::Abort,
        }
    }
}

#[derive(Parser)]
#[command(name = "nvmex", about = "Export nvme smart-log metrics in prometheus format")]
struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value = "9998")]
    port: u16,

    /// nvme-cli executable, looked up on PATH unless it contains a `/`
    #[arg(long, default_value = "nvme")]
    nvme_bin: String,

    /// Seconds allowed for each nvme invocation
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    command_timeout: u64,

    /// Devices queried in parallel during a scrape
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    max_concurrency: u16,

    #[arg(long, value_enum, default_value = "skip")]
    on_device_error: OnDeviceError,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::from_default_env().add_directive("nvmex=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(err) = guards::require_root() {
        error!(error = %err, "startup check failed");
        return Err(err.into());
    }
    let nvme_bin = match guards::resolve_executable(&cli.nvme_bin) {
        Ok(path) => path,
        Err(err) => {
            error!(error = %err, "startup check failed");
            return Err(err.into());
        }
    };

    let runner = NvmeCli::new(nvme_bin, Duration::from_secs(cli.command_timeout));
    let collector = Collector::new(
        Arc::new(runner.clone()),
        CollectorConfig {
            max_concurrency: usize::from(cli.max_concurrency),
            on_device_error: cli.on_device_error.into(),
        },
    );
    info!(
        nvme = %runner.binary().display(),
        timeout_secs = runner.timeout().as_secs(),
        max_concurrency = collector.config().max_concurrency,
        on_device_error = ?collector.config().on_device_error,
        "nvme collector configured"
    );

    let app = exporter_router(Arc::new(ExporterState::new(collector)));

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("nvmex listening on {addr}, serving /metrics");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn defaults_match_the_documented_flags() {
        let cli = Cli::try_parse_from(["nvmex"]).unwrap();

        assert_eq!(cli.port, 9998);
        assert_eq!(cli.command_timeout, 10);
        assert_eq!(cli.max_concurrency, 1);
    }

    #[test]
    fn rejects_zero_command_timeout() {
        assert!(Cli::try_parse_from(["nvmex", "--command-timeout", "0"]).is_err());
        assert!(Cli::try_parse_from(["nvmex", "--command-timeout", "1"]).is_ok());
    }

    #[test]
    fn rejects_zero_concurrency() {
        assert!(Cli::try_parse_from(["nvmex", "--max-concurrency", "0"]).is_err());
    }
}
