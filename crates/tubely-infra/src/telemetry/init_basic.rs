use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubely_core::Config;

const DEFAULT_FILTER: &str = "tubely=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Initialize tracing for a binary. Logs go to stderr.
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(
    service_name: &str,
    environment: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (json_layer, pretty_layer) = if json {
        (
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            ),
            None,
        )
    } else {
        (None, Some(fmt::layer().with_writer(std::io::stderr)))
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(json_layer)
        .with(pretty_layer)
        .try_init()?;

    tracing::info!(
        service.name = %service_name,
        deployment.environment = %environment,
        log.format = if json { "json" } else { "pretty" },
        "Telemetry initialized"
    );
    Ok(())
}

pub fn init_from_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    init_telemetry(config.service_name(), config.environment(), config.log_json())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        // Either this call or one from another test installs the subscriber first.
        let _ = init_telemetry("tubely-test", "test", false);
        assert!(init_telemetry("tubely-test", "test", true).is_err());
    }
}
