use config::{Config, ConfigError, Environment, File};
use payout_core::commission::CalculatorSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load calculator defaults: built-in values, then the optional config file,
/// then `PAYOUT_*` environment variables.
pub fn load_settings(path: Option<&str>) -> Result<CalculatorSettings, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::with_name(path).required(true));
    }
    builder
        .add_source(Environment::with_prefix("PAYOUT"))
        .build()?
        .try_deserialize()
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` takes
/// precedence over `--log-level`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
