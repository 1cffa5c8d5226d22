use pricewise_core::config::{AppConfig, LogFormat};
use tracing::Level;

/// Installs the global fmt subscriber on stderr so stdout stays machine-readable.
/// A subscriber that is already installed is left in place.
pub fn init(config: &AppConfig) {
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let installed = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_err() {
        tracing::debug!(
            event_name = "system.logging.already_initialized",
            "subscriber already set"
        );
    }
}
