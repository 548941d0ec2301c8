use crate::Result;

/// Initialize tracing for the bot.
///
/// `default_level` comes from config (`LOGLEVEL`); a `RUST_LOG` environment
/// filter still wins when set.
pub fn init(service_name: &str, default_level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{default_level},asb_core={default_level},{service_name}={default_level}"
        ))
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .init();

    Ok(())
}
