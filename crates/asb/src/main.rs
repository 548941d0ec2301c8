use std::sync::Arc;

use asb_core::{config::Config, filters::default_filters};

#[tokio::main]
async fn main() -> Result<(), asb_core::Error> {
    let cfg = Arc::new(Config::load()?);
    asb_core::logging::init("asb", &cfg.log_level)?;

    asb_telegram::router::run_polling(cfg, default_filters())
        .await
        .map_err(|e| asb_core::Error::Transport(format!("telegram bot failed: {e}")))?;

    Ok(())
}
