use anyhow::Result;
use billing_dashboard::{config::AppConfig, metrics_server, observability, server};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;
    tracing::info!(
        electricity_rate = cfg.tariff.electricity_rate,
        water_rate = cfg.tariff.water_rate,
        wifi_fee = cfg.tariff.wifi_fee,
        "session tariff defaults"
    );

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    server::serve(&cfg).await
}
