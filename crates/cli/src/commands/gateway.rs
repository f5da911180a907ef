//! `crowdwiz gateway`: Start the HTTP server.

use crowdwiz_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("CrowdWiz Gateway");
    println!("   Wizard:   http://{}:{}/", config.gateway.host, config.gateway.port);
    println!("   Provider: {} ({})", config.default_provider, config.model_for(&config.default_provider));
    println!("   Store:    {}", config.store.backend);

    crowdwiz_gateway::start(config).await?;

    Ok(())
}
