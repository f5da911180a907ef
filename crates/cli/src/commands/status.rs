//! `crowdwiz status`: Show the effective configuration.

use crowdwiz_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("CrowdWiz Status");
    println!("===============");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.model_for(&config.default_provider));
    println!("  Temperature:  {}", config.default_temperature);
    println!("  Store:        {}", config.store.backend);
    if config.store.backend == "sqlite" {
        println!("  Database:     {}", config.store.database_path().display());
    }
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);

    let router = crowdwiz_providers::router::build_from_config(&config);
    match router.default() {
        Ok(provider) => match provider.health_check().await {
            Ok(true) => {
                let models = provider.list_models().await.unwrap_or_default();
                println!("\n  Backend reachable ({} models available)", models.len());
            }
            Ok(false) => println!("\n  Backend responded with an error"),
            Err(e) => println!("\n  Backend unreachable: {e}"),
        },
        Err(e) => println!("\n  {e}"),
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  Config file found");
    } else {
        println!("  No config file — run `crowdwiz onboard` first");
    }

    Ok(())
}
