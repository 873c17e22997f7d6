use anyhow::Result;
use voicerelay::{VoiceRelayConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    // Fail fast on missing keys before anything else starts.
    let config = VoiceRelayConfig::from_env()?;
    let telemetry = telemetry::init(&config.logging)?;

    tracing::info!(
        "Starting VoiceRelay {} (session model {})",
        voicerelay::VERSION,
        config.realtime.model
    );
    if let Some(path) = &config.env_file {
        tracing::info!("Loaded environment from {}", path.display());
    }
    tracing::debug!("Configuration: {:?}", config);

    let result = web::run(config).await;
    if let Err(e) = &result {
        tracing::error!("VoiceRelay exited with error: {:#}", e);
    }

    telemetry.shutdown();
    result
}
