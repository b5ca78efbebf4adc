use std::sync::Arc;
use std::time::Instant;
use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use emotion_api::{api, EmotionService, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    emotion_api::init_logger();
    let config = ServerConfig::parse();

    info!("=== Starting Emotion API v{} ===", env!("CARGO_PKG_VERSION"));

    let start_time = Instant::now();
    let store = config.artifact_store();
    if !store.is_available() {
        warn!("Some artifacts are missing; loading will fail");
    }

    store
        .verify(&config.checksums())
        .context("Artifact verification failed")?;

    let encoder = store
        .load_label_encoder()
        .with_context(|| format!("Failed to load label encoder from {:?}", store.get_label_encoder_path()))?;
    let classifier = store
        .load_classifier(&config.classifier_options())
        .with_context(|| format!("Failed to load classifier from {:?}", config.model_dir))?;

    let service = EmotionService::new(Arc::new(classifier), Arc::new(encoder))
        .context("Classifier and label encoder are incompatible")?;

    info!(
        "Artifacts loaded in {:.2?} ({} classifier)",
        start_time.elapsed(),
        service.classifier_name()
    );
    info!("Serving labels: {:?}", service.labels());

    api::serve(&config.bind_address(), service)
        .await
        .with_context(|| format!("Server on {} failed", config.bind_address()))?;

    Ok(())
}
