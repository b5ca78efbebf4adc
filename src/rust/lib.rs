//! An HTTP service that labels text with emotions using a pre-trained classifier.
//!
//! Two artifacts are loaded once at startup and shared read-only by every
//! request: a classifier that maps text to a class index, and the label
//! encoder it was trained with.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use emotion_api::{EmotionService, KeywordClassifier, LabelEncoder};
//!
//! let encoder = LabelEncoder::new(["anger", "joy", "sadness"])?;
//! let classifier = KeywordClassifier::new(encoder.len(), 1)?
//!     .with_keywords(0, ["angry", "furious"])?
//!     .with_keywords(2, ["sad", "crying"])?;
//!
//! let service = EmotionService::new(Arc::new(classifier), Arc::new(encoder))?;
//!
//! assert_eq!(service.predict("I am so angry")?, "anger");
//! assert_eq!(service.predict("   ")?, "neutral");
//! assert_eq!(service.labels(), ["anger", "joy", "sadness"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Serving
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use emotion_api::{api, ArtifactStore, ClassifierOptions, EmotionService};
//!
//! let store = ArtifactStore::new("emotion_model_v2", "label_encoder_v2.json");
//! let classifier = store.load_classifier(&ClassifierOptions::default())?;
//! let encoder = store.load_label_encoder()?;
//! let service = EmotionService::new(Arc::new(classifier), Arc::new(encoder))?;
//!
//! api::serve("127.0.0.1:5000", service).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod labels;
mod runtime;
pub mod service;

pub use artifacts::{ArtifactChecksums, ArtifactError, ArtifactStore, ClassifierOptions};
pub use classifier::{ClassifierError, ClassifierInfo, KeywordClassifier, OnnxClassifier, OnnxClassifierBuilder, TextClassifier};
pub use config::ServerConfig;
pub use labels::{LabelEncoder, LabelError};
pub use runtime::{OptimizationLevel, RuntimeConfig, create_session_builder};
pub use service::{EmotionService, ServiceError, NEUTRAL_LABEL};

/// Initializes `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
