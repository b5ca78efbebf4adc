use std::path::PathBuf;
use clap::Parser;

use crate::artifacts::{ArtifactChecksums, ArtifactStore, ClassifierOptions};
use crate::classifier::builder::DEFAULT_MAX_SEQUENCE_LENGTH;
use crate::runtime::{OptimizationLevel, RuntimeConfig};

/// Serve emotion predictions for text over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "EMOTION_API_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "EMOTION_API_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory holding model.onnx and tokenizer.json
    #[arg(long, env = "EMOTION_API_MODEL_DIR", default_value = "emotion_model_v2")]
    pub model_dir: PathBuf,

    /// Label encoder JSON file ({"classes": [...]})
    #[arg(long, env = "EMOTION_API_LABEL_ENCODER", default_value = "label_encoder_v2.json")]
    pub label_encoder: PathBuf,

    /// Tokens kept per input; longer texts are truncated
    #[arg(long, env = "EMOTION_API_MAX_SEQUENCE_LENGTH", default_value_t = DEFAULT_MAX_SEQUENCE_LENGTH)]
    pub max_sequence_length: usize,

    /// Threads used to run independent graph nodes (0 lets ONNX Runtime decide)
    #[arg(long, default_value_t = 0)]
    pub inter_threads: usize,

    /// Threads used inside a single graph node (0 lets ONNX Runtime decide)
    #[arg(long, default_value_t = 0)]
    pub intra_threads: usize,

    /// Graph optimization level
    #[arg(long, value_enum, default_value_t = OptimizationLevel::Level3)]
    pub optimization_level: OptimizationLevel,

    /// Expected SHA-256 of model.onnx
    #[arg(long)]
    pub model_sha256: Option<String>,

    /// Expected SHA-256 of tokenizer.json
    #[arg(long)]
    pub tokenizer_sha256: Option<String>,

    /// Expected SHA-256 of the label encoder file
    #[arg(long)]
    pub label_encoder_sha256: Option<String>,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn artifact_store(&self) -> ArtifactStore {
        ArtifactStore::new(&self.model_dir, &self.label_encoder)
    }

    pub fn checksums(&self) -> ArtifactChecksums {
        ArtifactChecksums {
            model: self.model_sha256.clone(),
            tokenizer: self.tokenizer_sha256.clone(),
            label_encoder: self.label_encoder_sha256.clone(),
        }
    }

    pub fn classifier_options(&self) -> ClassifierOptions {
        ClassifierOptions {
            max_sequence_length: self.max_sequence_length,
            runtime: RuntimeConfig {
                inter_threads: self.inter_threads,
                intra_threads: self.intra_threads,
                optimization_level: self.optimization_level,
            },
        }
    }
}
