use std::path::{Path, PathBuf};
use std::fs;
use std::io;
use sha2::{Sha256, Digest};

use crate::classifier::{ClassifierError, OnnxClassifier};
use crate::labels::{LabelEncoder, LabelError};
use crate::runtime::RuntimeConfig;

pub const MODEL_FILE_NAME: &str = "model.onnx";
pub const TOKENIZER_FILE_NAME: &str = "tokenizer.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
    #[error("Failed to load classifier: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("Failed to load label encoder: {0}")]
    LabelEncoder(#[from] LabelError),
}

/// Expected SHA-256 digests (lowercase hex) of the artifact files.
/// Files without an expected digest are not verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactChecksums {
    pub model: Option<String>,
    pub tokenizer: Option<String>,
    pub label_encoder: Option<String>,
}

/// Options for loading the ONNX classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierOptions {
    pub max_sequence_length: usize,
    pub runtime: RuntimeConfig,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            max_sequence_length: crate::classifier::builder::DEFAULT_MAX_SEQUENCE_LENGTH,
            runtime: RuntimeConfig::default(),
        }
    }
}

/// Locates, verifies and loads the two artifacts the service runs on: a model
/// directory holding `model.onnx` and `tokenizer.json`, and a label encoder
/// JSON file.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    model_dir: PathBuf,
    label_encoder_path: PathBuf,
}

impl ArtifactStore {
    pub fn new<M: AsRef<Path>, L: AsRef<Path>>(model_dir: M, label_encoder_path: L) -> Self {
        Self {
            model_dir: model_dir.as_ref().to_path_buf(),
            label_encoder_path: label_encoder_path.as_ref().to_path_buf(),
        }
    }

    pub fn get_model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE_NAME)
    }

    pub fn get_tokenizer_path(&self) -> PathBuf {
        self.model_dir.join(TOKENIZER_FILE_NAME)
    }

    pub fn get_label_encoder_path(&self) -> &Path {
        &self.label_encoder_path
    }

    pub fn is_available(&self) -> bool {
        let model_path = self.get_model_path();
        let tokenizer_path = self.get_tokenizer_path();
        log::debug!("Checking artifacts:");
        log::debug!("  Model path: {:?} (exists: {})", model_path, model_path.exists());
        log::debug!("  Tokenizer path: {:?} (exists: {})", tokenizer_path, tokenizer_path.exists());
        log::debug!(
            "  Label encoder path: {:?} (exists: {})",
            self.label_encoder_path,
            self.label_encoder_path.exists()
        );
        model_path.exists() && tokenizer_path.exists() && self.label_encoder_path.exists()
    }

    /// Computes the lowercase hex SHA-256 digest of a file.
    pub fn file_sha256(path: &Path) -> Result<String, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn verify_file(path: &Path, expected_hash: &str, file_type: &str) -> Result<(), ArtifactError> {
        log::info!("Verifying {} file: {:?}", file_type, path);
        let hash = Self::file_sha256(path)?;
        let expected = expected_hash.trim().to_lowercase();
        if hash != expected {
            log::error!("{} hash mismatch: expected {}, got {}", file_type, expected, hash);
            return Err(ArtifactError::HashMismatch {
                file_type: file_type.to_string(),
                expected,
                actual: hash,
            });
        }
        Ok(())
    }

    /// Checks every artifact that has an expected digest.
    pub fn verify(&self, checksums: &ArtifactChecksums) -> Result<(), ArtifactError> {
        let checks = [
            (self.get_model_path(), checksums.model.as_deref(), "model"),
            (self.get_tokenizer_path(), checksums.tokenizer.as_deref(), "tokenizer"),
            (self.label_encoder_path.clone(), checksums.label_encoder.as_deref(), "label encoder"),
        ];
        for (path, expected, file_type) in checks {
            if let Some(expected) = expected {
                Self::verify_file(&path, expected, file_type)?;
            }
        }
        Ok(())
    }

    pub fn load_label_encoder(&self) -> Result<LabelEncoder, ArtifactError> {
        if !self.label_encoder_path.exists() {
            return Err(ArtifactError::NotFound(self.label_encoder_path.clone()));
        }
        let encoder = LabelEncoder::from_file(&self.label_encoder_path)?;
        log::info!("Label encoder loaded with {} classes: {:?}", encoder.len(), encoder.classes());
        Ok(encoder)
    }

    pub fn load_classifier(&self, options: &ClassifierOptions) -> Result<OnnxClassifier, ArtifactError> {
        let model_path = self.get_model_path();
        let tokenizer_path = self.get_tokenizer_path();
        for path in [&model_path, &tokenizer_path] {
            if !path.exists() {
                return Err(ArtifactError::NotFound(path.clone()));
            }
        }

        let classifier = OnnxClassifier::builder()
            .with_runtime_config(options.runtime)
            .with_max_sequence_length(options.max_sequence_length)?
            .with_model_files(&model_path, &tokenizer_path)?
            .build()?;
        log::info!("Classifier loaded: {:?}", classifier.info());
        Ok(classifier)
    }
}
