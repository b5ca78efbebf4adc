use std::path::Path;
use std::sync::Arc;
use tokenizers::{Tokenizer, TruncationParams};
use ort::session::Session;
use log::{info, error};

use super::error::ClassifierError;
use super::inference::{SequenceInference, INPUT_IDS, ATTENTION_MASK, TOKEN_TYPE_IDS};
use super::model::OnnxClassifier;
use crate::runtime::{RuntimeConfig, create_session_builder};

/// Default number of tokens kept per input before truncation.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 256;

const CLASS_COUNT_TEXT: &str = "Test input to infer the number of classes";

/// A builder for constructing an OnnxClassifier with a fluent interface.
#[derive(Debug)]
pub struct OnnxClassifierBuilder {
    model_path: Option<String>,
    tokenizer_path: Option<String>,
    tokenizer: Option<Tokenizer>,
    session: Option<Session>,
    input_names: Vec<String>,
    max_sequence_length: usize,
    runtime_config: RuntimeConfig,
}

impl Default for OnnxClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceInference for OnnxClassifierBuilder {
    fn tokenizer(&self) -> Option<&Tokenizer> {
        self.tokenizer.as_ref()
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }
}

impl OnnxClassifierBuilder {
    /// Creates a new empty builder with default runtime configuration
    pub fn new() -> Self {
        Self {
            model_path: None,
            tokenizer_path: None,
            tokenizer: None,
            session: None,
            input_names: Vec::new(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration for ONNX model execution.
    /// Must be called before `with_model_files` to take effect.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Sets how many tokens are kept per input; longer texts are truncated.
    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Result<Self, ClassifierError> {
        if max_sequence_length == 0 {
            return Err(ClassifierError::Build("Max sequence length must be greater than zero".into()));
        }
        self.max_sequence_length = max_sequence_length;
        Ok(self)
    }

    /// Loads the ONNX model and its tokenizer.
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The paths are empty or already set
    ///   - The files don't exist
    ///   - The model or tokenizer failed to load
    ///   - The model inputs or outputs are not those of a sequence classifier
    pub fn with_model_files(
        mut self,
        model_path: impl AsRef<Path>,
        tokenizer_path: impl AsRef<Path>,
    ) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if model_path.as_os_str().is_empty() || tokenizer_path.as_os_str().is_empty() {
            return Err(ClassifierError::Build("Model and tokenizer paths cannot be empty".to_string()));
        }
        if self.model_path.is_some() || self.tokenizer_path.is_some() {
            return Err(ClassifierError::Build("Model and tokenizer paths already set".to_string()));
        }
        if !model_path.exists() {
            return Err(ClassifierError::Build(format!("Model file not found: {}", model_path.display())));
        }
        if !tokenizer_path.exists() {
            return Err(ClassifierError::Build(format!("Tokenizer file not found: {}", tokenizer_path.display())));
        }

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| {
                error!("Failed to load tokenizer: {}", e);
                ClassifierError::Build(format!("Failed to load tokenizer: {}", e))
            })?;
        info!("Tokenizer loaded from {}", tokenizer_path.display());

        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(model_path)?;

        self.input_names = Self::validate_model(&session)?;
        info!("Model structure validated successfully (inputs: {:?})", self.input_names);

        self.model_path = Some(model_path.to_string_lossy().to_string());
        self.tokenizer_path = Some(tokenizer_path.to_string_lossy().to_string());
        self.tokenizer = Some(tokenizer);
        self.session = Some(session);
        Ok(self)
    }

    /// Builds the classifier, running one sample input through the model to
    /// learn how many classes it emits logits for.
    pub fn build(mut self) -> Result<OnnxClassifier, ClassifierError> {
        let (model_path, tokenizer_path) = match (self.model_path.take(), self.tokenizer_path.take()) {
            (Some(model), Some(tokenizer)) => (model, tokenizer),
            _ => return Err(ClassifierError::Build("Model and tokenizer paths must be set".to_string())),
        };

        let max_sequence_length = self.max_sequence_length;
        let tokenizer = self.tokenizer.as_mut()
            .ok_or_else(|| ClassifierError::Build("No tokenizer loaded".into()))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_sequence_length,
                ..Default::default()
            }))
            .map_err(|e| ClassifierError::Build(format!("Failed to configure truncation: {}", e)))?;

        let num_classes = self.logits(CLASS_COUNT_TEXT)?.len();
        info!("Inferred number of classes from model: {}", num_classes);

        let tokenizer = Arc::new(self.tokenizer.take()
            .ok_or_else(|| ClassifierError::Build("No tokenizer loaded".into()))?);
        let session = Arc::new(self.session.take()
            .ok_or_else(|| ClassifierError::Build("No ONNX model loaded".into()))?);

        Ok(OnnxClassifier {
            model_path,
            tokenizer_path,
            tokenizer,
            session,
            input_names: self.input_names,
            num_classes,
            max_sequence_length,
        })
    }

    /// Checks that the model looks like a sequence classifier and returns its
    /// input names.
    ///
    /// # Returns
    /// * `Result<Vec<String>, ClassifierError>` - The input names, or an error if:
    ///   - The model has no `input_ids` input
    ///   - The model has an input other than `input_ids`, `attention_mask` or `token_type_ids`
    ///   - The model doesn't have any output tensors
    fn validate_model(session: &Session) -> Result<Vec<String>, ClassifierError> {
        let input_names: Vec<String> = session.inputs.iter().map(|input| input.name.clone()).collect();

        if !input_names.iter().any(|name| name == INPUT_IDS) {
            return Err(ClassifierError::Model(
                format!("Model must have an '{}' input, found {:?}", INPUT_IDS, input_names)
            ));
        }
        if let Some(unknown) = input_names
            .iter()
            .find(|name| ![INPUT_IDS, ATTENTION_MASK, TOKEN_TYPE_IDS].contains(&name.as_str()))
        {
            return Err(ClassifierError::Model(format!("Unsupported model input '{}'", unknown)));
        }
        if session.outputs.is_empty() {
            return Err(ClassifierError::Model(
                "Model must have at least 1 output for logits".to_string()
            ));
        }

        Ok(input_names)
    }
}
