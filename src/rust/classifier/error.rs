use ort::Error as OrtError;
use std::fmt;

/// Errors raised while loading a classifier or running inference with it.
#[derive(Debug)]
pub enum ClassifierError {
    /// The tokenizer could not be loaded or failed to encode the input
    Tokenizer(String),
    /// The ONNX runtime rejected the model or failed while executing it
    Model(String),
    /// The classifier could not be assembled from the supplied parts
    Build(String),
    /// The model ran but its output could not be turned into a class index
    Inference(String),
    /// The caller passed something the classifier cannot work with
    InvalidInput(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tokenizer(msg) => write!(f, "tokenizer error: {}", msg),
            Self::Model(msg) => write!(f, "model error: {}", msg),
            Self::Build(msg) => write!(f, "build error: {}", msg),
            Self::Inference(msg) => write!(f, "inference error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::Model(err.to_string())
    }
}
