mod error;
mod inference;
mod keyword;
mod model;
pub mod builder;
mod utils;

pub use error::ClassifierError;
pub use keyword::KeywordClassifier;
pub use model::OnnxClassifier;
pub use builder::OnnxClassifierBuilder;

/// A trained model that maps text to class indices.
///
/// Implementations are loaded once and shared read-only across request
/// handlers, so they must be `Send + Sync` and must not need `&mut self`
/// to predict.
pub trait TextClassifier: Send + Sync {
    /// Predicts one class index per input text, in input order.
    fn predict(&self, texts: &[&str]) -> Result<Vec<usize>, ClassifierError>;

    /// Number of distinct class indices this classifier can produce.
    fn num_classes(&self) -> usize;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Information about a loaded classifier, logged at startup
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the tokenizer file
    pub tokenizer_path: String,
    /// Number of classes the model emits logits for
    pub num_classes: usize,
    /// Tokens kept per input before truncation
    pub max_sequence_length: usize,
}
