use std::sync::Arc;
use ort::session::Session;
use tokenizers::Tokenizer;

use super::error::ClassifierError;
use super::inference::SequenceInference;
use super::utils::argmax;
use super::{ClassifierInfo, TextClassifier};

/// A sequence-classification model executed with ONNX Runtime.
///
/// The tokenizer and session are wrapped in `Arc`, so the classifier is
/// `Send + Sync` and can be shared across request handlers without locking.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use emotion_api::{OnnxClassifier, TextClassifier};
///
/// let classifier = OnnxClassifier::builder()
///     .with_model_files("emotion_model_v2/model.onnx", "emotion_model_v2/tokenizer.json")?
///     .build()?;
///
/// let indices = classifier.predict(&["I am so happy today!"])?;
/// println!("Predicted class index: {}", indices[0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OnnxClassifier {
    pub(crate) model_path: String,
    pub(crate) tokenizer_path: String,
    pub(crate) tokenizer: Arc<Tokenizer>,
    pub(crate) session: Arc<Session>,
    pub(crate) input_names: Vec<String>,
    pub(crate) num_classes: usize,
    pub(crate) max_sequence_length: usize,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<OnnxClassifier>();
    }
};

impl SequenceInference for OnnxClassifier {
    fn tokenizer(&self) -> Option<&Tokenizer> {
        Some(&self.tokenizer)
    }

    fn session(&self) -> Option<&Session> {
        Some(&self.session)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }
}

impl OnnxClassifier {
    /// Creates a new OnnxClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::OnnxClassifierBuilder {
        super::builder::OnnxClassifierBuilder::new()
    }

    /// Returns information about the loaded model
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            num_classes: self.num_classes,
            max_sequence_length: self.max_sequence_length,
        }
    }

    fn predict_one(&self, text: &str) -> Result<usize, ClassifierError> {
        let logits = self.logits(text)?;
        if logits.len() != self.num_classes {
            return Err(ClassifierError::Inference(format!(
                "Model produced {} logits, expected {}",
                logits.len(),
                self.num_classes
            )));
        }
        argmax(&logits)
            .ok_or_else(|| ClassifierError::Inference("Model produced no logits".into()))
    }
}

impl TextClassifier for OnnxClassifier {
    fn predict(&self, texts: &[&str]) -> Result<Vec<usize>, ClassifierError> {
        texts.iter().map(|text| self.predict_one(text)).collect()
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
