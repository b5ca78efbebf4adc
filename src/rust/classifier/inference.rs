use std::collections::HashMap;
use ndarray::{s, Array2};
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Encoding, Tokenizer};

use super::error::ClassifierError;

pub(crate) const INPUT_IDS: &str = "input_ids";
pub(crate) const ATTENTION_MASK: &str = "attention_mask";
pub(crate) const TOKEN_TYPE_IDS: &str = "token_type_ids";

/// Runs a sequence-classification ONNX graph over a single text.
///
/// The graph is expected to:
/// - Accept `input_ids` and, optionally, `attention_mask` and `token_type_ids`
///   (all int64, shape [batch_size, sequence_length])
/// - Produce logits of shape [batch_size, num_classes] as its first output
///
/// Implemented by both the builder (to count the classes) and the
/// finished classifier.
pub(crate) trait SequenceInference {
    /// Returns the initialized tokenizer if available
    fn tokenizer(&self) -> Option<&Tokenizer>;

    /// Returns the initialized ONNX session if available
    fn session(&self) -> Option<&Session>;

    /// Names of the graph inputs, in the order the model declares them
    fn input_names(&self) -> &[String];

    /// Tokenizes the text with special tokens. Truncation is configured on the
    /// tokenizer itself, so overly long texts are cut rather than rejected.
    fn encode(&self, text: &str) -> Result<Encoding, ClassifierError> {
        let tokenizer = self.tokenizer()
            .ok_or_else(|| ClassifierError::Tokenizer("Tokenizer not initialized".into()))?;

        let encoding = tokenizer.encode(text, true)
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;

        if encoding.get_ids().is_empty() {
            return Err(ClassifierError::InvalidInput("Text produced no tokens".into()));
        }
        Ok(encoding)
    }

    /// Returns the raw logits for one text.
    ///
    /// # Errors
    /// - `Tokenizer` if encoding fails
    /// - `Model` if tensor creation or model execution fails
    /// - `Inference` if the output has an unexpected shape
    fn logits(&self, text: &str) -> Result<Vec<f32>, ClassifierError> {
        let encoding = self.encode(text)?;
        let session = self.session()
            .ok_or_else(|| ClassifierError::Model("Session not initialized".into()))?;

        let mut input_tensors = HashMap::new();
        for name in self.input_names() {
            let values = match name.as_str() {
                INPUT_IDS => encoding.get_ids(),
                ATTENTION_MASK => encoding.get_attention_mask(),
                TOKEN_TYPE_IDS => encoding.get_type_ids(),
                other => {
                    return Err(ClassifierError::Model(format!("Unsupported model input '{}'", other)));
                }
            };
            input_tensors.insert(name.as_str(), to_tensor(name, values)?);
        }

        let outputs = session.run(input_tensors)
            .map_err(|e| ClassifierError::Model(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::Model(format!("Failed to extract output tensor: {}", e)))?;

        let logits: Vec<f32> = match output_tensor.ndim() {
            1 => output_tensor.iter().copied().collect(),
            2 if output_tensor.shape()[0] == 1 => output_tensor
                .slice(s![0, ..])
                .iter()
                .copied()
                .collect(),
            _ => {
                return Err(ClassifierError::Inference(format!(
                    "Expected logits of shape [1, num_classes], got {:?}",
                    output_tensor.shape()
                )));
            }
        };

        if logits.is_empty() {
            return Err(ClassifierError::Inference("Model produced no logits".into()));
        }
        Ok(logits)
    }
}

fn to_tensor(name: &str, values: &[u32]) -> Result<Tensor<i64>, ClassifierError> {
    let array = Array2::from_shape_vec(
        (1, values.len()),
        values.iter().map(|&x| x as i64).collect(),
    )
    .map_err(|e| ClassifierError::Model(format!("Failed to create {} array: {}", name, e)))?;

    Tensor::from_array(array)
        .map_err(|e| ClassifierError::Model(format!("Failed to create {} tensor: {}", name, e)))
}
