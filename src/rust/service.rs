use std::sync::Arc;
use log::debug;

use crate::classifier::{ClassifierError, TextClassifier};
use crate::labels::{LabelEncoder, LabelError};

/// Label returned for blank input without consulting the classifier.
pub const NEUTRAL_LABEL: &str = "neutral";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("Label lookup failed: {0}")]
    Label(#[from] LabelError),
    #[error("Classifier returned no prediction")]
    EmptyPrediction,
    #[error("Classifier emits {classifier} classes but the label encoder has {encoder}")]
    ClassCountMismatch { classifier: usize, encoder: usize },
}

/// Predicts emotions for text using a classifier and the label encoder it was
/// trained with. Both are shared read-only, so the service is cheap to clone
/// and safe to call from many threads at once.
#[derive(Clone)]
pub struct EmotionService {
    classifier: Arc<dyn TextClassifier>,
    encoder: Arc<LabelEncoder>,
}

impl std::fmt::Debug for EmotionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmotionService")
            .field("classifier", &self.classifier.name())
            .field("labels", &self.encoder.classes())
            .finish()
    }
}

impl EmotionService {
    /// Pairs a classifier with its label encoder. Fails if they disagree on
    /// the number of classes, since some predictions would then have no label.
    pub fn new(classifier: Arc<dyn TextClassifier>, encoder: Arc<LabelEncoder>) -> Result<Self, ServiceError> {
        if classifier.num_classes() != encoder.len() {
            return Err(ServiceError::ClassCountMismatch {
                classifier: classifier.num_classes(),
                encoder: encoder.len(),
            });
        }
        Ok(Self { classifier, encoder })
    }

    /// Predicts the emotion expressed by `text`.
    ///
    /// Blank text (empty or whitespace only) yields [`NEUTRAL_LABEL`] without
    /// running the classifier. Any other text is classified as-is, untrimmed.
    pub fn predict(&self, text: &str) -> Result<String, ServiceError> {
        if is_blank(text) {
            return Ok(NEUTRAL_LABEL.to_string());
        }

        let prediction = self.classifier.predict(&[text])?;
        let index = prediction.first().copied().ok_or(ServiceError::EmptyPrediction)?;
        let label = self.encoder.label(index)?;
        debug!("{} classifier predicted class {} ({})", self.classifier.name(), index, label);

        Ok(label.to_string())
    }

    /// All labels the classifier can emit, in training-time order.
    pub fn labels(&self) -> Vec<String> {
        self.encoder.classes().to_vec()
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }
}

/// Whitespace as Python's `str.strip()` sees it: Unicode `White_Space` plus
/// the ASCII information separators U+001C..=U+001F.
fn is_blank(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
}
