use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("Label encoder has no classes")]
    Empty,
    #[error("Duplicate class label: {0}")]
    DuplicateLabel(String),
    #[error("Class index {index} is out of range for {num_classes} classes")]
    UnknownIndex { index: usize, num_classes: usize },
    #[error("Unknown class label: {0}")]
    UnknownLabel(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid label encoder file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk layout of a label encoder: `{"classes": ["anger", "fear", ...]}`.
#[derive(Serialize, Deserialize)]
struct EncoderFile {
    classes: Vec<String>,
}

/// Bidirectional mapping between class indices and label strings.
///
/// Index `i` maps to `classes()[i]`; the order is fixed when the encoder is
/// built and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Builds an encoder from labels in class-index order.
    /// Fails if the list is empty or contains the same label twice.
    pub fn new<I, S>(classes: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        if classes.is_empty() {
            return Err(LabelError::Empty);
        }

        let mut index = HashMap::with_capacity(classes.len());
        for (i, label) in classes.iter().enumerate() {
            if index.insert(label.clone(), i).is_some() {
                return Err(LabelError::DuplicateLabel(label.clone()));
            }
        }

        Ok(Self { classes, index })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LabelError> {
        let file: EncoderFile = serde_json::from_str(json)?;
        Self::new(file.classes)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LabelError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serializes the encoder in the same format `from_json_str` reads.
    pub fn to_json_string(&self) -> Result<String, LabelError> {
        let file = EncoderFile { classes: self.classes.clone() };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// All labels in class-index order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Maps labels to their class indices.
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, LabelError> {
        labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                self.index
                    .get(label)
                    .copied()
                    .ok_or_else(|| LabelError::UnknownLabel(label.to_string()))
            })
            .collect()
    }

    /// Maps class indices back to their labels.
    pub fn inverse_transform(&self, indices: &[usize]) -> Result<Vec<&str>, LabelError> {
        indices.iter().map(|&index| self.label(index)).collect()
    }

    /// Label for a single class index.
    pub fn label(&self, index: usize) -> Result<&str, LabelError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(LabelError::UnknownIndex {
                index,
                num_classes: self.classes.len(),
            })
    }
}
