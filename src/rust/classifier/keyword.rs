use std::collections::HashMap;

use super::error::ClassifierError;
use super::TextClassifier;

/// A lookup-table classifier: each keyword votes for one class index.
///
/// Text is lowercased and split on anything that is not alphanumeric or an
/// apostrophe. The class with the most keyword hits wins, ties go to the lowest
/// index, and text without any known keyword gets the fallback index.
///
/// ```
/// use emotion_api::{KeywordClassifier, TextClassifier};
///
/// let classifier = KeywordClassifier::new(3, 2)?
///     .with_keywords(0, ["furious", "angry"])?
///     .with_keywords(1, ["happy", "glad"])?;
///
/// assert_eq!(classifier.predict(&["So happy today!"])?, vec![1]);
/// assert_eq!(classifier.predict(&["nothing to see"])?, vec![2]);
/// # Ok::<(), emotion_api::ClassifierError>(())
/// ```
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: HashMap<String, usize>,
    num_classes: usize,
    fallback: usize,
}

impl KeywordClassifier {
    pub fn new(num_classes: usize, fallback: usize) -> Result<Self, ClassifierError> {
        if num_classes == 0 {
            return Err(ClassifierError::Build("Keyword classifier needs at least one class".into()));
        }
        if fallback >= num_classes {
            return Err(ClassifierError::Build(format!(
                "Fallback class {} is out of range for {} classes",
                fallback, num_classes
            )));
        }
        Ok(Self {
            keywords: HashMap::new(),
            num_classes,
            fallback,
        })
    }

    /// Registers keywords for a class. A keyword registered twice keeps its
    /// latest class.
    pub fn with_keywords<I, S>(mut self, class_index: usize, keywords: I) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if class_index >= self.num_classes {
            return Err(ClassifierError::Build(format!(
                "Class {} is out of range for {} classes",
                class_index, self.num_classes
            )));
        }
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                return Err(ClassifierError::Build("Keywords cannot be empty".into()));
            }
            self.keywords.insert(keyword, class_index);
        }
        Ok(self)
    }

    fn classify(&self, text: &str) -> usize {
        let mut votes = vec![0usize; self.num_classes];
        let lowered = text.to_lowercase();
        for word in lowered.split(|c: char| !(c.is_alphanumeric() || c == '\'')) {
            if let Some(&class_index) = self.keywords.get(word) {
                votes[class_index] += 1;
            }
        }

        // max_by_key keeps the last maximum, so scan in reverse to favour low indices
        match votes.iter().enumerate().rev().max_by_key(|&(_, &count)| count) {
            Some((class_index, &count)) if count > 0 => class_index,
            _ => self.fallback,
        }
    }
}

impl TextClassifier for KeywordClassifier {
    fn predict(&self, texts: &[&str]) -> Result<Vec<usize>, ClassifierError> {
        Ok(texts.iter().map(|text| self.classify(text)).collect())
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
