use std::fs;
use std::sync::Arc;
use emotion_api::{
    ArtifactChecksums, ArtifactError, ArtifactStore, ClassifierOptions, EmotionService,
    KeywordClassifier, LabelEncoder, ServiceError,
};
use tempfile::TempDir;

fn write_encoder(dir: &TempDir, classes: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join("label_encoder_v2.json");
    let encoder = LabelEncoder::new(classes.iter().copied()).unwrap();
    fs::write(&path, encoder.to_json_string().unwrap()).unwrap();
    path
}

#[test]
fn test_encoder_file_round_trips_through_store() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = write_encoder(&dir, &["anger", "fear", "joy", "sadness"]);
    let store = ArtifactStore::new(dir.path().join("emotion_model_v2"), &path);

    let encoder = store.load_label_encoder()?;
    assert_eq!(encoder.classes(), ["anger", "fear", "joy", "sadness"]);
    assert_eq!(encoder.inverse_transform(&[3, 0])?, vec!["sadness", "anger"]);
    Ok(())
}

#[test]
fn test_checksum_pins_encoder_contents() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = write_encoder(&dir, &["anger", "joy"]);
    let store = ArtifactStore::new(dir.path(), &path);

    let digest = ArtifactStore::file_sha256(&path)?;
    let checksums = ArtifactChecksums {
        label_encoder: Some(digest),
        ..Default::default()
    };
    store.verify(&checksums)?;

    fs::write(&path, r#"{"classes": ["anger", "joy", "fear"]}"#)?;
    assert!(matches!(store.verify(&checksums), Err(ArtifactError::HashMismatch { .. })));
    Ok(())
}

#[test]
fn test_missing_model_dir_fails_startup() {
    let dir = TempDir::new().unwrap();
    let path = write_encoder(&dir, &["anger", "joy"]);
    let store = ArtifactStore::new(dir.path().join("does_not_exist"), &path);

    assert!(!store.is_available());
    assert!(matches!(
        store.load_classifier(&ClassifierOptions::default()),
        Err(ArtifactError::NotFound(_))
    ));
}

#[test]
fn test_duplicate_labels_fail_startup() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("labels.json");
    fs::write(&path, r#"{"classes": ["joy", "joy"]}"#).unwrap();
    let store = ArtifactStore::new(dir.path(), &path);

    assert!(matches!(store.load_label_encoder(), Err(ArtifactError::LabelEncoder(_))));
}

#[test]
fn test_classifier_must_match_encoder() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = write_encoder(&dir, &["anger", "fear", "joy"]);
    let encoder = Arc::new(ArtifactStore::new(dir.path(), &path).load_label_encoder()?);

    let too_small = KeywordClassifier::new(2, 0)?;
    assert!(matches!(
        EmotionService::new(Arc::new(too_small), encoder.clone()),
        Err(ServiceError::ClassCountMismatch { classifier: 2, encoder: 3 })
    ));

    let matching = KeywordClassifier::new(3, 2)?.with_keywords(1, ["afraid"])?;
    let service = EmotionService::new(Arc::new(matching), encoder)?;
    assert_eq!(service.predict("I am afraid")?, "fear");
    Ok(())
}
