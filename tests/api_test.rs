use std::sync::Arc;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use emotion_api::api::{create_router, ErrorResponse, LabelsResponse, PredictResponse};
use emotion_api::{ClassifierError, EmotionService, KeywordClassifier, LabelEncoder, TextClassifier};
use serde::de::DeserializeOwned;
use tower::ServiceExt; // for `oneshot`

const LABELS: [&str; 5] = ["anger", "fear", "joy", "love", "sadness"];

fn setup_test_service() -> EmotionService {
    let encoder = LabelEncoder::new(LABELS).unwrap();
    let classifier = KeywordClassifier::new(encoder.len(), 2)
        .unwrap()
        .with_keywords(0, ["angry", "furious", "hate"])
        .unwrap()
        .with_keywords(1, ["scared", "afraid", "terrified"])
        .unwrap()
        .with_keywords(2, ["happy", "glad", "excited"])
        .unwrap()
        .with_keywords(3, ["love", "adore"])
        .unwrap()
        .with_keywords(4, ["sad", "lonely", "crying"])
        .unwrap();
    EmotionService::new(Arc::new(classifier), Arc::new(encoder)).unwrap()
}

fn setup_test_app() -> Router {
    create_router(Arc::new(setup_test_service()))
}

fn predict_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn labels_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/labels")
        .body(Body::empty())
        .unwrap()
}

async fn send<T: DeserializeOwned>(app: Router, request: Request<Body>) -> (StatusCode, T) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("response was not the expected JSON ({}): {:?}", e, bytes));
    (status, body)
}

async fn predict(app: Router, body: &str) -> String {
    let (status, response): (_, PredictResponse) = send(app, predict_request(body)).await;
    assert_eq!(status, StatusCode::OK);
    response.emotion
}

#[tokio::test]
async fn test_empty_text_is_neutral() {
    assert_eq!(predict(setup_test_app(), r#"{"text": ""}"#).await, "neutral");
}

#[tokio::test]
async fn test_whitespace_text_is_neutral() {
    assert_eq!(predict(setup_test_app(), r#"{"text": "   "}"#).await, "neutral");
    assert_eq!(predict(setup_test_app(), r#"{"text": "\n\t "}"#).await, "neutral");
    assert_eq!(predict(setup_test_app(), r#"{"text": "\u001c\u001f "}"#).await, "neutral");
}

#[tokio::test]
async fn test_missing_text_is_neutral() {
    assert_eq!(predict(setup_test_app(), "{}").await, "neutral");
    assert_eq!(predict(setup_test_app(), r#"{"other": 1}"#).await, "neutral");
}

#[tokio::test]
async fn test_labels_lists_encoder_classes() {
    let (status, response): (_, LabelsResponse) = send(setup_test_app(), labels_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.labels, LABELS);
}

#[tokio::test]
async fn test_labels_are_stable_and_distinct() {
    let app = setup_test_app();
    let (_, first): (_, LabelsResponse) = send(app.clone(), labels_request()).await;
    let (_, second): (_, LabelsResponse) = send(app, labels_request()).await;
    assert_eq!(first, second);

    let mut deduped = first.labels.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), first.labels.len());
    assert!(!first.labels.is_empty());
}

#[tokio::test]
async fn test_prediction_is_a_known_label() {
    let app = setup_test_app();
    let (_, labels): (_, LabelsResponse) = send(app.clone(), labels_request()).await;

    let texts = [
        "I am so happy today!",
        "I feel lonely and sad",
        "This makes me furious",
        "Nothing in particular",
        "¿Qué tal?",
    ];
    for text in texts {
        let body = serde_json::json!({ "text": text }).to_string();
        let emotion = predict(app.clone(), &body).await;
        assert!(labels.labels.contains(&emotion), "{} is not a known label", emotion);
    }

    assert_eq!(predict(app, r#"{"text": "I am so happy today!"}"#).await, "joy");
}

#[tokio::test]
async fn test_prediction_is_deterministic() {
    let app = setup_test_app();
    let body = r#"{"text": "I adore this, I love it"}"#;
    let first = predict(app.clone(), body).await;
    let second = predict(app, body).await;
    assert_eq!(first, "love");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_predictions() {
    let app = setup_test_app();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { predict(app, r#"{"text": "so scared"}"#).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), "fear");
    }
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let (status, body): (_, ErrorResponse) = send(setup_test_app(), predict_request("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn test_wrong_body_shape_is_opaque_server_error() {
    for body in [r#"{"text": 42}"#, r#"{"text": null}"#, r#"{"text": ["a"]}"#, "[]", "\"hello\""] {
        let (status, response): (_, ErrorResponse) =
            send(setup_test_app(), predict_request(body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body: {}", body);
        assert_eq!(response.error, "internal server error");
    }
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::from(r#"{"text": "hi"}"#))
        .unwrap();
    let (status, _): (_, ErrorResponse) = send(setup_test_app(), request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

struct BrokenClassifier;

impl TextClassifier for BrokenClassifier {
    fn predict(&self, _texts: &[&str]) -> Result<Vec<usize>, ClassifierError> {
        Err(ClassifierError::Model("session crashed".into()))
    }

    fn num_classes(&self) -> usize {
        LABELS.len()
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[tokio::test]
async fn test_classifier_failure_is_opaque_server_error() {
    let encoder = LabelEncoder::new(LABELS).unwrap();
    let service = EmotionService::new(Arc::new(BrokenClassifier), Arc::new(encoder)).unwrap();
    let app = create_router(Arc::new(service));

    let (status, body): (_, ErrorResponse) =
        send(app.clone(), predict_request(r#"{"text": "hello"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "internal server error");
    assert!(!body.error.contains("session crashed"));

    // Blank input never reaches the classifier
    assert_eq!(predict(app, r#"{"text": " "}"#).await, "neutral");
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let request = Request::builder()
        .method("GET")
        .uri("/predict")
        .body(Body::empty())
        .unwrap();
    let response = setup_test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
