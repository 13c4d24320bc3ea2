use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use spamserve::model::{Fitted, FittedClassifier, LinearClassifier, LinearParams, Link};
use spamserve::server::{self, BodyLimit, PredictResponse};
use spamserve::text::{FittedTfidfVectorizer, TfidfVectorizer, Transformer};
use spamserve::{ModelState, SpamPipeline};

fn vectorizer() -> FittedTfidfVectorizer {
    let corpus: Vec<String> = ["win free cash now", "claim your prize", "see you at lunch"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    TfidfVectorizer::new()
        .with_ngram_range(1, 1)
        .fit(&corpus)
        .unwrap()
}

fn classifier(v: &FittedTfidfVectorizer, link: Link) -> FittedClassifier {
    let mut weights = vec![-1.0; v.vocabulary_size()];
    for term in ["win", "free", "cash", "claim", "prize"] {
        weights[v.index_of(term).unwrap()] = 2.0;
    }
    LinearClassifier::<Fitted>::new(LinearParams { weights, bias: 0.0 }, link).into()
}

fn pipeline_state() -> ModelState {
    let v = vectorizer();
    let c = classifier(&v, Link::Logistic);
    ModelState::with_pipeline(SpamPipeline::new(v, c).unwrap())
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(server::configure),
        )
        .await
    };
}

fn post_json(body: Value) -> test::TestRequest {
    test::TestRequest::post().uri("/predict").set_json(body)
}

#[actix_web::test]
async fn test_health_with_pipeline() {
    let app = app!(pipeline_state());
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({
            "status": "ok",
            "using_pipeline": true,
            "vectorizer_loaded": true,
            "model_loaded": true,
            "pipeline_loaded": true
        })
    );
}

#[actix_web::test]
async fn test_health_without_models() {
    let app = app!(ModelState::empty());
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["using_pipeline"], false);
    assert_eq!(body["vectorizer_loaded"], false);
    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["pipeline_loaded"], false);
}

#[actix_web::test]
async fn test_single_text() {
    let app = app!(pipeline_state());
    let req = post_json(json!({"text": "WIN FREE CASH NOW"})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: PredictResponse = test::read_body_json(resp).await;
    assert_eq!(body.predictions.len(), 1);
    let p = &body.predictions[0];
    assert_eq!(p.text, "WIN FREE CASH NOW");
    assert_eq!(p.label, "SPAM");
    assert_eq!(p.label_num, 1);
    assert!(p.probability > 0.5 && p.probability <= 1.0);
}

#[actix_web::test]
async fn test_batch_preserves_order_and_nulls() {
    let app = app!(pipeline_state());
    let req = post_json(json!({"texts": ["spam now", null, "hi"]})).to_request();
    let body: PredictResponse = test::call_and_read_body_json(&app, req).await;

    let texts: Vec<&str> = body.predictions.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["spam now", "", "hi"]);
    for p in &body.predictions {
        assert_eq!(p.label == "SPAM", p.label_num == 1);
        assert!((0.0..=1.0).contains(&p.probability));
        assert_eq!((p.probability * 10_000.0).round() / 10_000.0, p.probability);
    }
}

#[actix_web::test]
async fn test_text_comes_before_texts() {
    let app = app!(pipeline_state());
    let req = post_json(json!({"text": "first", "texts": ["second", 3]})).to_request();
    let body: PredictResponse = test::call_and_read_body_json(&app, req).await;
    let texts: Vec<&str> = body.predictions.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "3"]);
}

#[actix_web::test]
async fn test_missing_texts_is_bad_request() {
    let app = app!(pipeline_state());
    for payload in [json!({}), json!({"texts": []}), json!({"text": null})] {
        let resp = test::call_service(&app, post_json(payload).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}

#[actix_web::test]
async fn test_texts_not_a_list_is_bad_request() {
    let app = app!(pipeline_state());
    let resp = test::call_service(&app, post_json(json!({"texts": "hello"})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "'texts' must be a list of strings.");
}

#[actix_web::test]
async fn test_wrong_content_type_is_bad_request() {
    let app = app!(pipeline_state());
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(r#"{"text": "hi"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_vendor_json_content_type_accepted() {
    let app = app!(pipeline_state());
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header((header::CONTENT_TYPE, "application/vnd.spam+json"))
        .set_payload(r#"{"text": "hi"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = app!(pipeline_state());
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_no_models_is_server_error_before_body_checks() {
    let app = app!(ModelState::empty());
    // Even a malformed request reports the missing artifacts first.
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload("nope")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    let msg = body["error"].as_str().unwrap();
    assert!(msg.contains("vectorizer"));
    assert!(msg.contains("train-and-save"));
}

#[actix_web::test]
async fn test_separate_components_with_margin_model() {
    let v = vectorizer();
    let c = classifier(&v, Link::Margin);
    let app = app!(ModelState::with_components(Some(v), Some(c)));

    let req = post_json(json!({"texts": ["free prize", "lunch"]})).to_request();
    let body: PredictResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.predictions[0].probability, 1.0);
    assert_eq!(body.predictions[1].probability, 0.0);
}

#[actix_web::test]
async fn test_equal_margins_give_zero_probability() {
    let v = vectorizer();
    let c = classifier(&v, Link::Margin);
    let app = app!(ModelState::with_components(Some(v), Some(c)));

    let req = post_json(json!({"texts": ["unknown words", "more unknown"]})).to_request();
    let body: PredictResponse = test::call_and_read_body_json(&app, req).await;
    assert!(body.predictions.iter().all(|p| p.probability == 0.0));
}

#[actix_web::test]
async fn test_feature_mismatch_is_server_error() {
    let v = vectorizer();
    let narrow = FittedClassifier::constant(0, 1);
    let app = app!(ModelState::with_components(Some(v), Some(narrow)));

    let resp = test::call_service(&app, post_json(json!({"text": "hi"})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Inference failed:"));
}

#[actix_web::test]
async fn test_landing_page_and_script() {
    let app = app!(ModelState::empty());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = test::read_body(resp).await;
    assert!(std::str::from_utf8(&html).unwrap().contains("/static/js/app.js"));

    let req = test::TestRequest::get().uri("/static/js/app.js").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let js = test::read_body(resp).await;
    assert!(std::str::from_utf8(&js).unwrap().contains("/predict"));
}

/// A `texts` batch well past actix's default 256 KiB extractor limit.
fn large_batch() -> Value {
    let line = "free cash prize waiting for you, reply now to claim it before the offer ends";
    json!({ "texts": vec![line; 4000] })
}

#[actix_web::test]
async fn test_large_batch_is_accepted() {
    let app = app!(pipeline_state());
    let body = large_batch();
    assert!(body.to_string().len() > 256 * 1024);

    let resp = test::call_service(&app, post_json(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: PredictResponse = test::read_body_json(resp).await;
    assert_eq!(body.predictions.len(), 4000);
}

#[actix_web::test]
async fn test_large_batch_without_models_reports_missing_artifacts() {
    let app = app!(ModelState::empty());
    let resp = test::call_service(&app, post_json(large_batch()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("vectorizer"));
}

#[actix_web::test]
async fn test_body_over_limit_is_json_413() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pipeline_state()))
            .app_data(web::Data::new(BodyLimit(1024)))
            .configure(server::configure),
    )
    .await;

    let resp = test::call_service(&app, post_json(large_batch()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Request body exceeds the 1024-byte limit.");

    let small = post_json(json!({"text": "hi"})).to_request();
    assert_eq!(test::call_service(&app, small).await.status(), StatusCode::OK);
}
