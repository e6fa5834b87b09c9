//! Remote tier tests against mocked Hugging Face and OpenRouter endpoints

use melody_ai::adapters::{
    AudioAdapter, ChatAssistant, ChatSource, FaceAdapter, LyricsAnalyzer, RecommendationAdapter,
    SongCandidate, TextAdapter,
};
use melody_ai::types::SpeechInput;
use melody_common::config::TomlConfig;
use melody_common::{CanonicalMood, EngineConfig, MoodSource};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FACE_MODEL_PATH: &str = "/models/trpakov/vit-face-expression";
const SPEECH_MODEL_PATH: &str =
    "/models/ehcalabres/wav2vec2-lg-xlsr-en-speech-emotion-recognition";
const SENTIMENT_MODEL_PATH: &str = "/models/cardiffnlp/twitter-roberta-base-sentiment-latest";
const EMBED_MODEL_PATH: &str = "/models/sentence-transformers/all-MiniLM-L6-v2";

const SUNNY: &str =
    "I'm feeling so good today, the sun is shining bright, I'm dancing in the light";

/// Test helper: resolve config from a fixed environment pointing at `server`
fn config_for(server: &MockServer, pairs: &[(&str, &str)]) -> EngineConfig {
    let mut env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    env.insert("HF_BASE_URL".to_string(), server.uri());
    env.insert("OPENROUTER_BASE_URL".to_string(), server.uri());
    EngineConfig::resolve(&TomlConfig::default(), |k| env.get(k).cloned())
        .expect("Failed to resolve test config")
}

fn llm_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

#[tokio::test]
async fn test_face_classifier_tier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FACE_MODEL_PATH))
        .and(header("authorization", "Bearer hf_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "label": "happy", "score": 0.91 },
            { "label": "sad", "score": 0.05 },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("AI_FACE_ADAPTER", "hf"), ("HF_API_TOKEN", "hf_test")]);
    let face = FaceAdapter::from_config(&config).unwrap();
    assert_eq!(face.tier_names(), vec!["hf-face", "random-local"]);

    let estimate = face.analyze(&[0xFF, 0xD8, 0xFF]).await;
    assert_eq!(estimate.mood_label(), CanonicalMood::Happy);
    assert!((estimate.confidence() - 0.91).abs() < 1e-6);
    assert_eq!(estimate.intensity(), 9);
    assert_eq!(estimate.source(), MoodSource::RemoteClassifier);
    assert_eq!(estimate.details()["label"], "happy");
}

#[tokio::test]
async fn test_face_server_error_falls_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FACE_MODEL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .mount(&server)
        .await;

    let config = config_for(&server, &[("AI_FACE_ADAPTER", "hf"), ("HF_API_TOKEN", "hf_test")]);
    let estimate = FaceAdapter::from_config(&config)
        .unwrap()
        .analyze(b"jpeg")
        .await;

    assert_eq!(estimate.source(), MoodSource::LocalHeuristic);
    assert!(estimate.has_flag("fallback"));
    assert!(estimate.has_flag("mock"));
}

#[tokio::test]
async fn test_slow_classifier_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FACE_MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "label": "angry", "score": 0.99 }]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = config_for(
        &server,
        &[
            ("AI_FACE_ADAPTER", "hf"),
            ("HF_API_TOKEN", "hf_test"),
            ("MELODY_REMOTE_TIMEOUT_SECS", "1"),
        ],
    );
    let estimate = FaceAdapter::from_config(&config)
        .unwrap()
        .analyze(b"jpeg")
        .await;

    assert_eq!(estimate.source(), MoodSource::LocalHeuristic);
    assert!(estimate.has_flag("fallback"));
}

fn audio_adapter(config: &EngineConfig) -> AudioAdapter {
    AudioAdapter::from_config(config, Arc::new(TextAdapter::new())).unwrap()
}

#[tokio::test]
async fn test_speech_classifier_tier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SPEECH_MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "label": "fearful", "score": 0.64 },
            { "label": "calm", "score": 0.2 },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("AI_AUDIO_ADAPTER", "hf"), ("HF_API_TOKEN", "hf_test")]);
    let audio = audio_adapter(&config);
    assert_eq!(audio.tier_names(), vec!["hf-speech", "random-local"]);

    let estimate = audio.analyze(&SpeechInput::new(vec![0x52, 0x49, 0x46, 0x46], None)).await;
    assert_eq!(estimate.mood_label(), CanonicalMood::Anxious);
    assert_eq!(estimate.intensity(), 6);
    assert_eq!(estimate.source(), MoodSource::RemoteClassifier);
    assert_eq!(estimate.details()["label"], "fearful");
}

#[tokio::test]
async fn test_speech_server_error_falls_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SPEECH_MODEL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("AI_AUDIO_ADAPTER", "hf"), ("HF_API_TOKEN", "hf_test")]);
    let estimate = audio_adapter(&config)
        .analyze(&SpeechInput::new(vec![1; 16], None))
        .await;

    assert_eq!(estimate.source(), MoodSource::LocalHeuristic);
    assert!(estimate.has_flag("fallback"));
    assert_eq!(estimate.details()["payloadBytes"], 16);
}

#[tokio::test]
async fn test_empty_audio_skips_speech_classifier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SPEECH_MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "label": "happy", "score": 0.9 },
        ])))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("AI_AUDIO_ADAPTER", "hf"), ("HF_API_TOKEN", "hf_test")]);
    let estimate = audio_adapter(&config)
        .analyze(&SpeechInput::new(Vec::new(), None))
        .await;

    assert_eq!(estimate.source(), MoodSource::LocalHeuristic);
    assert!(estimate.has_flag("fallback"));
}

#[tokio::test]
async fn test_text_mode_without_transcript_uses_speech_classifier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SPEECH_MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "label": "angry", "score": 0.81 },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("AI_AUDIO_ADAPTER", "text"), ("HF_API_TOKEN", "hf_test")]);
    let audio = audio_adapter(&config);
    assert_eq!(
        audio.tier_names(),
        vec!["transcript", "hf-speech", "random-local"]
    );

    let estimate = audio.analyze(&SpeechInput::new(vec![7; 8], None)).await;
    assert_eq!(estimate.mood_label(), CanonicalMood::Angry);
    assert_eq!(estimate.source(), MoodSource::RemoteClassifier);
}

#[tokio::test]
async fn test_lyrics_llm_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer or_test"))
        .respond_with(llm_reply(
            "Here you go:\n```json\n{\"overallMood\": \"Energetic\", \"confidence\": \"0.82\", \
             \"intensity\": 7.6, \"emotions\": [{\"emotion\": \"energetic\", \"score\": 0.8}], \
             \"reasoning\": \"Driving imagery\"}\n```",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("OPENROUTER_API_KEY", "or_test")]);
    let lyrics = LyricsAnalyzer::from_config(&config).unwrap();
    assert_eq!(lyrics.tier_names(), vec!["openrouter-llm", "lexicon"]);

    let report = lyrics.analyze(SUNNY).await;
    assert_eq!(report.overall_mood, CanonicalMood::Energetic);
    assert!((report.confidence - 0.82).abs() < 1e-9);
    assert_eq!(report.intensity, 8);
    assert_eq!(report.source, MoodSource::RemoteLlm);
    assert_eq!(report.reasoning.as_deref(), Some("Driving imagery"));
}

#[tokio::test]
async fn test_lyrics_neutral_llm_falls_through_to_classifier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(llm_reply("{\"overallMood\": \"neutral\", \"confidence\": 0.9}"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SENTIMENT_MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "positive", "score": 0.88 },
            { "label": "neutral", "score": 0.1 },
            { "label": "negative", "score": 0.02 },
        ]])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(
        &server,
        &[("OPENROUTER_API_KEY", "or_test"), ("HF_API_TOKEN", "hf_test")],
    );
    let lyrics = LyricsAnalyzer::from_config(&config).unwrap();
    assert_eq!(
        lyrics.tier_names(),
        vec!["openrouter-llm", "hf-sentiment", "lexicon"]
    );

    let report = lyrics.analyze(SUNNY).await;
    assert_eq!(report.overall_mood, CanonicalMood::Happy);
    assert!((report.confidence - 0.88).abs() < 1e-9);
    assert_eq!(report.intensity, 9);
    assert_eq!(report.source, MoodSource::RemoteClassifier);
    assert_eq!(report.emotions.len(), 3);
}

#[tokio::test]
async fn test_lyrics_classifier_outage_uses_lexicon() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SENTIMENT_MODEL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = config_for(&server, &[("HF_API_TOKEN", "hf_test")]);
    let report = LyricsAnalyzer::from_config(&config)
        .unwrap()
        .analyze(SUNNY)
        .await;

    assert_eq!(report.overall_mood, CanonicalMood::Happy);
    assert_eq!(report.confidence, 0.95);
    assert_eq!(report.intensity, 10);
    assert_eq!(report.source, MoodSource::LocalHeuristic);
}

fn songs() -> Vec<SongCandidate> {
    let mut storm = SongCandidate::new("Storm", "Thunder Kids");
    storm.genres = vec!["metal".to_string()];
    let mut breeze = SongCandidate::new("Breeze", "Low Tide");
    breeze.mood_tags = vec!["calm".to_string()];
    vec![storm, breeze]
}

#[tokio::test]
async fn test_embedding_rank_orders_by_similarity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EMBED_MODEL_PATH))
        .and(body_string_contains("Current mood"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1.0, 0.0])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(EMBED_MODEL_PATH))
        .and(body_string_contains("Storm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([0.0, 1.0])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(EMBED_MODEL_PATH))
        .and(body_string_contains("Breeze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[0.9, 0.1]])))
        .mount(&server)
        .await;

    let config = config_for(&server, &[("AI_RECO_ADAPTER", "hf"), ("HF_API_TOKEN", "hf_test")]);
    let adapter = RecommendationAdapter::from_config(&config).unwrap();
    assert!(adapter.is_enabled());

    let ranked = adapter.rank_songs("calm", &[], songs()).await;
    let titles: Vec<&str> = ranked.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Breeze", "Storm"]);
}

#[tokio::test]
async fn test_embedding_failure_keeps_original_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EMBED_MODEL_PATH))
        .and(body_string_contains("Breeze"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(EMBED_MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([0.5, 0.5])))
        .mount(&server)
        .await;

    let config = config_for(&server, &[("AI_RECO_ADAPTER", "hf"), ("HF_API_TOKEN", "hf_test")]);
    let ranked = RecommendationAdapter::from_config(&config)
        .unwrap()
        .rank_songs("calm", &[], songs())
        .await;

    let titles: Vec<&str> = ranked.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Storm", "Breeze"]);
}

#[tokio::test]
async fn test_chat_llm_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer or_test"))
        .and(header("x-title", "MelodyMind Chat"))
        .and(body_string_contains("You are MelodyMind AI"))
        .and(body_string_contains("\"max_tokens\":1000"))
        .respond_with(llm_reply("Try some lo-fi beats for studying."))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("OPENROUTER_API_KEY", "or_test")]);
    let assistant = ChatAssistant::from_config(&config).unwrap();
    assert_eq!(assistant.tier_names(), vec!["openrouter-chat", "keyword-reply"]);

    let reply = assistant.reply("What should I listen to while studying?").await;
    assert_eq!(reply.source, ChatSource::OpenRouter);
    assert_eq!(reply.message, "Try some lo-fi beats for studying.");
}

#[tokio::test]
async fn test_chat_server_error_uses_keyword_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": { "message": "upstream" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("OPENROUTER_API_KEY", "or_test")]);
    let reply = ChatAssistant::from_config(&config)
        .unwrap()
        .reply("Recommend happy songs")
        .await;

    assert_eq!(reply.source, ChatSource::Fallback);
    assert!(reply.message.contains("Music Recommendations"));
}

#[tokio::test]
async fn test_chat_empty_completion_uses_keyword_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(llm_reply("   "))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("OPENROUTER_API_KEY", "or_test")]);
    let reply = ChatAssistant::from_config(&config)
        .unwrap()
        .reply("hello")
        .await;

    assert_eq!(reply.source, ChatSource::Fallback);
    assert!(reply.message.contains("Hello! I'm MelodyMind AI"));
}
