mod support;

use std::collections::HashMap;

use relay_core::MetricsExtractor;
use relay_types::ports::{MetricsExtractionConfig, MetricsSource, ProviderProfile};

fn ollama_profile() -> ProviderProfile {
    let mut paths = HashMap::new();
    paths.insert("model".to_string(), "$.model".to_string());
    paths.insert("done".to_string(), "$.done".to_string());
    paths.insert("total_duration_ns".to_string(), "$.total_duration".to_string());
    paths.insert("load_duration_ns".to_string(), "$.load_duration".to_string());
    paths.insert("input_tokens".to_string(), "$.prompt_eval_count".to_string());
    paths.insert("output_tokens".to_string(), "$.eval_count".to_string());
    paths.insert("prompt_duration_ns".to_string(), "$.prompt_eval_duration".to_string());
    paths.insert("eval_duration_ns".to_string(), "$.eval_duration".to_string());

    let mut calculations = HashMap::new();
    calculations.insert(
        "tokens_per_second".to_string(),
        "output_tokens / (eval_duration_ns / 1000000000)".to_string(),
    );

    ProviderProfile {
        name: "ollama".to_string(),
        request_parsing_rules: Default::default(),
        metrics_extraction: MetricsExtractionConfig {
            enabled: true,
            source: MetricsSource::ResponseBody,
            paths,
            calculations,
            headers: HashMap::new(),
        },
    }
}

#[tokio::test]
async fn scenario_5_ollama_metrics_extraction() {
    let extractor = MetricsExtractor::new();
    let profile = ollama_profile();

    let body = serde_json::json!({
        "model": "llama2:latest",
        "done": true,
        "total_duration": 5_589_157_167i64,
        "load_duration": 3_013_701_500i64,
        "prompt_eval_count": 26,
        "eval_count": 290,
        "prompt_eval_duration": 2_000_000_000i64,
        "eval_duration": 2_575_455_000i64,
    });
    let data = serde_json::to_vec(&body).unwrap();

    let metrics = extractor
        .extract_metrics(&data, &HashMap::new(), &profile)
        .await
        .expect("well-formed ollama response should extract");

    assert_eq!(metrics.output_tokens, 290);
    assert_eq!(metrics.input_tokens, 26);
    assert_eq!(metrics.generation_ms, 2575);
    assert_eq!(metrics.total_ms, 5589);
    assert_eq!(metrics.model_load_ms, 3013);
    assert_eq!(metrics.ttft_ms, 2000);
    assert!((metrics.tokens_per_second - 112.6).abs() < 0.1);
}

#[tokio::test]
async fn repeated_extraction_on_identical_bytes_is_idempotent() {
    let extractor = MetricsExtractor::new();
    let profile = ollama_profile();
    let body = serde_json::json!({
        "model": "llama2:latest",
        "done": true,
        "eval_count": 100,
        "prompt_eval_count": 10,
        "eval_duration": 1_000_000_000i64,
    });
    let data = serde_json::to_vec(&body).unwrap();

    let first = extractor.extract_metrics(&data, &HashMap::new(), &profile).await;
    let second = extractor.extract_metrics(&data, &HashMap::new(), &profile).await;
    assert_eq!(first, second);
}
