//! Metrics Extractor: turns a provider's response body (or streamed chunk)
//! into a [`ProviderMetrics`] under a hard per-call deadline, driven entirely
//! by the provider's configured extraction profile — no per-provider code in
//! this crate.

mod expr;
mod path;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use relay_types::ports::{MetricsExtractionConfig, MetricsSource, ProviderProfile};
use relay_types::{ExtractionError, ExtractionResult, ProviderMetrics};
use serde_json::Value;

const STANDARD_ALIASES: &[&str] = &[
    "input_tokens",
    "output_tokens",
    "eval_duration_ns",
    "prompt_duration_ns",
    "total_duration_ns",
    "load_duration_ns",
];

const DEFAULT_MAX_EXTRACTION_TIMEOUT: Duration = Duration::from_millis(10);

type PathCache = DashMap<(String, String), Arc<path::CompiledPath>>;
type ExprCache = DashMap<(String, String), Arc<expr::CompiledExpr>>;

/// Caches compiled paths/expressions per `(profile name, field name)` and
/// enforces the hard extraction deadline. Shared across requests — cheap to
/// clone (every field is an `Arc` or an atomic), so callers can hold it
/// behind an `Arc<MetricsExtractor>` or clone it freely into worker tasks.
#[derive(Clone)]
pub struct MetricsExtractor {
    path_cache: Arc<PathCache>,
    expr_cache: Arc<ExprCache>,
    validated_profiles: Arc<DashMap<String, bool>>,
    extraction_count: Arc<AtomicU64>,
    failure_count: Arc<AtomicU64>,
    max_extraction_timeout: Duration,
}

impl Default for MetricsExtractor {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_MAX_EXTRACTION_TIMEOUT)
    }
}

impl MetricsExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(max_extraction_timeout: Duration) -> Self {
        Self {
            path_cache: Arc::new(DashMap::new()),
            expr_cache: Arc::new(DashMap::new()),
            validated_profiles: Arc::new(DashMap::new()),
            extraction_count: Arc::new(AtomicU64::new(0)),
            failure_count: Arc::new(AtomicU64::new(0)),
            max_extraction_timeout,
        }
    }

    pub fn extraction_count(&self) -> u64 {
        self.extraction_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Compile and cache every configured path and calculation for `profile`.
    /// Idempotent — a profile already validated returns immediately. Errors
    /// here are the only place this crate surfaces an [`ExtractionError`];
    /// the per-request hot path never constructs one.
    pub fn validate_profile(&self, profile: &ProviderProfile) -> ExtractionResult<()> {
        if matches!(self.validated_profiles.get(&profile.name).as_deref(), Some(true)) {
            return Ok(());
        }

        let cfg = &profile.metrics_extraction;
        if !cfg.enabled {
            return Err(ExtractionError::ProfileDisabled {
                profile: profile.name.clone(),
            });
        }

        let mut allowed: HashSet<String> = cfg.paths.keys().cloned().collect();
        allowed.extend(STANDARD_ALIASES.iter().map(|s| s.to_string()));

        for (field, raw_path) in &cfg.paths {
            let compiled = path::compile(field, raw_path)?;
            self.path_cache
                .insert((profile.name.clone(), field.clone()), Arc::new(compiled));
        }

        for (field, source) in &cfg.calculations {
            let compiled = expr::compile(field, source)?;
            for var in compiled.referenced_vars() {
                if !allowed.contains(&var) {
                    return Err(ExtractionError::UnknownIdentifier {
                        field: field.clone(),
                        identifier: var,
                    });
                }
            }
            self.expr_cache
                .insert((profile.name.clone(), field.clone()), Arc::new(compiled));
        }

        self.validated_profiles.insert(profile.name.clone(), true);
        Ok(())
    }

    /// Extract metrics from a full response body plus optional headers.
    /// Returns `None` on a disabled/unvalidatable profile, empty input, a
    /// deadline overrun, or a panic inside the extraction worker — every
    /// failure path increments `failure_count` rather than propagating.
    pub async fn extract_metrics(
        &self,
        data: &[u8],
        headers: &HashMap<String, String>,
        profile: &ProviderProfile,
    ) -> Option<ProviderMetrics> {
        if !profile.metrics_extraction.enabled {
            return None;
        }
        if data.is_empty() && headers.is_empty() {
            return None;
        }
        if self.validate_profile(profile).is_err() {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let paths = self.compiled_paths(&profile.name, &profile.metrics_extraction);
        let exprs = self.compiled_exprs(&profile.name, &profile.metrics_extraction);
        let source = profile.metrics_extraction.source;
        let data = data.to_vec();
        let headers = headers.clone();

        let worker = tokio::task::spawn_blocking(move || run_extraction(source, &data, &headers, &paths, &exprs));

        self.extraction_count.fetch_add(1, Ordering::Relaxed);
        match tokio::time::timeout(self.max_extraction_timeout, worker).await {
            Ok(Ok(Some(metrics))) => Some(metrics),
            Ok(Ok(None)) => {
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                None
            }
            Ok(Err(join_error)) => {
                tracing::debug!(error = %join_error, "metrics extraction worker failed");
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(_elapsed) => {
                tracing::debug!(profile = %profile.name, "metrics extraction deadline exceeded");
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Extraction from a single streamed chunk; headers are never available
    /// on a chunk boundary.
    pub async fn extract_from_chunk(&self, chunk: &[u8], profile: &ProviderProfile) -> Option<ProviderMetrics> {
        self.extract_metrics(chunk, &HashMap::new(), profile).await
    }

    fn compiled_paths(&self, profile_name: &str, cfg: &MetricsExtractionConfig) -> Vec<(String, Arc<path::CompiledPath>)> {
        cfg.paths
            .keys()
            .filter_map(|field| {
                self.path_cache
                    .get(&(profile_name.to_string(), field.clone()))
                    .map(|entry| (field.clone(), entry.clone()))
            })
            .collect()
    }

    fn compiled_exprs(&self, profile_name: &str, cfg: &MetricsExtractionConfig) -> Vec<(String, Arc<expr::CompiledExpr>)> {
        cfg.calculations
            .keys()
            .filter_map(|field| {
                self.expr_cache
                    .get(&(profile_name.to_string(), field.clone()))
                    .map(|entry| (field.clone(), entry.clone()))
            })
            .collect()
    }
}

fn run_extraction(
    source: MetricsSource,
    data: &[u8],
    headers: &HashMap<String, String>,
    paths: &[(String, Arc<path::CompiledPath>)],
    exprs: &[(String, Arc<expr::CompiledExpr>)],
) -> Option<ProviderMetrics> {
    let mut metrics = ProviderMetrics::default();
    let mut raw: HashMap<String, f64> = HashMap::new();

    if !data.is_empty() && !matches!(source, MetricsSource::ResponseHeaders) {
        let value: Value = serde_json::from_slice(data).ok()?;
        for (field, compiled) in paths {
            if let Some(found) = path::resolve(&value, compiled) {
                apply_field(field, found, &mut metrics, &mut raw);
            }
        }
    }

    for (field, compiled) in exprs {
        if let Some(result) = expr::evaluate(compiled, &raw) {
            apply_calculated(field, result, &mut metrics);
        }
    }

    metrics.apply_derived_fallbacks();

    // Header-sourced metrics are reserved: the mapping surface exists via
    // `MetricsExtractionConfig::headers` but nothing maps through it yet.
    let _ = headers;

    Some(metrics)
}

fn apply_field(field: &str, value: &Value, metrics: &mut ProviderMetrics, raw: &mut HashMap<String, f64>) {
    if let Some(n) = value.as_f64() {
        raw.insert(field.to_string(), n);
    }

    match field {
        "input_tokens" => {
            if let Some(n) = value.as_i64() {
                metrics.input_tokens = n as i32;
            }
        }
        "output_tokens" => {
            if let Some(n) = value.as_i64() {
                metrics.output_tokens = n as i32;
            }
        }
        "total_tokens" => {
            if let Some(n) = value.as_i64() {
                metrics.total_tokens = n as i32;
            }
        }
        "model" => {
            if let Some(s) = value.as_str() {
                metrics.model = s.to_string();
            }
        }
        "finish_reason" => {
            if let Some(s) = value.as_str() {
                metrics.finish_reason = s.to_string();
            }
        }
        "done" => {
            if let Some(b) = value.as_bool() {
                metrics.is_complete = b;
            }
        }
        "prompt_duration_ns" | "prompt_eval_duration" => {
            if let Some(ns) = value.as_f64() {
                let ms = (ns / 1_000_000.0) as i32;
                metrics.prompt_ms = ms;
                metrics.ttft_ms = ms;
            }
        }
        "eval_duration_ns" => {
            if let Some(ns) = value.as_f64() {
                metrics.generation_ms = (ns / 1_000_000.0) as i32;
            }
        }
        "total_duration_ns" => {
            if let Some(ns) = value.as_f64() {
                metrics.total_ms = (ns / 1_000_000.0) as i32;
            }
        }
        "load_duration_ns" => {
            if let Some(ns) = value.as_f64() {
                metrics.model_load_ms = (ns / 1_000_000.0) as i32;
            }
        }
        _ => {}
    }
}

fn apply_calculated(field: &str, result: f64, metrics: &mut ProviderMetrics) {
    match field {
        "tokens_per_second" => metrics.tokens_per_second = result as f32,
        "ttft_ms" => metrics.ttft_ms = result as i32,
        "total_ms" => metrics.total_ms = result as i32,
        "model_load_ms" => metrics.model_load_ms = result as i32,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama_profile() -> ProviderProfile {
        let mut paths = HashMap::new();
        paths.insert("model".to_string(), "$.model".to_string());
        paths.insert("done".to_string(), "$.done".to_string());
        paths.insert("eval_duration_ns".to_string(), "$.eval_duration".to_string());
        paths.insert("prompt_duration_ns".to_string(), "$.prompt_eval_duration".to_string());
        paths.insert("output_tokens".to_string(), "$.eval_count".to_string());
        paths.insert("input_tokens".to_string(), "$.prompt_eval_count".to_string());

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

    #[test]
    fn validate_profile_rejects_unknown_calculation_identifier() {
        let extractor = MetricsExtractor::new();
        let mut profile = ollama_profile();
        profile
            .metrics_extraction
            .calculations
            .insert("bogus".to_string(), "not_a_real_field * 2".to_string());
        let result = extractor.validate_profile(&profile);
        assert!(matches!(result, Err(ExtractionError::UnknownIdentifier { .. })));
    }

    #[test]
    fn validate_profile_rejects_disabled_profile() {
        let extractor = MetricsExtractor::new();
        let mut profile = ollama_profile();
        profile.metrics_extraction.enabled = false;
        assert!(matches!(
            extractor.validate_profile(&profile),
            Err(ExtractionError::ProfileDisabled { .. })
        ));
    }

    #[tokio::test]
    async fn extracts_and_derives_tokens_per_second_like_ollama() {
        let extractor = MetricsExtractor::new();
        let profile = ollama_profile();
        let body = serde_json::json!({
            "model": "llama3:8b",
            "done": true,
            "eval_count": 290,
            "prompt_eval_count": 12,
            "eval_duration": 2_575_000_000i64,
            "prompt_eval_duration": 45_000_000i64,
        });
        let data = serde_json::to_vec(&body).unwrap();
        let metrics = extractor
            .extract_metrics(&data, &HashMap::new(), &profile)
            .await
            .expect("extraction should succeed");

        assert_eq!(metrics.model, "llama3:8b");
        assert!(metrics.is_complete);
        assert_eq!(metrics.output_tokens, 290);
        assert_eq!(metrics.input_tokens, 12);
        assert_eq!(metrics.prompt_ms, 45);
        assert_eq!(metrics.ttft_ms, 45);
        assert!((metrics.tokens_per_second - 112.6).abs() < 0.5);
        assert_eq!(metrics.total_tokens, 302);
        assert_eq!(extractor.extraction_count(), 1);
        assert_eq!(extractor.failure_count(), 0);
    }

    #[tokio::test]
    async fn disabled_profile_returns_none_without_counting_an_extraction() {
        let extractor = MetricsExtractor::new();
        let mut profile = ollama_profile();
        profile.metrics_extraction.enabled = false;
        let result = extractor.extract_metrics(b"{}", &HashMap::new(), &profile).await;
        assert!(result.is_none());
        assert_eq!(extractor.extraction_count(), 0);
    }

    #[tokio::test]
    async fn empty_data_and_headers_returns_none() {
        let extractor = MetricsExtractor::new();
        let profile = ollama_profile();
        let result = extractor.extract_metrics(b"", &HashMap::new(), &profile).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn malformed_json_counts_as_a_failure() {
        let extractor = MetricsExtractor::new();
        let profile = ollama_profile();
        let result = extractor.extract_metrics(b"not json", &HashMap::new(), &profile).await;
        assert!(result.is_none());
        assert_eq!(extractor.extraction_count(), 1);
        assert_eq!(extractor.failure_count(), 1);
    }

    #[tokio::test]
    async fn deadline_overrun_counts_as_a_failure() {
        let extractor = MetricsExtractor::with_timeout(Duration::from_nanos(1));
        let profile = ollama_profile();
        let body = serde_json::json!({"model": "llama3:8b", "done": true});
        let data = serde_json::to_vec(&body).unwrap();
        let result = extractor.extract_metrics(&data, &HashMap::new(), &profile).await;
        assert!(result.is_none());
        assert_eq!(extractor.failure_count(), 1);
    }
}
