//! Runtime metrics produced by the metrics extractor.

use serde::{Deserialize, Serialize};

/// Per-response (or per-chunk) runtime metrics. Integer fields are 32-bit;
/// durations are milliseconds after conversion from the provider's
/// nanosecond-resolution fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetrics {
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub total_tokens: i32,
    pub model: String,
    pub finish_reason: String,
    pub is_complete: bool,
    pub prompt_ms: i32,
    pub generation_ms: i32,
    pub total_ms: i32,
    pub model_load_ms: i32,
    pub ttft_ms: i32,
    pub tokens_per_second: f32,
}

impl ProviderMetrics {
    /// Apply the derived-fallback rules (spec §4.6 step 4), each applied
    /// only when the corresponding field is still at its zero value.
    pub fn apply_derived_fallbacks(&mut self) {
        if self.tokens_per_second == 0.0 && self.output_tokens > 0 && self.generation_ms > 0 {
            self.tokens_per_second = self.output_tokens as f32 / (self.generation_ms as f32 / 1000.0);
        }
        if self.total_tokens == 0 && self.input_tokens > 0 && self.output_tokens > 0 {
            self.total_tokens = self.input_tokens + self.output_tokens;
        }
    }
}
