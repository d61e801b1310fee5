//! Body Inspector: extracts the model name and detects required
//! `ModelCapabilities` from JSON request bodies, then restores the body for
//! downstream handlers.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use relay_types::content::{Content, ModelOnly};
use relay_types::{ModelCapabilities, RequestProfile};
use serde_json::Value;

use super::{Inspector, InspectableRequest};

/// What an inspector needs from the request body, independent of any
/// particular HTTP server framework: a pull-based chunk stream. The Body
/// Inspector is the sole authority that drains and later restores this.
#[async_trait]
pub trait RequestBody: Send + Sync {
    async fn next_chunk(&self) -> io::Result<Option<Bytes>>;
}

/// Wraps an already-consumed prefix plus whatever remains of the original
/// body, so downstream handlers see the exact original byte sequence. The
/// buffered prefix lives behind a `parking_lot::Mutex` since `next_chunk`
/// takes `&self` (inspectors hold `&dyn RequestBody`, not `&mut`).
pub struct RestoredBody {
    buffered: Mutex<VecDeque<Bytes>>,
    remainder: Arc<dyn RequestBody>,
}

impl RestoredBody {
    pub fn new(buffered: Vec<Bytes>, remainder: Arc<dyn RequestBody>) -> Self {
        Self {
            buffered: Mutex::new(buffered.into()),
            remainder,
        }
    }
}

#[async_trait]
impl RequestBody for RestoredBody {
    async fn next_chunk(&self) -> io::Result<Option<Bytes>> {
        if let Some(chunk) = self.buffered.lock().pop_front() {
            return Ok(Some(chunk));
        }
        self.remainder.next_chunk().await
    }
}

/// A small pool of reusable read buffers so repeated inspections don't
/// reallocate on every request. Bounded per-item reset on return: buffers
/// are truncated to empty, never shrunk, so steady-state reuse avoids
/// reallocation entirely.
pub struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
        }
    }

    pub fn acquire(&self) -> Vec<u8> {
        self.buffers.lock().pop().unwrap_or_default()
    }

    pub fn release(&self, mut buffer: Vec<u8>) {
        buffer.clear();
        self.buffers.lock().push(buffer);
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Read up to `max_bytes` from `body` into a pooled buffer. Returns the
/// collected bytes plus any leftover chunk read past the cap (needed to
/// reconstruct the exact remainder for restoration) and whether the body
/// was truncated.
async fn read_capped(
    body: &dyn RequestBody,
    max_bytes: usize,
    pool: &BufferPool,
) -> io::Result<(Vec<u8>, Option<Bytes>, bool)> {
    let mut buffer = pool.acquire();
    let mut overflow = None;
    let mut truncated = false;

    while buffer.len() < max_bytes {
        match body.next_chunk().await? {
            Some(chunk) => {
                let remaining_capacity = max_bytes - buffer.len();
                if chunk.len() > remaining_capacity {
                    buffer.extend_from_slice(&chunk[..remaining_capacity]);
                    overflow = Some(chunk.slice(remaining_capacity..));
                    truncated = true;
                    break;
                }
                buffer.extend_from_slice(&chunk);
            }
            None => break,
        }
    }

    if overflow.is_none() && buffer.len() >= max_bytes {
        if let Some(chunk) = body.next_chunk().await? {
            if !chunk.is_empty() {
                overflow = Some(chunk);
                truncated = true;
            }
        }
    }

    Ok((buffer, overflow, truncated))
}

/// Splice `buffer` (and `overflow`, if the read ran past the cap) in front
/// of `remainder` so a [`RestoredBody`] replays the exact bytes the original
/// stream would have produced.
fn restored_body(buffer: &[u8], overflow: Option<Bytes>, remainder: Arc<dyn RequestBody>) -> Arc<dyn RequestBody> {
    let mut chunks = vec![Bytes::copy_from_slice(buffer)];
    if let Some(chunk) = overflow {
        chunks.push(chunk);
    }
    Arc::new(RestoredBody::new(chunks, remainder))
}

const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

pub struct BodyInspector {
    max_body_size: usize,
    pool: BufferPool,
}

impl BodyInspector {
    pub fn new(max_body_size: usize) -> Self {
        Self {
            max_body_size,
            pool: BufferPool::new(),
        }
    }
}

impl Default for BodyInspector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BODY_SIZE)
    }
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_lowercase().contains("application/json"))
        .unwrap_or(false)
}

/// Strict-then-loose model name extraction (spec §4.3 steps 1-3).
fn extract_model_name(value: &Value) -> String {
    if let Ok(typed) = serde_json::from_value::<ModelOnly>(value.clone()) {
        if let Some(model) = typed.model {
            if !model.trim().is_empty() {
                return normalize_model_name(&model);
            }
        }
    }

    if let Some(obj) = value.as_object() {
        for (key, val) in obj {
            if key.eq_ignore_ascii_case("model") {
                if let Some(s) = val.as_str() {
                    if !s.trim().is_empty() {
                        return normalize_model_name(s);
                    }
                }
            }
        }
    }

    if let Some(model) = value
        .get("messages")
        .and_then(Value::as_array)
        .and_then(|msgs| msgs.first())
        .and_then(|m| m.get("model"))
        .and_then(Value::as_str)
    {
        if !model.trim().is_empty() {
            return normalize_model_name(model);
        }
    }

    String::new()
}

fn normalize_model_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

const CODE_KEYWORDS: [&str; 6] = ["code", "programming", "function", "class", "debug", "implement"];

/// Capability detection (spec §4.3).
fn detect_capabilities(value: &Value) -> ModelCapabilities {
    let mut caps = ModelCapabilities::default();

    if let Some(stream) = value.get("stream").and_then(Value::as_bool) {
        caps.streaming_support = stream;
    }

    let has_tool_fields = ["tools", "functions", "tool_choice", "function_call"]
        .iter()
        .any(|key| value.get(*key).map(|v| !v.is_null()).unwrap_or(false));
    if has_tool_fields {
        caps.function_calling = true;
    }

    if value.get("input").map(|v| !v.is_null()).unwrap_or(false) {
        caps.embeddings = true;
        caps.chat_completion = false;
        caps.text_generation = false;
    }

    if let Some(messages) = value.get("messages").and_then(Value::as_array) {
        for message in messages {
            if let Some(content_value) = message.get("content") {
                let content = Content::from_value(content_value);
                if content.indicates_vision() {
                    caps.vision_understanding = true;
                }
            }

            let is_system = message.get("role").and_then(Value::as_str) == Some("system");
            if is_system {
                if let Some(text) = message.get("content").and_then(Value::as_str) {
                    let lower = text.to_lowercase();
                    if CODE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
                        caps.code_generation = true;
                    }
                }
            }
        }
    }

    let explicit_language = value
        .get("language")
        .and_then(Value::as_str)
        .map(|s| !s.is_empty())
        .unwrap_or(false);
    let explicit_code_model = value.get("code_model").and_then(Value::as_bool).unwrap_or(false);
    if explicit_language || explicit_code_model {
        caps.code_generation = true;
    }

    caps
}

#[async_trait]
impl Inspector for BodyInspector {
    async fn inspect(&self, request: &dyn InspectableRequest, profile: &mut RequestProfile) {
        if !is_json_content_type(request.content_type()) {
            return;
        }

        let content_length = match request.content_length() {
            Some(0) | None => return,
            Some(len) => len,
        };
        if content_length > self.max_body_size as u64 {
            return;
        }

        let body = request.body();
        let (buffer, overflow, truncated) = match read_capped(body.as_ref(), self.max_body_size, &self.pool).await {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(error = %err, "body inspector: failed to read request body");
                return;
            }
        };

        if truncated {
            request.replace_body(restored_body(&buffer, overflow, body));
            self.pool.release(buffer);
            return;
        }

        let value: Value = match serde_json::from_slice(&buffer) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "body inspector: request body is not valid JSON");
                request.replace_body(restored_body(&buffer, overflow, body));
                self.pool.release(buffer);
                return;
            }
        };

        let model_name = extract_model_name(&value);
        if !model_name.is_empty() {
            profile.set_model_name(model_name);
        }

        let capabilities = detect_capabilities(&value);
        profile.set_model_capabilities(capabilities);

        request.replace_body(restored_body(&buffer, overflow, body));
        self.pool.release(buffer);
    }

    fn name(&self) -> &str {
        "body"
    }
}
