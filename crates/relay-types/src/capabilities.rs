//! Model capability detection results.

use serde::{Deserialize, Serialize};

/// Boolean feature set detected from a request body.
///
/// Only attached to a [`crate::profile::RequestProfile`] when at least one
/// of the "special" capabilities (vision, functions, embeddings, code-gen)
/// is present — plain chat requests leave this field absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    pub chat_completion: bool,
    pub text_generation: bool,
    pub streaming_support: bool,
    pub function_calling: bool,
    pub vision_understanding: bool,
    pub embeddings: bool,
    pub code_generation: bool,
}

impl Default for ModelCapabilities {
    fn default() -> Self {
        Self {
            chat_completion: true,
            text_generation: true,
            streaming_support: true,
            function_calling: false,
            vision_understanding: false,
            embeddings: false,
            code_generation: false,
        }
    }
}

impl ModelCapabilities {
    /// Whether this record is "notable" enough to attach to a profile: at
    /// least one special capability is set.
    pub fn is_notable(&self) -> bool {
        self.vision_understanding || self.function_calling || self.embeddings || self.code_generation
    }
}
