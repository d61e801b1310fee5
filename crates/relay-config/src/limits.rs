//! Size and timing limits the inspector chain and metrics extractor enforce.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_MAX_BODY_SIZE: u64 = 1024 * 1024;
const DEFAULT_MAX_EXTRACTION_TIMEOUT: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_body_size: u64,
    #[serde(with = "millis")]
    pub max_extraction_timeout: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_extraction_timeout: DEFAULT_MAX_EXTRACTION_TIMEOUT,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
