//! Optional inspector-chain debug dump: writes the resolved
//! [`RequestProfile`] for a session to
//! `{output_dir}/{YYYY-MM-DD}/{session_id}.jsonl`, one line per request.
//! Entirely off the hot path unless the `debug-dump` feature is enabled.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;
use regex::Regex;
use relay_types::RequestProfile;

static SESSION_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap());

/// Replace a session id that doesn't match `[A-Za-z0-9_-]{1,64}` with
/// `"default"`, so path traversal (`..`, `/`, URL-encoded separators,
/// absolute paths, null bytes) can never escape `output_dir`.
fn sanitize_session_id(session_id: &str) -> &str {
    if SESSION_ID_PATTERN.is_match(session_id) {
        session_id
    } else {
        "default"
    }
}

pub struct InspectorDump {
    output_dir: PathBuf,
    warned_unsupported: AtomicBool,
}

impl InspectorDump {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            warned_unsupported: AtomicBool::new(false),
        }
    }

    /// Append one JSONL line recording `profile` under today's date
    /// directory for `session_id`. Failures are the caller's concern to
    /// surface; this never panics on a malformed session id, only on it
    /// falling back to `"default"`.
    pub fn dump(&self, session_id: &str, profile: &RequestProfile) -> std::io::Result<()> {
        imp::dump(self, session_id, profile)
    }

    fn warn_once_unsupported(&self) {
        if !self.warned_unsupported.swap(true, Ordering::Relaxed) {
            tracing::warn!("debug-dump is only supported on unix targets; dumps are disabled on this platform");
        }
    }

    fn day_dir(&self, today: &str) -> PathBuf {
        self.output_dir.join(today)
    }
}

#[cfg(unix)]
mod imp {
    use super::*;
    use std::fs::{self, OpenOptions};
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    pub(super) fn dump(dump: &InspectorDump, session_id: &str, profile: &RequestProfile) -> std::io::Result<()> {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let day_dir = dump.day_dir(&today);
        fs::create_dir_all(&day_dir)?;
        fs::set_permissions(&day_dir, fs::Permissions::from_mode(0o700))?;

        let safe_session_id = sanitize_session_id(session_id);
        let file_path = day_dir.join(format!("{safe_session_id}.jsonl"));

        let mut file = OpenOptions::new().create(true).append(true).open(&file_path)?;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;

        let line = serde_json::json!({
            "path": profile.path(),
            "model_name": profile.model_name(),
            "supported_by": profile.supported_by(),
        });
        writeln!(file, "{line}")
    }
}

#[cfg(not(unix))]
mod imp {
    use super::*;

    pub(super) fn dump(dump: &InspectorDump, _session_id: &str, _profile: &RequestProfile) -> std::io::Result<()> {
        dump.warn_once_unsupported();
        Ok(())
    }
}
