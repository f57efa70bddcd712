use serde::Serialize;
use time::OffsetDateTime;

use super::RunRecord;

/// Maximum number of output lines carried into a status snapshot when the
/// last run failed.
pub const ERROR_SNIPPET_MAX_LINES: usize = 20;

/// Point-in-time, lock-consistent copy of one instance's last-run state.
///
/// This is the wire shape of one element of the `/status` response. Fields
/// that carry no information for a given state are omitted from the JSON
/// rather than serialized empty.
#[derive(Clone, Debug, Serialize)]
pub struct StatusSnapshot {
    pub name: String,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_run_at: Option<OffsetDateTime>,
    pub last_duration_ms: u64,
    pub success: bool,
    /// Derived from the record's never-advanced `next_run_at`; negative once
    /// that moment has passed.
    pub time_until_next_run_ms: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_error_snippet: String,
}

impl StatusSnapshot {
    /// Derive the wire snapshot from a copied-out record.
    pub fn from_record(name: &str, record: &RunRecord, now: OffsetDateTime) -> Self {
        Self {
            name: name.to_string(),
            last_run_at: record.last_run_at,
            last_duration_ms: record.last_duration.as_millis() as u64,
            success: record.success,
            time_until_next_run_ms: (record.next_run_at - now).whole_milliseconds() as i64,
            last_error_snippet: error_snippet(&record.last_error),
        }
    }
}

/// First [`ERROR_SNIPPET_MAX_LINES`] lines of `text`; shorter input is
/// returned whole.
pub fn error_snippet(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.split('\n')
        .take(ERROR_SNIPPET_MAX_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}
