//! Batch run reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One subject (ticker or order) that failed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFailure {
    pub subject: String,
    pub reason: String,
}

/// Outcome of one batch command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Job label, e.g. "ingest" or "enrich-trend".
    pub job: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Subjects that completed.
    pub succeeded: u32,
    /// Subjects with nothing to do.
    pub skipped: u32,
    /// Rows written across all tables this run touched.
    pub rows_written: u64,
    pub failures: Vec<RunFailure>,
}

impl RunReport {
    /// Start a report for `job`.
    pub fn new(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            started_at: Utc::now(),
            duration_ms: 0,
            succeeded: 0,
            skipped: 0,
            rows_written: 0,
            failures: Vec::new(),
        }
    }

    /// Record a failed subject.
    pub fn fail(&mut self, subject: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(RunFailure {
            subject: subject.into(),
            reason: reason.into(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Stamp the elapsed time. Call once, when the run is done.
    pub fn complete(&mut self) {
        self.duration_ms = (Utc::now() - self.started_at).num_milliseconds().max(0) as u64;
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str(&format!("  {} RUN\n", self.job.to_uppercase()));
        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str(&format!("  Succeeded:           {}\n", self.succeeded));
        s.push_str(&format!("  Skipped:             {}\n", self.skipped));
        s.push_str(&format!("  Failed:              {}\n", self.failures.len()));
        s.push_str(&format!("  Rows Written:        {}\n", self.rows_written));
        s.push_str(&format!("  Elapsed:             {} ms\n", self.duration_ms));

        if !self.failures.is_empty() {
            s.push_str("\nFAILURES\n");
            s.push_str("───────────────────────────────────────────────────────────\n");
            for failure in &self.failures {
                s.push_str(&format!("  {}: {}\n", failure.subject, failure.reason));
            }
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
